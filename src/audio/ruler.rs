use crate::core::constants::DEFAULT_RULER_INTERVALS;

/// One labelled mark on the ruler
#[derive(Debug, Clone, PartialEq)]
pub struct RulerTick {
    /// Position in seconds
    pub time: f64,
    /// Horizontal position as a fraction of the ruler width, in [0, 1]
    pub offset_fraction: f64,
    pub label: String,
}

/// Evenly spaced time scale for an audio clip of known duration.
///
/// Built once the player reports its metadata. A duration that is not a
/// positive finite number (metadata missing, live stream) produces an empty
/// scale that cannot seek.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RulerScale {
    duration: f64,
    intervals: u32,
}

impl RulerScale {
    pub fn new(duration_secs: f64, intervals: u32) -> Self {
        Self {
            duration: duration_secs,
            intervals: intervals.max(1),
        }
    }

    pub fn with_default_intervals(duration_secs: f64) -> Self {
        Self::new(duration_secs, DEFAULT_RULER_INTERVALS)
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn intervals(&self) -> u32 {
        self.intervals
    }

    pub fn is_usable(&self) -> bool {
        self.duration.is_finite() && self.duration > 0.0
    }

    /// `intervals + 1` ticks from 0 to the full duration inclusive
    pub fn ticks(&self) -> Vec<RulerTick> {
        if !self.is_usable() {
            return Vec::new();
        }

        let n = f64::from(self.intervals);
        (0..=self.intervals)
            .map(|i| {
                let fraction = f64::from(i) / n;
                let time = f64::from(i) * self.duration / n;
                RulerTick {
                    time,
                    offset_fraction: fraction,
                    label: format_label(time),
                }
            })
            .collect()
    }

    /// Maps a click `click_x` pixels from the ruler's left edge to a seek time.
    pub fn seek_time(&self, click_x: f64, ruler_width: f64) -> Option<f64> {
        if !self.is_usable() || !click_x.is_finite() || ruler_width.is_nan() || ruler_width <= 0.0 {
            return None;
        }
        let fraction = (click_x / ruler_width).clamp(0.0, 1.0);
        Some(fraction * self.duration)
    }
}

/// `m:ss` for a time in seconds, rounded to the nearest whole second.
pub fn format_label(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scale_has_eleven_ticks() {
        let scale = RulerScale::with_default_intervals(125.0);
        let ticks = scale.ticks();
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[0].label, "0:00");
        assert_eq!(ticks[1].label, "0:13");
        assert_eq!(ticks[5].label, "1:03");
        assert_eq!(ticks[10].label, "2:05");
        assert_eq!(ticks[10].offset_fraction, 1.0);
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(0.0), "0:00");
        assert_eq!(format_label(59.4), "0:59");
        assert_eq!(format_label(59.5), "1:00");
        assert_eq!(format_label(3601.0), "60:01");
        assert_eq!(format_label(f64::NAN), "0:00");
    }

    #[test]
    fn test_seek_is_proportional_and_clamped() {
        let scale = RulerScale::new(200.0, 4);
        assert_eq!(scale.seek_time(50.0, 100.0), Some(100.0));
        assert_eq!(scale.seek_time(0.0, 100.0), Some(0.0));
        assert_eq!(scale.seek_time(-10.0, 100.0), Some(0.0));
        assert_eq!(scale.seek_time(150.0, 100.0), Some(200.0));
        assert_eq!(scale.seek_time(10.0, 0.0), None);
    }

    #[test]
    fn test_unknown_duration() {
        for duration in [f64::NAN, f64::INFINITY, 0.0, -3.0] {
            let scale = RulerScale::with_default_intervals(duration);
            assert!(scale.ticks().is_empty());
            assert_eq!(scale.seek_time(5.0, 10.0), None);
        }
    }

    #[test]
    fn test_zero_intervals_treated_as_one() {
        let ticks = RulerScale::new(30.0, 0).ticks();
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[1].label, "0:30");
    }
}
