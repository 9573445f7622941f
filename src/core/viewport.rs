use crate::constants::{DEFAULT_EAST, DEFAULT_NORTH, DEFAULT_SOUTH, DEFAULT_WEST};
use crate::core::geo::LatLngBounds;
use crate::{MapError, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Fragment keys, in the order they are written back.
const FRAGMENT_KEYS: [&str; 4] = ["north", "south", "east", "west"];

/// Base used only to borrow the URL query-string codec for fragments.
const CODEC_BASE: &str = "http://fragment.invalid/";

/// The geographic box currently visible on the map.
///
/// A constructed `Viewport` always has finite bounds, latitudes within
/// [-90, 90], `south < north` and `west < east`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Viewport {
    /// Creates a viewport, rejecting boxes that are non-finite, inverted or empty.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<Self> {
        let values = [north, south, east, west];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(MapError::InvalidViewport(format!(
                "non-finite bound in {values:?}"
            )));
        }
        if !(-90.0..=90.0).contains(&north) || !(-90.0..=90.0).contains(&south) {
            return Err(MapError::InvalidViewport(format!(
                "latitude out of range: north={north}, south={south}"
            )));
        }
        if south >= north {
            return Err(MapError::InvalidViewport(format!(
                "south ({south}) must be below north ({north})"
            )));
        }
        if west >= east {
            return Err(MapError::InvalidViewport(format!(
                "west ({west}) must be below east ({east})"
            )));
        }

        Ok(Self {
            north,
            south,
            east,
            west,
        })
    }

    /// Creates a viewport from the bounds reported by a map widget
    pub fn from_bounds(bounds: &LatLngBounds) -> Result<Self> {
        Self::new(bounds.north(), bounds.south(), bounds.east(), bounds.west())
    }

    pub fn bounds(&self) -> LatLngBounds {
        LatLngBounds::from_coords(self.south, self.west, self.north, self.east)
    }

    /// Decodes a URL fragment such as `#north=36.2&south=36.0&east=-117.9&west=-118.1`.
    ///
    /// Keys other than the four bounds are ignored; the first occurrence of a
    /// repeated key wins.
    pub fn from_fragment(fragment: &str) -> Result<Self> {
        let query = fragment.strip_prefix('#').unwrap_or(fragment);
        let mut url = codec_url()?;
        url.set_query(Some(query));

        let mut values: [Option<f64>; 4] = [None; 4];
        for (key, value) in url.query_pairs() {
            let Some(slot) = FRAGMENT_KEYS.iter().position(|k| *k == key) else {
                continue;
            };
            if values[slot].is_some() {
                continue;
            }
            let parsed = value.trim().parse::<f64>().map_err(|e| {
                MapError::Location(format!("{key}={value:?} is not a number: {e}"))
            })?;
            values[slot] = Some(parsed);
        }

        match values {
            [Some(north), Some(south), Some(east), Some(west)] => {
                Self::new(north, south, east, west)
            }
            _ => {
                let missing: Vec<&str> = FRAGMENT_KEYS
                    .iter()
                    .zip(values.iter())
                    .filter(|(_, v)| v.is_none())
                    .map(|(k, _)| *k)
                    .collect();
                Err(MapError::Location(format!(
                    "fragment is missing {}",
                    missing.join(", ")
                )))
            }
        }
    }

    /// Encodes the viewport as a query-string style fragment (without `#`).
    ///
    /// Uses the shortest representation that parses back to the same `f64`.
    pub fn to_fragment(&self) -> String {
        let mut url = match codec_url() {
            Ok(url) => url,
            Err(_) => return self.fragment_fallback(),
        };
        url.query_pairs_mut()
            .append_pair("north", &self.north.to_string())
            .append_pair("south", &self.south.to_string())
            .append_pair("east", &self.east.to_string())
            .append_pair("west", &self.west.to_string());
        url.query().unwrap_or_default().to_string()
    }

    fn fragment_fallback(&self) -> String {
        format!(
            "north={}&south={}&east={}&west={}",
            self.north, self.south, self.east, self.west
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            north: DEFAULT_NORTH,
            south: DEFAULT_SOUTH,
            east: DEFAULT_EAST,
            west: DEFAULT_WEST,
        }
    }
}

fn codec_url() -> Result<Url> {
    Url::parse(CODEC_BASE).map_err(|e| MapError::Location(e.to_string()))
}
