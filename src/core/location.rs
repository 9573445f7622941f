//! Viewport persistence through the URL fragment.
//!
//! The fragment is only authoritative on first load; once the widget exists
//! its reported bounds are the source of truth and the fragment is merely
//! kept in step so the current view can be bookmarked.

use crate::core::viewport::Viewport;
use crate::prelude::{Arc, Mutex};
use crate::ui::widget::MapWidget;
use crate::{MapError, Result};

/// Access to the document's URL fragment (the part after `#`).
pub trait LocationStore: Send + Sync {
    /// Current fragment, with or without the leading `#`.
    fn fragment(&self) -> Result<String>;

    /// Replace the fragment without navigating or reloading.
    fn replace_fragment(&self, fragment: &str) -> Result<()>;
}

/// In-process fragment store for headless use and tests.
///
/// Clones share the same underlying fragment.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocation {
    inner: Arc<Mutex<MemoryLocationState>>,
}

#[derive(Debug, Default)]
struct MemoryLocationState {
    fragment: String,
    writes: usize,
}

impl MemoryLocation {
    pub fn new(fragment: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryLocationState {
                fragment: fragment.into(),
                writes: 0,
            })),
        }
    }

    /// Number of times the fragment has been replaced
    pub fn write_count(&self) -> usize {
        self.inner.lock().map(|s| s.writes).unwrap_or(0)
    }
}

impl LocationStore for MemoryLocation {
    fn fragment(&self) -> Result<String> {
        self.inner
            .lock()
            .map(|s| s.fragment.clone())
            .map_err(|e| MapError::Location(e.to_string()))
    }

    fn replace_fragment(&self, fragment: &str) -> Result<()> {
        let mut state = self
            .inner
            .lock()
            .map_err(|e| MapError::Location(e.to_string()))?;
        state.fragment = fragment.trim_start_matches('#').to_string();
        state.writes += 1;
        Ok(())
    }
}

/// Owns the current viewport and keeps it mirrored in the URL fragment.
pub struct ViewportState {
    location: Box<dyn LocationStore>,
    fallback: Viewport,
    current: Viewport,
}

impl ViewportState {
    pub fn new(location: Box<dyn LocationStore>, fallback: Viewport) -> Self {
        Self {
            location,
            fallback,
            current: fallback,
        }
    }

    pub fn current(&self) -> Viewport {
        self.current
    }

    /// Reads the viewport from the fragment, falling back to the default box.
    ///
    /// Never fails: a missing or malformed fragment must not block the first render.
    pub fn parse_from_location(&mut self) -> Viewport {
        let parsed = self
            .location
            .fragment()
            .and_then(|fragment| Viewport::from_fragment(&fragment));

        self.current = match parsed {
            Ok(viewport) => viewport,
            Err(e) => {
                log::debug!("using default viewport: {}", e);
                self.fallback
            }
        };
        self.current
    }

    /// Records `viewport` as current and writes it to the fragment.
    pub fn write_to_location(&mut self, viewport: Viewport) -> Result<()> {
        self.current = viewport;
        self.location.replace_fragment(&viewport.to_fragment())
    }

    /// Reads the authoritative bounds from the widget and makes them current.
    pub fn current_from_widget(&mut self, widget: &dyn MapWidget) -> Result<Viewport> {
        let viewport = Viewport::from_bounds(&widget.bounds()?)?;
        self.current = viewport;
        Ok(viewport)
    }
}
