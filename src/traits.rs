//! Shared trait abstractions
//!
//! Layer-like objects expose a common set of operations so the widget
//! boundary and the viewer can walk layers without caring what they hold.

use crate::core::geo::LatLngBounds;

/// Trait for layer-like objects
pub trait LayerOperations: Send + Sync {
    /// Get layer ID
    fn id(&self) -> &str;

    /// Get layer name
    fn name(&self) -> &str;

    /// Check if layer is visible
    fn is_visible(&self) -> bool;

    /// Set layer visibility
    fn set_visible(&mut self, visible: bool);

    /// Number of entities currently held by the layer
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Smallest box covering the layer's contents, if it has any
    fn bounds(&self) -> Option<LatLngBounds> {
        None
    }
}
