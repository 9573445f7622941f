#[macro_use]
pub mod macros;

pub mod base;
pub mod manager;
pub mod marker;
pub mod marker_layer;

pub use base::{LayerProperties, LayerTrait};
pub use manager::LayerManager;
pub use marker::{Marker, MarkerBinding};
pub use marker_layer::MarkerLayer;
