//! Audio player ruler: tick marks and click-to-seek. Independent of the map.

pub mod ruler;

pub use ruler::{format_label, RulerScale, RulerTick};
