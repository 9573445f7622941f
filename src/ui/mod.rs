pub mod detail;
pub mod document;
pub mod widget;

pub use detail::DetailPresenter;
pub use document::{HostDocument, MemoryDocument};
pub use widget::{HeadlessWidget, MapWidget, RenderedMarker};
