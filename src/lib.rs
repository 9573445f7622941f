//! # fieldmap
//!
//! Keeps per-category map markers in sync with the visible map area.
//!
//! Field-collected records (mosquito sources, service requests, trap data)
//! are fetched from an HTTP API for the current viewport and redrawn as
//! markers, one layer per category. The viewport round-trips through the
//! URL fragment so a view can be bookmarked or shared, and activating a
//! marker renders that record into a shared detail panel.
//!
//! The mapping widget, the host document and the record API are external
//! collaborators reached through the [`MapWidget`], [`HostDocument`],
//! [`LocationStore`] and [`RecordSource`] traits.

pub mod audio;
pub mod core;
pub mod data;
pub mod fetch;
pub mod layers;
pub mod prelude;
pub mod runtime;
pub mod sync;
pub mod traits;
pub mod ui;
#[cfg(feature = "wasm")]
pub mod web;

pub use crate::core::constants;

// Re-export public API
pub use core::{
    client::{ClientState, MapClient},
    config::{ClientConfig, TileSourceConfig},
    geo::{LatLng, LatLngBounds},
    location::{LocationStore, MemoryLocation},
    viewport::Viewport,
};

pub use data::{
    category::{Category, CoordinatePath},
    record::Record,
    template::{DetailTemplate, DetailView, FieldSpec},
};

pub use fetch::{
    query::BoundsQuery,
    source::{HttpRecordSource, RecordSource},
};

pub use layers::{
    manager::LayerManager,
    marker::{Marker, MarkerBinding},
    marker_layer::MarkerLayer,
};

pub use sync::{MarkerSynchronizer, RefreshReport};

pub use ui::{
    detail::DetailPresenter,
    document::{HostDocument, MemoryDocument},
    widget::{HeadlessWidget, MapWidget},
};

pub use audio::ruler::{RulerScale, RulerTick};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP status {status} fetching {category}")]
    HttpStatus { category: String, status: u16 },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Location error: {0}")]
    Location(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Widget error: {0}")]
    Widget(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MapError {
    /// True for errors raised while fetching or decoding a category's records.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::HttpStatus { .. } | Self::Parse(_) | Self::UnexpectedShape(_)
        )
    }
}

/// Installs `env_logger`, honouring `RUST_LOG` and defaulting to `info`.
/// Safe to call more than once.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("logger already initialized");
    }
}

/// Error type alias for convenience
pub type Error = MapError;
