//! Prelude module for common fieldmap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use fieldmap::prelude::*;`

pub use crate::core::{
    client::{ClientState, MapClient},
    config::{ClientConfig, TileSourceConfig},
    geo::{LatLng, LatLngBounds},
    location::{LocationStore, MemoryLocation, ViewportState},
    viewport::Viewport,
};

pub use crate::data::{
    category::{Category, CoordinatePath, Icon},
    record::Record,
    template::{DetailTemplate, DetailView, FieldSpec},
};

pub use crate::fetch::{
    query::BoundsQuery,
    source::{HttpRecordSource, RecordSource},
};

pub use crate::layers::{
    base::LayerTrait, manager::LayerManager, marker::Marker, marker::MarkerBinding,
    marker_layer::MarkerLayer,
};

pub use crate::sync::{MarkerSynchronizer, RefreshReport};

pub use crate::ui::{
    detail::DetailPresenter,
    document::{HostDocument, MemoryDocument},
    widget::{HeadlessWidget, MapWidget},
};

pub use crate::runtime::{runtime, spawn, AsyncHandle, AsyncSpawner};

pub use crate::{Error as MapError, Result};

pub use std::{
    pin::Pin,
    sync::{Arc, Mutex},
    time::Duration,
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};

pub use futures::Future;
