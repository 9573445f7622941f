//! Client configuration
//!
//! Everything the client needs to know about its surroundings: where the
//! record API lives, which categories to show, the fallback viewport, the
//! tile source handed to the widget and the mount point identifiers of the
//! host document. Configurations can be built in code or loaded from JSON.

use crate::constants::{
    DEFAULT_MAX_ZOOM, DEFAULT_TILE_ATTRIBUTION, DEFAULT_TILE_URL, DETAIL_ELEMENT_ID,
    MAP_ELEMENT_ID,
};
use crate::core::viewport::Viewport;
use crate::data::category::Category;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix for API requests; empty means same-origin relative paths.
    pub api_base_url: String,
    /// Box shown when the fragment is missing or malformed.
    pub default_viewport: Viewport,
    /// Category ids to display, in refresh order.
    pub categories: Vec<String>,
    pub user_agent: String,
    pub tiles: TileSourceConfig,
    pub map_element_id: String,
    pub detail_element_id: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            default_viewport: Viewport::default(),
            categories: Category::builtin()
                .iter()
                .map(|c| c.id.clone())
                .collect(),
            user_agent: format!("fieldmap/{}", env!("CARGO_PKG_VERSION")),
            tiles: TileSourceConfig::default(),
            map_element_id: MAP_ELEMENT_ID.to_string(),
            detail_element_id: DETAIL_ELEMENT_ID.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_default_viewport(mut self, viewport: Viewport) -> Self {
        self.default_viewport = viewport;
        self
    }

    pub fn with_categories<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tiles(mut self, tiles: TileSourceConfig) -> Self {
        self.tiles = tiles;
        self
    }

    /// Checks that the default viewport is a valid box and every category is known.
    pub fn validate(&self) -> Result<()> {
        let vp = self.default_viewport;
        Viewport::new(vp.north, vp.south, vp.east, vp.west)?;
        self.resolve_categories().map(|_| ())
    }

    /// Looks up the configured category ids among the built-in definitions.
    pub fn resolve_categories(&self) -> Result<Vec<Category>> {
        self.categories
            .iter()
            .map(|id| {
                Category::builtin_by_id(id).ok_or_else(|| MapError::UnknownCategory(id.clone()))
            })
            .collect()
    }
}

/// Tile source handed to the map widget at initialisation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileSourceConfig {
    pub url_template: String,
    pub max_zoom: u8,
    pub attribution: String,
}

impl Default for TileSourceConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_TILE_URL.to_string(),
            max_zoom: DEFAULT_MAX_ZOOM,
            attribution: DEFAULT_TILE_ATTRIBUTION.to_string(),
        }
    }
}
