//! Boundary to the map rendering widget.
//!
//! Tile loading, gestures and marker drawing belong to the widget; the
//! client only tells it where to look, which icons exist and what each
//! category layer currently holds, and asks it for the visible bounds.

use crate::core::config::TileSourceConfig;
use crate::core::geo::{LatLng, LatLngBounds};
use crate::core::viewport::Viewport;
use crate::data::category::Icon;
use crate::layers::base::LayerTrait;
use crate::layers::marker_layer::MarkerLayer;
use crate::prelude::{Arc, HashMap, Mutex};
use crate::{MapError, Result};

pub trait MapWidget: Send {
    /// Mounts the widget into the element `element_id`, showing `viewport`
    /// with the given tile source
    fn initialize(
        &mut self,
        element_id: &str,
        viewport: &Viewport,
        tiles: &TileSourceConfig,
    ) -> Result<()>;

    /// Bounds currently visible, as reported by the widget
    fn bounds(&self) -> Result<LatLngBounds>;

    fn register_icon(&mut self, icon: &Icon) -> Result<()>;

    /// Redraws a category layer so it shows exactly the layer's markers
    fn show_layer(&mut self, layer: &MarkerLayer) -> Result<()>;
}

/// What a headless widget drew for one marker
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMarker {
    pub id: String,
    pub position: LatLng,
    pub icon: String,
    pub popup: Option<String>,
}

/// A widget that renders nothing and records what it was asked to draw.
///
/// Clones share state, so a caller can keep a handle after giving the
/// widget to a client.
#[derive(Debug, Clone, Default)]
pub struct HeadlessWidget {
    inner: Arc<Mutex<HeadlessState>>,
}

#[derive(Debug, Default)]
struct HeadlessState {
    mount_element: Option<String>,
    bounds: Option<LatLngBounds>,
    tiles: Option<TileSourceConfig>,
    icons: Vec<Icon>,
    layers: HashMap<String, Vec<RenderedMarker>>,
    redraws: usize,
}

impl HeadlessWidget {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<std::sync::MutexGuard<'_, HeadlessState>> {
        self.inner
            .lock()
            .map_err(|e| MapError::Widget(e.to_string()))
    }

    /// Simulates the user panning or zooming to `bounds`
    pub fn move_to(&self, bounds: LatLngBounds) -> Result<()> {
        self.state()?.bounds = Some(bounds);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.state().map(|s| s.tiles.is_some()).unwrap_or(false)
    }

    /// Element the widget was mounted into
    pub fn mount_element(&self) -> Option<String> {
        self.state().ok().and_then(|s| s.mount_element.clone())
    }

    pub fn tiles(&self) -> Option<TileSourceConfig> {
        self.state().ok().and_then(|s| s.tiles.clone())
    }

    pub fn icons(&self) -> Vec<Icon> {
        self.state().map(|s| s.icons.clone()).unwrap_or_default()
    }

    pub fn rendered(&self, layer_id: &str) -> Vec<RenderedMarker> {
        self.state()
            .ok()
            .and_then(|s| s.layers.get(layer_id).cloned())
            .unwrap_or_default()
    }

    /// Number of layer redraws requested so far
    pub fn redraws(&self) -> usize {
        self.state().map(|s| s.redraws).unwrap_or(0)
    }
}

impl MapWidget for HeadlessWidget {
    fn initialize(
        &mut self,
        element_id: &str,
        viewport: &Viewport,
        tiles: &TileSourceConfig,
    ) -> Result<()> {
        let mut state = self.state()?;
        state.mount_element = Some(element_id.to_string());
        state.bounds = Some(viewport.bounds());
        state.tiles = Some(tiles.clone());
        Ok(())
    }

    fn bounds(&self) -> Result<LatLngBounds> {
        self.state()?
            .bounds
            .ok_or_else(|| MapError::Widget("widget has not been initialized".to_string()))
    }

    fn register_icon(&mut self, icon: &Icon) -> Result<()> {
        let mut state = self.state()?;
        if !state.icons.contains(icon) {
            state.icons.push(icon.clone());
        }
        Ok(())
    }

    fn show_layer(&mut self, layer: &MarkerLayer) -> Result<()> {
        let rendered = if layer.is_visible() {
            layer
                .markers()
                .iter()
                .map(|m| RenderedMarker {
                    id: m.id().to_string(),
                    position: m.position(),
                    icon: m.icon().name.clone(),
                    popup: m.popup_text().map(str::to_string),
                })
                .collect()
        } else {
            Vec::new()
        };

        let mut state = self.state()?;
        state.layers.insert(layer.id().to_string(), rendered);
        state.redraws += 1;
        Ok(())
    }
}
