//! The explicitly constructed state shared by the synchronizer and the client:
//! the widget handle, the per-category layers, the icon registry and the host
//! document. Nothing here is process-global.

use crate::data::category::{Category, Icon};
use crate::layers::manager::LayerManager;
use crate::prelude::{Arc, HashMap, Mutex};
use crate::ui::document::HostDocument;
use crate::ui::widget::MapWidget;
use crate::{MapError, Result};
use std::sync::MutexGuard;

pub struct ClientContext {
    widget: Mutex<Box<dyn MapWidget>>,
    layers: Mutex<LayerManager>,
    icons: HashMap<String, Icon>,
    document: Arc<dyn HostDocument>,
}

impl ClientContext {
    pub fn new(
        widget: Box<dyn MapWidget>,
        document: Arc<dyn HostDocument>,
        categories: &[Category],
    ) -> Self {
        let icons = categories
            .iter()
            .map(|c| (c.id.clone(), c.icon.clone()))
            .collect();
        Self {
            widget: Mutex::new(widget),
            layers: Mutex::new(LayerManager::for_categories(categories)),
            icons,
            document,
        }
    }

    pub fn widget(&self) -> Result<MutexGuard<'_, Box<dyn MapWidget>>> {
        self.widget
            .lock()
            .map_err(|e| MapError::Widget(format!("widget lock poisoned: {e}")))
    }

    pub fn layers(&self) -> Result<MutexGuard<'_, LayerManager>> {
        self.layers
            .lock()
            .map_err(|e| MapError::Widget(format!("layer lock poisoned: {e}")))
    }

    pub fn icon(&self, category_id: &str) -> Option<&Icon> {
        self.icons.get(category_id)
    }

    pub fn icons(&self) -> impl Iterator<Item = &Icon> {
        self.icons.values()
    }

    pub fn document(&self) -> &Arc<dyn HostDocument> {
        &self.document
    }
}
