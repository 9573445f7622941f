use crate::data::category::Category;
use crate::layers::base::LayerTrait;
use crate::layers::marker_layer::MarkerLayer;
use crate::prelude::HashMap;

/// Owns one marker layer per category, keyed by category id
pub struct LayerManager {
    /// All layers indexed by category ID
    layers: HashMap<String, MarkerLayer>,
    /// Layer IDs in the order they were added
    render_order: Vec<String>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self {
            layers: HashMap::default(),
            render_order: Vec::new(),
        }
    }

    /// Creates an empty layer for each category
    pub fn for_categories(categories: &[Category]) -> Self {
        let mut manager = Self::new();
        for category in categories {
            manager.add_layer(MarkerLayer::new(category.id.clone(), category.label.clone()));
        }
        manager
    }

    /// Adds a layer. A layer with an existing id replaces the old one in place.
    pub fn add_layer(&mut self, layer: MarkerLayer) {
        let layer_id = layer.id().to_string();
        if self.layers.insert(layer_id.clone(), layer).is_none() {
            self.render_order.push(layer_id);
        }
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&MarkerLayer> {
        self.layers.get(layer_id)
    }

    /// Applies a function to a specific layer mutably
    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut MarkerLayer) -> R,
    {
        self.layers.get_mut(layer_id).map(f)
    }

    /// Applies a function to each layer immutably in render order.
    pub fn for_each_layer<F>(&self, mut f: F)
    where
        F: FnMut(&dyn LayerTrait),
    {
        for id in &self.render_order {
            if let Some(layer) = self.layers.get(id) {
                f(layer);
            }
        }
    }

    /// Total markers across all layers
    pub fn marker_count(&self) -> usize {
        self.layers.values().map(|l| l.len()).sum()
    }
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(manager: &LayerManager) -> Vec<String> {
        let mut ids = Vec::new();
        manager.for_each_layer(|layer| ids.push(layer.id().to_string()));
        ids
    }

    #[test]
    fn test_layers_follow_category_order() {
        let manager = LayerManager::for_categories(&Category::builtin());
        assert_eq!(
            ids(&manager),
            vec!["mosquito-source", "service-request", "trap-data"]
        );
        assert_eq!(manager.marker_count(), 0);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut manager = LayerManager::for_categories(&Category::builtin());
        manager.add_layer(MarkerLayer::new("mosquito-source".into(), "Sources again".into()));
        assert_eq!(
            ids(&manager),
            vec!["mosquito-source", "service-request", "trap-data"]
        );
        assert_eq!(
            manager.get_layer("mosquito-source").unwrap().name(),
            "Sources again"
        );

        let mut names = Vec::new();
        manager.for_each_layer(|layer| names.push(layer.name().to_string()));
        assert_eq!(names[0], "Sources again");
    }

    #[test]
    fn test_with_layer_mut_unknown_id() {
        let mut manager = LayerManager::for_categories(&Category::builtin());
        assert!(manager.with_layer_mut("nope", |l| l.set_visible(false)).is_none());
        assert_eq!(manager.with_layer_mut("trap-data", |l| l.len()), Some(0));
    }
}
