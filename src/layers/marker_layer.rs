use crate::core::geo::LatLngBounds;
use crate::layers::base::{LayerProperties, LayerTrait};
use crate::layers::marker::{Marker, MarkerBinding};

/// All markers currently displayed for one category.
///
/// After a refresh completes the layer holds exactly one marker per record
/// of the most recent successful fetch, and nothing else.
pub struct MarkerLayer {
    properties: LayerProperties,
    markers: Vec<Marker>,
    /// Generation of the refresh that last populated the layer (0 = never)
    generation: u64,
}

impl MarkerLayer {
    pub fn new(id: String, name: String) -> Self {
        Self {
            properties: LayerProperties::new(id, name),
            markers: Vec::new(),
            generation: 0,
        }
    }

    /// Clears the layer and repopulates it from one refresh's markers
    pub fn replace(&mut self, generation: u64, markers: impl IntoIterator<Item = Marker>) {
        self.markers.clear();
        self.markers.extend(markers);
        self.generation = generation;
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Resolves an activation binding to the marker it was issued for.
    ///
    /// A binding pinned to a generation only resolves while the layer still
    /// holds that refresh's markers, and one carrying a record id only while
    /// the slot still holds that record. A bare binding resolves by slot.
    pub fn find(&self, binding: &MarkerBinding) -> Option<&Marker> {
        if binding.generation.is_some_and(|g| g != self.generation) {
            return None;
        }
        self.markers.get(binding.index).filter(|m| {
            let own = m.binding();
            own.category == binding.category
                && (binding.record_id.is_none() || own.record_id == binding.record_id)
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl LayerTrait for MarkerLayer {
    crate::impl_layer_trait!(MarkerLayer, properties);

    fn len(&self) -> usize {
        self.markers.len()
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        let first = self.markers.first()?.position();
        let mut bounds = LatLngBounds::new(first, first);
        for marker in &self.markers[1..] {
            let p = marker.position();
            bounds.south_west.lat = bounds.south_west.lat.min(p.lat);
            bounds.south_west.lng = bounds.south_west.lng.min(p.lng);
            bounds.north_east.lat = bounds.north_east.lat.max(p.lat);
            bounds.north_east.lng = bounds.north_east.lng.max(p.lng);
        }
        Some(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use crate::data::category::Icon;
    use crate::data::record::Record;
    use serde_json::json;

    fn marker(index: usize, lat: f64, lng: f64) -> Marker {
        issued(1, index, lat, lng)
    }

    fn issued(generation: u64, index: usize, lat: f64, lng: f64) -> Marker {
        Marker::new(
            LatLng::new(lat, lng),
            Icon::new("trap-data", "/trap.png"),
            MarkerBinding::new("trap-data", index, None).issued_at(generation),
            Record::from_value(json!({ "lat": lat, "long": lng })).unwrap(),
        )
    }

    #[test]
    fn test_replace_discards_previous_markers() {
        let mut layer = MarkerLayer::new("trap-data".into(), "Traps".into());
        layer.replace(1, vec![marker(0, 36.0, -118.0), marker(1, 36.1, -118.1)]);
        assert_eq!(layer.len(), 2);
        assert_eq!(layer.generation(), 1);

        layer.replace(2, vec![marker(0, 36.2, -118.2)]);
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.generation(), 2);
        assert_eq!(layer.markers()[0].position(), LatLng::new(36.2, -118.2));
    }

    #[test]
    fn test_find_rejects_stale_binding() {
        let mut layer = MarkerLayer::new("trap-data".into(), "Traps".into());
        layer.replace(1, vec![marker(0, 36.0, -118.0)]);
        let binding = layer.markers()[0].binding().clone();
        assert!(layer.find(&binding).is_some());

        let other = MarkerBinding::new("service-request", 0, None);
        assert!(layer.find(&other).is_none());

        let by_slot = MarkerBinding::new("trap-data", 0, None);
        assert!(layer.find(&by_slot).is_some());

        layer.replace(2, Vec::new());
        assert!(layer.find(&binding).is_none());
        assert!(layer.is_empty());
    }

    #[test]
    fn test_find_rejects_binding_from_earlier_refresh() {
        let mut layer = MarkerLayer::new("trap-data".into(), "Traps".into());
        layer.replace(1, vec![issued(1, 0, 36.0, -118.0)]);
        let old = layer.markers()[0].binding().clone();
        assert_eq!(old.record_id, None);
        assert_eq!(old.generation, Some(1));

        layer.replace(2, vec![issued(2, 0, 36.3, -118.3)]);
        assert!(layer.find(&old).is_none());

        let current = layer.markers()[0].binding().clone();
        assert_eq!(
            layer.find(&current).map(|m| m.position()),
            Some(LatLng::new(36.3, -118.3))
        );
    }

    #[test]
    fn test_bounds_cover_markers() {
        let mut layer = MarkerLayer::new("trap-data".into(), "Traps".into());
        assert!(layer.bounds().is_none());
        layer.replace(1, vec![marker(0, 36.0, -118.0), marker(1, 36.4, -118.3)]);
        let bounds = layer.bounds().unwrap();
        assert_eq!(bounds, LatLngBounds::from_coords(36.0, -118.3, 36.4, -118.0));
    }
}
