use crate::core::geo::LatLng;
use crate::data::category::Icon;
use crate::data::record::Record;
use serde::{Deserialize, Serialize};

/// What activating a marker should show, expressed as data rather than a
/// captured callback: the owning category and the marker's slot in that
/// category's layer, plus the record id when the API supplied one.
///
/// Bindings handed out with markers also carry the refresh generation that
/// built them, so a binding from an earlier refresh cannot land on whatever
/// record now occupies its slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerBinding {
    pub category: String,
    pub index: usize,
    pub record_id: Option<String>,
    #[serde(default)]
    pub generation: Option<u64>,
}

impl MarkerBinding {
    pub fn new(category: impl Into<String>, index: usize, record_id: Option<String>) -> Self {
        Self {
            category: category.into(),
            index,
            record_id,
            generation: None,
        }
    }

    /// Pins the binding to the refresh generation that issued it
    pub fn issued_at(mut self, generation: u64) -> Self {
        self.generation = Some(generation);
        self
    }
}

/// A map marker bound to exactly one record for its whole lifetime.
///
/// Markers are never mutated after construction; a refresh builds new ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    id: String,
    position: LatLng,
    icon: Icon,
    popup_text: Option<String>,
    binding: MarkerBinding,
    record: Record,
}

impl Marker {
    pub fn new(position: LatLng, icon: Icon, binding: MarkerBinding, record: Record) -> Self {
        let id = match &binding.record_id {
            Some(record_id) => format!("{}:{}", binding.category, record_id),
            None => format!("{}#{}", binding.category, binding.index),
        };
        Self {
            id,
            position,
            icon,
            popup_text: None,
            binding,
            record,
        }
    }

    pub fn with_popup(mut self, text: Option<String>) -> Self {
        self.popup_text = text;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn icon(&self) -> &Icon {
        &self.icon
    }

    pub fn popup_text(&self) -> Option<&str> {
        self.popup_text.as_deref()
    }

    pub fn binding(&self) -> &MarkerBinding {
        &self.binding
    }

    pub fn record(&self) -> &Record {
        &self.record
    }
}
