//! Record categories
//!
//! A category ties together everything that differs between kinds of
//! records: the API path segment, the marker icon, where the coordinates
//! live inside a record, and the detail template. The three built-in
//! categories are plain values; any other fixed list can be built the same
//! way.

use crate::constants::{API_PREFIX, COUNT_ELEMENT_SUFFIX, MARKER_ICON_ANCHOR, MARKER_ICON_SIZE};
use crate::core::geo::LatLng;
use crate::data::record::Record;
use crate::data::template::{DetailTemplate, FieldSpec};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

pub const MOSQUITO_SOURCE: &str = "mosquito-source";
pub const SERVICE_REQUEST: &str = "service-request";
pub const TRAP_DATA: &str = "trap-data";

/// Where a record keeps its latitude and longitude
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CoordinatePath {
    /// Top-level fields, e.g. `lat` / `long`
    Flat { lat: String, lng: String },
    /// Fields of a nested object, e.g. `location.latitude`
    Nested {
        object: String,
        lat: String,
        lng: String,
    },
}

impl CoordinatePath {
    pub fn flat(lat: impl Into<String>, lng: impl Into<String>) -> Self {
        Self::Flat {
            lat: lat.into(),
            lng: lng.into(),
        }
    }

    pub fn nested(object: impl Into<String>, lat: impl Into<String>, lng: impl Into<String>) -> Self {
        Self::Nested {
            object: object.into(),
            lat: lat.into(),
            lng: lng.into(),
        }
    }

    fn paths(&self) -> (String, String) {
        match self {
            Self::Flat { lat, lng } => (lat.clone(), lng.clone()),
            Self::Nested { object, lat, lng } => {
                (format!("{object}.{lat}"), format!("{object}.{lng}"))
            }
        }
    }

    /// Derives the record's position
    pub fn resolve(&self, record: &Record) -> Result<LatLng> {
        let (lat_path, lng_path) = self.paths();
        let lat = record
            .number(&lat_path)
            .ok_or_else(|| MapError::InvalidCoordinates(format!("missing or non-numeric {lat_path}")))?;
        let lng = record
            .number(&lng_path)
            .ok_or_else(|| MapError::InvalidCoordinates(format!("missing or non-numeric {lng_path}")))?;

        let position = LatLng::new(lat, lng);
        if !position.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "{lat_path}={lat}, {lng_path}={lng} out of range"
            )));
        }
        Ok(position)
    }
}

/// Marker icon registered with the widget for a category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Icon {
    pub name: String,
    pub url: String,
    /// Pixel size of the image
    #[serde(default = "default_icon_size")]
    pub size: (u32, u32),
    /// Pixel inside the image placed on the marker position
    #[serde(default = "default_icon_anchor")]
    pub anchor: (u32, u32),
}

fn default_icon_size() -> (u32, u32) {
    MARKER_ICON_SIZE
}

fn default_icon_anchor() -> (u32, u32) {
    MARKER_ICON_ANCHOR
}

impl Icon {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            size: MARKER_ICON_SIZE,
            anchor: MARKER_ICON_ANCHOR,
        }
    }

    pub fn with_size(mut self, size: (u32, u32), anchor: (u32, u32)) -> Self {
        self.size = size;
        self.anchor = anchor;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier, also the API path segment
    pub id: String,
    pub label: String,
    pub icon: Icon,
    pub location: CoordinatePath,
    pub template: DetailTemplate,
    /// Field shown as the marker's popup text
    pub popup_field: Option<String>,
}

impl Category {
    /// Path of the category's endpoint, e.g. `/api/trap-data`
    pub fn api_path(&self) -> String {
        format!("{API_PREFIX}/{}", self.id)
    }

    /// Identifier of the element that shows this category's marker count
    pub fn count_element_id(&self) -> String {
        format!("{}{COUNT_ELEMENT_SUFFIX}", self.id)
    }

    pub fn coordinates(&self, record: &Record) -> Result<LatLng> {
        self.location.resolve(record)
    }

    pub fn popup_text(&self, record: &Record) -> Option<String> {
        self.popup_field.as_deref().and_then(|f| record.text(f))
    }

    pub fn service_request() -> Self {
        Self {
            id: SERVICE_REQUEST.to_string(),
            label: "Service requests".to_string(),
            icon: Icon::new("service-request", "/static/img/service-request.png"),
            location: CoordinatePath::flat("lat", "long"),
            template: DetailTemplate::new(
                "Service request",
                vec![
                    FieldSpec::text("Address", "address"),
                    FieldSpec::text("City", "city"),
                    FieldSpec::text("Zip", "zip"),
                    FieldSpec::text("Priority", "priority"),
                    FieldSpec::text("Source", "source"),
                    FieldSpec::text("Status", "status"),
                    FieldSpec::text("Target", "target"),
                ],
            ),
            popup_field: Some("target".to_string()),
        }
    }

    pub fn trap_data() -> Self {
        Self {
            id: TRAP_DATA.to_string(),
            label: "Traps".to_string(),
            icon: Icon::new("trap-data", "/static/img/trap.png"),
            location: CoordinatePath::flat("lat", "long"),
            template: DetailTemplate::new("Trap", vec![FieldSpec::text("Name", "name")]),
            popup_field: Some("name".to_string()),
        }
    }

    pub fn mosquito_source() -> Self {
        Self {
            id: MOSQUITO_SOURCE.to_string(),
            label: "Mosquito sources".to_string(),
            icon: Icon::new("mosquito-source", "/static/img/mosquito-source.png"),
            location: CoordinatePath::nested("location", "latitude", "longitude"),
            template: DetailTemplate::new(
                "Mosquito source",
                vec![
                    FieldSpec::text("Access", "access"),
                    FieldSpec::text("Comments", "comments"),
                    FieldSpec::text("Description", "description"),
                    FieldSpec::text("Habitat", "habitat"),
                    FieldSpec::text("Status", "status"),
                    FieldSpec::text("Target", "target"),
                    FieldSpec::list(
                        "Inspections",
                        "inspections",
                        vec![
                            FieldSpec::text("Date", "created"),
                            FieldSpec::text("Condition", "condition"),
                            FieldSpec::text("Comments", "comments"),
                        ],
                    ),
                ],
            ),
            popup_field: Some("target".to_string()),
        }
    }

    /// The built-in categories in display order
    pub fn builtin() -> Vec<Category> {
        vec![
            Self::mosquito_source(),
            Self::service_request(),
            Self::trap_data(),
        ]
    }

    pub fn builtin_by_id(id: &str) -> Option<Category> {
        Self::builtin().into_iter().find(|c| c.id == id)
    }
}
