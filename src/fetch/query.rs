use crate::core::viewport::Viewport;
use serde::Serialize;

/// Bounding-box query sent to every category endpoint.
///
/// All categories use the same `west`, `north`, `east`, `south` parameters
/// carrying the viewport's own values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundsQuery {
    pub west: f64,
    pub north: f64,
    pub east: f64,
    pub south: f64,
}

impl BoundsQuery {
    pub fn pairs(&self) -> [(&'static str, String); 4] {
        [
            ("west", self.west.to_string()),
            ("north", self.north.to_string()),
            ("east", self.east.to_string()),
            ("south", self.south.to_string()),
        ]
    }

    pub fn to_query_string(&self) -> String {
        self.pairs()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl From<&Viewport> for BoundsQuery {
    fn from(viewport: &Viewport) -> Self {
        Self {
            west: viewport.west,
            north: viewport.north,
            east: viewport.east,
            south: viewport.south,
        }
    }
}
