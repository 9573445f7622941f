//! Engine-wide defaults: the fallback viewport, API prefix and marker icon
//! geometry. Keeping them in a single place makes them easy to tweak.

/// Fallback viewport used whenever the URL fragment is missing or malformed.
/// Centered on 36.111, -118.0, roughly the area visible at zoom 13.
pub const DEFAULT_NORTH: f64 = 36.1355;
pub const DEFAULT_SOUTH: f64 = 36.0865;
pub const DEFAULT_EAST: f64 = -117.9571;
pub const DEFAULT_WEST: f64 = -118.0429;

/// Path prefix of the record API; categories append their own segment.
pub const API_PREFIX: &str = "/api";

/// Suffix appended to a category id to find its count element.
pub const COUNT_ELEMENT_SUFFIX: &str = "-count";

/// Default mount point identifiers in the host document.
pub const MAP_ELEMENT_ID: &str = "map";
pub const DETAIL_ELEMENT_ID: &str = "detail";

/// Default tile server and attribution handed to the widget.
pub const DEFAULT_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"http://www.openstreetmap.org/copyright\">OpenStreetMap</a>";
pub const DEFAULT_MAX_ZOOM: u8 = 19;

/// Marker icon default size (regular PNG).
pub const MARKER_ICON_SIZE: (u32, u32) = (25, 41);

/// Anchor inside the icon (hot-spot) in pixel coords.
pub const MARKER_ICON_ANCHOR: (u32, u32) = (12, 41);

/// Number of intervals on the audio ruler (one more tick than this).
pub const DEFAULT_RULER_INTERVALS: u32 = 10;
