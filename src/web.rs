//! Browser bindings.
//!
//! The page supplies the mapping widget as a `fieldmapHost` object with
//! `initialize`, `bounds`, `registerIcon` and `showLayer` functions, and
//! forwards its move-end and marker-click events to [`WasmClient`].
//! Browser handles are looked up on every call, so the types here hold no
//! JS objects.

use crate::audio::ruler::RulerScale;
use crate::core::client::MapClient;
use crate::core::config::{ClientConfig, TileSourceConfig};
use crate::core::geo::LatLngBounds;
use crate::core::location::LocationStore;
use crate::core::viewport::Viewport;
use crate::data::category::Icon;
use crate::fetch::source::HttpRecordSource;
use crate::layers::base::LayerTrait;
use crate::layers::marker::MarkerBinding;
use crate::layers::marker_layer::MarkerLayer;
use crate::prelude::Arc;
use crate::ui::document::HostDocument;
use crate::ui::widget::MapWidget;
use crate::{MapError, Result};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = fieldmapHost, js_name = initialize)]
    fn host_initialize(
        element_id: &str,
        north: f64,
        south: f64,
        east: f64,
        west: f64,
        tile_url: &str,
        max_zoom: u8,
        attribution: &str,
    ) -> std::result::Result<(), JsValue>;

    /// `[south, west, north, east]`
    #[wasm_bindgen(catch, js_namespace = fieldmapHost, js_name = bounds)]
    fn host_bounds() -> std::result::Result<Box<[f64]>, JsValue>;

    #[wasm_bindgen(catch, js_namespace = fieldmapHost, js_name = registerIcon)]
    fn host_register_icon(
        name: &str,
        url: &str,
        width: u32,
        height: u32,
        anchor_x: u32,
        anchor_y: u32,
    ) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = fieldmapHost, js_name = showLayer)]
    fn host_show_layer(layer_id: &str, markers_json: &str) -> std::result::Result<(), JsValue>;
}

fn js_error(context: &str, err: JsValue) -> String {
    format!("{context}: {}", err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

fn window() -> Result<web_sys::Window> {
    web_sys::window().ok_or_else(|| MapError::Location("no window".to_string()))
}

/// URL fragment of the current page.
///
/// Writes go through `history.replaceState`, so they neither navigate nor add
/// history entries.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserLocation;

impl LocationStore for BrowserLocation {
    fn fragment(&self) -> Result<String> {
        window()?
            .location()
            .hash()
            .map_err(|e| MapError::Location(js_error("reading location.hash", e)))
    }

    fn replace_fragment(&self, fragment: &str) -> Result<()> {
        let url = format!("#{}", fragment.trim_start_matches('#'));
        window()?
            .history()
            .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(&url)))
            .map_err(|e| MapError::Location(js_error("history.replaceState", e)))
    }
}

/// Mount points in the live DOM
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserDocument;

impl BrowserDocument {
    fn element(&self, element_id: &str) -> Result<web_sys::Element> {
        window()?
            .document()
            .and_then(|doc| doc.get_element_by_id(element_id))
            .ok_or_else(|| MapError::Widget(format!("no element #{element_id}")))
    }
}

impl HostDocument for BrowserDocument {
    fn set_text(&self, element_id: &str, text: &str) -> Result<()> {
        self.element(element_id)?.set_text_content(Some(text));
        Ok(())
    }

    fn set_html(&self, element_id: &str, html: &str) -> Result<()> {
        self.element(element_id)?.set_inner_html(html);
        Ok(())
    }
}

/// The page's mapping widget, reached through `fieldmapHost`
#[derive(Debug, Default, Clone, Copy)]
pub struct HostWidget;

impl MapWidget for HostWidget {
    fn initialize(
        &mut self,
        element_id: &str,
        viewport: &Viewport,
        tiles: &TileSourceConfig,
    ) -> Result<()> {
        host_initialize(
            element_id,
            viewport.north,
            viewport.south,
            viewport.east,
            viewport.west,
            &tiles.url_template,
            tiles.max_zoom,
            &tiles.attribution,
        )
        .map_err(|e| MapError::Widget(js_error("initialize", e)))
    }

    fn bounds(&self) -> Result<LatLngBounds> {
        let raw = host_bounds().map_err(|e| MapError::Widget(js_error("bounds", e)))?;
        match *raw {
            [south, west, north, east] => Ok(LatLngBounds::from_coords(south, west, north, east)),
            _ => Err(MapError::Widget(format!(
                "bounds returned {} values, expected 4",
                raw.len()
            ))),
        }
    }

    fn register_icon(&mut self, icon: &Icon) -> Result<()> {
        let (width, height) = icon.size;
        let (anchor_x, anchor_y) = icon.anchor;
        host_register_icon(&icon.name, &icon.url, width, height, anchor_x, anchor_y)
            .map_err(|e| MapError::Widget(js_error("registerIcon", e)))
    }

    fn show_layer(&mut self, layer: &MarkerLayer) -> Result<()> {
        let markers: Vec<serde_json::Value> = if layer.is_visible() {
            layer
                .markers()
                .iter()
                .map(|m| {
                    serde_json::json!({
                        "id": m.id(),
                        "lat": m.position().lat,
                        "lng": m.position().lng,
                        "icon": m.icon().name,
                        "popup": m.popup_text(),
                        "category": m.binding().category,
                        "index": m.binding().index,
                        "recordId": m.binding().record_id,
                        "generation": m.binding().generation,
                    })
                })
                .collect()
        } else {
            Vec::new()
        };

        let json = serde_json::to_string(&markers)?;
        host_show_layer(layer.id(), &json).map_err(|e| MapError::Widget(js_error("showLayer", e)))
    }
}

fn to_js(err: MapError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Forwards `log` records to the browser console
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&line),
            log::Level::Warn => web_sys::console::warn_1(&line),
            log::Level::Info => web_sys::console::info_1(&line),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Another logger may already be installed by the embedding page's bundle.
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Debug);
    }
    log::debug!("fieldmap wasm module loaded");
}

/// Client handle exported to the page
#[wasm_bindgen]
pub struct WasmClient {
    client: MapClient,
}

#[wasm_bindgen]
impl WasmClient {
    /// `config_json` is an optional serialized client configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> std::result::Result<WasmClient, JsValue> {
        let mut config = match config_json {
            Some(json) => ClientConfig::from_json_str(&json).map_err(to_js)?,
            None => ClientConfig::default(),
        };
        if config.api_base_url.is_empty() {
            config.api_base_url = window()
                .and_then(|w| {
                    w.location()
                        .origin()
                        .map_err(|e| MapError::Location(js_error("location.origin", e)))
                })
                .map_err(to_js)?;
        }

        let source = Arc::new(HttpRecordSource::from_config(&config).map_err(to_js)?);
        let client = MapClient::new(
            config,
            source,
            Box::new(HostWidget),
            Box::new(BrowserLocation),
            Arc::new(BrowserDocument),
        )
        .map_err(to_js)?;

        Ok(Self { client })
    }

    /// Mounts the widget and starts the first refresh
    pub fn load(&mut self) -> std::result::Result<(), JsValue> {
        let viewport = self.client.mount().map_err(to_js)?;
        self.spawn_refresh(viewport);
        Ok(())
    }

    /// Call from the widget's move-end event
    #[wasm_bindgen(js_name = viewportChanged)]
    pub fn viewport_changed(&mut self) -> std::result::Result<(), JsValue> {
        let viewport = self.client.record_viewport_change().map_err(to_js)?;
        self.spawn_refresh(viewport);
        Ok(())
    }

    /// Call from a marker click with the binding fields passed to `showLayer`
    pub fn activate(
        &self,
        category: &str,
        index: usize,
        record_id: Option<String>,
        generation: Option<f64>,
    ) -> std::result::Result<(), JsValue> {
        let mut binding = MarkerBinding::new(category, index, record_id);
        if let Some(generation) = generation {
            binding = binding.issued_at(generation as u64);
        }
        self.client.activate(&binding).map(|_| ()).map_err(to_js)
    }

    /// `"idle"` or `"refreshing"`
    pub fn state(&self) -> String {
        format!("{:?}", self.client.state()).to_lowercase()
    }
}

impl WasmClient {
    fn spawn_refresh(&self, viewport: Viewport) {
        let synchronizer = self.client.synchronizer().clone();
        wasm_bindgen_futures::spawn_local(async move {
            let report = synchronizer.refresh_all(&viewport).await;
            for outcome in report.failed() {
                if let Err(e) = &outcome.result {
                    log::warn!("{} not refreshed: {}", outcome.category, e);
                }
            }
        });
    }
}

/// Time ruler for the page's audio player
#[wasm_bindgen]
pub struct WasmRuler {
    scale: RulerScale,
}

#[wasm_bindgen]
impl WasmRuler {
    /// `intervals` defaults to the standard tick count when omitted
    #[wasm_bindgen(constructor)]
    pub fn new(duration_secs: f64, intervals: Option<u32>) -> WasmRuler {
        let scale = match intervals {
            Some(intervals) => RulerScale::new(duration_secs, intervals),
            None => RulerScale::with_default_intervals(duration_secs),
        };
        Self { scale }
    }

    /// Tick labels, `m:ss`
    pub fn labels(&self) -> Box<[JsValue]> {
        self.scale
            .ticks()
            .into_iter()
            .map(|t| JsValue::from_str(&t.label))
            .collect()
    }

    /// Tick positions as fractions of the ruler width
    pub fn offsets(&self) -> Box<[f64]> {
        self.scale
            .ticks()
            .iter()
            .map(|t| t.offset_fraction)
            .collect()
    }

    /// Tick times in seconds
    pub fn times(&self) -> Box<[f64]> {
        self.scale.ticks().iter().map(|t| t.time).collect()
    }

    /// Playback position for a click `click_x` pixels into a ruler
    /// `width` pixels wide, or `undefined` while the duration is unknown
    #[wasm_bindgen(js_name = seekTime)]
    pub fn seek_time(&self, click_x: f64, width: f64) -> Option<f64> {
        self.scale.seek_time(click_x, width)
    }
}
