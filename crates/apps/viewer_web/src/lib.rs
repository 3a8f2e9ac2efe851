use std::cell::RefCell;

use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use foundation::{Opacity, Time};
use layers::{Mode, SourceCatalog, Year};
use runtime::event_bus::Event;
use viewer::{
    Basemap, BackendError, LayerSlot, MapBackend, NoiseMapController, SourceDescriptor,
    ViewerConfig,
};

/// Map surface provided by the hosting page: a thin shim over its mapping
/// SDK. The shim resolves the abstract slot names against the base style
/// (the noise slot sits below the first label layer, the basemap slot one
/// layer below that).
#[wasm_bindgen]
extern "C" {
    pub type MapSurface;

    #[wasm_bindgen(method, catch, js_name = attachRaster)]
    fn attach_raster(
        this: &MapSurface,
        id: &str,
        tileset: &str,
        tile_size: u32,
        fade_ms: u32,
        slot: &str,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = setRasterOpacity)]
    fn set_raster_opacity(this: &MapSurface, id: &str, opacity: f64) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = detachRaster)]
    fn detach_raster(this: &MapSurface, id: &str) -> Result<(), JsValue>;
}

struct JsMapBackend {
    surface: MapSurface,
}

fn backend_err(err: JsValue) -> BackendError {
    BackendError::Rejected(format!("{err:?}"))
}

impl MapBackend for JsMapBackend {
    fn attach_layer(
        &mut self,
        id: &str,
        source: &SourceDescriptor,
        slot: LayerSlot,
    ) -> Result<(), BackendError> {
        let slot = match slot {
            LayerSlot::NoiseOverlay => "noise",
            LayerSlot::BasemapOverlay => "basemap",
        };
        self.surface
            .attach_raster(
                id,
                source.tileset.as_str(),
                source.tile_size,
                source.fade_ms,
                slot,
            )
            .map_err(backend_err)
    }

    fn set_opacity(&mut self, id: &str, opacity: Opacity) -> Result<(), BackendError> {
        self.surface
            .set_raster_opacity(id, opacity.value())
            .map_err(backend_err)
    }

    fn detach_layer(&mut self, id: &str) -> Result<(), BackendError> {
        self.surface.detach_raster(id).map_err(backend_err)
    }
}

thread_local! {
    static STATE: RefCell<Option<NoiseMapController<JsMapBackend>>> = const { RefCell::new(None) };
}

/// UI-facing snapshot of the controller state.
#[derive(Debug, Serialize)]
struct ViewerStatus {
    mode: Option<&'static str>,
    year: &'static str,
    basemap: &'static str,
    visible_layers: Vec<String>,
}

fn now() -> Time {
    #[cfg(target_arch = "wasm32")]
    {
        Time(js_sys::Date::now() / 1000.0)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Time(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs_f64())
                .unwrap_or(0.0),
        )
    }
}

fn log_events(events: Vec<Event>) {
    for event in events {
        web_sys::console::log_1(&JsValue::from_str(&format!(
            "[{}] {}",
            event.kind, event.message
        )));
    }
}

fn with_controller<R>(
    f: impl FnOnce(&mut NoiseMapController<JsMapBackend>) -> R,
) -> Result<R, JsValue> {
    STATE.with(|cell| {
        let mut guard = cell.borrow_mut();
        let controller = guard
            .as_mut()
            .ok_or_else(|| JsValue::from_str("viewer not initialized"))?;
        let out = f(controller);
        log_events(controller.drain_events());
        Ok(out)
    })
}

fn surface_result(result: Result<(), viewer::ControllerError>) -> Result<(), JsValue> {
    result.map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Creates the controller. `config_json` overrides production defaults.
#[wasm_bindgen]
pub fn init(surface: MapSurface, config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json {
        Some(json) => {
            ViewerConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?
        }
        None => ViewerConfig::default(),
    };
    let controller = NoiseMapController::new(
        JsMapBackend { surface },
        SourceCatalog::builtin(),
        config,
    );
    STATE.with(|cell| *cell.borrow_mut() = Some(controller));
    Ok(())
}

/// Applies the configured boot view. Call once the map style has loaded.
#[wasm_bindgen]
pub fn boot() -> Result<(), JsValue> {
    with_controller(|c| surface_result(c.start(now())))?
}

#[wasm_bindgen]
pub fn toggle_mode(slug: &str) -> Result<(), JsValue> {
    let mode = Mode::from_slug(slug)
        .ok_or_else(|| JsValue::from_str(&format!("unknown mode: {slug}")))?;
    with_controller(|c| surface_result(c.toggle_mode(mode, now())))?
}

#[wasm_bindgen]
pub fn select_year(label: &str) -> Result<(), JsValue> {
    let year = Year::from_label(label)
        .ok_or_else(|| JsValue::from_str(&format!("unknown year: {label}")))?;
    with_controller(|c| surface_result(c.select_year(year, now())))?
}

#[wasm_bindgen]
pub fn set_basemap(name: &str) -> Result<(), JsValue> {
    let basemap = Basemap::from_name(name)
        .ok_or_else(|| JsValue::from_str(&format!("unknown basemap: {name}")))?;
    with_controller(|c| surface_result(c.set_basemap(basemap, now())))?
}

/// Runs due detach tasks. The page calls this from its timer loop.
#[wasm_bindgen]
pub fn tick() -> Result<(), JsValue> {
    with_controller(|c| surface_result(c.tick(now())))?
}

/// Milliseconds until the next pending detach, if any; the page can use
/// this to schedule the next `tick` instead of polling.
#[wasm_bindgen]
pub fn next_detach_in_ms() -> Result<Option<f64>, JsValue> {
    with_controller(|c| {
        c.next_detach_due()
            .map(|due| (due.as_ms() - now().as_ms()).max(0.0))
    })
}

/// Camera bootstrap block for the page's map constructor, as JSON.
#[wasm_bindgen]
pub fn camera_config() -> Result<String, JsValue> {
    with_controller(|c| {
        serde_json::to_string(&c.config().camera).map_err(|e| JsValue::from_str(&e.to_string()))
    })?
}

/// Current selection and visible layers, as JSON, for UI sync.
#[wasm_bindgen]
pub fn status() -> Result<String, JsValue> {
    with_controller(|c| {
        let status = ViewerStatus {
            mode: c.selection().active_mode().map(Mode::slug),
            year: c.selection().year().label(),
            basemap: c.basemap().name(),
            visible_layers: c.visible_ids(),
        };
        serde_json::to_string(&status).map_err(|e| JsValue::from_str(&e.to_string()))
    })?
}

/// Replaces the source catalog with one fetched from `url` (a flat
/// `{"layer_id": "tileset"}` JSON object).
#[wasm_bindgen]
pub fn load_catalog(url: String) {
    spawn_local(async move {
        let catalog = match fetch_catalog(&url).await {
            Ok(c) => c,
            Err(err) => {
                web_sys::console::log_1(&JsValue::from_str(&format!(
                    "failed to fetch source catalog: {err:?}"
                )));
                return;
            }
        };
        let _ = with_controller(|c| c.set_catalog(catalog));
    });
}

async fn fetch_catalog(url: &str) -> Result<SourceCatalog, JsValue> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let text = resp
        .text()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    SourceCatalog::from_json(&text).map_err(|e| JsValue::from_str(&e.to_string()))
}
