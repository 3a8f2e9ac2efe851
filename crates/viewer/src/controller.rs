use std::collections::BTreeMap;

use foundation::{Opacity, Time};
use layers::{LayerKey, Mode, SourceCatalog, Year};
use runtime::delay_queue::{DelayQueue, TaskId};
use runtime::event_bus::{Event, EventBus};
use runtime::metrics::Metrics;

use crate::backend::{BackendError, LayerSlot, MapBackend, SourceDescriptor};
use crate::config::ViewerConfig;
use crate::selection::SelectionState;

/// Fixed id of the satellite basemap overlay.
pub const SATELLITE_LAYER_ID: &str = "satellite";

/// Basemap choice. Mutually exclusive by construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Basemap {
    #[default]
    Dark,
    Satellite,
}

impl Basemap {
    pub fn name(self) -> &'static str {
        match self {
            Basemap::Dark => "dark",
            Basemap::Satellite => "satellite",
        }
    }

    pub fn from_name(name: &str) -> Option<Basemap> {
        match name {
            "dark" => Some(Basemap::Dark),
            "satellite" => Some(Basemap::Satellite),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    Backend(BackendError),
}

impl std::fmt::Display for ControllerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControllerError::Backend(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ControllerError {}

impl From<BackendError> for ControllerError {
    fn from(err: BackendError) -> Self {
        ControllerError::Backend(err)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Phase {
    Visible,
    FadingOut,
}

/// Runtime record of one attached source+layer pair.
#[derive(Debug)]
struct LayerRecord {
    phase: Phase,
    /// Pending detach task while `FadingOut`; canceled on re-show.
    detach_task: Option<TaskId>,
}

/// Reconciles the set of layers attached/visible on the map with the
/// selection state, touching only the layers affected by each transition.
///
/// Hiding is two-step: opacity drops to zero immediately, and a detach
/// task due one fade window later removes the layer+source, so the
/// cross-fade never pops. The host drives `tick` to run due detaches.
pub struct NoiseMapController<B: MapBackend> {
    backend: B,
    catalog: SourceCatalog,
    config: ViewerConfig,
    selection: SelectionState,
    basemap: Basemap,
    attached: BTreeMap<String, LayerRecord>,
    satellite: Option<LayerRecord>,
    detach_queue: DelayQueue<String>,
    events: EventBus,
    metrics: Metrics,
}

impl<B: MapBackend> NoiseMapController<B> {
    pub fn new(backend: B, catalog: SourceCatalog, config: ViewerConfig) -> Self {
        let selection = SelectionState::new(config.startup_year);
        Self {
            backend,
            catalog,
            config,
            selection,
            basemap: Basemap::default(),
            attached: BTreeMap::new(),
            satellite: None,
            detach_queue: DelayQueue::new(),
            events: EventBus::new(),
            metrics: Metrics::new(),
        }
    }

    /// Applies the configured boot view through the normal attach path.
    pub fn start(&mut self, now: Time) -> Result<(), ControllerError> {
        if let Some(mode) = self.config.startup_mode {
            self.toggle_mode(mode, now)?;
        }
        Ok(())
    }

    /// Mode button pressed.
    pub fn toggle_mode(&mut self, mode: Mode, now: Time) -> Result<(), ControllerError> {
        let toggle = self.selection.toggle_mode(mode);
        let year = self.selection.year();

        if let Some(prev) = toggle.deactivated {
            self.events.emit(now, "mode", format!("{} off", prev.slug()));
            if let Some(key) = LayerKey::new(prev, year) {
                self.fade_out_key(key, now)?;
            }
        }
        if let Some(next) = toggle.activated {
            self.events.emit(now, "mode", format!("{} on", next.slug()));
            self.show_mode(next, year, now)?;
        }

        self.update_attached_gauge();
        Ok(())
    }

    /// Year slider moved.
    pub fn select_year(&mut self, year: Year, now: Time) -> Result<(), ControllerError> {
        let Some(switch) = self.selection.select_year(year) else {
            return Ok(());
        };
        self.events.emit(
            now,
            "year",
            format!("{} -> {}", switch.previous.label(), switch.current.label()),
        );

        if let Some(mode) = self.selection.active_mode() {
            if let Some(old_key) = LayerKey::new(mode, switch.previous) {
                self.fade_out_key(old_key, now)?;
            }
            self.show_mode(mode, switch.current, now)?;
        }

        self.update_attached_gauge();
        Ok(())
    }

    /// Basemap radio changed. Selecting the current basemap is a no-op.
    pub fn set_basemap(&mut self, basemap: Basemap, now: Time) -> Result<(), ControllerError> {
        if self.basemap == basemap {
            return Ok(());
        }
        self.basemap = basemap;
        match basemap {
            Basemap::Satellite => self.show_satellite(now)?,
            Basemap::Dark => self.hide_satellite(now)?,
        }
        self.update_attached_gauge();
        Ok(())
    }

    /// Runs detach tasks that have come due.
    ///
    /// A task whose layer was re-shown (or already detached) in the
    /// meantime is a benign no-op.
    pub fn tick(&mut self, now: Time) -> Result<(), ControllerError> {
        for id in self.detach_queue.drain_due(now) {
            if id == SATELLITE_LAYER_ID {
                if self
                    .satellite
                    .as_ref()
                    .is_some_and(|r| r.phase == Phase::FadingOut)
                {
                    self.backend.detach_layer(SATELLITE_LAYER_ID)?;
                    self.satellite = None;
                    self.metrics.inc_counter("layer.detach", 1);
                    self.events.emit(now, "layer", format!("detach {id}"));
                }
                continue;
            }
            if self
                .attached
                .get(&id)
                .is_some_and(|r| r.phase == Phase::FadingOut)
            {
                self.backend.detach_layer(&id)?;
                self.attached.remove(&id);
                self.metrics.inc_counter("layer.detach", 1);
                self.events.emit(now, "layer", format!("detach {id}"));
            }
        }
        self.update_attached_gauge();
        Ok(())
    }

    /// Replaces the source catalog. Already-attached layers are
    /// unaffected; future attaches resolve against the new table.
    pub fn set_catalog(&mut self, catalog: SourceCatalog) {
        self.catalog = catalog;
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn basemap(&self) -> Basemap {
        self.basemap
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Ids of attached noise layers (any phase), in sorted order.
    pub fn attached_ids(&self) -> Vec<String> {
        self.attached.keys().cloned().collect()
    }

    /// Ids of noise layers currently shown (not fading out).
    pub fn visible_ids(&self) -> Vec<String> {
        self.attached
            .iter()
            .filter(|(_, r)| r.phase == Phase::Visible)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Earliest pending detach, for host timer scheduling.
    pub fn next_detach_due(&self) -> Option<Time> {
        self.detach_queue.next_due()
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn show_mode(&mut self, mode: Mode, year: Year, now: Time) -> Result<(), ControllerError> {
        match LayerKey::new(mode, year) {
            Some(key) => self.attach_and_show(key, now),
            None => {
                self.events.emit(
                    now,
                    "layer",
                    format!("no data for {} in {}", mode.slug(), year.label()),
                );
                self.metrics.inc_counter("layer.skip_invalid", 1);
                Ok(())
            }
        }
    }

    fn attach_and_show(&mut self, key: LayerKey, now: Time) -> Result<(), ControllerError> {
        let visible = Opacity::new(self.config.noise_opacity);
        for region in key.regions() {
            let id = key.layer_id(*region);

            if let Some(record) = self.attached.get_mut(&id) {
                // Re-show within the fade window: keep the layer, drop the
                // pending detach.
                if let Some(task) = record.detach_task.take() {
                    self.detach_queue.cancel(task);
                    self.metrics.inc_counter("layer.detach_canceled", 1);
                }
                record.phase = Phase::Visible;
                self.backend.set_opacity(&id, visible)?;
                self.events.emit(now, "layer", format!("show {id}"));
                continue;
            }

            let Some(tileset) = self.catalog.tileset(&id) else {
                self.events.emit(now, "layer", format!("catalog miss {id}"));
                self.metrics.inc_counter("layer.catalog_miss", 1);
                continue;
            };
            let source = SourceDescriptor {
                tileset: tileset.clone(),
                tile_size: self.config.noise_tile_size,
                fade_ms: self.config.fade_ms,
            };
            self.backend
                .attach_layer(&id, &source, LayerSlot::NoiseOverlay)?;
            self.attached.insert(
                id.clone(),
                LayerRecord {
                    phase: Phase::Visible,
                    detach_task: None,
                },
            );
            self.backend.set_opacity(&id, visible)?;
            self.metrics.inc_counter("layer.attach", 1);
            self.events.emit(now, "layer", format!("attach {id}"));
        }
        Ok(())
    }

    fn fade_out_key(&mut self, key: LayerKey, now: Time) -> Result<(), ControllerError> {
        for region in key.regions() {
            let id = key.layer_id(*region);
            self.fade_out_layer(&id, now)?;
        }
        Ok(())
    }

    fn fade_out_layer(&mut self, id: &str, now: Time) -> Result<(), ControllerError> {
        let Some(record) = self.attached.get_mut(id) else {
            // Never attached (e.g. catalog miss): nothing to hide.
            return Ok(());
        };
        if record.phase == Phase::FadingOut {
            return Ok(());
        }
        self.backend.set_opacity(id, Opacity::HIDDEN)?;
        let task = self
            .detach_queue
            .schedule(now.plus_ms(self.config.fade_ms), id.to_string());
        record.phase = Phase::FadingOut;
        record.detach_task = Some(task);
        self.events.emit(now, "layer", format!("fade out {id}"));
        Ok(())
    }

    fn show_satellite(&mut self, now: Time) -> Result<(), ControllerError> {
        let visible = Opacity::new(self.config.satellite_opacity);
        if let Some(record) = self.satellite.as_mut() {
            if let Some(task) = record.detach_task.take() {
                self.detach_queue.cancel(task);
                self.metrics.inc_counter("layer.detach_canceled", 1);
            }
            record.phase = Phase::Visible;
            self.backend.set_opacity(SATELLITE_LAYER_ID, visible)?;
        } else {
            let source = SourceDescriptor {
                tileset: self.config.satellite_tileset.clone(),
                tile_size: self.config.satellite_tile_size,
                fade_ms: self.config.fade_ms,
            };
            self.backend
                .attach_layer(SATELLITE_LAYER_ID, &source, LayerSlot::BasemapOverlay)?;
            self.satellite = Some(LayerRecord {
                phase: Phase::Visible,
                detach_task: None,
            });
            self.backend.set_opacity(SATELLITE_LAYER_ID, visible)?;
            self.metrics.inc_counter("layer.attach", 1);
        }
        self.events.emit(now, "basemap", "satellite on");
        Ok(())
    }

    fn hide_satellite(&mut self, now: Time) -> Result<(), ControllerError> {
        let Some(record) = self.satellite.as_mut() else {
            return Ok(());
        };
        if record.phase == Phase::FadingOut {
            return Ok(());
        }
        self.backend.set_opacity(SATELLITE_LAYER_ID, Opacity::HIDDEN)?;
        let task = self.detach_queue.schedule(
            now.plus_ms(self.config.fade_ms),
            SATELLITE_LAYER_ID.to_string(),
        );
        record.phase = Phase::FadingOut;
        record.detach_task = Some(task);
        self.events.emit(now, "basemap", "satellite off");
        Ok(())
    }

    fn update_attached_gauge(&mut self) {
        let satellite = usize::from(self.satellite.is_some());
        self.metrics
            .set_gauge("layers.attached", (self.attached.len() + satellite) as i64);
    }
}
