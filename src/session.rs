//! Keeps the profile plot in sync with the host's layers. A `ProfileSession` remembers the last
//! path it profiled and recomputes every visible image layer's profile when that path changes,
//! when the layer selection changes, or when asked to.

mod config;
mod plot;

pub use config::ProfileConfig;
pub use plot::{NullSurface, PlotSurface};

use crate::common::{IntensityStats, RefreshThrottle};
use crate::layers::{ImageLayer, LayerList, Path};
use crate::profile::{ProfileRecord, ProfileTable, resample};
use crate::Result;
use std::time::Instant;
use tracing::{debug, trace, warn};

/// What a call to `redraw` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawOutcome {
    /// The active path was the same as last time and no redraw was forced; nothing was touched.
    Unchanged,

    /// There was no active path, so the surface was cleared.
    Cleared,

    /// Profiles were recomputed; `traces` layers produced samples and were drawn.
    Redrawn { traces: usize },
}

/// The result of the most recent recompute.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSnapshot {
    pub path: Path,
    pub records: Vec<ProfileRecord>,
    pub stats: Vec<IntensityStats>,
    pub table: ProfileTable,
}

/// Narrow notification interface for the host's layer events.
pub trait SelectionObserver {
    /// The host's layer selection changed.
    fn selection_changed(&mut self, layers: &LayerList, surface: &mut dyn PlotSurface)
    -> RedrawOutcome;
}

#[derive(Debug, Clone)]
pub struct ProfileSession {
    config: ProfileConfig,
    last_path: Option<Path>,
    snapshot: Option<ProfileSnapshot>,
    throttle: RefreshThrottle,
    recompute_count: u64,
}

impl ProfileSession {
    pub fn new(config: ProfileConfig) -> Result<Self> {
        config.validate()?;
        let throttle = RefreshThrottle::new(config.refresh_interval());
        Ok(Self {
            config,
            last_path: None,
            snapshot: None,
            throttle,
            recompute_count: 0,
        })
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    /// Number of times profiles have actually been recomputed.
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    pub fn snapshot(&self) -> Option<&ProfileSnapshot> {
        self.snapshot.as_ref()
    }

    /// The exported table of the last recompute, if anything is plotted.
    pub fn table(&self) -> Option<&ProfileTable> {
        self.snapshot.as_ref().map(|s| &s.table)
    }

    pub fn active_path<'a>(&self, layers: &'a LayerList) -> Option<&'a Path> {
        layers.active_path().map(|s| s.path())
    }

    pub fn visible_image_layers<'a>(&self, layers: &'a LayerList) -> Vec<&'a ImageLayer> {
        layers.visible_image_layers()
    }

    /// Recompute the profiles of all visible image layers along the active path and draw them.
    ///
    /// Unless `force` is set, nothing happens when the active path equals the one from the last
    /// recompute. A layer which cannot be profiled is logged and left out; a layer whose samples
    /// all fall outside its bounds contributes no trace and no statistics.
    ///
    /// # Arguments
    ///
    /// * `layers`: the host's current layers and selection
    /// * `surface`: the plot to draw onto, cleared before drawing
    /// * `force`: recompute even if the active path is unchanged
    ///
    /// returns: RedrawOutcome
    pub fn redraw(
        &mut self,
        layers: &LayerList,
        surface: &mut dyn PlotSurface,
        force: bool,
    ) -> RedrawOutcome {
        let Some(path) = self.active_path(layers) else {
            trace!("no active path, clearing profile plot");
            surface.clear();
            self.last_path = None;
            self.snapshot = None;
            return RedrawOutcome::Cleared;
        };

        if !force && self.last_path.as_ref() == Some(path) {
            trace!("active path unchanged, skipping redraw");
            return RedrawOutcome::Unchanged;
        }

        surface.clear();
        let image_layers = self.visible_image_layers(layers);
        debug!(
            vertices = path.len(),
            layers = image_layers.len(),
            num_points = self.config.num_points,
            "recomputing profiles"
        );

        let mut records = Vec::new();
        let mut stats = Vec::new();
        for layer in image_layers {
            let samples = match resample(path, layer, self.config.num_points) {
                Ok(s) => s,
                Err(e) => {
                    warn!(layer = layer.name(), error = %e, "could not profile layer");
                    continue;
                }
            };

            let Some(layer_stats) = samples.stats() else {
                debug!(layer = layer.name(), "path lies outside layer, no samples");
                continue;
            };

            let record = ProfileRecord {
                name: layer.name().to_string(),
                color: layer.color(),
                samples,
            };
            surface.add_trace(&record, &layer_stats);
            records.push(record);
            stats.push(layer_stats);
        }

        let traces = records.len();
        self.snapshot = Some(ProfileSnapshot {
            path: path.clone(),
            table: ProfileTable::from_records(&records),
            records,
            stats,
        });
        self.last_path = Some(path.clone());
        self.recompute_count += 1;

        RedrawOutcome::Redrawn { traces }
    }

    /// Recompute unconditionally, as for an explicit refresh request.
    pub fn refresh(&mut self, layers: &LayerList, surface: &mut dyn PlotSurface) -> RedrawOutcome {
        self.redraw(layers, surface, true)
    }

    /// Periodic tick from the host's timer. Redraws without forcing if the refresh interval has
    /// passed since the last accepted tick, so an unchanged path costs nothing.
    pub fn poll(
        &mut self,
        now: Instant,
        layers: &LayerList,
        surface: &mut dyn PlotSurface,
    ) -> RedrawOutcome {
        if self.throttle.due(now) {
            self.redraw(layers, surface, false)
        } else {
            RedrawOutcome::Unchanged
        }
    }
}

impl SelectionObserver for ProfileSession {
    fn selection_changed(
        &mut self,
        layers: &LayerList,
        surface: &mut dyn PlotSurface,
    ) -> RedrawOutcome {
        self.redraw(layers, surface, true)
    }
}
