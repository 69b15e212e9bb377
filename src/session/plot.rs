use crate::common::IntensityStats;
use crate::profile::ProfileRecord;

/// Whatever the host draws profiles onto. A session is handed the surface on every redraw; it
/// clears it and adds one trace per layer that produced samples.
pub trait PlotSurface {
    fn clear(&mut self);

    /// Add the trace of one layer. The x values are `record.samples.distances()`, the y values
    /// the intensities, and `stats` is the summary shown in the layer's legend row.
    fn add_trace(&mut self, record: &ProfileRecord, stats: &IntensityStats);
}

/// A surface that discards everything, for hosts that only want the exported table.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl PlotSurface for NullSurface {
    fn clear(&mut self) {}

    fn add_trace(&mut self, _record: &ProfileRecord, _stats: &IntensityStats) {}
}
