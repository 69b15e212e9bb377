//! Intensity profiles along a path. `resample` walks a polyline through an image layer and
//! returns evenly spaced samples; `ProfileTable` flattens the per-layer results into named
//! columns for export.

mod resample;
mod table;

pub use resample::resample;
pub use table::ProfileTable;

use crate::common::IntensityStats;
use serde::{Deserialize, Serialize};

/// The value of one voxel: a single scalar, or one value per channel for color images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Intensity {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl Intensity {
    pub fn channels(&self) -> usize {
        match self {
            Intensity::Scalar(_) => 1,
            Intensity::Vector(v) => v.len(),
        }
    }

    pub fn values(&self) -> &[f64] {
        match self {
            Intensity::Scalar(v) => std::slice::from_ref(v),
            Intensity::Vector(v) => v,
        }
    }
}

/// Samples taken along a path: parallel sequences of voxel index, arc length from the start of the
/// path, and the voxel value found there.
///
/// Every position lies inside the array it was taken from, and the distances never decrease.
/// Samples that fell outside the array were dropped, so the set may be shorter than requested or
/// empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SampleSet {
    positions: Vec<Vec<usize>>,
    distances: Vec<f64>,
    intensities: Vec<Intensity>,
}

impl SampleSet {
    pub(crate) fn push(&mut self, position: Vec<usize>, distance: f64, intensity: Intensity) {
        self.positions.push(position);
        self.distances.push(distance);
        self.intensities.push(intensity);
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn positions(&self) -> &[Vec<usize>] {
        &self.positions
    }

    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    pub fn intensities(&self) -> &[Intensity] {
        &self.intensities
    }

    /// Number of values per sample; zero for an empty set.
    pub fn channels(&self) -> usize {
        self.intensities.first().map(|i| i.channels()).unwrap_or(0)
    }

    /// All intensity values, channels included, in sample order.
    pub fn flat_intensities(&self) -> Vec<f64> {
        self.intensities
            .iter()
            .flat_map(|i| i.values().iter().copied())
            .collect()
    }

    /// The values of a single channel, or `None` if the channel doesn't exist.
    pub fn channel(&self, c: usize) -> Option<Vec<f64>> {
        if c >= self.channels() {
            return None;
        }
        self.intensities
            .iter()
            .map(|i| i.values().get(c).copied())
            .collect()
    }

    pub fn stats(&self) -> Option<IntensityStats> {
        IntensityStats::from_values(&self.flat_intensities())
    }
}

/// The profile of one image layer, as produced by one redraw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub name: String,
    pub color: [u8; 3],
    pub samples: SampleSet,
}
