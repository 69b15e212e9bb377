//! Summary statistics shown next to each plotted profile.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Minimum, maximum, mean and population standard deviation of a sequence of intensities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
}

impl IntensityStats {
    /// Compute the statistics of the given values, returning `None` if there are no values.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &v in values {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }

        let count = values.len() as f64;
        let mean = sum / count;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;

        Some(Self {
            min,
            max,
            mean,
            std: variance.sqrt(),
        })
    }
}

impl Display for IntensityStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:.2} .. {:.2}], {:.2} +- {:.2}",
            self.min, self.max, self.mean, self.std
        )
    }
}
