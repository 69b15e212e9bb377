//! Topographic presentation of a 2D height field: the field is extruded into filled 3D volumes
//! and shown as a volume image, a point cloud, or an isosurface.

mod colormap;
mod view;
mod volume;

pub use colormap::ColormapSpec;
pub use view::{Blending, Rendering, TopographicView, build_view};
pub use volume::{Sign, TopographicVolume, build_volumes};

use crate::Result;
use crate::errors::InvalidInput;
use ndarray::{ArrayView, ArrayView2, Dimension, Ix2};
use serde::{Deserialize, Serialize};

/// The three mutually exclusive ways of presenting a height field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopographicMode {
    #[default]
    Image,
    Points,
    Surface,
}

/// A topographic view request. Missing fields take their default values when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopographicOptions {
    pub mode: TopographicMode,

    /// Pixel decimation for image and points modes, cube size for surface mode.
    pub step_size: usize,
}

impl Default for TopographicOptions {
    fn default() -> Self {
        Self {
            mode: TopographicMode::Image,
            step_size: 1,
        }
    }
}

impl TopographicOptions {
    pub fn new(mode: TopographicMode, step_size: usize) -> Self {
        Self { mode, step_size }
    }

    pub fn validate(&self) -> Result<()> {
        if self.step_size == 0 {
            return Err(InvalidInput::ZeroStep.into());
        }
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    /// Build the views for `field` with these options.
    pub fn build<D: Dimension>(
        &self,
        field: ArrayView<'_, f64, D>,
    ) -> Result<Vec<TopographicView>> {
        build_view(field, self.mode, self.step_size)
    }
}

/// View a field of any dimensionality as a 2D height field, failing if it is not 2D.
fn as_field<D: Dimension>(field: ArrayView<'_, f64, D>) -> Result<ArrayView2<'_, f64>> {
    let shape = field.shape().to_vec();
    field
        .into_dimensionality::<Ix2>()
        .map_err(|_| InvalidInput::BadShape(shape).into())
}

/// Non-finite heights are treated as zero.
fn height(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// The retained pixels of a field as `((y, x), value)`: every `step`-th pixel of the row-major
/// raster order, which is not the same as a 2D stride when the row length is not a multiple of
/// `step`.
fn sampled_pixels(field: ArrayView2<'_, f64>, step: usize) -> Vec<((usize, usize), f64)> {
    field
        .indexed_iter()
        .step_by(step)
        .map(|(i, v)| (i, height(*v)))
        .collect()
}
