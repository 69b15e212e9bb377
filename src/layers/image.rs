//! Image layers and the arrays behind them.

use crate::errors::InvalidInput;
use crate::na::DVector;
use crate::Result;
use ndarray::{ArrayBase, ArrayD, Data, Dimension};
use num_traits::ToPrimitive;
use std::borrow::Cow;
use std::fmt::Debug;
use std::sync::Arc;

/// An array whose values are produced on demand, such as a chunked out-of-core store. The core
/// never indexes one of these element by element; it asks for the whole array once per
/// resampling call.
pub trait DeferredArray: Debug + Send + Sync {
    fn shape(&self) -> Vec<usize>;

    /// Load or compute the full array.
    fn compute(&self) -> Result<ArrayD<f64>>;
}

/// The pixel/voxel data of an image layer.
#[derive(Debug, Clone)]
pub enum ImageData {
    Dense(ArrayD<f64>),
    Deferred(Arc<dyn DeferredArray>),
}

impl ImageData {
    pub fn shape(&self) -> Vec<usize> {
        match self {
            ImageData::Dense(a) => a.shape().to_vec(),
            ImageData::Deferred(d) => d.shape(),
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, ImageData::Deferred(_))
    }

    /// Get an in-memory view of the data, computing a deferred array in full.
    pub fn materialize(&self) -> Result<Cow<'_, ArrayD<f64>>> {
        match self {
            ImageData::Dense(a) => Ok(Cow::Borrowed(a)),
            ImageData::Deferred(d) => {
                let a = d.compute()?;
                if a.shape() != d.shape().as_slice() {
                    return Err(InvalidInput::BadShape(a.shape().to_vec()).into());
                }
                Ok(Cow::Owned(a))
            }
        }
    }
}

/// An image layer as seen by the profiler: the data array, its world transform, and display
/// attributes.
///
/// World coordinates relate to voxel indices by `world = voxel * scale + translate`, per spatial
/// axis. When `rgb` is set the last array axis holds color channels and is not a spatial axis.
#[derive(Debug, Clone)]
pub struct ImageLayer {
    name: String,
    data: ImageData,
    scale: Vec<f64>,
    translate: Vec<f64>,
    visible: bool,
    rgb: bool,
    color: [u8; 3],
}

impl ImageLayer {
    /// Create a visible, single channel image layer with unit scale and no translation.
    pub fn new(name: &str, data: ArrayD<f64>) -> Self {
        Self::from_data(name, ImageData::Dense(data))
    }

    /// Create a layer from an array of any numeric element type, converting the values to `f64`.
    /// Values which cannot be represented become NaN.
    pub fn from_array<S, T, D>(name: &str, array: &ArrayBase<S, D>) -> Self
    where
        S: Data<Elem = T>,
        T: ToPrimitive,
        D: Dimension,
    {
        let data = array.map(|v| v.to_f64().unwrap_or(f64::NAN)).into_dyn();
        Self::new(name, data)
    }

    /// Create a layer backed by a deferred array.
    pub fn deferred(name: &str, data: Arc<dyn DeferredArray>) -> Self {
        Self::from_data(name, ImageData::Deferred(data))
    }

    fn from_data(name: &str, data: ImageData) -> Self {
        let n = data.shape().len();
        Self {
            name: name.to_string(),
            data,
            scale: vec![1.0; n],
            translate: vec![0.0; n],
            visible: true,
            rgb: false,
            color: [255, 255, 255],
        }
    }

    /// Set the per-axis world units per voxel. There must be one finite, non-zero value for each
    /// spatial axis.
    pub fn with_scale(mut self, scale: Vec<f64>) -> Result<Self> {
        if scale.len() != self.spatial_ndim() || scale.iter().any(|s| !s.is_finite() || *s == 0.0)
        {
            return Err(InvalidInput::InvalidScale(scale).into());
        }
        self.scale = scale;
        Ok(self)
    }

    /// Set the per-axis world offset of voxel zero.
    pub fn with_translate(mut self, translate: Vec<f64>) -> Result<Self> {
        if translate.len() != self.spatial_ndim() {
            return Err(InvalidInput::DimensionMismatch {
                path: translate.len(),
                layer: self.spatial_ndim(),
            }
            .into());
        }
        self.translate = translate;
        Ok(self)
    }

    /// Mark the last axis as color channels. Scale and translate are trimmed to the spatial axes.
    pub fn with_rgb(mut self, rgb: bool) -> Self {
        self.rgb = rgb;
        let n = self.spatial_ndim();
        self.scale.resize(n, 1.0);
        self.translate.resize(n, 0.0);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Set the display color used for this layer's profile trace, normally the last color of the
    /// layer's colormap.
    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ImageData {
        &self.data
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    pub fn translate(&self) -> &[f64] {
        &self.translate
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_rgb(&self) -> bool {
        self.rgb
    }

    pub fn color(&self) -> [u8; 3] {
        self.color
    }

    /// Shape of the array over the spatial axes only.
    pub fn spatial_shape(&self) -> Vec<usize> {
        let mut shape = self.data.shape();
        if self.rgb {
            shape.pop();
        }
        shape
    }

    pub fn spatial_ndim(&self) -> usize {
        self.spatial_shape().len()
    }

    /// Convert a point in world coordinates to fractional voxel coordinates.
    pub fn world_to_voxel(&self, world: &DVector<f64>) -> DVector<f64> {
        DVector::from_iterator(
            world.len(),
            world
                .iter()
                .zip(self.translate.iter().zip(self.scale.iter()))
                .map(|(w, (t, s))| (w - t) / s),
        )
    }
}
