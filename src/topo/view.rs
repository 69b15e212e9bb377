use super::volume::{Sign, TopographicVolume, build_volumes};
use super::{ColormapSpec, TopographicMode, as_field, height, sampled_pixels};
use crate::errors::InvalidInput;
use crate::iso::{IsoSurface, marching_cubes};
use crate::{Result, Vector3};
use ndarray::{Array2, Array3, ArrayView, ArrayView2, Axis, Dimension, concatenate, s};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Pixel count per unit of point size in points mode.
const PIXELS_PER_POINT_SIZE: f64 = 30000.0;

/// How the host should project a volume image onto the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rendering {
    /// Maximum intensity projection
    Mip,

    /// Minimum intensity projection
    Minip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Blending {
    Additive,
}

/// One layer for the host to add to its viewer. All coordinates are `(z, y, x)` in voxel units,
/// with height growing towards negative z.
#[derive(Debug, Clone, PartialEq)]
pub enum TopographicView {
    Image {
        name: String,
        data: Array3<i64>,
        rendering: Rendering,
        blending: Blending,
        translate: Vector3,
        colormap: ColormapSpec,
    },
    PointCloud {
        name: String,

        /// One `(z, y, x)` row per retained pixel.
        points: Array2<i64>,
        size: usize,
    },
    Surface {
        name: String,
        surface: IsoSurface,
        translate: Vector3,
        colormap: ColormapSpec,
    },
}

impl TopographicView {
    pub fn name(&self) -> &str {
        match self {
            TopographicView::Image { name, .. } => name,
            TopographicView::PointCloud { name, .. } => name,
            TopographicView::Surface { name, .. } => name,
        }
    }

    /// The kind of viewer layer the host should create for this view.
    pub fn layer_type(&self) -> &'static str {
        match self {
            TopographicView::Image { .. } => "image",
            TopographicView::PointCloud { .. } => "points",
            TopographicView::Surface { .. } => "surface",
        }
    }
}

/// Build the topographic views of a 2D height field.
///
/// * `Image` gives one volume image per sign present in the field. The positive volume is drawn
///   with maximum intensity projection, the negative one with minimum intensity projection.
/// * `Points` gives one point per retained pixel at `(-h, y, x)`.
/// * `Surface` gives a single isosurface around the extruded solid of both signs. The volume is
///   always built from every pixel; `step_size` only sets the marching cubes cube size, since
///   decimated columns would leave holes in the mesh.
///
/// # Arguments
///
/// * `field`: the 2D height field, indexed `[y, x]`
/// * `mode`: which presentation to build
/// * `step_size`: pixel decimation for image and points, cube size for surface; at least 1
///
/// returns: Result<Vec<TopographicView, Global>, Box<dyn Error, Global>>
pub fn build_view<D: Dimension>(
    field: ArrayView<'_, f64, D>,
    mode: TopographicMode,
    step_size: usize,
) -> Result<Vec<TopographicView>> {
    if step_size == 0 {
        return Err(InvalidInput::ZeroStep.into());
    }
    let field = as_field(field)?;

    match mode {
        TopographicMode::Image => image_views(field, step_size),
        TopographicMode::Points => Ok(vec![points_view(field, step_size)?]),
        TopographicMode::Surface => Ok(vec![surface_view(field, step_size)?]),
    }
}

fn image_views(field: ArrayView2<'_, f64>, step: usize) -> Result<Vec<TopographicView>> {
    let peak = field
        .iter()
        .map(|v| height(*v))
        .fold(f64::NEG_INFINITY, f64::max);
    let peak = if peak.is_finite() { peak.trunc() } else { 0.0 };

    let views = build_volumes(field, step)?
        .into_iter()
        .map(|volume| {
            let data = reversed(&volume);
            match volume.sign() {
                Sign::Positive => TopographicView::Image {
                    name: "topographical image".to_string(),
                    data,
                    rendering: Rendering::Mip,
                    blending: Blending::Additive,
                    translate: Vector3::new(-peak, 0.0, 0.0),
                    colormap: ColormapSpec::gist_earth(),
                },
                Sign::Negative => TopographicView::Image {
                    name: "topographical image negative".to_string(),
                    data,
                    rendering: Rendering::Minip,
                    blending: Blending::Additive,
                    translate: Vector3::zeros(),
                    colormap: ColormapSpec::inferno_reversed(),
                },
            }
        })
        .collect();

    Ok(views)
}

fn points_view(field: ArrayView2<'_, f64>, step: usize) -> Result<TopographicView> {
    let pixels = sampled_pixels(field, step);
    let count = pixels.len();
    let coords = pixels
        .into_iter()
        .flat_map(|((y, x), v)| [(-v) as i64, y as i64, x as i64])
        .collect::<Vec<_>>();
    let points = Array2::from_shape_vec((count, 3), coords)?;

    let size = (field.len() as f64 / PIXELS_PER_POINT_SIZE)
        .round_ties_even()
        .max(1.0) as usize;

    Ok(TopographicView::PointCloud {
        name: "topographical points".to_string(),
        points,
        size,
    })
}

fn surface_view(field: ArrayView2<'_, f64>, step: usize) -> Result<TopographicView> {
    let mut volumes = build_volumes(field, 1)?.into_iter();
    let positive = volumes.next().ok_or("no positive volume was built")?;
    let negative = volumes.next();

    let solid = signed_solid(&positive, negative.as_ref())?;
    let surface = marching_cubes(solid.mapv(|v| v as f64).view(), 0.0, step)?;
    debug!(
        shape = ?solid.shape(),
        vertices = surface.vertices.len(),
        faces = surface.faces.len(),
        "triangulated topographic surface"
    );

    Ok(TopographicView::Surface {
        name: "topographical surface".to_string(),
        surface,
        translate: Vector3::new(-((positive.depth() - 1) as f64), 0.0, 0.0),
        colormap: ColormapSpec::gist_earth(),
    })
}

/// A volume with its z order flipped, so index 0 holds the highest magnitude.
fn reversed(volume: &TopographicVolume) -> Array3<i64> {
    volume.data().slice(s![..;-1, .., ..]).to_owned()
}

/// Stack both partitions into one volume whose filled voxels are all strictly positive: the
/// positive partition from its top down to the zero plane, then the negative partition from
/// depth 1 downwards. Index `positive.depth() - 1` is the zero plane.
fn signed_solid(
    positive: &TopographicVolume,
    negative: Option<&TopographicVolume>,
) -> Result<Array3<i64>> {
    let top = positive.data().slice_move(s![..;-1, .., ..]);
    let Some(negative) = negative else {
        return Ok(top.to_owned());
    };

    let below = negative.data().slice_move(s![1.., .., ..]);
    let mut solid = concatenate(Axis(0), &[top, below])?;
    let shift = solid.iter().copied().min().unwrap_or(0).abs() + 1;
    solid.mapv_inplace(|v| if v != 0 { v + shift } else { 0 });

    Ok(solid)
}
