use super::{as_field, height, sampled_pixels};
use crate::Result;
use crate::errors::InvalidInput;
use ndarray::{Array2, Array3, ArrayView, ArrayView2, ArrayView3, Dimension};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which part of a signed height field a volume was extruded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    fn factor(&self) -> i64 {
        match self {
            Sign::Positive => 1,
            Sign::Negative => -1,
        }
    }

    /// The non-negative magnitude of `v` in this partition; values of the other sign give zero.
    fn magnitude(&self, v: f64) -> f64 {
        (height(v) * self.factor() as f64).max(0.0)
    }
}

/// A height field extruded into a solid: voxel `(z, y, x)` holds `z` when `1 <= z <= h(y, x)`
/// and 0 otherwise, where `h` is the truncated magnitude of the pixel. Negative partitions store
/// `-z` instead, so the sign of the source survives.
#[derive(Debug, Clone, PartialEq)]
pub struct TopographicVolume {
    sign: Sign,
    data: Array3<i64>,
}

impl TopographicVolume {
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// The volume in natural z order, `data[0]` being the zero plane.
    pub fn data(&self) -> ArrayView3<'_, i64> {
        self.data.view()
    }

    pub fn into_data(self) -> Array3<i64> {
        self.data
    }

    /// Number of z slices, one more than the largest magnitude rounded up.
    pub fn depth(&self) -> usize {
        self.data.dim().0
    }
}

/// Extrude a 2D height field into one volume per sign present in it.
///
/// The positive volume is always produced. A negative volume follows it when any pixel is below
/// zero, built from the magnitudes of the negative pixels. Each volume has the shape
/// `(ceil(max magnitude) + 1, height, width)`. Only every `sample_step`-th pixel of the raster
/// order is extruded, the others stay empty. Non-finite pixels are treated as zero.
///
/// # Arguments
///
/// * `field`: the 2D height field, indexed `[y, x]`
/// * `sample_step`: pixel decimation, at least 1
///
/// returns: Result<Vec<TopographicVolume, Global>, Box<dyn Error, Global>>
pub fn build_volumes<D: Dimension>(
    field: ArrayView<'_, f64, D>,
    sample_step: usize,
) -> Result<Vec<TopographicVolume>> {
    if sample_step == 0 {
        return Err(InvalidInput::ZeroStep.into());
    }
    let field = as_field(field)?;

    let mut volumes = vec![extrude(field, Sign::Positive, sample_step)?];
    if field.iter().any(|v| height(*v) < 0.0) {
        volumes.push(extrude(field, Sign::Negative, sample_step)?);
    }

    Ok(volumes)
}

fn extrude(field: ArrayView2<'_, f64>, sign: Sign, step: usize) -> Result<TopographicVolume> {
    let (rows, cols) = field.dim();
    let top = field
        .iter()
        .map(|v| sign.magnitude(*v))
        .fold(0.0, f64::max)
        .ceil() as usize;
    let depth = top
        .checked_add(1)
        .filter(|d| d.checked_mul(rows * cols).is_some())
        .ok_or_else(|| InvalidInput::BadShape(vec![top, rows, cols]))?;

    let mut heights = Array2::<i64>::zeros((rows, cols));
    for ((y, x), v) in sampled_pixels(field, step) {
        heights[[y, x]] = sign.magnitude(v) as i64;
    }

    let factor = sign.factor();
    let values: Vec<i64> = (0..=top as i64)
        .into_par_iter()
        .flat_map_iter(|z| {
            heights
                .iter()
                .map(move |h| if z <= *h { factor * z } else { 0 })
                .collect::<Vec<_>>()
        })
        .collect();

    let data = Array3::from_shape_vec((depth, rows, cols), values)?;
    debug!(?sign, shape = ?data.shape(), "extruded topographic volume");

    Ok(TopographicVolume { sign, data })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, array};
    use test_case::test_case;

    #[test]
    fn positive_field_reconstruction() {
        let f = array![[0.0, 1.0], [2.0, 3.0]];
        let volumes = build_volumes(f.view(), 1).unwrap();
        assert_eq!(volumes.len(), 1);

        let expected: Array3<i64> = array![
            [[0, 0], [0, 0]],
            [[0, 1], [1, 1]],
            [[0, 0], [2, 2]],
            [[0, 0], [0, 3]]
        ];
        assert_eq!(volumes[0].sign(), Sign::Positive);
        assert_eq!(volumes[0].data(), expected.view());
    }

    #[test]
    fn signed_field_splits_into_two_volumes() {
        let f = array![[-1.5, 1.0], [2.0, 3.0]];
        let volumes = build_volumes(f.view(), 1).unwrap();
        assert_eq!(volumes.len(), 2);

        let positive: Array3<i64> = array![
            [[0, 0], [0, 0]],
            [[0, 1], [1, 1]],
            [[0, 0], [2, 2]],
            [[0, 0], [0, 3]]
        ];
        assert_eq!(volumes[0].data(), positive.view());

        let negative: Array3<i64> = array![
            [[0, 0], [0, 0]],
            [[-1, 0], [0, 0]],
            [[0, 0], [0, 0]]
        ];
        assert_eq!(volumes[1].sign(), Sign::Negative);
        assert_eq!(volumes[1].data(), negative.view());
    }

    #[test]
    fn fractional_heights_truncate() {
        let f = array![[2.9, 0.5]];
        let v = build_volumes(f.view(), 1).unwrap().remove(0);
        assert_eq!(v.depth(), 4);
        assert_eq!(v.data().slice(ndarray::s![.., 0, 0]).to_vec(), vec![0i64, 1, 2, 0]);
        assert_eq!(v.data().slice(ndarray::s![.., 0, 1]).to_vec(), vec![0i64; 4]);
    }

    #[test_case(1, 6)]
    #[test_case(2, 3)]
    #[test_case(4, 2)]
    fn decimation_counts_filled_columns(step: usize, columns: usize) {
        let f = Array2::from_elem((2, 3), 2.0);
        let v = build_volumes(f.view(), step).unwrap().remove(0);
        let filled = v
            .data()
            .slice(ndarray::s![1, .., ..])
            .iter()
            .filter(|z| **z != 0)
            .count();
        assert_eq!(filled, columns);
    }

    #[test]
    fn non_finite_is_zero() {
        let f = array![[f64::NAN, f64::NEG_INFINITY], [1.0, 0.0]];
        let volumes = build_volumes(f.view(), 1).unwrap();
        assert_eq!(volumes.len(), 1);
        assert_eq!(volumes[0].depth(), 2);
    }

    #[test]
    fn all_negative_field_keeps_empty_positive_volume() {
        let f = array![[-2.0, -1.0]];
        let volumes = build_volumes(f.view(), 1).unwrap();
        assert_eq!(volumes.len(), 2);
        assert_eq!(volumes[0].depth(), 1);
        assert!(volumes[0].data().iter().all(|v| *v == 0));
        assert_eq!(volumes[1].depth(), 3);
        assert_eq!(volumes[1].data()[[2, 0, 0]], -2);
    }

    #[test]
    fn unrepresentable_depth_is_an_error() {
        let f = array![[f64::MAX, 1.0]];
        assert!(build_volumes(f.view(), 1).is_err());
    }

    #[test]
    fn bad_arguments() {
        let f = array![[1.0]];
        assert!(build_volumes(f.view(), 0).is_err());
        let line = Array1::<f64>::zeros(3);
        assert!(build_volumes(line.view(), 1).is_err());
    }
}
