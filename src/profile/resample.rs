//! Resampling of an image layer along a polyline.

use super::{Intensity, SampleSet};
use crate::common::linear_space;
use crate::errors::InvalidInput;
use crate::layers::{ImageLayer, Path};
use crate::na::DVector;
use crate::Result;
use ndarray::{ArrayD, Axis, IxDyn};

/// Sample `layer` at `num_points` evenly spaced arc lengths along `path`.
///
/// The path is given in world coordinates. Each target arc length is located on its segment,
/// interpolated between the segment's end points after they are converted to voxel coordinates,
/// and truncated to an integer voxel index. Samples whose index falls outside the array are
/// dropped from all three output sequences rather than clamped, so the result can hold fewer than
/// `num_points` samples, or none at all.
///
/// A path whose points all coincide has zero length; it produces a single sample at that point.
///
/// Deferred layer data is computed in full once before any sample is read.
///
/// # Arguments
///
/// * `path`: the polyline to follow, with one coordinate per spatial axis of the layer
/// * `layer`: the image layer to sample
/// * `num_points`: the number of evenly spaced samples to take, at least 2
///
/// returns: Result<SampleSet, Box<dyn Error, Global>>
pub fn resample(path: &Path, layer: &ImageLayer, num_points: usize) -> Result<SampleSet> {
    if num_points < 2 {
        return Err(InvalidInput::TooFewSamples(num_points).into());
    }

    let shape = layer.spatial_shape();
    if path.ndim() != shape.len() {
        return Err(InvalidInput::DimensionMismatch {
            path: path.ndim(),
            layer: shape.len(),
        }
        .into());
    }

    let data = layer.data().materialize()?;

    let mut samples = SampleSet::default();
    for (distance, voxel) in sample_targets(path, layer, num_points) {
        let Some(index) = voxel_index(&voxel, &shape) else {
            continue;
        };
        let intensity = read_intensity(&data, &index, layer.is_rgb());
        samples.push(index, distance, intensity);
    }

    Ok(samples)
}

/// Generate the arc length and fractional voxel coordinate of every target sample.
fn sample_targets(path: &Path, layer: &ImageLayer, num_points: usize) -> Vec<(f64, DVector<f64>)> {
    let voxels = path
        .points()
        .iter()
        .map(|p| layer.world_to_voxel(p))
        .collect::<Vec<_>>();
    let last = voxels.len() - 1;

    // The trailing duplicate of the total length is a zero length sentinel segment which catches
    // targets that land at or just past the end of the path.
    let mut knots = path.cumulative_lengths();
    let total = knots[last];
    knots.push(total);

    if total <= 0.0 || !total.is_finite() {
        return vec![(0.0, voxels[0].clone())];
    }

    let mut targets = Vec::with_capacity(num_points);
    let mut segment = 0;
    for distance in linear_space(0.0, total, num_points) {
        while segment < last && distance > knots[segment + 1] {
            segment += 1;
        }

        let start = &voxels[segment.min(last)];
        let end = &voxels[(segment + 1).min(last)];
        let length = knots[segment + 1] - knots[segment];
        let t = if length > 0.0 {
            (distance - knots[segment]) / length
        } else {
            0.0
        };

        targets.push((distance, start + (end - start) * t));
    }

    targets
}

/// Truncate a fractional voxel coordinate to an index, or `None` if it lies outside `shape`.
fn voxel_index(voxel: &DVector<f64>, shape: &[usize]) -> Option<Vec<usize>> {
    voxel
        .iter()
        .zip(shape.iter())
        .map(|(&v, &n)| {
            if !v.is_finite() {
                return None;
            }
            let i = v as i64;
            if i >= 0 && (i as usize) < n {
                Some(i as usize)
            } else {
                None
            }
        })
        .collect()
}

fn read_intensity(data: &ArrayD<f64>, index: &[usize], rgb: bool) -> Intensity {
    if !rgb {
        return Intensity::Scalar(data[IxDyn(index)]);
    }

    let mut view = data.view();
    for &i in index {
        view = view.index_axis_move(Axis(0), i);
    }
    Intensity::Vector(view.iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::DeferredArray;
    use approx::assert_relative_eq;
    use ndarray::{Array2, Array3};
    use rand::Rng;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use test_case::test_case;

    /// A 10x10 image whose value at (r, c) is 10 * r + c.
    fn ramp_layer() -> ImageLayer {
        let a = Array2::from_shape_fn((10, 10), |(r, c)| (10 * r + c) as f64);
        ImageLayer::from_array("ramp", &a)
    }

    fn path(rows: &[[f64; 2]]) -> Path {
        Path::from_rows(&rows.iter().map(|r| r.to_vec()).collect::<Vec<_>>()).unwrap()
    }

    fn scalars(s: &SampleSet) -> Vec<f64> {
        s.intensities().iter().map(|i| i.values()[0]).collect()
    }

    #[test]
    fn straight_line_along_row() {
        let s = resample(&path(&[[2.0, 0.0], [2.0, 8.0]]), &ramp_layer(), 9).unwrap();
        assert_eq!(s.len(), 9);
        assert_eq!(s.positions()[0], vec![2, 0]);
        assert_eq!(s.positions()[8], vec![2, 8]);
        assert_eq!(scalars(&s), (20..29).map(|v| v as f64).collect::<Vec<_>>());
        for (i, d) in s.distances().iter().enumerate() {
            assert_relative_eq!(*d, i as f64, epsilon = 1e-12);
        }
    }

    #[test]
    fn interpolates_from_start_to_end() {
        let s = resample(&path(&[[0.0, 0.0], [0.0, 8.0]]), &ramp_layer(), 3).unwrap();
        assert_eq!(
            s.positions(),
            &[vec![0usize, 0], vec![0, 4], vec![0, 8]]
        );
    }

    #[test]
    fn polyline_follows_every_segment() {
        let s = resample(
            &path(&[[0.0, 0.0], [0.0, 4.0], [4.0, 4.0]]),
            &ramp_layer(),
            9,
        )
        .unwrap();
        assert_eq!(s.len(), 9);
        assert_eq!(s.positions()[0], vec![0, 0]);
        assert_eq!(s.positions()[4], vec![0, 4]);
        assert_eq!(s.positions()[6], vec![2, 4]);
        assert_eq!(s.positions()[8], vec![4, 4]);
        assert_relative_eq!(s.distances()[8], 8.0, epsilon = 1e-12);
    }

    #[test]
    fn scale_converts_world_to_voxels() {
        let layer = ramp_layer().with_scale(vec![2.0, 2.0]).unwrap();
        let s = resample(&path(&[[0.0, 0.0], [0.0, 16.0]]), &layer, 9).unwrap();
        assert_eq!(s.len(), 9);
        assert_eq!(s.positions()[4], vec![0, 4]);
        assert_eq!(s.positions()[8], vec![0, 8]);
        assert_relative_eq!(s.distances()[8], 16.0, epsilon = 1e-12);
    }

    #[test]
    fn samples_outside_are_dropped_not_clamped() {
        let s = resample(&path(&[[5.0, -4.0], [5.0, 12.0]]), &ramp_layer(), 17).unwrap();
        assert_eq!(s.len(), 10);
        assert_eq!(s.positions()[0], vec![5, 0]);
        assert_eq!(s.positions()[9], vec![5, 9]);
        assert_relative_eq!(s.distances()[0], 4.0, epsilon = 1e-12);
        assert_relative_eq!(s.distances()[9], 13.0, epsilon = 1e-12);
    }

    #[test]
    fn path_entirely_outside_is_empty() {
        let s = resample(&path(&[[20.0, 20.0], [30.0, 30.0]]), &ramp_layer(), 10).unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn degenerate_path_gives_one_sample() {
        let s = resample(&path(&[[3.0, 4.0], [3.0, 4.0], [3.0, 4.0]]), &ramp_layer(), 10).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.positions()[0], vec![3, 4]);
        assert_relative_eq!(s.distances()[0], 0.0);
        assert_eq!(s.intensities()[0], Intensity::Scalar(34.0));
    }

    #[test]
    fn repeated_interior_vertex_is_harmless() {
        let s = resample(
            &path(&[[0.0, 0.0], [0.0, 4.0], [0.0, 4.0], [0.0, 8.0]]),
            &ramp_layer(),
            9,
        )
        .unwrap();
        let cols = s.positions().iter().map(|p| p[1]).collect::<Vec<_>>();
        assert_eq!(cols, vec![0, 1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn too_few_samples_is_an_error() {
        let e = resample(&path(&[[0.0, 0.0], [1.0, 1.0]]), &ramp_layer(), 1).unwrap_err();
        assert_eq!(
            e.downcast_ref::<InvalidInput>(),
            Some(&InvalidInput::TooFewSamples(1))
        );
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        let p = Path::from_rows(&[vec![0.0, 0.0, 0.0], vec![1.0, 1.0, 1.0]]).unwrap();
        let e = resample(&p, &ramp_layer(), 5).unwrap_err();
        assert_eq!(
            e.downcast_ref::<InvalidInput>(),
            Some(&InvalidInput::DimensionMismatch { path: 3, layer: 2 })
        );
    }

    #[test]
    fn rgb_layer_yields_vector_intensities() {
        let a = Array3::from_shape_fn((4, 5, 3), |(r, c, k)| (r * 100 + c * 10 + k) as f64);
        let layer = ImageLayer::from_array("rgb", &a).with_rgb(true);
        let s = resample(&path(&[[1.0, 0.0], [1.0, 4.0]]), &layer, 5).unwrap();
        assert_eq!(s.len(), 5);
        assert_eq!(s.channels(), 3);
        assert_eq!(s.intensities()[2], Intensity::Vector(vec![120.0, 121.0, 122.0]));
    }

    #[test]
    fn volume_layer_with_3d_path() {
        let a = Array3::from_shape_fn((3, 5, 5), |(z, y, x)| (z * 25 + y * 5 + x) as f64);
        let layer = ImageLayer::from_array("vol", &a);
        let p = Path::from_rows(&[vec![1.0, 0.0, 0.0], vec![1.0, 4.0, 4.0]]).unwrap();
        let s = resample(&p, &layer, 5).unwrap();
        assert_eq!(s.len(), 5);
        assert_eq!(s.positions()[4], vec![1, 4, 4]);
        assert_eq!(s.intensities()[4], Intensity::Scalar(49.0));
    }

    #[derive(Debug)]
    struct CountingArray {
        computed: AtomicUsize,
    }

    impl DeferredArray for CountingArray {
        fn shape(&self) -> Vec<usize> {
            vec![10, 10]
        }

        fn compute(&self) -> Result<ArrayD<f64>> {
            self.computed.fetch_add(1, Ordering::SeqCst);
            Ok(Array2::from_shape_fn((10, 10), |(r, c)| (10 * r + c) as f64).into_dyn())
        }
    }

    #[test]
    fn deferred_data_is_computed_once() {
        let source = Arc::new(CountingArray {
            computed: AtomicUsize::new(0),
        });
        let layer = ImageLayer::deferred("lazy", source.clone());
        let s = resample(&path(&[[2.0, 0.0], [2.0, 8.0]]), &layer, 33).unwrap();

        assert_eq!(source.computed.load(Ordering::SeqCst), 1);
        assert_eq!(s.len(), 33);
        assert_eq!(s.intensities()[0], Intensity::Scalar(20.0));
        assert_eq!(s.intensities()[32], Intensity::Scalar(28.0));
    }

    #[test_case(2)]
    #[test_case(3)]
    #[test_case(50)]
    #[test_case(257)]
    fn distances_start_at_zero_and_never_decrease(n: usize) {
        let s = resample(
            &path(&[[1.0, 1.0], [8.0, 2.0], [3.0, 7.5], [9.0, 9.0]]),
            &ramp_layer(),
            n,
        )
        .unwrap();
        assert!(s.len() <= n);
        assert_relative_eq!(s.distances()[0], 0.0);
        for w in s.distances().windows(2) {
            assert!(w[1] >= w[0]);
        }
    }

    #[test]
    fn random_paths_stay_in_bounds_and_are_deterministic() {
        let layer = ramp_layer();
        let mut rng = rand::rng();
        for _ in 0..200 {
            let count = rng.random_range(2..6);
            let rows = (0..count)
                .map(|_| vec![rng.random_range(-8.0..18.0), rng.random_range(-8.0..18.0)])
                .collect::<Vec<_>>();
            let p = Path::from_rows(&rows).unwrap();
            let n = rng.random_range(2..100);

            let a = resample(&p, &layer, n).unwrap();
            let b = resample(&p, &layer, n).unwrap();
            assert_eq!(a, b);
            assert!(a.len() <= n);

            for pos in a.positions() {
                assert!(pos[0] < 10 && pos[1] < 10);
            }
            for w in a.distances().windows(2) {
                assert!(w[1] >= w[0]);
            }
        }
    }
}
