//! Polylines in world coordinates.

use crate::errors::InvalidInput;
use crate::na::DVector;
use crate::{Point2, Result};
use itertools::Itertools;

/// An ordered polyline of at least two points in world (display) coordinates. All points have the
/// same number of coordinates, one per spatial axis of the layers it is sampled against, in the
/// host's axis order.
///
/// A `Path` is never edited in place; a user edit produces a new `Path`, so equality by value is
/// enough to detect whether the path has changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    points: Vec<DVector<f64>>,
}

impl Path {
    /// Create a path from its vertices, checking that there are at least two of them and that they
    /// all have the same dimension.
    pub fn try_new(points: Vec<DVector<f64>>) -> Result<Self> {
        if points.len() < 2 {
            return Err(InvalidInput::NotEnoughPoints(points.len()).into());
        }

        if !points.iter().map(|p| p.len()).all_equal() || points[0].is_empty() {
            return Err(InvalidInput::RaggedPath.into());
        }

        Ok(Self { points })
    }

    /// Create a path from rows of coordinates, one row per vertex.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        Self::try_new(rows.iter().map(|r| DVector::from_column_slice(r)).collect())
    }

    /// Create a 2D path. The point's `x` and `y` are taken as the first and second axis, matching
    /// the `(row, column)` order of the image arrays they are sampled against.
    pub fn from_points2(points: &[Point2]) -> Result<Self> {
        Self::try_new(
            points
                .iter()
                .map(|p| DVector::from_column_slice(&[p.x, p.y]))
                .collect(),
        )
    }

    pub fn points(&self) -> &[DVector<f64>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of coordinates of each vertex.
    pub fn ndim(&self) -> usize {
        self.points[0].len()
    }

    /// Cumulative Euclidean length at each vertex, starting with 0.0 at the first vertex.
    pub fn cumulative_lengths(&self) -> Vec<f64> {
        let mut lengths = Vec::with_capacity(self.points.len());
        lengths.push(0.0);
        let mut total = 0.0;
        for (a, b) in self.points.iter().tuple_windows() {
            total += (b - a).norm();
            lengths.push(total);
        }
        lengths
    }

    /// Total arc length of the polyline.
    pub fn length(&self) -> f64 {
        self.points
            .iter()
            .tuple_windows()
            .map(|(a, b)| (b - a).norm())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_single_point() {
        let e = Path::from_rows(&[vec![0.0, 1.0]]).unwrap_err();
        let e = e.downcast_ref::<InvalidInput>().unwrap();
        assert_eq!(*e, InvalidInput::NotEnoughPoints(1));
    }

    #[test]
    fn rejects_ragged_points() {
        let e = Path::from_rows(&[vec![0.0, 1.0], vec![0.0, 1.0, 2.0]]).unwrap_err();
        assert!(matches!(
            e.downcast_ref::<InvalidInput>(),
            Some(InvalidInput::RaggedPath)
        ));
    }

    #[test]
    fn cumulative_lengths_of_polyline() {
        let p = Path::from_rows(&[vec![0.0, 0.0], vec![3.0, 4.0], vec![3.0, 10.0]]).unwrap();
        let l = p.cumulative_lengths();
        assert_eq!(l.len(), 3);
        assert_relative_eq!(l[0], 0.0);
        assert_relative_eq!(l[1], 5.0);
        assert_relative_eq!(l[2], 11.0);
        assert_relative_eq!(p.length(), 11.0);
    }

    #[test]
    fn from_points2_keeps_axis_order() {
        let p = Path::from_points2(&[Point2::new(1.0, 2.0), Point2::new(3.0, 4.0)]).unwrap();
        assert_eq!(p.ndim(), 2);
        assert_relative_eq!(p.points()[1][0], 3.0);
        assert_relative_eq!(p.points()[1][1], 4.0);
    }
}
