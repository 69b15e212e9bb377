//! Marching cubes over a dense volume with a configurable cube size.

use super::IsoSurface;
use super::tables::{EDGE_CORNERS, TRIANGLES};
use crate::errors::InvalidInput;
use crate::{Point3, Result, Vector3};
use ndarray::ArrayView3;
use parry3d_f64::utils::hashmap::HashMap;

/// Extract the surface separating voxels with values above `level` from those at or below it.
///
/// Cubes span `step` voxels along each axis and start at every `step`-th index, so a larger step
/// gives a coarser mesh. Cube edges are shared between neighboring cubes and each crossed edge
/// produces exactly one vertex. A volume with no more than `step` voxels along some axis contains
/// no complete cube and gives an empty surface.
///
/// # Arguments
///
/// * `volume`: the scalar field, indexed `[axis0, axis1, axis2]`
/// * `level`: the iso-level of the surface
/// * `step`: the cube edge length in voxels, at least 1
///
/// returns: Result<IsoSurface, Box<dyn Error, Global>>
pub fn marching_cubes(volume: ArrayView3<f64>, level: f64, step: usize) -> Result<IsoSurface> {
    if step == 0 {
        return Err(InvalidInput::ZeroStep.into());
    }

    let (n0, n1, n2) = volume.dim();
    let mut surface = IsoSurface::default();
    if n0 <= step || n1 <= step || n2 <= step {
        return Ok(surface);
    }

    // Vertex index of every crossed edge, keyed by the edge's lower corner and its axis
    let mut edge_vertices: HashMap<([usize; 3], usize), u32> = HashMap::default();

    for i in (0..n0 - step).step_by(step) {
        for j in (0..n1 - step).step_by(step) {
            for k in (0..n2 - step).step_by(step) {
                let corners: [[usize; 3]; 8] = std::array::from_fn(|c| {
                    [
                        i + (c & 1) * step,
                        j + ((c >> 1) & 1) * step,
                        k + ((c >> 2) & 1) * step,
                    ]
                });
                let values = corners.map(|p| volume[p] - level);

                let config = values
                    .iter()
                    .enumerate()
                    .fold(0usize, |acc, (c, v)| acc | (usize::from(*v > 0.0) << c));
                if config == 0 || config == 255 {
                    continue;
                }

                let entry = TRIANGLES[config];
                let count = (entry & 0xF) as usize;
                let mut triangle = [0u32; 3];
                for n in 0..count * 3 {
                    let edge = ((entry >> (4 + 4 * n)) & 0xF) as usize;
                    let (a, b) = EDGE_CORNERS[edge];
                    let axis = edge / 4;

                    triangle[n % 3] = *edge_vertices.entry((corners[a], axis)).or_insert_with(|| {
                        push_vertex(
                            &mut surface,
                            corners[a],
                            axis,
                            step,
                            values[a],
                            values[b],
                            level,
                        )
                    });

                    if n % 3 == 2 {
                        surface.faces.push(triangle);
                    }
                }
            }
        }
    }

    compute_normals(&mut surface);
    Ok(surface)
}

/// Place a vertex on the edge leaving `corner` along `axis`, where the shifted field values at the
/// two ends are `va` and `vb` and lie on opposite sides of zero.
fn push_vertex(
    surface: &mut IsoSurface,
    corner: [usize; 3],
    axis: usize,
    step: usize,
    va: f64,
    vb: f64,
    level: f64,
) -> u32 {
    let t = va / (va - vb);
    let mut p = Point3::new(corner[0] as f64, corner[1] as f64, corner[2] as f64);
    p[axis] += t * step as f64;

    let index = surface.vertices.len() as u32;
    surface.vertices.push(p);
    surface.values.push(va.max(vb) + level);
    index
}

fn compute_normals(surface: &mut IsoSurface) {
    let mut normals = vec![Vector3::zeros(); surface.vertices.len()];
    for face in surface.faces.iter() {
        let [a, b, c] = face.map(|i| surface.vertices[i as usize]);
        let n = (c - b).cross(&(a - b));
        for i in face {
            normals[*i as usize] += n;
        }
    }

    surface.normals = normals
        .into_iter()
        .map(|n| n.try_normalize(1e-12).unwrap_or(n))
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array3;
    use test_case::test_case;

    fn sphere(n: usize, radius: f64) -> Array3<f64> {
        let c = (n - 1) as f64 / 2.0;
        Array3::from_shape_fn((n, n, n), |(i, j, k)| {
            let d = ((i as f64 - c).powi(2) + (j as f64 - c).powi(2) + (k as f64 - c).powi(2))
                .sqrt();
            radius - d
        })
    }

    #[test]
    fn constant_field_has_no_surface() {
        let v = Array3::from_elem((4, 4, 4), 1.0);
        assert!(marching_cubes(v.view(), 0.0, 1).unwrap().is_empty());
        let v = Array3::from_elem((4, 4, 4), -1.0);
        assert!(marching_cubes(v.view(), 0.0, 1).unwrap().is_empty());
    }

    #[test]
    fn single_corner_gives_one_triangle() {
        let mut v = Array3::zeros((2, 2, 2));
        v[[0, 0, 0]] = 1.0;
        let s = marching_cubes(v.view(), 0.5, 1).unwrap();
        assert_eq!(s.faces.len(), 1);
        assert_eq!(s.vertices.len(), 3);
        for p in s.vertices.iter() {
            assert_relative_eq!(p.coords.sum(), 0.5, epsilon = 1e-12);
        }
        for v in s.values.iter() {
            assert_relative_eq!(*v, 1.0);
        }
    }

    #[test]
    fn zero_step_is_an_error() {
        let v = Array3::<f64>::zeros((2, 2, 2));
        assert!(marching_cubes(v.view(), 0.0, 0).is_err());
    }

    #[test]
    fn volume_smaller_than_step_is_empty() {
        let v = sphere(3, 1.0);
        assert!(marching_cubes(v.view(), 0.0, 3).unwrap().is_empty());
    }

    #[test_case(1)]
    #[test_case(2)]
    fn sphere_surface_is_well_formed(step: usize) {
        let n = 21;
        let radius = 6.0;
        let s = marching_cubes(sphere(n, radius).view(), 0.0, step).unwrap();

        assert!(s.faces.len() > 50);
        assert_eq!(s.vertices.len(), s.normals.len());
        assert_eq!(s.vertices.len(), s.values.len());

        let c = Point3::new(10.0, 10.0, 10.0);
        for f in s.faces.iter() {
            for i in f {
                assert!((*i as usize) < s.vertices.len());
            }
        }
        for (p, n) in s.vertices.iter().zip(s.normals.iter()) {
            assert!(((p - c).norm() - radius).abs() < step as f64);
            assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn closed_surface_shares_every_edge_vertex() {
        // Each edge of a closed triangle mesh is used by exactly two faces
        let s = marching_cubes(sphere(15, 4.0).view(), 0.0, 1).unwrap();
        let mut edges: HashMap<(u32, u32), usize> = HashMap::default();
        for f in s.faces.iter() {
            for (a, b) in [(f[0], f[1]), (f[1], f[2]), (f[2], f[0])] {
                *edges.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        assert!(edges.values().all(|c| *c == 2));
    }

    #[test]
    fn normals_point_away_from_solid() {
        let s = marching_cubes(sphere(15, 4.0).view(), 0.0, 1).unwrap();
        let c = Point3::new(7.0, 7.0, 7.0);
        let outward = s
            .vertices
            .iter()
            .zip(s.normals.iter())
            .filter(|(p, n)| (*p - c).dot(n) > 0.0)
            .count();
        assert!(outward > s.vertices.len() * 9 / 10);
    }

    #[test]
    fn trimesh_conversion() {
        let s = marching_cubes(sphere(9, 3.0).view(), 0.0, 1).unwrap();
        let mesh = s.to_trimesh().unwrap();
        assert_eq!(mesh.indices().len(), s.faces.len());
    }
}
