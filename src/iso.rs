//! Isosurface extraction from dense 3D scalar fields.

mod marching_cubes;
mod tables;

pub use marching_cubes::marching_cubes;

use crate::{Point3, Result, Vector3};
use parry3d_f64::shape::TriMesh;
use serde::{Deserialize, Serialize};

/// A triangulated isosurface in array index space: vertex `(a, b, c)` lies at fractional indices
/// along the volume's axes 0, 1 and 2.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IsoSurface {
    pub vertices: Vec<Point3>,
    pub faces: Vec<[u32; 3]>,

    /// Unit vertex normals, accumulated from the adjacent faces.
    pub normals: Vec<Vector3>,

    /// For each vertex, the larger of the two field values on the cube edge it was placed on.
    pub values: Vec<f64>,
}

impl IsoSurface {
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Shift every vertex by `offset`, in index space.
    pub fn translated(mut self, offset: &Vector3) -> Self {
        for v in self.vertices.iter_mut() {
            *v += *offset;
        }
        self
    }

    /// Build a `parry3d` triangle mesh from the surface. Fails for an empty surface.
    pub fn to_trimesh(&self) -> Result<TriMesh> {
        Ok(TriMesh::new(self.vertices.clone(), self.faces.clone())?)
    }

    /// Write the surface as a binary STL file.
    #[cfg(feature = "stl")]
    pub fn write_stl(&self, path: &std::path::Path) -> Result<()> {
        use std::fs::File;
        use std::io::BufWriter;

        let triangles = self
            .faces
            .iter()
            .map(|f| {
                let [a, b, c] = f.map(|i| self.vertices[i as usize]);
                let n = (b - a).cross(&(c - a));
                let n = n.try_normalize(1e-12).unwrap_or_else(Vector3::zeros);
                stl_io::Triangle {
                    normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                    vertices: [a, b, c]
                        .map(|p| stl_io::Vertex::new([p.x as f32, p.y as f32, p.z as f32])),
                }
            })
            .collect::<Vec<_>>();

        let mut writer = BufWriter::new(File::create(path)?);
        stl_io::write_stl(&mut writer, triangles.iter())?;
        Ok(())
    }
}
