/// Triangle meshes as produced by the shape generator
use nalgebra::{Point3, Vector3};

use crate::error::{DiceError, Result};

/// A single triangle with explicit corner positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Point3<f32>; 3],
}

impl Triangle {
    pub fn new(v0: Point3<f32>, v1: Point3<f32>, v2: Point3<f32>) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's winding
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let [v0, v1, v2] = self.vertices;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }

    /// Face normal flipped, if needed, so it points away from the origin.
    ///
    /// Dice are centred on the origin, so this is the outward normal
    /// regardless of how the generator wound the triangle.
    pub fn outward_normal(&self) -> Vector3<f32> {
        let normal = self.calculate_normal();
        if normal.dot(&self.midpoint().coords) < 0.0 {
            -normal
        } else {
            normal
        }
    }

    pub fn midpoint(&self) -> Point3<f32> {
        let [v0, v1, v2] = self.vertices;
        Point3::from((v0.coords + v1.coords + v2.coords) / 3.0)
    }
}

/// A triangulated surface, either a plain triangle soup or an indexed mesh.
///
/// In the non-indexed form every three consecutive positions make a triangle.
/// In the indexed form `indices` holds three vertex indices per triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Point3<f32>>,
    pub indices: Option<Vec<usize>>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            indices: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity * 3),
            indices: None,
        }
    }

    /// Build an indexed mesh, rejecting indices that point past the vertex array.
    pub fn indexed(positions: Vec<Point3<f32>>, indices: Vec<usize>) -> Result<Self> {
        if let Some(&index) = indices.iter().find(|&&i| i >= positions.len()) {
            return Err(DiceError::IndexOutOfRange {
                index,
                vertices: positions.len(),
            });
        }
        Ok(Self {
            positions,
            indices: Some(indices),
        })
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Append a triangle to a non-indexed mesh
    pub fn add_triangle(&mut self, triangle: Triangle) {
        debug_assert!(!self.is_indexed(), "cannot append loose triangles to an indexed mesh");
        self.positions.extend_from_slice(&triangle.vertices);
    }

    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    /// Vertex indices of triangle `i`; `None` for non-indexed meshes or when
    /// `i` is past the last triangle
    pub fn triangle_indices(&self, i: usize) -> Option<[usize; 3]> {
        let corners = self.indices.as_ref()?.get(i * 3..i * 3 + 3)?;
        Some([corners[0], corners[1], corners[2]])
    }

    /// Triangle `i` with its corner positions resolved.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.triangle_count()`.
    pub fn triangle(&self, i: usize) -> Triangle {
        match &self.indices {
            Some(indices) => {
                let corners = &indices[i * 3..i * 3 + 3];
                Triangle::new(
                    self.positions[corners[0]],
                    self.positions[corners[1]],
                    self.positions[corners[2]],
                )
            }
            None => {
                let base = i * 3;
                Triangle::new(
                    self.positions[base],
                    self.positions[base + 1],
                    self.positions[base + 2],
                )
            }
        }
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.triangle_count()).map(move |i| self.triangle(i))
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_outward_normal_ignores_winding() {
        let a = Point3::new(1.0, 0.0, 1.0);
        let b = Point3::new(0.0, 1.0, 1.0);
        let c = Point3::new(0.0, 0.0, 1.0);
        let ccw = Triangle::new(c, a, b);
        let cw = Triangle::new(c, b, a);
        assert_relative_eq!(ccw.calculate_normal(), -cw.calculate_normal());
        assert_relative_eq!(ccw.outward_normal(), Vector3::z());
        assert_relative_eq!(cw.outward_normal(), Vector3::z());
    }

    #[test]
    fn test_indexed_triangles() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh = Mesh::indexed(positions, vec![0, 1, 2, 0, 2, 3]).unwrap();
        assert!(mesh.is_indexed());
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.triangle_indices(1), Some([0, 2, 3]));
        assert_eq!(mesh.triangle_indices(2), None);
        assert_eq!(mesh.triangle(1).vertices[2], Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_indexed_rejects_bad_index() {
        let positions = vec![Point3::origin(); 3];
        let err = Mesh::indexed(positions, vec![0, 1, 7]).unwrap_err();
        assert_eq!(err, DiceError::IndexOutOfRange { index: 7, vertices: 3 });
    }

    #[test]
    #[should_panic]
    fn test_triangle_past_end_panics() {
        let mut mesh = Mesh::new();
        mesh.add_triangle(Triangle::new(Point3::origin(), Point3::origin(), Point3::origin()));
        mesh.triangle(1);
    }

    #[test]
    fn test_soup_triangles() {
        let mut mesh = Mesh::new();
        mesh.add_triangle(Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ));
        assert!(!mesh.is_indexed());
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangle_indices(0), None);
        assert_relative_eq!(mesh.triangle(0).midpoint(), Point3::new(1.0 / 3.0, 1.0 / 3.0, 0.0));
    }
}
