/// Recovering logical polygon faces from a triangle mesh
use log::{debug, trace};
use nalgebra::{Point3, Vector3};
use std::cmp::Ordering;

use crate::config::Tolerances;
use crate::error::{DiceError, Result};
use crate::geometry::Mesh;

/// One polygon of a die, reconstructed from the triangles that make it up
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub centroid: Point3<f32>,
    /// Unit normal pointing away from the die's centre
    pub normal: Vector3<f32>,
    /// Distinct corner positions, in the order they were first seen
    pub vertices: Vec<Point3<f32>>,
}

/// Extract `expected_faces` logical faces using the default tolerances.
pub fn extract_faces(mesh: &Mesh, expected_faces: usize) -> Result<Vec<Face>> {
    extract_faces_with(mesh, expected_faces, &Tolerances::default())
}

/// Extract `expected_faces` logical faces from `mesh`.
///
/// Indexed meshes are assumed to store each face's triangles contiguously
/// and are split into equal groups. Triangle soups are clustered by normal,
/// since flat-shaded generators give no guarantee about emission order.
pub fn extract_faces_with(mesh: &Mesh, expected_faces: usize, tol: &Tolerances) -> Result<Vec<Face>> {
    if expected_faces == 0 {
        return Err(DiceError::NoFaces);
    }
    let faces = if mesh.is_indexed() {
        extract_indexed(mesh, expected_faces)?
    } else {
        extract_clustered(mesh, tol)
    };
    if faces.len() != expected_faces {
        return Err(DiceError::FaceCountMismatch {
            expected: expected_faces,
            found: faces.len(),
        });
    }
    debug!("extracted {} faces from {} triangles", faces.len(), mesh.triangle_count());
    Ok(faces)
}

fn extract_indexed(mesh: &Mesh, expected_faces: usize) -> Result<Vec<Face>> {
    let triangles = mesh.triangle_count();
    if triangles == 0 || triangles % expected_faces != 0 {
        return Err(DiceError::MalformedGeometry {
            triangles,
            faces: expected_faces,
        });
    }
    let per_face = triangles / expected_faces;

    let mut faces = Vec::with_capacity(expected_faces);
    for group in 0..expected_faces {
        let first = group * per_face;
        let mut sum = Vector3::zeros();
        let mut touched = 0usize;
        let mut seen: Vec<usize> = Vec::new();
        for t in first..first + per_face {
            let Some(corners) = mesh.triangle_indices(t) else {
                continue;
            };
            for index in corners {
                sum += mesh.positions[index].coords;
                touched += 1;
                if !seen.contains(&index) {
                    seen.push(index);
                }
            }
        }

        let centroid = Point3::from(sum / touched as f32);
        let normal = mesh.triangle(first).calculate_normal();
        let normal = if normal.dot(&centroid.coords) < 0.0 { -normal } else { normal };

        faces.push(Face {
            centroid,
            normal,
            vertices: seen.into_iter().map(|i| mesh.positions[i]).collect(),
        });
    }
    Ok(faces)
}

struct Cluster {
    /// Normal of the first triangle, used for membership tests
    seed: Vector3<f32>,
    normal_sum: Vector3<f32>,
    corners: Vec<Point3<f32>>,
}

fn extract_clustered(mesh: &Mesh, tol: &Tolerances) -> Vec<Face> {
    let mut clusters: Vec<Cluster> = Vec::new();
    for triangle in mesh.triangles() {
        let normal = triangle.outward_normal();
        match clusters
            .iter_mut()
            .find(|c| c.seed.dot(&normal) > tol.normal_cluster_dot)
        {
            Some(cluster) => {
                cluster.normal_sum += normal;
                cluster.corners.extend_from_slice(&triangle.vertices);
            }
            None => clusters.push(Cluster {
                seed: normal,
                normal_sum: normal,
                corners: triangle.vertices.to_vec(),
            }),
        }
    }
    trace!("clustered {} triangles into {} groups", mesh.triangle_count(), clusters.len());

    let mut faces: Vec<Face> = clusters
        .into_iter()
        .map(|cluster| {
            let vertices = dedup_points(&cluster.corners, tol.vertex_merge_distance);
            let sum = vertices.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords);
            Face {
                centroid: Point3::from(sum / vertices.len() as f32),
                normal: cluster.normal_sum.normalize(),
                vertices,
            }
        })
        .collect();

    faces.sort_by(|a, b| compare_normals(&a.normal, &b.normal, tol.normal_sort_tie));
    faces
}

/// Lexicographic order on x, then y, then z, treating near-equal components as ties
fn compare_normals(a: &Vector3<f32>, b: &Vector3<f32>, tie: f32) -> Ordering {
    for axis in 0..3 {
        if (a[axis] - b[axis]).abs() > tie {
            return a[axis].total_cmp(&b[axis]);
        }
    }
    Ordering::Equal
}

fn dedup_points(points: &[Point3<f32>], distance: f32) -> Vec<Point3<f32>> {
    let mut unique: Vec<Point3<f32>> = Vec::new();
    for p in points {
        if !unique.iter().any(|u| (u - p).norm() < distance) {
            unique.push(*p);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{generate, CUBE_EDGE};
    use approx::assert_relative_eq;

    #[test]
    fn test_face_counts_for_every_die() {
        for sides in [4, 6, 8, 10, 12, 20] {
            let faces = extract_faces(&generate(sides), sides as usize).unwrap();
            assert_eq!(faces.len(), sides as usize);
        }
    }

    #[test]
    fn test_no_duplicate_normals() {
        for sides in [4, 6, 8, 10, 12, 20] {
            let faces = extract_faces(&generate(sides), sides as usize).unwrap();
            for (i, a) in faces.iter().enumerate() {
                assert_relative_eq!(a.normal.norm(), 1.0, epsilon = 1e-5);
                for b in &faces[i + 1..] {
                    assert!(a.normal.dot(&b.normal) < 0.999, "d{sides} has duplicate faces");
                }
            }
        }
    }

    #[test]
    fn test_boundary_vertex_counts() {
        let expected = [(4, 3), (6, 4), (8, 3), (10, 4), (12, 5), (20, 3)];
        for (sides, corners) in expected {
            for face in extract_faces(&generate(sides), sides as usize).unwrap() {
                assert_eq!(face.vertices.len(), corners, "d{sides}");
            }
        }
    }

    #[test]
    fn test_cube_faces_follow_emission_order() {
        let faces = extract_faces(&generate(6), 6).unwrap();
        let half = CUBE_EDGE / 2.0;
        assert_relative_eq!(faces[0].normal, Vector3::x(), epsilon = 1e-6);
        assert_relative_eq!(faces[0].centroid, Point3::new(half, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(faces[3].normal, -Vector3::y(), epsilon = 1e-6);
        assert_relative_eq!(faces[5].centroid, Point3::new(0.0, 0.0, -half), epsilon = 1e-6);
    }

    #[test]
    fn test_clusters_sorted_by_normal() {
        let faces = extract_faces(&generate(20), 20).unwrap();
        for pair in faces.windows(2) {
            assert_ne!(
                compare_normals(&pair[0].normal, &pair[1].normal, 1e-3),
                Ordering::Greater
            );
        }
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let mesh = generate(12);
        assert_eq!(extract_faces(&mesh, 12).unwrap(), extract_faces(&mesh, 12).unwrap());
    }

    #[test]
    fn test_centroid_lies_on_face_plane() {
        for sides in [4, 8, 10, 12, 20] {
            for face in extract_faces(&generate(sides), sides as usize).unwrap() {
                for v in &face.vertices {
                    assert_relative_eq!((v - face.centroid).dot(&face.normal), 0.0, epsilon = 1e-4);
                }
            }
        }
    }

    #[test]
    fn test_indexed_mesh_must_divide_evenly() {
        let err = extract_faces(&generate(6), 5).unwrap_err();
        assert_eq!(err, DiceError::MalformedGeometry { triangles: 12, faces: 5 });
    }

    #[test]
    fn test_empty_indexed_mesh_is_malformed() {
        let mesh = Mesh::indexed(vec![Point3::origin(); 3], Vec::new()).unwrap();
        let err = extract_faces(&mesh, 6).unwrap_err();
        assert_eq!(err, DiceError::MalformedGeometry { triangles: 0, faces: 6 });
    }

    #[test]
    fn test_cluster_count_mismatch_and_zero() {
        let err = extract_faces(&generate(8), 6).unwrap_err();
        assert_eq!(err, DiceError::FaceCountMismatch { expected: 6, found: 8 });
        assert_eq!(extract_faces(&generate(8), 0).unwrap_err(), DiceError::NoFaces);
    }
}
