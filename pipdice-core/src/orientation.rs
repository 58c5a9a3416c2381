/// Settle orientations: which rotation shows a given face to the viewer
use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};

use crate::config::Tolerances;
use crate::faces::Face;
use crate::projection::VIEW_AXIS;

/// Below this length a projected direction is considered degenerate
const MIN_TANGENT_LENGTH: f32 = 1e-6;

/// Rotation that turns `face` towards the viewer, using the default tolerances.
pub fn face_orientation(face: &Face, sides: u32) -> UnitQuaternion<f32> {
    face_orientation_with(face, sides, &Tolerances::default())
}

/// Rotation that turns `face` towards the viewer with its label upright.
///
/// The face normal ends up on [`VIEW_AXIS`] and the face's "up" direction on
/// world +Y. This is the inverse of [`label_orientation_with`].
pub fn face_orientation_with(face: &Face, sides: u32, tol: &Tolerances) -> UnitQuaternion<f32> {
    label_orientation_with(face, sides, tol).inverse()
}

pub fn label_orientation(face: &Face, sides: u32) -> UnitQuaternion<f32> {
    label_orientation_with(face, sides, &Tolerances::default())
}

/// Rotation that carries a label lying in the XY plane (facing +Z, upright
/// along +Y) onto `face`.
///
/// The normal alone leaves the spin about the normal free; the face's "up"
/// direction fixes it:
/// - d10: away from the pole on the face's side, so the tip sits under the label
/// - d6: world up projected onto the face
/// - everything else: towards the corner that best matches projected world up
pub fn label_orientation_with(face: &Face, sides: u32, tol: &Tolerances) -> UnitQuaternion<f32> {
    let normal = face.normal.normalize();
    let reference = if normal.dot(&Vector3::y()).abs() > tol.reference_parallel_dot {
        Vector3::z()
    } else {
        Vector3::y()
    };
    let candidate = tangent(&reference, &normal).unwrap_or_else(|| fallback_tangent(&normal));

    let up = match sides {
        6 => Some(candidate),
        10 => pole_up(face, &normal),
        _ => vertex_up(face, &normal, &candidate),
    }
    .unwrap_or(candidate);

    let right = up.cross(&normal);
    let basis = Matrix3::from_columns(&[right, up, normal]);
    UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(basis))
}

/// Component of `v` in the plane perpendicular to `normal`, normalized
fn tangent(v: &Vector3<f32>, normal: &Vector3<f32>) -> Option<Vector3<f32>> {
    let projected = v - normal * v.dot(normal);
    let length = projected.norm();
    (length > MIN_TANGENT_LENGTH).then(|| projected / length)
}

fn fallback_tangent(normal: &Vector3<f32>) -> Vector3<f32> {
    let axis = if normal.x.abs() < 0.9 { Vector3::x() } else { Vector3::z() };
    normal.cross(&axis).normalize()
}

fn pole_up(face: &Face, normal: &Vector3<f32>) -> Option<Vector3<f32>> {
    let upper = face.centroid.y >= 0.0;
    let pole = face.vertices.iter().max_by(|a, b| {
        let (a, b) = if upper { (a.y, b.y) } else { (-a.y, -b.y) };
        a.total_cmp(&b)
    })?;
    tangent(&(pole - face.centroid), normal).map(|towards_pole| -towards_pole)
}

fn vertex_up(face: &Face, normal: &Vector3<f32>, candidate: &Vector3<f32>) -> Option<Vector3<f32>> {
    face.vertices
        .iter()
        .filter_map(|v| tangent(&(v - face.centroid), normal))
        .max_by(|a, b| a.dot(candidate).total_cmp(&b.dot(candidate)))
}

/// The face whose normal points most directly at the viewer after `rotation`
pub fn facing_face(faces: &[Face], rotation: &UnitQuaternion<f32>) -> Option<usize> {
    faces
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| {
            let a = (rotation * a.normal).dot(&VIEW_AXIS);
            let b = (rotation * b.normal).dot(&VIEW_AXIS);
            a.total_cmp(&b)
        })
        .map(|(i, _)| i)
}
