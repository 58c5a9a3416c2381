/// Errors raised while building dice geometry
use thiserror::Error;

/// Everything that can go wrong while turning a mesh into numbered faces.
///
/// A missing settle orientation is not an error; see
/// [`Die::resolve_orientation`](crate::die::Die::resolve_orientation).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    /// Indexed meshes are consumed in equal triangle groups per face.
    #[error("mesh has {triangles} triangles, which cannot be split evenly into {faces} faces")]
    MalformedGeometry { triangles: usize, faces: usize },

    #[error("expected {expected} faces but recovered {found}")]
    FaceCountMismatch { expected: usize, found: usize },

    #[error("a die needs at least one face")]
    NoFaces,

    #[error("triangle index {index} is out of range for {vertices} vertices")]
    IndexOutOfRange { index: usize, vertices: usize },

    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),
}

pub type Result<T> = std::result::Result<T, DiceError>;
