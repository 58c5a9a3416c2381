//! PipDice Core - geometry and orientation engine for polyhedral dice
//!
//! Generates die meshes, recovers their logical faces, numbers them so that
//! opposite faces sum to `sides + 1`, and computes the rotation that shows a
//! chosen face to the viewer with its label upright. Everything here is pure,
//! synchronous computation; rendering and animation live with the caller.

pub mod config;
pub mod die;
pub mod error;
pub mod faces;
pub mod geometry;
pub mod label;
pub mod numbering;
pub mod orientation;
pub mod projection;
pub mod shapes;
pub mod transform;

// Re-export commonly used types
pub use config::Tolerances;
pub use die::{build_die, build_die_with, Die, LabelPlacement, Rgb};
pub use error::{DiceError, Result};
pub use faces::{extract_faces, extract_faces_with, Face};
pub use geometry::{Mesh, Triangle};
pub use label::{LabelBitmap, LabelCache, LabelImageGenerator, LabelStyle, RasterLabelGenerator};
pub use numbering::{assign_numbers, assign_numbers_with};
pub use orientation::{face_orientation, face_orientation_with, label_orientation};
pub use projection::{Camera, VIEW_AXIS};
pub use shapes::{generate, DieKind};
pub use transform::{ease_out_cubic, OrientationTween, Transform};
