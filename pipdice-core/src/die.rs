/// Assembling dice: mesh, numbered faces, label placements and the
/// value-to-face lookup used when a roll result comes in
use log::{debug, warn};
use nalgebra::{Point3, UnitQuaternion};
use std::collections::HashMap;
use std::rc::Rc;

use crate::config::Tolerances;
use crate::error::{DiceError, Result};
use crate::faces::{extract_faces_with, Face};
use crate::geometry::Mesh;
use crate::label::{LabelCache, LabelImageGenerator, LabelStyle};
use crate::numbering::assign_numbers_with;
use crate::orientation::{face_orientation_with, facing_face, label_orientation_with};
use crate::shapes::DieKind;

/// How far a label floats above its face, to avoid z-fighting
pub const LABEL_OFFSET: f32 = 0.01;

/// Die body color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Result<Self> {
        let invalid = || DiceError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Where one face's label image goes, relative to the die's centre
#[derive(Debug)]
pub struct LabelPlacement<I> {
    pub value: u32,
    pub face: usize,
    pub position: Point3<f32>,
    /// Carries a label in the XY plane, facing +Z, onto the face
    pub rotation: UnitQuaternion<f32>,
    pub image: Rc<I>,
}

/// A built die. Face data is computed once and never mutated; restyling
/// builds a new die with [`Die::rebuild_with`].
#[derive(Debug)]
pub struct Die<I> {
    kind: DieKind,
    color: Rgb,
    style: LabelStyle,
    mesh: Mesh,
    faces: Vec<Face>,
    numbers: Vec<u32>,
    face_by_value: HashMap<u32, usize>,
    labels: Vec<LabelPlacement<I>>,
    tolerances: Tolerances,
}

/// Build a die with the default tolerances.
pub fn build_die<G: LabelImageGenerator>(
    sides: u32,
    color: Rgb,
    style: LabelStyle,
    images: &mut LabelCache<G>,
) -> Result<Die<G::Image>> {
    build_die_with(sides, color, style, images, Tolerances::default())
}

/// Build a die: generate its mesh, recover and number its faces, and
/// request one label image per face from `images`.
///
/// Unsupported side counts get an icosahedron with no face data; rolls on
/// such dice never resolve to an orientation.
pub fn build_die_with<G: LabelImageGenerator>(
    sides: u32,
    color: Rgb,
    style: LabelStyle,
    images: &mut LabelCache<G>,
    tolerances: Tolerances,
) -> Result<Die<G::Image>> {
    let kind = DieKind::from_sides(sides);
    let mesh = kind.mesh();

    let mut die = Die {
        kind,
        color,
        style,
        mesh,
        faces: Vec::new(),
        numbers: Vec::new(),
        face_by_value: HashMap::new(),
        labels: Vec::new(),
        tolerances,
    };
    if !kind.is_labeled() {
        warn!("d{sides} has no matching solid; its results will not map onto faces");
        return Ok(die);
    }

    let faces = extract_faces_with(&die.mesh, kind.face_count(), &tolerances)?;
    let numbers = assign_numbers_with(&faces, sides, &tolerances);

    die.labels = faces
        .iter()
        .zip(&numbers)
        .enumerate()
        .map(|(index, (face, &value))| LabelPlacement {
            value,
            face: index,
            position: face.centroid + face.normal * LABEL_OFFSET,
            rotation: label_orientation_with(face, sides, &tolerances),
            image: images.get(value, style),
        })
        .collect();
    die.face_by_value = numbers.iter().enumerate().map(|(i, &n)| (n, i)).collect();
    die.faces = faces;
    die.numbers = numbers;

    debug!("built d{sides} with {} labeled faces", die.labels.len());
    Ok(die)
}

impl<I> Die<I> {
    pub fn kind(&self) -> DieKind {
        self.kind
    }

    pub fn sides(&self) -> u32 {
        self.kind.sides()
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn style(&self) -> LabelStyle {
        self.style
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Extracted faces; empty for unlabeled dice
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Display value of each face, indexed like [`Die::faces`]
    pub fn numbers(&self) -> &[u32] {
        &self.numbers
    }

    pub fn labels(&self) -> &[LabelPlacement<I>] {
        &self.labels
    }

    pub fn is_labeled(&self) -> bool {
        !self.faces.is_empty()
    }

    pub fn face_for_value(&self, value: u32) -> Option<usize> {
        self.face_by_value.get(&value).copied()
    }

    /// Settle orientation showing `value` to the viewer.
    ///
    /// `None` when the die has no face data or no face carries `value`;
    /// callers should fall back to a default or random orientation.
    pub fn resolve_orientation(&self, value: u32) -> Option<UnitQuaternion<f32>> {
        let face = &self.faces[self.face_for_value(value)?];
        Some(face_orientation_with(face, self.sides(), &self.tolerances))
    }

    /// Value on the face turned most directly towards the viewer by `rotation`
    pub fn face_facing(&self, rotation: &UnitQuaternion<f32>) -> Option<u32> {
        facing_face(&self.faces, rotation).map(|i| self.numbers[i])
    }

    /// A fresh die of the same kind with a new color or label style
    pub fn rebuild_with<G: LabelImageGenerator<Image = I>>(
        &self,
        color: Rgb,
        style: LabelStyle,
        images: &mut LabelCache<G>,
    ) -> Result<Self> {
        build_die_with(self.sides(), color, style, images, self.tolerances)
    }
}
