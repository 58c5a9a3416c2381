/// Triangulated solids for every supported die
use log::debug;
use nalgebra::{Point3, Vector3};

use crate::geometry::{Mesh, Triangle};

/// Circumradius of the tetrahedron, octahedron, dodecahedron and icosahedron
pub const POLY_RADIUS: f32 = 1.2;
/// Edge length of the cube, chosen to match the other dice visually
pub const CUBE_EDGE: f32 = 1.7;
/// Height of the pentagonal trapezohedron's poles above the equator
pub const D10_POLE_HEIGHT: f32 = 1.2;
/// Radius of the two five-vertex rings of the pentagonal trapezohedron
pub const D10_RING_RADIUS: f32 = 1.0;

/// Side count used for the mesh of an unsupported die
const FALLBACK_FACES: usize = 20;

/// The kinds of die the engine knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DieKind {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
    /// Any other side count; drawn as an unlabeled icosahedron
    Fallback(u32),
}

impl DieKind {
    pub fn from_sides(sides: u32) -> Self {
        match sides {
            4 => Self::D4,
            6 => Self::D6,
            8 => Self::D8,
            10 => Self::D10,
            12 => Self::D12,
            20 => Self::D20,
            other => Self::Fallback(other),
        }
    }

    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
            Self::Fallback(sides) => sides,
        }
    }

    /// Number of logical faces on the generated mesh
    pub fn face_count(self) -> usize {
        match self {
            Self::Fallback(_) => FALLBACK_FACES,
            kind => kind.sides() as usize,
        }
    }

    /// Whether faces of this die carry numbers that map back onto the mesh
    pub fn is_labeled(self) -> bool {
        !matches!(self, Self::Fallback(_))
    }

    pub fn mesh(self) -> Mesh {
        let mesh = match self {
            Self::D4 => tetrahedron(POLY_RADIUS),
            Self::D6 => cube(CUBE_EDGE),
            Self::D8 => octahedron(POLY_RADIUS),
            Self::D10 => pentagonal_trapezohedron(D10_POLE_HEIGHT, D10_RING_RADIUS),
            Self::D12 => dodecahedron(POLY_RADIUS),
            Self::D20 | Self::Fallback(_) => icosahedron(POLY_RADIUS),
        };
        debug!(
            "generated {:?} mesh: {} triangles ({})",
            self,
            mesh.triangle_count(),
            if mesh.is_indexed() { "indexed" } else { "non-indexed" }
        );
        mesh
    }
}

/// Generate the raw mesh for a die with the given number of sides.
///
/// Unsupported side counts get an icosahedron.
pub fn generate(sides: u32) -> Mesh {
    DieKind::from_sides(sides).mesh()
}

/// Regular tetrahedron with the given circumradius
pub fn tetrahedron(radius: f32) -> Mesh {
    let vertices = [
        Vector3::new(1.0, 1.0, 1.0),
        Vector3::new(-1.0, -1.0, 1.0),
        Vector3::new(-1.0, 1.0, -1.0),
        Vector3::new(1.0, -1.0, -1.0),
    ];
    // Each face sits opposite one vertex.
    let normals: Vec<Vector3<f32>> = vertices.iter().map(|v| -v).collect();
    convex_polyhedron(&vertices, &normals, radius)
}

/// Regular octahedron with the given circumradius
pub fn octahedron(radius: f32) -> Mesh {
    let vertices = signed_cyclic([1.0, 0.0, 0.0]);
    let normals = signed_cyclic([1.0, 1.0, 1.0]);
    convex_polyhedron(&vertices, &normals, radius)
}

/// Regular icosahedron with the given circumradius
pub fn icosahedron(radius: f32) -> Mesh {
    convex_polyhedron(&icosahedron_directions(), &dodecahedron_directions(), radius)
}

/// Regular dodecahedron with the given circumradius
pub fn dodecahedron(radius: f32) -> Mesh {
    convex_polyhedron(&dodecahedron_directions(), &icosahedron_directions(), radius)
}

/// Indexed cube with four vertices and two triangles per face.
///
/// Faces are emitted in the fixed order +X, -X, +Y, -Y, +Z, -Z, which the
/// cube's numbering table depends on.
pub fn cube(edge: f32) -> Mesh {
    let half = edge / 2.0;
    // (normal, u, v) with u x v = normal
    let planes = [
        (Vector3::x(), -Vector3::z(), Vector3::y()),
        (-Vector3::x(), Vector3::z(), Vector3::y()),
        (Vector3::y(), Vector3::x(), -Vector3::z()),
        (-Vector3::y(), Vector3::x(), Vector3::z()),
        (Vector3::z(), Vector3::x(), Vector3::y()),
        (-Vector3::z(), -Vector3::x(), Vector3::y()),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in planes {
        let base = positions.len();
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            positions.push(Point3::from((normal + u * su + v * sv) * half));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Mesh {
        positions,
        indices: Some(indices),
    }
}

/// Pentagonal trapezohedron (the ten-sided die) as a non-indexed mesh.
///
/// Poles sit at `(0, ±pole_height, 0)`. The two rings sit at `±h` with the
/// lower ring turned by 36°, where `h / pole_height = (1 - cos 36°) / (1 + cos 36°)`
/// keeps every kite planar. Each kite is two triangles sharing the pole.
pub fn pentagonal_trapezohedron(pole_height: f32, ring_radius: f32) -> Mesh {
    let cos36 = 36f32.to_radians().cos();
    let ring_height = pole_height * (1.0 - cos36) / (1.0 + cos36);

    let ring = |step: f32, y: f32| -> Vec<Point3<f32>> {
        (0..5)
            .map(|i| {
                let angle = (i as f32 * 72.0 + step).to_radians();
                Point3::new(ring_radius * angle.cos(), y, ring_radius * angle.sin())
            })
            .collect()
    };
    let upper = ring(0.0, ring_height);
    let lower = ring(36.0, -ring_height);
    let top = Point3::new(0.0, pole_height, 0.0);
    let bottom = Point3::new(0.0, -pole_height, 0.0);

    let mut mesh = Mesh::with_capacity(20);
    for i in 0..5 {
        let next = (i + 1) % 5;
        // Upper kite: top, upper[i], lower[i], upper[i + 1]
        push_outward(&mut mesh, top, upper[i], lower[i]);
        push_outward(&mut mesh, top, lower[i], upper[next]);
        // Lower kite: bottom, lower[i], upper[i + 1], lower[i + 1]
        push_outward(&mut mesh, bottom, lower[i], upper[next]);
        push_outward(&mut mesh, bottom, upper[next], lower[next]);
    }
    mesh
}

/// Build a convex solid from its vertex directions and face directions.
///
/// Each face collects the vertices that lie furthest along its direction,
/// orders them counter-clockwise seen from outside, and fans them into
/// triangles.
fn convex_polyhedron(vertices: &[Vector3<f32>], face_normals: &[Vector3<f32>], radius: f32) -> Mesh {
    let points: Vec<Point3<f32>> = vertices
        .iter()
        .map(|v| Point3::from(v.normalize() * radius))
        .collect();

    let mut mesh = Mesh::new();
    for normal in face_normals {
        let normal = normal.normalize();
        let reach = points
            .iter()
            .map(|p| p.coords.dot(&normal))
            .fold(f32::NEG_INFINITY, f32::max);
        let mut ring: Vec<Point3<f32>> = points
            .iter()
            .copied()
            .filter(|p| p.coords.dot(&normal) > reach - 1e-4 * radius)
            .collect();

        let center = ring.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords) / ring.len() as f32;
        let t1 = (ring[0].coords - center).normalize();
        let t2 = normal.cross(&t1);
        let angle = |p: &Point3<f32>| {
            let d = p.coords - center;
            d.dot(&t2).atan2(d.dot(&t1))
        };
        ring.sort_by(|a, b| angle(a).total_cmp(&angle(b)));

        for i in 1..ring.len() - 1 {
            push_outward(&mut mesh, ring[0], ring[i], ring[i + 1]);
        }
    }
    mesh
}

fn push_outward(mesh: &mut Mesh, a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) {
    let triangle = Triangle::new(a, b, c);
    if triangle.calculate_normal().dot(&triangle.midpoint().coords) < 0.0 {
        mesh.add_triangle(Triangle::new(a, c, b));
    } else {
        mesh.add_triangle(triangle);
    }
}

/// All sign variations of `base` under cyclic permutation of its axes
fn signed_cyclic(base: [f32; 3]) -> Vec<Vector3<f32>> {
    let mut out: Vec<Vector3<f32>> = Vec::new();
    for shift in 0..3 {
        for signs in 0..8u8 {
            let mut v = Vector3::zeros();
            for axis in 0..3 {
                let sign = if signs & (1 << axis) != 0 { -1.0 } else { 1.0 };
                v[(axis + shift) % 3] = base[axis] * sign;
            }
            if !out.iter().any(|o| (o - v).norm() < 1e-6) {
                out.push(v);
            }
        }
    }
    out
}

fn golden_ratio() -> f32 {
    (1.0 + 5f32.sqrt()) / 2.0
}

fn icosahedron_directions() -> Vec<Vector3<f32>> {
    signed_cyclic([0.0, 1.0, golden_ratio()])
}

fn dodecahedron_directions() -> Vec<Vector3<f32>> {
    let phi = golden_ratio();
    let mut directions = signed_cyclic([1.0, 1.0, 1.0]);
    directions.extend(signed_cyclic([0.0, phi, 1.0 / phi]));
    directions
}
