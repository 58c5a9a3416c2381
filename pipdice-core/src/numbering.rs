/// Assigning the displayed number to each face of a die
use log::{debug, warn};

use crate::config::Tolerances;
use crate::faces::Face;

/// Numbers for the cube's faces in emission order (+X, -X, +Y, -Y, +Z, -Z).
///
/// Tied to the face order of [`crate::shapes::cube`], not derived from geometry.
/// Positions (0,1), (2,3) and (4,5) are opposite and sum to 7; a cube built
/// in another order needs this table re-derived.
pub const CUBE_NUMBERS: [u32; 6] = [1, 6, 2, 5, 3, 4];

/// Assign display numbers using the default tolerances.
pub fn assign_numbers(faces: &[Face], sides: u32) -> Vec<u32> {
    assign_numbers_with(faces, sides, &Tolerances::default())
}

/// Assign a display number (1-based) to every face.
///
/// Opposite faces sum to `faces.len() + 1` wherever an opposite partner
/// exists. Tetrahedra have no opposite faces and are numbered in order.
pub fn assign_numbers_with(faces: &[Face], sides: u32, tol: &Tolerances) -> Vec<u32> {
    let numbers = match sides {
        6 if faces.len() == CUBE_NUMBERS.len() => CUBE_NUMBERS.to_vec(),
        4 => (1..=faces.len() as u32).collect(),
        10 => number_trapezohedron(faces, tol),
        _ => number_sequential(faces, tol),
    };
    debug!("d{sides} numbering: {numbers:?}");
    numbers
}

/// Greedily pair each face with the first unused face pointing the other way
pub fn opposite_pairs(faces: &[Face], tol: &Tolerances) -> Vec<(usize, usize)> {
    let mut used = vec![false; faces.len()];
    let mut pairs = Vec::with_capacity(faces.len() / 2);
    for i in 0..faces.len() {
        if used[i] {
            continue;
        }
        let partner = (i + 1..faces.len())
            .find(|&j| !used[j] && faces[i].normal.dot(&faces[j].normal) < tol.opposite_dot);
        if let Some(j) = partner {
            used[i] = true;
            used[j] = true;
            pairs.push((i, j));
        }
    }
    if pairs.len() * 2 != faces.len() {
        warn!(
            "{} of {} faces have no opposite partner",
            faces.len() - pairs.len() * 2,
            faces.len()
        );
    }
    pairs
}

fn number_sequential(faces: &[Face], tol: &Tolerances) -> Vec<u32> {
    let target = faces.len() as u32 + 1;
    let mut numbers = vec![0; faces.len()];
    for (n, (i, j)) in (1..).zip(opposite_pairs(faces, tol)) {
        numbers[i] = n;
        numbers[j] = target - n;
    }
    fill_unpaired(&mut numbers);
    numbers
}

/// Odd numbers go around the upper pole in azimuth order, their partners below.
fn number_trapezohedron(faces: &[Face], tol: &Tolerances) -> Vec<u32> {
    let target = faces.len() as u32 + 1;
    let mut pairs: Vec<(usize, usize)> = opposite_pairs(faces, tol)
        .into_iter()
        .map(|(i, j)| {
            if faces[i].centroid.y >= faces[j].centroid.y {
                (i, j)
            } else {
                (j, i)
            }
        })
        .collect();
    let azimuth = |i: usize| faces[i].centroid.z.atan2(faces[i].centroid.x);
    pairs.sort_by(|a, b| azimuth(a.0).total_cmp(&azimuth(b.0)));

    let mut numbers = vec![0; faces.len()];
    for (k, (top, bottom)) in pairs.into_iter().enumerate() {
        let odd = 2 * k as u32 + 1;
        numbers[top] = odd;
        numbers[bottom] = target - odd;
    }
    fill_unpaired(&mut numbers);
    numbers
}

/// Give faces left at zero the smallest numbers not yet used
fn fill_unpaired(numbers: &mut [u32]) {
    let free: Vec<u32> = (1..=numbers.len() as u32)
        .filter(|n| !numbers.contains(n))
        .collect();
    let mut free = free.into_iter();
    for number in numbers.iter_mut().filter(|n| **n == 0) {
        if let Some(next) = free.next() {
            *number = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faces::extract_faces;
    use crate::shapes::generate;
    use nalgebra::{Point3, Vector3};

    fn numbered(sides: u32) -> (Vec<Face>, Vec<u32>) {
        let faces = extract_faces(&generate(sides), sides as usize).unwrap();
        let numbers = assign_numbers(&faces, sides);
        (faces, numbers)
    }

    fn assert_permutation(numbers: &[u32]) {
        let mut sorted = numbers.to_vec();
        sorted.sort_unstable();
        let expected: Vec<u32> = (1..=numbers.len() as u32).collect();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_cube_uses_fixed_table() {
        let (_, numbers) = numbered(6);
        assert_eq!(numbers, vec![1, 6, 2, 5, 3, 4]);
    }

    #[test]
    fn test_tetrahedron_in_extraction_order() {
        let (faces, numbers) = numbered(4);
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert!(opposite_pairs(&faces, &Tolerances::default()).is_empty());
    }

    #[test]
    fn test_opposite_faces_sum() {
        for sides in [6, 8, 10, 12, 20] {
            let (faces, numbers) = numbered(sides);
            assert_permutation(&numbers);
            let pairs = opposite_pairs(&faces, &Tolerances::default());
            assert_eq!(pairs.len() * 2, faces.len(), "d{sides} should pair fully");
            for (i, j) in pairs {
                assert_eq!(numbers[i] + numbers[j], sides + 1, "d{sides} faces {i},{j}");
            }
        }
    }

    #[test]
    fn test_d20_every_face_has_partner_summing_to_21() {
        let (faces, numbers) = numbered(20);
        for (i, face) in faces.iter().enumerate() {
            let partner = faces
                .iter()
                .position(|other| face.normal.dot(&other.normal) < -0.99)
                .unwrap();
            assert_eq!(numbers[i] + numbers[partner], 21);
        }
    }

    #[test]
    fn test_d10_odd_numbers_near_top_pole() {
        let (faces, numbers) = numbered(10);
        for (face, &n) in faces.iter().zip(&numbers) {
            if n % 2 == 1 {
                assert!(face.centroid.y > 0.0, "odd {n} should be on the upper half");
            } else {
                assert!(face.centroid.y < 0.0, "even {n} should be on the lower half");
            }
        }
    }

    #[test]
    fn test_d10_odd_numbers_follow_azimuth() {
        let (faces, numbers) = numbered(10);
        let mut top: Vec<(f32, u32)> = faces
            .iter()
            .zip(&numbers)
            .filter(|&(_, &n)| n % 2 == 1)
            .map(|(f, &n)| (f.centroid.z.atan2(f.centroid.x), n))
            .collect();
        top.sort_by(|a, b| a.0.total_cmp(&b.0));
        let order: Vec<u32> = top.into_iter().map(|(_, n)| n).collect();
        assert_eq!(order, vec![1, 3, 5, 7, 9]);
    }

    #[test]
    fn test_numbering_is_deterministic() {
        for sides in [8, 10, 12, 20] {
            assert_eq!(numbered(sides).1, numbered(sides).1);
        }
    }

    #[test]
    fn test_unpaired_faces_still_numbered() {
        let face = |x: f32, z: f32| Face {
            centroid: Point3::new(x, 0.0, z),
            normal: Vector3::new(x, 0.0, z).normalize(),
            vertices: Vec::new(),
        };
        let faces = vec![face(1.0, 0.0), face(0.0, 1.0), face(-1.0, 0.0)];
        let numbers = assign_numbers(&faces, 8);
        assert_eq!(numbers, vec![1, 2, 3]);
    }
}
