/// Numeric tolerances shared by face extraction, numbering and orientation
use log::warn;
use std::str::FromStr;

/// Two triangles belong to the same logical face when their normals agree this closely.
pub const NORMAL_CLUSTER_DOT: f32 = 0.999;
/// Boundary vertices closer than this are treated as one vertex.
pub const VERTEX_MERGE_DISTANCE: f32 = 1e-3;
/// Per-component tie tolerance when ordering clusters by normal.
pub const NORMAL_SORT_TIE: f32 = 1e-3;
/// Faces whose normals have a dot product below this are opposite each other.
pub const OPPOSITE_DOT: f32 = -0.99;
/// Above this (absolute) dot product with world up, a face switches reference axis.
pub const REFERENCE_PARALLEL_DOT: f32 = 0.99;

/// Tolerance set used by the geometry engine.
///
/// Regular-solid generators differ slightly in precision across platforms,
/// so every threshold is adjustable rather than baked into the algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub normal_cluster_dot: f32,
    pub vertex_merge_distance: f32,
    pub normal_sort_tie: f32,
    pub opposite_dot: f32,
    pub reference_parallel_dot: f32,
}

impl Tolerances {
    pub const fn new() -> Self {
        Self {
            normal_cluster_dot: NORMAL_CLUSTER_DOT,
            vertex_merge_distance: VERTEX_MERGE_DISTANCE,
            normal_sort_tie: NORMAL_SORT_TIE,
            opposite_dot: OPPOSITE_DOT,
            reference_parallel_dot: REFERENCE_PARALLEL_DOT,
        }
    }

    /// Defaults, with individual fields overridden by `PIPDICE_*` environment variables.
    ///
    /// Recognised: `PIPDICE_NORMAL_CLUSTER_DOT`, `PIPDICE_VERTEX_MERGE_DISTANCE`,
    /// `PIPDICE_OPPOSITE_DOT`. Values that fail to parse are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut tolerances = Self::new();
        let fields: [(&str, &mut f32); 3] = [
            ("PIPDICE_NORMAL_CLUSTER_DOT", &mut tolerances.normal_cluster_dot),
            ("PIPDICE_VERTEX_MERGE_DISTANCE", &mut tolerances.vertex_merge_distance),
            ("PIPDICE_OPPOSITE_DOT", &mut tolerances.opposite_dot),
        ];
        for (key, field) in fields {
            let Some(raw) = lookup(key) else { continue };
            match f32::from_str(raw.trim()) {
                Ok(value) if value.is_finite() => *field = value,
                _ => warn!("ignoring {key}={raw:?}: not a finite number"),
            }
        }
        tolerances
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let tol = Tolerances::default();
        assert_eq!(tol.normal_cluster_dot, 0.999);
        assert_eq!(tol.vertex_merge_distance, 1e-3);
        assert_eq!(tol.opposite_dot, -0.99);
    }

    #[test]
    fn test_lookup_overrides_and_ignores_garbage() {
        let tol = Tolerances::from_lookup(|key| match key {
            "PIPDICE_NORMAL_CLUSTER_DOT" => Some("0.99".to_string()),
            "PIPDICE_OPPOSITE_DOT" => Some("not a number".to_string()),
            _ => None,
        });
        assert_eq!(tol.normal_cluster_dot, 0.99);
        assert_eq!(tol.opposite_dot, OPPOSITE_DOT);
        assert_eq!(tol.vertex_merge_distance, VERTEX_MERGE_DISTANCE);
    }
}
