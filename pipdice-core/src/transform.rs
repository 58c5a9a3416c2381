/// Helpers for consumers that animate a die between two orientations
use nalgebra::{Matrix4, UnitQuaternion};

/// Ease-out cubic: fast start, gentle settle. `p` is clamped to `[0, 1]`.
pub fn ease_out_cubic(p: f32) -> f32 {
    let p = p.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// A roll animation from one orientation to a settle orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationTween {
    pub from: UnitQuaternion<f32>,
    pub to: UnitQuaternion<f32>,
}

impl OrientationTween {
    pub fn new(from: UnitQuaternion<f32>, to: UnitQuaternion<f32>) -> Self {
        Self { from, to }
    }

    /// Orientation after `progress` of the animation, eased and spherically interpolated
    pub fn sample(&self, progress: f32) -> UnitQuaternion<f32> {
        let t = ease_out_cubic(progress);
        // slerp is undefined for exactly opposite quaternions; nlerp is fine there
        self.from
            .try_slerp(&self.to, t, 1e-6)
            .unwrap_or_else(|| self.from.nlerp(&self.to, t))
    }
}

/// Matrices for placing a die in the scene
pub struct Transform;

impl Transform {
    /// Model matrix for a die turned by `rotation`
    pub fn model_matrix(rotation: &UnitQuaternion<f32>) -> Matrix4<f32> {
        rotation.to_homogeneous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ease_out_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_relative_eq!(ease_out_cubic(0.5), 0.875);
        assert_eq!(ease_out_cubic(-3.0), 0.0);
        assert_eq!(ease_out_cubic(7.0), 1.0);
    }

    #[test]
    fn test_tween_hits_both_ends() {
        let from = UnitQuaternion::from_euler_angles(0.3, -1.2, 2.0);
        let to = UnitQuaternion::from_euler_angles(-0.7, 0.4, 0.1);
        let tween = OrientationTween::new(from, to);
        // q and -q are the same rotation, so compare angles rather than coordinates
        assert!(tween.sample(0.0).angle_to(&from) < 1e-2);
        assert!(tween.sample(1.0).angle_to(&to) < 1e-2);
        assert_relative_eq!(tween.sample(0.5).quaternion().norm(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_tween_moves_quickly_then_settles() {
        let from = UnitQuaternion::identity();
        let to = UnitQuaternion::from_euler_angles(0.0, 1.5, 0.0);
        let tween = OrientationTween::new(from, to);
        let early = from.angle_to(&tween.sample(0.25));
        let late = tween.sample(0.75).angle_to(&to);
        assert!(early > late);
    }

    #[test]
    fn test_model_matrix_applies_rotation() {
        let rotation = UnitQuaternion::from_euler_angles(0.0, 0.0, std::f32::consts::FRAC_PI_2);
        let matrix = Transform::model_matrix(&rotation);
        let turned = matrix.transform_vector(&nalgebra::Vector3::x());
        assert_relative_eq!(turned, nalgebra::Vector3::y(), epsilon = 1e-6);
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::model_matrix(&UnitQuaternion::identity());
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }
}
