/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

/// Direction from the die towards the viewer.
///
/// Settle orientations bring the chosen face's normal onto this axis.
pub const VIEW_AXIS: Vector3<f32> = Vector3::new(0.0, 0.0, 1.0);

/// Distance from the die to the default camera
const DEFAULT_DISTANCE: f32 = 5.0;

/// Camera looking at a die centred on the origin
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Camera on the viewing axis, world +Y up
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::from(VIEW_AXIS * DEFAULT_DISTANCE),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: width as f32 / height as f32,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Unit vector from the target towards the camera
    pub fn view_direction(&self) -> Vector3<f32> {
        (self.position - self.target).normalize()
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Perspective projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Project a 3D point to 2D screen space, returning `(x, y, depth)`
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = self.projection_matrix() * self.view_matrix() * model_matrix;

        // transform_point performs the perspective divide
        let ndc = mvp.transform_point(point);
        if !ndc.coords.iter().all(|c| c.is_finite()) {
            return None;
        }

        if ndc.x < -1.0 || ndc.x > 1.0 || ndc.y < -1.0 || ndc.y > 1.0 {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc.z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
