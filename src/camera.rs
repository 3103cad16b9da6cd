//! Fixed perspective camera for viewport fitting and unprojection.

use glam::{Mat4, Vec2, Vec3};

/// Perspective camera looking at the origin from the +Z axis.
///
/// The camera never moves at runtime; it exists so the image mapper can fit
/// content to the visible viewport and so pointer coordinates can be
/// unprojected into world space.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Viewport width / height.
    pub aspect: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    /// Camera position; defaults to 500 units up the Z axis.
    pub position: Vec3,
}

impl Camera {
    /// Create a camera with the engine's default framing.
    pub fn new() -> Self {
        Self {
            fov_y_degrees: 75.0,
            aspect: 1.0,
            near: 0.1,
            far: 2000.0,
            position: Vec3::new(0.0, 0.0, 500.0),
        }
    }

    /// Update the aspect ratio from a viewport size in pixels.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// World-space size of the viewport at the z = 0 plane.
    ///
    /// `height = 2 * tan(fov/2) * distance`, width follows from the aspect
    /// ratio. Used to fit image content inside the visible frustum.
    pub fn world_viewport(&self) -> Vec2 {
        let fov = self.fov_y_degrees.to_radians();
        let height = 2.0 * (fov / 2.0).tan() * self.position.z;
        Vec2::new(height * self.aspect, height)
    }

    /// View matrix looking at the origin with +Y up.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }

    /// Projection matrix for this camera.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Combined view-projection matrix.
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
