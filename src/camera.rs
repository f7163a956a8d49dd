//! Perspective camera model used to turn pointer positions into rays.
//!
//! The controller never renders, so the camera only carries what ray
//! construction needs: a world pose and a projection. The host keeps it in sync
//! with whatever camera it actually draws with.

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::raycast::Ray;
use crate::{CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR};

/// Perspective camera described by its world pose and frustum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerspectiveCamera {
    /// World-space position of the eye.
    pub position: Vec3,
    /// World-space rotation; the camera looks down its local `-Z` axis.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Viewport width divided by height.
    pub aspect: f32,
    /// Distance to the near clipping plane.
    pub near: f32,
    /// Distance to the far clipping plane.
    pub far: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: CAMERA_FOV_DEGREES.to_radians(),
            aspect: 1.0,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }
}

impl PerspectiveCamera {
    /// Places the camera at `position` looking at `focus`.
    ///
    /// `up` is the world up axis. Returns the camera unchanged when `focus`
    /// coincides with `position`.
    #[must_use]
    pub fn looking_at(mut self, position: Vec3, focus: Vec3, up: Vec3) -> Self {
        self.position = position;
        let Some(forward) = (focus - position).try_normalize() else {
            return self;
        };
        let Some(right) = forward.cross(up).try_normalize() else {
            return self;
        };
        let true_up = right.cross(forward);
        self.rotation = Quat::from_mat3(&glam::Mat3::from_cols(right, true_up, -forward));
        self
    }

    /// Updates the aspect ratio after the viewport changes size.
    ///
    /// Zero-sized viewports are ignored so a minimised window keeps the last
    /// usable projection.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.aspect = width / height;
    }

    /// Returns the projection matrix for the current frustum.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Returns the camera-to-world transform.
    #[must_use]
    pub fn world_from_camera(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    /// Builds the world-space ray through `ndc`.
    ///
    /// The point is unprojected at depth `0.5` and the ray runs from the eye
    /// through it. Coordinates outside `[-1, 1]` are not clamped.
    ///
    /// # Examples
    /// ```
    /// use glam::{Vec2, Vec3};
    /// use ambler::camera::PerspectiveCamera;
    ///
    /// let camera = PerspectiveCamera::default();
    /// let ray = camera.ray_through(Vec2::ZERO).unwrap();
    /// assert!((ray.direction - Vec3::NEG_Z).length() < 1e-5);
    /// ```
    #[must_use]
    pub fn ray_through(&self, ndc: Vec2) -> Option<Ray> {
        let unproject = self.world_from_camera() * self.projection().inverse();
        let point = unproject.project_point3(ndc.extend(0.5));
        Ray::new(self.position, point - self.position)
    }
}

/// Converts a cursor position in window pixels to normalised device
/// coordinates.
///
/// The window origin is the top-left corner with `y` growing downwards; NDC
/// has `y` growing upwards. Returns `None` for an empty viewport. Positions
/// outside the viewport map outside `[-1, 1]`.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use ambler::camera::ndc_from_screen;
///
/// let ndc = ndc_from_screen(Vec2::new(0.0, 0.0), Vec2::new(800.0, 600.0)).unwrap();
/// assert_eq!(ndc, Vec2::new(-1.0, 1.0));
/// assert_eq!(ndc_from_screen(Vec2::ZERO, Vec2::ZERO), None);
/// ```
#[must_use]
pub fn ndc_from_screen(cursor: Vec2, viewport: Vec2) -> Option<Vec2> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return None;
    }
    Some(Vec2::new(
        cursor.x / viewport.x * 2.0 - 1.0,
        -(cursor.y / viewport.y) * 2.0 + 1.0,
    ))
}
