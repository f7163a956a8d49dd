//! Float assertions for vectors and rotations.

use glam::{Quat, Vec3};

/// Assert that `actual` lies within `tolerance` of `expected`.
///
/// # Panics
/// Panics when the distance between the points exceeds `tolerance`.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use test_utils::assert_vec3_near;
/// assert_vec3_near(Vec3::new(1.0, 0.0, 0.0), Vec3::X, 1e-6);
/// ```
pub fn assert_vec3_near(actual: Vec3, expected: Vec3, tolerance: f32) {
    let distance = actual.distance(expected);
    assert!(
        distance <= tolerance,
        "expected {expected:?}, got {actual:?} (off by {distance})"
    );
}

/// Assert that two rotations differ by at most `tolerance` radians.
///
/// `q` and `-q` describe the same rotation and compare equal.
///
/// # Panics
/// Panics when the angle between the rotations exceeds `tolerance`.
pub fn assert_quat_near(actual: Quat, expected: Quat, tolerance: f32) {
    let angle = actual.angle_between(expected);
    assert!(
        angle <= tolerance,
        "expected {expected:?}, got {actual:?} (off by {angle} rad)"
    );
}

/// Local `+Z` axis of `orientation` in world space.
///
/// The controller orients actors so this axis points at their target.
pub fn forward(orientation: Quat) -> Vec3 {
    orientation * Vec3::Z
}
