//! Small helpers for stepping and comparing orientations.
use glam::Quat;

use crate::TURN_EPSILON;

/// Rotates `current` toward `target` by at most `max_angle` radians.
///
/// The step follows the shorter arc. When the remaining angle fits within the
/// step, `target` is returned exactly so repeated calls settle.
///
/// # Examples
/// ```
/// use std::f32::consts::FRAC_PI_2;
/// use glam::Quat;
/// use ambler::vector_math::turn_towards;
///
/// let target = Quat::from_rotation_y(FRAC_PI_2);
/// let stepped = turn_towards(Quat::IDENTITY, target, 0.1);
/// assert!((stepped.angle_between(Quat::IDENTITY) - 0.1).abs() < 1e-3);
///
/// let settled = turn_towards(Quat::IDENTITY, target, 10.0);
/// assert_eq!(settled, target);
/// ```
#[must_use]
pub fn turn_towards(current: Quat, target: Quat, max_angle: f32) -> Quat {
    let step = max_angle.max(0.0);
    let remaining = current.angle_between(target);
    if remaining <= step {
        return target;
    }
    current.slerp(target, step / remaining).normalize()
}

/// Returns `true` when two orientations describe the same rotation.
///
/// `q` and `-q` are treated as equal. The comparison works on the dot product
/// so rounding in `acos` near zero cannot report a phantom turn.
#[must_use]
pub fn same_rotation(lhs: Quat, rhs: Quat) -> bool {
    lhs.dot(rhs).abs() >= 1.0 - TURN_EPSILON
}
