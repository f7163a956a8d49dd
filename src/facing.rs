//! Orientation an actor needs to face its destination.
//!
//! The basis is built like a look-at whose eye sits on the *target* and whose
//! focus is the actor: the local `+Z` axis ends up pointing from the actor to
//! the target, which is the front of the character rigs this controller
//! drives.

use glam::{Mat3, Quat, Vec3};

/// Nudge applied to the look axis when it is parallel to `up`.
const PARALLEL_NUDGE: f32 = 1e-4;

/// Computes the orientation that faces from `position` toward `target`.
///
/// Returns `None` when the two points coincide, since no direction can be
/// derived from a zero-length look vector. When the look direction is parallel
/// to `up`, it is nudged off-axis before building the basis.
///
/// # Examples
/// ```
/// use glam::{Quat, Vec3};
/// use ambler::facing::facing_towards;
///
/// let facing = facing_towards(Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0), Vec3::Y).unwrap();
/// assert!(facing.angle_between(Quat::IDENTITY) < 1e-3);
///
/// assert!(facing_towards(Vec3::ONE, Vec3::ONE, Vec3::Y).is_none());
/// ```
#[must_use]
pub fn facing_towards(position: Vec3, target: Vec3, up: Vec3) -> Option<Quat> {
    let mut z = (target - position).try_normalize()?;
    let mut x = up.cross(z);

    if x.length_squared() <= f32::EPSILON {
        if (up.z.abs() - 1.0).abs() <= f32::EPSILON {
            z.x += PARALLEL_NUDGE;
        } else {
            z.z += PARALLEL_NUDGE;
        }
        z = z.normalize();
        x = up.cross(z);
    }

    let x = x.try_normalize()?;
    let y = z.cross(x);
    Some(Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize())
}
