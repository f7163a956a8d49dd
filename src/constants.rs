//! Locomotion constants used as defaults across the controller.
//!
//! These values mirror the tuning of the interactive character scene. They can
//! be overridden at runtime through [`crate::settings::LocomotionSettings`].

/// Milliseconds of travel per unit of distance, before halving, for walking.
pub const WALK_MILLIS_PER_UNIT: f32 = 200.0;
/// Milliseconds of travel per unit of distance, before halving, for running.
pub const RUN_MILLIS_PER_UNIT: f32 = 100.0;
/// Cross-fade window between two animation clips, in seconds.
pub const BLEND_SECONDS: f32 = 0.5;
/// Maximum turn rate in radians per second of frame time.
pub const TURN_RATE: f32 = 400.0;
/// Window in which a second press counts as a double click, in milliseconds.
pub const DOUBLE_CLICK_MILLIS: u64 = 300;
/// Maximum pointer drift between two presses of a double click, in NDC units.
pub const DOUBLE_CLICK_SLOP: f32 = 0.01;
/// Vertical field of view of the default camera, in degrees.
pub const CAMERA_FOV_DEGREES: f32 = 75.0;
/// Near clipping plane of the default camera.
pub const CAMERA_NEAR: f32 = 0.1;
/// Far clipping plane of the default camera.
pub const CAMERA_FAR: f32 = 1000.0;
/// Tolerance on `1 - |a . b|` below which two orientations count as equal.
pub const TURN_EPSILON: f32 = 1e-6;
/// Clip played while the actor stands still.
pub const IDLE_CLIP: &str = "idle";
/// Clip played while walking to a target.
pub const WALK_CLIP: &str = "walk";
/// Clip played while running to a target.
pub const RUN_CLIP: &str = "run";
/// Clip played on demand to celebrate.
pub const CHEER_CLIP: &str = "cheer";
