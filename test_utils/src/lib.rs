//! Utility helpers for tests.
//!
//! Shared fixtures for the integration suites: float assertions on `glam`
//! types, a scripted clip source, and a headless Bevy app preconfigured with
//! the locomotion plugin.

pub mod app;
pub mod clips;
pub mod geometry;

pub use app::{locomotion_app, spawn_actor, FRAME};
pub use clips::{standard_catalog, standard_plan, ScriptedClipSource};
pub use geometry::{assert_quat_near, assert_vec3_near, forward};
