//! Headless Bevy app preconfigured for locomotion tests.

use std::time::Duration;

use ambler::{
    ClipLoading, ClipSource, Locomotion, LocomotionConfig, LocomotionPlugin, LocomotionSettings,
    PerspectiveCamera, PointerControlled, Quad, ViewCamera, WalkableSet, WalkableSurfaces,
};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

/// Fixed frame step used by [`locomotion_app`].
pub const FRAME: Duration = Duration::from_millis(16);

/// Builds an app with the locomotion plugin, a 20×20 ground quad and a camera
/// looking down at the origin.
///
/// Time advances by [`FRAME`] on every update after the first.
pub fn locomotion_app(
    settings: LocomotionSettings,
    loading: Option<(ambler::ClipLoadPlan, Box<dyn ClipSource + Send + Sync>)>,
) -> App {
    let camera =
        PerspectiveCamera::default().looking_at(Vec3::new(0.0, 10.0, 0.01), Vec3::ZERO, Vec3::Y);
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
        .insert_resource(LocomotionConfig(settings))
        .insert_resource(ViewCamera(camera))
        .insert_resource(WalkableSet(
            WalkableSurfaces::new().with(Quad::ground(Vec3::ZERO, 20.0, 20.0)),
        ));
    if let Some((plan, source)) = loading {
        app.insert_resource(ClipLoading::new(&plan, source));
    }
    app.add_plugins(LocomotionPlugin);
    app.finish();
    app.cleanup();
    app
}

/// Spawns a pointer-controlled actor at `position`.
pub fn spawn_actor(app: &mut App, position: Vec3) -> Entity {
    let settings = app.world().resource::<LocomotionConfig>().0.clone();
    app.world_mut()
        .spawn((
            Transform::from_translation(position),
            Locomotion::new(settings),
            PointerControlled,
        ))
        .id()
}
