//! Shared fixture for locomotion plugin behavioural tests.
//!
//! Builds a headless app through `test_utils::locomotion_app`, spawns one
//! pointer-controlled actor and records the events the plugin raises.

use std::fmt;
use std::sync::MutexGuard;

use ambler::{
    ActorArrived, ClipLoadFailed, ClipLoadPlan, ClipSource, Intent, Locomotion, LocomotionSettings,
    Phase, PerformIntent, PointerPress,
};
use bevy::ecs::prelude::On;
use bevy::prelude::*;

use crate::thread_safe_app::{lock_app, share, SharedApp, ThreadSafeApp};

/// Arrivals observed so far.
#[derive(Resource, Debug, Default)]
pub struct ArrivalLog(pub Vec<ActorArrived>);

/// Clip load failures observed so far.
#[derive(Resource, Debug, Default)]
pub struct FailureLog(pub Vec<ClipLoadFailed>);

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn record_arrival(event: On<ActorArrived>, mut log: ResMut<ArrivalLog>) {
    log.0.push(*event.event());
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn record_failure(event: On<ClipLoadFailed>, mut log: ResMut<FailureLog>) {
    log.0.push(event.event().clone());
}

/// App with one actor and event recorders installed.
#[derive(Clone)]
pub struct LocomotionFixture {
    app: SharedApp,
    actor: Entity,
}

impl fmt::Debug for LocomotionFixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocomotionFixture")
            .field("actor", &self.actor)
            .finish_non_exhaustive()
    }
}

impl LocomotionFixture {
    /// Builds the app, spawns an actor at `start` and runs the first frame.
    pub fn bootstrap(
        settings: LocomotionSettings,
        plan: ClipLoadPlan,
        source: impl ClipSource + Send + Sync + 'static,
        start: Vec3,
    ) -> Self {
        let source: Box<dyn ClipSource + Send + Sync> = Box::new(source);
        let mut app = test_utils::locomotion_app(settings, Some((plan, source)));
        app.init_resource::<ArrivalLog>()
            .init_resource::<FailureLog>()
            .add_observer(record_arrival)
            .add_observer(record_failure);
        let actor = test_utils::spawn_actor(&mut app, start);
        app.update();
        Self {
            app: share(app),
            actor,
        }
    }

    /// Locks the underlying `App`.
    pub fn app_guard(&self) -> MutexGuard<'_, ThreadSafeApp> {
        lock_app(&self.app)
    }

    /// Runs `frames` updates.
    pub fn tick(&self, frames: usize) {
        let mut app = self.app_guard();
        for _ in 0..frames {
            app.update();
        }
    }

    /// Presses the pointer `times` times at `ndc` within the current frame.
    pub fn press(&self, ndc: Vec2, times: usize) {
        let mut app = self.app_guard();
        for _ in 0..times {
            app.world_mut().trigger(PointerPress { ndc });
        }
    }

    /// Requests `intent` for every pointer-controlled actor.
    pub fn perform(&self, intent: Intent) {
        self.app_guard().world_mut().trigger(PerformIntent(intent));
    }

    /// Actor translation.
    pub fn position(&self) -> Vec3 {
        let app = self.app_guard();
        app.world()
            .get::<Transform>(self.actor)
            .map_or(Vec3::NAN, |transform| transform.translation)
    }

    /// Actor locomotion phase.
    pub fn phase(&self) -> Option<Phase> {
        let app = self.app_guard();
        app.world()
            .get::<Locomotion>(self.actor)
            .map(|locomotion| locomotion.navigator().phase())
    }

    /// Active clip name.
    pub fn clip(&self) -> Option<String> {
        let app = self.app_guard();
        app.world()
            .get::<Locomotion>(self.actor)
            .and_then(|locomotion| locomotion.navigator().active_clip())
            .map(|name| name.as_str().to_owned())
    }

    /// Whether the actor's mixer clock is running.
    pub fn animation_ready(&self) -> bool {
        let app = self.app_guard();
        app.world()
            .get::<Locomotion>(self.actor)
            .is_some_and(|locomotion| locomotion.navigator().animation().is_ready())
    }

    /// Turn rate the actor's navigator currently uses.
    pub fn turn_rate(&self) -> Option<f32> {
        let app = self.app_guard();
        app.world()
            .get::<Locomotion>(self.actor)
            .map(|locomotion| locomotion.navigator().settings().turn_rate)
    }

    /// Replaces the shared configuration resource.
    pub fn configure(&self, update: impl FnOnce(&mut LocomotionSettings)) {
        let mut app = self.app_guard();
        let mut config = app.world_mut().resource_mut::<ambler::LocomotionConfig>();
        update(&mut config.0);
    }

    /// Arrivals recorded so far.
    pub fn arrivals(&self) -> Vec<ActorArrived> {
        self.app_guard().world().resource::<ArrivalLog>().0.clone()
    }

    /// Failed clip names recorded so far.
    pub fn failures(&self) -> Vec<String> {
        self.app_guard()
            .world()
            .resource::<FailureLog>()
            .0
            .iter()
            .map(|failure| failure.0.name.as_str().to_owned())
            .collect()
    }

    /// The actor entity.
    pub const fn actor(&self) -> Entity {
        self.actor
    }
}
