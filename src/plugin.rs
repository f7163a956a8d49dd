//! Bevy plugin wiring the locomotion controller into the ECS schedule.
//!
//! Pointer presses and intents arrive as observer-driven events. Clip loading
//! and the per-frame navigator update run as chained systems in `Update`, so
//! an actor never ticks against a clip registry older than this frame's load
//! results.

use std::time::Duration;

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::{debug, warn};

use crate::animation::{
    ClipLoadError, ClipLoadPlan, ClipLoadQueue, ClipSource, LoadEvent, WeightMixer,
};
use crate::camera::{ndc_from_screen, PerspectiveCamera};
use crate::navigator::{Intent, Navigator, Pose};
use crate::pointer::{ClickClassifier, PointerGesture};
use crate::raycast::WalkableSurfaces;
use crate::settings::LocomotionSettings;

/// Camera used to turn pointer positions into rays.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewCamera(pub PerspectiveCamera);

/// Size in pixels of the window region the [`ViewCamera`] renders into.
///
/// Needed only by [`PointerScreenPress`]. While empty, screen presses are
/// dropped.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport(pub Vec2);

/// Surfaces the pointer can send actors to.
#[derive(Resource, Debug, Default)]
pub struct WalkableSet(pub WalkableSurfaces);

/// Settings applied to every [`Locomotion`] component.
///
/// Changing this resource reconfigures existing actors on the next frame.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct LocomotionConfig(pub LocomotionSettings);

/// Double-click state for pointer presses.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct PointerClicks(pub ClickClassifier);

/// Marker for actors that follow pointer gestures and intents.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct PointerControlled;

/// Locomotion state of one actor.
#[derive(Component, Debug)]
pub struct Locomotion {
    navigator: Navigator<WeightMixer>,
    loads_seen: usize,
}

impl Locomotion {
    /// Creates an idle controller using `settings`.
    #[must_use]
    pub fn new(settings: LocomotionSettings) -> Self {
        Self {
            navigator: Navigator::new(settings, WeightMixer::new()),
            loads_seen: 0,
        }
    }

    /// The actor's navigator.
    #[must_use]
    pub const fn navigator(&self) -> &Navigator<WeightMixer> {
        &self.navigator
    }

    /// Mutable access for hosts driving the navigator directly.
    pub fn navigator_mut(&mut self) -> &mut Navigator<WeightMixer> {
        &mut self.navigator
    }
}

impl Default for Locomotion {
    fn default() -> Self {
        Self::new(LocomotionSettings::default())
    }
}

/// Clip loading shared by every actor.
///
/// Settled load results are recorded in order so that actors spawned late
/// replay them. Progress reports are logged and dropped.
#[derive(Resource)]
pub struct ClipLoading {
    queue: ClipLoadQueue,
    source: Box<dyn ClipSource + Send + Sync>,
    history: Vec<LoadEvent>,
}

impl std::fmt::Debug for ClipLoading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipLoading")
            .field("queue", &self.queue)
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl ClipLoading {
    /// Loads `plan` from `source`, one entry at a time.
    pub fn new(plan: &ClipLoadPlan, source: impl ClipSource + Send + Sync + 'static) -> Self {
        Self {
            queue: ClipLoadQueue::new(plan),
            source: Box::new(source),
            history: Vec::new(),
        }
    }

    /// Whether every planned clip has settled.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.queue.is_settled()
    }

    /// Loaded, failed and settled events so far, in order.
    #[must_use]
    pub fn history(&self) -> &[LoadEvent] {
        &self.history
    }

    fn poll(&mut self) -> Vec<LoadEvent> {
        if self.queue.is_settled() {
            return Vec::new();
        }
        let events = self.queue.poll(self.source.as_mut());
        self.history.extend(
            events
                .iter()
                .filter(|event| !matches!(event, LoadEvent::Progress { .. }))
                .cloned(),
        );
        events
    }
}

/// A raw pointer press at a position in normalised device coordinates.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PointerPress {
    /// Pointer position in `[-1, 1]`.
    pub ndc: Vec2,
}

/// A raw pointer press in window pixels, origin at the top-left corner.
///
/// Converted through the [`Viewport`] into a [`PointerPress`].
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PointerScreenPress {
    /// Cursor position in pixels.
    pub cursor: Vec2,
}

/// A classified pointer gesture.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    /// Pointer position in `[-1, 1]`.
    pub ndc: Vec2,
    /// Recognised gesture.
    pub gesture: PointerGesture,
}

/// Request to switch every pointer-controlled actor to an intent's clip.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerformIntent(pub Intent);

/// Raised when an actor reaches its destination.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ActorArrived {
    /// Actor that arrived.
    pub entity: Entity,
    /// Destination reached.
    pub position: Vec3,
}

/// Raised when a planned clip fails to load.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ClipLoadFailed(pub ClipLoadError);

impl Pose for Transform {
    fn position(&self) -> Vec3 {
        self.translation
    }

    fn orientation(&self) -> Quat {
        self.rotation
    }

    fn set_position(&mut self, position: Vec3) {
        self.translation = position;
    }

    fn set_orientation(&mut self, orientation: Quat) {
        self.rotation = orientation;
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn on_screen_press(
    event: On<PointerScreenPress>,
    viewport: Res<Viewport>,
    mut commands: Commands,
) {
    let PointerScreenPress { cursor } = *event.event();
    match ndc_from_screen(cursor, viewport.0) {
        Some(ndc) => commands.trigger(PointerPress { ndc }),
        None => debug!("dropping press at {cursor:?}: viewport is empty"),
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn on_pointer_press(
    event: On<PointerPress>,
    time: Res<Time>,
    mut clicks: ResMut<PointerClicks>,
    mut commands: Commands,
) {
    let PointerPress { ndc } = *event.event();
    for gesture in clicks.0.press(time.elapsed(), ndc) {
        commands.trigger(PointerInput { ndc, gesture });
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn on_pointer_input(
    event: On<PointerInput>,
    camera: Res<ViewCamera>,
    surfaces: Res<WalkableSet>,
    mut actors: Query<(&Transform, &mut Locomotion), With<PointerControlled>>,
) {
    let PointerInput { ndc, gesture } = *event.event();
    for (transform, mut locomotion) in &mut actors {
        let request = locomotion.navigator.navigate_from_pointer(
            transform,
            ndc,
            gesture,
            &camera.0,
            &surfaces.0,
        );
        if request.is_none() {
            debug!("{gesture:?} at {ndc:?} produced no trip");
        }
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn on_perform_intent(
    event: On<PerformIntent>,
    mut actors: Query<&mut Locomotion, With<PointerControlled>>,
) {
    let PerformIntent(intent) = *event.event();
    for mut locomotion in &mut actors {
        locomotion.navigator.perform(intent);
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn log_clip_load_failure(event: On<ClipLoadFailed>) {
    let ClipLoadFailed(error) = event.event();
    warn!("clip load failed: {error}");
}

/// Polls the clip source once and reports failures as events.
pub fn poll_clip_loads_system(loading: Option<ResMut<ClipLoading>>, mut commands: Commands) {
    let Some(mut loading) = loading else {
        return;
    };
    for event in loading.poll() {
        match event {
            LoadEvent::Progress { name, fraction } => {
                debug!("loading `{name}`: {:.0}%", fraction * 100.0);
            }
            LoadEvent::Failed(error) => commands.trigger(ClipLoadFailed(error)),
            LoadEvent::Loaded(_) | LoadEvent::Settled => {}
        }
    }
}

/// Pushes new configuration into every actor and the click classifier.
pub fn apply_config_system(
    config: Res<LocomotionConfig>,
    mut clicks: ResMut<PointerClicks>,
    mut actors: Query<&mut Locomotion>,
) {
    if !config.is_changed() || config.is_added() {
        return;
    }
    let settings = &config.0;
    clicks.0 = ClickClassifier::new(settings.double_click_window(), settings.double_click_slop);
    for mut locomotion in &mut actors {
        locomotion.navigator.reconfigure(settings.clone());
    }
    debug!("locomotion settings applied");
}

/// Feeds pending load events to each actor, then runs its frame.
pub fn advance_locomotion_system(
    time: Res<Time>,
    loading: Option<Res<ClipLoading>>,
    mut actors: Query<(Entity, &mut Transform, &mut Locomotion)>,
    mut commands: Commands,
) {
    let history = loading.as_ref().map_or(&[][..], |loading| loading.history());
    let delta: Duration = time.delta();
    for (entity, mut transform, mut locomotion) in &mut actors {
        let Locomotion {
            navigator,
            loads_seen,
        } = &mut *locomotion;
        for event in history.get(*loads_seen..).unwrap_or_default() {
            navigator.on_load_event(event.clone());
        }
        *loads_seen = history.len();

        let report = navigator.tick(&mut *transform, delta);
        if let Some(position) = report.arrived {
            commands.trigger(ActorArrived { entity, position });
        }
    }
}

/// Plugin installing the locomotion controller.
#[derive(Default)]
pub struct LocomotionPlugin;

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PointerControlled>()
            .init_resource::<ViewCamera>()
            .init_resource::<WalkableSet>()
            .init_resource::<Viewport>()
            .init_resource::<LocomotionConfig>();

        let settings = &app.world().resource::<LocomotionConfig>().0;
        let clicks = PointerClicks(ClickClassifier::new(
            settings.double_click_window(),
            settings.double_click_slop,
        ));
        app.insert_resource(clicks);

        app.add_observer(on_screen_press)
            .add_observer(on_pointer_press)
            .add_observer(on_pointer_input)
            .add_observer(on_perform_intent)
            .add_observer(log_clip_load_failure);

        app.add_systems(
            Update,
            (
                apply_config_system,
                poll_clip_loads_system,
                advance_locomotion_system,
            )
                .chain(),
        );
    }
}
