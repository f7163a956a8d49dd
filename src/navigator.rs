//! Per-actor controller tying pointer input, motion and animation together.
//!
//! A [`Navigator`] owns the motion driver and the animation switcher for one
//! actor. It never owns the actor itself: the pose is passed in through the
//! [`Pose`] trait on every call, so the host keeps its own representation.

use glam::{Quat, Vec2, Vec3};
use log::{debug, info, warn};

use crate::animation::{AnimationSwitcher, ClipName, LoadEvent, Mixer, Transition};
use crate::camera::PerspectiveCamera;
use crate::motion::{Gait, MotionDriver, NavigationRequest};
use crate::pointer::{resolve_target, PointerGesture};
use crate::raycast::WalkableSurfaces;
use crate::settings::LocomotionSettings;

/// Animation state the controller can be asked to enter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Stand still.
    Idle,
    /// Walk to a target.
    Walk,
    /// Run to a target.
    Run,
    /// Celebrate in place.
    Cheer,
}

impl From<Gait> for Intent {
    fn from(gait: Gait) -> Self {
        match gait {
            Gait::Walk => Self::Walk,
            Gait::Run => Self::Run,
        }
    }
}

/// Locomotion phase of the actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// No trip in flight.
    #[default]
    Idle,
    /// Travelling with the given gait.
    Moving(Gait),
}

/// World pose the controller reads and writes.
#[cfg_attr(test, mockall::automock)]
pub trait Pose {
    /// World-space position.
    fn position(&self) -> Vec3;
    /// World-space orientation.
    fn orientation(&self) -> Quat;
    /// Moves the actor.
    fn set_position(&mut self, position: Vec3);
    /// Rotates the actor.
    fn set_orientation(&mut self, orientation: Quat);
}

/// Minimal pose for hosts without a scene graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Actor {
    /// World-space position.
    pub position: Vec3,
    /// World-space orientation.
    pub orientation: Quat,
}

impl Default for Actor {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

impl Actor {
    /// Creates an actor at `position` with the identity orientation.
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
        }
    }
}

impl Pose for Actor {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn orientation(&self) -> Quat {
        self.orientation
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
    }
}

/// Click-to-navigate controller for a single actor.
#[derive(Debug)]
pub struct Navigator<M> {
    pub(crate) settings: LocomotionSettings,
    pub(crate) motion: MotionDriver,
    pub(crate) animation: AnimationSwitcher<M>,
    pub(crate) phase: Phase,
}

impl<M: Mixer> Navigator<M> {
    /// Creates an idle navigator driving `mixer`.
    pub fn new(settings: LocomotionSettings, mixer: M) -> Self {
        Self {
            motion: MotionDriver::new(settings.turn_rate, settings.easing),
            animation: AnimationSwitcher::new(mixer, settings.blend_seconds),
            settings,
            phase: Phase::Idle,
        }
    }

    /// Starts travelling from the pose's position to `target`.
    ///
    /// Any trip in flight is replaced. Returns `None` and leaves every state
    /// untouched when `target` coincides with the current position.
    pub fn navigate(
        &mut self,
        pose: &impl Pose,
        target: Vec3,
        gait: Gait,
    ) -> Option<NavigationRequest> {
        let from = pose.position();
        let Some(request) = NavigationRequest::plan(
            from,
            target,
            self.settings.up,
            gait,
            self.settings.millis_per_unit(gait),
        ) else {
            debug!("ignoring navigation to current position {from:?}");
            return None;
        };
        self.perform(gait.into());
        self.motion.begin(from, request);
        self.phase = Phase::Moving(gait);
        info!(
            "{gait:?} to {target:?}: {:.2} units in {:?}",
            request.distance, request.duration
        );
        Some(request)
    }

    /// Resolves a pointer gesture at `ndc` and navigates to the hit point.
    ///
    /// Returns `None` when the pointer misses every walkable surface.
    pub fn navigate_from_pointer(
        &mut self,
        pose: &impl Pose,
        ndc: Vec2,
        gesture: PointerGesture,
        camera: &PerspectiveCamera,
        surfaces: &WalkableSurfaces,
    ) -> Option<NavigationRequest> {
        let target = resolve_target(ndc, camera, surfaces)?;
        self.navigate(pose, target, gesture.gait())
    }

    /// Switches to the clip configured for `intent`.
    ///
    /// Returns `None` when that clip is not registered; motion is unaffected.
    pub fn perform(&mut self, intent: Intent) -> Option<Transition> {
        let clip = self.settings.clip_for(intent);
        match self.animation.set_action(clip) {
            Ok(transition) => Some(transition),
            Err(error) => {
                warn!("{intent:?}: {error}");
                None
            }
        }
    }

    /// Feeds one clip-loading event into the animation switcher.
    ///
    /// Loaded clips are registered; once loading settles with at least one
    /// clip registered, the mixer clock is released.
    pub fn on_load_event(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Progress { name, fraction } => {
                debug!("loading `{name}`: {:.0}%", fraction * 100.0);
            }
            LoadEvent::Loaded(clip) => {
                self.animation.register(clip);
                self.sync_registered_clip();
            }
            LoadEvent::Failed(error) => warn!("skipping clip: {error}"),
            LoadEvent::Settled => {
                if self.animation.registry().is_empty() {
                    warn!("clip loading settled without any playable clip");
                } else {
                    self.animation.mark_ready();
                }
            }
        }
    }

    // A clip for the current phase may arrive after the phase was entered.
    fn sync_registered_clip(&mut self) {
        let intent = match self.phase {
            Phase::Idle => return,
            Phase::Moving(gait) => Intent::from(gait),
        };
        let wanted = self.settings.clip_for(intent);
        if self.animation.active() != Some(wanted) && self.animation.registry().contains(wanted) {
            self.perform(intent);
        }
    }

    /// Replaces the settings, updating turn rate and blend window in place.
    ///
    /// Trips in flight keep the duration they were planned with.
    pub fn reconfigure(&mut self, settings: LocomotionSettings) {
        self.motion.set_turn_rate(settings.turn_rate);
        self.motion.set_easing(settings.easing);
        self.animation.set_blend_seconds(settings.blend_seconds);
        self.settings = settings;
    }

    /// Current locomotion phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Active settings.
    #[must_use]
    pub const fn settings(&self) -> &LocomotionSettings {
        &self.settings
    }

    /// Motion driver state.
    #[must_use]
    pub const fn motion(&self) -> &MotionDriver {
        &self.motion
    }

    /// Animation switcher state.
    #[must_use]
    pub const fn animation(&self) -> &AnimationSwitcher<M> {
        &self.animation
    }

    /// Name of the active clip.
    #[must_use]
    pub const fn active_clip(&self) -> Option<&ClipName> {
        self.animation.active()
    }
}
