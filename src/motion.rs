//! Motion driver: one position tween plus a rate-limited turn per actor.
//!
//! Position and orientation advance independently. The position follows a
//! [`Tween`] whose length depends on distance and gait; the orientation turns
//! toward the request's facing at a fixed angular speed, so either may settle
//! first.

use std::time::Duration;

use glam::{Quat, Vec3};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::facing::facing_towards;
use crate::numeric::duration_from_millis;
use crate::tween::{Easing, Tween, TweenStep};
use crate::vector_math::{same_rotation, turn_towards};

/// How fast the actor travels to a destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gait {
    /// Slow travel, triggered by a single click.
    Walk,
    /// Fast travel, triggered by a double click.
    Run,
}

/// Travel time for `distance` at `millis_per_unit`.
///
/// The configured constant is halved: a walk at 200 covers one unit in
/// 100 ms.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use ambler::motion::travel_duration;
///
/// assert_eq!(travel_duration(5.0, 200.0), Duration::from_millis(500));
/// assert_eq!(travel_duration(10.0, 200.0), Duration::from_millis(1000));
/// ```
#[must_use]
pub fn travel_duration(distance: f32, millis_per_unit: f32) -> Duration {
    duration_from_millis(distance * (millis_per_unit / 2.0))
}

/// A planned trip from the actor's position to a destination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavigationRequest {
    /// Destination point on the walkable surface.
    pub target: Vec3,
    /// Orientation the actor turns to while travelling.
    pub facing: Quat,
    /// Straight-line distance from the start position.
    pub distance: f32,
    /// Time the position tween takes.
    pub duration: Duration,
    /// Gait used for the trip.
    pub gait: Gait,
}

impl NavigationRequest {
    /// Plans a trip from `from` to `target`.
    ///
    /// Returns `None` when `target` coincides with `from`; a zero-length trip
    /// has no facing and nothing to animate.
    #[must_use]
    pub fn plan(
        from: Vec3,
        target: Vec3,
        up: Vec3,
        gait: Gait,
        millis_per_unit: f32,
    ) -> Option<Self> {
        let facing = facing_towards(from, target, up)?;
        let distance = from.distance(target);
        Some(Self {
            target,
            facing,
            distance,
            duration: travel_duration(distance, millis_per_unit),
            gait,
        })
    }
}

/// Outcome of advancing the position tween for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotionStep {
    /// No trip is in flight.
    Idle,
    /// The actor is between start and destination.
    Moving(Vec3),
    /// The actor reached the destination on this frame.
    Arrived(Vec3),
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ActiveTrip {
    request: NavigationRequest,
    tween: Tween<Vec3>,
}

/// Drives position and orientation toward the latest navigation request.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionDriver {
    trip: Option<ActiveTrip>,
    facing: Option<Quat>,
    turn_rate: f32,
    easing: Easing,
}

impl MotionDriver {
    /// Creates an idle driver turning at `turn_rate` radians per second.
    #[must_use]
    pub const fn new(turn_rate: f32, easing: Easing) -> Self {
        Self {
            trip: None,
            facing: None,
            turn_rate,
            easing,
        }
    }

    /// Starts a trip from `from`, cancelling any trip in flight.
    ///
    /// The previous tween is dropped before the new one exists, so at most one
    /// tween runs at any time. Returns the superseded request, if any.
    pub fn begin(&mut self, from: Vec3, request: NavigationRequest) -> Option<NavigationRequest> {
        let superseded = self.cancel();
        if let Some(previous) = superseded {
            debug!(
                "superseding trip to {:?} with trip to {:?}",
                previous.target, request.target
            );
        }
        let tween = Tween::new(from, request.target, request.duration).with_easing(self.easing);
        self.trip = Some(ActiveTrip { request, tween });
        self.facing = Some(request.facing);
        superseded
    }

    /// Drops the trip in flight, keeping the pending turn.
    pub fn cancel(&mut self) -> Option<NavigationRequest> {
        self.trip.take().map(|trip| trip.request)
    }

    /// The request currently being travelled, if any.
    #[must_use]
    pub fn active(&self) -> Option<&NavigationRequest> {
        self.trip.as_ref().map(|trip| &trip.request)
    }

    /// Number of position tweens in flight: zero or one.
    #[must_use]
    pub fn active_tweens(&self) -> usize {
        usize::from(self.trip.is_some())
    }

    /// Orientation the actor is turning toward.
    #[must_use]
    pub const fn target_facing(&self) -> Option<Quat> {
        self.facing
    }

    /// Replaces the maximum turn rate.
    pub fn set_turn_rate(&mut self, turn_rate: f32) {
        self.turn_rate = turn_rate;
    }

    /// Replaces the easing applied to trips started from now on.
    ///
    /// A trip already in flight keeps the curve it was started with.
    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    /// Turns `current` toward the target facing by `turn_rate × delta`.
    ///
    /// Returns `None` when there is no target or the actor already faces it.
    #[must_use]
    pub fn turn(&self, current: Quat, delta: Duration) -> Option<Quat> {
        let target = self.facing?;
        if same_rotation(current, target) {
            return None;
        }
        Some(turn_towards(current, target, self.turn_rate * delta.as_secs_f32()))
    }

    /// Advances the position tween clock by `delta`.
    ///
    /// On arrival the trip is cleared and the exact destination is returned.
    pub fn advance(&mut self, delta: Duration) -> MotionStep {
        let Some(trip) = self.trip.as_mut() else {
            return MotionStep::Idle;
        };
        match trip.tween.advance(delta) {
            TweenStep::Running(position) => MotionStep::Moving(position),
            TweenStep::Finished(position) => {
                self.trip = None;
                MotionStep::Arrived(position)
            }
        }
    }
}
