//! Time-driven interpolation of a value between two endpoints.
//!
//! A [`Tween`] owns its own clock. Callers advance it with the frame delta and
//! read back the interpolated value; nothing here knows about actors.

use std::time::Duration;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::numeric::progress;

/// Curve mapping linear progress to eased progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant speed.
    #[default]
    Linear,
    /// Accelerates then decelerates.
    QuadraticInOut,
    /// Decelerates into the destination.
    CubicOut,
}

impl Easing {
    /// Maps `t` in `[0, 1]` to eased progress in `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let x = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => x,
            Self::QuadraticInOut => {
                if x < 0.5 {
                    2.0 * x * x
                } else {
                    1.0 - (-2.0 * x + 2.0).powi(2) / 2.0
                }
            }
            Self::CubicOut => 1.0 - (1.0 - x).powi(3),
        }
    }
}

/// Values that can be interpolated by a [`Tween`].
pub trait Interpolate: Copy {
    /// Blends from `self` to `to` by `t` in `[0, 1]`.
    #[must_use]
    fn interpolate(self, to: Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Interpolate for Vec3 {
    fn interpolate(self, to: Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

impl Interpolate for Quat {
    fn interpolate(self, to: Self, t: f32) -> Self {
        self.slerp(to, t)
    }
}

/// Result of advancing a tween by one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenStep<T> {
    /// The tween is still running; carries the current value.
    Running(T),
    /// The tween reached its end on this step; carries the exact end value.
    Finished(T),
}

impl<T: Copy> TweenStep<T> {
    /// Value carried by the step.
    #[must_use]
    pub fn value(&self) -> T {
        match *self {
            Self::Running(value) | Self::Finished(value) => value,
        }
    }

    /// Returns `true` for [`TweenStep::Finished`].
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }
}

/// Interpolation from `start` to `end` over `duration`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween<T> {
    start: T,
    end: T,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl<T: Interpolate> Tween<T> {
    /// Creates a linear tween.
    #[must_use]
    pub fn new(start: T, end: T, duration: Duration) -> Self {
        Self {
            start,
            end,
            duration,
            elapsed: Duration::ZERO,
            easing: Easing::Linear,
        }
    }

    /// Replaces the easing curve.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Destination value.
    #[must_use]
    pub fn end(&self) -> T {
        self.end
    }

    /// Total duration.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Time accumulated so far, never beyond the duration.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Value at the current clock position.
    #[must_use]
    pub fn value(&self) -> T {
        if self.elapsed >= self.duration {
            return self.end;
        }
        let t = self.easing.apply(progress(self.elapsed, self.duration));
        self.start.interpolate(self.end, t)
    }

    /// Advances the clock by `delta` and reports the new value.
    ///
    /// The finishing step returns `end` exactly, without rounding error.
    pub fn advance(&mut self, delta: Duration) -> TweenStep<T> {
        self.elapsed = self.elapsed.saturating_add(delta).min(self.duration);
        if self.elapsed >= self.duration {
            TweenStep::Finished(self.end)
        } else {
            TweenStep::Running(self.value())
        }
    }
}
