//! Animation clips, playback and the state switcher.
//!
//! Clips arrive one at a time from a [`ClipSource`] through the
//! [`ClipLoadQueue`], are registered with an [`AnimationSwitcher`], and are
//! played by whatever implements [`Mixer`]. [`WeightMixer`] is the built-in
//! mixer; hosts with their own playback engine implement the trait instead.

mod loader;
mod mixer;
mod switcher;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use loader::{
    CatalogClipSource, ClipEntry, ClipLoadError, ClipLoadPlan, ClipLoadQueue, ClipSource,
    LoadEvent, LoadPoll,
};
pub use mixer::{ActionState, WeightMixer};
pub use switcher::{AnimationError, AnimationSwitcher, ClipRegistry, Transition};

#[cfg(test)]
pub use loader::MockClipSource;

/// Name identifying a clip, such as `"idle"` or `"walk"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipName(String);

impl ClipName {
    /// Creates a clip name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrows the underlying name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClipName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for ClipName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A loaded, playable clip.
#[derive(Clone, Debug, PartialEq)]
pub struct Clip {
    /// Name the clip is registered under.
    pub name: ClipName,
    /// Length of one loop, in seconds. Zero means the clip does not loop.
    pub seconds: f32,
}

impl Clip {
    /// Creates a clip description.
    pub fn new(name: impl Into<ClipName>, seconds: f32) -> Self {
        Self {
            name: name.into(),
            seconds,
        }
    }
}

/// Playback facility driving clip weights and time.
///
/// Mirrors the operations a skeletal animation mixer exposes: start a clip,
/// fade one out, restart one with a fade in, and advance the shared clock.
#[cfg_attr(test, mockall::automock)]
pub trait Mixer {
    /// Starts `clip` at full weight.
    fn play(&mut self, clip: &Clip);

    /// Fades `clip` out over `seconds`.
    fn fade_out(&mut self, clip: &Clip, seconds: f32);

    /// Rewinds `clip`, fades it in over `seconds` and plays it.
    fn reset_fade_in_play(&mut self, clip: &Clip, seconds: f32);

    /// Advances every playing clip by `seconds`.
    fn advance(&mut self, seconds: f32);
}
