//! Runtime configuration for the locomotion controller.
//!
//! Every field defaults to the matching constant in [`crate::constants`], so a
//! settings file only needs to name the values it overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::ClipName;
use crate::motion::Gait;
use crate::navigator::Intent;
use crate::tween::Easing;
use crate::{
    BLEND_SECONDS, CHEER_CLIP, DOUBLE_CLICK_MILLIS, DOUBLE_CLICK_SLOP, IDLE_CLIP, RUN_CLIP,
    RUN_MILLIS_PER_UNIT, TURN_RATE, WALK_CLIP, WALK_MILLIS_PER_UNIT,
};

/// Errors raised while loading or validating [`LocomotionSettings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("cannot read settings from {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The settings document is not valid JSON for this schema.
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is outside its usable range.
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Clip played for each intent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipNames {
    /// Clip played while standing still.
    pub idle: ClipName,
    /// Clip played while walking.
    pub walk: ClipName,
    /// Clip played while running.
    pub run: ClipName,
    /// Clip played on the cheer intent.
    pub cheer: ClipName,
}

impl Default for ClipNames {
    fn default() -> Self {
        Self {
            idle: IDLE_CLIP.into(),
            walk: WALK_CLIP.into(),
            run: RUN_CLIP.into(),
            cheer: CHEER_CLIP.into(),
        }
    }
}

/// Tunable parameters of the controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionSettings {
    /// Walking travel constant in milliseconds per unit, halved when applied.
    pub walk_millis_per_unit: f32,
    /// Running travel constant in milliseconds per unit, halved when applied.
    pub run_millis_per_unit: f32,
    /// Cross-fade window in seconds.
    pub blend_seconds: f32,
    /// Maximum turn rate in radians per second.
    pub turn_rate: f32,
    /// Curve applied to the position tween.
    pub easing: Easing,
    /// World up axis.
    pub up: Vec3,
    /// Clip names per intent.
    pub clips: ClipNames,
    /// Double-click window in milliseconds.
    pub double_click_millis: u64,
    /// Double-click pointer slop in NDC units.
    pub double_click_slop: f32,
}

impl Default for LocomotionSettings {
    fn default() -> Self {
        Self {
            walk_millis_per_unit: WALK_MILLIS_PER_UNIT,
            run_millis_per_unit: RUN_MILLIS_PER_UNIT,
            blend_seconds: BLEND_SECONDS,
            turn_rate: TURN_RATE,
            easing: Easing::default(),
            up: Vec3::Y,
            clips: ClipNames::default(),
            double_click_millis: DOUBLE_CLICK_MILLIS,
            double_click_slop: DOUBLE_CLICK_SLOP,
        }
    }
}

impl LocomotionSettings {
    /// Parses and validates settings from a JSON document.
    ///
    /// # Errors
    /// Returns [`SettingsError::Parse`] for malformed JSON and
    /// [`SettingsError::Invalid`] when a value fails validation.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from a JSON file.
    ///
    /// # Errors
    /// Returns [`SettingsError::Io`] when the file cannot be read, otherwise
    /// whatever [`Self::from_json_str`] reports.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    /// Returns [`SettingsError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("walk_millis_per_unit", self.walk_millis_per_unit),
            ("run_millis_per_unit", self.run_millis_per_unit),
            ("turn_rate", self.turn_rate),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::Invalid {
                    field,
                    reason: format!("expected a positive number, got {value}"),
                });
            }
        }
        let non_negative = [
            ("blend_seconds", self.blend_seconds),
            ("double_click_slop", self.double_click_slop),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SettingsError::Invalid {
                    field,
                    reason: format!("expected a non-negative number, got {value}"),
                });
            }
        }
        if self.up.try_normalize().is_none() {
            return Err(SettingsError::Invalid {
                field: "up",
                reason: format!("expected a non-zero finite vector, got {:?}", self.up),
            });
        }
        Ok(())
    }

    /// Travel constant for `gait`.
    #[must_use]
    pub const fn millis_per_unit(&self, gait: Gait) -> f32 {
        match gait {
            Gait::Walk => self.walk_millis_per_unit,
            Gait::Run => self.run_millis_per_unit,
        }
    }

    /// Clip played for `intent`.
    #[must_use]
    pub const fn clip_for(&self, intent: Intent) -> &ClipName {
        match intent {
            Intent::Idle => &self.clips.idle,
            Intent::Walk => &self.clips.walk,
            Intent::Run => &self.clips.run,
            Intent::Cheer => &self.clips.cheer,
        }
    }

    /// Double-click window as a [`Duration`].
    #[must_use]
    pub const fn double_click_window(&self) -> Duration {
        Duration::from_millis(self.double_click_millis)
    }
}
