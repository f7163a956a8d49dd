//! Named, range-limited values that a debug panel or the command line can
//! change at runtime.
//!
//! Each tunable has a range and an optional step. Setting a value clamps it
//! to the range, snaps it to the step and then notifies every observer
//! registered for that name. Names are grouped by a `folder.` prefix. Only
//! values changed after registration are written back into settings.

use hashbrown::HashMap;
use log::debug;
use thiserror::Error;

use crate::settings::LocomotionSettings;

/// Errors raised by [`Tunables`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TunableError {
    /// No tunable with that name exists.
    #[error("unknown tunable `{0}`")]
    Unknown(String),
    /// A tunable with that name was already added.
    #[error("tunable `{0}` already exists")]
    Duplicate(String),
    /// The range is empty or not finite.
    #[error("tunable `{name}` has an invalid range {min}..={max}")]
    InvalidRange {
        /// Tunable being added.
        name: String,
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },
    /// A `name=value` assignment could not be parsed.
    #[error("malformed assignment `{0}`; expected name=value")]
    Malformed(String),
    /// The value is not a finite number.
    #[error("tunable `{name}` cannot take value {value}")]
    NotFinite {
        /// Tunable being set.
        name: String,
        /// Rejected value.
        value: f32,
    },
}

/// Callback invoked with the new value after a tunable changes.
pub type Observer = Box<dyn FnMut(f32) + Send + Sync>;

struct Tunable {
    value: f32,
    min: f32,
    max: f32,
    step: Option<f32>,
    changed: bool,
    observers: Vec<Observer>,
}

impl Tunable {
    fn constrain(&self, value: f32) -> f32 {
        let snapped = self
            .step
            .filter(|step| *step > 0.0)
            .map_or(value, |step| {
                self.min + ((value - self.min) / step).round() * step
            });
        snapped.clamp(self.min, self.max)
    }
}

/// Registry of tunable values.
#[derive(Default)]
pub struct Tunables {
    entries: HashMap<String, Tunable>,
    order: Vec<String>,
}

impl std::fmt::Debug for Tunables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for name in &self.order {
            if let Some(entry) = self.entries.get(name) {
                map.entry(name, &entry.value);
            }
        }
        map.finish()
    }
}

impl Tunables {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` with an initial value, range and optional step.
    ///
    /// The initial value is constrained like any later assignment.
    ///
    /// # Errors
    /// Returns [`TunableError::Duplicate`] if `name` exists and
    /// [`TunableError::InvalidRange`] if `min > max` or either is not finite.
    pub fn add(
        &mut self,
        name: &str,
        value: f32,
        range: (f32, f32),
        step: Option<f32>,
    ) -> Result<&mut Self, TunableError> {
        let (min, max) = range;
        if self.entries.contains_key(name) {
            return Err(TunableError::Duplicate(name.to_owned()));
        }
        if !(min.is_finite() && max.is_finite() && min <= max) {
            return Err(TunableError::InvalidRange {
                name: name.to_owned(),
                min,
                max,
            });
        }
        let mut tunable = Tunable {
            value,
            min,
            max,
            step,
            changed: false,
            observers: Vec::new(),
        };
        tunable.value = tunable.constrain(value);
        self.entries.insert(name.to_owned(), tunable);
        self.order.push(name.to_owned());
        Ok(self)
    }

    /// Current value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f32> {
        self.entries.get(name).map(|entry| entry.value)
    }

    /// Whether `name` was changed by [`Self::set`] since it was added.
    #[must_use]
    pub fn is_changed(&self, name: &str) -> bool {
        self.entries.get(name).is_some_and(|entry| entry.changed)
    }

    /// Names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Sets `name` and notifies its observers.
    ///
    /// Returns the stored value after clamping and snapping. Observers run
    /// only when the stored value actually changes.
    ///
    /// # Errors
    /// Returns [`TunableError::Unknown`] for unregistered names and
    /// [`TunableError::NotFinite`] for NaN or infinite values.
    pub fn set(&mut self, name: &str, value: f32) -> Result<f32, TunableError> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| TunableError::Unknown(name.to_owned()))?;
        if !value.is_finite() {
            return Err(TunableError::NotFinite {
                name: name.to_owned(),
                value,
            });
        }
        let constrained = entry.constrain(value);
        if (constrained - entry.value).abs() <= f32::EPSILON {
            return Ok(entry.value);
        }
        entry.value = constrained;
        entry.changed = true;
        debug!("tunable `{name}` set to {constrained}");
        for observer in &mut entry.observers {
            observer(constrained);
        }
        Ok(constrained)
    }

    /// Applies a `name=value` assignment.
    ///
    /// # Errors
    /// Returns [`TunableError::Malformed`] when the text is not an assignment,
    /// otherwise whatever [`Self::set`] reports.
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<f32, TunableError> {
        let (name, value) = parse_assignment(assignment)?;
        self.set(name, value)
    }

    /// Registers a callback run whenever `name` changes.
    ///
    /// # Errors
    /// Returns [`TunableError::Unknown`] for unregistered names.
    pub fn observe(
        &mut self,
        name: &str,
        observer: impl FnMut(f32) + Send + Sync + 'static,
    ) -> Result<(), TunableError> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| TunableError::Unknown(name.to_owned()))?;
        entry.observers.push(Box::new(observer));
        Ok(())
    }

    /// Registers the tunable fields of `settings` under the `locomotion.` and
    /// `pointer.` folders.
    ///
    /// Each range is widened to cover the value already in `settings`, so a
    /// file that passes [`LocomotionSettings::validate`] stays representable.
    ///
    /// # Errors
    /// Propagates [`TunableError`] from [`Self::add`]; never fails on a fresh
    /// registry.
    #[expect(
        clippy::cast_precision_loss,
        reason = "Double-click windows are a few hundred milliseconds."
    )]
    pub fn for_settings(settings: &LocomotionSettings) -> Result<Self, TunableError> {
        let mut tunables = Self::new();
        tunables
            .add(
                "locomotion.walk_millis_per_unit",
                settings.walk_millis_per_unit,
                covering((10.0, 2000.0), settings.walk_millis_per_unit),
                Some(1.0),
            )?
            .add(
                "locomotion.run_millis_per_unit",
                settings.run_millis_per_unit,
                covering((10.0, 2000.0), settings.run_millis_per_unit),
                Some(1.0),
            )?
            .add(
                "locomotion.blend_seconds",
                settings.blend_seconds,
                covering((0.0, 5.0), settings.blend_seconds),
                Some(0.01),
            )?
            .add(
                "locomotion.turn_rate",
                settings.turn_rate,
                covering((0.1, 1000.0), settings.turn_rate),
                None,
            )?
            .add(
                "pointer.double_click_millis",
                settings.double_click_millis as f32,
                covering((50.0, 1000.0), settings.double_click_millis as f32),
                Some(1.0),
            )?
            .add(
                "pointer.double_click_slop",
                settings.double_click_slop,
                covering((0.0, 0.2), settings.double_click_slop),
                Some(0.001),
            )?;
        Ok(tunables)
    }

    /// Writes values changed through [`Self::set`] back into `settings`.
    ///
    /// Untouched tunables leave their field as loaded, even where
    /// registration snapped the stored value to its step.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "The double-click tunable is clamped to a small positive range."
    )]
    pub fn apply_to(&self, settings: &mut LocomotionSettings) {
        let fields: [(&str, &mut f32); 5] = [
            (
                "locomotion.walk_millis_per_unit",
                &mut settings.walk_millis_per_unit,
            ),
            (
                "locomotion.run_millis_per_unit",
                &mut settings.run_millis_per_unit,
            ),
            ("locomotion.blend_seconds", &mut settings.blend_seconds),
            ("locomotion.turn_rate", &mut settings.turn_rate),
            ("pointer.double_click_slop", &mut settings.double_click_slop),
        ];
        for (name, field) in fields {
            if let Some(value) = self.get(name).filter(|_| self.is_changed(name)) {
                *field = value;
            }
        }
        let millis_name = "pointer.double_click_millis";
        if let Some(millis) = self.get(millis_name).filter(|_| self.is_changed(millis_name)) {
            settings.double_click_millis = millis.round() as u64;
        }
    }
}

// Finite values only widen the range; `add` rejects the rest.
fn covering((min, max): (f32, f32), value: f32) -> (f32, f32) {
    if value.is_finite() {
        (min.min(value), max.max(value))
    } else {
        (min, max)
    }
}

/// Splits `name=value` into its parts.
///
/// # Errors
/// Returns [`TunableError::Malformed`] when there is no `=`, the name is
/// empty, or the value is not a number.
pub fn parse_assignment(assignment: &str) -> Result<(&str, f32), TunableError> {
    let malformed = || TunableError::Malformed(assignment.to_owned());
    let (name, value) = assignment.split_once('=').ok_or_else(malformed)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(malformed());
    }
    let number = value.trim().parse::<f32>().map_err(|_| malformed())?;
    Ok((name, number))
}
