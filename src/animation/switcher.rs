//! Clip registry and the cross-fading state switcher.

use hashbrown::HashMap;
use log::{debug, info};
use thiserror::Error;

use super::{Clip, ClipName, Mixer};

/// Errors raised by [`AnimationSwitcher::set_action`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnimationError {
    /// No clip with that name has been registered yet.
    #[error("no clip named `{0}` is registered")]
    UnknownClip(ClipName),
}

/// What a call to [`AnimationSwitcher::set_action`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The requested clip was already active.
    Unchanged,
    /// The clip became active with nothing to fade from.
    Started(ClipName),
    /// The previous clip fades out while the new one fades in.
    CrossFaded {
        /// Clip fading out.
        from: ClipName,
        /// Clip fading in.
        to: ClipName,
    },
}

/// Clips indexed by name, kept in the order they were registered.
#[derive(Debug, Clone, Default)]
pub struct ClipRegistry {
    clips: Vec<Clip>,
    index: HashMap<ClipName, usize>,
}

impl ClipRegistry {
    /// Adds `clip`; returns `false` if a clip with that name already exists.
    pub fn insert(&mut self, clip: Clip) -> bool {
        if self.index.contains_key(&clip.name) {
            return false;
        }
        self.index.insert(clip.name.clone(), self.clips.len());
        self.clips.push(clip);
        true
    }

    /// Looks up a clip by name.
    #[must_use]
    pub fn get(&self, name: &ClipName) -> Option<&Clip> {
        self.index.get(name).and_then(|&slot| self.clips.get(slot))
    }

    /// Returns `true` when a clip with that name exists.
    #[must_use]
    pub fn contains(&self, name: &ClipName) -> bool {
        self.index.contains_key(name)
    }

    /// Clip names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &ClipName> {
        self.clips.iter().map(|clip| &clip.name)
    }

    /// Number of registered clips.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// Keeps exactly one clip active and cross-fades between them.
///
/// The first clip registered becomes active straight away, with no fade.
/// Until [`Self::mark_ready`] is called the mixer clock is never advanced.
#[derive(Debug, Clone)]
pub struct AnimationSwitcher<M> {
    mixer: M,
    registry: ClipRegistry,
    active: Option<ClipName>,
    blend_seconds: f32,
    ready: bool,
}

impl<M: Mixer> AnimationSwitcher<M> {
    /// Creates a switcher with an empty registry.
    pub fn new(mixer: M, blend_seconds: f32) -> Self {
        Self {
            mixer,
            registry: ClipRegistry::default(),
            active: None,
            blend_seconds,
            ready: false,
        }
    }

    /// Registers a freshly loaded clip.
    ///
    /// Returns the transition when this clip became the first active one.
    pub fn register(&mut self, clip: Clip) -> Option<Transition> {
        let name = clip.name.clone();
        if !self.registry.insert(clip) {
            debug!("clip `{name}` already registered; keeping the first copy");
            return None;
        }
        debug!("registered clip `{name}` ({} total)", self.registry.len());
        if self.active.is_some() {
            return None;
        }
        self.set_action(&name).ok()
    }

    /// Makes `name` the active clip.
    ///
    /// Requesting the clip that is already active does nothing. Otherwise the
    /// previous clip fades out and the new one is rewound and faded in over
    /// the same blend window.
    ///
    /// # Errors
    /// Returns [`AnimationError::UnknownClip`] when `name` is not registered;
    /// the active clip is left untouched.
    pub fn set_action(&mut self, name: &ClipName) -> Result<Transition, AnimationError> {
        if self.active.as_ref() == Some(name) {
            return Ok(Transition::Unchanged);
        }
        let next = self
            .registry
            .get(name)
            .ok_or_else(|| AnimationError::UnknownClip(name.clone()))?;

        let previous = self.active.replace(name.clone());
        let Some(from) = previous.and_then(|prev| self.registry.get(&prev)) else {
            self.mixer.play(next);
            info!("animation started on `{name}`");
            return Ok(Transition::Started(name.clone()));
        };

        self.mixer.fade_out(from, self.blend_seconds);
        self.mixer.reset_fade_in_play(next, self.blend_seconds);
        debug!("cross-fading `{}` -> `{name}`", from.name);
        Ok(Transition::CrossFaded {
            from: from.name.clone(),
            to: name.clone(),
        })
    }

    /// Allows the mixer clock to advance.
    pub fn mark_ready(&mut self) {
        if !self.ready {
            info!(
                "animation ready with {} clip(s): {:?}",
                self.registry.len(),
                self.registry.names().map(ClipName::as_str).collect::<Vec<_>>()
            );
        }
        self.ready = true;
    }

    /// Whether the mixer clock may advance.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    /// Advances the mixer if ready; returns whether it advanced.
    pub fn advance(&mut self, seconds: f32) -> bool {
        if !self.ready {
            return false;
        }
        self.mixer.advance(seconds);
        true
    }

    /// Currently active clip.
    #[must_use]
    pub const fn active(&self) -> Option<&ClipName> {
        self.active.as_ref()
    }

    /// Registered clips.
    #[must_use]
    pub const fn registry(&self) -> &ClipRegistry {
        &self.registry
    }

    /// Underlying mixer.
    #[must_use]
    pub const fn mixer(&self) -> &M {
        &self.mixer
    }

    /// Replaces the cross-fade window for future transitions.
    pub fn set_blend_seconds(&mut self, seconds: f32) {
        self.blend_seconds = seconds;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::MockMixer;
    use mockall::predicate::eq;
    use rstest::rstest;

    fn clip(name: &str) -> Clip {
        Clip::new(name, 1.0)
    }

    #[rstest]
    fn first_registered_clip_plays_without_fade() {
        let mut mixer = MockMixer::new();
        mixer
            .expect_play()
            .withf(|clip| clip.name.as_str() == "idle")
            .times(1)
            .return_const(());
        mixer.expect_fade_out().never();
        mixer.expect_reset_fade_in_play().never();

        let mut switcher = AnimationSwitcher::new(mixer, 0.5);
        let transition = switcher.register(clip("idle"));

        assert_eq!(transition, Some(Transition::Started("idle".into())));
        assert_eq!(switcher.active(), Some(&ClipName::from("idle")));
    }

    #[rstest]
    fn later_registrations_do_not_steal_active_clip() {
        let mut mixer = MockMixer::new();
        mixer.expect_play().times(1).return_const(());

        let mut switcher = AnimationSwitcher::new(mixer, 0.5);
        switcher.register(clip("idle"));
        assert_eq!(switcher.register(clip("walk")), None);
        assert_eq!(switcher.active(), Some(&ClipName::from("idle")));
        assert_eq!(switcher.registry().len(), 2);
    }

    #[rstest]
    fn switching_cross_fades_once_for_repeated_requests() {
        let mut mixer = MockMixer::new();
        mixer.expect_play().times(1).return_const(());
        mixer
            .expect_fade_out()
            .withf(|clip, seconds| {
                clip.name.as_str() == "idle" && (*seconds - 0.5).abs() < 1e-6
            })
            .times(1)
            .return_const(());
        mixer
            .expect_reset_fade_in_play()
            .withf(|clip, seconds| {
                clip.name.as_str() == "walk" && (*seconds - 0.5).abs() < 1e-6
            })
            .times(1)
            .return_const(());

        let mut switcher = AnimationSwitcher::new(mixer, 0.5);
        switcher.register(clip("idle"));
        switcher.register(clip("walk"));

        let walk = ClipName::from("walk");
        assert_eq!(
            switcher.set_action(&walk),
            Ok(Transition::CrossFaded {
                from: "idle".into(),
                to: "walk".into(),
            })
        );
        assert_eq!(switcher.set_action(&walk), Ok(Transition::Unchanged));
    }

    #[rstest]
    fn unknown_clip_leaves_active_untouched() {
        let mut mixer = MockMixer::new();
        mixer.expect_play().return_const(());
        let mut switcher = AnimationSwitcher::new(mixer, 0.5);
        switcher.register(clip("idle"));

        let err = switcher.set_action(&"cheer".into());
        assert_eq!(err, Err(AnimationError::UnknownClip("cheer".into())));
        assert_eq!(switcher.active(), Some(&ClipName::from("idle")));
    }

    #[rstest]
    fn mixer_is_gated_until_ready() {
        let mut mixer = MockMixer::new();
        mixer.expect_play().return_const(());
        mixer
            .expect_advance()
            .with(eq(0.25_f32))
            .times(1)
            .return_const(());
        let mut switcher = AnimationSwitcher::new(mixer, 0.5);
        switcher.register(clip("idle"));

        assert!(!switcher.advance(0.25));
        switcher.mark_ready();
        assert!(switcher.advance(0.25));
    }

    #[rstest]
    fn duplicate_names_keep_first_clip() {
        let mut registry = ClipRegistry::default();
        assert!(registry.insert(Clip::new("idle", 1.0)));
        assert!(!registry.insert(Clip::new("idle", 9.0)));
        let kept = registry.get(&"idle".into()).map(|c| c.seconds);
        assert_eq!(kept, Some(1.0));
    }
}
