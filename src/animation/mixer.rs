//! Weight-tracking mixer used when no external playback engine is present.
//!
//! `WeightMixer` does not pose skeletons. It keeps the per-clip bookkeeping a
//! renderer needs to do so: playback time, blend weight and any fade in
//! progress.

use hashbrown::HashMap;

use super::{Clip, ClipName, Mixer};

#[derive(Clone, Copy, Debug, PartialEq)]
struct Fade {
    from: f32,
    to: f32,
    seconds: f32,
    elapsed: f32,
}

impl Fade {
    fn weight(&self) -> f32 {
        if self.seconds <= 0.0 {
            return self.to;
        }
        let t = (self.elapsed / self.seconds).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    fn is_done(&self) -> bool {
        self.elapsed >= self.seconds
    }
}

/// Playback state of one clip inside a [`WeightMixer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActionState {
    /// Playback position in seconds, wrapped to the clip length.
    pub time: f32,
    /// Blend weight in `[0, 1]`.
    pub weight: f32,
    /// Whether the clip is contributing to the pose.
    pub playing: bool,
    length: f32,
    fade: Option<Fade>,
}

impl ActionState {
    const fn new(length: f32) -> Self {
        Self {
            time: 0.0,
            weight: 1.0,
            playing: false,
            length,
            fade: None,
        }
    }

    /// Returns `true` while a fade is in progress.
    #[must_use]
    pub const fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    fn advance(&mut self, seconds: f32) {
        if !self.playing {
            return;
        }
        self.time += seconds;
        if self.length > 0.0 {
            self.time = self.time.rem_euclid(self.length);
        }
        let Some(mut fade) = self.fade else {
            return;
        };
        fade.elapsed += seconds;
        self.weight = fade.weight().clamp(0.0, 1.0);
        if fade.is_done() {
            self.fade = None;
            if self.weight <= 0.0 {
                self.playing = false;
            }
        } else {
            self.fade = Some(fade);
        }
    }
}

/// Mixer that tracks clip time and blend weights.
#[derive(Clone, Debug, Default)]
pub struct WeightMixer {
    actions: HashMap<ClipName, ActionState>,
}

impl WeightMixer {
    /// Creates an empty mixer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn action_mut(&mut self, clip: &Clip) -> &mut ActionState {
        self.actions
            .entry(clip.name.clone())
            .or_insert_with(|| ActionState::new(clip.seconds))
    }

    /// Playback state of `name`, if it was ever played.
    #[must_use]
    pub fn action(&self, name: &ClipName) -> Option<&ActionState> {
        self.actions.get(name)
    }

    /// Current weight of `name`, zero when unknown or stopped.
    #[must_use]
    pub fn weight(&self, name: &ClipName) -> f32 {
        self.action(name)
            .filter(|action| action.playing)
            .map_or(0.0, |action| action.weight)
    }

    /// Names of the clips currently contributing to the pose.
    pub fn playing(&self) -> impl Iterator<Item = &ClipName> {
        self.actions
            .iter()
            .filter(|(_, action)| action.playing)
            .map(|(name, _)| name)
    }
}

impl Mixer for WeightMixer {
    fn play(&mut self, clip: &Clip) {
        let action = self.action_mut(clip);
        action.playing = true;
        if action.fade.is_none() {
            action.weight = 1.0;
        }
    }

    fn fade_out(&mut self, clip: &Clip, seconds: f32) {
        let action = self.action_mut(clip);
        action.fade = Some(Fade {
            from: action.weight,
            to: 0.0,
            seconds,
            elapsed: 0.0,
        });
    }

    fn reset_fade_in_play(&mut self, clip: &Clip, seconds: f32) {
        let action = self.action_mut(clip);
        action.time = 0.0;
        action.weight = 0.0;
        action.playing = true;
        action.fade = Some(Fade {
            from: 0.0,
            to: 1.0,
            seconds,
            elapsed: 0.0,
        });
    }

    fn advance(&mut self, seconds: f32) {
        for action in self.actions.values_mut() {
            action.advance(seconds);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn idle() -> Clip {
        Clip::new("idle", 2.0)
    }

    #[fixture]
    fn walk() -> Clip {
        Clip::new("walk", 1.0)
    }

    #[rstest]
    fn play_starts_at_full_weight(idle: Clip) {
        let mut mixer = WeightMixer::new();
        mixer.play(&idle);
        assert_relative_eq!(mixer.weight(&idle.name), 1.0);
    }

    #[rstest]
    fn cross_fade_trades_weight_over_window(idle: Clip, walk: Clip) {
        let mut mixer = WeightMixer::new();
        mixer.play(&idle);
        mixer.fade_out(&idle, 0.5);
        mixer.reset_fade_in_play(&walk, 0.5);

        mixer.advance(0.25);
        assert_relative_eq!(mixer.weight(&idle.name), 0.5, epsilon = 1e-5);
        assert_relative_eq!(mixer.weight(&walk.name), 0.5, epsilon = 1e-5);

        mixer.advance(0.25);
        assert_relative_eq!(mixer.weight(&idle.name), 0.0);
        assert_relative_eq!(mixer.weight(&walk.name), 1.0);
        assert_eq!(mixer.playing().collect::<Vec<_>>(), vec![&walk.name]);
    }

    #[rstest]
    fn time_wraps_at_clip_length(walk: Clip) {
        let mut mixer = WeightMixer::new();
        mixer.play(&walk);
        mixer.advance(1.25);
        let time = mixer.action(&walk.name).map(|a| a.time);
        assert_relative_eq!(time.unwrap_or(f32::NAN), 0.25, epsilon = 1e-5);
    }

    #[rstest]
    fn reset_rewinds_playback(walk: Clip) {
        let mut mixer = WeightMixer::new();
        mixer.play(&walk);
        mixer.advance(0.6);
        mixer.reset_fade_in_play(&walk, 0.5);
        let action = mixer.action(&walk.name).copied().expect("walk was played");
        assert_relative_eq!(action.time, 0.0);
        assert!(action.is_fading());
    }
}
