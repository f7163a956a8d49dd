//! Per-frame update for a [`Navigator`].

use std::time::Duration;

use glam::Vec3;
use log::info;

use crate::animation::Mixer;
use crate::motion::MotionStep;
use crate::navigator::{Intent, Navigator, Phase, Pose};

/// What one call to [`Navigator::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// The mixer clock advanced.
    pub animated: bool,
    /// The orientation changed.
    pub turned: bool,
    /// Destination reached on this frame, if any.
    pub arrived: Option<Vec3>,
}

impl<M: Mixer> Navigator<M> {
    /// Runs one frame with a single `delta`.
    ///
    /// The order is fixed: animation time, then orientation, then the position
    /// tween. On arrival the actor is placed exactly on the destination, the
    /// phase returns to idle and the idle clip is requested.
    pub fn tick(&mut self, pose: &mut impl Pose, delta: Duration) -> FrameReport {
        let animated = self.animation.advance(delta.as_secs_f32());

        let turned = match self.motion.turn(pose.orientation(), delta) {
            Some(orientation) => {
                pose.set_orientation(orientation);
                true
            }
            None => false,
        };

        let arrived = match self.motion.advance(delta) {
            MotionStep::Idle => None,
            MotionStep::Moving(position) => {
                pose.set_position(position);
                None
            }
            MotionStep::Arrived(position) => {
                pose.set_position(position);
                self.phase = Phase::Idle;
                info!("arrived at {position:?}");
                self.perform(Intent::Idle);
                Some(position)
            }
        };

        FrameReport {
            animated,
            turned,
            arrived,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Clip, LoadEvent, MockMixer};
    use crate::motion::Gait;
    use crate::navigator::{Actor, MockPose};
    use crate::settings::LocomotionSettings;
    use mockall::Sequence;
    use rstest::rstest;

    const FRAME: Duration = Duration::from_millis(16);

    #[rstest]
    fn mixer_stays_gated_until_clips_settle() {
        let mut mixer = MockMixer::new();
        mixer.expect_play().return_const(());
        mixer.expect_advance().times(1).return_const(());
        let mut navigator = Navigator::new(LocomotionSettings::default(), mixer);
        let mut actor = Actor::default();

        navigator.on_load_event(LoadEvent::Loaded(Clip::new("idle", 1.0)));
        assert!(!navigator.tick(&mut actor, FRAME).animated);

        navigator.on_load_event(LoadEvent::Settled);
        assert!(navigator.tick(&mut actor, FRAME).animated);
    }

    #[rstest]
    fn arrival_reverts_to_idle_clip() {
        let mut seq = Sequence::new();
        let mut mixer = MockMixer::new();
        mixer
            .expect_play()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        mixer
            .expect_fade_out()
            .withf(|clip, _| clip.name.as_str() == "idle")
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        mixer
            .expect_reset_fade_in_play()
            .withf(|clip, _| clip.name.as_str() == "walk")
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        mixer
            .expect_fade_out()
            .withf(|clip, _| clip.name.as_str() == "walk")
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        mixer
            .expect_reset_fade_in_play()
            .withf(|clip, _| clip.name.as_str() == "idle")
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        mixer.expect_advance().return_const(());

        let mut navigator = Navigator::new(LocomotionSettings::default(), mixer);
        navigator.on_load_event(LoadEvent::Loaded(Clip::new("idle", 1.0)));
        navigator.on_load_event(LoadEvent::Loaded(Clip::new("walk", 1.0)));
        navigator.on_load_event(LoadEvent::Settled);

        let mut actor = Actor::default();
        navigator.navigate(&actor, Vec3::new(1.0, 0.0, 0.0), Gait::Walk);

        let mut arrived = None;
        for _ in 0..10 {
            arrived = navigator.tick(&mut actor, FRAME).arrived;
            if arrived.is_some() {
                break;
            }
        }

        assert_eq!(arrived, Some(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(actor.position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(navigator.phase(), Phase::Idle);
    }

    #[rstest]
    fn turn_happens_before_arrival_and_independently() {
        let mut navigator = Navigator::new(
            LocomotionSettings {
                turn_rate: 1.0,
                ..LocomotionSettings::default()
            },
            MockMixer::new(),
        );
        let mut actor = Actor::default();
        navigator.navigate(&actor, Vec3::new(-1.0, 0.0, 0.0), Gait::Run);

        let report = navigator.tick(&mut actor, FRAME);

        assert!(report.turned);
        assert!(!report.animated);
        assert!(report.arrived.is_none());
        assert!(actor.orientation.angle_between(glam::Quat::IDENTITY) < 0.02);
    }

    #[rstest]
    fn mixer_advances_before_pose_is_written() {
        let mut seq = Sequence::new();
        let mut mixer = MockMixer::new();
        mixer.expect_play().return_const(());
        mixer
            .expect_advance()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        let mut pose = MockPose::new();
        pose.expect_orientation()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(glam::Quat::IDENTITY);
        pose.expect_set_orientation()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        pose.expect_set_position()
            .withf(|position| position.x < 0.0 && position.x > -1.0)
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let mut navigator = Navigator::new(LocomotionSettings::default(), mixer);
        navigator.on_load_event(LoadEvent::Loaded(Clip::new("idle", 1.0)));
        navigator.on_load_event(LoadEvent::Settled);
        navigator.navigate(&Actor::default(), Vec3::new(-1.0, 0.0, 0.0), Gait::Walk);

        let report = navigator.tick(&mut pose, FRAME);

        assert!(report.animated);
        assert!(report.turned);
        assert!(report.arrived.is_none());
    }
}
