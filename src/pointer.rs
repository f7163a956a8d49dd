//! Pointer gestures and pointer-to-surface resolution.
//!
//! Raw button presses become [`PointerGesture`]s through a [`ClickClassifier`];
//! a gesture's NDC position is then resolved against the walkable surfaces
//! with [`resolve_target`].

use std::time::Duration;

use glam::{Vec2, Vec3};
use log::debug;

use crate::camera::PerspectiveCamera;
use crate::motion::Gait;
use crate::raycast::WalkableSurfaces;
use crate::{DOUBLE_CLICK_MILLIS, DOUBLE_CLICK_SLOP};

/// Pointer gesture recognised by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerGesture {
    /// A single press. Walks to the target.
    Click,
    /// Two presses in quick succession. Runs to the target.
    DoubleClick,
}

impl PointerGesture {
    /// Gait requested by this gesture.
    #[must_use]
    pub const fn gait(self) -> Gait {
        match self {
            Self::Click => Gait::Walk,
            Self::DoubleClick => Gait::Run,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Press {
    at: Duration,
    ndc: Vec2,
}

/// Classifies button presses into clicks and double clicks.
///
/// Every press is a click. A press that follows the previous one within the
/// window and without drifting further than the slop is also a double click;
/// the pair is then consumed, so a third press starts over.
#[derive(Clone, Debug, PartialEq)]
pub struct ClickClassifier {
    window: Duration,
    slop: f32,
    last: Option<Press>,
}

impl Default for ClickClassifier {
    fn default() -> Self {
        Self::new(Duration::from_millis(DOUBLE_CLICK_MILLIS), DOUBLE_CLICK_SLOP)
    }
}

impl ClickClassifier {
    /// Creates a classifier with the given double-click window and slop.
    #[must_use]
    pub const fn new(window: Duration, slop: f32) -> Self {
        Self {
            window,
            slop,
            last: None,
        }
    }

    /// Records a press at time `at` and returns the gestures it completes.
    pub fn press(&mut self, at: Duration, ndc: Vec2) -> Vec<PointerGesture> {
        let press = Press { at, ndc };
        let double = self.last.is_some_and(|last| {
            at.checked_sub(last.at)
                .is_some_and(|gap| gap <= self.window)
                && last.ndc.distance(ndc) <= self.slop
        });
        if double {
            self.last = None;
            return vec![PointerGesture::Click, PointerGesture::DoubleClick];
        }
        self.last = Some(press);
        vec![PointerGesture::Click]
    }

    /// Forgets the pending first press.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Resolves `ndc` to the nearest point on `surfaces` seen through `camera`.
///
/// Returns `None` when the ray misses every surface or the surface set is
/// empty.
#[must_use]
pub fn resolve_target(
    ndc: Vec2,
    camera: &PerspectiveCamera,
    surfaces: &WalkableSurfaces,
) -> Option<Vec3> {
    let ray = camera.ray_through(ndc)?;
    let hit = surfaces.nearest_hit(&ray);
    if hit.is_none() {
        debug!("pointer at {ndc:?} hit no walkable surface");
    }
    hit.map(|found| found.point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raycast::{Plane, Quad};
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn overhead() -> PerspectiveCamera {
        PerspectiveCamera::default().looking_at(Vec3::new(0.0, 10.0, 0.01), Vec3::ZERO, Vec3::Y)
    }

    #[rstest]
    fn second_press_within_window_is_double_click() {
        let mut classifier = ClickClassifier::default();
        assert_eq!(
            classifier.press(Duration::from_millis(1000), Vec2::ZERO),
            vec![PointerGesture::Click]
        );
        assert_eq!(
            classifier.press(Duration::from_millis(1250), Vec2::ZERO),
            vec![PointerGesture::Click, PointerGesture::DoubleClick]
        );
        assert_eq!(
            classifier.press(Duration::from_millis(1400), Vec2::ZERO),
            vec![PointerGesture::Click]
        );
    }

    #[rstest]
    #[case(Duration::from_millis(400), Vec2::ZERO)]
    #[case(Duration::from_millis(100), Vec2::new(0.2, 0.0))]
    fn slow_or_distant_presses_stay_single(#[case] gap: Duration, #[case] moved: Vec2) {
        let mut classifier = ClickClassifier::default();
        classifier.press(Duration::ZERO, Vec2::ZERO);
        assert_eq!(classifier.press(gap, moved), vec![PointerGesture::Click]);
    }

    #[rstest]
    fn gestures_map_to_gaits() {
        assert_eq!(PointerGesture::Click.gait(), Gait::Walk);
        assert_eq!(PointerGesture::DoubleClick.gait(), Gait::Run);
    }

    #[rstest]
    fn centre_click_resolves_below_camera(overhead: PerspectiveCamera) {
        let surfaces = WalkableSurfaces::new().with(Quad::ground(Vec3::ZERO, 20.0, 20.0));
        let target = resolve_target(Vec2::ZERO, &overhead, &surfaces).expect("ground hit");
        assert_relative_eq!(target.y, 0.0, epsilon = 1e-4);
        assert!(target.x.abs() < 0.05 && target.z.abs() < 0.05);
    }

    #[rstest]
    fn empty_surface_set_resolves_nothing(overhead: PerspectiveCamera) {
        let surfaces = WalkableSurfaces::new();
        assert!(resolve_target(Vec2::ZERO, &overhead, &surfaces).is_none());
    }

    #[rstest]
    fn nearer_surface_wins(overhead: PerspectiveCamera) {
        let surfaces = WalkableSurfaces::new()
            .with(Plane::horizontal(0.0))
            .with(Plane::horizontal(2.0));
        let target = resolve_target(Vec2::ZERO, &overhead, &surfaces).expect("hit");
        assert_relative_eq!(target.y, 2.0, epsilon = 1e-4);
    }
}
