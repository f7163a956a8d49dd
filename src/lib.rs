//! Click-to-navigate locomotion controller.
//!
//! A pointer press is resolved to a point on the walkable surfaces, the actor
//! turns toward it at a bounded rate while a position tween carries it there,
//! and the animation state cross-fades between idle, walk and run clips along
//! the way. The core is engine-agnostic; [`LocomotionPlugin`] wires it into a
//! Bevy app.
pub mod animation;
pub mod camera;
pub mod constants;
pub mod facing;
pub mod logging;
pub mod motion;
pub mod navigator;
pub mod numeric;
pub mod plugin;
pub mod pointer;
pub mod raycast;
pub mod scheduler;
pub mod settings;
pub mod tunables;
pub mod tween;
pub mod vector_math;
pub use constants::*;

// Re-export commonly used items
pub use animation::{
    AnimationError, AnimationSwitcher, CatalogClipSource, Clip, ClipLoadError, ClipLoadPlan,
    ClipLoadQueue, ClipName, ClipSource, LoadEvent, LoadPoll, Mixer, WeightMixer,
};
pub use camera::{ndc_from_screen, PerspectiveCamera};
pub use facing::facing_towards;
pub use logging::init as init_logging;
pub use motion::{travel_duration, Gait, MotionDriver, NavigationRequest};
pub use navigator::{Actor, Intent, Navigator, Phase, Pose};
pub use plugin::{
    ActorArrived, ClipLoadFailed, ClipLoading, Locomotion, LocomotionConfig, LocomotionPlugin,
    PerformIntent, PointerControlled, PointerInput, PointerPress, PointerScreenPress, ViewCamera,
    Viewport, WalkableSet,
};
pub use pointer::{resolve_target, ClickClassifier, PointerGesture};
pub use raycast::{Plane, Quad, Ray, RayTarget, TriangleMesh, WalkableSurfaces};
pub use scheduler::FrameReport;
pub use settings::{LocomotionSettings, SettingsError};
pub use tunables::{TunableError, Tunables};
pub use tween::{Easing, Tween};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use ambler::prelude::*;
    //! ```

    pub use crate::{
        Actor, Gait, LocomotionPlugin, LocomotionSettings, Navigator, PointerGesture, Pose,
        WalkableSurfaces, WeightMixer,
    };
}
