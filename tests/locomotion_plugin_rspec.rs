//! Behavioural tests for `LocomotionPlugin` using rust-rspec.
//!
//! Each test owns its app; suites run serially so examples observe the shared
//! world in declaration order.

#[path = "support/thread_safe_app.rs"]
mod thread_safe_app;

#[path = "support/rspec_runner.rs"]
mod rspec_runner;

#[path = "support/locomotion_fixture.rs"]
mod locomotion_fixture;

use ambler::{CatalogClipSource, Gait, Intent, LocomotionSettings, Phase};
use bevy::prelude::*;
use locomotion_fixture::LocomotionFixture;
use rspec::block::Context as Scenario;
use rspec_runner::run_serial;
use test_utils::{assert_vec3_near, standard_catalog, standard_plan};

const START: Vec3 = Vec3::new(4.0, 0.0, 0.0);

fn standard_fixture() -> LocomotionFixture {
    LocomotionFixture::bootstrap(
        LocomotionSettings::default(),
        standard_plan(),
        standard_catalog(0),
        START,
    )
}

#[test]
fn single_press_walks_actor_to_pointer_target() {
    run_serial(&rspec::given(
        "an actor standing on the ground with every clip loaded",
        standard_fixture(),
        |scenario: &mut Scenario<LocomotionFixture>| {
            scenario.then("the actor idles with its mixer running", |state| {
                assert_eq!(state.phase(), Some(Phase::Idle));
                assert_eq!(state.clip().as_deref(), Some("idle"));
                assert!(state.animation_ready());
            });

            scenario.when("the pointer is pressed once at the centre of the view", |ctx| {
                ctx.before_all(|state| {
                    state.press(Vec2::ZERO, 1);
                    state.tick(1);
                });

                ctx.then("the actor starts walking", |state| {
                    assert_eq!(state.phase(), Some(Phase::Moving(Gait::Walk)));
                    assert_eq!(state.clip().as_deref(), Some("walk"));
                    assert!(state.position().x < START.x);
                });

                ctx.when("the trip has had time to finish", |ctx| {
                    ctx.before_all(|state| state.tick(40));

                    ctx.then("the actor stands on the target and idles", |state| {
                        assert_vec3_near(state.position(), Vec3::ZERO, 1e-3);
                        assert_eq!(state.phase(), Some(Phase::Idle));
                        assert_eq!(state.clip().as_deref(), Some("idle"));
                    });

                    ctx.then("exactly one arrival is reported", |state| {
                        let arrivals = state.arrivals();
                        assert_eq!(arrivals.len(), 1);
                        assert_eq!(arrivals.first().map(|a| a.entity), Some(state.actor()));
                    });
                });
            });
        },
    ));
}

#[test]
fn double_press_runs_actor() {
    run_serial(&rspec::given(
        "an actor standing on the ground with every clip loaded",
        standard_fixture(),
        |scenario: &mut Scenario<LocomotionFixture>| {
            scenario.when("the pointer is pressed twice in quick succession", |ctx| {
                ctx.before_all(|state| {
                    state.press(Vec2::ZERO, 2);
                    state.tick(1);
                });

                ctx.then("the actor runs with the run clip", |state| {
                    assert_eq!(state.phase(), Some(Phase::Moving(Gait::Run)));
                    assert_eq!(state.clip().as_deref(), Some("run"));
                });

                ctx.when("half of the walking time has passed", |ctx| {
                    ctx.before_all(|state| state.tick(14));

                    ctx.then("the running actor has already arrived", |state| {
                        assert_vec3_near(state.position(), Vec3::ZERO, 1e-3);
                        assert_eq!(state.phase(), Some(Phase::Idle));
                    });
                });
            });
        },
    ));
}

#[test]
fn failed_clip_is_reported_and_skipped() {
    let source = CatalogClipSource::new()
        .with_clip("clips/idle.anim", 2.0)
        .with_clip("clips/walk.anim", 1.0)
        .with_clip("clips/run.anim", 0.7);
    let fixture =
        LocomotionFixture::bootstrap(LocomotionSettings::default(), standard_plan(), source, START);

    run_serial(&rspec::given(
        "a clip plan whose cheer clip is missing",
        fixture,
        |scenario: &mut Scenario<LocomotionFixture>| {
            scenario.then("the failure is raised as an event", |state| {
                assert_eq!(state.failures(), vec!["cheer".to_owned()]);
            });

            scenario.then("the remaining clips still make the actor ready", |state| {
                assert!(state.animation_ready());
                assert_eq!(state.clip().as_deref(), Some("idle"));
            });

            scenario.when("the cheer intent is requested", |ctx| {
                ctx.before_all(|state| state.perform(Intent::Cheer));

                ctx.then("the actor keeps its current clip", |state| {
                    assert_eq!(state.clip().as_deref(), Some("idle"));
                });
            });
        },
    ));
}

#[test]
fn cheer_intent_switches_clip_in_place() {
    run_serial(&rspec::given(
        "an idle actor with every clip loaded",
        standard_fixture(),
        |scenario: &mut Scenario<LocomotionFixture>| {
            scenario.when("the cheer intent is requested", |ctx| {
                ctx.before_all(|state| {
                    state.perform(Intent::Cheer);
                    state.tick(5);
                });

                ctx.then("the cheer clip plays without moving the actor", |state| {
                    assert_eq!(state.clip().as_deref(), Some("cheer"));
                    assert_eq!(state.phase(), Some(Phase::Idle));
                    assert_vec3_near(state.position(), START, 1e-6);
                });
            });
        },
    ));
}

#[test]
fn configuration_changes_reach_existing_actors() {
    run_serial(&rspec::given(
        "an actor spawned with the default settings",
        standard_fixture(),
        |scenario: &mut Scenario<LocomotionFixture>| {
            scenario.when("the turn rate is lowered in the shared configuration", |ctx| {
                ctx.before_all(|state| {
                    state.configure(|settings| settings.turn_rate = 12.0);
                    state.tick(1);
                });

                ctx.then("the actor's navigator uses the new rate", |state| {
                    assert_eq!(state.turn_rate(), Some(12.0));
                });
            });
        },
    ));
}
