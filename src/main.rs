//! Headless demo of the locomotion controller.
//!
//! Spawns an actor on a ground quad, replays a click and a double click, and
//! logs the final pose.

use std::path::PathBuf;
use std::time::Duration;

use ambler::prelude::*;
use ambler::{
    init_logging, ActorArrived, CatalogClipSource, ClipLoadPlan, ClipLoading, Locomotion,
    LocomotionConfig, PerspectiveCamera, PointerControlled, PointerPress, PointerScreenPress, Quad,
    Tunables, ViewCamera, Viewport, WalkableSet,
};
use anyhow::{Context, Result};
use bevy::ecs::prelude::On;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use clap::Parser;
use log::info;

const FRAME: Duration = Duration::from_millis(16);

/// Click-to-navigate locomotion demo
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// JSON file overriding the default locomotion settings
    #[arg(short, long)]
    settings: Option<PathBuf>,
    /// Override a tunable, for example `locomotion.turn_rate=12`
    #[arg(long = "set", value_name = "NAME=VALUE")]
    assignments: Vec<String>,
    /// Number of 16 ms frames to simulate
    #[arg(short, long, default_value_t = 180)]
    frames: u32,
}

fn load_settings(args: &Args) -> Result<LocomotionSettings> {
    let mut settings = match &args.settings {
        Some(path) => LocomotionSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => LocomotionSettings::default(),
    };
    let mut tunables = Tunables::for_settings(&settings)?;
    for assignment in &args.assignments {
        let value = tunables
            .apply_assignment(assignment)
            .with_context(|| format!("applying --set {assignment}"))?;
        info!("{assignment} -> {value}");
    }
    tunables.apply_to(&mut settings);
    settings.validate().context("validating tuned settings")?;
    Ok(settings)
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn log_arrival(event: On<ActorArrived>) {
    let ActorArrived { entity, position } = event.event();
    info!("{entity} arrived at {position}");
}

fn build_app(settings: &LocomotionSettings) -> App {
    let plan = ClipLoadPlan::new()
        .clip(settings.clips.idle.clone(), "clips/idle.anim")
        .clip(settings.clips.walk.clone(), "clips/walk.anim")
        .clip(settings.clips.run.clone(), "clips/run.anim")
        .clip(settings.clips.cheer.clone(), "clips/cheer.anim");
    let source = CatalogClipSource::new()
        .with_clip("clips/idle.anim", 2.0)
        .with_clip("clips/walk.anim", 1.0)
        .with_clip("clips/run.anim", 0.7)
        .with_clip("clips/cheer.anim", 2.5)
        .with_latency(2);

    let mut camera = PerspectiveCamera::default().looking_at(
        Vec3::new(0.0, 6.0, 8.0),
        Vec3::ZERO,
        settings.up,
    );
    let viewport = Vec2::new(1280.0, 720.0);
    camera.resize(viewport.x, viewport.y);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
        .insert_resource(LocomotionConfig(settings.clone()))
        .insert_resource(ViewCamera(camera))
        .insert_resource(Viewport(viewport))
        .insert_resource(WalkableSet(
            WalkableSurfaces::new().with(Quad::ground(Vec3::ZERO, 20.0, 20.0)),
        ))
        .insert_resource(ClipLoading::new(&plan, source))
        .add_plugins(LocomotionPlugin)
        .add_observer(log_arrival);
    app.world_mut().spawn((
        Name::new("Actor"),
        Transform::default(),
        Locomotion::new(settings.clone()),
        PointerControlled,
    ));
    app
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let settings = load_settings(&args)?;
    let mut app = build_app(&settings);
    app.finish();
    app.cleanup();

    let half = args.frames / 2;
    for frame in 0..args.frames {
        if frame == 10 {
            app.world_mut().trigger(PointerScreenPress {
                cursor: Vec2::new(896.0, 468.0),
            });
        }
        if frame == half {
            for _ in 0..2 {
                app.world_mut().trigger(PointerPress {
                    ndc: Vec2::new(-0.5, -0.1),
                });
            }
        }
        app.update();
    }

    let world = app.world_mut();
    let mut actors = world.query::<(&Name, &Transform, &Locomotion)>();
    for (name, transform, locomotion) in actors.iter(world) {
        info!(
            "{name}: position {}, facing {}, phase {:?}, clip {:?}",
            transform.translation,
            transform.rotation,
            locomotion.navigator().phase(),
            locomotion.navigator().active_clip().map(ambler::ClipName::as_str),
        );
    }
    Ok(())
}
