#![allow(clippy::type_complexity)]

//! Headless demo: an agent walks an infinite corridor between two facing
//! portals, teleporting back and forth. Runs under the schedule runner with
//! no window; each crossing is logged, and the app exits after a handful of
//! them.

use std::time::Duration;

use bevy::{
    app::{AppExit, ScheduleRunnerSettings},
    log::LogPlugin,
    prelude::*,
};

use portal_teleport::{
    plugins::portal::{PortalPlugin, PortalTeleport, Teleported},
    util::scenes,
};

const WALK_SPEED: f32 = 3.;
const DEMO_CROSSINGS: u32 = 4;

fn main() {
    App::new()
        .insert_resource(ScheduleRunnerSettings::run_loop(Duration::from_secs_f64(
            1. / 60.,
        )))
        .add_plugins(MinimalPlugins)
        .add_plugin(LogPlugin::default())
        .add_plugin(TransformPlugin)
        .add_plugin(PortalPlugin)
        .add_startup_system(setup)
        .add_system(walk_forward)
        .add_system(report_crossings)
        .run();
}

#[derive(Debug, Default, Component)]
struct DemoAgent;

fn setup(mut commands: Commands) {
    commands.spawn((scenes::corridor_pair(), Name::from("Corridor pair")));
    // Start between the portals, walking towards portal 1.
    commands.spawn((
        TransformBundle::from(Transform::from_xyz(0., 1., 0.)),
        PortalTeleport,
        DemoAgent,
        Name::from("Agent"),
    ));
    info!("Walk towards portal 1; the corridor never ends");
}

fn walk_forward(time: Res<Time>, mut agents: Query<&mut Transform, With<DemoAgent>>) {
    for mut transform in &mut agents {
        let forward = transform.forward();
        transform.translation += forward * WALK_SPEED * time.delta_seconds();
    }
}

fn report_crossings(
    mut teleports: EventReader<Teleported>,
    mut crossings: Local<u32>,
    mut exit: EventWriter<AppExit>,
) {
    for teleport in teleports.iter() {
        *crossings += 1;
        info!(
            "Crossing {} of {}: {:?} -> {:?}",
            *crossings, DEMO_CROSSINGS, teleport.from, teleport.to
        );
        if *crossings >= DEMO_CROSSINGS {
            info!("Done walking in circles, bye");
            exit.send(AppExit);
        }
    }
}
