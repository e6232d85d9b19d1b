//! Bevy integration for the portal teleportation core.
//!
//! The hosting application spawns entities carrying a [`PortalPair`]
//! component plus any agent entities marked with [`PortalTeleport`]; this
//! plugin runs the pairs once per frame against each agent's `Transform`
//! and emits a [`Teleported`] event for every executed teleport so the host
//! can hook up effects, audio or scoring.

use bevy::prelude::*;

use crate::pair::{AgentPose, PortalId, PortalPair, TickOutcome};

#[derive(Debug)]
pub struct PortalPlugin;

impl Plugin for PortalPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<Teleported>()
            .add_system(teleport_entities.label(PortalLabels::TeleportEntities));
    }
}

#[derive(Debug, SystemLabel)]
pub enum PortalLabels {
    TeleportEntities,
}

/// Marker for entities that may travel through portal pairs.
#[derive(Debug, Clone, Default, Component)]
pub struct PortalTeleport;

/// Sent after an agent went through a pair.
#[derive(Debug, Clone)]
pub struct Teleported {
    pub pair: Entity,
    pub from: PortalId,
    pub to: PortalId,
}

/// Evaluate every pair against every marked agent, once per frame.
///
/// Pairs are visited in ascending `Entity` order so the outcome does not
/// depend on query iteration order; the first pair reporting a crossing for
/// an agent wins the tick and the remaining pairs are skipped for that
/// agent.
fn teleport_entities(
    time: Res<Time>,
    mut pairs: Query<(Entity, &mut PortalPair)>,
    mut agents: Query<&mut Transform, With<PortalTeleport>>,
    mut teleports: EventWriter<Teleported>,
) {
    let now = time.elapsed_seconds();
    let mut pairs = pairs.iter_mut().collect::<Vec<_>>();
    pairs.sort_by_key(|(entity, _)| *entity);

    for mut transform in &mut agents {
        let pose = AgentPose {
            position: transform.translation,
            orientation: transform.rotation,
        };
        for (entity, pair) in pairs.iter_mut() {
            match pair.tick(&pose, now) {
                TickOutcome::Teleported { pose, from, to } => {
                    transform.translation = pose.position;
                    transform.rotation = pose.orientation;
                    info!(
                        "Teleporting agent through pair {:?} ({:?} -> {:?})",
                        entity, from, to
                    );
                    teleports.send(Teleported {
                        pair: *entity,
                        from,
                        to,
                    });
                    break;
                }
                TickOutcome::Unchanged => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pair::{PairConfig, PortalPair};
    use crate::util::scenes;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugin(bevy::time::TimePlugin)
            .add_plugin(PortalPlugin);
        app
    }

    fn teleport_count(app: &App) -> usize {
        let events = app.world.resource::<Events<Teleported>>();
        events.get_reader().iter(events).count()
    }

    #[test]
    fn agent_inside_a_trigger_is_moved_and_notified() {
        let mut app = test_app();
        let pair = scenes::facing_pair(10., PairConfig::default()).unwrap();
        let exit_anchor = pair.portal_b().position;
        app.world.spawn((pair, Name::from("Pair")));
        let agent = app
            .world
            .spawn((
                Transform::from_xyz(0., 0., 1.),
                PortalTeleport,
                Name::from("Agent"),
            ))
            .id();

        app.update();

        let transform = app.world.get::<Transform>(agent).unwrap();
        assert!(transform.translation.distance(exit_anchor) < 2.);
        assert_eq!(teleport_count(&app), 1);
    }

    #[test]
    fn agent_out_of_range_is_left_alone() {
        let mut app = test_app();
        app.world
            .spawn(scenes::facing_pair(10., PairConfig::default()).unwrap());
        let agent = app
            .world
            .spawn((Transform::from_xyz(0., 0., 5.), PortalTeleport))
            .id();

        app.update();

        let transform = app.world.get::<Transform>(agent).unwrap();
        assert_eq!(transform.translation, Vec3::new(0., 0., 5.));
        assert_eq!(teleport_count(&app), 0);
    }

    #[test]
    fn first_spawned_pair_wins_the_tick() {
        let mut app = test_app();
        let first = app
            .world
            .spawn(scenes::facing_pair(10., PairConfig::default()).unwrap())
            .id();
        // Second pair overlaps the same trigger zone.
        let second = app
            .world
            .spawn(
                PortalPair::from_anchors(
                    Vec3::new(0., 0., 0.5),
                    Quat::IDENTITY,
                    Vec3::new(0., 0., 40.),
                    Quat::IDENTITY,
                    PairConfig::default(),
                )
                .unwrap(),
            )
            .id();
        app.world
            .spawn((Transform::from_xyz(0., 0., 1.), PortalTeleport));

        app.update();

        let winner = app.world.get::<PortalPair>(first).unwrap();
        assert!(winner.state().last_teleport_time.is_some());
        let loser = app.world.get::<PortalPair>(second).unwrap();
        assert!(loser.state().last_teleport_time.is_none());
        assert_eq!(teleport_count(&app), 1);
    }
}
