//! Crossing detection for a portal pair.
//!
//! Pure: the detector reads the pair state but never mutates it; acting on
//! the verdict is the controller's job.

use bevy::prelude::*;

use super::{PairConfig, Portal, PortalId, TeleportState};

/// A detected crossing: the agent entered through `entry` and will come out
/// of `exit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub entry: PortalId,
    pub exit: PortalId,
}

/// Verdict of a single detection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// The agent is inside a trigger radius and allowed through.
    Crossing(Crossing),
    /// The agent is beyond the trigger distance of both portals; the arrival
    /// guard may be cleared.
    Clear,
    /// Nothing to do this tick.
    Hold,
}

/// Evaluate the pair for one tick. Portal A is checked strictly before
/// portal B: when the pair stands closer together than twice the trigger
/// distance and both radii contain the agent, A wins. This is a deliberate
/// precedence rule, not an accident of iteration order.
pub(super) fn detect(
    portal_a: &Portal,
    portal_b: &Portal,
    config: &PairConfig,
    state: &TeleportState,
    agent_position: Vec3,
    now: f32,
) -> Detection {
    let distance_a = agent_position.distance(portal_a.position);
    let distance_b = agent_position.distance(portal_b.position);

    for (portal, other, distance) in [
        (portal_a, portal_b, distance_a),
        (portal_b, portal_a, distance_b),
    ] {
        if distance < config.trigger_distance
            && state.last_portal_used != Some(portal.id)
            && state.cooled_down(now, config.cooldown_duration)
        {
            return Detection::Crossing(Crossing {
                entry: portal.id,
                exit: other.id,
            });
        }
    }

    if distance_a > config.trigger_distance && distance_b > config.trigger_distance {
        return Detection::Clear;
    }

    Detection::Hold
}
