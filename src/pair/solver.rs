//! The relative-pose transform applied when an agent goes through a pair.
//!
//! Pure and idempotent for identical inputs. The order of operations is
//! load-bearing: the relative offset is expressed in the entry portal's
//! local frame, mirrored through the fixed vertical-axis flip, then
//! re-expressed in the exit portal's world frame. The orientation follows
//! the same chain composed right-to-left onto the agent's orientation.

use bevy::prelude::*;

use super::{AgentPose, Portal};
use crate::geometry;

pub(super) fn teleport_pose(
    agent: &AgentPose,
    entry: &Portal,
    exit: &Portal,
    forward_offset: f32,
) -> AgentPose {
    let flip = geometry::flip_y();

    let mut relative = agent.position - entry.position;
    relative = geometry::rotate(relative, entry.orientation.inverse());
    relative = geometry::rotate(relative, flip);
    relative = geometry::rotate(relative, exit.orientation);

    // Nudge along the exit portal's outward normal so the agent doesn't land
    // on the exit anchor itself.
    let lead = geometry::rotate(Vec3::Z * forward_offset, exit.orientation);
    let position = exit.position + relative + lead;

    let orientation = geometry::compose(
        exit.orientation,
        geometry::compose(
            flip,
            geometry::compose(entry.orientation.inverse(), agent.orientation),
        ),
    );

    AgentPose {
        position,
        orientation,
    }
}
