//! Portal pair teleportation core.
//!
//! A [`PortalPair`] owns the static geometry of two linked portals, the
//! tuning knobs ([`PairConfig`]) and the per-pair anti-bounce/cooldown state
//! ([`TeleportState`]). Each simulation tick the caller hands it a snapshot
//! of the moving agent plus the current simulation time; the pair answers
//! with either [`TickOutcome::Unchanged`] or a fully computed replacement
//! pose. The pair never retains a reference to the agent.
//!
//! Construction is the only place errors can occur: a pair with a dangling
//! or self-referential link, duplicate portal ids or non-positive tuning
//! values is rejected with a [`ConfigurationError`] and never becomes
//! tickable.

use bevy::prelude::*;
use euclid::Angle;
use serde::Deserialize;
use thiserror::Error;

use crate::geometry;

mod detector;
mod solver;

pub use detector::{Crossing, Detection};

/// Identifier of a single portal. Unique within its pair; the ECS layer
/// disambiguates across pairs with the pair's `Entity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub struct PortalId(pub u32);

/// One half of a portal pair. Geometry is set at construction and only read
/// afterwards; the owner of the pair decides where portals stand.
#[derive(Debug, Clone, Copy)]
pub struct Portal {
    pub id: PortalId,
    pub position: Vec3,
    pub orientation: Quat,
    pub linked_portal: PortalId,
}

impl Portal {
    pub fn new(id: PortalId, position: Vec3, orientation: Quat, linked_portal: PortalId) -> Self {
        Portal {
            id,
            position,
            orientation,
            linked_portal,
        }
    }

    /// Outward normal of the portal surface (local +Z).
    pub fn forward(&self) -> Vec3 {
        geometry::rotate(Vec3::Z, self.orientation)
    }
}

/// Tuning knobs for a pair. All values are strictly positive; zero or
/// negative values are rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PairConfig {
    /// Distance from a portal anchor below which a crossing triggers.
    pub trigger_distance: f32,
    /// Minimum simulation-time interval between two teleports through the pair.
    pub cooldown_duration: f32,
    /// Push along the exit portal's outward normal applied to the landing
    /// position so the agent doesn't immediately sit on the exit anchor.
    pub forward_offset: f32,
}

impl Default for PairConfig {
    fn default() -> Self {
        PairConfig {
            trigger_distance: 2.0,
            cooldown_duration: 1.0,
            forward_offset: 0.5,
        }
    }
}

impl PairConfig {
    fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in [
            ("trigger_distance", self.trigger_distance),
            ("cooldown_duration", self.cooldown_duration),
            ("forward_offset", self.forward_offset),
        ] {
            // `!(value > 0.)` also catches NaN.
            if !(value > 0.) {
                return Err(ConfigurationError::NonPositiveParameter { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("portal {0:?} is linked to itself")]
    SelfLink(PortalId),
    #[error("both portals of the pair carry the id {0:?}")]
    DuplicateId(PortalId),
    #[error("portal {from:?} links to {to:?}, which is not the other portal of the pair")]
    DanglingLink { from: PortalId, to: PortalId },
    #[error("{name} must be strictly positive, got {value}")]
    NonPositiveParameter { name: &'static str, value: f32 },
}

/// Cooldown and anti-bounce bookkeeping. Exactly one of these exists per
/// pair, owned by the pair itself and mutated only from [`PortalPair::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TeleportState {
    /// Simulation time of the most recent teleport, if any.
    pub last_teleport_time: Option<f32>,
    /// Exit portal of the most recent teleport, cleared once the agent moves
    /// beyond the trigger distance of both portals.
    pub last_portal_used: Option<PortalId>,
}

impl TeleportState {
    /// Whether the cooldown has elapsed. Trivially true before any teleport.
    pub fn cooled_down(&self, now: f32, cooldown_duration: f32) -> bool {
        match self.last_teleport_time {
            None => true,
            Some(t) => now - t >= cooldown_duration,
        }
    }
}

/// The two logical phases of a pair's controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairPhase {
    /// A teleport may occur this tick.
    Armed,
    /// A teleport happened less than a cooldown ago.
    CoolingDown,
}

/// Snapshot of the moving agent, handed in and out by value every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentPose {
    pub position: Vec3,
    pub orientation: Quat,
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No crossing; the agent keeps its pose.
    Unchanged,
    /// The agent went through the pair and should adopt `pose`.
    Teleported {
        pose: AgentPose,
        from: PortalId,
        to: PortalId,
    },
}

#[derive(Debug, Clone, Component)]
pub struct PortalPair {
    portal_a: Portal,
    portal_b: Portal,
    config: PairConfig,
    state: TeleportState,
}

impl PortalPair {
    /// Build a pair from two explicitly linked portals. The links must be
    /// symmetric and the ids distinct.
    pub fn new(
        portal_a: Portal,
        portal_b: Portal,
        config: PairConfig,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        for portal in [&portal_a, &portal_b] {
            if portal.linked_portal == portal.id {
                return Err(ConfigurationError::SelfLink(portal.id));
            }
        }
        if portal_a.id == portal_b.id {
            return Err(ConfigurationError::DuplicateId(portal_a.id));
        }
        if portal_a.linked_portal != portal_b.id {
            return Err(ConfigurationError::DanglingLink {
                from: portal_a.id,
                to: portal_a.linked_portal,
            });
        }
        if portal_b.linked_portal != portal_a.id {
            return Err(ConfigurationError::DanglingLink {
                from: portal_b.id,
                to: portal_b.linked_portal,
            });
        }
        Ok(PortalPair {
            portal_a,
            portal_b,
            config,
            state: TeleportState::default(),
        })
    }

    /// Factory for the common case: two anchors, symmetric links assigned by
    /// the pair itself (pair-local ids 1 and 2).
    pub fn from_anchors(
        position_a: Vec3,
        orientation_a: Quat,
        position_b: Vec3,
        orientation_b: Quat,
        config: PairConfig,
    ) -> Result<Self, ConfigurationError> {
        let (a, b) = (PortalId(1), PortalId(2));
        PortalPair::new(
            Portal::new(a, position_a, orientation_a, b),
            Portal::new(b, position_b, orientation_b, a),
            config,
        )
    }

    pub fn portal_a(&self) -> &Portal {
        &self.portal_a
    }

    pub fn portal_b(&self) -> &Portal {
        &self.portal_b
    }

    pub fn config(&self) -> &PairConfig {
        &self.config
    }

    pub fn state(&self) -> &TeleportState {
        &self.state
    }

    pub fn phase(&self, now: f32) -> PairPhase {
        if self.state.cooled_down(now, self.config.cooldown_duration) {
            PairPhase::Armed
        } else {
            PairPhase::CoolingDown
        }
    }

    /// Run one simulation tick: detect a crossing, solve the transform and
    /// update the pair state. At most one teleport per call.
    pub fn tick(&mut self, agent: &AgentPose, now: f32) -> TickOutcome {
        match detector::detect(
            &self.portal_a,
            &self.portal_b,
            &self.config,
            &self.state,
            agent.position,
            now,
        ) {
            Detection::Crossing(crossing) => {
                let (entry, exit) = if crossing.entry == self.portal_a.id {
                    (&self.portal_a, &self.portal_b)
                } else {
                    (&self.portal_b, &self.portal_a)
                };
                let pose = solver::teleport_pose(agent, entry, exit, self.config.forward_offset);
                self.state.last_teleport_time = Some(now);
                self.state.last_portal_used = Some(crossing.exit);
                TickOutcome::Teleported {
                    pose,
                    from: crossing.entry,
                    to: crossing.exit,
                }
            }
            Detection::Clear => {
                self.state.last_portal_used = None;
                TickOutcome::Unchanged
            }
            Detection::Hold => TickOutcome::Unchanged,
        }
    }
}

/// Declarative form of a portal, as found in scene JSON. Rotations are
/// intrinsic XYZ Euler angles in degrees.
#[derive(Debug, Clone, Deserialize)]
pub struct PortalDescriptor {
    pub id: PortalId,
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
    pub linked_portal: PortalId,
}

impl PortalDescriptor {
    fn to_portal(&self) -> Portal {
        let [x, y, z] = self.rotation;
        Portal::new(
            self.id,
            Vec3::from(self.position),
            geometry::from_euler(Angle::degrees(x), Angle::degrees(y), Angle::degrees(z)),
            self.linked_portal,
        )
    }
}

/// Declarative form of a whole pair.
#[derive(Debug, Clone, Deserialize)]
pub struct PairDescriptor {
    pub portal_a: PortalDescriptor,
    pub portal_b: PortalDescriptor,
    #[serde(default)]
    pub config: PairConfig,
}

impl TryFrom<PairDescriptor> for PortalPair {
    type Error = ConfigurationError;

    fn try_from(descriptor: PairDescriptor) -> Result<Self, Self::Error> {
        PortalPair::new(
            descriptor.portal_a.to_portal(),
            descriptor.portal_b.to_portal(),
            descriptor.config,
        )
    }
}
