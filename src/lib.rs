#![allow(clippy::type_complexity)]

//! Portal pair teleportation engine.
//!
//! The core ([`pair`], [`geometry`]) is framework-free: build a
//! [`pair::PortalPair`], feed it agent snapshots and simulation time, apply
//! the poses it hands back. The [`plugins::portal`] module wraps the same
//! core as a bevy plugin for hosts that run an ECS schedule.

pub mod geometry;
pub mod pair;
pub mod plugins;
pub mod util;
