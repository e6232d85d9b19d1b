//! Canned portal layouts used by the demo binary and the tests.

use bevy::prelude::*;

use crate::pair::{ConfigurationError, PairConfig, PairDescriptor, PortalPair};

/// An infinite corridor: two portals on the Z axis facing each other, so an
/// agent walking through one keeps arriving at the other. Spacing and
/// rotations are kept in a descriptor to exercise the same path a scene file
/// would take.
const CORRIDOR_PAIR: &str = r#"{
    "portal_a": { "id": 1, "position": [0, 1, -5], "rotation": [0, 0, 0], "linked_portal": 2 },
    "portal_b": { "id": 2, "position": [0, 1, 5], "rotation": [0, 180, 0], "linked_portal": 1 }
}"#;

pub fn corridor_pair() -> PortalPair {
    let descriptor: PairDescriptor =
        serde_json::from_str(CORRIDOR_PAIR).expect("corridor pair descriptor parses");
    PortalPair::try_from(descriptor).expect("corridor pair descriptor is a valid pair")
}

/// Two portals `spacing` apart along X, both with identity orientation.
pub fn facing_pair(spacing: f32, config: PairConfig) -> Result<PortalPair, ConfigurationError> {
    PortalPair::from_anchors(
        Vec3::ZERO,
        Quat::IDENTITY,
        Vec3::new(spacing, 0., 0.),
        Quat::IDENTITY,
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pair::PortalId;

    #[test]
    fn corridor_descriptor_stays_valid() {
        let pair = corridor_pair();
        assert_eq!(pair.portal_a().id, PortalId(1));
        assert_eq!(pair.portal_b().linked_portal, PortalId(1));
        // The two ends face one another.
        assert!(pair.portal_a().forward().dot(pair.portal_b().forward()) < -0.99);
    }
}
