//! Vector and quaternion helpers shared by the portal transform code.
//!
//! Everything here is a pure function over [`Vec3`]/[`Quat`]. Malformed input
//! (NaN components, zero-length quaternions) is not rejected; it propagates as
//! NaN through the arithmetic and callers are expected to sanitize their
//! state before handing it to the engine.

use std::f32::consts::PI;

use bevy::prelude::*;
use euclid::Angle;

/// The fixed 180 degree turn around the world vertical axis applied when
/// remapping an agent from the entry portal frame to the exit portal frame.
pub fn flip_y() -> Quat {
    Quat::from_rotation_y(PI)
}

/// Quaternion composition, renormalized after the multiply so repeated
/// compositions don't drift away from unit length.
pub fn compose(lhs: Quat, rhs: Quat) -> Quat {
    (unit(lhs) * unit(rhs)).normalize()
}

/// Rotate a vector by an orientation.
pub fn rotate(v: Vec3, rotation: Quat) -> Vec3 {
    unit(rotation) * v
}

/// Build an orientation from intrinsic XYZ Euler angles.
pub fn from_euler(x: Angle<f32>, y: Angle<f32>, z: Angle<f32>) -> Quat {
    Quat::from_euler(EulerRot::XYZ, x.radians, y.radians, z.radians)
}

fn unit(q: Quat) -> Quat {
    if q.is_normalized() {
        q
    } else {
        q.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn flip_twice_is_identity() {
        let q = compose(flip_y(), flip_y());
        assert!(q.angle_between(Quat::IDENTITY) < EPS);
    }

    #[test]
    fn flip_reverses_horizontal_directions() {
        assert!(rotate(Vec3::Z, flip_y()).distance(Vec3::NEG_Z) < EPS);
        assert!(rotate(Vec3::X, flip_y()).distance(Vec3::NEG_X) < EPS);
        // The vertical axis is left alone.
        assert!(rotate(Vec3::Y, flip_y()).distance(Vec3::Y) < EPS);
    }

    #[test]
    fn compose_renormalizes_scaled_inputs() {
        let skewed = Quat::from_rotation_y(0.7) * 3.;
        let composed = compose(skewed, Quat::from_rotation_y(0.1));
        assert!(composed.is_normalized());
        assert!(composed.angle_between(Quat::from_rotation_y(0.8)) < EPS);
    }

    #[test]
    fn rotate_accepts_non_unit_orientation() {
        let skewed = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2) * 0.25;
        assert!(rotate(Vec3::Z, skewed).distance(Vec3::X) < EPS);
    }

    #[test]
    fn from_euler_matches_axis_angle_for_single_axis() {
        let q = from_euler(
            Angle::zero(),
            Angle::degrees(90.),
            Angle::zero(),
        );
        assert!(q.angle_between(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)) < EPS);
    }

    #[test]
    fn nan_input_propagates() {
        let broken = Vec3::new(f32::NAN, 0., 0.);
        assert!(rotate(broken, flip_y()).x.is_nan());
    }
}
