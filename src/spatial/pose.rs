use na::{Isometry3, Translation3, UnitQuaternion, Vector3};

use crate::types::Float;

/// Position of a floating joint: orientation and translation of the
/// successor frame in the predecessor frame.
#[derive(Clone, Debug, PartialEq, Copy)]
pub struct Pose {
    pub rotation: UnitQuaternion<Float>,
    pub translation: Vector3<Float>,
}

impl Pose {
    pub fn identity() -> Self {
        Pose {
            rotation: UnitQuaternion::identity(),
            translation: Vector3::zeros(),
        }
    }

    pub fn to_isometry(&self) -> Isometry3<Float> {
        Isometry3::from_parts(Translation3::from(self.translation), self.rotation)
    }

    pub fn from_isometry(iso: &Isometry3<Float>) -> Self {
        Pose {
            rotation: iso.rotation,
            translation: iso.translation.vector,
        }
    }
}
