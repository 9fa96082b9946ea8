use na::{Matrix3xX, Translation3, UnitVector3};
use nalgebra::Vector3;

use crate::{
    spatial::{geometric_jacobian::GeometricJacobian, transform::Transform3D, twist::Twist},
    types::Float,
};

/// Represents a prismatic joint connecting a predecessor and a successor body.
///
/// Note: joint frame is defined as the successor body frame
#[derive(Clone, Debug)]
pub struct PrismaticJoint {
    pub transform: Transform3D,
    pub axis: UnitVector3<Float>, // axis expressed in successor body frame
}

impl PrismaticJoint {
    pub fn new(transform: Transform3D, axis: UnitVector3<Float>) -> Self {
        Self { transform, axis }
    }

    /// Transform from successor to predecessor, moved along axis by q
    pub fn transform_at(&self, q: Float) -> Transform3D {
        Transform3D {
            from: self.transform.from.clone(),
            to: self.transform.to.clone(),
            iso: self.transform.iso * Translation3::from(self.axis.scale(q)),
        }
    }

    pub fn twist(&self, v: Float) -> Twist {
        Twist {
            body: self.transform.from.clone(),
            base: self.transform.to.clone(),
            frame: self.transform.from.clone(),
            angular: Vector3::zeros(),
            linear: self.axis.scale(v),
        }
    }

    pub fn motion_subspace(&self) -> GeometricJacobian {
        GeometricJacobian {
            body: self.transform.from.clone(),
            base: self.transform.to.clone(),
            frame: self.transform.from.clone(),
            angular: Matrix3xX::zeros(1),
            linear: Matrix3xX::from_column_slice(self.axis.as_slice()),
        }
    }
}
