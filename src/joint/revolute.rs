use na::{Matrix3xX, UnitQuaternion, UnitVector3};
use nalgebra::Vector3;

use crate::{
    spatial::{geometric_jacobian::GeometricJacobian, transform::Transform3D, twist::Twist},
    types::Float,
};

/// Represents a revolute joint connecting a predecessor and a successor body.
///
/// Note: joint frame is defined as the successor body frame
#[derive(Clone, Debug)]
pub struct RevoluteJoint {
    pub transform: Transform3D, // transform from successor frame to predecessor frame at q = 0
    pub axis: UnitVector3<Float>, // axis of rotation expressed in successor body frame
}

impl RevoluteJoint {
    pub fn new(transform: Transform3D, axis: UnitVector3<Float>) -> Self {
        Self { transform, axis }
    }

    /// Transform from successor to predecessor, rotated around axis by q
    pub fn transform_at(&self, q: Float) -> Transform3D {
        Transform3D {
            from: self.transform.from.clone(),
            to: self.transform.to.clone(),
            iso: self.transform.iso * UnitQuaternion::from_axis_angle(&self.axis, q),
        }
    }

    pub fn twist(&self, v: Float) -> Twist {
        Twist {
            body: self.transform.from.clone(),
            base: self.transform.to.clone(),
            frame: self.transform.from.clone(),
            angular: self.axis.scale(v),
            linear: Vector3::zeros(),
        }
    }

    pub fn motion_subspace(&self) -> GeometricJacobian {
        GeometricJacobian {
            body: self.transform.from.clone(),
            base: self.transform.to.clone(),
            frame: self.transform.from.clone(),
            angular: Matrix3xX::from_column_slice(self.axis.as_slice()),
            linear: Matrix3xX::zeros(1),
        }
    }
}
