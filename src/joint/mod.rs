use floating::{neutral_pose_q, FloatingJoint};
use na::UnitVector3;
use prismatic::PrismaticJoint;
use revolute::RevoluteJoint;

use crate::{
    spatial::{geometric_jacobian::GeometricJacobian, transform::Transform3D, twist::Twist},
    types::Float,
};

pub mod floating;
pub mod prismatic;
pub mod revolute;

/// A joint connecting a successor body (`transform.from`) to its
/// predecessor (`transform.to`). Joints hold no state: positions and
/// velocities are slices of the generalized vectors.
#[derive(Clone, Debug)]
pub enum Joint {
    RevoluteJoint(RevoluteJoint),
    PrismaticJoint(PrismaticJoint),
    FloatingJoint(FloatingJoint),
}

impl Joint {
    pub fn new_revolute(transform: Transform3D, axis: UnitVector3<Float>) -> Self {
        Joint::RevoluteJoint(RevoluteJoint::new(transform, axis))
    }

    pub fn new_prismatic(transform: Transform3D, axis: UnitVector3<Float>) -> Self {
        Joint::PrismaticJoint(PrismaticJoint::new(transform, axis))
    }

    pub fn new_floating(transform: Transform3D) -> Self {
        Joint::FloatingJoint(FloatingJoint::new(transform))
    }

    /// Transform from successor to predecessor at the zero position
    pub fn transform(&self) -> &Transform3D {
        match self {
            Joint::RevoluteJoint(joint) => &joint.transform,
            Joint::PrismaticJoint(joint) => &joint.transform,
            Joint::FloatingJoint(joint) => &joint.transform,
        }
    }

    /// Dimension of the joint position
    pub fn nq(&self) -> usize {
        match self {
            Joint::RevoluteJoint(_) | Joint::PrismaticJoint(_) => 1,
            Joint::FloatingJoint(_) => FloatingJoint::NQ,
        }
    }

    /// Dimension of the joint velocity
    pub fn nv(&self) -> usize {
        match self {
            Joint::RevoluteJoint(_) | Joint::PrismaticJoint(_) => 1,
            Joint::FloatingJoint(_) => FloatingJoint::NV,
        }
    }

    /// Transform from successor to predecessor at position q
    pub fn transform_at(&self, q: &[Float]) -> Transform3D {
        match self {
            Joint::RevoluteJoint(joint) => joint.transform_at(q[0]),
            Joint::PrismaticJoint(joint) => joint.transform_at(q[0]),
            Joint::FloatingJoint(joint) => joint.transform_at(q),
        }
    }

    /// Twist of successor wrt. predecessor, expressed in successor frame
    pub fn twist(&self, v: &[Float]) -> Twist {
        match self {
            Joint::RevoluteJoint(joint) => joint.twist(v[0]),
            Joint::PrismaticJoint(joint) => joint.twist(v[0]),
            Joint::FloatingJoint(joint) => joint.twist(v),
        }
    }

    pub fn motion_subspace(&self) -> GeometricJacobian {
        match self {
            Joint::RevoluteJoint(joint) => joint.motion_subspace(),
            Joint::PrismaticJoint(joint) => joint.motion_subspace(),
            Joint::FloatingJoint(joint) => joint.motion_subspace(),
        }
    }

    pub fn neutral(&self) -> Vec<Float> {
        match self {
            Joint::RevoluteJoint(_) | Joint::PrismaticJoint(_) => vec![0.],
            Joint::FloatingJoint(_) => neutral_pose_q().to_vec(),
        }
    }

    /// Position reached from q after moving by dv (velocity times time step)
    pub fn integrate(&self, q: &[Float], dv: &[Float]) -> Vec<Float> {
        match self {
            Joint::RevoluteJoint(_) | Joint::PrismaticJoint(_) => vec![q[0] + dv[0]],
            Joint::FloatingJoint(_) => FloatingJoint::integrate(q, dv).to_vec(),
        }
    }
}
