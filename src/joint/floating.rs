use na::{Matrix3, Matrix3xX, Quaternion, UnitQuaternion};
use nalgebra::vector;

use crate::{
    spatial::{
        geometric_jacobian::GeometricJacobian, pose::Pose, transform::Transform3D, twist::Twist,
    },
    types::Float,
    util::se3_exp,
};

/// A 6-dof joint. Its position is a pose stored as
///     [qx, qy, qz, qw, x, y, z]
/// and its velocity is the successor twist expressed in the successor frame
///     [wx, wy, wz, vx, vy, vz]
#[derive(Clone, Debug)]
pub struct FloatingJoint {
    pub transform: Transform3D, // transform from successor frame to predecessor frame at identity pose
}

impl FloatingJoint {
    pub const NQ: usize = 7;
    pub const NV: usize = 6;

    pub fn new(transform: Transform3D) -> Self {
        Self { transform }
    }

    /// Read a pose out of a configuration slice. The quaternion is
    /// renormalized, so slightly drifted inputs are accepted.
    pub fn pose(q: &[Float]) -> Pose {
        let rotation =
            UnitQuaternion::from_quaternion(Quaternion::new(q[3], q[0], q[1], q[2]));
        Pose {
            rotation,
            translation: vector![q[4], q[5], q[6]],
        }
    }

    pub fn pose_to_q(pose: &Pose) -> [Float; 7] {
        let c = pose.rotation.coords; // [x, y, z, w]
        let t = pose.translation;
        [c.x, c.y, c.z, c.w, t.x, t.y, t.z]
    }

    pub fn transform_at(&self, q: &[Float]) -> Transform3D {
        Transform3D {
            from: self.transform.from.clone(),
            to: self.transform.to.clone(),
            iso: self.transform.iso * FloatingJoint::pose(q).to_isometry(),
        }
    }

    pub fn twist(&self, v: &[Float]) -> Twist {
        Twist {
            body: self.transform.from.clone(),
            base: self.transform.to.clone(),
            frame: self.transform.from.clone(),
            angular: vector![v[0], v[1], v[2]],
            linear: vector![v[3], v[4], v[5]],
        }
    }

    /// Move the pose along the body-frame twist dv (velocity times time step)
    /// on SE(3): pose ← pose * exp(dv)
    pub fn integrate(q: &[Float], dv: &[Float]) -> [Float; 7] {
        let pose = FloatingJoint::pose(q);
        let delta = se3_exp(&vector![dv[0], dv[1], dv[2]], &vector![dv[3], dv[4], dv[5]]);
        let new_iso = pose.to_isometry() * delta;
        FloatingJoint::pose_to_q(&Pose::from_isometry(&new_iso))
    }

    pub fn motion_subspace(&self) -> GeometricJacobian {
        GeometricJacobian {
            body: self.transform.from.clone(),
            base: self.transform.to.clone(),
            frame: self.transform.from.clone(),
            angular: {
                let mut matrix = Matrix3xX::zeros(6);
                matrix
                    .fixed_view_mut::<3, 3>(0, 0)
                    .copy_from(&Matrix3::identity());
                matrix
            },
            linear: {
                let mut matrix = Matrix3xX::zeros(6);
                matrix
                    .fixed_view_mut::<3, 3>(0, 3)
                    .copy_from(&Matrix3::identity());
                matrix
            },
        }
    }
}

/// Neutral floating joint position: identity rotation at the origin
pub fn neutral_pose_q() -> [Float; 7] {
    FloatingJoint::pose_to_q(&Pose::identity())
}
