//! Linear springs holding a contact frame to its recorded rest pose.
//!
//! The spring acts on a reduced displacement of the contact frame relative to
//! its rest pose: lateral translation (y), vertical translation (z) and roll
//! (rotation about x), all in the rest frame's axes. The resulting force is
//! built in the rest frame and transported into the frame of the body the
//! contact frame is attached to.

use na::{vector, Matrix3, Vector3};
use tracing::debug;

use crate::{
    engine::{BodyId, DynamicsEngine, FrameId},
    error::SimError,
    kinematics::KinematicState,
    spatial::{transform::Transform3D, twist::Twist, wrench::Wrench},
    types::Float,
};

/// Stiffness and damping of one contact spring, acting on the reduced
/// displacement [y, z, roll] and its rate.
///
/// Both matrices are stored negated, so K * d and D * ḋ are restoring.
#[derive(Clone, Debug, PartialEq)]
pub struct SpringParameters {
    pub stiffness: Matrix3<Float>,
    pub damping: Matrix3<Float>,
}

impl SpringParameters {
    pub fn new(lateral: Float, vertical: Float, roll: Float) -> Self {
        SpringParameters {
            stiffness: -Matrix3::from_diagonal(&vector![lateral, vertical, roll]),
            damping: Matrix3::zeros(),
        }
    }

    pub fn with_damping(mut self, lateral: Float, vertical: Float, roll: Float) -> Self {
        self.damping = -Matrix3::from_diagonal(&vector![lateral, vertical, roll]);
        self
    }

    /// Restoring force [lateral, vertical, roll torque] for displacement d
    /// and displacement rate d_dot
    pub fn force(&self, d: &Vector3<Float>, d_dot: &Vector3<Float>) -> Vector3<Float> {
        self.stiffness * d + self.damping * d_dot
    }
}

impl Default for SpringParameters {
    fn default() -> Self {
        SpringParameters::new(20000., 200000., 0.)
    }
}

/// Where a contact frame is relative to its rest pose, and how fast it moves.
#[derive(Clone, Debug, PartialEq)]
pub struct ContactFrameState {
    pub relative: Transform3D,   // transform from contact frame to rest frame
    pub relative_twist: Twist, // twist of contact frame wrt. world, expressed in rest frame
}

impl ContactFrameState {
    /// Reduced displacement [y, z, roll]
    pub fn displacement(&self) -> Vector3<Float> {
        let t = self.relative.trans();
        let (roll, _, _) = self.relative.rpy();
        vector![t.y, t.z, roll]
    }

    /// Rate of the reduced displacement: velocity of the contact frame origin
    /// along y and z, and angular velocity about x, in the rest frame
    pub fn displacement_rate(&self) -> Vector3<Float> {
        let velocity = self.relative_twist.point_velocity(&self.relative.trans());
        vector![velocity.y, velocity.z, self.relative_twist.angular.x]
    }
}

/// Build the wrench of a reduced spring force, expressed in `frame`.
/// Components the spring does not act on are zero.
pub fn reduced_wrench(frame: &str, force: &Vector3<Float>) -> Wrench {
    Wrench::new(
        frame,
        vector![force[2], 0., 0.],
        vector![0., force[0], force[1]],
    )
}

/// A spring attaching a named contact frame to its rest pose
#[derive(Clone, Debug, PartialEq)]
pub struct SpringContact {
    pub name: String,
    pub frame: FrameId,
    pub body: BodyId,
    pub rest_pose: Transform3D, // transform from rest frame to world
    pub params: SpringParameters,
}

impl SpringContact {
    /// Record the current pose of frame `name` as its rest pose
    pub fn new<E: DynamicsEngine + ?Sized>(
        engine: &E,
        name: &str,
        kinematics: &KinematicState,
        params: SpringParameters,
    ) -> Result<Self, SimError> {
        let frame_id = engine
            .frame_id(name)
            .ok_or_else(|| SimError::unknown_frame(name))?;
        let frame = engine.frame(frame_id);
        let frame_to_root = kinematics.frame_to_root(frame);
        let rest_pose = Transform3D::new(&rest_frame_name(name), &frame_to_root.to, &frame_to_root.iso);

        debug!(
            frame = name,
            body = frame.parent,
            translation = ?rest_pose.trans(),
            "recorded rest pose"
        );
        Ok(SpringContact {
            name: name.to_string(),
            frame: frame_id,
            body: frame.parent,
            rest_pose,
            params,
        })
    }

    /// Name of the rest frame, which the local spring wrench is expressed in
    pub fn rest_frame(&self) -> &str {
        &self.rest_pose.from
    }

    pub fn frame_state<E: DynamicsEngine + ?Sized>(
        &self,
        engine: &E,
        kinematics: &KinematicState,
    ) -> ContactFrameState {
        let frame = engine.frame(self.frame);
        let root_to_rest = self.rest_pose.inv();
        ContactFrameState {
            relative: &root_to_rest * &kinematics.frame_to_root(frame),
            relative_twist: kinematics.frame_twist(frame).transform(&root_to_rest),
        }
    }

    /// Spring wrench expressed in the rest frame
    pub fn local_wrench(&self, state: &ContactFrameState) -> Wrench {
        let force = self
            .params
            .force(&state.displacement(), &state.displacement_rate());
        reduced_wrench(self.rest_frame(), &force)
    }

    /// Spring wrench transported into the frame of the body carrying the
    /// contact frame, together with that body
    pub fn wrench<E: DynamicsEngine + ?Sized>(
        &self,
        engine: &E,
        kinematics: &KinematicState,
    ) -> (BodyId, Wrench) {
        let local = self.local_wrench(&self.frame_state(engine, kinematics));
        let rest_to_body = &kinematics.body_to_root(self.body).inv() * &self.rest_pose;
        (self.body, local.transform(&rest_to_body))
    }

    /// Elastic energy stored in the spring, 1/2 d^T K d
    pub fn potential_energy(&self, state: &ContactFrameState) -> Float {
        let d = state.displacement();
        -0.5 * d.dot(&(self.params.stiffness * d))
    }
}

pub fn rest_frame_name(frame: &str) -> String {
    format!("{}_rest", frame)
}
