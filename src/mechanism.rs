use itertools::izip;
use na::{DVector, Vector3};
use tracing::debug;

use crate::{
    dynamics::dynamics,
    engine::{BodyId, DynamicsEngine, FrameId, GeneralizedForceMap},
    error::{check_dimension, SimError},
    inertia::kinetic_energy,
    joint::Joint,
    kinematics::{forward_kinematics, Frame, KinematicState},
    rigid_body::RigidBody,
    spatial::transform::Transform3D,
    types::Float,
    GRAVITY, WORLD_FRAME,
};

/// A tree of rigid bodies connected by joints, rooted at the world body.
///
/// Body i (1-based) is attached by joints[i - 1] to parents[i - 1], which must
/// come before it. Body 0 is the world.
#[derive(Clone, Debug)]
pub struct Mechanism {
    pub bodies: Vec<RigidBody>,
    pub joints: Vec<Joint>,
    pub parents: Vec<BodyId>,
    pub frames: Vec<Frame>,
    pub gravity: Vector3<Float>,
    pub q_offsets: Vec<usize>,
    pub v_offsets: Vec<usize>,
    pub nq: usize,
    pub nv: usize,
}

impl Mechanism {
    pub fn new(bodies: Vec<RigidBody>, joints: Vec<Joint>) -> Result<Self, SimError> {
        if bodies.len() != joints.len() {
            return Err(SimError::invalid_model(format!(
                "{} bodies but {} joints",
                bodies.len(),
                joints.len()
            )));
        }

        let mut parents = vec![];
        for (i, (body, joint)) in izip!(bodies.iter(), joints.iter()).enumerate() {
            let transform = joint.transform();
            if transform.from != body.frame() {
                return Err(SimError::invalid_model(format!(
                    "joint of body {} starts from frame {}",
                    body.frame(),
                    transform.from
                )));
            }

            let parent = if transform.to == WORLD_FRAME {
                0
            } else {
                match bodies[..i].iter().position(|b| b.frame() == transform.to) {
                    Some(index) => index + 1,
                    None => {
                        return Err(SimError::invalid_model(format!(
                            "parent {} of body {} is not defined before it",
                            transform.to,
                            body.frame()
                        )))
                    }
                }
            };
            parents.push(parent);
        }

        let mut q_offsets = vec![];
        let mut v_offsets = vec![];
        let (mut nq, mut nv) = (0, 0);
        for joint in joints.iter() {
            q_offsets.push(nq);
            v_offsets.push(nv);
            nq += joint.nq();
            nv += joint.nv();
        }

        debug!(nbodies = bodies.len(), nq, nv, "mechanism built");
        Ok(Mechanism {
            bodies,
            joints,
            parents,
            frames: vec![],
            gravity: Vector3::new(0., 0., -GRAVITY),
            q_offsets,
            v_offsets,
            nq,
            nv,
        })
    }

    pub fn with_gravity(mut self, gravity: Vector3<Float>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Attach a named frame to a body. `placement` is the transform from the
    /// new frame to the body frame.
    pub fn add_frame(&mut self, placement: Transform3D) -> Result<FrameId, SimError> {
        if self.frame_id(&placement.from).is_some() || self.body_id(&placement.from).is_some() {
            return Err(SimError::invalid_model(format!(
                "frame {} already exists",
                placement.from
            )));
        }
        let parent = self
            .body_id(&placement.to)
            .ok_or_else(|| SimError::unknown_frame(placement.to.clone()))?;

        self.frames.push(Frame {
            name: placement.from.clone(),
            parent,
            placement,
        });
        Ok(self.frames.len() - 1)
    }

    pub fn body_id(&self, name: &str) -> Option<BodyId> {
        if name == WORLD_FRAME {
            return Some(0);
        }
        self.bodies
            .iter()
            .position(|body| body.frame() == name)
            .map(|index| index + 1)
    }

    /// Computes the total kinetic energy of the system
    pub fn kinetic_energy(&self, q: &DVector<Float>, v: &DVector<Float>) -> Float {
        let kinematics = forward_kinematics(self, q, v);
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, body)| {
                let inertia = body.inertia.transform(kinematics.body_to_root(i + 1));
                kinetic_energy(&inertia, kinematics.twist(i + 1))
            })
            .sum()
    }

    /// Gravitational potential energy of the system, zero at height zero
    pub fn gravitational_energy(&self, q: &DVector<Float>) -> Float {
        let kinematics = forward_kinematics(self, q, &DVector::zeros(self.nv));
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, body)| {
                let inertia = body.inertia.transform(kinematics.body_to_root(i + 1));
                -self.gravity.dot(&inertia.cross_part)
            })
            .sum()
    }
}

impl DynamicsEngine for Mechanism {
    fn nq(&self) -> usize {
        self.nq
    }

    fn nv(&self) -> usize {
        self.nv
    }

    fn nbodies(&self) -> usize {
        self.bodies.len() + 1
    }

    fn body_frame(&self, body: BodyId) -> &str {
        if body == 0 {
            WORLD_FRAME
        } else {
            self.bodies[body - 1].frame()
        }
    }

    fn neutral_configuration(&self) -> DVector<Float> {
        DVector::from_iterator(self.nq, self.joints.iter().flat_map(|joint| joint.neutral()))
    }

    fn frame_id(&self, name: &str) -> Option<FrameId> {
        self.frames.iter().position(|frame| frame.name == name)
    }

    fn frame(&self, id: FrameId) -> &Frame {
        &self.frames[id]
    }

    fn forward_kinematics(&self, q: &DVector<Float>, v: &DVector<Float>) -> KinematicState {
        forward_kinematics(self, q, v)
    }

    fn forward_dynamics(
        &self,
        q: &DVector<Float>,
        v: &DVector<Float>,
        tau: &DVector<Float>,
        forces: &GeneralizedForceMap,
    ) -> Result<DVector<Float>, SimError> {
        check_dimension("configuration", self.nq, q.len())?;
        check_dimension("velocity", self.nv, v.len())?;
        check_dimension("torque", self.nv, tau.len())?;
        check_dimension("force map", self.nbodies(), forces.len())?;

        let kinematics = forward_kinematics(self, q, v);
        dynamics(self, &kinematics, v, tau, forces)
    }

    fn integrate(&self, q: &DVector<Float>, dv: &DVector<Float>) -> DVector<Float> {
        let mut q_next = DVector::zeros(self.nq);
        for (joint, q_offset, v_offset) in izip!(
            self.joints.iter(),
            self.q_offsets.iter(),
            self.v_offsets.iter()
        ) {
            let joint_q = &q.as_slice()[*q_offset..*q_offset + joint.nq()];
            let joint_dv = &dv.as_slice()[*v_offset..*v_offset + joint.nv()];
            q_next
                .rows_mut(*q_offset, joint.nq())
                .copy_from_slice(&joint.integrate(joint_q, joint_dv));
        }
        q_next
    }
}
