//! Seam between the spring-contact stepper and the articulated-body engine
//! that performs kinematics, dynamics and configuration integration.

use na::DVector;

use crate::{
    error::SimError,
    kinematics::{Frame, KinematicState},
    spatial::wrench::Wrench,
    types::Float,
};

/// Index of a body. 0 is the world body.
pub type BodyId = usize;

/// Index of a named frame.
pub type FrameId = usize;

/// Articulated-body engine consumed by the simulation stepper.
///
/// Implementations must be pure with respect to (q, v): the stepper calls
/// them repeatedly within one step and never expects hidden state to carry
/// over between calls.
pub trait DynamicsEngine {
    /// Dimension of the configuration vector q
    fn nq(&self) -> usize;

    /// Dimension of the velocity vector v
    fn nv(&self) -> usize;

    /// Number of bodies, world body included
    fn nbodies(&self) -> usize;

    /// Name of the frame a body's quantities are expressed in
    fn body_frame(&self, body: BodyId) -> &str;

    /// Reference configuration of the model
    fn neutral_configuration(&self) -> DVector<Float>;

    fn frame_id(&self, name: &str) -> Option<FrameId>;

    fn frame(&self, id: FrameId) -> &Frame;

    fn forward_kinematics(&self, q: &DVector<Float>, v: &DVector<Float>) -> KinematicState;

    /// Joint accelerations vdot under joint torques tau and the external
    /// wrenches in `forces`.
    fn forward_dynamics(
        &self,
        q: &DVector<Float>,
        v: &DVector<Float>,
        tau: &DVector<Float>,
        forces: &GeneralizedForceMap,
    ) -> Result<DVector<Float>, SimError>;

    /// Configuration reached from q after moving by dv, i.e. velocity times
    /// time step. Must respect the configuration manifold, e.g. keep
    /// quaternions normalized.
    fn integrate(&self, q: &DVector<Float>, dv: &DVector<Float>) -> DVector<Float>;
}

/// External wrenches applied to each body, one per body, each expressed in
/// that body's own frame. Zero by default.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneralizedForceMap {
    wrenches: Vec<Wrench>,
}

impl GeneralizedForceMap {
    pub fn zeros<E: DynamicsEngine + ?Sized>(engine: &E) -> Self {
        GeneralizedForceMap {
            wrenches: (0..engine.nbodies())
                .map(|body| Wrench::zero(engine.body_frame(body)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.wrenches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wrenches.is_empty()
    }

    pub fn get(&self, body: BodyId) -> &Wrench {
        &self.wrenches[body]
    }

    /// Add a wrench onto a body. Wrenches landing on the same body are summed.
    /// The wrench must be expressed in the body frame.
    pub fn apply(&mut self, body: BodyId, wrench: &Wrench) {
        self.wrenches[body] += wrench;
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &Wrench)> {
        self.wrenches.iter().enumerate()
    }
}
