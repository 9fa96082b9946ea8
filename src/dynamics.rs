use itertools::izip;
use na::{DMatrix, DVector};

use crate::{
    engine::GeneralizedForceMap,
    error::SimError,
    inertia::SpatialInertia,
    kinematics::KinematicState,
    mechanism::Mechanism,
    spatial::{geometric_jacobian::GeometricJacobian, spatial_vector::SpatialVector},
    types::Float,
    util::spatial_force_cross,
};

/// Computes the motion subspace of each joint, expressed in world frame.
/// Note: index i holds the joint of body i + 1
pub fn compute_motion_subspaces(
    mechanism: &Mechanism,
    kinematics: &KinematicState,
) -> Vec<GeometricJacobian> {
    mechanism
        .joints
        .iter()
        .enumerate()
        .map(|(i, joint)| {
            joint
                .motion_subspace()
                .transform(kinematics.body_to_root(i + 1))
        })
        .collect()
}

/// Computes the spatial inertia of each body, expressed in world frame.
/// Note: index i holds body i + 1
pub fn compute_inertias(mechanism: &Mechanism, kinematics: &KinematicState) -> Vec<SpatialInertia> {
    mechanism
        .bodies
        .iter()
        .enumerate()
        .map(|(i, body)| body.inertia.transform(kinematics.body_to_root(i + 1)))
        .collect()
}

/// Compute the composite body inertia of each body, i.e. the inertia of the
/// subtree rooted at the body, expressed in world frame
pub fn compute_crb_inertias(mechanism: &Mechanism, inertias: &[SpatialInertia]) -> Vec<SpatialInertia> {
    let mut crb_inertias = inertias.to_vec();
    for i in (0..crb_inertias.len()).rev() {
        let parent = mechanism.parents[i];
        if parent != 0 {
            let child = crb_inertias[i].clone();
            crb_inertias[parent - 1] += &child;
        }
    }
    crb_inertias
}

/// Compute the joint-space mass matrix (also known as the inertia matrix) of
/// the Mechanism in the given state, i.e., the matrix M(q) in the unconstrained
/// joint-space equations of motion:
///     M(q) vdot + c(q, v) = τ
/// This method implements the composite rigid body algorithm.
///
/// Reference: Table 6.2 in "Robot Dynamics Algorithms" by Roy Featherstone
pub fn mass_matrix(mechanism: &Mechanism, kinematics: &KinematicState) -> DMatrix<Float> {
    let nv = mechanism.nv;
    let mut mass_matrix = DMatrix::zeros(nv, nv);
    let motion_subspaces = compute_motion_subspaces(mechanism, kinematics);
    let inertias = compute_inertias(mechanism, kinematics);
    let crb_inertias = compute_crb_inertias(mechanism, &inertias);

    for i in 0..mechanism.joints.len() {
        let (Fi_angular, Fi_linear) = crb_inertias[i].mul_jacobian(&motion_subspaces[i]);
        let vi = mechanism.v_offsets[i];
        let ni = motion_subspaces[i].dim();

        // Walk from body i up to the root, filling the row block of joint i
        let mut j = i + 1;
        while j != 0 {
            let Sj = &motion_subspaces[j - 1];
            let block = Fi_angular.tr_mul(&Sj.angular) + Fi_linear.tr_mul(&Sj.linear);
            let vj = mechanism.v_offsets[j - 1];
            mass_matrix
                .view_mut((vi, vj), (ni, Sj.dim()))
                .copy_from(&block);
            mass_matrix
                .view_mut((vj, vi), (Sj.dim(), ni))
                .copy_from(&block.transpose());
            j = mechanism.parents[j - 1];
        }
    }

    mass_matrix
}

/// Compute the bias acceleration for each body in world frame, i.e. the
/// acceleration each body would have at zero vdot.
///
/// Here, we add the inverse gravity acceleration at the root to simulate
/// gravity. Imagine the whole system is in a elevator accelerating upwards at
/// 9.81 m/s^2. It is then propagated to every body through its ancestors.
pub fn bias_accelerations(mechanism: &Mechanism, kinematics: &KinematicState, v: &DVector<Float>) -> Vec<SpatialVector> {
    let mut accels = vec![SpatialVector::linear(-mechanism.gravity)];
    for (i, (joint, parent, v_offset)) in izip!(
        mechanism.joints.iter(),
        mechanism.parents.iter(),
        mechanism.v_offsets.iter()
    )
    .enumerate()
    {
        let bodyid = i + 1;
        let joint_v = &v.as_slice()[*v_offset..*v_offset + joint.nv()];
        let joint_twist = joint.twist(joint_v).transform(kinematics.body_to_root(bodyid));
        let coriolis = kinematics.twist(bodyid).cross(&joint_twist);
        accels.push(accels[*parent] + coriolis);
    }
    accels
}

/// Compute the 'dynamics bias term', i.e. the term
///     c(q, v) - J^T f_ext
/// in the unconstrained joint-space equations of motion
///     M(q) vdot + c(q, v) = τ + J^T f_ext
/// where f_ext are the external wrenches, each expressed in its body frame.
///
/// Reference: Table 5.1 in "Robot Dynamics Algorithms" by Roy Featherstone
pub fn dynamics_bias(
    mechanism: &Mechanism,
    kinematics: &KinematicState,
    v: &DVector<Float>,
    forces: &GeneralizedForceMap,
) -> DVector<Float> {
    let accels = bias_accelerations(mechanism, kinematics, v);
    let inertias = compute_inertias(mechanism, kinematics);

    // Newton-Euler wrench of each body expressed in world frame:
    //     f_i = I_i * a_i + v_i \dualcross I_i * v_i - f_ext_i
    let mut wrenches: Vec<SpatialVector> = inertias
        .iter()
        .enumerate()
        .map(|(i, I)| {
            let bodyid = i + 1;
            let T = kinematics.twist(bodyid).as_spatial();
            let momentum = I.mul(&T);
            let (angular, linear) =
                spatial_force_cross(&T.angular, &T.linear, &momentum.angular, &momentum.linear);
            let external = forces
                .get(bodyid)
                .transform(kinematics.body_to_root(bodyid))
                .as_spatial();
            I.mul(&accels[bodyid]) + SpatialVector::new(angular, linear) - external
        })
        .collect();

    // Accumulate the wrenches from leaves to root
    for i in (0..wrenches.len()).rev() {
        let parent = mechanism.parents[i];
        if parent != 0 {
            let child = wrenches[i];
            wrenches[parent - 1] = wrenches[parent - 1] + child;
        }
    }

    let motion_subspaces = compute_motion_subspaces(mechanism, kinematics);
    let mut bias = DVector::zeros(mechanism.nv);
    for (S, wrench, v_offset) in izip!(
        motion_subspaces.iter(),
        wrenches.iter(),
        mechanism.v_offsets.iter()
    ) {
        bias.rows_mut(*v_offset, S.dim())
            .copy_from(&S.transpose_mul(wrench));
    }
    bias
}

/// Solves the dynamics equation:
///     M(q) vdot = rhs
pub fn dynamics_solve(
    mass_matrix: &DMatrix<Float>,
    rhs: &DVector<Float>,
) -> Result<DVector<Float>, SimError> {
    match mass_matrix.clone().cholesky() {
        Some(cholesky) => Ok(cholesky.solve(rhs)),
        None => Err(SimError::diverged(format!(
            "mass matrix is not positive definite: M = {}",
            mass_matrix
        ))),
    }
}

/// Compute the joint acceleration vector vdot that satisfies the joint-space
/// equations of motion:
///     M(q) vdot + c(q, v) = τ + J^T f_ext
/// given joint configuration vector q, joint velocity vector v, joint torques
/// τ and external wrenches.
pub fn dynamics(
    mechanism: &Mechanism,
    kinematics: &KinematicState,
    v: &DVector<Float>,
    tau: &DVector<Float>,
    forces: &GeneralizedForceMap,
) -> Result<DVector<Float>, SimError> {
    let dynamics_bias = dynamics_bias(mechanism, kinematics, v, forces);
    let mass_matrix = mass_matrix(mechanism, kinematics);

    dynamics_solve(&mass_matrix, &(tau - dynamics_bias))
}
