use na::{vector, UnitVector3, Vector3};

use crate::{
    error::SimError, joint::Joint, mechanism::Mechanism, rigid_body::RigidBody,
    spatial::transform::Transform3D, types::Float, WORLD_FRAME,
};

pub const LEFT_ANKLE: &str = "lankle";
pub const RIGHT_ANKLE: &str = "rankle";

/// A biped moving in the frontal (y-z) plane: a floating pelvis with two legs,
/// each a hip and a knee rotating about x. The ankle frames sit at the bottom
/// of the shanks, at ground height in the neutral configuration.
///
/// Hips and knees are unactuated unless torques are supplied: under zero
/// torque the legs fold passively and the model eventually collapses.
///
/// Configuration layout:
///     q = [pelvis quaternion (4), pelvis position (3),
///          left hip, left knee, right hip, right knee]
pub fn build_biped() -> Result<Mechanism, SimError> {
    let l_thigh = 0.4;
    let l_shank = 0.4;
    let hip_width = 0.2;
    let h_pelvis = 0.2;
    let w = 0.08;

    let m_pelvis = 10.;
    let pelvis_frame = "pelvis";
    let pelvis = RigidBody::new_cuboid_at(
        &Vector3::zeros(),
        m_pelvis,
        w,
        hip_width + w,
        h_pelvis,
        pelvis_frame,
    );
    let pelvis_height = h_pelvis / 2. + l_thigh + l_shank;
    let pelvis_to_world = Transform3D::move_xyz(pelvis_frame, WORLD_FRAME, 0., 0., pelvis_height);

    let mut bodies = vec![pelvis];
    let mut joints = vec![Joint::new_floating(pelvis_to_world)];
    let mut ankles = vec![];
    for (side, y) in [("left", hip_width / 2.), ("right", -hip_width / 2.)] {
        let axis: UnitVector3<Float> = Vector3::x_axis();

        let m_thigh = 3.;
        let thigh_frame = format!("thigh_{}", side);
        let thigh_com = vector![0., 0., -l_thigh / 2.];
        bodies.push(RigidBody::new_cuboid_at(&thigh_com, m_thigh, w, w, l_thigh, &thigh_frame));
        let thigh_to_pelvis =
            Transform3D::move_xyz(&thigh_frame, pelvis_frame, 0., y, -h_pelvis / 2.);
        joints.push(Joint::new_revolute(thigh_to_pelvis, axis));

        let m_shank = 2.;
        let shank_frame = format!("shank_{}", side);
        let shank_com = vector![0., 0., -l_shank / 2.];
        bodies.push(RigidBody::new_cuboid_at(&shank_com, m_shank, w, w, l_shank, &shank_frame));
        let shank_to_thigh = Transform3D::move_xyz(&shank_frame, &thigh_frame, 0., 0., -l_thigh);
        joints.push(Joint::new_revolute(shank_to_thigh, axis));

        ankles.push(shank_frame);
    }

    let mut mechanism = Mechanism::new(bodies, joints)?;
    for (ankle, shank_frame) in [LEFT_ANKLE, RIGHT_ANKLE].iter().zip(ankles.iter()) {
        mechanism.add_frame(Transform3D::move_xyz(ankle, shank_frame, 0., 0., -l_shank))?;
    }
    Ok(mechanism)
}

#[cfg(test)]
mod biped_builder_tests {
    use na::DVector;

    use super::*;
    use crate::{assert_close, assert_vec_close, engine::DynamicsEngine};

    #[test]
    fn ankles_on_ground_in_neutral_configuration() {
        // Arrange
        let biped = build_biped().unwrap();
        let q = biped.neutral_configuration();

        // Act
        let kinematics = biped.forward_kinematics(&q, &DVector::zeros(biped.nv()));

        // Assert
        assert_eq!(biped.nq(), 11);
        assert_eq!(biped.nv(), 10);
        assert_eq!(biped.nbodies(), 6);
        let left = biped.frame(biped.frame_id(LEFT_ANKLE).unwrap());
        let right = biped.frame(biped.frame_id(RIGHT_ANKLE).unwrap());
        assert_eq!(biped.body_frame(left.parent), "shank_left");
        assert_eq!(biped.body_frame(right.parent), "shank_right");
        assert_vec_close!(kinematics.frame_to_root(left).trans(), vector![0., 0.1, 0.], 1e-12);
        assert_vec_close!(kinematics.frame_to_root(right).trans(), vector![0., -0.1, 0.], 1e-12);
    }

    /// Bending the left knee swings the left ankle sideways in the frontal
    /// plane and leaves the right leg untouched.
    #[test]
    fn knee_moves_ankle_in_frontal_plane() {
        let biped = build_biped().unwrap();
        let mut q = biped.neutral_configuration();
        q[8] = 0.3; // left knee

        let kinematics = biped.forward_kinematics(&q, &DVector::zeros(biped.nv()));

        let left = kinematics.frame_to_root(biped.frame(biped.frame_id(LEFT_ANKLE).unwrap()));
        let right = kinematics.frame_to_root(biped.frame(biped.frame_id(RIGHT_ANKLE).unwrap()));
        assert_close!(left.trans().x, 0., 1e-12);
        assert_close!(left.trans().y, 0.1 + 0.4 * (0.3 as Float).sin(), 1e-12);
        assert_close!(left.trans().z, 0.4 - 0.4 * (0.3 as Float).cos(), 1e-12);
        assert_vec_close!(right.trans(), vector![0., -0.1, 0.], 1e-12);
    }
}
