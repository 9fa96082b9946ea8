use itertools::izip;
use na::DVector;

use crate::{
    mechanism::Mechanism,
    spatial::{transform::Transform3D, twist::Twist},
    types::Float,
    BodyId, WORLD_FRAME,
};

/// A named frame rigidly attached to a body, e.g. an ankle.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub name: String,
    pub parent: BodyId,
    pub placement: Transform3D, // transform from this frame to the parent body frame
}

/// Placements and velocities of every body for one (q, v).
/// Index 0 is the world body.
#[derive(Clone, Debug)]
pub struct KinematicState {
    pub bodies_to_root: Vec<Transform3D>,
    pub twists: Vec<Twist>, // twist of each body wrt. world, expressed in world frame
}

impl KinematicState {
    pub fn body_to_root(&self, body: BodyId) -> &Transform3D {
        &self.bodies_to_root[body]
    }

    pub fn twist(&self, body: BodyId) -> &Twist {
        &self.twists[body]
    }

    /// Transform from a frame to the world frame
    pub fn frame_to_root(&self, frame: &Frame) -> Transform3D {
        &self.bodies_to_root[frame.parent] * &frame.placement
    }

    /// Twist of a frame wrt. world, expressed in world frame. A frame rigidly
    /// attached to a body moves with the body's twist.
    pub fn frame_twist(&self, frame: &Frame) -> Twist {
        Twist {
            body: frame.name.clone(),
            ..self.twists[frame.parent].clone()
        }
    }
}

/// Compute the body to root frame transform for each body
/// Note: the first transform is world
pub fn compute_bodies_to_root(mechanism: &Mechanism, q: &DVector<Float>) -> Vec<Transform3D> {
    let mut bodies_to_root = vec![Transform3D::identity(WORLD_FRAME, WORLD_FRAME)];
    for (joint, parent, q_offset) in izip!(
        mechanism.joints.iter(),
        mechanism.parents.iter(),
        mechanism.q_offsets.iter()
    ) {
        let joint_q = &q.as_slice()[*q_offset..*q_offset + joint.nq()];
        let body_to_root = &bodies_to_root[*parent] * &joint.transform_at(joint_q);
        bodies_to_root.push(body_to_root);
    }

    bodies_to_root
}

/// Compute the twist of each body with respect to the world frame, expressed in
/// the world frame
/// Note: the first twist is world
pub fn compute_twists_wrt_world(
    mechanism: &Mechanism,
    bodies_to_root: &[Transform3D],
    v: &DVector<Float>,
) -> Vec<Twist> {
    let mut twists: Vec<Twist> = vec![Twist::zero(WORLD_FRAME, WORLD_FRAME)];
    for (i, (joint, parent, v_offset)) in izip!(
        mechanism.joints.iter(),
        mechanism.parents.iter(),
        mechanism.v_offsets.iter()
    )
    .enumerate()
    {
        let bodyid = i + 1;
        let joint_v = &v.as_slice()[*v_offset..*v_offset + joint.nv()];
        let joint_twist = joint.twist(joint_v).transform(&bodies_to_root[bodyid]);
        let body_twist = &twists[*parent] + &joint_twist;
        twists.push(body_twist);
    }

    twists
}

pub fn forward_kinematics(
    mechanism: &Mechanism,
    q: &DVector<Float>,
    v: &DVector<Float>,
) -> KinematicState {
    let bodies_to_root = compute_bodies_to_root(mechanism, q);
    let twists = compute_twists_wrt_world(mechanism, &bodies_to_root, v);
    KinematicState {
        bodies_to_root,
        twists,
    }
}

#[cfg(test)]
mod kinematics_tests {
    use na::{dvector, vector, Isometry3, Vector3};

    use super::*;
    use crate::{
        assert_vec_close, engine::DynamicsEngine, joint::Joint, rigid_body::RigidBody, PI,
    };

    /// Verify compute_bodies_to_root fn on the following mechanism
    /// 3         5
    /// |         |
    /// 2 -- 1 -- 4
    #[test]
    fn test_compute_bodies_to_root() {
        // Arrange
        let one_to_world = Transform3D::identity("1", WORLD_FRAME);
        let two_to_one = Transform3D::move_xyz("2", "1", -1.0, 0., 0.);
        let three_to_two = Transform3D::move_xyz("3", "2", 0., 0., 1.0);
        let four_to_one = Transform3D::move_xyz("4", "1", 1.0, 0., 0.);
        let five_to_four = Transform3D::move_xyz("5", "4", 0., 0., 1.0);

        let axis = Vector3::y_axis();
        let joints = vec![
            Joint::new_floating(one_to_world),
            Joint::new_revolute(two_to_one, axis),
            Joint::new_revolute(three_to_two, axis),
            Joint::new_revolute(four_to_one, axis),
            Joint::new_revolute(five_to_four, axis),
        ];
        let bodies = ["1", "2", "3", "4", "5"]
            .iter()
            .map(|name| RigidBody::new_sphere_at(&Vector3::zeros(), 1., 1., name))
            .collect();
        let mechanism = Mechanism::new(bodies, joints).unwrap();

        // Act
        let q = mechanism.neutral_configuration();
        let bodies_to_root = compute_bodies_to_root(&mechanism, &q);

        // Assert
        assert_eq!(bodies_to_root[1], Transform3D::identity("1", WORLD_FRAME));
        assert_eq!(
            bodies_to_root[2],
            Transform3D::new("2", WORLD_FRAME, &Isometry3::translation(-1., 0., 0.))
        );
        assert_vec_close!(bodies_to_root[5].trans(), vector![1., 0., 1.], 1e-12);
        assert_eq!(bodies_to_root[5].from, "5");
    }

    /// Tip of a rod swinging about y at rate ω, expressed in world frame,
    /// moves at ω * l.
    #[test]
    fn twist_of_rotating_rod() {
        // Arrange
        let l = 2.0;
        let rod_to_world = Transform3D::identity("rod", WORLD_FRAME);
        let joints = vec![Joint::new_revolute(rod_to_world, Vector3::y_axis())];
        let bodies = vec![RigidBody::new_cuboid_at(&vector![l / 2., 0., 0.], 1., l, 0.1, 0.1, "rod")];
        let mut mechanism = Mechanism::new(bodies, joints).unwrap();
        let tip = Transform3D::move_xyz("tip", "rod", l, 0., 0.);
        let tip_id = mechanism.add_frame(tip).unwrap();

        // Act
        let kinematics = forward_kinematics(&mechanism, &dvector![PI / 2.], &dvector![3.]);

        // Assert
        let tip = mechanism.frame(tip_id);
        let tip_to_root = kinematics.frame_to_root(tip);
        assert_vec_close!(tip_to_root.trans(), vector![0., 0., -l], 1e-12);

        let twist = kinematics.frame_twist(tip);
        assert_eq!(twist.body, "tip");
        assert_eq!(twist.frame, WORLD_FRAME);
        let velocity = twist.point_velocity(&tip_to_root.trans());
        assert_vec_close!(velocity, vector![-3. * l, 0., 0.], 1e-12);
    }
}
