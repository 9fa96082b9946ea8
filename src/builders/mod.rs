use na::Vector3;

use crate::{
    error::SimError, joint::Joint, mechanism::Mechanism, rigid_body::RigidBody,
    spatial::transform::Transform3D, types::Float, WORLD_FRAME,
};

pub mod biped_builder;

pub use biped_builder::build_biped;

pub const SLIDER_LEFT: &str = "left_pad";
pub const SLIDER_RIGHT: &str = "right_pad";

/// A block of mass m sliding along the world y axis, with a pad frame on
/// either side of it. Both pads translate with the block, so two lateral
/// springs of stiffness k on the pads make a harmonic oscillator of angular
/// frequency sqrt(2k / m).
pub fn build_slider(m: Float) -> Result<Mechanism, SimError> {
    let w = 0.2;
    let block_frame = "block";
    let block = RigidBody::new_cuboid_at(&Vector3::zeros(), m, w, w, w, block_frame);
    let block_to_world = Transform3D::identity(block_frame, WORLD_FRAME);

    let mut mechanism = Mechanism::new(
        vec![block],
        vec![Joint::new_prismatic(block_to_world, Vector3::y_axis())],
    )?;
    mechanism.add_frame(Transform3D::move_xyz(SLIDER_LEFT, block_frame, w / 2., 0., 0.))?;
    mechanism.add_frame(Transform3D::move_xyz(SLIDER_RIGHT, block_frame, -w / 2., 0., 0.))?;
    Ok(mechanism)
}
