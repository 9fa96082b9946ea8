#![allow(non_snake_case)]

use types::Float;
pub extern crate nalgebra as na;

pub mod builders;
pub mod dynamics;
pub mod engine;
pub mod error;
pub mod inertia;
pub mod joint;
pub mod kinematics;
pub mod mechanism;
pub mod rigid_body;
pub mod simulate;
pub mod spatial;
pub mod spring;
pub mod types;
pub mod util;

pub use engine::{BodyId, DynamicsEngine, FrameId, GeneralizedForceMap};
pub use error::SimError;
pub use mechanism::Mechanism;
pub use simulate::{Side, Simulation, SimulationConfig, SimulationState};
pub use spring::{SpringContact, SpringParameters};

pub const GRAVITY: Float = 9.81;

pub const PI: Float = std::f64::consts::PI;

pub const WORLD_FRAME: &str = "world";
