use std::ops::{Add, AddAssign};

use nalgebra::Vector3;

use crate::{
    spatial::{spatial_vector::SpatialVector, transform::Transform3D},
    types::Float,
};

/// A wrench represents a system of forces.
/// The wrench w^i expressed in frame i in defined as
///     w^i = (τ^i f^i) = ∑ over j (r_j^i \cross f_j^i   f_j^i)
/// where the f_j^i are forces expressed in frame i, exerted at positions r_j^i.
/// τ^i is the total torque and f^i is the total force.
#[derive(Debug, Clone, PartialEq)]
pub struct Wrench {
    pub frame: String,
    pub angular: Vector3<Float>,
    pub linear: Vector3<Float>,
}

impl Wrench {
    pub fn zero(frame: &str) -> Self {
        Wrench {
            frame: frame.to_string(),
            angular: Vector3::zeros(),
            linear: Vector3::zeros(),
        }
    }

    pub fn new(frame: &str, angular: Vector3<Float>, linear: Vector3<Float>) -> Self {
        Wrench {
            frame: frame.to_string(),
            angular,
            linear,
        }
    }

    /// Return the wrench of a force applied at point
    pub fn from_force(point: &Vector3<Float>, force: &Vector3<Float>, frame: &str) -> Self {
        Wrench {
            frame: frame.to_string(),
            angular: point.cross(force),
            linear: *force,
        }
    }

    /// Express the same system of forces in the "to" frame of transform.
    ///     f' = R f
    ///     τ' = R τ + p × f'
    /// i.e. the dual (force) adjoint of the transform.
    pub fn transform(&self, transform: &Transform3D) -> Wrench {
        if self.frame != transform.from {
            panic!(
                "wrench {} frame is not equal to transform `from` {} frame!",
                self.frame, transform.from
            );
        }

        let linear = transform.iso.rotation * self.linear;
        let angular =
            transform.iso.rotation * self.angular + transform.iso.translation.vector.cross(&linear);

        Wrench {
            frame: transform.to.clone(),
            angular,
            linear,
        }
    }

    pub fn as_spatial(&self) -> SpatialVector {
        SpatialVector::new(self.angular, self.linear)
    }

    pub fn is_zero(&self) -> bool {
        self.angular == Vector3::zeros() && self.linear == Vector3::zeros()
    }
}

impl<'a, 'b> Add<&'b Wrench> for &'a Wrench {
    type Output = Wrench;

    fn add(self, rhs: &Wrench) -> Wrench {
        if self.frame != rhs.frame {
            panic!("lhs frame {} != rhs frame {}!", self.frame, rhs.frame);
        }

        Wrench {
            frame: self.frame.clone(),
            angular: self.angular + rhs.angular,
            linear: self.linear + rhs.linear,
        }
    }
}

impl AddAssign<&Wrench> for Wrench {
    fn add_assign(&mut self, rhs: &Wrench) {
        if self.frame != rhs.frame {
            panic!("lhs frame {} != rhs frame {}!", self.frame, rhs.frame);
        }

        self.angular += rhs.angular;
        self.linear += rhs.linear;
    }
}
