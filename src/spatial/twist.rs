use std::ops::Add;

use na::zero;
use nalgebra::Vector3;

use crate::{
    spatial::{spatial_vector::SpatialVector, transform::Transform3D},
    types::Float,
    util::se3_commutator,
};

/// A twist represents the relative angular and linear velocity between two bodies.
/// The twist of frame j with respect to frame i, expressed in frame k is
/// defined as:
///     T_j^(k,i) = (w_j^(k,i)  v_j^(k,i)) \in R^6
/// Twist is a spatial vector.
#[derive(PartialEq, Debug, Clone)]
pub struct Twist {
    pub body: String,
    pub base: String,
    pub frame: String,
    pub angular: Vector3<Float>,
    pub linear: Vector3<Float>,
}

impl Twist {
    pub fn zero(body: &str, base: &str) -> Twist {
        Twist {
            body: body.to_string(),
            base: base.to_string(),
            frame: body.to_string(),
            angular: zero(),
            linear: zero(),
        }
    }

    /// Transform the twist to be expressed in the "to" frame of transform
    pub fn transform(&self, transform: &Transform3D) -> Twist {
        if self.frame != transform.from {
            panic!(
                "twist {} frame is not equal to transform `from` {} frame!",
                self.frame, transform.from
            );
        }

        let angular = transform.iso.rotation * self.angular;
        let linear =
            transform.iso.rotation * self.linear + transform.iso.translation.vector.cross(&angular);

        Twist {
            body: self.body.clone(),
            base: self.base.clone(),
            frame: transform.to.clone(),
            angular,
            linear,
        }
    }

    /// Take the spatial motion cross product of two twists expressed in the
    /// same frame. The result is an acceleration-like term.
    pub fn cross(&self, rhs: &Twist) -> SpatialVector {
        if self.frame != rhs.frame {
            panic!(
                "Frames of two twists do not match: {} != {}!",
                self.frame, rhs.frame
            );
        }

        let (angular, linear) =
            se3_commutator(&self.angular, &self.linear, &rhs.angular, &rhs.linear);
        SpatialVector::new(angular, linear)
    }

    /// Compute the velocity of the point that has this twist.
    /// The point is expressed in the same frame as the twist.
    pub fn point_velocity(&self, point: &Vector3<Float>) -> Vector3<Float> {
        self.linear + self.angular.cross(point)
    }

    pub fn as_spatial(&self) -> SpatialVector {
        SpatialVector::new(self.angular, self.linear)
    }
}

impl<'a, 'b> Add<&'b Twist> for &'a Twist {
    type Output = Twist;

    /// lhs is A to B twist, rhs is B to C twist,
    /// returns A to C twist.
    fn add(self, rhs: &Twist) -> Twist {
        if self.frame != rhs.frame {
            panic!("lhs and rhs are not expressed in the same frame!");
        }

        if self.body != rhs.base {
            panic!(
                "lhs body {} is not same as rhs base {}!",
                self.body, rhs.base
            );
        }

        Twist {
            body: rhs.body.clone(),
            base: self.base.clone(),
            frame: self.frame.clone(),
            angular: self.angular + rhs.angular,
            linear: self.linear + rhs.linear,
        }
    }
}
