use std::ops::AddAssign;

use na::{Matrix3xX, Vector3};
use nalgebra::Matrix3;

use crate::{
    spatial::{
        geometric_jacobian::GeometricJacobian, spatial_vector::SpatialVector,
        transform::Transform3D, twist::Twist,
    },
    types::Float,
    util::mul_inertia,
};

/// A spatial inertia, or inertia matrix, represents the mass distribution of a
/// rigid body.
/// A spatial inertia expressed in frame i is defined as:
/// I^i = | J         c_hat |
///       | c_hat^T     mI  |
/// where J is the mass moment of inertia, m is the total mass, and c is the
/// 'cross part', which is the center of mass position scaled by m.
///
/// !!! Warning
///     The __moment__ field of a __SpatialInertia__ is the moment of inertia
///     about the origin of its __frame__, not about the center of mass.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialInertia {
    pub frame: String,
    pub moment: Matrix3<Float>,
    pub cross_part: Vector3<Float>,
    pub mass: Float,
}

impl SpatialInertia {
    pub fn new(
        moment: Matrix3<Float>,
        cross_part: Vector3<Float>,
        mass: Float,
        frame: &str,
    ) -> Self {
        SpatialInertia {
            frame: frame.to_string(),
            moment,
            cross_part,
            mass,
        }
    }

    /// Massless body, e.g. an intermediate link of a multi-joint chain
    pub fn zero(frame: &str) -> Self {
        SpatialInertia::new(Matrix3::zeros(), Vector3::zeros(), 0., frame)
    }

    /// Transform the spatial inertia to be expressed in the "to" frame of transform
    pub fn transform(&self, transform: &Transform3D) -> SpatialInertia {
        if self.frame != transform.from {
            panic!(
                "self frame {} and transform from frame {} do not match!",
                self.frame, transform.from
            );
        }

        let R = transform.rot();
        let p = transform.trans();

        let J = self.moment;
        let mc = self.cross_part;
        let m = self.mass;

        let Rmc = R * mc;
        let mp = m * p;
        let mcnew = Rmc + mp;
        let X = Rmc * p.transpose();
        let Y = X + X.transpose() + mp * p.transpose();
        let Jnew = R * J * R.transpose() - Y + Y.trace() * Matrix3::identity();

        SpatialInertia {
            frame: transform.to.clone(),
            moment: Jnew,
            cross_part: mcnew,
            mass: m,
        }
    }

    /// Momentum (or Newton-Euler wrench) I * x of a spatial motion vector
    /// expressed in the same frame as this inertia
    pub fn mul(&self, x: &SpatialVector) -> SpatialVector {
        let (angular, linear) =
            mul_inertia(&self.moment, &self.cross_part, self.mass, &x.angular, &x.linear);
        SpatialVector::new(angular, linear)
    }

    /// Momentum matrix I * S, column by column
    pub fn mul_jacobian(&self, S: &GeometricJacobian) -> (Matrix3xX<Float>, Matrix3xX<Float>) {
        if self.frame != S.frame {
            panic!(
                "inertia frame {} and jacobian frame {} do not match!",
                self.frame, S.frame
            );
        }

        let ncols = S.dim();
        let mut angular = Matrix3xX::zeros(ncols);
        let mut linear = Matrix3xX::zeros(ncols);
        for i in 0..ncols {
            let (a, l) = mul_inertia(
                &self.moment,
                &self.cross_part,
                self.mass,
                &S.angular.column(i).into_owned(),
                &S.linear.column(i).into_owned(),
            );
            angular.set_column(i, &a);
            linear.set_column(i, &l);
        }
        (angular, linear)
    }
}

impl<'b> AddAssign<&'b SpatialInertia> for SpatialInertia {
    fn add_assign(&mut self, rhs: &Self) {
        if self.frame != rhs.frame {
            panic!("lhs frame {} != rhs frame {}!", self.frame, rhs.frame);
        }

        self.moment += rhs.moment;
        self.cross_part += rhs.cross_part;
        self.mass += rhs.mass;
    }
}

/// Computes the kinetic energy of a body
/// Essentially implements KE = 1/2 * v^T * M * v
pub fn kinetic_energy(inertia: &SpatialInertia, twist: &Twist) -> Float {
    if inertia.frame != twist.frame {
        panic!(
            "spatial inertia frame {} is not twist frame {}.",
            inertia.frame, twist.frame
        );
    }

    let w = twist.angular;
    let v = twist.linear;
    let J = inertia.moment;
    let c = inertia.cross_part;
    let m = inertia.mass;

    (w.dot(&(J * w)) + v.dot(&(m * v + 2.0 * w.cross(&c)))) / 2.0
}
