use na::{Isometry3, Matrix3xX, Translation3, UnitQuaternion};
use nalgebra::{Matrix3, Vector3};

use crate::types::Float;

/// Returns the skew-symmetric matrix of v, i.e. the matrix form of v × (·)
#[rustfmt::skip]
pub fn skew_symmetric(v: &Vector3<Float>) -> Matrix3<Float> {
    Matrix3::new(
        0., -v.z, v.y,
        v.z, 0., -v.x,
        -v.y, v.x, 0.,
    )
}

/// Mulitiply a spatial inertia with a spatial vector
/// | J         c_hat | | w |   | Jw        + c_hat v |
/// | c_hat^T   m     | | v | = | c_hat^T w + mv      |
pub fn mul_inertia(
    J: &Matrix3<Float>,
    c: &Vector3<Float>,
    m: Float,
    w: &Vector3<Float>,
    v: &Vector3<Float>,
) -> (Vector3<Float>, Vector3<Float>) {
    let angular = J * w + c.cross(v);
    let linear = m * v - c.cross(w);
    (angular, linear)
}

/// Also known as spatial motion cross product
/// Reference: Chapter 2.9 Spatial Cross Products in "Robot Dynamics Algorithms" by Roy Featherstone
pub fn se3_commutator(
    xw: &Vector3<Float>,
    xv: &Vector3<Float>,
    yw: &Vector3<Float>,
    yv: &Vector3<Float>,
) -> (Vector3<Float>, Vector3<Float>) {
    let angular = xw.cross(yw);
    let linear = xw.cross(yv) + xv.cross(yw);
    (angular, linear)
}

/// Spatial force cross product, v ×* f, where v = (w, v) is a motion vector
/// and f = (τ, f) is a force vector.
pub fn spatial_force_cross(
    w: &Vector3<Float>,
    v: &Vector3<Float>,
    torque: &Vector3<Float>,
    force: &Vector3<Float>,
) -> (Vector3<Float>, Vector3<Float>) {
    let angular = w.cross(torque) + v.cross(force);
    let linear = w.cross(force);
    (angular, linear)
}

/// Perform column-wise cross product
pub fn colwise_cross(a: &Vector3<Float>, b: &Matrix3xX<Float>) -> Matrix3xX<Float> {
    let ncols = b.ncols();
    let mut result = Matrix3xX::zeros(ncols);
    for i in 0..ncols {
        result.set_column(i, &a.cross(&b.column(i)));
    }
    result
}

/// Exponential map from a twist (w, v), scaled by time already, to the rigid
/// transform it generates:
///     exp(| w_hat  v |) = | R  V v |
///         | 0      0 |    | 0  1   |
/// with V = I + (1 - cos θ)/θ² w_hat + (θ - sin θ)/θ³ w_hat², θ = |w|.
///
/// Ref: Modern Robotics, Lynch & Park, Prop. 3.25
pub fn se3_exp(w: &Vector3<Float>, v: &Vector3<Float>) -> Isometry3<Float> {
    let theta = w.norm();
    let w_hat = skew_symmetric(w);
    let w_hat2 = w_hat * w_hat;

    // Taylor expansion near zero rotation
    let (a, b) = if theta < 1e-6 {
        (0.5 - theta * theta / 24., 1. / 6. - theta * theta / 120.)
    } else {
        let theta2 = theta * theta;
        (
            (1. - theta.cos()) / theta2,
            (theta - theta.sin()) / (theta2 * theta),
        )
    };
    let V = Matrix3::identity() + a * w_hat + b * w_hat2;

    Isometry3::from_parts(
        Translation3::from(V * v),
        UnitQuaternion::from_scaled_axis(*w),
    )
}

#[macro_export]
macro_rules! assert_close {
    ($left:expr, $right:expr, $tolerance:expr) => {
        let left = $left;
        let right = $right;
        let tol = $tolerance;
        let diff = (left - right).abs();
        if diff > tol {
            panic!(
                "assertion failed: {} ~= {} \
                (tolerance: {}, difference: {})",
                left, right, tol, diff
            );
        }
    };
}

#[macro_export]
macro_rules! assert_vec_close {
    ($left:expr, $right:expr, $tolerance:expr) => {
        let left = $left;
        let right = $right;
        assert_eq!(left.len(), right.len(), "length mismatch");
        let tol = $tolerance;
        for (a, b) in left.iter().zip(right.iter()) {
            $crate::assert_close!(a, b, tol);
        }
    };
}
