use std::ops::{Add, Sub};

use na::{zero, Vector3};

use crate::types::Float;

/// Frame-less 6D vector, angular part first. Used for intermediate quantities
/// whose frame is fixed by context, e.g. everything in world frame inside the
/// dynamics recursions.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct SpatialVector {
    pub angular: Vector3<Float>,
    pub linear: Vector3<Float>,
}

impl SpatialVector {
    pub fn new(angular: Vector3<Float>, linear: Vector3<Float>) -> Self {
        SpatialVector { angular, linear }
    }

    pub fn linear(linear: Vector3<Float>) -> Self {
        SpatialVector {
            angular: zero(),
            linear,
        }
    }
}

impl Add for SpatialVector {
    type Output = SpatialVector;

    fn add(self, rhs: Self) -> Self::Output {
        SpatialVector {
            angular: self.angular + rhs.angular,
            linear: self.linear + rhs.linear,
        }
    }
}

impl Sub for SpatialVector {
    type Output = SpatialVector;

    fn sub(self, rhs: Self) -> Self::Output {
        SpatialVector {
            angular: self.angular - rhs.angular,
            linear: self.linear - rhs.linear,
        }
    }
}
