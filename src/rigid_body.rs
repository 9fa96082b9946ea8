use na::{vector, Matrix3, Vector3};

use crate::{inertia::SpatialInertia, types::Float};

/// A rigid body of the mechanism. Its frame name is the frame of its inertia.
#[derive(Clone, PartialEq, Debug)]
pub struct RigidBody {
    pub inertia: SpatialInertia,
}

impl RigidBody {
    pub fn new(inertia: SpatialInertia) -> Self {
        RigidBody { inertia }
    }

    pub fn frame(&self) -> &str {
        &self.inertia.frame
    }

    pub fn new_massless(frame: &str) -> Self {
        RigidBody::new(SpatialInertia::zero(frame))
    }

    pub fn new_sphere_at(com: &Vector3<Float>, m: Float, r: Float, frame: &str) -> Self {
        let moment = 2. / 5. * m * r * r;
        let moment_com = Matrix3::from_diagonal_element(moment);
        RigidBody::new(SpatialInertia::new(
            parallel_axis(&moment_com, com, m),
            m * com,
            m,
            frame,
        ))
    }

    /// Create a uniform cuboid, whose center of mass is not at the origin of frame
    pub fn new_cuboid_at(
        com: &Vector3<Float>,
        m: Float,
        w: Float,
        d: Float,
        h: Float,
        frame: &str,
    ) -> Self {
        let moment_x = m * (d * d + h * h) / 12.0;
        let moment_y = m * (w * w + h * h) / 12.0;
        let moment_z = m * (w * w + d * d) / 12.0;
        let moment_com = Matrix3::from_diagonal(&vector![moment_x, moment_y, moment_z]);
        RigidBody::new(SpatialInertia::new(
            parallel_axis(&moment_com, com, m),
            m * com,
            m,
            frame,
        ))
    }
}

/// generalized parallel axis theorem
fn parallel_axis(moment_com: &Matrix3<Float>, com: &Vector3<Float>, m: Float) -> Matrix3<Float> {
    moment_com + m * (com.norm_squared() * Matrix3::identity() - com * com.transpose())
}
