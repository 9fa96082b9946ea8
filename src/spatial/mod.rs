pub mod geometric_jacobian;
pub mod pose;
pub mod spatial_vector;
pub mod transform;
pub mod twist;
pub mod wrench;
