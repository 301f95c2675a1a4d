pub mod aabb;
pub mod places;
pub mod transform;

pub use glam::{DVec3, DMat4};
pub use aabb::Aabb3;
pub use places::EqualsToPlaces;
pub use transform::Transform;

pub type Point3 = DVec3;
pub type Vector3 = DVec3;
