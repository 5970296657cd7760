pub mod floating_point;
pub mod ray;
pub mod transformable;

pub use floating_point::*;
pub use ray::*;
pub use transformable::*;
