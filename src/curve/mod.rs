pub mod container;
pub mod control_point;
pub mod sampler;
pub mod spline;
pub mod tessellation;
pub use container::*;
pub use control_point::*;
pub use sampler::*;
pub use spline::*;
pub use tessellation::*;
