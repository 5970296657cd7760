pub mod basis;
pub mod knot_vector;
pub use basis::*;
pub use knot_vector::*;
