#![allow(clippy::needless_range_loop)]

mod curve;
mod error;
mod knot;
mod misc;
mod random;
mod sampling;
mod web;

pub mod prelude {
    pub use crate::curve::*;
    pub use crate::error::*;
    pub use crate::knot::*;
    pub use crate::misc::*;
    pub use crate::random::*;
    pub use crate::sampling::*;
    pub use crate::web::*;
}
