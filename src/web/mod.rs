pub mod drape;
pub mod generator;
pub mod network;
pub mod options;
pub mod partition;
pub mod strand;
pub use drape::*;
pub use generator::*;
pub use network::*;
pub use options::*;
pub use partition::*;
pub use strand::*;

#[cfg(test)]
mod tests;
