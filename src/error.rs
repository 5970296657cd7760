use thiserror::Error;

/// Failure kinds raised while evaluating splines or generating a strand network.
///
/// Functions in this crate return `anyhow::Result`; the kind can be recovered with
/// `err.downcast_ref::<SpiderwebError>()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpiderwebError {
    #[error("Invalid spline geometry: {0}")]
    InvalidSplineGeometry(String),

    #[error("Unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    #[error("Spline resolved to zero tessellated points")]
    EmptySample,

    #[error("At least 2 anchor points are required, got {0}")]
    InsufficientAnchors(usize),

    #[error("Failed to draw a distinct sample within {0} attempts")]
    RandomSamplingExhausted(usize),

    #[error("Invalid option `{name}`: {reason}")]
    InvalidOption { name: &'static str, reason: String },

    #[error("Spline kind {found} is not compatible with {expected} splines on the curve")]
    IncompatibleSplineKind { expected: String, found: String },
}

impl SpiderwebError {
    /// Find the typed kind behind an `anyhow::Error`
    pub fn kind_of(err: &anyhow::Error) -> Option<&SpiderwebError> {
        err.downcast_ref::<SpiderwebError>()
    }
}
