use crate::{error::SpiderwebError, sampling::SamplingMethod};

pub const MIN_AMOUNT: usize = 2;
pub const MAX_AMOUNT: usize = 999_999;
pub const MAX_MAIN_ITERATIONS: usize = 100;

/// Distribution of the polyline sample picked as the end of a sub-strand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndexDistribution {
    /// Linear falloff from the middle of the strand
    #[default]
    Triangular,
    /// Bell curve around the middle of the strand
    Gaussian,
}

/// Options for generating a strand network
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct StrandNetworkOptions {
    /// Anchor points to sample across all sources
    amount: usize,
    /// Main strands are drawn once per anchor and iteration
    main_iterations: usize,
    /// Rounds of sub-strands spanning between main strands
    sub_iterations: usize,
    method: SamplingMethod,
    seed: u64,
    /// Bounds of the z offset applied to each strand middle
    drape_min: f64,
    drape_max: f64,
    /// Scale the drape by the strand length relative to the mean length of the whole network
    length_solver: bool,
    /// Allow sub-strands to start from the end points of main strands
    include_ends: bool,
    distribution: IndexDistribution,
    /// Samples per segment when tessellating main strands
    strand_resolution: usize,
}

impl Default for StrandNetworkOptions {
    fn default() -> Self {
        Self {
            amount: 20,
            main_iterations: 1,
            sub_iterations: 3,
            method: SamplingMethod::default(),
            seed: 0,
            drape_min: -1.0,
            drape_max: 0.0,
            length_solver: true,
            include_ends: false,
            distribution: IndexDistribution::default(),
            strand_resolution: 12,
        }
    }
}

impl StrandNetworkOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_amount(mut self, amount: usize) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_main_iterations(mut self, iterations: usize) -> Self {
        self.main_iterations = iterations;
        self
    }

    pub fn with_sub_iterations(mut self, iterations: usize) -> Self {
        self.sub_iterations = iterations;
        self
    }

    pub fn with_method(mut self, method: SamplingMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_drape(mut self, min: f64, max: f64) -> Self {
        self.drape_min = min;
        self.drape_max = max;
        self
    }

    pub fn with_length_solver(mut self, enabled: bool) -> Self {
        self.length_solver = enabled;
        self
    }

    pub fn with_include_ends(mut self, include_ends: bool) -> Self {
        self.include_ends = include_ends;
        self
    }

    pub fn with_distribution(mut self, distribution: IndexDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn with_strand_resolution(mut self, resolution: usize) -> Self {
        self.strand_resolution = resolution;
        self
    }

    pub fn amount(&self) -> usize {
        self.amount
    }

    pub fn main_iterations(&self) -> usize {
        self.main_iterations
    }

    pub fn sub_iterations(&self) -> usize {
        self.sub_iterations
    }

    pub fn method(&self) -> SamplingMethod {
        self.method
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn drape_min(&self) -> f64 {
        self.drape_min
    }

    pub fn drape_max(&self) -> f64 {
        self.drape_max
    }

    pub fn length_solver(&self) -> bool {
        self.length_solver
    }

    pub fn include_ends(&self) -> bool {
        self.include_ends
    }

    pub fn distribution(&self) -> IndexDistribution {
        self.distribution
    }

    pub fn strand_resolution(&self) -> usize {
        self.strand_resolution
    }

    /// Check every option against its allowed range
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(MIN_AMOUNT..=MAX_AMOUNT).contains(&self.amount) {
            anyhow::bail!(SpiderwebError::InvalidOption {
                name: "amount",
                reason: format!(
                    "must be within {}..={}, got {}",
                    MIN_AMOUNT, MAX_AMOUNT, self.amount
                ),
            });
        }
        if !(1..=MAX_MAIN_ITERATIONS).contains(&self.main_iterations) {
            anyhow::bail!(SpiderwebError::InvalidOption {
                name: "main_iterations",
                reason: format!(
                    "must be within 1..={}, got {}",
                    MAX_MAIN_ITERATIONS, self.main_iterations
                ),
            });
        }
        if self.strand_resolution == 0 {
            anyhow::bail!(SpiderwebError::InvalidOption {
                name: "strand_resolution",
                reason: "must be at least 1".to_string(),
            });
        }
        for (name, value) in [("drape_min", self.drape_min), ("drape_max", self.drape_max)] {
            if !value.is_finite() {
                anyhow::bail!(SpiderwebError::InvalidOption {
                    name,
                    reason: format!("must be finite, got {}", value),
                });
            }
        }
        Ok(())
    }
}
