//! Configuration for dataset composition.
//!
//! [`ComposerConfig`] gathers the parameters of one composition run, and
//! [`InterpolationParams`] the parameters of cycle-boundary smoothing.
//!
//! # Example
//!
//! ```
//! use motion_composer::{ComposerConfig, InterpolationParams};
//!
//! let config = ComposerConfig::new(6, 40, vec![20.0, 80.0])
//!     .with_seed(7)
//!     .with_interpolation(InterpolationParams::new(10, vec![12, 13]));
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ComposeError, Result};

/// Parameters of one dataset composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposerConfig {
    /// Number of independently drawn sequences.
    pub num_sequences: usize,

    /// Number of primitive draws per sequence.
    pub num_cycles: usize,

    /// Relative draw weight of each primitive, in primitive order.
    /// Need not sum to 100.
    pub weights: Vec<f64>,

    /// Seed for the composer's random source. `None` draws from OS entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Boundary smoothing; `None` leaves cycles as recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpolation: Option<InterpolationParams>,
}

/// Windowed interpolation applied at every cycle boundary after the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpolationParams {
    /// Number of leading timesteps of each cycle that are interpolated.
    pub steps: usize,

    /// Joint columns that are smoothed; the rest are left untouched.
    pub joints: Vec<usize>,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            num_sequences: 1,
            num_cycles: 1,
            weights: Vec::new(),
            seed: None,
            interpolation: None,
        }
    }
}

impl ComposerConfig {
    /// Create a configuration without seed or interpolation.
    #[must_use]
    pub fn new(num_sequences: usize, num_cycles: usize, weights: Vec<f64>) -> Self {
        Self {
            num_sequences,
            num_cycles,
            weights,
            ..Self::default()
        }
    }

    /// Two primitives drawn 20/80 into 6 sequences of 40 cycles, with the
    /// head joints (columns 12 and 13) smoothed over 10 steps.
    #[must_use]
    pub fn demo() -> Self {
        Self::new(6, 40, vec![20.0, 80.0])
            .with_interpolation(InterpolationParams::new(10, vec![12, 13]))
    }

    /// Fix the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable boundary smoothing.
    #[must_use]
    pub fn with_interpolation(mut self, params: InterpolationParams) -> Self {
        self.interpolation = Some(params);
        self
    }

    /// Validate the configuration.
    ///
    /// Joint indices are checked against the primitives at composition time.
    ///
    /// # Errors
    ///
    /// Returns an error if a count is zero or the weights are unusable.
    pub fn validate(&self) -> Result<()> {
        if self.num_sequences == 0 {
            return Err(ComposeError::invalid_config(
                "num_sequences must be at least 1",
            ));
        }
        if self.num_cycles == 0 {
            return Err(ComposeError::invalid_config("num_cycles must be at least 1"));
        }
        validate_weights(&self.weights)?;
        if let Some(params) = &self.interpolation {
            params.validate()?;
        }
        Ok(())
    }
}

impl InterpolationParams {
    /// Smooth `joints` over the first `steps` timesteps of each cycle.
    #[must_use]
    pub fn new(steps: usize, joints: Vec<usize>) -> Self {
        Self { steps, joints }
    }

    /// Parse the answers of an interactive prompt: a step count and a
    /// comma-separated list of joint indices (e.g. `"10"` and `"12, 13"`).
    ///
    /// # Errors
    ///
    /// Returns a parse error for non-numeric input and an invalid
    /// configuration error if the parsed values fail [`Self::validate`].
    pub fn parse(steps: &str, joints: &str) -> Result<Self> {
        let steps = steps
            .trim()
            .parse::<usize>()
            .map_err(|e| ComposeError::parse(format!("step count {steps:?}: {e}")))?;
        let joints = joints
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<usize>()
                    .map_err(|e| ComposeError::parse(format!("joint index {s:?}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        let params = Self::new(steps, joints);
        params.validate()?;
        Ok(params)
    }

    /// Validate the parameters independently of any cycle length.
    ///
    /// # Errors
    ///
    /// Returns an error if `steps` is zero or no joint is selected.
    pub fn validate(&self) -> Result<()> {
        if self.steps == 0 {
            return Err(ComposeError::invalid_config(
                "interpolation steps must be at least 1",
            ));
        }
        if self.joints.is_empty() {
            return Err(ComposeError::EmptySelection("joint"));
        }
        Ok(())
    }
}

/// Check that weights can drive a weighted draw.
pub(crate) fn validate_weights(weights: &[f64]) -> Result<()> {
    if weights.is_empty() {
        return Err(ComposeError::invalid_config("weights must not be empty"));
    }
    if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(ComposeError::invalid_config(format!(
            "weights must be finite and non-negative, got {w}"
        )));
    }
    if weights.iter().all(|&w| w == 0.0) {
        return Err(ComposeError::invalid_config("at least one weight must be positive"));
    }
    if !weights.iter().sum::<f64>().is_finite() {
        return Err(ComposeError::invalid_config("sum of weights overflows"));
    }
    Ok(())
}
