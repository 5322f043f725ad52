//! Build-time configuration for a [`crate::Tree`]: a small struct with
//! chained `with_*` setters, constructed once and passed by value into
//! the build call.

use crate::constants::{DEFAULT_LEAF_SIZE, DEFAULT_THETA};
use crate::criterion::OpeningCriterion;
use crate::error::ConfigError;

/// Options controlling how a [`crate::Tree`] is built.
#[derive(Debug, Clone)]
pub struct TreeOptions {
    pub(crate) leaf_size: usize,
    pub(crate) criterion: OpeningCriterion,
    pub(crate) theta: f64,
}

impl Default for TreeOptions {
    fn default() -> Self {
        TreeOptions {
            leaf_size: DEFAULT_LEAF_SIZE,
            criterion: OpeningCriterion::default(),
            theta: DEFAULT_THETA,
        }
    }
}

impl TreeOptions {
    /// Default options: `leaf_size = 16`, `PKDGRAV3` criterion, `theta = 0.7`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the leaf-size threshold. Errors if `leaf_size == 0`.
    pub fn with_leaf_size(mut self, leaf_size: usize) -> Result<Self, ConfigError> {
        if leaf_size == 0 {
            return Err(ConfigError::ZeroLeafSize);
        }
        self.leaf_size = leaf_size;
        Ok(self)
    }

    /// Sets the opening criterion.
    pub fn with_criterion(mut self, criterion: OpeningCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Sets the opening angle theta. Errors if `theta` is not finite and
    /// strictly positive.
    pub fn with_theta(mut self, theta: f64) -> Result<Self, ConfigError> {
        if !theta.is_finite() || theta <= 0.0 {
            return Err(ConfigError::InvalidTheta(format!("{theta}")));
        }
        self.theta = theta;
        Ok(self)
    }

    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    pub fn criterion(&self) -> OpeningCriterion {
        self.criterion
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }
}
