//! Error types shared by the sampler, the validator and the config layer

use thiserror::Error;

/// Errors raised by coinsim operations
///
/// Every variant is reported synchronously to the immediate caller; nothing
/// in the crate retries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A simulation parameter is outside its domain. Raised before any
    /// sampling work starts.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Data handed to the validator (or to a tabulation merge) cannot produce
    /// a meaningful result.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl SimulationError {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        SimulationError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// True for `InvalidParameter`
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, SimulationError::InvalidParameter { .. })
    }

    /// True for `InvalidInput`
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, SimulationError::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
