//! Error types for dice, games and analysis

use thiserror::Error;

/// Errors raised by the simulator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Face {0} is not on the die")]
    InvalidFace(String),

    #[error("Invalid weight: {0}")]
    InvalidWeight(String),

    #[error("Die {die} has {found} faces, expected {expected}")]
    MismatchedDice {
        /// 1-based ordinal of the offending die
        die: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid table format {0:?}, expected \"wide\" or \"narrow\"")]
    InvalidFormat(String),

    #[error("Game has not been played")]
    NotPlayed,

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SimError::MismatchedDice {
            die: 2,
            expected: 6,
            found: 4,
        };
        assert_eq!(err.to_string(), "Die 2 has 4 faces, expected 6");

        let err = SimError::InvalidFormat("tall".into());
        assert!(err.to_string().contains("\"tall\""));
    }
}
