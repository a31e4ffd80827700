//! Error types shared by the move engine, the legality check and the solver.

use thiserror::Error;

/// Errors surfaced by the cube core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CubeError {
    /// The symbol is not one of the twelve quarter-turn generators.
    #[error("invalid move symbol {symbol:?}")]
    InvalidMove { symbol: String },

    /// The state is not reachable from solved, or a solver phase could not
    /// classify its sub-case.
    #[error("cannot solve this state: {reason}")]
    UnsolvableState { reason: String },

    /// Serialized state that cannot be decoded into 54 facelets.
    #[error("malformed cube state: {reason}")]
    MalformedState { reason: String },
}

impl CubeError {
    pub fn invalid_move(symbol: impl Into<String>) -> Self {
        CubeError::InvalidMove {
            symbol: symbol.into(),
        }
    }

    pub fn unsolvable(reason: impl Into<String>) -> Self {
        CubeError::UnsolvableState {
            reason: reason.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        CubeError::MalformedState {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CubeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CubeError::invalid_move("X");
        assert_eq!(err.to_string(), "invalid move symbol \"X\"");

        let err = CubeError::unsolvable("odd edge flip");
        assert_eq!(err.to_string(), "cannot solve this state: odd edge flip");
    }
}
