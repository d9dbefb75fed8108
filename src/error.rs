//! Collaborator-layer error type (spec.md §7, formalized). The core move
//! generator and search do not return `Result` on the hot path; this is
//! used by the FEN parser and UCI dispatcher instead.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    InvalidFen(String),
    IllegalMove { uci: String },
    InvariantViolation(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidFen(s) => write!(f, "invalid FEN: {s}"),
            EngineError::IllegalMove { uci } => write!(f, "illegal move: {uci}"),
            EngineError::InvariantViolation(s) => write!(f, "invariant violation: {s}"),
        }
    }
}

impl std::error::Error for EngineError {}
