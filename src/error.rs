use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    InvalidInput,
    Configuration,
    Io,
    Internal,
}

/// Hard failure: a caller bug (bad configuration, invalid input) or an I/O
/// problem. An infeasible supply chain is NOT an error; it is reported as a
/// `Quote` with `feasible == false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanError {
    pub code: ErrorCode,
    pub message: String,
}

impl PlanError {
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self {
            code: ErrorCode::InvalidInput,
            message: message.into(),
        }
    }

    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self {
            code: ErrorCode::Configuration,
            message: message.into(),
        }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self {
            code: ErrorCode::Io,
            message: message.into(),
        }
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self {
            code: ErrorCode::Internal,
            message: message.into(),
        }
    }
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for PlanError {}
