//! CLI command implementations

pub mod auth;
pub mod data;

use std::process::ExitCode;

/// How a command ended when it did not fail outright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Firebase answered but refused the operation
    Rejected,
}

impl Outcome {
    pub fn from_accepted(accepted: bool) -> Self {
        if accepted { Self::Done } else { Self::Rejected }
    }

    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Done => ExitCode::SUCCESS,
            Self::Rejected => ExitCode::FAILURE,
        }
    }
}
