//! Error types for agenda generation.

use thiserror::Error;

use crate::role::{RoleName, supported_roles_list};

#[derive(Error, Debug)]
pub enum AgendaError {
    #[error("Unknown role '{0}'. Supported roles: {list}", list = supported_roles_list())]
    UnknownRole(String),

    #[error("Number of roles, {roles}, did not equal number of members, {members}")]
    RoleMemberCountMismatch { roles: usize, members: usize },

    #[error("Role '{0}' is listed more than once")]
    DuplicateRole(RoleName),

    #[error("Could not find an eligible member for role '{0}'")]
    NoEligibleMember(RoleName),

    #[error("Gave up after {attempts} attempt(s): {last_cause}")]
    ExhaustedRetries {
        attempts: usize,
        last_cause: Box<AgendaError>,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Schedule error: {0}")]
    ScheduleError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AgendaError {
    /// Whether a fresh attempt with the same inputs could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AgendaError::NoEligibleMember(_))
    }
}
