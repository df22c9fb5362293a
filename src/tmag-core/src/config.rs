//! Configuration module for loading TOML config files.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::engine::{DEFAULT_MAX_ATTEMPTS, DEFAULT_WINDOW_SIZE, EngineConfig, ExhaustionPolicy};
use crate::error::AgendaError;
use crate::role::{self, RoleName};

/// Environment variable overriding `schedule.window_size`.
pub const ENV_WINDOW_SIZE: &str = "TMAG_WINDOW_SIZE";
/// Environment variable overriding `schedule.max_attempts`.
pub const ENV_MAX_ATTEMPTS: &str = "TMAG_MAX_ATTEMPTS";
/// Environment variable overriding `schedule.accept_repeats`.
pub const ENV_ACCEPT_REPEATS: &str = "TMAG_ACCEPT_REPEATS";

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Roles to fill, in the order they are assigned.
    pub roles: Vec<String>,
    /// Club members eligible for roles.
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Settings for schedule generation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub window_size: usize,
    pub max_attempts: usize,
    pub aggregate_speaker_roles: bool,
    pub accept_repeats: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            aggregate_speaker_roles: true,
            accept_repeats: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AgendaError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| AgendaError::ConfigError(format!("Failed to read config: {}", e)))?;

        Self::from_str(&content)
    }

    /// Load configuration from string content.
    pub fn from_str(content: &str) -> Result<Self, AgendaError> {
        toml::from_str(content)
            .map_err(|e| AgendaError::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Apply `TMAG_*` environment overrides.
    pub fn apply_env(&mut self) -> Result<(), AgendaError> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), AgendaError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_WINDOW_SIZE) {
            self.schedule.window_size = parse_override(ENV_WINDOW_SIZE, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_ATTEMPTS) {
            self.schedule.max_attempts = parse_override(ENV_MAX_ATTEMPTS, &value)?;
        }
        if let Some(value) = lookup(ENV_ACCEPT_REPEATS) {
            self.schedule.accept_repeats = parse_override(ENV_ACCEPT_REPEATS, &value)?;
        }
        Ok(())
    }

    /// Resolve configured role names against the role registry.
    pub fn resolved_roles(&self) -> Result<Vec<RoleName>, AgendaError> {
        self.roles.iter().map(|r| role::resolve(r)).collect()
    }

    /// Engine settings derived from the `[schedule]` table.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            window_size: self.schedule.window_size,
            max_attempts: self.schedule.max_attempts,
            aggregate_speaker_roles: self.schedule.aggregate_speaker_roles,
            on_exhaustion: if self.schedule.accept_repeats {
                ExhaustionPolicy::AcceptRepeats
            } else {
                ExhaustionPolicy::Fail
            },
        }
    }
}

fn parse_override<T: FromStr>(key: &str, value: &str) -> Result<T, AgendaError> {
    value
        .trim()
        .parse()
        .map_err(|_| AgendaError::ConfigError(format!("Invalid value for {}: '{}'", key, value)))
}

/// Default configuration: a full meeting and no members.
pub fn default_config() -> Config {
    Config {
        roles: role::supported_roles()
            .iter()
            .map(|spec| spec.label.to_string())
            .collect(),
        members: Vec::new(),
        schedule: ScheduleConfig::default(),
    }
}
