//! Toastmasters Agenda Generator Core Library
//!
//! Provides the role registry, the constrained random assignment engine,
//! and schedule persistence.

pub mod agenda;
pub mod config;
pub mod engine;
pub mod error;
pub mod role;
pub mod schedule;
pub mod shuffle;
pub mod telemetry;

pub use agenda::Agenda;
pub use config::{Config, default_config};
pub use engine::{AssignmentEngine, EngineConfig, ExhaustionPolicy, Generation};
pub use error::AgendaError;
pub use role::RoleName;
pub use schedule::Schedule;
pub use shuffle::{RandomShuffler, Shuffler};
