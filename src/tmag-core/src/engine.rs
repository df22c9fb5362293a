//! Assignment engine.
//!
//! Builds one agenda at a time: every role gets a distinct member, and no
//! member gets a role they held in the most recent meetings of the
//! history. Each attempt is greedy over a freshly shuffled pool; failed
//! attempts are retried from scratch up to a configured bound.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::agenda::Agenda;
use crate::error::AgendaError;
use crate::role::{self, RoleName};
use crate::shuffle::{RandomShuffler, Shuffler};

/// Past meetings compared against by default.
pub const DEFAULT_WINDOW_SIZE: usize = 2;

/// Attempts made before giving up by default.
pub const DEFAULT_MAX_ATTEMPTS: usize = 50;

/// What to do once every attempt has failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExhaustionPolicy {
    /// Report `ExhaustedRetries`.
    #[default]
    Fail,
    /// Make one more attempt that ignores history and return it flagged
    /// as relaxed. Members are still never given two roles.
    AcceptRepeats,
}

/// Knobs for a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Number of most recent history entries to check against.
    pub window_size: usize,
    /// Upper bound on attempts; must be at least 1.
    pub max_attempts: usize,
    /// Treat all speaker slots as one role when reading history.
    pub aggregate_speaker_roles: bool,
    pub on_exhaustion: ExhaustionPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            aggregate_speaker_roles: true,
            on_exhaustion: ExhaustionPolicy::Fail,
        }
    }
}

/// Result of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub agenda: Agenda,
    /// Attempts made, including a relaxed one.
    pub attempts: usize,
    /// The history window was ignored to produce this agenda.
    pub relaxed: bool,
}

/// Assigns members to roles.
pub struct AssignmentEngine<S = RandomShuffler> {
    config: EngineConfig,
    shuffler: S,
}

impl AssignmentEngine<RandomShuffler> {
    /// Engine backed by an entropy-seeded shuffler.
    pub fn with_config(config: EngineConfig) -> Self {
        Self::new(config, RandomShuffler::from_entropy())
    }
}

impl<S: Shuffler> AssignmentEngine<S> {
    pub fn new(config: EngineConfig, shuffler: S) -> Self {
        Self { config, shuffler }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Slots of `agenda` that break this engine's window rule against
    /// `history`.
    pub fn conflicts(&self, agenda: &Agenda, history: &[Agenda]) -> Vec<(RoleName, String)> {
        window_conflicts(
            agenda,
            history,
            self.config.window_size,
            self.config.aggregate_speaker_roles,
        )
    }

    /// Generate an agenda drawing from `members`, avoiding repeats against
    /// the first `window_size` entries of `history` (most recent first).
    ///
    /// `members` is copied; the caller's slice is left untouched.
    pub fn generate(
        &mut self,
        roles: &[RoleName],
        members: &[String],
        history: &[Agenda],
    ) -> Result<Generation, AgendaError> {
        if self.config.max_attempts == 0 {
            return Err(AgendaError::ConfigError(
                "max_attempts must be at least 1".to_string(),
            ));
        }

        if members.iter().any(|m| m.trim().is_empty()) {
            return Err(AgendaError::ConfigError(
                "member names must not be blank".to_string(),
            ));
        }

        let roles = resolve_roles(roles)?;
        let exclusions: Vec<HashSet<&str>> = roles
            .iter()
            .map(|r| {
                exclusions_for(
                    r,
                    history,
                    self.config.window_size,
                    self.config.aggregate_speaker_roles,
                )
            })
            .collect();
        let mut pool = members.to_vec();

        let mut attempts = 0;
        let mut last_cause = loop {
            attempts += 1;
            match self.attempt(&roles, &mut pool, &exclusions) {
                Ok(agenda) => {
                    info!(attempts, roles = roles.len(), "agenda generated");
                    return Ok(Generation {
                        agenda,
                        attempts,
                        relaxed: false,
                    });
                }
                Err(cause) if !cause.is_retryable() => return Err(cause),
                Err(cause) if attempts >= self.config.max_attempts => break cause,
                Err(cause) => debug!(attempt = attempts, %cause, "attempt failed, retrying"),
            }
        };

        if self.config.on_exhaustion == ExhaustionPolicy::AcceptRepeats {
            let unconstrained = vec![HashSet::new(); roles.len()];
            attempts += 1;
            match self.attempt(&roles, &mut pool, &unconstrained) {
                Ok(agenda) => {
                    warn!(attempts, "no agenda avoids recent repeats, accepting one that does not");
                    return Ok(Generation {
                        agenda,
                        attempts,
                        relaxed: true,
                    });
                }
                Err(cause) => last_cause = cause,
            }
        }

        warn!(attempts, cause = %last_cause, "gave up generating agenda");
        Err(AgendaError::ExhaustedRetries {
            attempts,
            last_cause: Box::new(last_cause),
        })
    }

    /// Generate an agenda ignoring history, one member per role.
    ///
    /// Requires exactly as many members as roles.
    pub fn generate_exact(
        &mut self,
        roles: &[RoleName],
        members: &[String],
    ) -> Result<Generation, AgendaError> {
        if roles.len() != members.len() {
            return Err(AgendaError::RoleMemberCountMismatch {
                roles: roles.len(),
                members: members.len(),
            });
        }
        self.generate(roles, members, &[])
    }

    fn attempt(
        &mut self,
        roles: &[RoleName],
        pool: &mut [String],
        exclusions: &[HashSet<&str>],
    ) -> Result<Agenda, AgendaError> {
        let mut agenda = Agenda::new();
        let mut taken: HashSet<String> = HashSet::with_capacity(roles.len());

        for (role, excluded) in roles.iter().zip(exclusions) {
            self.shuffler.shuffle(pool);
            let member = pool
                .iter()
                .find(|m| !taken.contains(m.as_str()) && !excluded.contains(m.as_str()))
                .ok_or_else(|| AgendaError::NoEligibleMember(role.clone()))?
                .clone();

            agenda.assign(role.as_str(), member.clone())?;
            taken.insert(member);
        }

        Ok(agenda)
    }
}

/// Members barred from `role` by the first `window_size` history entries.
///
/// With `aggregate_speakers`, a speaker slot is barred to everyone who held
/// any speaker slot in the window.
pub fn exclusions_for<'a>(
    role: &RoleName,
    history: &'a [Agenda],
    window_size: usize,
    aggregate_speakers: bool,
) -> HashSet<&'a str> {
    let grouped = aggregate_speakers && role::is_multi_slot_category(role);
    history
        .iter()
        .take(window_size)
        .flat_map(|agenda| {
            if grouped {
                agenda.speakers()
            } else {
                agenda.member_for(role).into_iter().collect()
            }
        })
        .collect()
}

/// Slots of `agenda` whose member is barred from that role by `history`.
pub fn window_conflicts(
    agenda: &Agenda,
    history: &[Agenda],
    window_size: usize,
    aggregate_speakers: bool,
) -> Vec<(RoleName, String)> {
    agenda
        .iter()
        .filter(|(role, member)| {
            exclusions_for(role, history, window_size, aggregate_speakers).contains(member)
        })
        .map(|(role, member)| (role.clone(), member.to_string()))
        .collect()
}

fn resolve_roles(roles: &[RoleName]) -> Result<Vec<RoleName>, AgendaError> {
    let mut seen = HashSet::with_capacity(roles.len());
    roles
        .iter()
        .map(|raw| {
            let role = role::resolve(raw.as_str())?;
            if !seen.insert(role.clone()) {
                return Err(AgendaError::DuplicateRole(role));
            }
            Ok(role)
        })
        .collect()
}
