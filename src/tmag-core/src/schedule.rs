//! Persisted meeting schedule.
//!
//! A YAML list of agendas, most recent first. New agendas are prepended.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::agenda::Agenda;
use crate::error::AgendaError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    agendas: Vec<Agenda>,
}

impl Schedule {
    pub fn new(agendas: Vec<Agenda>) -> Self {
        Self { agendas }
    }

    /// Load a schedule file.
    ///
    /// A missing file yields an empty schedule. So does a file that is not
    /// a valid schedule, after logging a warning.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AgendaError> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no schedule file yet, starting empty");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        match Self::from_str(&content) {
            Ok(schedule) => Ok(schedule),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable schedule, using an empty one");
                Ok(Self::default())
            }
        }
    }

    /// Parse schedule YAML. An empty document is an empty schedule.
    pub fn from_str(content: &str) -> Result<Self, AgendaError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| AgendaError::ScheduleError(format!("Failed to parse schedule: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, AgendaError> {
        serde_yaml::to_string(self)
            .map_err(|e| AgendaError::ScheduleError(format!("Failed to serialize schedule: {}", e)))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AgendaError> {
        fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    /// Past agendas, most recent first.
    pub fn history(&self) -> &[Agenda] {
        &self.agendas
    }

    pub fn latest(&self) -> Option<&Agenda> {
        self.agendas.first()
    }

    /// Make `agenda` the most recent entry.
    pub fn prepend(&mut self, agenda: Agenda) {
        self.agendas.insert(0, agenda);
    }

    pub fn len(&self) -> usize {
        self.agendas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agendas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role;

    fn agenda(toastmaster: &str) -> Agenda {
        let mut agenda = Agenda::new();
        agenda.assign("toastmaster", toastmaster).unwrap();
        agenda
    }

    #[test]
    fn test_prepend_keeps_most_recent_first() {
        let mut schedule = Schedule::new(vec![agenda("Alice")]);
        schedule.prepend(agenda("Bob"));

        let toastmaster = role::resolve("toastmaster").unwrap();
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.latest().unwrap().member_for(&toastmaster), Some("Bob"));
        assert_eq!(schedule.history()[1].member_for(&toastmaster), Some("Alice"));
    }

    #[test]
    fn test_save_then_load_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.yaml");

        let mut schedule = Schedule::default();
        schedule.prepend(agenda("Alice"));
        schedule.prepend(agenda("Bob"));
        schedule.save(&path).unwrap();

        let loaded = Schedule::load(&path).unwrap();
        assert_eq!(loaded, schedule);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Schedule::load(dir.path().join("absent.yaml")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_propagates_other_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = Schedule::load(dir.path()).unwrap_err();
        assert!(matches!(err, AgendaError::Io(_)));
    }

    #[test]
    fn test_load_malformed_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.yaml");
        fs::write(&path, "toastmaster: [not, a, schedule").unwrap();

        let loaded = Schedule::load(&path).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_from_str_reads_labelled_agendas() {
        let yaml = "- toastmaster: Bob\n  speaker 1: Carol\n- toastmaster: Alice\n";
        let schedule = Schedule::from_str(yaml).unwrap();

        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.history()[0].speakers(), vec!["Carol"]);
        assert!(Schedule::from_str("").unwrap().is_empty());
    }
}
