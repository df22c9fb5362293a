//! Agenda: one meeting's role assignments.
//!
//! Slots are keyed by canonical role and kept in agenda order. Roles
//! nobody fills are simply absent.

use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AgendaError;
use crate::role::{self, RoleName};

/// Role assignments for a single meeting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Agenda {
    slots: Vec<(RoleName, String)>,
}

impl Agenda {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `member` in `role`, replacing whoever held it.
    pub fn assign(&mut self, role: &str, member: impl Into<String>) -> Result<(), AgendaError> {
        let role = role::resolve(role)?;
        let member = member.into();

        if let Some(slot) = self.slots.iter_mut().find(|(r, _)| *r == role) {
            slot.1 = member;
            return Ok(());
        }

        let at = self
            .slots
            .iter()
            .position(|(r, _)| role::position(r) > role::position(&role))
            .unwrap_or(self.slots.len());
        self.slots.insert(at, (role, member));
        Ok(())
    }

    /// Member holding exactly this role.
    pub fn member_for(&self, role: &RoleName) -> Option<&str> {
        self.slots
            .iter()
            .find(|(r, _)| r == role)
            .map(|(_, m)| m.as_str())
    }

    /// Members in every speaker slot.
    pub fn speakers(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter(|(r, _)| role::is_multi_slot_category(r))
            .map(|(_, m)| m.as_str())
            .collect()
    }

    pub fn members(&self) -> Vec<&str> {
        self.slots.iter().map(|(_, m)| m.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RoleName, &str)> {
        self.slots.iter().map(|(r, m)| (r, m.as_str()))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Roles that `other` gave to the same member as this agenda does.
    pub fn repeated_roles(&self, other: &Agenda) -> Vec<RoleName> {
        self.slots
            .iter()
            .filter(|(r, m)| other.member_for(r) == Some(m.as_str()))
            .map(|(r, _)| r.clone())
            .collect()
    }
}

impl Serialize for Agenda {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.slots.len()))?;
        for (role, member) in &self.slots {
            let key = role::label(role).unwrap_or(role.as_str());
            map.serialize_entry(key, member)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Agenda {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: HashMap<String, Option<String>> = HashMap::deserialize(deserializer)?;
        let mut agenda = Agenda::new();
        for (key, member) in raw {
            let Some(member) = member else { continue };
            let role = role::resolve(&key).map_err(serde::de::Error::custom)?;
            if agenda.member_for(&role).is_some() {
                return Err(serde::de::Error::custom(AgendaError::DuplicateRole(role)));
            }
            agenda
                .assign(role.as_str(), member)
                .map_err(serde::de::Error::custom)?;
        }
        Ok(agenda)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(raw: &str) -> RoleName {
        role::resolve(raw).unwrap()
    }

    #[test]
    fn test_assign_keeps_agenda_order() {
        let mut agenda = Agenda::new();
        agenda.assign("timer", "Dan").unwrap();
        agenda.assign("Speaker 2", "Carol").unwrap();
        agenda.assign("toastmaster", "Alice").unwrap();

        let roles: Vec<&str> = agenda.iter().map(|(r, _)| r.as_str()).collect();
        assert_eq!(roles, vec!["toastmaster", "speaker2", "timer"]);
    }

    #[test]
    fn test_assign_replaces_existing_slot() {
        let mut agenda = Agenda::new();
        agenda.assign("speaker", "Alice").unwrap();
        agenda.assign("speaker 1", "Bob").unwrap();

        assert_eq!(agenda.len(), 1);
        assert_eq!(agenda.member_for(&role("speaker1")), Some("Bob"));
    }

    #[test]
    fn test_assign_unknown_role_fails() {
        let mut agenda = Agenda::new();
        let err = agenda.assign("keynote", "Alice").unwrap_err();
        assert!(matches!(err, AgendaError::UnknownRole(_)));
        assert!(agenda.is_empty());
    }

    #[test]
    fn test_speakers_collects_all_speaker_slots() {
        let mut agenda = Agenda::new();
        agenda.assign("speaker1", "Alice").unwrap();
        agenda.assign("speaker2", "Bob").unwrap();
        agenda.assign("evaluator1", "Carol").unwrap();

        assert_eq!(agenda.speakers(), vec!["Alice", "Bob"]);
        assert_eq!(agenda.members(), vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_repeated_roles_ignores_unset_slots() {
        let mut previous = Agenda::new();
        previous.assign("toastmaster", "Alice").unwrap();
        previous.assign("timer", "Bob").unwrap();

        let mut next = Agenda::new();
        next.assign("toastmaster", "Alice").unwrap();
        next.assign("timer", "Carol").unwrap();
        next.assign("grammarian", "Bob").unwrap();

        assert_eq!(next.repeated_roles(&previous), vec![role("toastmaster")]);
    }

    #[test]
    fn test_yaml_uses_labels() {
        let mut agenda = Agenda::new();
        agenda.assign("ahcounter", "Bob").unwrap();
        agenda.assign("speaker1", "Alice").unwrap();

        let yaml = serde_yaml::to_string(&agenda).unwrap();
        let speaker = yaml.find("speaker 1: Alice").unwrap();
        let ah_counter = yaml.find("ah counter: Bob").unwrap();
        assert!(speaker < ah_counter);
        assert_eq!(serde_yaml::from_str::<Agenda>(&yaml).unwrap(), agenda);
    }

    #[test]
    fn test_yaml_accepts_any_surface_form_and_skips_null() {
        let yaml = "Toastmaster: Alice\nspeaker: Bob\ngrammarian:\n";
        let agenda: Agenda = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(agenda.len(), 2);
        assert_eq!(agenda.member_for(&role("toastmaster")), Some("Alice"));
        assert_eq!(agenda.member_for(&role("speaker1")), Some("Bob"));
    }

    #[test]
    fn test_yaml_keeps_blank_member() {
        let mut agenda = Agenda::new();
        agenda.assign("toastmaster", "").unwrap();

        let yaml = serde_yaml::to_string(&agenda).unwrap();
        let loaded: Agenda = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(loaded, agenda);
        assert_eq!(loaded.member_for(&role("toastmaster")), Some(""));
    }

    #[test]
    fn test_yaml_rejects_keys_for_the_same_role() {
        for _ in 0..50 {
            let result: Result<Agenda, _> = serde_yaml::from_str("speaker: Alice\nspeaker 1: Bob\n");
            let err = result.unwrap_err().to_string();
            assert!(err.contains("speaker1"), "{err}");
        }
    }

    #[test]
    fn test_yaml_rejects_unknown_role() {
        let result: Result<Agenda, _> = serde_yaml::from_str("keynote: Alice\n");
        assert!(result.is_err());
    }
}
