//! Role registry.
//!
//! Holds the fixed vocabulary of meeting roles, folds surface variants
//! ("Speaker 1", "speaker1", "SPEAKER 1") onto one canonical identifier and
//! classifies roles that come in several numbered slots.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AgendaError;

/// A normalized role identifier (lower-case, no whitespace).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoleName(String);

impl RoleName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for RoleName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Normalizes whatever string it is given; support is not checked here.
impl<'de> Deserialize<'de> for RoleName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|raw| normalize(&raw))
    }
}

impl AsRef<str> for RoleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A supported role: its canonical id and the label used on agendas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSpec {
    pub id: &'static str,
    pub label: &'static str,
}

/// Supported roles in agenda order.
const ROLES: &[RoleSpec] = &[
    RoleSpec { id: "toastmaster", label: "toastmaster" },
    RoleSpec { id: "speaker1", label: "speaker 1" },
    RoleSpec { id: "speaker2", label: "speaker 2" },
    RoleSpec { id: "tabletopicsmaster", label: "tabletopics master" },
    RoleSpec { id: "generalevaluator", label: "general evaluator" },
    RoleSpec { id: "evaluator1", label: "evaluator 1" },
    RoleSpec { id: "evaluator2", label: "evaluator 2" },
    RoleSpec { id: "grammarian", label: "grammarian" },
    RoleSpec { id: "ahcounter", label: "ah counter" },
    RoleSpec { id: "timer", label: "timer" },
];

/// Short names that stand in for the first slot of a numbered role.
const ALIASES: &[(&str, &str)] = &[("speaker", "speaker1"), ("evaluator", "evaluator1")];

/// Lower-case `raw` and drop all whitespace. Never fails.
pub fn normalize(raw: &str) -> RoleName {
    RoleName(
        raw.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect(),
    )
}

/// Normalize `raw` and map it onto a supported role.
pub fn resolve(raw: &str) -> Result<RoleName, AgendaError> {
    let normalized = normalize(raw);
    let id = ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized.as_str())
        .map(|(_, target)| *target)
        .unwrap_or(normalized.as_str());

    ROLES
        .iter()
        .find(|spec| spec.id == id)
        .map(|spec| RoleName(spec.id.to_string()))
        .ok_or_else(|| AgendaError::UnknownRole(raw.to_string()))
}

/// Roles that span several numbered slots and share history between them.
///
/// Only speaker slots are grouped this way; evaluator slots are compared
/// one slot at a time.
pub fn is_multi_slot_category(role: &RoleName) -> bool {
    role.as_str().contains("speaker")
}

/// All supported roles in agenda order.
pub fn supported_roles() -> &'static [RoleSpec] {
    ROLES
}

/// Human label for a canonical role, if it is supported.
pub fn label(role: &RoleName) -> Option<&'static str> {
    spec_of(role).map(|spec| spec.label)
}

/// Position of a canonical role in agenda order.
pub(crate) fn position(role: &RoleName) -> Option<usize> {
    ROLES.iter().position(|spec| spec.id == role.as_str())
}

fn spec_of(role: &RoleName) -> Option<&'static RoleSpec> {
    ROLES.iter().find(|spec| spec.id == role.as_str())
}

/// Every accepted role spelling, aliases first, for error messages.
pub fn supported_roles_list() -> String {
    ALIASES
        .iter()
        .map(|(alias, _)| *alias)
        .chain(ROLES.iter().map(|spec| spec.label))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_case_and_whitespace() {
        assert_eq!(normalize("  Table Topics\tMaster ").as_str(), "tabletopicsmaster");
        assert_eq!(normalize("").as_str(), "");
    }

    #[test]
    fn test_role_name_serde_normalizes() {
        let roles: Vec<RoleName> = serde_yaml::from_str("- Speaker 1\n- AH COUNTER\n- keynote\n").unwrap();
        let ids: Vec<&str> = roles.iter().map(RoleName::as_str).collect();
        assert_eq!(ids, vec!["speaker1", "ahcounter", "keynote"]);

        let yaml = serde_yaml::to_string(&resolve("Table Topics Master").unwrap()).unwrap();
        assert_eq!(yaml.trim(), "tabletopicsmaster");
    }

    #[test]
    fn test_resolve_surface_forms_are_equivalent() {
        let a = resolve("Speaker 1").unwrap();
        let b = resolve("speaker1").unwrap();
        let c = resolve("SPEAKER1").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.as_str(), "speaker1");
    }

    #[test]
    fn test_resolve_aliases() {
        assert_eq!(resolve("Speaker").unwrap().as_str(), "speaker1");
        assert_eq!(resolve("evaluator").unwrap().as_str(), "evaluator1");
        assert_eq!(resolve("Ah Counter").unwrap().as_str(), "ahcounter");
    }

    #[test]
    fn test_resolve_unknown_role_lists_supported() {
        let err = resolve("keynote").unwrap_err();
        assert!(matches!(err, AgendaError::UnknownRole(ref r) if r == "keynote"));

        let message = err.to_string();
        assert!(message.starts_with(
            "Unknown role 'keynote'. Supported roles: speaker, evaluator, toastmaster, speaker 1,"
        ));
        for spec in supported_roles() {
            assert!(message.contains(spec.label), "missing {}", spec.label);
        }
        assert!(message.contains("speaker,"));
        assert!(message.contains("evaluator,"));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        for spec in supported_roles() {
            let role = resolve(spec.label).unwrap();
            assert_eq!(resolve(role.as_str()).unwrap(), role);
            assert_eq!(label(&role), Some(spec.label));
        }
    }

    #[test]
    fn test_multi_slot_category_only_covers_speakers() {
        assert!(is_multi_slot_category(&resolve("speaker 1").unwrap()));
        assert!(is_multi_slot_category(&resolve("speaker2").unwrap()));
        assert!(!is_multi_slot_category(&resolve("evaluator 1").unwrap()));
        assert!(!is_multi_slot_category(&resolve("evaluator2").unwrap()));
        assert!(!is_multi_slot_category(&resolve("toastmaster").unwrap()));
    }

    #[test]
    fn test_position_follows_agenda_order() {
        assert_eq!(position(&resolve("toastmaster").unwrap()), Some(0));
        assert_eq!(position(&resolve("timer").unwrap()), Some(ROLES.len() - 1));
        assert_eq!(position(&normalize("keynote")), None);
    }
}
