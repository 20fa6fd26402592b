//! Participant roster
//!
//! Parses `participants.json` into a validated participant list and
//! exclusion relation. A developer-local `participants.local.json` takes
//! precedence when present so real names and addresses stay out of
//! version control.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::config::resolve_local_override;
use crate::draw::error::{DrawError, DrawResult};

/// A participant: unique identifier plus contact address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Unique identifier, compared by exact string equality
    pub id: String,
    /// Where the notification is delivered
    pub address: String,
}

impl Participant {
    /// Create a participant
    #[must_use]
    pub fn new(id: &str, address: &str) -> Self {
        Self {
            id: id.to_string(),
            address: address.to_string(),
        }
    }
}

/// Describe why `address` cannot be written into a mail header, if it can't.
///
/// Rejects empty addresses and any control character; a CR or LF would
/// start a new header line.
#[must_use]
pub fn address_problem(address: &str) -> Option<&'static str> {
    if address.trim().is_empty() {
        Some("empty")
    } else if address.chars().any(char::is_control) {
        Some("contains a control character")
    } else if !address.contains('@') {
        Some("missing '@'")
    } else {
        None
    }
}

/// On-disk roster schema
///
/// ```json
/// {"participants": [["Alice", "alice@example.com"]], "exclusions": {"Alice": ["Bob"]}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RosterFile {
    /// Ordered `[id, address]` pairs
    pub participants: Vec<(String, String)>,
    /// Identifier to the identifiers it may not give to
    #[serde(default)]
    pub exclusions: BTreeMap<String, Vec<String>>,
}

/// Validated participant list and exclusion relation, immutable for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    participants: Vec<Participant>,
    exclusions: BTreeMap<String, BTreeSet<String>>,
}

impl Roster {
    /// Build a roster, rejecting malformed input.
    ///
    /// Exclusions are kept exactly as given: an exclusion of B by A does not
    /// imply the reverse.
    pub fn new(
        participants: Vec<Participant>,
        exclusions: BTreeMap<String, Vec<String>>,
    ) -> DrawResult<Self> {
        if participants.len() < 2 {
            return Err(DrawError::TooFewParticipants(participants.len()));
        }

        let mut seen = HashSet::new();
        for (i, p) in participants.iter().enumerate() {
            if p.id.trim().is_empty() {
                return Err(DrawError::EmptyIdentifier { position: i + 1 });
            }
            if !seen.insert(p.id.as_str()) {
                return Err(DrawError::DuplicateIdentifier(p.id.clone()));
            }
            if let Some(reason) = address_problem(&p.address) {
                return Err(DrawError::InvalidAddress {
                    id: p.id.clone(),
                    reason,
                });
            }
        }

        let mut relation = BTreeMap::new();
        for (giver, excluded) in exclusions {
            if !seen.contains(giver.as_str()) {
                return Err(DrawError::UnknownIdentifier {
                    context: "key".to_string(),
                    id: giver,
                });
            }
            for id in &excluded {
                if !seen.contains(id.as_str()) {
                    return Err(DrawError::UnknownIdentifier {
                        context: format!("of '{giver}'"),
                        id: id.clone(),
                    });
                }
            }
            relation.insert(giver, excluded.into_iter().collect());
        }

        Ok(Self {
            participants,
            exclusions: relation,
        })
    }

    /// Build a roster from the parsed file schema
    pub fn from_file(file: RosterFile) -> DrawResult<Self> {
        let participants = file
            .participants
            .into_iter()
            .map(|(id, address)| Participant { id, address })
            .collect();
        Self::new(participants, file.exclusions)
    }

    /// Parse roster JSON content from a string
    pub fn parse(content: &str, path: &Path) -> DrawResult<Self> {
        let file: RosterFile =
            serde_json::from_str(content).map_err(|source| DrawError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_file(file)
    }

    /// Read and validate exactly the given file
    pub fn from_path<P: AsRef<Path>>(path: P) -> DrawResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DrawError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Load the roster, preferring the `.local` sibling of `path` if it exists
    pub fn load<P: AsRef<Path>>(path: P) -> DrawResult<Self> {
        let resolved = resolve_local_override(path.as_ref());
        tracing::info!(path = %resolved.display(), "Loading participants");
        Self::from_path(resolved)
    }

    /// Participants in input order
    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Participant identifiers in input order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.participants.iter().map(|p| p.id.as_str())
    }

    /// Number of participants
    #[must_use]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Always false: a valid roster has at least two participants
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Whether `id` is a participant
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.participants.iter().any(|p| p.id == id)
    }

    /// Contact address of a participant
    #[must_use]
    pub fn address_of(&self, id: &str) -> Option<&str> {
        self.participants
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.address.as_str())
    }

    /// Identifiers `giver` may not give to (empty when unlisted)
    #[must_use]
    pub fn exclusions_of(&self, giver: &str) -> Option<&BTreeSet<String>> {
        self.exclusions.get(giver)
    }

    /// Whether the directed edge `giver -> receiver` is forbidden by exclusions
    #[must_use]
    pub fn excludes(&self, giver: &str, receiver: &str) -> bool {
        self.exclusions
            .get(giver)
            .is_some_and(|set| set.contains(receiver))
    }

    /// Whether `giver -> receiver` may appear in a cycle
    #[must_use]
    pub fn allows(&self, giver: &str, receiver: &str) -> bool {
        giver != receiver && !self.excludes(giver, receiver)
    }

    /// Participants `giver` could legally give to, in input order
    #[must_use]
    pub fn legal_receivers(&self, giver: &str) -> Vec<&str> {
        self.ids().filter(|r| self.allows(giver, r)).collect()
    }

    /// Participants that could legally give to `receiver`, in input order
    #[must_use]
    pub fn legal_givers(&self, receiver: &str) -> Vec<&str> {
        self.ids().filter(|g| self.allows(g, receiver)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{make_roster, write_file};
    use tempfile::TempDir;

    const VALID_ROSTER: &str = r#"{
        "participants": [["A", "a@example.com"], ["B", "b@example.com"], ["C", "c@example.com"]],
        "exclusions": {"A": ["B"], "B": ["A"], "C": []}
    }"#;

    #[test]
    fn test_parse_valid_roster() {
        let roster = Roster::parse(VALID_ROSTER, Path::new("participants.json")).unwrap();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.ids().collect::<Vec<_>>(), vec!["A", "B", "C"]);
        assert_eq!(roster.address_of("B"), Some("b@example.com"));
        assert!(roster.excludes("A", "B"));
        assert!(!roster.excludes("C", "A"));
    }

    #[test]
    fn test_exclusions_optional() {
        let json = r#"{"participants": [["A", "a@x"], ["B", "b@x"]]}"#;
        let roster = Roster::parse(json, Path::new("p.json")).unwrap();
        assert!(roster.exclusions_of("A").is_none());
        assert_eq!(roster.legal_receivers("A"), vec!["B"]);
    }

    #[test]
    fn test_exclusions_not_symmetrized() {
        let roster = make_roster(&["A", "B", "C"], &[("A", &["B"])]);
        assert!(roster.excludes("A", "B"));
        assert!(!roster.excludes("B", "A"));
        assert!(roster.allows("B", "A"));
    }

    #[test]
    fn test_self_edge_never_allowed() {
        let roster = make_roster(&["A", "B"], &[]);
        assert!(!roster.allows("A", "A"));
        assert!(roster.allows("A", "B"));
    }

    #[test]
    fn test_legal_givers_and_receivers() {
        let roster = make_roster(&["A", "B", "C", "D"], &[("A", &["B"]), ("C", &["B"])]);
        assert_eq!(roster.legal_receivers("A"), vec!["C", "D"]);
        assert_eq!(roster.legal_givers("B"), vec!["D"]);
    }

    #[test]
    fn test_reject_single_participant() {
        let err = Roster::new(vec![Participant::new("A", "a@x")], BTreeMap::new()).unwrap_err();
        assert!(matches!(err, DrawError::TooFewParticipants(1)));
        assert!(err.is_malformed());
    }

    #[test]
    fn test_reject_empty_roster() {
        let err = Roster::new(vec![], BTreeMap::new()).unwrap_err();
        assert!(matches!(err, DrawError::TooFewParticipants(0)));
    }

    #[test]
    fn test_reject_duplicate_identifier() {
        let err = Roster::new(
            vec![
                Participant::new("A", "a@x"),
                Participant::new("B", "b@x"),
                Participant::new("A", "other@x"),
            ],
            BTreeMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, DrawError::DuplicateIdentifier(ref id) if id == "A"));
    }

    #[test]
    fn test_identifiers_are_case_sensitive() {
        let roster = Roster::new(
            vec![Participant::new("a", "1@x"), Participant::new("A", "2@x")],
            BTreeMap::new(),
        );
        assert!(roster.is_ok());
    }

    #[test]
    fn test_reject_blank_identifier() {
        let err = Roster::new(
            vec![Participant::new("A", "a@x"), Participant::new("  ", "b@x")],
            BTreeMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, DrawError::EmptyIdentifier { position: 2 }));
    }

    #[test]
    fn test_reject_header_injection_in_address() {
        let json = r#"{"participants": [["A", "a@x"], ["B", "b@x\r\nBcc: eve@elsewhere.example"]]}"#;
        let err = Roster::parse(json, Path::new("p.json")).unwrap_err();
        assert!(err.is_malformed());
        assert!(matches!(err, DrawError::InvalidAddress { ref id, .. } if id == "B"));
    }

    #[test]
    fn test_reject_empty_address() {
        let err = Roster::new(
            vec![Participant::new("A", "a@x"), Participant::new("B", " ")],
            BTreeMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, DrawError::InvalidAddress { reason: "empty", .. }));
    }

    #[test]
    fn test_address_problem() {
        assert_eq!(address_problem("alice@example.com"), None);
        assert_eq!(address_problem(""), Some("empty"));
        assert_eq!(address_problem("a@x\nTo: b@y"), Some("contains a control character"));
        assert_eq!(address_problem("a@x\t"), Some("contains a control character"));
        assert_eq!(address_problem("alice"), Some("missing '@'"));
    }

    #[test]
    fn test_reject_unknown_exclusion_key() {
        let mut exclusions = BTreeMap::new();
        exclusions.insert("Z".to_string(), vec![]);
        let err = Roster::new(
            vec![Participant::new("A", "a@x"), Participant::new("B", "b@x")],
            exclusions,
        )
        .unwrap_err();
        assert!(matches!(err, DrawError::UnknownIdentifier { ref id, .. } if id == "Z"));
    }

    #[test]
    fn test_reject_unknown_excluded_identifier() {
        let mut exclusions = BTreeMap::new();
        exclusions.insert("A".to_string(), vec!["Q".to_string()]);
        let err = Roster::new(
            vec![Participant::new("A", "a@x"), Participant::new("B", "b@x")],
            exclusions,
        )
        .unwrap_err();
        assert!(err.to_string().contains("of 'A'"), "got: {err}");
        assert!(err.to_string().contains("'Q'"), "got: {err}");
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = Roster::parse("{not json", Path::new("broken.json")).unwrap_err();
        assert!(matches!(err, DrawError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_from_path_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = Roster::from_path(temp_dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, DrawError::Io { .. }));
    }

    #[test]
    fn test_load_prefers_local_override() {
        let temp_dir = TempDir::new().unwrap();
        let shared = write_file(
            temp_dir.path(),
            "participants.json",
            r#"{"participants": [["Shared1", "s1@x"], ["Shared2", "s2@x"]]}"#,
        );
        write_file(
            temp_dir.path(),
            "participants.local.json",
            r#"{"participants": [["Real1", "r1@x"], ["Real2", "r2@x"], ["Real3", "r3@x"]]}"#,
        );

        let roster = Roster::load(&shared).unwrap();
        assert_eq!(roster.len(), 3);
        assert!(roster.contains("Real1"));
        assert!(!roster.contains("Shared1"));
    }

    #[test]
    fn test_load_without_override_reads_given_file() {
        let temp_dir = TempDir::new().unwrap();
        let shared = write_file(
            temp_dir.path(),
            "participants.json",
            r#"{"participants": [["Shared1", "s1@x"], ["Shared2", "s2@x"]]}"#,
        );

        let roster = Roster::load(&shared).unwrap();
        assert!(roster.contains("Shared1"));
    }
}
