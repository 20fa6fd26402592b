//! Giver to receiver mapping produced by a draw

use std::collections::{BTreeMap, HashSet};

use crate::draw::error::{DrawError, DrawResult};
use crate::draw::roster::Roster;

/// Mapping from giver identifier to receiver identifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    edges: BTreeMap<String, String>,
}

impl Assignment {
    /// Create an empty assignment
    #[must_use]
    pub const fn new() -> Self {
        Self {
            edges: BTreeMap::new(),
        }
    }

    /// Record `giver -> receiver`, replacing any previous receiver for `giver`
    pub fn insert(&mut self, giver: &str, receiver: &str) {
        self.edges.insert(giver.to_string(), receiver.to_string());
    }

    /// Receiver drawn by `giver`
    #[must_use]
    pub fn receiver_of(&self, giver: &str) -> Option<&str> {
        self.edges.get(giver).map(String::as_str)
    }

    /// Number of edges
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True when no edge has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Edges ordered by giver identifier
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.edges.iter().map(|(g, r)| (g.as_str(), r.as_str()))
    }

    /// Follow the mapping from `start` until it returns to `start`.
    ///
    /// Stops early on a missing edge or a repeated node other than `start`,
    /// so the result is always finite.
    #[must_use]
    pub fn cycle_from<'a>(&'a self, start: &'a str) -> Vec<&'a str> {
        let mut walk = Vec::new();
        let mut seen = HashSet::new();
        let mut current = start;
        while seen.insert(current) {
            walk.push(current);
            match self.receiver_of(current) {
                Some(next) if next == start => break,
                Some(next) => current = next,
                None => break,
            }
        }
        walk
    }

    /// Check the assignment against `roster`: a bijection with no self or
    /// excluded edges whose edges form one cycle through everyone.
    pub fn verify(&self, roster: &Roster) -> DrawResult<()> {
        if self.len() != roster.len() {
            return Err(invalid(format!(
                "assignment has {} giver(s) for {} participant(s)",
                self.len(),
                roster.len()
            )));
        }

        let mut receivers = HashSet::new();
        for (giver, receiver) in self.iter() {
            if !roster.contains(giver) {
                return Err(invalid(format!("unknown giver '{giver}'")));
            }
            if !roster.contains(receiver) {
                return Err(invalid(format!("unknown receiver '{receiver}'")));
            }
            if giver == receiver {
                return Err(invalid(format!("'{giver}' was assigned to themselves")));
            }
            if roster.excludes(giver, receiver) {
                return Err(invalid(format!(
                    "'{giver}' was assigned excluded receiver '{receiver}'"
                )));
            }
            if !receivers.insert(receiver) {
                return Err(invalid(format!("'{receiver}' receives more than one gift")));
            }
        }

        let Some(start) = roster.ids().next() else {
            return Err(invalid("empty roster"));
        };
        let walk = self.cycle_from(start);
        if walk.len() != roster.len() {
            return Err(invalid(format!(
                "assignment splits into sub-cycles: the cycle through '{start}' covers {} of {} participant(s)",
                walk.len(),
                roster.len()
            )));
        }

        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> DrawError {
    DrawError::InvalidAssignment(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::make_roster;

    fn assignment(edges: &[(&str, &str)]) -> Assignment {
        let mut a = Assignment::new();
        for (g, r) in edges {
            a.insert(g, r);
        }
        a
    }

    #[test]
    fn test_cycle_from_full_loop() {
        let a = assignment(&[("A", "C"), ("C", "B"), ("B", "A")]);
        assert_eq!(a.cycle_from("A"), vec!["A", "C", "B"]);
        assert_eq!(a.cycle_from("B"), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_cycle_from_stops_on_missing_edge() {
        let a = assignment(&[("A", "B")]);
        assert_eq!(a.cycle_from("A"), vec!["A", "B"]);
    }

    #[test]
    fn test_verify_accepts_single_cycle() {
        let roster = make_roster(&["A", "B", "C"], &[]);
        let a = assignment(&[("A", "C"), ("C", "B"), ("B", "A")]);
        assert!(a.verify(&roster).is_ok());
    }

    #[test]
    fn test_verify_rejects_sub_cycles() {
        let roster = make_roster(&["A", "B", "C", "D"], &[]);
        let a = assignment(&[("A", "B"), ("B", "A"), ("C", "D"), ("D", "C")]);
        let err = a.verify(&roster).unwrap_err();
        assert!(matches!(err, DrawError::InvalidAssignment(_)));
        assert!(err.to_string().contains("sub-cycles"), "got: {err}");
    }

    #[test]
    fn test_verify_rejects_self_pick() {
        let roster = make_roster(&["A", "B"], &[]);
        let a = assignment(&[("A", "A"), ("B", "B")]);
        let err = a.verify(&roster).unwrap_err();
        assert!(err.to_string().contains("themselves"), "got: {err}");
    }

    #[test]
    fn test_verify_rejects_excluded_edge() {
        let roster = make_roster(&["A", "B", "C"], &[("A", &["B"])]);
        let a = assignment(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let err = a.verify(&roster).unwrap_err();
        assert!(err.to_string().contains("excluded"), "got: {err}");
    }

    #[test]
    fn test_verify_rejects_double_receiver() {
        let roster = make_roster(&["A", "B", "C"], &[]);
        let a = assignment(&[("A", "B"), ("B", "C"), ("C", "B")]);
        let err = a.verify(&roster).unwrap_err();
        assert!(err.to_string().contains("more than one"), "got: {err}");
    }

    #[test]
    fn test_verify_rejects_missing_giver() {
        let roster = make_roster(&["A", "B", "C"], &[]);
        let a = assignment(&[("A", "B"), ("B", "A")]);
        assert!(a.verify(&roster).is_err());
    }
}
