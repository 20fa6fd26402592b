//! Up-front infeasibility detection
//!
//! A single cycle needs every participant to have at least one legal
//! receiver and at least one legal giver. When either side is empty no
//! amount of retrying can succeed, so the draw fails before walking.

use crate::draw::roster::Roster;

/// A structural reason no cycle exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Obstruction {
    /// Participant cannot give to anyone
    NoReceiver(String),
    /// Nobody can give to this participant
    NoGiver(String),
}

impl std::fmt::Display for Obstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoReceiver(id) => {
                write!(f, "'{id}' excludes every other participant")
            }
            Self::NoGiver(id) => {
                write!(f, "every other participant excludes '{id}'")
            }
        }
    }
}

/// Find every structural obstruction, in input order (receivers side first per participant)
#[must_use]
pub fn obstructions(roster: &Roster) -> Vec<Obstruction> {
    let mut found = Vec::new();
    for id in roster.ids() {
        if roster.legal_receivers(id).is_empty() {
            found.push(Obstruction::NoReceiver(id.to_string()));
        }
        if roster.legal_givers(id).is_empty() {
            found.push(Obstruction::NoGiver(id.to_string()));
        }
    }
    found
}

/// First obstruction found, if any
#[must_use]
pub fn check(roster: &Roster) -> Option<Obstruction> {
    obstructions(roster).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::make_roster;

    #[test]
    fn test_no_exclusions_is_feasible() {
        let roster = make_roster(&["A", "B", "C"], &[]);
        assert!(check(&roster).is_none());
    }

    #[test]
    fn test_participant_excluding_everyone() {
        let roster = make_roster(&["A", "B", "C"], &[("A", &["B", "C"])]);
        assert_eq!(check(&roster), Some(Obstruction::NoReceiver("A".to_string())));
    }

    #[test]
    fn test_self_exclusion_does_not_count_as_extra_block() {
        // A excludes itself and B, C is still open
        let roster = make_roster(&["A", "B", "C"], &[("A", &["A", "B"])]);
        assert!(check(&roster).is_none());
    }

    #[test]
    fn test_participant_nobody_can_give_to() {
        let roster = make_roster(&["A", "B", "C"], &[("B", &["A"]), ("C", &["A"])]);
        assert_eq!(check(&roster), Some(Obstruction::NoGiver("A".to_string())));
    }

    #[test]
    fn test_two_participants_one_way_exclusion() {
        let roster = make_roster(&["A", "B"], &[("A", &["B"])]);
        let found = obstructions(&roster);
        assert_eq!(
            found,
            vec![
                Obstruction::NoReceiver("A".to_string()),
                Obstruction::NoGiver("B".to_string()),
            ]
        );
    }

    #[test]
    fn test_obstruction_display() {
        assert_eq!(
            Obstruction::NoReceiver("A".to_string()).to_string(),
            "'A' excludes every other participant"
        );
        assert_eq!(
            Obstruction::NoGiver("B".to_string()).to_string(),
            "every other participant excludes 'B'"
        );
    }
}
