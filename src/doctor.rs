//! Roster doctor: diagnostics for participant data
//!
//! Analyzes a roster's exclusion relation before a draw. Returns a
//! structured report with categories: errors (the draw cannot succeed),
//! warnings (probably a data mistake), info (worth knowing).

use crate::draw::feasibility::{self, Obstruction};
use crate::draw::roster::Roster;

/// Severity level for a diagnostic finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Must fix: no draw is possible
    Error,
    /// Should check: likely unintended
    Warning,
    /// Informational
    Info,
}

/// A single diagnostic finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Severity of the finding
    pub severity: Severity,
    /// Short code for the finding (e.g., "G001")
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Suggested fix (optional)
    pub suggestion: Option<String>,
}

/// Diagnostic report from `giftcycle doctor`
#[derive(Debug, Clone)]
pub struct DiagnosticReport {
    /// All findings, in order of severity (errors first)
    pub findings: Vec<Finding>,
}

impl DiagnosticReport {
    /// Returns true if the report has no findings at all
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Number of findings with the given severity
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    /// Returns the number of errors
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Returns the number of warnings
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Returns the number of info items
    #[must_use]
    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }
}

/// Run all diagnostic checks and return a report.
#[must_use]
pub fn diagnose(roster: &Roster) -> DiagnosticReport {
    let mut findings = Vec::new();

    check_obstructions(roster, &mut findings);
    check_asymmetric_exclusions(roster, &mut findings);
    check_self_exclusions(roster, &mut findings);
    check_forced_pairings(roster, &mut findings);

    // Stable sort keeps roster order within a severity
    findings.sort_by_key(|f| f.severity);

    DiagnosticReport { findings }
}

/// G001/G002: participants with no possible receiver or giver
fn check_obstructions(roster: &Roster, findings: &mut Vec<Finding>) {
    for obstruction in feasibility::obstructions(roster) {
        let (code, id) = match &obstruction {
            Obstruction::NoReceiver(id) => ("G001", id),
            Obstruction::NoGiver(id) => ("G002", id),
        };
        findings.push(Finding {
            severity: Severity::Error,
            code: code.to_string(),
            message: format!("No gift cycle is possible: {obstruction}"),
            suggestion: Some(format!(
                "Remove at least one exclusion involving '{id}' in the participants file"
            )),
        });
    }
}

/// G003: A excludes B but B does not exclude A
fn check_asymmetric_exclusions(roster: &Roster, findings: &mut Vec<Finding>) {
    for giver in roster.ids() {
        let Some(excluded) = roster.exclusions_of(giver) else {
            continue;
        };
        for other in excluded {
            if other != giver && !roster.excludes(other, giver) {
                findings.push(Finding {
                    severity: Severity::Warning,
                    code: "G003".to_string(),
                    message: format!(
                        "'{giver}' excludes '{other}' but '{other}' does not exclude '{giver}'"
                    ),
                    suggestion: Some(format!(
                        "If this is a household, add \"{giver}\" to the exclusions of \"{other}\""
                    )),
                });
            }
        }
    }
}

/// G004: participant lists themselves
fn check_self_exclusions(roster: &Roster, findings: &mut Vec<Finding>) {
    for id in roster.ids() {
        if roster.excludes(id, id) {
            findings.push(Finding {
                severity: Severity::Info,
                code: "G004".to_string(),
                message: format!("'{id}' lists themselves as an exclusion"),
                suggestion: Some(
                    "Nobody is ever assigned to themselves; the entry can be removed".to_string(),
                ),
            });
        }
    }
}

/// G005: exactly one legal receiver, so the pairing is decided in advance
fn check_forced_pairings(roster: &Roster, findings: &mut Vec<Finding>) {
    for id in roster.ids() {
        if let [only] = roster.legal_receivers(id).as_slice() {
            findings.push(Finding {
                severity: Severity::Info,
                code: "G005".to_string(),
                message: format!("'{id}' can only give to '{only}'"),
                suggestion: None,
            });
        }
    }
}
