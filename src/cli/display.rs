//! Rich CLI display for draws
//!
//! Renders draw summaries, delivery reports and doctor findings as
//! colored terminal output. All output goes to stderr so stdout carries
//! only the seed line and dry-run messages.

use colored::Colorize;

use crate::doctor::{DiagnosticReport, Severity};
use crate::draw::roster::Roster;
use crate::draw::Draw;
use crate::notify::DeliveryReport;

/// Print the header and summary of a completed draw.
///
/// Pairings are listed only when `reveal` is set.
pub fn render_draw_summary(draw: &Draw, roster: &Roster, reveal: bool) {
    eprintln!("\n{}", "=== Gift cycle draw ===".bold().cyan());
    eprintln!("{}", "─".repeat(50).dimmed());
    eprintln!(
        "  {} {} participant(s) | {} attempt(s)",
        "Draw:".dimmed(),
        roster.len(),
        draw.attempts
    );

    if reveal {
        for line in pairing_lines(draw, roster) {
            eprintln!("  {line}");
        }
    } else {
        eprintln!(
            "  {}",
            "Pairings hidden (use --reveal to print them)".dimmed()
        );
    }
}

/// Lines of `giver(address) -> receiver` following the cycle from the first participant
#[must_use]
pub fn pairing_lines(draw: &Draw, roster: &Roster) -> Vec<String> {
    let Some(first) = roster.ids().next() else {
        return Vec::new();
    };
    draw.assignment
        .cycle_from(first)
        .into_iter()
        .filter_map(|giver| {
            let receiver = draw.assignment.receiver_of(giver)?;
            let address = roster.address_of(giver).unwrap_or("?");
            Some(format!("{giver} ({address}) -> {receiver}"))
        })
        .collect()
}

/// Print the outcome of notifying every participant
pub fn render_delivery_report(report: &DeliveryReport, dry_run: bool) {
    eprintln!("{}", "─".repeat(50).dimmed());

    let verb = if dry_run { "printed" } else { "sent" };
    let status = if report.all_delivered() {
        "COMPLETED".green().bold().to_string()
    } else {
        "INCOMPLETE".red().bold().to_string()
    };
    eprintln!(
        "  {status} {} notification(s) {verb}",
        report.delivered.len()
    );

    for failure in &report.failed {
        eprintln!(
            "  {} {}: {}",
            "✗".red().bold(),
            failure.giver.bold(),
            failure.reason.red()
        );
    }
    eprintln!();
}

/// Print doctor findings grouped by severity
pub fn render_diagnostic_report(report: &DiagnosticReport) {
    if report.is_clean() {
        eprintln!("{} No issues found", "✓".green().bold());
        return;
    }

    for finding in &report.findings {
        let tag = match finding.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Info => "info".blue().bold(),
        };
        eprintln!("{tag}[{}]: {}", finding.code, finding.message);
        if let Some(suggestion) = &finding.suggestion {
            eprintln!("  {} {suggestion}", "help:".dimmed());
        }
    }

    eprintln!(
        "\n{} error(s), {} warning(s), {} info",
        report.error_count(),
        report.warning_count(),
        report.info_count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doctor::diagnose;
    use crate::draw::CycleAssigner;
    use crate::notify::DeliveryFailure;
    use crate::testutil::make_roster;

    #[test]
    fn test_pairing_lines_follow_cycle() {
        let roster = make_roster(&["A", "B", "C"], &[]);
        let draw = CycleAssigner::default().generate(&roster, 5).unwrap();
        let lines = pairing_lines(&draw, &roster);

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("A (a@example.com) -> "));
        // Each line's receiver is the next line's giver
        for pair in lines.windows(2) {
            let receiver = pair[0].rsplit(" -> ").next().unwrap();
            assert!(pair[1].starts_with(receiver));
        }
    }

    #[test]
    fn test_render_draw_summary_no_panic() {
        let roster = make_roster(&["A", "B", "C"], &[]);
        let draw = CycleAssigner::default().generate(&roster, 5).unwrap();
        render_draw_summary(&draw, &roster, false);
        render_draw_summary(&draw, &roster, true);
    }

    #[test]
    fn test_render_delivery_report_no_panic() {
        render_delivery_report(&DeliveryReport::default(), true);
        render_delivery_report(
            &DeliveryReport {
                delivered: vec!["A".to_string()],
                failed: vec![DeliveryFailure {
                    giver: "B".to_string(),
                    reason: "relay refused".to_string(),
                }],
            },
            false,
        );
    }

    #[test]
    fn test_render_diagnostic_report_no_panic() {
        let clean = diagnose(&make_roster(&["A", "B", "C"], &[]));
        render_diagnostic_report(&clean);
        let noisy = diagnose(&make_roster(&["A", "B", "C"], &[("A", &["A", "B", "C"])]));
        render_diagnostic_report(&noisy);
    }
}
