//! Giftcycle - gift exchange draws
//!
//! CLI entry point: loads the roster, draws the cycle, notifies participants.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use giftcycle::cli::{render_delivery_report, render_diagnostic_report, render_draw_summary};
use giftcycle::config::{resolve_local_override, NotifierConfig};
use giftcycle::doctor::diagnose;
use giftcycle::draw::{fresh_seed, CycleAssigner, Draw, Roster, DEFAULT_MAX_ATTEMPTS};
use giftcycle::log::{init_tracing, DrawRecord, JsonlLogger};
use giftcycle::notify::{DeliveryReport, Notifier, Transport};

/// Gift exchange draw
///
/// Assigns every participant one receiver so that the whole group forms a
/// single cycle, never pairing excluded participants, and tells each giver
/// whom they drew.
#[derive(Parser, Debug)]
#[command(name = "giftcycle", version, about)]
struct Cli {
    /// Path to the participants file (a `.local` sibling takes precedence)
    #[arg(long, global = true, default_value = "participants.json")]
    participants: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw the cycle and notify participants (default)
    Draw(DrawArgs),
    /// Check the participants file for problems without drawing
    Doctor,
    /// Validate the mailer configuration and show the resolved mail command
    CheckConfig {
        /// Path to the mailer configuration (a `.local` sibling takes precedence)
        #[arg(long, default_value = "mailer.toml")]
        mailer: PathBuf,
    },
}

#[derive(Args, Debug)]
struct DrawArgs {
    /// Path to the mailer configuration (a `.local` sibling takes precedence)
    #[arg(long, default_value = "mailer.toml")]
    mailer: PathBuf,

    /// Seed to reproduce a previous draw (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Walks to attempt before declaring the exclusions infeasible
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,

    /// Actually send notifications (default prints them)
    #[arg(long)]
    send: bool,

    /// Print every pairing to the terminal
    #[arg(long)]
    reveal: bool,

    /// Directory for the draw audit log
    #[arg(long, default_value = ".giftcycle")]
    log_dir: PathBuf,
}

impl Default for DrawArgs {
    fn default() -> Self {
        Self {
            mailer: PathBuf::from("mailer.toml"),
            seed: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            send: false,
            reveal: false,
            log_dir: PathBuf::from(".giftcycle"),
        }
    }
}

/// Build the audit record for a finished draw. Pairings are not included.
fn build_record(draw: &Draw, roster: &Roster, report: &DeliveryReport, dry_run: bool) -> DrawRecord {
    DrawRecord {
        timestamp: chrono::Utc::now(),
        seed: draw.seed,
        attempts: draw.attempts,
        participants: roster.len(),
        dry_run,
        delivered: report.delivered.len(),
        failed: report.failed.iter().map(|f| f.giver.clone()).collect(),
    }
}

async fn run_draw(participants: &Path, args: &DrawArgs) -> Result<()> {
    let roster = Roster::load(participants).context("Failed to load participants")?;
    let config = NotifierConfig::load(&args.mailer, !args.send)
        .with_context(|| format!("Failed to load mailer config from '{}'", args.mailer.display()))?;

    let seed = args.seed.unwrap_or_else(fresh_seed);
    // Printed before drawing so the seed survives any later failure
    println!("random seed: {seed}");

    let draw = CycleAssigner::new(args.max_attempts)
        .generate(&roster, seed)
        .context("Failed to draw a gift cycle")?;
    draw.assignment
        .verify(&roster)
        .with_context(|| format!("Draw with seed {seed} failed verification"))?;

    render_draw_summary(&draw, &roster, args.reveal);

    let notifier = if args.send {
        Notifier::sending(config)
    } else {
        Notifier::dry_run(config)
    };
    let dry_run = notifier.transport().is_dry_run();
    let report = notifier.notify_all(&roster, &draw.assignment).await;
    render_delivery_report(&report, dry_run);

    let logger = JsonlLogger::new(&args.log_dir).context("Failed to initialize JSONL logger")?;
    logger
        .append(&build_record(&draw, &roster, &report, dry_run))
        .context("Failed to write to JSONL log")?;

    if !report.all_delivered() {
        bail!(
            "{} notification(s) failed; re-run with --seed {seed} to reproduce this draw",
            report.failed.len()
        );
    }

    Ok(())
}

fn run_doctor(participants: &Path) -> Result<bool> {
    let roster = Roster::load(participants).context("Failed to load participants")?;
    let report = diagnose(&roster);
    render_diagnostic_report(&report);
    Ok(report.error_count() == 0)
}

fn run_check_config(mailer: &Path) -> Result<()> {
    let config = NotifierConfig::load(mailer, false)?;
    eprintln!("Using {}", resolve_local_override(mailer).display());
    if let Transport::Command {
        program,
        args,
        password,
    } = Transport::from_config(&config.mailer)
    {
        eprintln!("Mail command: {program} {}", args.join(" "));
        eprintln!(
            "Password: {}",
            if password.is_some() { "set" } else { "not set" }
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        None => run_draw(&cli.participants, &DrawArgs::default()).await,
        Some(Command::Draw(args)) => run_draw(&cli.participants, &args).await,
        Some(Command::Doctor) => {
            if !run_doctor(&cli.participants)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::CheckConfig { mailer }) => run_check_config(&mailer),
    }
}
