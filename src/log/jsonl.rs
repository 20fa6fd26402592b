//! JSONL (JSON Lines) audit log of draws
//!
//! Provides append-only logging of draw records to `.giftcycle/draws.jsonl`.
//! Records hold the seed and counters so an operator can reproduce a draw
//! from the participant file if a notification is lost. Pairings are never
//! written.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

/// One draw as recorded in the audit log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrawRecord {
    /// When the draw completed
    pub timestamp: DateTime<Utc>,
    /// Seed that reproduces the draw
    pub seed: u64,
    /// Walks consumed by the generator
    pub attempts: u32,
    /// Number of participants in the roster
    pub participants: usize,
    /// True when messages were printed instead of sent
    pub dry_run: bool,
    /// Notifications delivered
    pub delivered: usize,
    /// Givers whose notification failed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<String>,
}

/// JSONL logger for draw history
pub struct JsonlLogger {
    log_path: PathBuf,
}

impl JsonlLogger {
    /// Create a logger writing to `log_dir/draws.jsonl`, creating `log_dir` if needed
    pub fn new<P: AsRef<Path>>(log_dir: P) -> Result<Self> {
        let log_dir = log_dir.as_ref();

        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        Ok(Self {
            log_path: log_dir.join("draws.jsonl"),
        })
    }

    /// Append a draw record to the log
    pub fn append(&self, record: &DrawRecord) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open log file: {}", self.log_path.display()))?;

        let json = serde_json::to_string(record).context("Failed to serialize draw record")?;
        writeln!(file, "{json}").context("Failed to write to log file")?;

        Ok(())
    }

    /// Read all draw records, oldest first. A missing log reads as empty.
    pub fn read_all(&self) -> Result<Vec<DrawRecord>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.log_path)
            .with_context(|| format!("Failed to read log file: {}", self.log_path.display()))?;

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(line_num, line)| {
                serde_json::from_str(line)
                    .with_context(|| format!("Failed to parse line {} as JSON", line_num + 1))
            })
            .collect()
    }

    /// Get the path to the log file
    #[must_use]
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}
