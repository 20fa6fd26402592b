//! Mailer configuration parser
//!
//! Parses `mailer.toml` into notifier settings. Like the participant file,
//! a sibling `mailer.local.toml` takes precedence when present so
//! credentials never need to be committed.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::draw::address_problem;

/// Return the `.local` sibling of `path` if it exists, otherwise `path`.
///
/// `participants.json` resolves to `participants.local.json`,
/// `mailer.toml` to `mailer.local.toml`.
#[must_use]
pub fn resolve_local_override(path: &Path) -> PathBuf {
    let local = local_sibling(path);
    if local.is_file() {
        local
    } else {
        path.to_path_buf()
    }
}

fn local_sibling(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map_or_else(String::new, |s| s.to_string_lossy().to_string());
    let name = match path.extension() {
        Some(ext) => format!("{stem}.local.{}", ext.to_string_lossy()),
        None => format!("{stem}.local"),
    };
    path.with_file_name(name)
}

/// Outgoing mail settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MailerConfig {
    /// `From` address of every notification
    #[serde(default = "default_sender")]
    pub sender: String,
    /// Mail relay host, exposed to `args` as `{{server}}`
    #[serde(default)]
    pub server: String,
    /// Mail relay port, exposed to `args` as `{{port}}`
    #[serde(default = "default_port")]
    pub port: u16,
    /// Relay login, exposed to `args` as `{{username}}`
    #[serde(default)]
    pub username: String,
    /// Relay password, handed to the mail command through the environment only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Sendmail-compatible command that reads a message on stdin
    #[serde(default = "default_command")]
    pub command: String,
    /// Arguments for `command`
    #[serde(default = "default_args")]
    pub args: Vec<String>,
}

fn default_sender() -> String {
    "santa@example.com".to_string()
}

const fn default_port() -> u16 {
    587
}

fn default_command() -> String {
    "sendmail".to_string()
}

fn default_args() -> Vec<String> {
    vec!["-t".to_string(), "-i".to_string()]
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            sender: default_sender(),
            server: String::new(),
            port: default_port(),
            username: String::new(),
            password: None,
            command: default_command(),
            args: default_args(),
        }
    }
}

/// Notification text templates
///
/// Placeholders: `{{giver}}`, `{{receiver}}`, `{{giver_address}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageConfig {
    /// Subject line template
    #[serde(default = "default_subject")]
    pub subject: String,
    /// Body template
    #[serde(default = "default_body")]
    pub body: String,
}

fn default_subject() -> String {
    "Gift exchange draw".to_string()
}

fn default_body() -> String {
    "{{giver}}!\nThe person you drew for the gift exchange is:\n{{receiver}}".to_string()
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            subject: default_subject(),
            body: default_body(),
        }
    }
}

/// Top-level notifier configuration parsed from mailer.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotifierConfig {
    /// Transport settings
    #[serde(default)]
    pub mailer: MailerConfig,
    /// Message templates
    #[serde(default)]
    pub message: MessageConfig,
}

impl NotifierConfig {
    /// Parse a mailer.toml file from a path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Load from `path` or its `.local` override.
    ///
    /// A missing file yields the defaults only when `allow_missing` is set.
    pub fn load<P: AsRef<Path>>(path: P, allow_missing: bool) -> Result<Self> {
        let resolved = resolve_local_override(path.as_ref());
        if !resolved.exists() {
            if allow_missing {
                tracing::debug!(path = %resolved.display(), "No mailer config, using defaults");
                return Ok(Self::default());
            }
            bail!("Mailer config not found: {}", resolved.display());
        }
        tracing::info!(path = %resolved.display(), "Loading mailer config");
        Self::from_path(&resolved)
    }

    /// Parse mailer.toml content from a string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse mailer.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        let mailer = &self.mailer;

        if let Some(reason) = address_problem(&mailer.sender) {
            bail!("Invalid sender {:?}: {reason}", mailer.sender);
        }

        if mailer.command.trim().is_empty() {
            bail!("Mailer command cannot be empty");
        }

        if mailer.port == 0 {
            bail!("Mailer port cannot be 0");
        }

        if self.message.subject.trim().is_empty() {
            bail!("Message subject cannot be empty");
        }

        if !self.message.body.contains("{{receiver}}") {
            bail!("Message body must contain the {{{{receiver}}}} placeholder");
        }

        Ok(())
    }
}
