//! Message delivery
//!
//! Either prints messages (dry run) or pipes them into a
//! sendmail-compatible command as a subprocess.

use std::process::Stdio;

use anyhow::{bail, Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;

use crate::config::MailerConfig;
use crate::notify::message::Message;
use crate::notify::template::{command_vars, expand_template};

/// Environment variable carrying the relay password to the mail command
pub const PASSWORD_ENV: &str = "GIFTCYCLE_SMTP_PASSWORD";

/// How messages leave the process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    /// Print each rendered message to stdout instead of sending
    DryRun,
    /// Pipe each rendered message into an external command
    Command {
        /// Program to run
        program: String,
        /// Arguments with placeholders already expanded
        args: Vec<String>,
        /// Exported to the child as `GIFTCYCLE_SMTP_PASSWORD`
        password: Option<String>,
    },
}

impl Transport {
    /// Build the mail command transport from configuration
    #[must_use]
    pub fn from_config(mailer: &MailerConfig) -> Self {
        let vars = command_vars(mailer);
        Self::Command {
            program: mailer.command.clone(),
            args: mailer
                .args
                .iter()
                .map(|arg| expand_template(arg, &vars))
                .collect(),
            password: mailer.password.clone(),
        }
    }

    /// True when nothing is actually sent
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        matches!(self, Self::DryRun)
    }

    /// Deliver one message
    pub async fn deliver(&self, message: &Message) -> Result<()> {
        match self {
            Self::DryRun => {
                println!("{}", message.render().replace("\r\n", "\n"));
                Ok(())
            }
            Self::Command {
                program,
                args,
                password,
            } => pipe_to_command(program, args, password.as_deref(), &message.render()).await,
        }
    }
}

/// Run `program`, write `input` to its stdin, and fail on a non-zero exit.
async fn pipe_to_command(
    program: &str,
    args: &[String],
    password: Option<&str>,
    input: &str,
) -> Result<()> {
    let mut cmd = TokioCommand::new(program);
    cmd.args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());
    if let Some(password) = password {
        cmd.env(PASSWORD_ENV, password);
    }

    let mut child = cmd
        .spawn()
        .with_context(|| format!("Failed to spawn mail command '{program}'"))?;

    let mut stdin = child.stdin.take().context("Failed to open mail command stdin")?;
    stdin
        .write_all(input.as_bytes())
        .await
        .context("Failed to write message to mail command")?;
    // Close stdin so the command sees end of message
    drop(stdin);

    let output = child
        .wait_with_output()
        .await
        .context("Failed waiting for mail command")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let code = output
            .status
            .code()
            .map_or_else(|| "unknown".to_string(), |c| c.to_string());
        bail!(
            "Mail command '{program}' exited with code {code}: {}",
            stderr.trim()
        );
    }

    Ok(())
}
