//! Error types for the draw
//!
//! Separates input problems (`MalformedInput`-class variants) from draws
//! that cannot be completed under the given exclusions (`Infeasible`).

use std::path::PathBuf;

use thiserror::Error;

/// Result type for draw operations
pub type DrawResult<T> = Result<T, DrawError>;

/// Errors produced while loading a roster or drawing a cycle
#[derive(Error, Debug)]
pub enum DrawError {
    /// A cycle needs at least two participants
    #[error("Malformed input: at least 2 participants are required, got {0}")]
    TooFewParticipants(usize),

    /// A participant identifier is empty or whitespace
    #[error("Malformed input: participant #{position} has an empty identifier")]
    EmptyIdentifier {
        /// 1-based position in the participant list
        position: usize,
    },

    /// Two participants share the same identifier
    #[error("Malformed input: duplicate participant identifier '{0}'")]
    DuplicateIdentifier(String),

    /// A participant address is unusable as a mail header value
    #[error("Malformed input: participant '{id}' has an invalid address: {reason}")]
    InvalidAddress {
        /// Participant the address belongs to
        id: String,
        /// What is wrong with it
        reason: &'static str,
    },

    /// An exclusion names someone who is not a participant
    #[error("Malformed input: exclusions {context} reference unknown participant '{id}'")]
    UnknownIdentifier {
        /// Where the reference was found
        context: String,
        /// The unknown identifier
        id: String,
    },

    /// No single cycle satisfies the exclusions
    #[error("Infeasible: {reason} (seed {seed}, {attempts} attempt(s))")]
    Infeasible {
        /// Why the draw could not be completed
        reason: String,
        /// Seed that was in use
        seed: u64,
        /// Walks consumed before giving up (0 when detected up front)
        attempts: u32,
    },

    /// A drawn assignment breaks one of the cycle invariants
    #[error("Invalid assignment: {0}")]
    InvalidAssignment(String),

    /// The roster file could not be read
    #[error("Failed to read roster file {}: {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The roster file is not valid JSON for the expected schema
    #[error("Failed to parse roster file {}: {source}", path.display())]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
}

impl DrawError {
    /// Returns true for errors that require fixing the participant data shape
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::TooFewParticipants(_)
                | Self::EmptyIdentifier { .. }
                | Self::DuplicateIdentifier(_)
                | Self::InvalidAddress { .. }
                | Self::UnknownIdentifier { .. }
        )
    }

    /// Returns true when the exclusions rule out every single cycle
    #[must_use]
    pub const fn is_infeasible(&self) -> bool {
        matches!(self, Self::Infeasible { .. })
    }

    pub(crate) fn infeasible(reason: impl Into<String>, seed: u64, attempts: u32) -> Self {
        Self::Infeasible {
            reason: reason.into(),
            seed,
            attempts,
        }
    }
}
