//! Giftcycle - gift exchange draws
//!
//! Giftcycle assigns every participant someone to give a gift to, forming
//! one closed cycle through the whole group while honoring exclusions
//! (e.g. members of the same household), then tells each participant
//! whom they drew and nothing more.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

pub mod cli;
pub mod config;
pub mod doctor;
pub mod draw;
pub mod log;
pub mod notify;

#[cfg(test)]
mod testutil;

// Re-export commonly used types
pub use config::NotifierConfig;
pub use doctor::{diagnose, DiagnosticReport};
pub use draw::{fresh_seed, Assignment, CycleAssigner, Draw, DrawError, Participant, Roster};
pub use log::{DrawRecord, JsonlLogger};
pub use notify::{DeliveryReport, Notifier, Transport};
