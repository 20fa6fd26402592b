//! Gift cycle drawing
//!
//! Roster loading and validation, the constrained random cycle generator,
//! and the assignment it produces.

pub mod assigner;
pub mod assignment;
pub mod error;
pub mod feasibility;
pub mod roster;

pub use assigner::{fresh_seed, CycleAssigner, Draw, DEFAULT_MAX_ATTEMPTS};
pub use assignment::Assignment;
pub use error::{DrawError, DrawResult};
pub use roster::{address_problem, Participant, Roster, RosterFile};
