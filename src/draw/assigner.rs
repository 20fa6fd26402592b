//! Constrained random cycle generator
//!
//! Builds one closed gift cycle by a random walk from the first participant:
//! each step picks uniformly among the remaining participants the current
//! giver may give to. A dead end discards the walk and starts over from the
//! same first participant while the random source keeps advancing, so
//! retries never repeat. The walk count is bounded by `max_attempts`.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::draw::assignment::Assignment;
use crate::draw::error::{DrawError, DrawResult};
use crate::draw::feasibility;
use crate::draw::roster::Roster;

/// Walks attempted before a draw is declared infeasible
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

/// A completed draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    /// The giver to receiver mapping
    pub assignment: Assignment,
    /// Seed that reproduces this draw for the same roster
    pub seed: u64,
    /// Walks consumed, including the successful one
    pub attempts: u32,
}

/// Draw a seed from OS entropy for callers that do not supply one
#[must_use]
pub fn fresh_seed() -> u64 {
    rand::random()
}

/// Generates single-cycle assignments under an exclusion relation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleAssigner {
    max_attempts: u32,
}

impl Default for CycleAssigner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl CycleAssigner {
    /// Create an assigner with the given retry budget (0 is treated as 1)
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Maximum number of walks per draw
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Draw one cycle over `roster` from `seed`.
    ///
    /// The same roster and seed always yield the same draw.
    pub fn generate(&self, roster: &Roster, seed: u64) -> DrawResult<Draw> {
        if let Some(obstruction) = feasibility::check(roster) {
            tracing::warn!(seed, %obstruction, "Draw rejected before walking");
            return Err(DrawError::infeasible(obstruction.to_string(), seed, 0));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        for attempt in 1..=self.max_attempts {
            if let Some(assignment) = walk(roster, &mut rng) {
                tracing::info!(seed, attempts = attempt, "Draw complete");
                return Ok(Draw {
                    assignment,
                    seed,
                    attempts: attempt,
                });
            }
            tracing::debug!(seed, attempt, "Dead end, restarting walk");
        }

        tracing::warn!(
            seed,
            attempts = self.max_attempts,
            "Retry budget exhausted"
        );
        Err(DrawError::infeasible(
            "no single cycle found within the retry budget",
            seed,
            self.max_attempts,
        ))
    }
}

/// One walk from the first participant; `None` on a dead end.
fn walk<R: Rng>(roster: &Roster, rng: &mut R) -> Option<Assignment> {
    let mut ids = roster.ids();
    let first = ids.next()?;
    let mut remaining: Vec<&str> = ids.collect();
    let mut current = first;
    let mut assignment = Assignment::new();

    while !remaining.is_empty() {
        let candidates: Vec<usize> = remaining
            .iter()
            .enumerate()
            .filter(|(_, r)| roster.allows(current, r))
            .map(|(i, _)| i)
            .collect();

        if candidates.is_empty() {
            return None;
        }

        let chosen = candidates[rng.gen_range(0..candidates.len())];
        let next = remaining.remove(chosen);
        assignment.insert(current, next);
        current = next;
    }

    assignment.insert(current, first);
    Some(assignment)
}
