use crate::domain::model::Matches;
use crate::utils::error::{Result, SantaError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Pairs every giver with a receiver other than themself.
///
/// Givers are processed in input order and each draws uniformly from the
/// receivers still in the pool. The greedy draw can paint itself into a corner
/// (the last giver left holding only their own name), so a stuck attempt is
/// thrown away and the whole draw restarts, up to `max_attempts` times.
pub struct Matchmaker<R: Rng = StdRng> {
    rng: R,
    max_attempts: usize,
}

impl Matchmaker<StdRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> Matchmaker<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn assign(&mut self, names: &[String]) -> Result<Matches> {
        if names.len() < 2 {
            return Err(SantaError::NotEnoughParticipants { count: names.len() });
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in names {
            if !seen.insert(name.as_str()) {
                return Err(SantaError::AmbiguousParticipantName { name: name.clone() });
            }
        }

        for attempt in 1..=self.max_attempts {
            if let Some(matches) = self.try_assign(names) {
                tracing::debug!(
                    "Matched {} participants on attempt {}",
                    matches.len(),
                    attempt
                );
                return Ok(matches);
            }
            tracing::trace!("Matching attempt {} got stuck, restarting", attempt);
        }

        tracing::warn!(
            "Matchmaking gave up after {} attempts for {} participants",
            self.max_attempts,
            names.len()
        );
        Err(SantaError::MatchmakingFailed {
            attempts: self.max_attempts,
        })
    }

    fn try_assign(&mut self, names: &[String]) -> Option<Matches> {
        let mut pool: Vec<&String> = names.iter().collect();
        let mut matches = Matches::new();

        for giver in names {
            let candidates: Vec<usize> = pool
                .iter()
                .enumerate()
                .filter(|(_, receiver)| **receiver != giver)
                .map(|(idx, _)| idx)
                .collect();

            if candidates.is_empty() {
                return None;
            }

            let pick = candidates[self.rng.gen_range(0..candidates.len())];
            let receiver = pool.remove(pick);
            matches.insert(giver.clone(), receiver.clone());
        }

        Some(matches)
    }
}
