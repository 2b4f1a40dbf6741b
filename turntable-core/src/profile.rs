//! Player profile — experience, level, and spendable tokens.
//!
//! A [`Profile`] only changes through [`Profile::add_experience`]. Each grant
//! re-derives the level from the [`LevelCurve`], awards one token per level
//! gained, and reports at most one [`LevelUp`] no matter how many levels were
//! crossed.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::leveling::LevelCurve;

/// The persisted progression record for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Profile {
    /// Total experience earned. Only grows.
    pub experience: u64,
    /// Current level (1 for a fresh profile).
    pub level: u32,
    /// Tokens available to spend.
    pub tokens: u32,
}

/// Outcome of a grant that raised the profile's level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelUp {
    /// Level before the grant.
    pub previous_level: u32,
    /// Level after the grant.
    pub new_level: u32,
    /// Tokens awarded by this grant (one per level gained).
    pub tokens_granted: u32,
}

impl LevelUp {
    /// How many levels this grant crossed.
    #[must_use]
    pub fn levels_gained(&self) -> u32 {
        self.new_level - self.previous_level
    }
}

impl fmt::Display for LevelUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "level {} -> {} (+{} tokens)",
            self.previous_level, self.new_level, self.tokens_granted
        )
    }
}

impl Profile {
    /// A fresh profile: no experience, level 1, no tokens.
    #[must_use]
    pub fn new() -> Self {
        Self {
            experience: 0,
            level: 1,
            tokens: 0,
        }
    }

    /// Rebuild a profile from stored counters, taken verbatim.
    #[must_use]
    pub fn from_parts(experience: u64, level: u32, tokens: u32) -> Self {
        Self {
            experience,
            level,
            tokens,
        }
    }

    /// Grant `amount` experience.
    ///
    /// Experience saturates at `u64::MAX`. The level advances while the next
    /// level's requirement is met; the level never goes down, even for a
    /// loaded profile whose stored level is ahead of its experience.
    ///
    /// Returns `Some` exactly once per grant that gains at least one level.
    pub fn add_experience(&mut self, amount: u64, curve: &LevelCurve) -> Option<LevelUp> {
        self.experience = self.experience.saturating_add(amount);

        let previous_level = self.level;
        let reached = curve.level_from_experience(self.experience);
        if reached <= previous_level {
            return None;
        }

        let tokens_granted = reached - previous_level;
        self.level = reached;
        self.tokens = self.tokens.saturating_add(tokens_granted);

        let level_up = LevelUp {
            previous_level,
            new_level: reached,
            tokens_granted,
        };
        debug!(
            experience = self.experience,
            %level_up,
            "Profile levelled up"
        );
        Some(level_up)
    }

    /// Whether the stored level matches what the curve derives from experience.
    #[must_use]
    pub fn is_level_consistent(&self, curve: &LevelCurve) -> bool {
        curve.level_from_experience(self.experience) == self.level
    }

    /// Experience still needed to reach the next level.
    #[must_use]
    pub fn experience_to_next_level(&self, curve: &LevelCurve) -> u64 {
        curve.experience_to_next_level(self.level, self.experience)
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}
