//! Experience Curve — Level ↔ Experience Mapping
//!
//! The curve is quadratic in level:
//!   required(L) = ceil( ((L - 1) / C)^2 )
//!   level(xp)   = floor( C * sqrt(xp) ) + 1
//!
//! Where:
//!   C = curve constant (levels gained per unit of sqrt(experience))
//!
//! Level 1 costs nothing. The two formulas only agree at integer boundaries
//! when consecutive requirements land on distinct integers, which holds for
//! `0 < C <= 1`: the real-valued gap between levels L-1 and L is
//! `(2L - 3) / C^2 >= 1`, so `ceil` can never merge two levels. Larger
//! constants are rejected.
//!
//! `level_from_experience` is evaluated as "the highest level whose requirement
//! is met" rather than through the float square root, so the two directions
//! cannot drift apart from rounding.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TurntableError};

/// Default curve constant: level 2 at 100 exp, level 10 at 8100 exp.
pub const DEFAULT_CURVE_CONSTANT: f64 = 0.1;

/// Relative error, in units of `f64::EPSILON`, that the squared requirement
/// picks up from storing `C` and from the division and product. Values this
/// close to an integer are that integer (so `3 / 0.1` squared costs 900, not
/// 901); anything further away rounds up.
const ROUNDING_ULPS: f64 = 4.0;

/// A validated experience curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct LevelCurve {
    constant: f64,
}

impl LevelCurve {
    /// Build a curve from its constant.
    ///
    /// # Errors
    ///
    /// Returns [`TurntableError::Curve`] if `constant` is not finite or lies
    /// outside `(0, 1]`.
    pub fn new(constant: f64) -> Result<Self> {
        if !constant.is_finite() || constant <= 0.0 || constant > 1.0 {
            return Err(TurntableError::Curve { constant });
        }
        Ok(Self { constant })
    }

    /// The curve constant `C`.
    #[must_use]
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Total experience needed to reach `level`.
    ///
    /// Levels 0 and 1 cost nothing. A level whose requirement does not fit in
    /// a `u64` is unreachable and reports `u64::MAX`.
    #[must_use]
    pub fn experience_required_for_level(&self, level: u32) -> u64 {
        self.requirement(level).unwrap_or(u64::MAX)
    }

    /// The requirement for `level`, or `None` past `u64::MAX`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn requirement(&self, level: u32) -> Option<u64> {
        if level <= 1 {
            return Some(0);
        }

        let steps = f64::from(level - 1) / self.constant;
        let squared = steps * steps;
        let nearest = squared.round();
        let required = if (squared - nearest).abs() <= ROUNDING_ULPS * f64::EPSILON * squared {
            nearest
        } else {
            squared.ceil()
        };

        // `u64::MAX as f64` is 2^64, the first value that does not fit.
        if required >= u64::MAX as f64 {
            None
        } else {
            Some(required as u64)
        }
    }

    /// The level reached with `experience` total experience.
    ///
    /// Equals `floor(C * sqrt(experience)) + 1` and is the exact inverse of
    /// [`experience_required_for_level`](Self::experience_required_for_level).
    /// Unreachable levels are never counted as reached, even at `u64::MAX`.
    #[must_use]
    pub fn level_from_experience(&self, experience: u64) -> u32 {
        // Binary search for the last level whose requirement is met.
        // Invariant: required(lo) <= experience; the answer lies in [lo, hi].
        let (mut lo, mut hi) = (1u32, u32::MAX);
        while lo < hi {
            let mid = lo + (hi - lo).div_ceil(2);
            if self.requirement(mid).is_some_and(|required| required <= experience) {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        lo
    }

    /// Experience still missing before `level + 1` is reached.
    #[must_use]
    pub fn experience_to_next_level(&self, level: u32, experience: u64) -> u64 {
        self.experience_required_for_level(level.saturating_add(1))
            .saturating_sub(experience)
    }

    /// `(level, required experience)` rows for levels `1..=max_level`.
    pub fn level_table(&self, max_level: u32) -> impl Iterator<Item = (u32, u64)> + '_ {
        (1..=max_level).map(|level| (level, self.experience_required_for_level(level)))
    }
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            constant: DEFAULT_CURVE_CONSTANT,
        }
    }
}

impl TryFrom<f64> for LevelCurve {
    type Error = TurntableError;

    fn try_from(constant: f64) -> Result<Self> {
        Self::new(constant)
    }
}

impl From<LevelCurve> for f64 {
    fn from(curve: LevelCurve) -> Self {
        curve.constant
    }
}
