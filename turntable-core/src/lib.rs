//! # Turntable Core Library
//!
//! Engine-agnostic player progression for the Turntable client.
//!
//! A player's [`Profile`] tracks three counters:
//!
//! - **Experience** — grows with every grant, never shrinks
//! - **Level** — derived from experience through a [`LevelCurve`]
//! - **Tokens** — one per level gained, spent elsewhere
//!
//! Profiles are stored as small XML documents by a [`ProfileStore`] under the
//! user's data directory.
//!
//! ## Curve Contract
//!
//! `experience_required_for_level` and `level_from_experience` are exact
//! inverses at every integer level boundary. Curves whose constant would break
//! that (`C > 1`) are rejected at construction.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod leveling;
pub mod persistence;
pub mod profile;

pub use config::TurntableConfig;
pub use error::TurntableError;
pub use leveling::LevelCurve;
pub use persistence::ProfileStore;
pub use profile::{LevelUp, Profile};
