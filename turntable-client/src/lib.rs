//! # turntable-client — Client Integration for Turntable
//!
//! This crate connects the engine-agnostic `turntable-core` progression
//! library to the game client, and holds the client-side vinyl record prop.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │               Host engine                 │
//! │  mesh loader · input · events · console   │
//! │  ┌────────────────────────────────────┐  │
//! │  │        turntable-client            │  │
//! │  │  ┌──────────┐  ┌────────────────┐  │  │
//! │  │  │  vinyl   │  │ session/console│  │  │
//! │  │  └────┬─────┘  └───────┬────────┘  │  │
//! │  │       ▼                ▼           │  │
//! │  │  scene · material   turntable-core │  │
//! │  └────────────────────────────────────┘  │
//! └──────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `engine` — Host collaborator traits and standalone stand-ins
//! - `scene` — Transform hierarchy and renderable registration
//! - `material` — Shader programs, render state, enumerated uniform slots
//! - `vinyl` — The vinyl record prop and its per-frame animation
//! - `session` — Active profile ownership, level-up events, save on shutdown
//! - `console` — `stats`, `addexp`, `printlevels` console commands
//! - `config` — Prop and lighting tuning layered on the core config

pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod material;
pub mod scene;
pub mod session;
pub mod vinyl;

pub use config::ClientConfig;
pub use console::{CommandContext, CommandRegistry};
pub use session::ProfileSession;
pub use vinyl::{FrameContext, VinylRecord};
