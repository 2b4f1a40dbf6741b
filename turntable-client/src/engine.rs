//! Host engine collaborators.
//!
//! The client runs inside a larger engine that owns mesh decoding, input
//! polling, the event system, and the on-screen console. Those services are
//! reached through the traits below and are always passed in explicitly.
//!
//! The concrete types here ([`MeshCache`], [`KeyboardState`], [`EventLog`],
//! [`ConsoleLog`]) are standalone stand-ins used by the console binary and by
//! tests. In a full engine integration they are replaced by the engine's own
//! services.

use std::collections::{HashMap, HashSet};
use std::fmt;

use nalgebra::{Vector3, Vector4};
use serde::{Deserialize, Serialize};
use turntable_core::LevelUp;

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);
    pub const BLUE: Self = Self::rgb(0x00, 0x00, 0xFF);
    pub const RED: Self = Self::rgb(0xFF, 0x00, 0x00);
    pub const CYAN: Self = Self::rgb(0x00, 0xFF, 0xFF);
    pub const CERULEAN: Self = Self::rgb(0x00, 0x7B, 0xA7);
    pub const BADDAD: Self = Self::rgb(0xBA, 0xDD, 0xAD);

    /// Opaque color from its channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// Normalized `[0, 1]` channels for shader uniforms.
    #[must_use]
    pub fn to_vec4(self) -> Vector4<f32> {
        Vector4::new(
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            f32::from(self.a) / 255.0,
        )
    }
}

// ---------------------------------------------------------------------------
// Meshes
// ---------------------------------------------------------------------------

/// Opaque handle to a mesh owned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// Turns an asset path into a mesh handle.
pub trait MeshLoader {
    /// Load (or fetch an already loaded) mesh.
    fn load_mesh(&mut self, path: &str) -> Result<MeshHandle, EngineError>;
}

/// Hands out one handle per distinct path. Paths listed as missing fail.
#[derive(Debug, Default)]
pub struct MeshCache {
    handles: HashMap<String, MeshHandle>,
    missing: HashSet<String>,
}

impl MeshCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later load of `path` fail.
    pub fn mark_missing(&mut self, path: impl Into<String>) {
        self.missing.insert(path.into());
    }

    /// Number of distinct meshes loaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl MeshLoader for MeshCache {
    fn load_mesh(&mut self, path: &str) -> Result<MeshHandle, EngineError> {
        if self.missing.contains(path) {
            return Err(EngineError::MeshLoad {
                path: path.to_string(),
                reason: "file not found".to_string(),
            });
        }
        let next = MeshHandle(self.handles.len() as u32);
        Ok(*self.handles.entry(path.to_string()).or_insert(next))
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A keyboard key, identified by its uppercase character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode(char);

impl KeyCode {
    #[must_use]
    pub fn from_char(c: char) -> Self {
        Self(c.to_ascii_uppercase())
    }

    #[must_use]
    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-frame keyboard queries.
pub trait InputState {
    /// True only on the frame the key went down.
    fn was_key_just_pressed(&self, key: KeyCode) -> bool;
}

/// Keys pressed during the current frame.
#[derive(Debug, Default)]
pub struct KeyboardState {
    just_pressed: HashSet<KeyCode>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down edge for this frame.
    pub fn press(&mut self, key: KeyCode) {
        self.just_pressed.insert(key);
    }

    /// Clear edges at the end of a frame.
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }
}

impl InputState for KeyboardState {
    fn was_key_just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed.contains(&key)
    }
}

// ---------------------------------------------------------------------------
// Camera
// ---------------------------------------------------------------------------

/// The view the current frame is rendered from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vector3<f32>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Events the client fires on the engine's event bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A grant raised the active profile's level.
    LevelUp(LevelUp),
    /// No saved profile existed, so a fresh one was started.
    ProfileCreated { name: String },
}

impl GameEvent {
    /// Name the event is fired under.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LevelUp(_) => "LevelUp",
            Self::ProfileCreated { .. } => "ProfileCreated",
        }
    }
}

/// Fire-by-name event sink.
pub trait EventBus {
    fn fire(&mut self, event: GameEvent);
}

/// Keeps every fired event in order.
#[derive(Debug, Default)]
pub struct EventLog {
    pub events: Vec<GameEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many events were fired under `name`.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.events.iter().filter(|e| e.name() == name).count()
    }
}

impl EventBus for EventLog {
    fn fire(&mut self, event: GameEvent) {
        tracing::debug!(event = event.name(), "Event fired");
        self.events.push(event);
    }
}

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

/// The on-screen developer console.
pub trait Console {
    fn print_line(&mut self, text: &str, color: Rgba);
}

/// Keeps every printed line with its color.
#[derive(Debug, Default)]
pub struct ConsoleLog {
    pub lines: Vec<(String, Rgba)>,
}

impl ConsoleLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Printed text without colors.
    #[must_use]
    pub fn text(&self) -> Vec<&str> {
        self.lines.iter().map(|(line, _)| line.as_str()).collect()
    }
}

impl Console for ConsoleLog {
    fn print_line(&mut self, text: &str, color: Rgba) {
        self.lines.push((text.to_string(), color));
    }
}
