//! Client configuration (prop tuning and lighting) on top of the core
//! `turntable_core::TurntableConfig`.
//!
//! All sections live in the same `turntable.toml`:
//!
//! ```toml
//! [progression]
//! curve_constant = 0.1
//!
//! [prop]
//! rotation_rate_degrees = 270.0
//! toggle_key = "J"
//!
//! [lighting]
//! light_intensity = 150.0
//! ```

use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use turntable_core::{TurntableConfig, TurntableError};

use crate::engine::Rgba;

/// Everything the client reads from `turntable.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Core progression and persistence settings.
    #[serde(flatten)]
    pub core: TurntableConfig,
    #[serde(default)]
    pub prop: PropConfig,
    #[serde(default)]
    pub lighting: LightingConfig,
}

impl ClientConfig {
    /// Parse and validate a TOML string.
    ///
    /// # Errors
    /// Returns `TurntableError::Config` on invalid TOML or out-of-range tuning.
    pub fn from_toml(toml_str: &str) -> turntable_core::error::Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| TurntableError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> turntable_core::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Check tuning values the type system cannot.
    ///
    /// # Errors
    /// Returns `TurntableError::Config` naming the offending field.
    pub fn validate(&self) -> turntable_core::error::Result<()> {
        let prop = &self.prop;
        if !(prop.blend_factor > 0.0 && prop.blend_factor <= 1.0) {
            return Err(TurntableError::Config(format!(
                "prop.blend_factor must be in (0, 1], got {}",
                prop.blend_factor
            )));
        }
        if !(prop.rotation_rate_degrees.is_finite() && prop.rotation_rate_degrees >= 0.0) {
            return Err(TurntableError::Config(format!(
                "prop.rotation_rate_degrees must be finite and non-negative, got {}",
                prop.rotation_rate_degrees
            )));
        }
        if !prop.toggle_key.is_ascii_alphanumeric() {
            return Err(TurntableError::Config(format!(
                "prop.toggle_key must be a letter or digit, got {:?}",
                prop.toggle_key
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Vinyl record prop
// ---------------------------------------------------------------------------

/// Asset paths for the vinyl record prop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PropAssets {
    pub label_mesh: String,
    pub disc_mesh: String,
    pub sleeve_mesh: String,
    pub lit_vertex_shader: String,
    pub lit_fragment_shader: String,
    pub sleeve_fragment_shader: String,
    pub label_texture: String,
    pub disc_texture: String,
    pub disc_normal_texture: String,
    pub sleeve_texture: String,
}

impl Default for PropAssets {
    fn default() -> Self {
        Self {
            label_mesh: "data/fbx/vinyl/45rpm_1.picomesh".to_string(),
            disc_mesh: "data/fbx/vinyl/45rpm_0.picomesh".to_string(),
            sleeve_mesh: "data/fbx/vinyl/45sleeve_0.picomesh".to_string(),
            lit_vertex_shader: "Data/Shaders/basicLight.vert".to_string(),
            lit_fragment_shader: "Data/Shaders/basicLight.frag".to_string(),
            sleeve_fragment_shader: "Data/Shaders/fixedVertexFormat.frag".to_string(),
            label_texture: "Data/Images/LabelTextures/45RPMLabel.tga".to_string(),
            disc_texture: "Data/Images/DiscTextures/45RPMBaseColor.png".to_string(),
            disc_normal_texture: "Data/Images/DiscTextures/45RPMSpec.png".to_string(),
            sleeve_texture: "Data/Images/SleeveTextures/Generic45Sleeve.tga".to_string(),
        }
    }
}

/// Layout and animation tuning for the vinyl record prop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PropConfig {
    pub assets: PropAssets,
    /// World position of the disc.
    pub position: Vector3<f32>,
    /// Spin rate the disc eases toward, in degrees per second (45 rpm).
    pub rotation_rate_degrees: f32,
    /// Fraction of the remaining distance covered per update.
    pub blend_factor: f32,
    /// Sleeve position relative to the disc while attached.
    pub sleeve_offset: Vector3<f32>,
    pub sleeve_rotation_degrees: Vector3<f32>,
    pub sleeve_scale: Vector3<f32>,
    /// Sleeve `x` offset while pulled off the disc.
    pub sleeve_detached_x: f32,
    /// Key that slides the sleeve on and off.
    pub toggle_key: char,
}

impl Default for PropConfig {
    fn default() -> Self {
        Self {
            assets: PropAssets::default(),
            position: Vector3::new(30.0, 0.0, 30.0),
            rotation_rate_degrees: 270.0,
            blend_factor: 0.1,
            sleeve_offset: Vector3::new(0.0, 0.4, 0.0),
            sleeve_rotation_degrees: Vector3::new(90.0, 180.0, 0.0),
            sleeve_scale: Vector3::new(1.0, 1.0, 0.75),
            sleeve_detached_x: -100.0,
            toggle_key: 'J',
        }
    }
}

// ---------------------------------------------------------------------------
// Lighting
// ---------------------------------------------------------------------------

/// Lighting uniforms written to the lit prop materials every frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub color: Rgba,
    pub ambient_light: Rgba,
    pub light_color: Rgba,
    pub fog_color: Rgba,
    pub light_position: Vector3<f32>,
    pub light_intensity: f32,
    pub specular_power: f32,
    pub min_fog_distance: f32,
    pub max_fog_distance: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            color: Rgba::WHITE,
            ambient_light: Rgba::BLACK,
            light_color: Rgba::WHITE,
            fog_color: Rgba::BLUE,
            light_position: Vector3::new(30.0, 10.0, 30.0),
            light_intensity: 150.0,
            specular_power: 8.0,
            min_fog_distance: 50.0,
            max_fog_distance: 100.0,
        }
    }
}
