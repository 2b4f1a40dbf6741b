//! Materials and shader uniforms.
//!
//! Uniforms are addressed by [`UniformSlot`] rather than by name string. Each
//! material keeps one value per slot in a fixed table, so per-frame updates
//! are plain array writes. The shader-side name of a slot is only needed when
//! the engine binds the program.

use nalgebra::{Vector3, Vector4};

/// Every uniform the lit shaders consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformSlot {
    Color,
    AmbientLight,
    LightColor,
    FogColor,
    LightPosition,
    CameraPosition,
    LightIntensity,
    SpecularPower,
    MinFogDistance,
    MaxFogDistance,
    Time,
}

impl UniformSlot {
    pub const COUNT: usize = 11;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Color,
        Self::AmbientLight,
        Self::LightColor,
        Self::FogColor,
        Self::LightPosition,
        Self::CameraPosition,
        Self::LightIntensity,
        Self::SpecularPower,
        Self::MinFogDistance,
        Self::MaxFogDistance,
        Self::Time,
    ];

    /// Name of the uniform in GLSL.
    #[must_use]
    pub fn shader_name(self) -> &'static str {
        match self {
            Self::Color => "gColor",
            Self::AmbientLight => "gAmbientLight",
            Self::LightColor => "gLightColor",
            Self::FogColor => "gFogColor",
            Self::LightPosition => "gLightPosition",
            Self::CameraPosition => "gCameraPosition",
            Self::LightIntensity => "gLightIntensity",
            Self::SpecularPower => "gSpecularPower",
            Self::MinFogDistance => "gMinFogDistance",
            Self::MaxFogDistance => "gMaxFogDistance",
            Self::Time => "gTime",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A typed uniform value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec3(Vector3<f32>),
    Vec4(Vector4<f32>),
}

/// Fixed-function state a material is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    pub depth_test: bool,
    pub cull_back_faces: bool,
    pub alpha_blend: bool,
}

impl Default for RenderState {
    /// Depth tested, back faces culled, alpha blended.
    fn default() -> Self {
        Self {
            depth_test: true,
            cull_back_faces: true,
            alpha_blend: true,
        }
    }
}

/// Vertex and fragment shader source paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderProgram {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderProgram {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

/// Shader, render state, textures, and uniform values for one surface.
#[derive(Debug, Clone)]
pub struct Material {
    pub shader: ShaderProgram,
    pub render_state: RenderState,
    pub diffuse_texture: Option<String>,
    pub normal_texture: Option<String>,
    uniforms: [Option<UniformValue>; UniformSlot::COUNT],
}

impl Material {
    #[must_use]
    pub fn new(shader: ShaderProgram, render_state: RenderState) -> Self {
        Self {
            shader,
            render_state,
            diffuse_texture: None,
            normal_texture: None,
            uniforms: [None; UniformSlot::COUNT],
        }
    }

    pub fn set_diffuse_texture(&mut self, path: impl Into<String>) {
        self.diffuse_texture = Some(path.into());
    }

    pub fn set_normal_texture(&mut self, path: impl Into<String>) {
        self.normal_texture = Some(path.into());
    }

    pub fn set_float(&mut self, slot: UniformSlot, value: f32) {
        self.uniforms[slot.index()] = Some(UniformValue::Float(value));
    }

    pub fn set_vec3(&mut self, slot: UniformSlot, value: Vector3<f32>) {
        self.uniforms[slot.index()] = Some(UniformValue::Vec3(value));
    }

    pub fn set_vec4(&mut self, slot: UniformSlot, value: Vector4<f32>) {
        self.uniforms[slot.index()] = Some(UniformValue::Vec4(value));
    }

    #[must_use]
    pub fn uniform(&self, slot: UniformSlot) -> Option<UniformValue> {
        self.uniforms[slot.index()]
    }

    /// Slots that currently hold a value, in slot order.
    pub fn bound_uniforms(&self) -> impl Iterator<Item = (UniformSlot, UniformValue)> + '_ {
        UniformSlot::ALL
            .iter()
            .filter_map(|&slot| self.uniform(slot).map(|value| (slot, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_table_is_consistent() {
        for (i, slot) in UniformSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
            assert!(slot.shader_name().starts_with('g'));
        }
    }

    #[test]
    fn uniforms_are_typed_per_slot() {
        let mut material = Material::new(
            ShaderProgram::new("basicLight.vert", "basicLight.frag"),
            RenderState::default(),
        );
        assert_eq!(material.bound_uniforms().count(), 0);

        material.set_float(UniformSlot::Time, 2.5);
        material.set_vec3(UniformSlot::LightPosition, Vector3::new(30.0, 10.0, 30.0));
        material.set_float(UniformSlot::Time, 3.0);

        assert_eq!(
            material.uniform(UniformSlot::Time),
            Some(UniformValue::Float(3.0))
        );
        let bound: Vec<_> = material.bound_uniforms().map(|(slot, _)| slot).collect();
        assert_eq!(bound, [UniformSlot::LightPosition, UniformSlot::Time]);
    }

    #[test]
    fn default_render_state_is_alpha_blended() {
        let state = RenderState::default();
        assert!(state.depth_test);
        assert!(state.cull_back_faces);
        assert!(state.alpha_blend);
    }
}
