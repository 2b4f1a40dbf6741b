//! The vinyl record prop.
//!
//! Three parts share one transform hierarchy: the disc is the root, the label
//! and the sleeve hang off it. The sleeve ignores the disc's spin.
//!
//! Every [`VinylRecord::update`]:
//! 1. eases the spin rate toward its target and advances the disc's yaw,
//! 2. flips the sleeve on a toggle-key press and eases it toward its target,
//! 3. writes the lighting uniforms for the label and disc materials.
//!
//! Easing applies a fixed blend factor once per call, so it runs faster at
//! higher frame rates.

use std::ops::{Add, Mul, Sub};

use nalgebra::Vector3;

use crate::config::{LightingConfig, PropConfig};
use crate::engine::{Camera, InputState, KeyCode, MeshHandle, MeshLoader};
use crate::error::EngineError;
use crate::material::{Material, RenderState, ShaderProgram, UniformSlot};
use crate::scene::{Renderable, Scene, TransformId, TransformTree};

/// One drawable piece of the prop.
#[derive(Debug, Clone)]
pub struct VinylPart {
    pub transform: TransformId,
    pub mesh: MeshHandle,
    pub material: Material,
}

/// Per-frame inputs supplied by the host loop.
pub struct FrameContext<'a> {
    pub delta_seconds: f32,
    /// Seconds since the engine started, for the `gTime` uniform.
    pub time_seconds: f64,
    pub camera: &'a Camera,
    pub input: &'a dyn InputState,
}

/// A spinning 45 with a sleeve that slides off on demand.
#[derive(Debug)]
pub struct VinylRecord {
    label: VinylPart,
    disc: VinylPart,
    sleeve: VinylPart,

    target_rotation_rate: f32,
    rotation_rate: f32,
    rotation_degrees: f64,

    sleeve_attached: bool,
    sleeve_target: Vector3<f32>,
    sleeve_detached_x: f32,

    blend_factor: f32,
    toggle_key: KeyCode,
    lighting: LightingConfig,
}

/// Move `factor` of the way from `from` to `to`.
fn blend<T>(from: T, to: T, factor: f32) -> T
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T>,
{
    from + (to - from) * factor
}

impl VinylRecord {
    /// Load the meshes, build the materials, and lay out the transforms.
    ///
    /// # Errors
    /// Returns the loader's error if any of the three meshes fails to load.
    pub fn new(
        config: &PropConfig,
        lighting: &LightingConfig,
        meshes: &mut dyn MeshLoader,
        transforms: &mut TransformTree,
    ) -> Result<Self, EngineError> {
        let assets = &config.assets;
        let label_mesh = meshes.load_mesh(&assets.label_mesh)?;
        let disc_mesh = meshes.load_mesh(&assets.disc_mesh)?;
        let sleeve_mesh = meshes.load_mesh(&assets.sleeve_mesh)?;

        let lit = ShaderProgram::new(&assets.lit_vertex_shader, &assets.lit_fragment_shader);
        let mut label_material = Material::new(lit.clone(), RenderState::default());
        let mut disc_material = Material::new(lit, RenderState::default());
        let mut sleeve_material = Material::new(
            ShaderProgram::new(&assets.lit_vertex_shader, &assets.sleeve_fragment_shader),
            RenderState::default(),
        );

        label_material.set_diffuse_texture(&assets.label_texture);
        disc_material.set_diffuse_texture(&assets.disc_texture);
        disc_material.set_normal_texture(&assets.disc_normal_texture);
        sleeve_material.set_diffuse_texture(&assets.sleeve_texture);

        let disc_transform = transforms.insert();
        let label_transform = transforms.insert();
        let sleeve_transform = transforms.insert();

        transforms.add_child(disc_transform, label_transform);
        transforms.add_child(disc_transform, sleeve_transform);
        transforms.set_position(disc_transform, config.position);

        transforms.ignore_parent_rotation(sleeve_transform);
        transforms.set_rotation_degrees(sleeve_transform, config.sleeve_rotation_degrees);
        transforms.set_scale(sleeve_transform, config.sleeve_scale);
        transforms.set_position(sleeve_transform, config.sleeve_offset);

        tracing::debug!(
            disc = %assets.disc_mesh,
            rotation_rate = config.rotation_rate_degrees,
            "Vinyl record prop created"
        );

        Ok(Self {
            label: VinylPart {
                transform: label_transform,
                mesh: label_mesh,
                material: label_material,
            },
            disc: VinylPart {
                transform: disc_transform,
                mesh: disc_mesh,
                material: disc_material,
            },
            sleeve: VinylPart {
                transform: sleeve_transform,
                mesh: sleeve_mesh,
                material: sleeve_material,
            },
            target_rotation_rate: config.rotation_rate_degrees,
            rotation_rate: config.rotation_rate_degrees,
            rotation_degrees: 0.0,
            sleeve_attached: true,
            sleeve_target: config.sleeve_offset,
            sleeve_detached_x: config.sleeve_detached_x,
            blend_factor: config.blend_factor,
            toggle_key: KeyCode::from_char(config.toggle_key),
            lighting: lighting.clone(),
        })
    }

    /// Register label, disc, and sleeve with `scene`, in that order.
    pub fn add_to_scene(&self, scene: &mut Scene) {
        for (name, part) in [
            ("vinyl_label", &self.label),
            ("vinyl_disc", &self.disc),
            ("vinyl_sleeve", &self.sleeve),
        ] {
            scene.register(Renderable {
                name,
                transform: part.transform,
                mesh: part.mesh,
            });
        }
    }

    /// Advance one frame.
    pub fn update(&mut self, frame: &FrameContext<'_>, transforms: &mut TransformTree) {
        self.update_rotation(frame.delta_seconds, transforms);
        self.update_sleeve(frame.input, transforms);
        self.update_uniforms(frame.camera, frame.time_seconds);
    }

    fn update_rotation(&mut self, delta_seconds: f32, transforms: &mut TransformTree) {
        self.rotation_rate = blend(self.rotation_rate, self.target_rotation_rate, self.blend_factor);
        self.rotation_degrees += f64::from(self.rotation_rate * delta_seconds);

        let mut rotation = transforms.rotation_degrees(self.disc.transform);
        #[allow(clippy::cast_possible_truncation)]
        {
            rotation.y = self.rotation_degrees.rem_euclid(360.0) as f32;
        }
        transforms.set_rotation_degrees(self.disc.transform, rotation);
    }

    fn update_sleeve(&mut self, input: &dyn InputState, transforms: &mut TransformTree) {
        if input.was_key_just_pressed(self.toggle_key) {
            self.toggle_sleeve();
        }

        let current = transforms.local_position(self.sleeve.transform);
        let eased = blend(current, self.sleeve_target, self.blend_factor);
        transforms.set_position(self.sleeve.transform, eased);
    }

    fn update_uniforms(&mut self, camera: &Camera, time_seconds: f64) {
        let lighting = &self.lighting;
        #[allow(clippy::cast_possible_truncation)]
        let time = time_seconds as f32;

        for material in [&mut self.label.material, &mut self.disc.material] {
            material.set_vec4(UniformSlot::Color, lighting.color.to_vec4());
            material.set_vec4(UniformSlot::AmbientLight, lighting.ambient_light.to_vec4());
            material.set_vec4(UniformSlot::LightColor, lighting.light_color.to_vec4());
            material.set_vec4(UniformSlot::FogColor, lighting.fog_color.to_vec4());
            material.set_vec3(UniformSlot::LightPosition, lighting.light_position);
            material.set_vec3(UniformSlot::CameraPosition, camera.position);
            material.set_float(UniformSlot::LightIntensity, lighting.light_intensity);
            material.set_float(UniformSlot::SpecularPower, lighting.specular_power);
            material.set_float(UniformSlot::MinFogDistance, lighting.min_fog_distance);
            material.set_float(UniformSlot::MaxFogDistance, lighting.max_fog_distance);
            material.set_float(UniformSlot::Time, time);
        }
    }

    /// Slide the sleeve on if it is off, off if it is on.
    pub fn toggle_sleeve(&mut self) {
        self.sleeve_attached = !self.sleeve_attached;
        self.sleeve_target.x = if self.sleeve_attached {
            0.0
        } else {
            self.sleeve_detached_x
        };
        tracing::debug!(attached = self.sleeve_attached, "Vinyl sleeve toggled");
    }

    /// Change the spin rate the disc eases toward.
    ///
    /// The disc only turns forward: negative or NaN rates clamp to zero.
    pub fn set_target_rotation_rate(&mut self, degrees_per_second: f32) {
        self.target_rotation_rate = degrees_per_second.max(0.0);
    }

    #[must_use]
    pub fn target_rotation_rate(&self) -> f32 {
        self.target_rotation_rate
    }

    /// Current (smoothed) spin rate in degrees per second.
    #[must_use]
    pub fn rotation_rate(&self) -> f32 {
        self.rotation_rate
    }

    /// Total degrees turned since creation.
    #[must_use]
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation_degrees
    }

    #[must_use]
    pub fn is_sleeve_attached(&self) -> bool {
        self.sleeve_attached
    }

    #[must_use]
    pub fn sleeve_target(&self) -> Vector3<f32> {
        self.sleeve_target
    }

    #[must_use]
    pub fn label(&self) -> &VinylPart {
        &self.label
    }

    #[must_use]
    pub fn disc(&self) -> &VinylPart {
        &self.disc
    }

    #[must_use]
    pub fn sleeve(&self) -> &VinylPart {
        &self.sleeve
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{KeyboardState, MeshCache, Rgba};
    use crate::material::UniformValue;

    struct Rig {
        transforms: TransformTree,
        keys: KeyboardState,
        camera: Camera,
        record: VinylRecord,
    }

    impl Rig {
        fn new() -> Self {
            let mut transforms = TransformTree::new();
            let mut meshes = MeshCache::new();
            let record = VinylRecord::new(
                &PropConfig::default(),
                &LightingConfig::default(),
                &mut meshes,
                &mut transforms,
            )
            .expect("prop");
            Self {
                transforms,
                keys: KeyboardState::new(),
                camera: Camera::default(),
                record,
            }
        }

        fn step(&mut self, delta_seconds: f32) {
            let frame = FrameContext {
                delta_seconds,
                time_seconds: 1.5,
                camera: &self.camera,
                input: &self.keys,
            };
            self.record.update(&frame, &mut self.transforms);
            self.keys.end_frame();
        }

        fn sleeve_x(&self) -> f32 {
            self.transforms.local_position(self.record.sleeve().transform).x
        }
    }

    #[test]
    fn initial_layout() {
        let rig = Rig::new();
        let t = &rig.transforms;
        let disc = rig.record.disc().transform;
        let sleeve = rig.record.sleeve().transform;

        assert_eq!(t.local_position(disc), Vector3::new(30.0, 0.0, 30.0));
        assert_eq!(t.get(rig.record.label().transform).parent(), Some(disc));
        assert_eq!(t.get(sleeve).parent(), Some(disc));
        assert!(t.get(sleeve).ignore_parent_rotation);
        assert_eq!(t.rotation_degrees(sleeve), Vector3::new(90.0, 180.0, 0.0));
        assert_eq!(t.get(sleeve).scale, Vector3::new(1.0, 1.0, 0.75));
        assert_eq!(t.local_position(sleeve), Vector3::new(0.0, 0.4, 0.0));
        assert!(rig.record.is_sleeve_attached());
    }

    #[test]
    fn materials_carry_textures() {
        let rig = Rig::new();
        let disc = &rig.record.disc().material;
        assert!(disc.diffuse_texture.as_deref().is_some_and(|p| p.ends_with("45RPMBaseColor.png")));
        assert!(disc.normal_texture.is_some());
        assert!(rig.record.sleeve().material.shader.fragment.ends_with("fixedVertexFormat.frag"));
        assert!(rig.record.label().material.normal_texture.is_none());
    }

    #[test]
    fn rotation_accumulates_monotonically() {
        let mut rig = Rig::new();
        let mut last = rig.record.rotation_degrees();
        for _ in 0..120 {
            rig.step(1.0 / 60.0);
            let now = rig.record.rotation_degrees();
            assert!(now > last);
            last = now;
        }
        // Two seconds at a steady 270°/s.
        assert!((last - 540.0).abs() < 0.5, "turned {last}");
        let yaw = rig.transforms.rotation_degrees(rig.record.disc().transform).y;
        assert!((0.0..360.0).contains(&yaw));
    }

    #[test]
    fn rotation_rate_eases_toward_target() {
        let mut rig = Rig::new();
        rig.record.set_target_rotation_rate(0.0);
        rig.step(0.016);
        let first = rig.record.rotation_rate();
        assert!((first - 243.0).abs() < 1e-3, "rate {first}");
        for _ in 0..200 {
            rig.step(0.016);
        }
        assert!(rig.record.rotation_rate() < 1e-3);
        assert!(rig.record.rotation_rate() >= 0.0);
    }

    #[test]
    fn negative_target_rate_clamps_to_standstill() {
        let mut rig = Rig::new();
        rig.record.set_target_rotation_rate(-90.0);
        assert_eq!(rig.record.target_rotation_rate(), 0.0);

        let mut last = rig.record.rotation_degrees();
        for _ in 0..300 {
            rig.step(0.016);
            let now = rig.record.rotation_degrees();
            assert!(now >= last);
            last = now;
        }
        assert!(rig.record.rotation_rate() >= 0.0);

        rig.record.set_target_rotation_rate(f32::NAN);
        assert_eq!(rig.record.target_rotation_rate(), 0.0);
    }

    #[test]
    fn blend_matches_for_scalars_and_vectors() {
        assert!((blend(270.0f32, 0.0, 0.1) - 243.0).abs() < 1e-4);
        let v = blend(Vector3::new(0.0f32, 0.4, 0.0), Vector3::new(-100.0, 0.4, 0.0), 0.1);
        assert!((v - Vector3::new(-10.0, 0.4, 0.0)).norm() < 1e-4);
    }

    #[test]
    fn toggle_key_eases_sleeve_off_and_back() {
        let mut rig = Rig::new();
        rig.keys.press(KeyCode::from_char('j'));
        rig.step(0.016);

        assert!(!rig.record.is_sleeve_attached());
        assert_eq!(rig.record.sleeve_target().x, -100.0);
        // One tenth of the way, not snapped.
        assert!((rig.sleeve_x() + 10.0).abs() < 1e-4);

        for _ in 0..200 {
            rig.step(0.016);
        }
        assert!((rig.sleeve_x() + 100.0).abs() < 1e-3);

        rig.keys.press(KeyCode::from_char('J'));
        rig.step(0.016);
        assert!(rig.record.is_sleeve_attached());
        assert!(rig.sleeve_x() > -100.0 && rig.sleeve_x() < -80.0);
    }

    #[test]
    fn held_key_does_not_retoggle() {
        let mut rig = Rig::new();
        rig.keys.press(KeyCode::from_char('J'));
        rig.step(0.016);
        // No new edge on the following frames.
        rig.step(0.016);
        rig.step(0.016);
        assert!(!rig.record.is_sleeve_attached());
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut rig = Rig::new();
        rig.keys.press(KeyCode::from_char('K'));
        rig.step(0.016);
        assert!(rig.record.is_sleeve_attached());
        assert!((rig.sleeve_x()).abs() < 1e-6);
    }

    #[test]
    fn lit_materials_get_frame_uniforms() {
        let mut rig = Rig::new();
        rig.camera.position = Vector3::new(1.0, 2.0, 3.0);
        rig.step(0.016);

        for material in [&rig.record.label().material, &rig.record.disc().material] {
            assert_eq!(material.bound_uniforms().count(), UniformSlot::COUNT);
            assert_eq!(
                material.uniform(UniformSlot::CameraPosition),
                Some(UniformValue::Vec3(Vector3::new(1.0, 2.0, 3.0)))
            );
            assert_eq!(
                material.uniform(UniformSlot::FogColor),
                Some(UniformValue::Vec4(Rgba::BLUE.to_vec4()))
            );
            assert_eq!(
                material.uniform(UniformSlot::LightIntensity),
                Some(UniformValue::Float(150.0))
            );
            assert_eq!(material.uniform(UniformSlot::Time), Some(UniformValue::Float(1.5)));
        }
        assert_eq!(rig.record.sleeve().material.bound_uniforms().count(), 0);
    }

    #[test]
    fn scene_registration_order() {
        let rig = Rig::new();
        let mut scene = Scene::new();
        rig.record.add_to_scene(&mut scene);
        let names: Vec<_> = scene.renderables().iter().map(|r| r.name).collect();
        assert_eq!(names, ["vinyl_label", "vinyl_disc", "vinyl_sleeve"]);
    }

    #[test]
    fn missing_mesh_fails_construction() {
        let mut transforms = TransformTree::new();
        let mut meshes = MeshCache::new();
        let config = PropConfig::default();
        meshes.mark_missing(config.assets.sleeve_mesh.clone());
        let err = VinylRecord::new(&config, &LightingConfig::default(), &mut meshes, &mut transforms)
            .expect_err("sleeve mesh missing");
        assert!(matches!(err, EngineError::MeshLoad { .. }));
        assert!(transforms.is_empty());
    }
}
