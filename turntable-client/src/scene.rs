//! Transform hierarchy and scene registration.
//!
//! Transforms live in a [`TransformTree`] arena and refer to each other by
//! [`TransformId`]. A child's world rotation is its parent's world rotation
//! composed with its own, unless the child ignores parent rotation. Scale is
//! local to each node and is not inherited.

use nalgebra::{UnitQuaternion, Vector3};

use crate::engine::MeshHandle;

/// Index of a transform in its [`TransformTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransformId(usize);

/// One node of the hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    /// Euler angles in degrees about the x, y and z axes. The world is y-up,
    /// so the y component is yaw.
    pub rotation_degrees: Vector3<f32>,
    pub scale: Vector3<f32>,
    pub ignore_parent_rotation: bool,
    parent: Option<TransformId>,
    children: Vec<TransformId>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation_degrees: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            ignore_parent_rotation: false,
            parent: None,
            children: Vec::new(),
        }
    }
}

impl Transform {
    #[must_use]
    pub fn parent(&self) -> Option<TransformId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[TransformId] {
        &self.children
    }

    /// Local rotation as a quaternion.
    #[must_use]
    pub fn local_rotation(&self) -> UnitQuaternion<f32> {
        let r = self.rotation_degrees.map(f32::to_radians);
        UnitQuaternion::from_euler_angles(r.x, r.y, r.z)
    }
}

/// Arena of transforms.
#[derive(Debug, Default)]
pub struct TransformTree {
    nodes: Vec<Transform>,
}

impl TransformTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root transform at the origin.
    pub fn insert(&mut self) -> TransformId {
        self.nodes.push(Transform::default());
        TransformId(self.nodes.len() - 1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// # Panics
    ///
    /// Panics if `id` came from a different tree.
    #[must_use]
    pub fn get(&self, id: TransformId) -> &Transform {
        &self.nodes[id.0]
    }

    /// # Panics
    ///
    /// Panics if `id` came from a different tree.
    pub fn get_mut(&mut self, id: TransformId) -> &mut Transform {
        &mut self.nodes[id.0]
    }

    /// Attach `child` under `parent`, detaching it from any previous parent.
    ///
    /// Attaching a node under itself or one of its descendants is ignored.
    pub fn add_child(&mut self, parent: TransformId, child: TransformId) {
        if self.is_ancestor_or_self(child, parent) {
            tracing::warn!(?parent, ?child, "Refusing to create a transform cycle");
            return;
        }
        if let Some(old) = self.nodes[child.0].parent.take() {
            self.nodes[old.0].children.retain(|&c| c != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn is_ancestor_or_self(&self, ancestor: TransformId, mut node: TransformId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.nodes[node.0].parent {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    pub fn set_position(&mut self, id: TransformId, position: Vector3<f32>) {
        self.nodes[id.0].position = position;
    }

    #[must_use]
    pub fn local_position(&self, id: TransformId) -> Vector3<f32> {
        self.nodes[id.0].position
    }

    pub fn set_rotation_degrees(&mut self, id: TransformId, degrees: Vector3<f32>) {
        self.nodes[id.0].rotation_degrees = degrees;
    }

    #[must_use]
    pub fn rotation_degrees(&self, id: TransformId) -> Vector3<f32> {
        self.nodes[id.0].rotation_degrees
    }

    pub fn set_scale(&mut self, id: TransformId, scale: Vector3<f32>) {
        self.nodes[id.0].scale = scale;
    }

    /// Stop inheriting the parent's rotation (position is still inherited).
    pub fn ignore_parent_rotation(&mut self, id: TransformId) {
        self.nodes[id.0].ignore_parent_rotation = true;
    }

    /// Rotation in world space.
    #[must_use]
    pub fn world_rotation(&self, id: TransformId) -> UnitQuaternion<f32> {
        let node = &self.nodes[id.0];
        match node.parent {
            Some(parent) if !node.ignore_parent_rotation => {
                self.world_rotation(parent) * node.local_rotation()
            }
            _ => node.local_rotation(),
        }
    }

    /// Position in world space. The local offset is rotated by the parent's
    /// world rotation unless the node ignores parent rotation.
    #[must_use]
    pub fn world_position(&self, id: TransformId) -> Vector3<f32> {
        let node = &self.nodes[id.0];
        match node.parent {
            Some(parent) if node.ignore_parent_rotation => {
                self.world_position(parent) + node.position
            }
            Some(parent) => {
                self.world_position(parent) + self.world_rotation(parent) * node.position
            }
            None => node.position,
        }
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// A drawable registered with a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderable {
    pub name: &'static str,
    pub transform: TransformId,
    pub mesh: MeshHandle,
}

/// The set of renderables drawn each frame, in registration order.
#[derive(Debug, Default)]
pub struct Scene {
    renderables: Vec<Renderable>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, renderable: Renderable) {
        self.renderables.push(renderable);
    }

    #[must_use]
    pub fn renderables(&self) -> &[Renderable] {
        &self.renderables
    }
}
