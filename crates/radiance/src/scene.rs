//! # Scene — Node Hierarchy, Meshes, and Lights
//!
//! A [`Scene`] is an arena of [`Node`]s addressed by [`NodeId`] handles. Each
//! node has a local [`Transform`], a visibility flag, one optional parent, and
//! any number of children. A node is either a [`NodeKind::Group`] (a pure
//! container) or a [`NodeKind::Mesh`] with a [`Shape`] and a [`Material`].
//!
//! ## Handles Instead of Names
//!
//! Every `add_*` call returns the new node's [`NodeId`]. Callers keep the
//! handle and use it directly later; nodes carry a name for logging, but
//! nothing looks them up by it.
//!
//! ## Transform and Visibility Propagation
//!
//! ```text
//! root (Group)
//!  ├── plane (Mesh)
//!  ├── cube (Mesh)
//!  └── local-probes (Group)      ← translation follows the camera
//!       ├── probe (Mesh)         ← world = group.world * probe.local
//!       └── ...
//! ```
//!
//! A node's world matrix is its parent's world matrix times its own local
//! matrix. A node is drawn only if it and every ancestor are visible, so
//! hiding a group hides its whole subtree. [`Scene::visible_meshes`] walks the
//! tree breadth-first so parents are always resolved before their children.

use std::collections::VecDeque;

use crate::math::{Color, Mat4, Transform, Vec3};

/// Handle to a node in a [`Scene`]. Lightweight and `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Built-in mesh shapes. Sizes are in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned box centered at the origin.
    Box { width: f32, height: f32, depth: f32 },
    /// Rectangle on the XY plane facing +Z.
    Plane { width: f32, height: f32 },
    /// UV sphere centered at the origin.
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
}

/// Metallic-roughness surface description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Base color (linear RGBA). Alpha is ignored.
    pub base_color: Color,
    /// 0 = dielectric, 1 = metal.
    pub metallic: f32,
    /// 0 = mirror-smooth, 1 = fully rough.
    pub roughness: f32,
    /// Sample the reflection capture cube map for this surface.
    pub env_map: bool,
}

impl Material {
    /// A fully rough dielectric of the given color.
    pub fn color(base_color: Color) -> Self {
        Self {
            base_color,
            ..Default::default()
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: Color::WHITE,
            metallic: 0.0,
            roughness: 1.0,
            env_map: false,
        }
    }
}

/// What a node is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    Group,
    Mesh { shape: Shape, material: Material },
}

/// One entry in the scene hierarchy.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub visible: bool,
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Constant light applied to every surface regardless of orientation.
#[derive(Debug, Clone, Copy)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 0.1,
        }
    }
}

/// A directional light (like the sun). Only direction matters.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    /// Direction the light is shining *toward*.
    pub direction: Vec3,
    pub color: Color,
    pub intensity: f32,
}

impl DirectionalLight {
    /// A light placed at `position` shining toward the origin.
    pub fn from_position(position: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            direction: (-position).normalize_or(Vec3::NEG_Y),
            color,
            intensity,
        }
    }
}

/// A drawable mesh resolved to world space.
#[derive(Debug, Clone, Copy)]
pub struct MeshInstance {
    pub node: NodeId,
    pub world: Mat4,
    pub shape: Shape,
    pub material: Material,
}

/// The scene: node arena plus scene-wide lights.
pub struct Scene {
    nodes: Vec<Node>,
    root: NodeId,
    pub ambient: AmbientLight,
    pub directional: Option<DirectionalLight>,
}

impl Scene {
    /// Create an empty scene containing only the root group.
    pub fn new() -> Self {
        let root = Node {
            name: "root".to_string(),
            transform: Transform::IDENTITY,
            visible: true,
            kind: NodeKind::Group,
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            ambient: AmbientLight::default(),
            directional: None,
        }
    }

    /// The root group. Every other node descends from it.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Total number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root node exists for the scene's whole life.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add an empty group under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this scene.
    pub fn add_group(&mut self, parent: NodeId, name: &str) -> NodeId {
        self.push(parent, name, Transform::IDENTITY, NodeKind::Group)
    }

    /// Add a mesh under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this scene.
    pub fn add_mesh(
        &mut self,
        parent: NodeId,
        name: &str,
        shape: Shape,
        material: Material,
        transform: Transform,
    ) -> NodeId {
        self.push(parent, name, transform, NodeKind::Mesh { shape, material })
    }

    fn push(&mut self, parent: NodeId, name: &str, transform: Transform, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes[parent.0].children.push(id);
        self.nodes.push(Node {
            name: name.to_string(),
            transform,
            visible: true,
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Set a node's own visibility flag. Returns `false` for an unknown handle.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> bool {
        match self.nodes.get_mut(id.0) {
            Some(node) => {
                node.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Move a node. Returns `false` for an unknown handle.
    pub fn set_translation(&mut self, id: NodeId, translation: Vec3) -> bool {
        match self.nodes.get_mut(id.0) {
            Some(node) => {
                node.transform.translation = translation;
                true
            }
            None => false,
        }
    }

    /// World matrix of a node: the product of all ancestor local matrices.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.nodes.get(id.0)?;
        let mut matrix = node.transform.matrix();
        while let Some(parent) = node.parent {
            node = &self.nodes[parent.0];
            matrix = node.transform.matrix() * matrix;
        }
        Some(matrix)
    }

    /// World-space position of a node's origin.
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.col(3).truncate())
    }

    /// `true` if the node and all of its ancestors are visible.
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(id) = current {
            match self.nodes.get(id.0) {
                Some(node) if node.visible => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Collect every mesh that should be drawn this frame.
    ///
    /// Breadth-first from the root, carrying the parent's world matrix down.
    /// Hidden nodes prune their whole subtree.
    pub fn visible_meshes(&self) -> Vec<MeshInstance> {
        let mut out = Vec::new();
        let mut queue: VecDeque<(NodeId, Mat4)> = VecDeque::new();
        queue.push_back((self.root, Mat4::IDENTITY));

        while let Some((id, parent_matrix)) = queue.pop_front() {
            let node = &self.nodes[id.0];
            if !node.visible {
                continue;
            }
            let world = parent_matrix * node.transform.matrix();

            if let NodeKind::Mesh { shape, material } = node.kind {
                out.push(MeshInstance {
                    node: id,
                    world,
                    shape,
                    material,
                });
            }

            for &child in &node.children {
                queue.push_back((child, world));
            }
        }

        out
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Shape {
        Shape::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        }
    }

    #[test]
    fn new_scene_has_only_root() {
        let scene = Scene::new();
        assert_eq!(scene.len(), 1);
        assert!(scene.node(scene.root()).unwrap().children().is_empty());
        assert!(scene.visible_meshes().is_empty());
    }

    #[test]
    fn child_inherits_parent_translation() {
        let mut scene = Scene::new();
        let group = scene.add_group(scene.root(), "group");
        scene.set_translation(group, Vec3::new(100.0, 0.0, 0.0));
        let child = scene.add_mesh(
            group,
            "child",
            unit_box(),
            Material::default(),
            Transform::from_xyz(10.0, 0.0, 0.0),
        );

        let pos = scene.world_position(child).unwrap();
        assert!((pos.x - 110.0).abs() < 1e-4);
        assert_eq!(scene.node(child).unwrap().parent(), Some(group));
    }

    #[test]
    fn moving_group_moves_children() {
        let mut scene = Scene::new();
        let group = scene.add_group(scene.root(), "group");
        let child = scene.add_mesh(
            group,
            "child",
            unit_box(),
            Material::default(),
            Transform::from_xyz(5.0, 0.0, 0.0),
        );

        scene.set_translation(group, Vec3::new(50.0, 0.0, -1.0));

        let meshes = scene.visible_meshes();
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].node, child);
        let col3 = meshes[0].world.col(3);
        assert!((col3.x - 55.0).abs() < 1e-4);
        assert!((col3.z + 1.0).abs() < 1e-4);
    }

    #[test]
    fn hidden_group_prunes_subtree() {
        let mut scene = Scene::new();
        let group = scene.add_group(scene.root(), "group");
        let inner = scene.add_mesh(group, "a", unit_box(), Material::default(), Transform::IDENTITY);
        scene.add_mesh(scene.root(), "b", unit_box(), Material::default(), Transform::IDENTITY);

        scene.set_visible(group, false);

        assert!(!scene.is_effectively_visible(inner));
        assert!(scene.node(inner).unwrap().visible);
        assert_eq!(scene.visible_meshes().len(), 1);
    }

    #[test]
    fn hidden_mesh_is_skipped() {
        let mut scene = Scene::new();
        let a = scene.add_mesh(scene.root(), "a", unit_box(), Material::default(), Transform::IDENTITY);
        scene.add_mesh(scene.root(), "b", unit_box(), Material::default(), Transform::IDENTITY);

        scene.set_visible(a, false);

        let meshes = scene.visible_meshes();
        assert_eq!(meshes.len(), 1);
        assert_ne!(meshes[0].node, a);
    }

    #[test]
    fn unknown_handle_is_ignored() {
        let mut scene = Scene::new();
        let stale = NodeId(42);
        assert!(!scene.set_visible(stale, false));
        assert!(!scene.set_translation(stale, Vec3::ONE));
        assert!(scene.world_matrix(stale).is_none());
        assert!(!scene.is_effectively_visible(stale));
    }

    #[test]
    fn directional_light_points_at_origin() {
        let light = DirectionalLight::from_position(Vec3::new(5.0, 5.0, 5.0), Color::WHITE, 1.0);
        let expected = Vec3::new(-1.0, -1.0, -1.0).normalize();
        assert!((light.direction - expected).length() < 1e-5);
    }
}
