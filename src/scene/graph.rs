//! Scene graph: CPU-side hierarchy of nodes.
//!
//! The scene graph organizes groups, meshes and point clouds under a single
//! root. Each frame, `flatten()` walks the tree and produces a flat
//! `Vec<DrawItem>` in insertion order that the renderer consumes directly.

use std::collections::HashMap;

use glam::Mat4;

use super::flatten::{DrawItem, DrawKind};
use super::node::{LocalTransform, NodeContent, SceneNode, SceneNodeId};

/// CPU-side scene graph. Nodes are only ever added, never removed.
pub struct SceneGraph {
    nodes: HashMap<SceneNodeId, SceneNode>,
    root: SceneNodeId,
    next_id: u64,
}

impl SceneGraph {
    /// Create a new scene graph with a root Group node.
    pub fn new() -> Self {
        let root_id = SceneNodeId(0);
        let root_node = SceneNode::new(root_id, "root", NodeContent::Group);

        let mut nodes = HashMap::new();
        nodes.insert(root_id, root_node);

        Self {
            nodes,
            root: root_id,
            next_id: 1,
        }
    }

    /// Get the root node ID.
    pub fn root(&self) -> SceneNodeId {
        self.root
    }

    /// Allocate a fresh node ID.
    fn alloc_id(&mut self) -> SceneNodeId {
        let id = SceneNodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a child node under `parent`. Returns the new node's ID.
    pub fn add_child(
        &mut self,
        parent: SceneNodeId,
        name: impl Into<String>,
        content: NodeContent,
    ) -> SceneNodeId {
        let id = self.alloc_id();
        let mut node = SceneNode::new(id, name, content);
        node.parent = Some(parent);

        self.nodes.insert(id, node);

        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }

        id
    }

    /// Set the local transform of a node.
    pub fn set_transform(&mut self, id: SceneNodeId, transform: LocalTransform) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local_transform = transform;
        }
    }

    /// Mutable access to a node's local transform.
    pub fn transform_mut(&mut self, id: SceneNodeId) -> Option<&mut LocalTransform> {
        self.nodes.get_mut(&id).map(|n| &mut n.local_transform)
    }

    /// Get an immutable reference to a node.
    pub fn get(&self, id: SceneNodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Iterate over the children of a node.
    pub fn children(&self, id: SceneNodeId) -> impl Iterator<Item = SceneNodeId> + '_ {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    /// Total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Walk the tree, propagate transforms, and collect every drawable node.
    pub fn flatten(&mut self) -> Vec<DrawItem> {
        self.propagate_transforms(self.root, Mat4::IDENTITY);

        let mut out = Vec::new();
        self.collect_drawables(self.root, &mut out);
        out
    }

    /// Recursively propagate world transforms.
    fn propagate_transforms(&mut self, node_id: SceneNodeId, parent_world: Mat4) {
        let (local_mat, children) = {
            let node = match self.nodes.get(&node_id) {
                Some(n) => n,
                None => return,
            };
            (node.local_transform.to_mat4(), node.children.clone())
        };

        let world = parent_world * local_mat;

        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.world_transform = world;
        }

        for child_id in children {
            self.propagate_transforms(child_id, world);
        }
    }

    /// Recursively collect drawables, parents before children.
    fn collect_drawables(&self, node_id: SceneNodeId, out: &mut Vec<DrawItem>) {
        let node = match self.nodes.get(&node_id) {
            Some(n) => n,
            None => return,
        };

        let kind = match &node.content {
            NodeContent::Group => None,
            NodeContent::Mesh { mesh, material } => Some(DrawKind::Mesh {
                mesh: mesh.clone(),
                material: *material,
            }),
            NodeContent::Points { cloud, material } => Some(DrawKind::Points {
                cloud: cloud.clone(),
                material: *material,
            }),
        };

        if let Some(kind) = kind {
            out.push(DrawItem {
                node: node_id,
                world: node.world_transform,
                kind,
            });
        }

        for &child_id in &node.children {
            self.collect_drawables(child_id, out);
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
