//! Node registry: the owning collection and lifecycle driver for all
//! nodes in a scene
//!
//! The registry is an explicitly constructed instance; the host owns it
//! and passes it to the frame loop and to load/save actions. It runs
//! single-threaded and frame-driven: `start` once at scene activation,
//! `update` once per rendered tick, file IO outside the frame loop.

use std::path::{Path, PathBuf};

use crate::foundation::math::Transform;

use super::codec;
use super::error::SceneError;
use super::factory::PropertyFactory;
use super::node::{Node, NodeId};
use super::property::PropertyContext;

/// A deferred structural change to the registry.
#[derive(Debug)]
enum SceneCommand {
    Add(Node),
    Delete(NodeId),
}

/// Buffer of structural changes requested during `start`/`update`.
///
/// Properties must not mutate the node collection while it is being
/// iterated; instead they queue changes here and the registry applies
/// them at the tick boundary, after the iteration completes.
#[derive(Debug, Default)]
pub struct SceneCommands {
    queue: Vec<SceneCommand>,
}

impl SceneCommands {
    /// Queue a node for insertion at the next tick boundary
    pub fn add_node(&mut self, node: Node) {
        self.queue.push(SceneCommand::Add(node));
    }

    /// Queue a node for deletion at the next tick boundary
    pub fn delete_node(&mut self, id: NodeId) {
        self.queue.push(SceneCommand::Delete(id));
    }

    /// Number of pending commands
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no commands are pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Which lifecycle hook a driver pass invokes.
#[derive(Clone, Copy)]
enum Phase {
    Start,
    Update,
}

/// The owning collection and lifecycle driver for all nodes in a scene.
///
/// Node order is insertion order and is also update order; it is stable
/// across `update` calls unless explicitly mutated. Indices shift on
/// deletion and are not stable identifiers; [`NodeId`]s are.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: Vec<Node>,
    next_id: u64,
    current_path: Option<PathBuf>,
}

impl NodeRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node, assigning its process-unique id.
    ///
    /// Returns the node's index. Indices shift down on deletion; hold on
    /// to the [`NodeId`] for a stable handle.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidNode`] for a node with an empty key;
    /// the registry is left unchanged.
    pub fn add_node(&mut self, mut node: Node) -> Result<usize, SceneError> {
        if node.key().is_empty() {
            return Err(SceneError::InvalidNode("empty key".to_owned()));
        }

        if node.id() == NodeId::UNASSIGNED {
            node.set_id(NodeId::new(self.next_id));
            self.next_id += 1;
        } else {
            // Preserved id (decode path or re-insertion): keep the
            // allocator ahead of it.
            self.next_id = self.next_id.max(node.id().raw() + 1);
        }

        log::info!("added node '{}' (id {}) to registry", node.key(), node.id());
        self.nodes.push(node);
        Ok(self.nodes.len() - 1)
    }

    /// Create and append a node in one step, returning its id.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidNode`] for an empty key.
    pub fn spawn(
        &mut self,
        key: impl Into<String>,
        transform: Transform,
    ) -> Result<NodeId, SceneError> {
        let index = self.add_node(Node::new(key, transform))?;
        Ok(self.nodes[index].id())
    }

    /// Remove the node at `index`, shifting subsequent indices down.
    ///
    /// Returns `false` and leaves the registry unchanged when `index` is
    /// out of range. The node's properties are destroyed with it.
    pub fn delete_node(&mut self, index: usize) -> bool {
        if index >= self.nodes.len() {
            return false;
        }

        let node = self.nodes.remove(index);
        log::info!(
            "removed node '{}' (id {}) from registry",
            node.key(),
            node.id()
        );
        true
    }

    /// Get the node at `index`, if in range
    #[must_use]
    pub fn node_at(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Get the node at `index` mutably, if in range
    pub fn node_at_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.nodes.get_mut(index)
    }

    /// Find the first node with the given key.
    ///
    /// Keys are not unique; with duplicates the first-inserted node wins.
    #[must_use]
    pub fn node_by_key(&self, key: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.key() == key)
    }

    /// Find the first node with the given key, mutably
    pub fn node_by_key_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.key() == key)
    }

    /// Find a node by its immutable id
    #[must_use]
    pub fn node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    /// Find a node by its immutable id, mutably
    pub fn node_by_id_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.id() == id)
    }

    /// Remove and destroy all nodes and, transitively, their properties
    pub fn clear(&mut self) {
        let count = self.nodes.len();
        self.nodes.clear();
        log::info!("cleared {count} nodes from registry");
    }

    /// Number of nodes in the registry
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the registry holds no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate nodes in registry (update) order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Path of the most recently loaded or saved scene file
    #[must_use]
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// One-time lifecycle hook: invoke `start` on every property of every
    /// node, in node order then property order.
    ///
    /// Intended to be called exactly once per scene activation; the hook
    /// is not guaranteed idempotent.
    pub fn start(&mut self) {
        self.run_phase(Phase::Start);
    }

    /// Per-tick lifecycle hook: invoke `update` on every property of
    /// every node, in the same fixed order.
    ///
    /// Structural changes queued by properties through
    /// [`PropertyContext::commands`] are applied after the iteration,
    /// at the tick boundary.
    pub fn update(&mut self) {
        self.run_phase(Phase::Update);
    }

    fn run_phase(&mut self, phase: Phase) {
        let mut commands = SceneCommands::default();

        for node in &mut self.nodes {
            let parts = node.parts_mut();
            for property in parts.properties.iter_mut() {
                let mut ctx = PropertyContext::new(
                    parts.id,
                    parts.key,
                    &mut *parts.transform,
                    &mut commands,
                );
                match phase {
                    Phase::Start => property.start(&mut ctx),
                    Phase::Update => property.update(&mut ctx),
                }
            }
        }

        self.apply_commands(commands);
    }

    fn apply_commands(&mut self, commands: SceneCommands) {
        for command in commands.queue {
            match command {
                SceneCommand::Add(node) => {
                    if let Err(err) = self.add_node(node) {
                        log::warn!("dropping deferred node insertion: {err}");
                    }
                }
                SceneCommand::Delete(id) => match self.nodes.iter().position(|n| n.id() == id) {
                    Some(index) => {
                        self.delete_node(index);
                    }
                    None => log::debug!("deferred delete of id {id}: node already gone"),
                },
            }
        }
    }

    /// Load a scene, replacing the registry contents.
    ///
    /// On success the registry holds exactly the nodes from the file,
    /// with their file ids reinstated as runtime ids, and `path` is
    /// recorded as the current scene file. On any failure the registry
    /// is left untouched.
    ///
    /// Property entries whose type is not registered in `factory` are
    /// logged and skipped; the rest of the scene still loads.
    ///
    /// # Errors
    ///
    /// [`SceneError::Io`] when the file cannot be read,
    /// [`SceneError::Parse`] when it is not a valid scene document, and
    /// [`SceneError::MissingNodes`] when the required top-level `nodes`
    /// section is absent.
    pub fn load_from_file(
        &mut self,
        path: impl AsRef<Path>,
        factory: &PropertyFactory,
    ) -> Result<(), SceneError> {
        let path = path.as_ref();
        log::info!("loading scene from {}", path.display());

        let text = std::fs::read_to_string(path)?;
        let nodes = codec::decode(&text, factory)?;

        self.next_id = nodes
            .iter()
            .map(|node| node.id().raw())
            .max()
            .map_or(0, |max| max + 1);
        self.nodes = nodes;
        self.current_path = Some(path.to_path_buf());

        log::info!("loaded {} nodes from {}", self.len(), path.display());
        Ok(())
    }

    /// Save the scene to the current scene file.
    ///
    /// # Errors
    ///
    /// [`SceneError::NoCurrentFile`] when no scene file path has been
    /// recorded; otherwise any encode or write failure. No partial-file
    /// guarantee is made on write failure.
    pub fn save_to_file(&self) -> Result<(), SceneError> {
        let path = self
            .current_path
            .clone()
            .ok_or(SceneError::NoCurrentFile)?;
        self.write_scene(&path)
    }

    /// Save the scene to `path` and record it as the current scene file.
    ///
    /// # Errors
    ///
    /// Any encode or write failure.
    pub fn save_to_path(&mut self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref().to_path_buf();
        self.write_scene(&path)?;
        self.current_path = Some(path);
        Ok(())
    }

    fn write_scene(&self, path: &Path) -> Result<(), SceneError> {
        let text = codec::encode(&self.nodes)?;
        std::fs::write(path, text)?;
        log::info!("saved {} nodes to {}", self.len(), path.display());
        Ok(())
    }
}
