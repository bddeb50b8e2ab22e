//! Scene node: a named entity owning a transform and an ordered set of
//! properties

use std::fmt;

use crate::foundation::math::Transform;

use super::property::Property;

/// Process-unique node identifier
///
/// Assigned by the registry at insertion and immutable for the node's
/// lifetime. This is the external identity used in scene files; properties
/// hold it as a handle instead of a back-pointer to the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Sentinel for nodes not yet inserted into a registry.
    pub(crate) const UNASSIGNED: Self = Self(u64::MAX);

    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw id value
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A scene entity
///
/// A node exclusively owns its properties; they are destroyed with it and
/// are never reparented. Property insertion order is update order within
/// the node.
pub struct Node {
    id: NodeId,
    key: String,
    transform: Transform,
    properties: Vec<Box<dyn Property>>,
}

impl Node {
    /// Create an unregistered node.
    ///
    /// The id is assigned by [`NodeRegistry::add_node`] on insertion.
    ///
    /// [`NodeRegistry::add_node`]: super::registry::NodeRegistry::add_node
    #[must_use]
    pub fn new(key: impl Into<String>, transform: Transform) -> Self {
        Self {
            id: NodeId::UNASSIGNED,
            key: key.into(),
            transform,
            properties: Vec::new(),
        }
    }

    /// Build a node with a known id (scene decode path).
    pub(crate) fn with_id(id: NodeId, key: String, transform: Transform) -> Self {
        Self {
            id,
            key,
            transform,
            properties: Vec::new(),
        }
    }

    /// The node's immutable identifier
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: NodeId) {
        self.id = id;
    }

    /// Human-readable name; not guaranteed unique across the registry
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The node's spatial transform
    #[must_use]
    pub const fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Mutable access to the node's spatial transform
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Append a property; insertion order determines update order
    pub fn push_property(&mut self, property: Box<dyn Property>) {
        self.properties.push(property);
    }

    /// Iterate the node's properties in update order
    pub fn properties(&self) -> impl Iterator<Item = &dyn Property> {
        self.properties.iter().map(AsRef::as_ref)
    }

    /// Number of properties owned by this node
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Split the node into disjoint borrows for the lifecycle driver.
    pub(crate) fn parts_mut(&mut self) -> NodeParts<'_> {
        NodeParts {
            id: self.id,
            key: &self.key,
            transform: &mut self.transform,
            properties: &mut self.properties,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("transform", &self.transform)
            .field("properties", &self.properties.len())
            .finish()
    }
}

/// Disjoint field borrows of a [`Node`], so the registry can hand a
/// property mutable access to its owner's transform while iterating the
/// property list.
pub(crate) struct NodeParts<'a> {
    pub id: NodeId,
    pub key: &'a str,
    pub transform: &'a mut Transform,
    pub properties: &'a mut Vec<Box<dyn Property>>,
}
