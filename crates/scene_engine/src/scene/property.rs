//! Property trait: polymorphic per-node behavior with a
//! load/save/start/update lifecycle

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::foundation::math::Transform;

use super::error::SceneError;
use super::node::NodeId;
use super::registry::SceneCommands;

/// Opaque, property-specific document fragment.
///
/// The codec treats fragments as black boxes; only the owning property
/// knows their schema. Fragments are self-describing trees (maps with
/// string keys, sequences, scalars); see [`from_fragment`] and
/// [`to_fragment`] for the usual typed conversions.
pub type PropertyFragment = serde_json::Value;

/// A polymorphic unit of per-node behavior.
///
/// A property belongs to exactly one node for its entire lifetime. It is
/// created through the [`PropertyFactory`], bound to its owner's
/// [`NodeId`] at construction, and destroyed with the node.
///
/// `start` runs once at scene activation, `update` once per frame tick;
/// both receive a [`PropertyContext`] granting access to the owning
/// node's transform and the deferred command queue. Structural registry
/// changes (adding or deleting nodes) requested from these hooks are
/// buffered and applied at the tick boundary, never mid-iteration.
///
/// [`PropertyFactory`]: super::factory::PropertyFactory
pub trait Property: Send + Sync {
    /// The type tag used for factory lookup and serialization.
    fn type_name(&self) -> &'static str;

    /// Populate the property from its scene-file fragment.
    fn load(&mut self, fragment: &PropertyFragment) -> Result<(), SceneError>;

    /// Produce the scene-file fragment for this property.
    fn save(&self) -> Result<PropertyFragment, SceneError>;

    /// One-time lifecycle hook, invoked at scene activation.
    fn start(&mut self, ctx: &mut PropertyContext<'_>) {
        let _ = ctx;
    }

    /// Per-frame lifecycle hook.
    fn update(&mut self, ctx: &mut PropertyContext<'_>) {
        let _ = ctx;
    }
}

/// Per-hook view of the owning node handed to [`Property::start`] and
/// [`Property::update`].
pub struct PropertyContext<'a> {
    node_id: NodeId,
    node_key: &'a str,
    /// The owning node's transform, mutable for the duration of the hook.
    pub transform: &'a mut Transform,
    commands: &'a mut SceneCommands,
}

impl<'a> PropertyContext<'a> {
    pub(crate) fn new(
        node_id: NodeId,
        node_key: &'a str,
        transform: &'a mut Transform,
        commands: &'a mut SceneCommands,
    ) -> Self {
        Self {
            node_id,
            node_key,
            transform,
            commands,
        }
    }

    /// Id of the owning node
    #[must_use]
    pub const fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// Key of the owning node
    #[must_use]
    pub const fn node_key(&self) -> &str {
        self.node_key
    }

    /// Deferred structural changes; applied at the next tick boundary
    pub fn commands(&mut self) -> &mut SceneCommands {
        self.commands
    }
}

/// Decode a typed value out of a property fragment.
///
/// # Errors
///
/// Returns [`SceneError::Fragment`] when the fragment does not match `T`.
pub fn from_fragment<T: DeserializeOwned>(fragment: &PropertyFragment) -> Result<T, SceneError> {
    Ok(serde_json::from_value(fragment.clone())?)
}

/// Encode a typed value into a property fragment.
///
/// # Errors
///
/// Returns [`SceneError::Fragment`] when `T` cannot be represented as a
/// fragment.
pub fn to_fragment<T: Serialize>(value: &T) -> Result<PropertyFragment, SceneError> {
    Ok(serde_json::to_value(value)?)
}
