//! Scene data model: nodes, properties, the factory, the registry, and
//! the file codec
//!
//! The [`NodeRegistry`] owns every [`Node`] in the active scene and
//! drives the property lifecycle. Properties are constructed by type
//! name through the [`PropertyFactory`] when a scene file is decoded,
//! and each node's property list round-trips through the RON scene
//! format in [`codec`].

pub mod codec;
pub mod error;
pub mod factory;
pub mod node;
pub mod property;
pub mod registry;

pub use error::SceneError;
pub use factory::{PropertyConstructor, PropertyFactory};
pub use node::{Node, NodeId};
pub use property::{from_fragment, to_fragment, Property, PropertyContext, PropertyFragment};
pub use registry::{NodeRegistry, SceneCommands};
