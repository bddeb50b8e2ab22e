//! # Scene Engine
//!
//! A scene entity/property system for frame-driven hosts.
//!
//! ## Features
//!
//! - **Nodes**: named, uniquely-identified scene entities carrying a spatial
//!   transform and an ordered set of behavior properties
//! - **Properties**: polymorphic per-node behavior modules with a
//!   load/save/start/update lifecycle
//! - **Property Factory**: string-keyed registration table for constructing
//!   properties during scene decode
//! - **Scene Persistence**: human-readable RON scene files that round-trip
//!   the full node/property graph
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_engine::prelude::*;
//!
//! # fn main() -> Result<(), SceneError> {
//! let mut registry = NodeRegistry::new();
//! let camera = registry.spawn("Camera", Transform::default())?;
//!
//! registry.start();
//! registry.update(); // once per frame tick
//!
//! assert!(registry.node_by_id(camera).is_some());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, HostConfig},
        foundation::math::{Transform, Vec3},
        scene::{
            Node, NodeId, NodeRegistry, Property, PropertyContext, PropertyFactory,
            PropertyFragment, SceneCommands, SceneError,
        },
    };
}
