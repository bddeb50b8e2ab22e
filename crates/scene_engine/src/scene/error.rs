//! Error taxonomy for the scene data model, registry, and codec

use thiserror::Error;

/// Errors produced by scene operations.
///
/// Lookup misses (`node_by_key`, `node_by_id`, `node_at`) are not errors;
/// they surface as `Option` and the caller decides. Everything that can
/// actually fail an operation lands here.
#[derive(Debug, Error)]
pub enum SceneError {
    /// A node was rejected by the registry.
    #[error("invalid node: {0}")]
    InvalidNode(String),

    /// A property type tag had no registered constructor.
    ///
    /// During scene decode this is recovered locally: the single property
    /// entry is logged and skipped, the rest of the scene still loads.
    #[error("unknown property type '{0}'")]
    UnknownPropertyType(String),

    /// The scene document lacks the required top-level `nodes` section.
    #[error("scene document has no 'nodes' section")]
    MissingNodes,

    /// The scene text could not be parsed as a RON document.
    #[error("scene parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// The scene document could not be serialized.
    #[error("scene serialize error: {0}")]
    Serialize(#[from] ron::Error),

    /// A property fragment did not convert to or from its typed form.
    #[error("property fragment error: {0}")]
    Fragment(#[from] serde_json::Error),

    /// The scene file could not be read or written.
    #[error("scene io error: {0}")]
    Io(#[from] std::io::Error),

    /// A save was requested before any scene file path was recorded.
    #[error("no current scene file to save to")]
    NoCurrentFile,
}
