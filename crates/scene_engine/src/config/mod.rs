//! Configuration system
//!
//! Host-side settings load from TOML or RON files, chosen by extension.
//! The scene format itself lives in [`crate::scene::codec`]; this module
//! only covers where the host finds its content and which scene to open.

pub use serde::{Deserialize, Serialize};

use std::path::PathBuf;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Fails on unreadable files, malformed content, or an extension
    /// other than `.toml`/`.ron`.
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Fails on unwritable paths, unserializable values, or an extension
    /// other than `.toml`/`.ron`.
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Host settings for content location and scene selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Root directory for all content files
    pub content_root: PathBuf,
    /// Scene file directory, relative to the content root
    pub map_dir: String,
    /// Scene file to open at startup, if any
    pub default_scene: Option<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("content"),
            map_dir: "map".to_owned(),
            default_scene: None,
        }
    }
}

impl HostConfig {
    /// Resolve a scene file name against the configured scene directory
    #[must_use]
    pub fn scene_path(&self, file_name: &str) -> PathBuf {
        self.content_root.join(&self.map_dir).join(file_name)
    }
}

impl Config for HostConfig {}
