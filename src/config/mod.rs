//! Configuration module for flowsql
//!
//! This module handles configuration including:
//! - Compiler settings (naming conventions, failure policy)
//! - Graph documents handed to the command line front end
//!
//! # Settings Location
//!
//! Settings are read from an explicit path, or from the platform config
//! directory under `flowsql`:
//!
//! - **Linux**: `~/.config/flowsql/settings.toml`
//! - **macOS**: `~/Library/Application Support/flowsql/settings.toml`
//! - **Windows**: `%APPDATA%\flowsql\settings.toml`
//!
//! # Example
//!
//! ```ignore
//! use flowsql::config::{CompilerSettings, GraphDocument};
//!
//! let settings = CompilerSettings::load_or_default(None);
//! let document = GraphDocument::load("pipeline.json")?;
//! ```

pub mod settings;

pub use settings::*;

use crate::error::{FlowError, Result, ResultExt};
use crate::pipeline::{Edge, Node};
use crate::types::ExternalContext;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for config directories
pub const APP_ID: &str = "flowsql";

/// Settings filename
pub const SETTINGS_FILE: &str = "settings.toml";

// ==================== Config Directory ====================

/// Get the application config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Get the path to the default settings file
pub fn settings_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(SETTINGS_FILE))
}

// ==================== Settings Loading ====================

impl CompilerSettings {
    /// Load settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            FlowError::Config(format!("Failed to read settings {:?}: {}", path, e))
        })?;

        toml::from_str(&content).map_err(|e| {
            FlowError::Config(format!("Failed to parse settings {:?}: {}", path, e))
        })
    }

    /// Load settings from `path`, or the default location when `None`.
    ///
    /// A missing default file is not an error. Any other failure falls back to
    /// the defaults with a warning.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match settings_path() {
                Some(p) if p.exists() => p,
                _ => return Self::default(),
            },
        };

        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save settings as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                FlowError::Config(format!("Failed to create settings directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| FlowError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            FlowError::Config(format!("Failed to write settings {:?}: {}", path, e))
        })
    }
}

// ==================== Graph Document ====================

/// A graph snapshot as exchanged with the command line front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,

    #[serde(default)]
    pub edges: Vec<Edge>,

    pub context: ExternalContext,
}

impl GraphDocument {
    /// Load a graph document from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read graph {:?}", path))?;
        Self::from_json(&content).context(format!("Failed to load graph {:?}", path))
    }

    /// Parse a graph document from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| FlowError::Serialization(e.to_string()))
    }

    /// Render as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| FlowError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_settings_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);

        let settings = CompilerSettings {
            events_table: "raw".to_string(),
            ..CompilerSettings::default()
        };
        settings.save(&path).unwrap();

        assert_eq!(CompilerSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_invalid_settings_fall_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "events_table = [").unwrap();

        assert!(CompilerSettings::load(file.path()).is_err());
        assert_eq!(
            CompilerSettings::load_or_default(Some(file.path())),
            CompilerSettings::default()
        );
    }

    #[test]
    fn test_graph_document_from_json() {
        let doc = GraphDocument::from_json(
            r#"{
                "nodes": [
                    {"id": "e1", "kind": "event", "config": {"fields": [{"name": "role_id"}]}},
                    {"id": "o1", "kind": "output", "config": {"view_name": "v1"}}
                ],
                "edges": [{"source": "e1", "target": "o1"}],
                "context": {"physical_database_name": "db", "numeric_game_identifier": 7}
            }"#,
        )
        .unwrap();

        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.edges.len(), 1);
        assert_eq!(doc.context.numeric_game_identifier, 7);
    }

    #[test]
    fn test_graph_document_requires_context() {
        let err = GraphDocument::from_json(r#"{"nodes": [], "edges": []}"#).unwrap_err();
        assert!(err.to_string().contains("Serialization error"));
    }
}
