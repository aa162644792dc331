//! Context configuration.
//!
//! Sizes of the fixed pools and buffers plus the metrics of built-in chrome
//! (title bars, scrollbars, dock handles). Loaded once at startup.

use crate::error::UiResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Tunables of a [`Context`](crate::Context).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContextConfig {
    /// Slots in the container pool.
    pub container_pool_size: usize,
    /// Slots in the tree-node expansion pool.
    pub treenode_pool_size: usize,
    /// Maximum commands per frame.
    pub command_capacity: usize,
    /// Maximum containers in one tab bar.
    pub max_tab_items: usize,
    /// Window title bar height.
    pub title_height: f32,
    /// Scrollbar track thickness.
    pub scrollbar_size: f32,
    /// Minimum scrollbar thumb length.
    pub thumb_size: f32,
    /// Smallest width/height a window can be resized to.
    pub min_size: f32,
    /// Width of one tab in a tab strip.
    pub tab_width: f32,
    /// Pointer travel before a title drag undocks a docked window.
    pub drag_threshold: f32,
    /// Edge length of a docking drop zone.
    pub dock_zone_size: f32,
    /// Gap between the centre zone and the side zones.
    pub dock_zone_gap: f32,
    /// Thickness of split dividers and root edge handles.
    pub handle_size: f32,
    /// Smallest ratio a divider drag can produce.
    pub min_split_ratio: f32,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            container_pool_size: 48,
            treenode_pool_size: 48,
            command_capacity: 16_384,
            max_tab_items: 16,
            title_height: 24.0,
            scrollbar_size: 12.0,
            thumb_size: 8.0,
            min_size: 96.0,
            tab_width: 120.0,
            drag_threshold: 4.0,
            dock_zone_size: 32.0,
            dock_zone_gap: 8.0,
            handle_size: 6.0,
            min_split_ratio: 0.05,
        }
    }
}

impl ContextConfig {
    /// Parses a TOML document; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> UiResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> UiResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), ?config, "loaded context config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UiError;

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = ContextConfig::from_toml_str("container_pool_size = 8\ntitle_height = 30")
            .unwrap_or_else(|err| panic!("config should parse: {err}"));
        assert_eq!(config.container_pool_size, 8);
        assert_eq!(config.title_height, 30.0);
        assert_eq!(config.max_tab_items, ContextConfig::default().max_tab_items);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = ContextConfig::from_toml_str("containers = 3");
        assert!(matches!(result, Err(UiError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = ContextConfig::load("/nonexistent/tessera.toml");
        assert!(matches!(result, Err(UiError::Io(_))));
    }
}
