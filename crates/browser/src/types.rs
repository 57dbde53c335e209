//! Session configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the single browser session a diagnostic run owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Path to Chrome/Chromium binary (auto-detected if not set).
    pub chrome_path: Option<String>,
    /// Whether to run in headless mode.
    pub headless: bool,
    /// Viewport width.
    pub viewport_width: u32,
    /// Viewport height.
    pub viewport_height: u32,
    /// Navigation timeout in milliseconds. Covers goto plus the network-idle
    /// stabilization wait.
    pub navigation_timeout_ms: u64,
    /// Additional Chrome arguments.
    pub chrome_args: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            navigation_timeout_ms: 30_000,
            chrome_args: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert!(config.headless);
        assert!(config.chrome_path.is_none());
        assert_eq!(config.navigation_timeout_ms, 30_000);
        assert!(config.chrome_args.is_empty());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{"headless": false}"#).unwrap();
        assert!(!config.headless);
        assert_eq!(config.navigation_timeout_ms, 30_000);
    }
}
