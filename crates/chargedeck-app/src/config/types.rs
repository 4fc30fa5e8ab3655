//! Configuration types for chargedeck
//!
//! Defines:
//! - `Settings` - global application settings (config.toml)
//! - Related sub-types and enums

use serde::{Deserialize, Serialize};

/// Global application settings, parsed from
/// `~/.config/chargedeck/config.toml`. Every field has a default so a
/// missing or partial file behaves.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub ui: UiSettings,

    #[serde(default)]
    pub behavior: BehaviorSettings,
}

/// `[api]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ApiSettings {
    /// Base URL of the platform backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout() -> u64 {
    15
}

/// `[ui]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UiSettings {
    /// Rows per page on entity screens.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Event-poll timeout in milliseconds (tick rate).
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,

    #[serde(default)]
    pub theme: ThemeVariant,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            tick_rate_ms: default_tick_rate(),
            theme: ThemeVariant::default(),
        }
    }
}

fn default_page_size() -> u32 {
    10
}

fn default_tick_rate() -> u64 {
    50
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

/// `[behavior]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BehaviorSettings {
    /// Ask before deleting a row.
    #[serde(default = "default_true")]
    pub confirm_delete: bool,

    /// Seconds a notification banner stays on screen.
    #[serde(default = "default_notification_ttl")]
    pub notification_ttl_seconds: u64,
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            confirm_delete: true,
            notification_ttl_seconds: default_notification_ttl(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_notification_ttl() -> u64 {
    6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api.base_url, "http://localhost:5000/api");
        assert_eq!(settings.ui.page_size, 10);
        assert!(settings.behavior.confirm_delete);
        assert_eq!(settings.ui.theme, ThemeVariant::Dark);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [api]
            base_url = "https://charge.example.com/api"

            [behavior]
            confirm_delete = false
            "#,
        )
        .unwrap();
        assert_eq!(settings.api.base_url, "https://charge.example.com/api");
        assert_eq!(settings.api.timeout_seconds, 15);
        assert!(!settings.behavior.confirm_delete);
        assert_eq!(settings.ui.page_size, 10);
    }

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.ui.tick_rate_ms, 50);
        assert_eq!(settings.behavior.notification_ttl_seconds, 6);
    }
}
