//! Configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Serial link configuration
    #[serde(default)]
    pub serial: SerialConfig,

    /// Widget defaults for the demo screen
    #[serde(default)]
    pub ui: UiConfig,
}

/// Serial link configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Serial port path
    #[serde(default = "default_port")]
    pub port: String,

    /// Rate the module is expected to be running at
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Per-read timeout in milliseconds
    #[serde(default = "default_read_timeout")]
    pub read_timeout_ms: u64,

    /// Per-rate timeout while detecting, in milliseconds
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_ms: u64,

    /// Rate `set-baud` switches to when none is given
    #[serde(default = "default_target_baud_rate")]
    pub target_baud_rate: u32,
}

impl SerialConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud_rate: default_baud_rate(),
            read_timeout_ms: default_read_timeout(),
            probe_timeout_ms: default_probe_timeout(),
            target_baud_rate: default_target_baud_rate(),
        }
    }
}

/// Widget defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Screen background colour (name or hex)
    #[serde(default = "default_background")]
    pub background: String,

    /// Button face colour
    #[serde(default = "default_button_background")]
    pub button_background: String,

    /// Button label colour
    #[serde(default = "default_button_foreground")]
    pub button_foreground: String,

    /// Button label width multiplier
    #[serde(default = "default_button_char_width")]
    pub button_char_width: u16,

    /// Button label height multiplier
    #[serde(default = "default_button_char_height")]
    pub button_char_height: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            background: default_background(),
            button_background: default_button_background(),
            button_foreground: default_button_foreground(),
            button_char_width: default_button_char_width(),
            button_char_height: default_button_char_height(),
        }
    }
}

// Default value functions
fn default_port() -> String {
    "/dev/ttyUSB0".to_string()
}

fn default_baud_rate() -> u32 {
    9600 // Module power-on rate
}

fn default_read_timeout() -> u64 {
    5000
}

fn default_probe_timeout() -> u64 {
    250
}

fn default_target_baud_rate() -> u32 {
    115200
}

fn default_background() -> String {
    "black".to_string()
}

fn default_button_background() -> String {
    "white".to_string()
}

fn default_button_foreground() -> String {
    "black".to_string()
}

fn default_button_char_width() -> u16 {
    2
}

fn default_button_char_height() -> u16 {
    3
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse configuration")?;
        Ok(config)
    }

    /// Loads the file if it exists, otherwise returns defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.serial.target_baud_rate, 115200);
        assert_eq!(config.serial.probe_timeout(), Duration::from_millis(250));
        assert_eq!(config.ui.button_char_height, 3);
    }

    #[test]
    fn test_partial_file() {
        let config: Config = toml::from_str(
            r#"
            [serial]
            port = "/dev/ttyACM1"
            baud_rate = 115200

            [ui]
            button_background = "green"
            "#,
        )
        .unwrap();
        assert_eq!(config.serial.port, "/dev/ttyACM1");
        assert_eq!(config.serial.baud_rate, 115200);
        assert_eq!(config.serial.read_timeout_ms, 5000);
        assert_eq!(config.ui.button_background, "green");
        assert_eq!(config.ui.button_foreground, "black");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load_or_default("/nonexistent/picaso.toml").unwrap();
        assert_eq!(config.serial.port, "/dev/ttyUSB0");
    }
}
