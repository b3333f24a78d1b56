//! Crate configuration
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables
//! 2. `Settings.toml` in `PASSLINK_SECRETS_DIR` (if specified and exists)
//! 3. `Settings.toml` in the current directory (if exists)
//! 4. Default settings

use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PasslinkSettings {
    pub relying_party: RelyingPartySettings,
    pub logging: LoggingSettings,
}

/// Where the relying-party handshake endpoints live and how requests are
/// protected against forgery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelyingPartySettings {
    pub base_url: String,
    pub auth_begin_path: String,
    pub auth_complete_path: String,
    pub register_begin_path: String,
    pub register_complete_path: String,
    /// Request header carrying the anti-forgery token
    pub csrf_header: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for RelyingPartySettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            auth_begin_path: "/webauthn/auth/begin".to_string(),
            auth_complete_path: "/webauthn/auth/complete".to_string(),
            register_begin_path: "/webauthn/register/begin".to_string(),
            register_complete_path: "/webauthn/register/complete".to_string(),
            csrf_header: "x-csrf-token".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl PasslinkSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read or parsed
    /// - TOML parsing fails
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);
        Self::initialize_logging(&settings);
        Ok(settings)
    }

    /// Load base settings from TOML file(s) or use defaults
    fn load_base_settings() -> Result<Self, Box<dyn std::error::Error>> {
        // 1. Start with default settings
        let mut settings = Self::default();

        // 2. Try to load from Settings.toml in current directory (lower priority)
        let default_config_path = std::path::PathBuf::from("Settings.toml");
        if default_config_path.exists() {
            let toml_content = fs::read_to_string(&default_config_path)?;
            settings = basic_toml::from_str(&toml_content)?;
        }

        // 3. If PASSLINK_SECRETS_DIR is set and contains Settings.toml,
        //    override with those settings (higher priority)
        if let Ok(secrets_dir) = std::env::var("PASSLINK_SECRETS_DIR") {
            let secrets_path = std::path::Path::new(&secrets_dir).join("Settings.toml");
            if secrets_path.exists() {
                let secrets_toml_content = fs::read_to_string(&secrets_path)?;
                settings = basic_toml::from_str(&secrets_toml_content)?;
            }
        }

        Ok(settings)
    }

    /// Apply environment variable overrides to loaded settings
    fn apply_env_overrides(settings: &mut Self) {
        if let Ok(base_url) = std::env::var("PASSLINK_BASE_URL") {
            settings.relying_party.base_url = base_url;
        }
        if let Ok(csrf_header) = std::env::var("PASSLINK_CSRF_HEADER") {
            settings.relying_party.csrf_header = csrf_header;
        }
        if let Ok(level) = std::env::var("PASSLINK_LOG_LEVEL") {
            settings.logging.level = level;
        }
    }

    /// Initialize logging once per process; later calls are no-ops
    fn initialize_logging(settings: &Self) {
        let _ = env_logger::Builder::new()
            .parse_filters(&settings.logging.level)
            .try_init();
    }
}
