//! User configuration stored in `user_config.toml`, with environment fallbacks.
//!
//! Lets an operator supply their own Gemini API key, model override, and company
//! identity without touching code. Priority for every value:
//! `user_config.toml` > environment variable > built-in default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Company name the prompt template defaults to when nothing is configured.
pub const DEFAULT_COMPANY: &str = "Naga";

fn default_true() -> bool {
    true
}

/// User-specific configuration stored in `user_config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    /// Gemini API key.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Preferred Gemini model (e.g. "gemini-2.0-flash").
    #[serde(default)]
    pub model: Option<String>,

    /// Manufacturer/company name injected into the analysis prompt.
    #[serde(default)]
    pub company: Option<String>,

    /// Sales-representative description injected into the analysis prompt.
    #[serde(default)]
    pub representative: Option<String>,

    /// First run flag - set to false after initial setup.
    #[serde(default = "default_true")]
    pub first_run: bool,
}

impl UserConfig {
    /// Default path for the user configuration file.
    pub fn default_path() -> PathBuf {
        PathBuf::from("user_config.toml")
    }

    /// Load from the default path, or create a default file if none exists.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_from_path(&Self::default_path())
    }

    /// Load from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: UserConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = UserConfig {
                first_run: true,
                ..Default::default()
            };
            config.save_to_path(path)?;
            Ok(config)
        }
    }

    /// Save to a specific path, creating parent directories as needed.
    pub fn save_to_path(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// API key with env fallback: `CALLSIGHT_API_KEY` then `GOOGLE_API_KEY`.
    pub fn get_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("CALLSIGHT_API_KEY").ok())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .filter(|s| !s.trim().is_empty())
    }

    /// Model override with env fallback: `CALLSIGHT_MODEL`.
    pub fn get_model(&self) -> Option<String> {
        self.model
            .clone()
            .or_else(|| std::env::var("CALLSIGHT_MODEL").ok())
            .filter(|s| !s.trim().is_empty())
    }

    /// Company name with env fallback: `CALLSIGHT_COMPANY`; defaults to [`DEFAULT_COMPANY`].
    pub fn get_company(&self) -> String {
        self.company
            .clone()
            .or_else(|| std::env::var("CALLSIGHT_COMPANY").ok())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COMPANY.to_string())
    }

    /// Representative description with env fallback: `CALLSIGHT_REPRESENTATIVE`;
    /// defaults to "<company> salesperson".
    pub fn get_representative(&self) -> String {
        self.representative
            .clone()
            .or_else(|| std::env::var("CALLSIGHT_REPRESENTATIVE").ok())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| format!("{} salesperson", self.get_company()))
    }
}
