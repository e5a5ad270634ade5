use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Element bindings for the controller. The markup contract lives here
/// instead of being scattered through the handlers as string literals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Selector for the back navigation link (".class" or "#id")
    #[serde(default = "default_back_link_selector")]
    pub back_link_selector: String,

    /// Id of the button that triggers the deferred submission
    #[serde(default = "default_load_button_id")]
    pub load_button_id: String,

    /// Id of the loading indicator revealed on trigger
    #[serde(default = "default_spinner_id")]
    pub spinner_id: String,

    /// Id of the form submitted once the delay elapses
    #[serde(default = "default_form_id")]
    pub form_id: String,
}

fn default_back_link_selector() -> String {
    ".back-link".to_string()
}

fn default_load_button_id() -> String {
    "load-button".to_string()
}

fn default_spinner_id() -> String {
    "spinning-wheel".to_string()
}

fn default_form_id() -> String {
    "previous-movement-form".to_string()
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            back_link_selector: default_back_link_selector(),
            load_button_id: default_load_button_id(),
            spinner_id: default_spinner_id(),
            form_id: default_form_id(),
        }
    }
}

impl ControllerConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("pagewire");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the default location, or fall back to defaults
    pub fn load() -> Self {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Self::default(),
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Could not load config from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }
}
