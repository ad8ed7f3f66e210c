// src/config/mod.rs
pub mod types;

pub use self::types::{CatalogConfig, Config, OutputConfig, ProcessorConfig};

use crate::catalog::Catalog;
use crate::error::{EngineError, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub const CONFIG_FILE: &str = "a11ymerge.toml";

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `a11ymerge.toml` from the working directory, if present.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(Path::new("."))
    }

    /// Loads `a11ymerge.toml` from `dir`. A missing file means defaults; an
    /// unreadable or invalid one is logged and also means defaults.
    #[must_use]
    pub fn load_from(dir: &Path) -> Self {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Self::new();
        }
        match fs::read_to_string(&path)
            .map_err(|e| EngineError::io(e, &path))
            .and_then(|content| Self::parse_toml(&content))
        {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Self::new()
            }
        }
    }

    /// Parses a config document.
    ///
    /// # Errors
    /// Returns error if the TOML is invalid.
    pub fn parse_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads the configured catalog, if any.
    ///
    /// # Errors
    /// Returns error if a catalog path is set but cannot be loaded.
    pub fn load_catalog(&self) -> Result<Option<Catalog>> {
        self.catalog
            .path
            .as_deref()
            .map(Catalog::load)
            .transpose()
    }
}
