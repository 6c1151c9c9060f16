//! `netlify.toml` model, parsing and serialization.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::redirect::RedirectRule;
use crate::{CONFIG_FILE_NAME, Error, Result};

/// A whole `netlify.toml` document.
///
/// Only `build` and `redirects` are interpreted; every other top-level table
/// is carried through in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetlifyConfig {
    /// `[build]` settings
    #[serde(default)]
    pub build: BuildSettings,

    /// `[[redirects]]` in evaluation order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub redirects: Vec<RedirectRule>,

    /// Remaining top-level keys (`context`, `headers`, `plugins`, ...)
    #[serde(flatten)]
    pub extra: toml::Table,
}

/// The `[build]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildSettings {
    /// Directory that gets deployed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish: Option<String>,

    /// Directory holding serverless function sources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functions: Option<String>,

    /// Remaining build keys (`command`, `base`, `environment`, ...)
    #[serde(flatten)]
    pub extra: toml::Table,
}

impl NetlifyConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a config file.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Netlify config not found: {}",
                path.display()
            )));
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::io(path, e))?;

        let config = Self::from_toml_str(&content)?;
        debug!(
            path = %path.display(),
            redirects = config.redirects.len(),
            "Loaded netlify config"
        );
        Ok(config)
    }

    /// Serialize back to TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Write the config as `netlify.toml` inside `dir`, returning the file path.
    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let content = self.to_toml_string()?;
        let path = dir.join(CONFIG_FILE_NAME);

        tokio::fs::write(&path, content)
            .await
            .map_err(|e| Error::io(&path, e))?;

        debug!(path = %path.display(), "Wrote netlify config");
        Ok(path)
    }
}
