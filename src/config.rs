//! Configuration management

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};

use crate::assets::AssetSource;
use crate::gate::GateOptions;
use crate::plugin::BuildConstants;
use crate::{AUTH_FUNCTION, Error, LOGIN_PAGE, Result, SSO_ROLE};

/// Plugin settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Site config to read
    pub netlify_config: PathBuf,

    /// Publish directory; overrides the platform's `PUBLISH_DIR`
    pub publish_dir: Option<String>,

    /// Functions directory; overrides the platform's `FUNCTIONS_SRC`
    pub functions_dir: Option<String>,

    /// Directory with replacement assets (embedded copies when unset)
    pub static_dir: Option<PathBuf>,

    /// Login page route
    pub login_page: String,

    /// Auth function name
    pub auth_function: String,

    /// Role granted by the auth function
    pub role: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            netlify_config: PathBuf::from(crate::CONFIG_FILE_NAME),
            publish_dir: None,
            functions_dir: None,
            static_dir: None,
            login_page: LOGIN_PAGE.to_string(),
            auth_function: AUTH_FUNCTION.to_string(),
            role: SSO_ROLE.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from file and environment
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file does not exist or cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();

        if let Some(p) = path {
            if !p.exists() {
                return Err(Error::Config(format!(
                    "Settings file not found: {}",
                    p.display()
                )));
            }
            figment = figment.merge(Toml::file(p));
        }

        // Merge environment variables (NETLIFY_SSO_ prefix)
        figment = figment.merge(Env::prefixed("NETLIFY_SSO_"));

        figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))
    }

    /// Resolve the gate inputs for a build.
    ///
    /// Explicit settings win over platform constants, which win over the
    /// built-in defaults.
    pub fn gate_options(&self, constants: &BuildConstants) -> Result<GateOptions> {
        if !self.login_page.starts_with('/') || self.login_page.len() < 2 {
            return Err(Error::Config(format!(
                "login_page must be an absolute route, got '{}'",
                self.login_page
            )));
        }
        if self.auth_function.is_empty() {
            return Err(Error::Config("auth_function must not be empty".to_string()));
        }
        if self.role.is_empty() {
            return Err(Error::Config("role must not be empty".to_string()));
        }

        let base = GateOptions::new(
            self.functions_dir
                .clone()
                .or_else(|| constants.functions_src.clone()),
            self.publish_dir
                .clone()
                .or_else(|| constants.publish_dir.clone()),
        );

        Ok(GateOptions {
            login_page: self.login_page.clone(),
            auth_function: self.auth_function.clone(),
            role: self.role.clone(),
            ..base
        })
    }

    /// Where to read the login page and auth function from
    pub fn asset_source(&self) -> AssetSource {
        self.static_dir
            .clone()
            .map_or(AssetSource::Embedded, AssetSource::Directory)
    }
}
