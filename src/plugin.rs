//! Build lifecycle hook.
//!
//! Runs once per build and stops at the first failure: rewrite the
//! redirects, create the output directories, install the login page and auth
//! function, then write `<publish>/netlify.toml`. The config is written last
//! so a failed copy never leaves a gated config behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::Result;
use crate::assets::{self, AssetSource, InstalledAssets};
use crate::config::Settings;
use crate::gate::{self, GateOptions};
use crate::netlify::NetlifyConfig;

/// Constants the platform hands to build plugins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildConstants {
    /// `PUBLISH_DIR`
    pub publish_dir: Option<String>,
    /// `FUNCTIONS_SRC`
    pub functions_src: Option<String>,
}

/// What a completed build step produced.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// The rewritten site config
    pub config: NetlifyConfig,
    /// Where the login page and auth function were written
    pub assets: InstalledAssets,
    /// Path of the rewritten `netlify.toml`
    pub config_path: PathBuf,
}

/// A plugin invoked during the build phase.
#[async_trait]
pub trait BuildPlugin: Send + Sync {
    /// Plugin name for logs
    fn name(&self) -> &str;

    /// Run the plugin against the site config.
    async fn on_build(
        &self,
        config: NetlifyConfig,
        constants: &BuildConstants,
    ) -> Result<BuildOutcome>;
}

/// Installs the SSO gate into a site build.
#[derive(Debug, Clone, Default)]
pub struct SsoPlugin {
    settings: Settings,
}

impl SsoPlugin {
    /// Create a plugin from loaded settings.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Settings this plugin runs with
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Rewrite the config and render it without touching the filesystem.
    pub fn preview(&self, config: NetlifyConfig, constants: &BuildConstants) -> Result<String> {
        let options = self.settings.gate_options(constants)?;
        gate::transform(config, &options).to_toml_string()
    }
}

#[async_trait]
impl BuildPlugin for SsoPlugin {
    fn name(&self) -> &str {
        "netlify-sso"
    }

    async fn on_build(
        &self,
        config: NetlifyConfig,
        constants: &BuildConstants,
    ) -> Result<BuildOutcome> {
        let options = self.settings.gate_options(constants)?;
        let config = gate::transform(config, &options);

        let installed = install_assets(&options, &self.settings.asset_source()).await?;
        let config_path = config.write_to(Path::new(&options.publish_dir)).await?;

        info!(
            plugin = self.name(),
            config = %config_path.display(),
            login_page = %installed.login_page.display(),
            auth_function = %installed.auth_function.display(),
            "SSO gate installed"
        );

        Ok(BuildOutcome {
            config,
            assets: installed,
            config_path,
        })
    }
}

async fn install_assets(options: &GateOptions, source: &AssetSource) -> Result<InstalledAssets> {
    info!("Copying static assets...");
    assets::ensure_dirs(options).await?;
    assets::install(source, options).await
}
