//! Netlify SSO - build-time login gate for static sites

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use netlify_sso::{
    BuildConstants, BuildPlugin, NetlifyConfig, SsoPlugin,
    cli::{Cli, Command},
    config::Settings,
    setup_tracing,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup tracing
    if let Err(e) = setup_tracing(&cli.log_level, cli.log_format.as_deref()) {
        eprintln!("Failed to setup tracing: {e}");
        return ExitCode::FAILURE;
    }

    // Load settings
    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(mut settings) => {
            if let Some(ref path) = cli.netlify_config {
                settings.netlify_config = path.clone();
            }
            settings
        }
        Err(e) => {
            error!("Failed to load settings: {e}");
            return ExitCode::FAILURE;
        }
    };

    let constants = cli.build_constants();
    let plugin = SsoPlugin::new(settings);

    match cli.command.unwrap_or(Command::Build) {
        Command::Build => run_build(&plugin, &constants).await,
        Command::Preview => run_preview(&plugin, &constants).await,
    }
}

/// Read the site config named in the settings
async fn load_site_config(plugin: &SsoPlugin) -> Option<NetlifyConfig> {
    match NetlifyConfig::load(&plugin.settings().netlify_config).await {
        Ok(config) => Some(config),
        Err(e) => {
            error!("Failed to load site config: {e}");
            None
        }
    }
}

/// Run the build hook
async fn run_build(plugin: &SsoPlugin, constants: &BuildConstants) -> ExitCode {
    let Some(config) = load_site_config(plugin).await else {
        return ExitCode::FAILURE;
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        redirects = config.redirects.len(),
        "Running SSO build step"
    );

    match plugin.on_build(config, constants).await {
        Ok(outcome) => {
            info!(
                redirects = outcome.config.redirects.len(),
                config = %outcome.config_path.display(),
                "Build step complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("SSO build step failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Print the rewritten config to stdout
async fn run_preview(plugin: &SsoPlugin, constants: &BuildConstants) -> ExitCode {
    let Some(config) = load_site_config(plugin).await else {
        return ExitCode::FAILURE;
    };

    match plugin.preview(config, constants) {
        Ok(rendered) => {
            print!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to render config: {e}");
            ExitCode::FAILURE
        }
    }
}
