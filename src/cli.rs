//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::plugin::BuildConstants;

/// Netlify SSO - gate a static site behind a login page at build time
#[derive(Parser, Debug)]
#[command(name = "netlify-sso")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to settings file (TOML)
    #[arg(short, long, env = "NETLIFY_SSO_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Site config to rewrite [default: netlify.toml]
    #[arg(long, env = "NETLIFY_SSO_NETLIFY_CONFIG", global = true)]
    pub netlify_config: Option<PathBuf>,

    /// Publish directory provided by the platform
    #[arg(long, env = "PUBLISH_DIR", global = true)]
    pub publish_dir: Option<String>,

    /// Functions directory provided by the platform
    #[arg(long, env = "FUNCTIONS_SRC", global = true)]
    pub functions_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        long,
        default_value = "info",
        env = "NETLIFY_SSO_LOG_LEVEL",
        global = true
    )]
    pub log_level: String,

    /// Log format (text, json)
    #[arg(long, env = "NETLIFY_SSO_LOG_FORMAT", global = true)]
    pub log_format: Option<String>,

    /// Subcommand (optional - defaults to build)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Platform constants as passed on the command line or environment
    pub fn build_constants(&self) -> BuildConstants {
        BuildConstants {
            publish_dir: self.publish_dir.clone(),
            functions_src: self.functions_dir.clone(),
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Install the SSO gate into the build output (default)
    Build,

    /// Print the rewritten site config without writing anything
    Preview,
}
