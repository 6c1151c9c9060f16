//! Netlify SSO Library
//!
//! Build-time single-sign-on gate for static sites deployed on Netlify.
//!
//! # Features
//!
//! - **Redirect gating**: every existing `[[redirects]]` rule is restricted to
//!   signed-in users (`Role = ["netlify"]`)
//! - **Login funnel**: anonymous requests end up on a login page served at `/`
//! - **Assets**: login page and auth function are installed into the build
//!   output
//! - **Config passthrough**: unknown `netlify.toml` keys are preserved
//!
//! # Pipeline
//!
//! ```text
//! netlify.toml ──▶ gate::transform ──▶ assets::install ──▶ <publish>/netlify.toml
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod assets;
pub mod cli;
pub mod config;
pub mod error;
pub mod gate;
pub mod netlify;
pub mod plugin;
pub mod redirect;

pub use error::{Error, Result};
pub use gate::{GateOptions, transform};
pub use netlify::NetlifyConfig;
pub use plugin::{BuildConstants, BuildPlugin, SsoPlugin};
pub use redirect::{Conditions, RedirectRule};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Route of the login page
pub const LOGIN_PAGE: &str = "/_netlify-sso";

/// Name of the auth function
pub const AUTH_FUNCTION: &str = "sso-auth";

/// Role the auth function grants to signed-in users
pub const SSO_ROLE: &str = "netlify";

/// Functions directory used when the platform provides none
pub const DEFAULT_FUNCTIONS_DIR: &str = "_netlify_sso_functions";

/// Publish directory used when the platform provides none
pub const DEFAULT_PUBLISH_DIR: &str = "_netlify_sso_publish";

/// File name of the site config, both read and written
pub const CONFIG_FILE_NAME: &str = "netlify.toml";

/// Setup tracing/logging
pub fn setup_tracing(level: &str, format: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    let installed = match format {
        Some("json") => subscriber.with(fmt::layer().json()).try_init(),
        _ => subscriber.with(fmt::layer()).try_init(),
    };

    installed.map_err(|e| Error::Config(format!("Failed to install log subscriber: {e}")))
}
