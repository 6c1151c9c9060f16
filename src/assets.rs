//! Login page and auth function installation.
//!
//! Both assets are compiled into the binary. A deployment that wants its own
//! login page points `static_dir` at a directory holding replacements under
//! the same file names.
//!
//! Assets are templates: `{{role}}`, `{{auth_function}}` and `{{login_page}}`
//! are replaced with the build's values, so the installed function grants the
//! role the redirects require and the page posts to the installed function.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::gate::GateOptions;
use crate::{Error, Result};

/// File name of the login page inside a static directory
pub const LOGIN_PAGE_ASSET: &str = "sso-login.html";

/// File name of the auth function inside a static directory
pub const AUTH_FUNCTION_ASSET: &str = "sso-auth-function.js";

const LOGIN_PAGE_HTML: &str = include_str!("../static/sso-login.html");
const AUTH_FUNCTION_JS: &str = include_str!("../static/sso-auth-function.js");

/// Where the two assets are read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AssetSource {
    /// Copies compiled into the binary
    #[default]
    Embedded,
    /// A directory containing [`LOGIN_PAGE_ASSET`] and [`AUTH_FUNCTION_ASSET`]
    Directory(PathBuf),
}

/// Destinations written by [`install`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledAssets {
    /// `<publish>/<login page>.html`
    pub login_page: PathBuf,
    /// `<functions>/<auth function>.js`
    pub auth_function: PathBuf,
}

impl InstalledAssets {
    /// Destination paths for the given options.
    pub fn destinations(options: &GateOptions) -> Self {
        let page = options.login_page.trim_start_matches('/');
        Self {
            login_page: Path::new(&options.publish_dir).join(format!("{page}.html")),
            auth_function: Path::new(&options.functions_dir)
                .join(format!("{}.js", options.auth_function)),
        }
    }
}

/// Substitute the build's identifiers into an asset template.
pub fn render(template: &str, options: &GateOptions) -> String {
    template
        .replace("{{role}}", &options.role)
        .replace("{{auth_function}}", &options.auth_function)
        .replace("{{login_page}}", &options.login_page)
}

/// Create the functions directory and every directory the login page needs.
///
/// A nested login route such as `/auth/login` lands below the publish
/// directory, so its parent is created as well.
pub async fn ensure_dirs(options: &GateOptions) -> Result<()> {
    let installed = InstalledAssets::destinations(options);
    let login_dir = installed
        .login_page
        .parent()
        .map_or_else(|| PathBuf::from(&options.publish_dir), Path::to_path_buf);

    tokio::try_join!(
        create_dir(Path::new(&options.functions_dir)),
        create_dir(Path::new(&options.publish_dir)),
        create_dir(&login_dir),
    )?;
    Ok(())
}

async fn create_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| Error::io(dir, e))
}

/// Install the login page and auth function. Directories must exist; see
/// [`ensure_dirs`].
pub async fn install(source: &AssetSource, options: &GateOptions) -> Result<InstalledAssets> {
    let installed = InstalledAssets::destinations(options);

    tokio::try_join!(
        install_one(
            source,
            options,
            LOGIN_PAGE_ASSET,
            LOGIN_PAGE_HTML,
            &installed.login_page
        ),
        install_one(
            source,
            options,
            AUTH_FUNCTION_ASSET,
            AUTH_FUNCTION_JS,
            &installed.auth_function
        ),
    )?;

    Ok(installed)
}

async fn install_one(
    source: &AssetSource,
    options: &GateOptions,
    name: &str,
    embedded: &str,
    dest: &Path,
) -> Result<()> {
    let (from, template) = match source {
        AssetSource::Embedded => (format!("<embedded>/{name}"), embedded.to_string()),
        AssetSource::Directory(dir) => {
            let from = dir.join(name);
            let template = tokio::fs::read_to_string(&from)
                .await
                .map_err(|e| Error::asset(from.display(), dest.display(), e))?;
            (from.display().to_string(), template)
        }
    };

    tokio::fs::write(dest, render(&template, options))
        .await
        .map_err(|e| Error::asset(&from, dest.display(), e))?;

    debug!(asset = name, dest = %dest.display(), "Installed asset");
    Ok(())
}
