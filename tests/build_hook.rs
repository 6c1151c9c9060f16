//! Integration tests for the SSO build step

use std::path::Path;

use netlify_sso::config::Settings;
use netlify_sso::{
    BuildConstants, BuildPlugin, Error, NetlifyConfig, RedirectRule, SsoPlugin,
};
use pretty_assertions::assert_eq;

const SITE: &str = r#"
[build]
command = "hugo"
publish = "public"

[[redirects]]
from = "/old"
to = "/new"

[[redirects]]
from = "/docs/*"
to = "/documentation/:splat"
status = 301
conditions = { Role = ["staff"] }

[[headers]]
for = "/*"
[headers.values]
X-Frame-Options = "DENY"
"#;

fn constants_in(root: &Path) -> BuildConstants {
    BuildConstants {
        publish_dir: Some(root.join("publish").display().to_string()),
        functions_src: Some(root.join("functions").display().to_string()),
    }
}

fn control_rules() -> Vec<RedirectRule> {
    vec![
        RedirectRule::new("/*", "/:splat")
            .with_role("netlify")
            .with_status(404),
        RedirectRule::new("/", "/_netlify-sso")
            .with_status(401)
            .forced(),
        RedirectRule::new("/*", "/").with_status(302).forced(),
    ]
}

#[tokio::test]
async fn test_build_installs_gate() {
    let dir = tempfile::tempdir().unwrap();
    let constants = constants_in(dir.path());
    let config = NetlifyConfig::from_toml_str(SITE).unwrap();

    let outcome = SsoPlugin::default()
        .on_build(config, &constants)
        .await
        .unwrap();

    let publish = dir.path().join("publish");
    let functions = dir.path().join("functions");
    assert_eq!(outcome.assets.login_page, publish.join("_netlify-sso.html"));
    assert_eq!(outcome.assets.auth_function, functions.join("sso-auth.js"));
    assert!(outcome.assets.login_page.is_file());
    assert!(outcome.assets.auth_function.is_file());
    assert_eq!(outcome.config_path, publish.join("netlify.toml"));

    let written = NetlifyConfig::load(&outcome.config_path).await.unwrap();
    assert_eq!(written, outcome.config);

    let mut expected = vec![
        RedirectRule::new("/old", "/new").with_role("netlify"),
        RedirectRule::new("/docs/*", "/documentation/:splat")
            .with_status(301)
            .with_role("netlify"),
    ];
    expected.extend(control_rules());
    assert_eq!(written.redirects, expected);

    assert_eq!(
        written.build.publish.as_deref(),
        Some(publish.display().to_string().as_str())
    );
    assert_eq!(
        written.build.functions.as_deref(),
        Some(functions.display().to_string().as_str())
    );
    assert!(written.build.extra.contains_key("command"));
    assert!(written.extra.contains_key("headers"));
}

#[tokio::test]
async fn test_build_with_empty_redirects() {
    let dir = tempfile::tempdir().unwrap();

    let outcome = SsoPlugin::default()
        .on_build(NetlifyConfig::default(), &constants_in(dir.path()))
        .await
        .unwrap();

    assert_eq!(outcome.config.redirects, control_rules());
}

#[tokio::test]
async fn test_settings_dirs_override_platform_constants() {
    let dir = tempfile::tempdir().unwrap();
    let publish = dir.path().join("sso-out");
    let plugin = SsoPlugin::new(Settings {
        publish_dir: Some(publish.display().to_string()),
        ..Default::default()
    });

    let outcome = plugin
        .on_build(NetlifyConfig::default(), &constants_in(dir.path()))
        .await
        .unwrap();

    assert_eq!(outcome.config_path, publish.join("netlify.toml"));
    assert!(!dir.path().join("publish").exists());
    assert!(dir.path().join("functions").join("sso-auth.js").is_file());
}

#[tokio::test]
async fn test_failed_copy_aborts_before_config_write() {
    let dir = tempfile::tempdir().unwrap();
    let plugin = SsoPlugin::new(Settings {
        static_dir: Some(dir.path().join("missing-static")),
        ..Default::default()
    });

    let err = plugin
        .on_build(
            NetlifyConfig::from_toml_str(SITE).unwrap(),
            &constants_in(dir.path()),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Asset(_)));
    assert!(!dir.path().join("publish").join("netlify.toml").exists());
}

#[tokio::test]
async fn test_custom_static_dir_is_copied() {
    let dir = tempfile::tempdir().unwrap();
    let statics = dir.path().join("branding");
    std::fs::create_dir(&statics).unwrap();
    std::fs::write(statics.join("sso-login.html"), "<form>acme</form>").unwrap();
    std::fs::write(statics.join("sso-auth-function.js"), "exports.handler = 1").unwrap();

    let plugin = SsoPlugin::new(Settings {
        static_dir: Some(statics),
        ..Default::default()
    });
    let outcome = plugin
        .on_build(NetlifyConfig::default(), &constants_in(dir.path()))
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(outcome.assets.login_page).unwrap(),
        "<form>acme</form>"
    );
}

#[tokio::test]
async fn test_rebuilding_output_config_is_not_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let constants = constants_in(dir.path());
    let plugin = SsoPlugin::default();

    let first = plugin
        .on_build(NetlifyConfig::from_toml_str(SITE).unwrap(), &constants)
        .await
        .unwrap();
    let reloaded = NetlifyConfig::load(&first.config_path).await.unwrap();
    let second = plugin.on_build(reloaded, &constants).await.unwrap();

    // 2 originals gated twice, plus two sets of control rules
    assert_eq!(second.config.redirects.len(), 2 + 6);
    assert!(
        second.config.redirects[..first.config.redirects.len()]
            .iter()
            .all(|r| r.roles() == ["netlify"])
    );
}

#[tokio::test]
async fn test_custom_identifiers_reach_installed_assets() {
    let dir = tempfile::tempdir().unwrap();
    let plugin = SsoPlugin::new(Settings {
        role: "staff".to_string(),
        auth_function: "login".to_string(),
        login_page: "/auth/signin".to_string(),
        ..Default::default()
    });

    let outcome = plugin
        .on_build(
            NetlifyConfig::from_toml_str(SITE).unwrap(),
            &constants_in(dir.path()),
        )
        .await
        .unwrap();

    // Rules require the role the installed function grants
    assert!(outcome.config.redirects[..3].iter().all(|r| r.roles() == ["staff"]));
    let function = std::fs::read_to_string(&outcome.assets.auth_function).unwrap();
    assert!(function.contains("const ROLE = 'staff'"));

    // The page posts to the function that was installed
    assert_eq!(
        outcome.assets.auth_function,
        dir.path().join("functions").join("login.js")
    );
    let page = std::fs::read_to_string(&outcome.assets.login_page).unwrap();
    assert!(page.contains(r#"action="/.netlify/functions/login""#));

    // The login prompt points at the nested page that was written
    assert_eq!(outcome.config.redirects[3].to, "/auth/signin");
    assert_eq!(
        outcome.assets.login_page,
        dir.path().join("publish").join("auth").join("signin.html")
    );
    assert!(outcome.assets.login_page.is_file());
}
