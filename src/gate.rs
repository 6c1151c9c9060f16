//! Redirect gate: role-gates a site's redirects behind the SSO login.
//!
//! The output rule list is
//!
//! ```text
//! original rules, each gated by Role = [role]   (order kept)
//! /*  -> /:splat      404   Role = [role]        authenticated passthrough
//! /   -> login_page   401   force                login prompt
//! /*  -> /            302   force                everyone else
//! ```
//!
//! The passthrough rule is not forced, so an authenticated request for a path
//! that has content is served that content (the platform turns the 404 into a
//! 200). It only exists to keep the two trailing catch-alls away from
//! authenticated traffic.

use tracing::{debug, info, warn};

use crate::netlify::NetlifyConfig;
use crate::redirect::{Conditions, RedirectRule};
use crate::{AUTH_FUNCTION, DEFAULT_FUNCTIONS_DIR, DEFAULT_PUBLISH_DIR, LOGIN_PAGE, SSO_ROLE};

/// Inputs to [`transform`] besides the config itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateOptions {
    /// Directory the auth function is installed into
    pub functions_dir: String,
    /// Directory the login page and rewritten config are written to
    pub publish_dir: String,
    /// Route of the login page, with leading `/`
    pub login_page: String,
    /// Name of the auth function
    pub auth_function: String,
    /// Role the auth function grants to signed-in users
    pub role: String,
}

impl Default for GateOptions {
    fn default() -> Self {
        Self {
            functions_dir: DEFAULT_FUNCTIONS_DIR.to_string(),
            publish_dir: DEFAULT_PUBLISH_DIR.to_string(),
            login_page: LOGIN_PAGE.to_string(),
            auth_function: AUTH_FUNCTION.to_string(),
            role: SSO_ROLE.to_string(),
        }
    }
}

impl GateOptions {
    /// Options for the given directories, falling back to the defaults.
    pub fn new(functions_dir: Option<String>, publish_dir: Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            functions_dir: functions_dir.unwrap_or(defaults.functions_dir),
            publish_dir: publish_dir.unwrap_or(defaults.publish_dir),
            ..defaults
        }
    }
}

/// Gate a config's redirects behind the SSO role and point its build at the
/// SSO output directories.
///
/// Not idempotent: a second call gates the control rules of the first and
/// appends another three. Call it once per build.
#[must_use]
pub fn transform(mut config: NetlifyConfig, options: &GateOptions) -> NetlifyConfig {
    config.build.functions = Some(options.functions_dir.clone());
    config.build.publish = Some(options.publish_dir.clone());

    let original = std::mem::take(&mut config.redirects);
    let original_count = original.len();

    let mut redirects: Vec<RedirectRule> = original
        .into_iter()
        .map(|rule| gate_rule(rule, &options.role))
        .collect();
    redirects.extend(control_rules(options));
    config.redirects = redirects;

    info!(
        gated = original_count,
        total = config.redirects.len(),
        publish = %options.publish_dir,
        functions = %options.functions_dir,
        "Redirects gated"
    );

    config
}

/// Require `role` on a rule, replacing whatever conditions it had.
#[must_use]
pub fn gate_rule(mut rule: RedirectRule, role: &str) -> RedirectRule {
    let gated = Conditions::role(role);
    if let Some(existing) = &rule.conditions
        && discards_conditions(existing, &gated)
    {
        warn!(
            from = %rule.from,
            roles = ?existing.role,
            other = ?existing.other.keys().collect::<Vec<_>>(),
            "Replacing existing redirect conditions"
        );
    }
    debug!(from = %rule.from, to = %rule.to, "Gating redirect");
    rule.conditions = Some(gated);
    rule
}

/// Whether swapping `existing` for `gated` loses any predicate.
fn discards_conditions(existing: &Conditions, gated: &Conditions) -> bool {
    let empty = existing.role.is_empty() && existing.other.is_empty();
    !empty && existing != gated
}

/// The three rules appended after the gated originals, in evaluation order.
#[must_use]
pub fn control_rules(options: &GateOptions) -> [RedirectRule; 3] {
    [
        RedirectRule::new("/*", "/:splat")
            .with_role(options.role.as_str())
            .with_status(404),
        RedirectRule::new("/", options.login_page.as_str())
            .with_status(401)
            .forced(),
        RedirectRule::new("/*", "/").with_status(302).forced(),
    ]
}
