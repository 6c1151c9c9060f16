//! Redirect rules as they appear in `netlify.toml`.
//!
//! ```toml
//! [[redirects]]
//! from = "/blog/*"
//! to = "/posts/:splat"
//! status = 301
//! force = false
//! conditions = { Role = ["admin"] }
//! ```
//!
//! Keys this crate does not interpret (`headers`, `query`, `signed`, other
//! condition kinds) are kept in `extra`/`other` so a parse and re-serialize
//! leaves them untouched.

use serde::{Deserialize, Serialize};

/// A single path-rewrite rule.
///
/// The platform evaluates rules in order and applies the first one whose
/// `from` matches and whose `conditions` hold for the requester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedirectRule {
    /// Source path pattern, may end in a `*` wildcard
    pub from: String,

    /// Destination path, may reference the wildcard as `:splat`
    pub to: String,

    /// HTTP status to answer with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Apply even when a static asset exists at `from`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,

    /// Requester predicates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Conditions>,

    /// Keys passed through to the platform as-is
    #[serde(flatten)]
    pub extra: toml::Table,
}

impl RedirectRule {
    /// Create a plain rule with no status, force flag or conditions.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            status: None,
            force: None,
            conditions: None,
            extra: toml::Table::new(),
        }
    }

    /// Set the response status.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Mark the rule as forced.
    #[must_use]
    pub fn forced(mut self) -> Self {
        self.force = Some(true);
        self
    }

    /// Replace the conditions with a single required role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.conditions = Some(Conditions::role(role));
        self
    }

    /// Roles required by this rule, empty when ungated.
    pub fn roles(&self) -> &[String] {
        match &self.conditions {
            Some(conditions) => &conditions.role,
            None => &[],
        }
    }
}

/// Predicates a request must satisfy for a rule to match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    /// The requester must carry one of these role claims
    #[serde(rename = "Role", default, skip_serializing_if = "Vec::is_empty")]
    pub role: Vec<String>,

    /// Other condition kinds (`Country`, `Language`, ...)
    #[serde(flatten)]
    pub other: toml::Table,
}

impl Conditions {
    /// Conditions consisting of exactly one required role.
    pub fn role(role: impl Into<String>) -> Self {
        Self {
            role: vec![role.into()],
            other: toml::Table::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Deserialize)]
    struct Doc {
        redirects: Vec<RedirectRule>,
    }

    #[test]
    fn test_parse_full_rule() {
        let doc: Doc = toml::from_str(
            r#"
[[redirects]]
from = "/blog/*"
to = "/posts/:splat"
status = 301
force = true
conditions = { Role = ["admin", "editor"], Country = ["FI"] }
headers = { X-From = "Netlify" }
"#,
        )
        .unwrap();

        let rule = &doc.redirects[0];
        assert_eq!(rule.from, "/blog/*");
        assert_eq!(rule.to, "/posts/:splat");
        assert_eq!(rule.status, Some(301));
        assert_eq!(rule.force, Some(true));
        assert_eq!(rule.roles(), ["admin", "editor"]);
        let conditions = rule.conditions.as_ref().unwrap();
        assert!(conditions.other.contains_key("Country"));
        assert!(rule.extra.contains_key("headers"));
    }

    #[test]
    fn test_parse_minimal_rule() {
        let doc: Doc = toml::from_str(
            r#"
[[redirects]]
from = "/old"
to = "/new"
"#,
        )
        .unwrap();

        assert_eq!(doc.redirects[0], RedirectRule::new("/old", "/new"));
        assert!(doc.redirects[0].roles().is_empty());
    }

    #[test]
    fn test_builders() {
        let rule = RedirectRule::new("/", "/login")
            .with_status(401)
            .forced()
            .with_role("netlify");
        assert_eq!(rule.status, Some(401));
        assert_eq!(rule.force, Some(true));
        assert_eq!(rule.roles(), ["netlify"]);
    }

    #[test]
    fn test_serialize_skips_unset_fields() {
        let out = toml::to_string(&RedirectRule::new("/a", "/b")).unwrap();
        assert!(out.contains("from = \"/a\""));
        assert!(!out.contains("status"));
        assert!(!out.contains("force"));
        assert!(!out.contains("conditions"));
    }
}
