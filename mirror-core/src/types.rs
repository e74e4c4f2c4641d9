//! Domain types for the addon mirror.
//!
//! The catalog wire format uses short field names (`url`, `patch`); the Rust
//! side names them by what they hold.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MirrorError;

/// File extension of every mirrored artifact.
pub const ARTIFACT_EXTENSION: &str = "zip";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Stable addon identifier. Doubles as the mirror repository name and the
/// artifact file-name prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slug(pub String);

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Slug {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Slug {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Slug {
    /// Reject slugs that would not stay a single directory under the repos dir.
    pub fn validate(&self) -> Result<(), MirrorError> {
        check_component("slug", &self.0).map_err(|reason| MirrorError::InvalidAddon {
            slug: self.0.clone(),
            reason,
        })
    }
}

/// `value` must name exactly one entry inside its parent directory.
fn check_component(field: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{field} is empty"));
    }
    if value == "." || value == ".." {
        return Err(format!("{field} '{value}' is a relative directory"));
    }
    if value.contains(|c: char| matches!(c, '/' | '\\' | '\0')) {
        return Err(format!("{field} '{value}' contains a path separator"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One upstream addon as listed by the catalog. Immutable for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonDescriptor {
    pub slug: Slug,
    /// Display name; used as the hosted release title.
    pub name: String,
    #[serde(rename = "url")]
    pub artifact_url: String,
    /// Opaque upstream version. Only ever compared for equality.
    pub version: String,
    /// Game versions this artifact supports, in catalog order.
    #[serde(rename = "patch", default)]
    pub patch_list: Vec<String>,
}

impl AddonDescriptor {
    /// Deterministic artifact file name: `<slug>--<version>.zip`.
    pub fn artifact_file_name(&self) -> String {
        format!("{}--{}.{}", self.slug, self.version, ARTIFACT_EXTENSION)
    }

    /// Slug and version both end up in file names; neither may escape its directory.
    pub fn validate(&self) -> Result<(), MirrorError> {
        self.slug.validate()?;
        check_component("version", &self.version).map_err(|reason| MirrorError::InvalidAddon {
            slug: self.slug.0.clone(),
            reason,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn elvui() -> AddonDescriptor {
        AddonDescriptor {
            slug: Slug::from("elvui"),
            name: "ElvUI".to_string(),
            artifact_url: "https://example.org/elvui.zip".to_string(),
            version: "13.33".to_string(),
            patch_list: vec!["10.1.0".to_string()],
        }
    }

    #[test]
    fn slug_display() {
        assert_eq!(Slug::from("tukui").to_string(), "tukui");
    }

    #[test]
    fn artifact_file_name_is_slug_dash_dash_version() {
        assert_eq!(elvui().artifact_file_name(), "elvui--13.33.zip");
    }

    #[test]
    fn catalog_wire_names_are_used_for_serde() {
        let value = serde_json::to_value(elvui()).expect("serialize");
        assert_eq!(value["slug"], "elvui");
        assert_eq!(value["url"], "https://example.org/elvui.zip");
        assert_eq!(value["patch"][0], "10.1.0");
        assert!(value.get("artifact_url").is_none());
    }

    #[rstest]
    #[case::empty("")]
    #[case::current_dir(".")]
    #[case::parent_dir("..")]
    #[case::sibling("../cache")]
    #[case::nested("a/b")]
    #[case::backslash("a\\b")]
    fn unsafe_slugs_are_rejected(#[case] slug: &str) {
        let addon = AddonDescriptor {
            slug: Slug::from(slug),
            ..elvui()
        };
        let err = addon.validate().unwrap_err();
        assert!(matches!(err, MirrorError::InvalidAddon { .. }), "got: {err}");
    }

    #[rstest]
    #[case::empty("")]
    #[case::parent_dir("..")]
    #[case::traversal("1/../../../../tmp/owned")]
    fn unsafe_versions_are_rejected(#[case] version: &str) {
        let addon = AddonDescriptor {
            version: version.to_string(),
            ..elvui()
        };
        match addon.validate().unwrap_err() {
            MirrorError::InvalidAddon { slug, reason } => {
                assert_eq!(slug, "elvui");
                assert!(reason.starts_with("version"), "got: {reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ordinary_slugs_and_versions_pass() {
        assert!(elvui().validate().is_ok());
        let addon = AddonDescriptor {
            slug: Slug::from("deadly-boss-mods"),
            version: "v10.1.27-beta..2".to_string(),
            ..elvui()
        };
        assert!(addon.validate().is_ok());
    }

    #[test]
    fn missing_patch_field_defaults_to_empty() {
        let json = r#"{"slug":"x","name":"X","url":"u","version":"1"}"#;
        let addon: AddonDescriptor = serde_json::from_str(json).expect("deserialize");
        assert!(addon.patch_list.is_empty());
    }
}
