//! Game-version naming: patch string → release flavour and interface id.
//!
//! | Patch prefix | Flavour         |
//! |--------------|-----------------|
//! | `1.`         | `classic`       |
//! | `2.`         | `classic-tbc`   |
//! | `3.`         | `classic-wotlk` |
//! | anything else| `mainline`      |
//!
//! Interface ids encode `major.minor` only: `10.1.5` → `100100`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MirrorError;

/// Game variant a patch version targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flavour {
    Mainline,
    Classic,
    ClassicTbc,
    ClassicWotlk,
}

impl Flavour {
    pub fn as_str(self) -> &'static str {
        match self {
            Flavour::Mainline => "mainline",
            Flavour::Classic => "classic",
            Flavour::ClassicTbc => "classic-tbc",
            Flavour::ClassicWotlk => "classic-wotlk",
        }
    }
}

impl fmt::Display for Flavour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const FLAVOUR_PREFIXES: &[(&str, Flavour)] = &[
    ("1.", Flavour::Classic),
    ("2.", Flavour::ClassicTbc),
    ("3.", Flavour::ClassicWotlk),
];

/// Flavour for `patch`, decided by its two-character `"<major>."` prefix.
///
/// `"10.1.0"` has prefix `"10"`, which matches nothing, so it is mainline.
pub fn flavour_of(patch: &str) -> Result<Flavour, MirrorError> {
    let prefix = patch
        .get(..2)
        .ok_or_else(|| MirrorError::malformed(patch, "too short to carry a major version"))?;
    Ok(FLAVOUR_PREFIXES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, flavour)| *flavour)
        .unwrap_or(Flavour::Mainline))
}

/// Interface id for `patch`: `major * 10000 + minor * 100`.
///
/// The patch-level component, if any, is ignored.
pub fn interface_id_of(patch: &str) -> Result<u32, MirrorError> {
    let mut bits = patch.splitn(3, '.');
    let major = bits.next().unwrap_or_default();
    let minor = bits
        .next()
        .ok_or_else(|| MirrorError::malformed(patch, "expected at least <major>.<minor>"))?;

    let major: u32 = major
        .parse()
        .map_err(|e| MirrorError::malformed(patch, format!("major '{major}': {e}")))?;
    let minor: u32 = minor
        .parse()
        .map_err(|e| MirrorError::malformed(patch, format!("minor '{minor}': {e}")))?;

    major
        .checked_mul(10_000)
        .and_then(|m| minor.checked_mul(100).and_then(|n| m.checked_add(n)))
        .ok_or_else(|| MirrorError::malformed(patch, "interface id overflows u32"))
}
