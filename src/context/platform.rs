//! Ad platforms a run can target.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target ad platform for a run, and the platform set a check applies to.
///
/// `Universal` doubles as the sentinel in a check's platform set meaning
/// "applies to every run".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Meta,
    Google,
    Tiktok,
    Linkedin,
    Multi,
    Universal,
}

impl Platform {
    /// All platforms, in declaration order.
    pub const ALL: [Platform; 6] = [
        Platform::Meta,
        Platform::Google,
        Platform::Tiktok,
        Platform::Linkedin,
        Platform::Multi,
        Platform::Universal,
    ];

    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Meta => "meta",
            Platform::Google => "google",
            Platform::Tiktok => "tiktok",
            Platform::Linkedin => "linkedin",
            Platform::Multi => "multi",
            Platform::Universal => "universal",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == needle)
            .ok_or_else(|| {
                format!(
                    "unknown platform '{}' (expected one of: meta, google, tiktok, linkedin, multi, universal)",
                    s
                )
            })
    }
}
