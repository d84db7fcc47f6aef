//! District dialects.
//!
//! Each permitting district publishes notices from its own template, so
//! every extraction rule is keyed on one of these four values.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// District marker embedded in notice URLs, e.g. `www.mvn.usace.army.mil`.
static URL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"www\.(.*?)\.usace").expect("URL marker regex should compile"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialectError {
    #[error("Dialect unknown: {0}")]
    DialectUnknown(String),
}

/// Source-document dialect, one per regional district office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// New Orleans District.
    Mvn,
    /// Mobile District.
    Sam,
    /// Jacksonville District. Its URLs carry no district marker.
    Saj,
    /// Galveston District.
    Swg,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [Self::Mvn, Self::Sam, Self::Saj, Self::Swg];

    /// Dialect used when a URL carries no recognizable marker.
    pub const FALLBACK: Dialect = Self::Saj;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mvn => "mvn",
            Self::Sam => "sam",
            Self::Saj => "saj",
            Self::Swg => "swg",
        }
    }

    /// Upper-case district code as it appears in permit numbers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Mvn => "MVN",
            Self::Sam => "SAM",
            Self::Saj => "SAJ",
            Self::Swg => "SWG",
        }
    }

    pub fn district_name(&self) -> &'static str {
        match self {
            Self::Mvn => "New Orleans District",
            Self::Sam => "Mobile District",
            Self::Saj => "Jacksonville District",
            Self::Swg => "Galveston District",
        }
    }

    /// Parse a district code, case-insensitively.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mvn" => Some(Self::Mvn),
            "sam" => Some(Self::Sam),
            "saj" => Some(Self::Saj),
            "swg" => Some(Self::Swg),
            _ => None,
        }
    }

    /// Derive the dialect from the district marker in a URL.
    pub fn resolve(url: &str) -> Result<Self, DialectError> {
        let code = URL_MARKER
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| DialectError::DialectUnknown(url.to_string()))?;
        Self::from_str(code).ok_or_else(|| DialectError::DialectUnknown(code.to_string()))
    }

    /// Resolve from the first URL carrying a marker, defaulting to
    /// [`Dialect::FALLBACK`].
    pub fn resolve_or_default<'a>(urls: impl IntoIterator<Item = &'a str>) -> Self {
        let mut last_err = None;
        for url in urls {
            match Self::resolve(url) {
                Ok(dialect) => return dialect,
                Err(e) => last_err = Some(e),
            }
        }
        if let Some(e) = last_err {
            tracing::debug!("{}, defaulting to {}", e, Self::FALLBACK);
        }
        Self::FALLBACK
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
