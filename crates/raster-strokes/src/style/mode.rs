//! Enumerated style options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Raised when a mode string is not one of the recognized names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseModeError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Serde adapter: unknown names become the default instead of failing the
/// whole document.
pub(crate) fn deserialize_lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = ParseModeError> + Default,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.parse().unwrap_or_else(|e: ParseModeError| {
        tracing::warn!(%e, "using default");
        T::default()
    }))
}

/// How aggressively detail accents are added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetailMode {
    #[default]
    Balanced,
    Max,
    Minimal,
}

impl DetailMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Max => "max",
            Self::Minimal => "minimal",
        }
    }

    /// Parse, falling back to [`DetailMode::Balanced`] with a warning.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|e: ParseModeError| {
            tracing::warn!(%e, "using default detail mode");
            Self::default()
        })
    }

    /// Scale applied to the detail lane offset.
    pub fn offset_multiplier(self) -> f64 {
        match self {
            Self::Max => 1.35,
            Self::Minimal => 0.75,
            Self::Balanced => 1.0,
        }
    }

    /// Longest run (in pixels) that gets a micro accent instead of an
    /// offset accent.
    pub fn micro_threshold(self) -> usize {
        match self {
            Self::Max => 4,
            Self::Minimal => 1,
            Self::Balanced => 2,
        }
    }
}

impl FromStr for DetailMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "balanced" => Ok(Self::Balanced),
            "max" => Ok(Self::Max),
            "minimal" => Ok(Self::Minimal),
            _ => Err(ParseModeError {
                kind: "detail mode",
                value: s.to_string(),
                expected: "balanced, max, minimal",
            }),
        }
    }
}

impl fmt::Display for DetailMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order in which palette groups are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaletteOrder {
    /// Luminance ascending.
    #[default]
    DarkFirst,
    /// Luminance descending.
    LightFirst,
    /// Coverage score descending.
    Coverage,
}

impl PaletteOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DarkFirst => "dark-first",
            Self::LightFirst => "light-first",
            Self::Coverage => "coverage",
        }
    }

    /// Parse, falling back to [`PaletteOrder::DarkFirst`] with a warning.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|e: ParseModeError| {
            tracing::warn!(%e, "using default palette order");
            Self::default()
        })
    }
}

impl FromStr for PaletteOrder {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark-first" => Ok(Self::DarkFirst),
            "light-first" => Ok(Self::LightFirst),
            "coverage" => Ok(Self::Coverage),
            _ => Err(ParseModeError {
                kind: "palette order",
                value: s.to_string(),
                expected: "dark-first, light-first, coverage",
            }),
        }
    }
}

impl fmt::Display for PaletteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
