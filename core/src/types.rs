//! Result records and closed-range parameter types.
//!
//! # Design
//! Field names of the result records match the service's lower-case JSON
//! keys. Failure is data: a `RewriteResult` with `Failure` status or a
//! `UsageStats` with a non-empty `error` is a normal return value.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Read a string field that the service may send as `null`.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Outcome of a rewrite or create-spin call. No other value deserializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewriteStatus {
    Success,
    Failure,
}

impl fmt::Display for RewriteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteStatus::Success => write!(f, "success"),
            RewriteStatus::Failure => write!(f, "failure"),
        }
    }
}

/// Response of `ChimpRewrite` and `CreateSpin`.
///
/// `output` is the rewritten text on success and a human-readable reason on
/// failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteResult {
    pub status: RewriteStatus,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub output: String,
}

impl RewriteResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            status: RewriteStatus::Success,
            output: output.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: RewriteStatus::Failure,
            output: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RewriteStatus::Success
    }
}

/// Credit usage for the account, as returned by `Statistics`.
///
/// When `error` is non-empty the remaining fields are defaults and carry no
/// information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageStats {
    pub remainingthismonth: i64,
    pub prolimit: i64,
    #[serde(deserialize_with = "null_as_empty")]
    pub proexpiry: String,
    pub apilimit: i64,
    #[serde(deserialize_with = "null_as_empty")]
    pub apiexpiry: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub error: String,
    pub usedtoday: i64,
    pub usedthismonth: i64,
    pub usedever: i64,
}

impl UsageStats {
    /// Stats carrying only an error message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }
}

/// Synonym and phrase replacement quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Quality {
    All = 1,
    Average = 2,
    Good = 3,
    Better = 4,
    Best = 5,
}

impl Quality {
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Quality {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Quality::All),
            2 => Ok(Quality::Average),
            3 => Ok(Quality::Good),
            4 => Ok(Quality::Better),
            5 => Ok(Quality::Best),
            other => Err(format!("quality must be 1-5, got {other}")),
        }
    }
}

impl From<Quality> for u8 {
    fn from(q: Quality) -> Self {
        q.value()
    }
}

/// Required part-of-speech match between a word and its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PosMatch {
    None = 0,
    ExtremelyLoose = 1,
    Loose = 2,
    Full = 3,
}

impl PosMatch {
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for PosMatch {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PosMatch::None),
            1 => Ok(PosMatch::ExtremelyLoose),
            2 => Ok(PosMatch::Loose),
            3 => Ok(PosMatch::Full),
            other => Err(format!("posmatch must be 0-3, got {other}")),
        }
    }
}

impl From<PosMatch> for u8 {
    fn from(p: PosMatch) -> Self {
        p.value()
    }
}
