//! Three-way field outcome: extracted value, legitimately absent, or failed.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Sentinel string for a field that does not apply to a document.
pub const UNKNOWN: &str = "unknown";

/// Why a field could not be extracted.
///
/// The display form is the string consumers see in serialized records and
/// always starts with `ERROR:` or `CHECK:`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    /// Anchor phrase present but no capture pattern matched.
    #[error("ERROR: regex extraction failed for {0}")]
    RegexExtractionFailed(&'static str),

    /// A capture was found but looks like a mis-anchor and needs review.
    #[error("CHECK: {0}")]
    SuspectCapture(String),

    /// The section this field is read from could not be extracted.
    #[error("ERROR: cannot extract {0}")]
    UpstreamMissing(&'static str),

    /// No text could be obtained from any source.
    #[error("ERROR: fail to read pdf")]
    TextUnavailable,

    /// Extraction of the document was interrupted.
    #[error("ERROR: extraction aborted: {0}")]
    Internal(String),
}

/// Borrowed view of a field's state, used for uniform inspection of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus<'a> {
    Value,
    Unknown,
    Failed(&'a Failure),
}

/// Outcome of extracting one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<T = String> {
    Value(T),
    Unknown,
    Failed(Failure),
}

impl<T> FieldValue<T> {
    pub fn failed(failure: Failure) -> Self {
        Self::Failed(failure)
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failed(f) => Some(f),
            _ => None,
        }
    }

    pub fn status(&self) -> FieldStatus<'_> {
        match self {
            Self::Value(_) => FieldStatus::Value,
            Self::Unknown => FieldStatus::Unknown,
            Self::Failed(f) => FieldStatus::Failed(f),
        }
    }

    pub fn as_ref(&self) -> FieldValue<&T> {
        match self {
            Self::Value(v) => FieldValue::Value(v),
            Self::Unknown => FieldValue::Unknown,
            Self::Failed(f) => FieldValue::Failed(f.clone()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FieldValue<U> {
        match self {
            Self::Value(v) => FieldValue::Value(f(v)),
            Self::Unknown => FieldValue::Unknown,
            Self::Failed(e) => FieldValue::Failed(e),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> FieldValue<U>) -> FieldValue<U> {
        match self {
            Self::Value(v) => f(v),
            Self::Unknown => FieldValue::Unknown,
            Self::Failed(e) => FieldValue::Failed(e),
        }
    }

    /// Replace a non-value outcome with the result of `f`, keeping the
    /// original outcome if `f` yields nothing better.
    pub fn or_try(self, f: impl FnOnce() -> Option<T>) -> Self {
        match self {
            Self::Value(v) => Self::Value(v),
            other => match f() {
                Some(v) => Self::Value(v),
                None => other,
            },
        }
    }

    /// Demote a failure to `Unknown`.
    pub fn failure_as_unknown(self) -> Self {
        match self {
            Self::Failed(_) => Self::Unknown,
            other => other,
        }
    }
}

impl FieldValue<String> {
    /// Canonical string rendering used by flat consumers.
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Value(v) => v.clone(),
            Self::Unknown => UNKNOWN.to_string(),
            Self::Failed(f) => f.to_string(),
        }
    }
}

impl<T> From<Option<T>> for FieldValue<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Value(v),
            None => Self::Unknown,
        }
    }
}

impl<T: Serialize> Serialize for FieldValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => v.serialize(serializer),
            Self::Unknown => serializer.serialize_str(UNKNOWN),
            Self::Failed(f) => serializer.collect_str(f),
        }
    }
}
