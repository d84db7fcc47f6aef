//! Ordered fallback chains of capture patterns.
//!
//! A [`FieldRule`] pairs the anchor phrases that decide whether a field
//! applies to a document with the capture attempts that narrow it. Attempts
//! run in order and the first non-empty capture wins.

use notice::models::{Failure, FieldValue};
use notice::utils::compile;
use regex::Regex;

use super::normalize::NormalizedText;

/// Which rendering of the document a rule runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextView {
    /// Whitespace-collapsed text.
    Spaced,
    /// Text with every space removed.
    Compact,
}

/// One capture attempt: a regex and the group holding the value.
#[derive(Debug)]
pub struct Capture {
    re: Regex,
    group: usize,
    max_len: Option<usize>,
}

impl Capture {
    pub fn new(pattern: &str, group: usize) -> Self {
        Self {
            re: compile(pattern),
            group,
            max_len: None,
        }
    }

    /// Captures longer than `max_len` characters count as mis-anchors.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub fn regex(&self) -> &Regex {
        &self.re
    }

    /// Raw text of the capture group, possibly empty.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.re
            .captures(text)
            .and_then(|caps| caps.get(self.group))
            .map(|m| m.as_str())
    }

    /// Tidied, non-empty capture within the length limit.
    pub fn find_value<'t>(&self, text: &'t str) -> Option<&'t str> {
        let value = tidy(self.find(text)?);
        if value.is_empty() {
            return None;
        }
        if self.max_len.is_some_and(|max| value.chars().count() > max) {
            tracing::debug!(
                "capture of {} chars exceeds limit for /{}/",
                value.chars().count(),
                self.re.as_str()
            );
            return None;
        }
        Some(value)
    }
}

/// Anchors plus ordered capture attempts for one field.
#[derive(Debug)]
pub struct FieldRule {
    field: &'static str,
    view: TextView,
    anchors: Vec<Regex>,
    attempts: Vec<Capture>,
}

impl FieldRule {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            view: TextView::Spaced,
            anchors: Vec::new(),
            attempts: Vec::new(),
        }
    }

    /// Run against the space-free rendering.
    pub fn compact(mut self) -> Self {
        self.view = TextView::Compact;
        self
    }

    pub fn anchor(mut self, pattern: &str) -> Self {
        self.anchors.push(compile(pattern));
        self
    }

    pub fn attempt(self, pattern: &str, group: usize) -> Self {
        self.capture(Capture::new(pattern, group))
    }

    pub fn capture(mut self, capture: Capture) -> Self {
        self.attempts.push(capture);
        self
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn attempts(&self) -> &[Capture] {
        &self.attempts
    }

    /// The rendering of `text` this rule reads.
    pub fn view_of<'t>(&self, text: &'t NormalizedText) -> &'t str {
        match self.view {
            TextView::Spaced => text.text(),
            TextView::Compact => text.compact(),
        }
    }

    /// Whether any anchor phrase occurs. Rules without anchors always apply.
    pub fn is_anchored(&self, text: &str) -> bool {
        self.anchors.is_empty() || self.anchors.iter().any(|re| re.is_match(text))
    }

    /// First attempt producing a usable capture.
    pub fn first_capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.attempts.iter().enumerate().find_map(|(i, attempt)| {
            let value = attempt.find_value(text)?;
            tracing::debug!("{}: attempt {} matched", self.field, i);
            Some(value)
        })
    }

    /// First attempt whose regex matched at all, even with an empty group.
    pub fn first_match<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.attempts.iter().find_map(|attempt| attempt.find(text))
    }

    /// Three-way extraction over a plain string.
    pub fn extract_str<'t>(&self, text: &'t str) -> FieldValue<&'t str> {
        if !self.is_anchored(text) {
            return FieldValue::Unknown;
        }
        match self.first_capture(text) {
            Some(value) => FieldValue::Value(value),
            None => {
                tracing::debug!("{}: anchor present but no attempt matched", self.field);
                FieldValue::Failed(Failure::RegexExtractionFailed(self.field))
            }
        }
    }

    /// Three-way extraction over the rule's view of a document.
    pub fn extract(&self, text: &NormalizedText) -> FieldValue {
        self.extract_str(self.view_of(text)).map(str::to_string)
    }
}

/// Trim whitespace and dangling separators from a capture.
pub fn tidy(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || matches!(c, ':' | ',' | ';'))
}

/// Remove every whitespace character.
pub fn squeeze(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> FieldRule {
        FieldRule::new("permit number")
            .anchor(r"Permit")
            .attempt(r"Permit No\. (\S+)", 1)
            .capture(Capture::new(r"Permit\s+(\w+)", 1).with_max_len(6))
    }

    #[test]
    fn test_absent_anchor_is_unknown() {
        assert_eq!(rule().extract_str("no anchor here"), FieldValue::Unknown);
    }

    #[test]
    fn test_first_attempt_wins() {
        assert_eq!(
            rule().extract_str("Permit No. SAJ-2023-01234 issued"),
            FieldValue::Value("SAJ-2023-01234")
        );
    }

    #[test]
    fn test_falls_through_to_secondary() {
        assert_eq!(rule().extract_str("Permit ABC12"), FieldValue::Value("ABC12"));
    }

    #[test]
    fn test_overlong_capture_fails() {
        assert_eq!(
            rule().extract_str("Permit Applications"),
            FieldValue::Failed(Failure::RegexExtractionFailed("permit number"))
        );
    }

    #[test]
    fn test_empty_capture_is_skipped() {
        let rule = FieldRule::new("days")
            .attempt(r"within([\s\d]*)days", 1)
            .attempt(r"(\d+) calendar days", 1);
        assert_eq!(
            rule.first_capture("within days, or 30 calendar days"),
            Some("30")
        );
        assert_eq!(rule.first_match("within days"), Some(" "));
    }

    #[test]
    fn test_tidy_and_squeeze() {
        assert_eq!(tidy(" : Jane Doe, "), "Jane Doe");
        assert_eq!(squeeze("MVN - 2023 - 00123"), "MVN-2023-00123");
    }
}
