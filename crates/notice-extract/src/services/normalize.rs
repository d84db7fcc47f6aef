//! Page cleanup and whitespace normalization ahead of field extraction.

use std::sync::LazyLock;

use notice::utils::{compile, spaced, spaced_ci};
use regex::Regex;

use super::rules::DialectRules;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Salutation block between the notice header and the applicant section.
static INTRO: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"((?:{}|{}|{}).*?)(?:{}|4\s?0\s?8\s?\))",
        spaced_ci("TO WHOM IT MAY CONCERN"),
        spaced_ci("PURPOSE OF PUBLIC NOTICE"),
        spaced_ci("Interested parties"),
        spaced("APPLICANT")
    ))
});

/// Document text in the two renderings the rule tables read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    compact: String,
}

impl NormalizedText {
    /// Normalize decoded pages with the dialect's footer and stop rules.
    ///
    /// Pages after the first pass through [`DialectRules::clean_page`].
    /// Reading stops after the first page the dialect marks as the end of
    /// the notice body.
    pub fn from_pages<S: AsRef<str>>(pages: &[S], rules: &dyn DialectRules) -> Self {
        let mut kept = Vec::with_capacity(pages.len());
        for (index, page) in pages.iter().enumerate() {
            let page = strip_invisible(page.as_ref());
            let page = if index == 0 {
                page
            } else {
                rules.clean_page(index + 1, &page)
            };
            let stop = rules.ends_notice(&page);
            kept.push(page);
            if stop {
                tracing::debug!(
                    "{}: attachment marker on page {}, skipping the rest",
                    rules.dialect(),
                    index + 1
                );
                break;
            }
        }
        Self::from_text(&kept.join(" "))
    }

    /// Normalize a single block of text, e.g. a scraped webpage body.
    pub fn from_text(text: &str) -> Self {
        let stripped = strip_invisible(text);
        let text = WHITESPACE.replace_all(&stripped, " ").trim().to_string();
        let compact = text.chars().filter(|c| !c.is_whitespace()).collect();
        Self { text, compact }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The text with every space removed.
    pub fn compact(&self) -> &str {
        &self.compact
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Condensed copy without the salutation block or the dialect's trailing
    /// boilerplate, cut to `limit` characters.
    pub fn trimmed(&self, rules: &dyn DialectRules, limit: usize) -> String {
        let mut text = self.text.clone();
        if let Some(intro) = INTRO.captures(&text).and_then(|c| c.get(1)) {
            text.replace_range(intro.range(), "");
        }
        if let Some(trailing) = rules.table().trailing_boilerplate.as_ref() {
            if let Some(range) = trailing
                .regex()
                .captures(&text)
                .and_then(|c| c.get(1).or_else(|| c.get(0)))
                .map(|m| m.range())
            {
                text.replace_range(range, "");
            }
        }
        let text = WHITESPACE.replace_all(text.trim(), " ");
        text.chars().take(limit).collect()
    }
}

/// Drop zero-width and control characters; turn line breaks and
/// non-breaking spaces into plain spaces.
fn strip_invisible(s: &str) -> String {
    s.chars()
        .filter_map(|c| match c {
            '\n' | '\r' | '\t' | '\u{a0}' | '\u{2007}' | '\u{202f}' => Some(' '),
            '\u{200b}'..='\u{200f}' | '\u{2060}' | '\u{feff}' | '\u{ad}' => None,
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}
