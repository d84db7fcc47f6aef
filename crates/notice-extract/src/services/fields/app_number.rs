use std::sync::LazyLock;

use notice::models::{Failure, FieldValue};
use regex::Regex;

use crate::services::chain::squeeze;
use crate::services::normalize::NormalizedText;
use crate::services::rules::DialectRules;

/// Permit number in a display title. Spaces may separate the parts and a
/// parenthetical suffix such as "(SP-ABC)" is left out.
static TITLE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z]{3})-?\s?(\d{4})-?\s?(\d{3,5})(?:-?\s?([A-Z]{2,3})\b)?")
        .expect("title number pattern")
});

/// Permit application number from the notice body.
pub fn extract_application_number(text: &NormalizedText, rules: &dyn DialectRules) -> FieldValue {
    rules
        .table()
        .application_number
        .extract(text)
        .and_then(|raw| {
            let number = squeeze(&raw).replace("PUBLICNOTICE", "");
            if number.is_empty() {
                FieldValue::Failed(Failure::RegexExtractionFailed("application number"))
            } else {
                FieldValue::Value(number)
            }
        })
}

/// Permit application number from a notice title, in the hyphenated
/// `XXX-YYYY-NNNNN[-SFX]` form the body extractor produces.
pub fn application_number_from_title(title: &str) -> Option<String> {
    let caps = TITLE_NUMBER.captures(title)?;
    let mut number = format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]);
    if let Some(suffix) = caps.get(4) {
        number.push('-');
        number.push_str(suffix.as_str());
    }
    tracing::debug!("application number {} recovered from title", number);
    Some(number)
}
