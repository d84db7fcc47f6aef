use std::sync::LazyLock;

use notice::models::{Failure, FieldValue};
use notice::utils::compile;
use regex::Regex;

use crate::services::chain::{squeeze, tidy};
use crate::services::normalize::NormalizedText;
use crate::services::rules::DialectRules;

static WQC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"WQC([\d\s:]*-[\s\d]*)").expect("water quality pattern"));

static COASTAL_PROGRAM: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Coastal\s{0,2}Resources\s{0,2}Program"));

static COASTAL_PERMIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"P\d{8}").expect("coastal permit pattern"));

/// Water quality certification number, e.g. "WQC 230512-01" -> "230512-01".
pub fn extract_water_quality_cert(text: &NormalizedText) -> FieldValue {
    let text = text.text();
    if !text.contains("WQC") {
        return FieldValue::Unknown;
    }
    WQC.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| tidy(&squeeze(m.as_str())).to_string())
        .filter(|id| !id.is_empty() && id != "-")
        .map_or(
            FieldValue::Failed(Failure::RegexExtractionFailed("water quality certification")),
            FieldValue::Value,
        )
}

/// Coastal use permit numbers listed under the Coastal Resources Program.
pub fn extract_coastal_use_permits(text: &NormalizedText) -> FieldValue<Vec<String>> {
    let text = text.text();
    if !COASTAL_PROGRAM.is_match(text) {
        return FieldValue::Unknown;
    }
    let mut ids: Vec<String> = Vec::new();
    for id in COASTAL_PERMIT.find_iter(text).map(|m| m.as_str().to_string()) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    if ids.is_empty() {
        FieldValue::Failed(Failure::RegexExtractionFailed("coastal use permit"))
    } else {
        FieldValue::Value(ids)
    }
}

/// Length of the public comment period in days.
pub fn extract_comment_window(text: &NormalizedText, rules: &dyn DialectRules) -> FieldValue<u32> {
    rules
        .table()
        .comment_window
        .extract(text)
        .and_then(|raw| match squeeze(&raw).parse::<u32>() {
            Ok(days) => FieldValue::Value(days),
            Err(_) => {
                tracing::debug!("comment window {:?} is not a number", raw);
                FieldValue::Failed(Failure::RegexExtractionFailed("comment window"))
            }
        })
}
