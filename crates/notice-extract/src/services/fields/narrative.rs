use notice::models::{Failure, FieldValue};

use crate::services::normalize::NormalizedText;
use crate::services::rules::{DialectRules, MitigationRule};

/// "Character of work" section.
pub fn extract_work_description(text: &NormalizedText, rules: &dyn DialectRules) -> FieldValue {
    rules.table().work_description.extract(text)
}

/// Mitigation section. Templates with separate avoidance and compensatory
/// sections need every part to match; the parts are joined with a space.
pub fn extract_mitigation(text: &NormalizedText, rules: &dyn DialectRules) -> FieldValue {
    match &rules.table().mitigation {
        MitigationRule::Section(rule) => rule.extract(text),
        MitigationRule::Combined { anchor, parts } => {
            let text = text.text();
            if !anchor.is_match(text) {
                return FieldValue::Unknown;
            }
            let found: Option<Vec<&str>> = parts.iter().map(|part| part.find_value(text)).collect();
            match found {
                Some(found) => FieldValue::Value(found.join(" ")),
                None => {
                    tracing::debug!("mitigation anchor present but a section is missing");
                    FieldValue::Failed(Failure::RegexExtractionFailed("mitigation"))
                }
            }
        }
    }
}
