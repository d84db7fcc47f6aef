use notice::models::{Failure, FieldValue};

use crate::services::normalize::NormalizedText;
use crate::services::rules::{AgentRule, ApplicantSplit, DialectRules};

/// Applicant block and the parties named in it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicantInfo {
    pub raw_text: FieldValue,
    pub applicant: FieldValue,
    /// Contractor or agent acting for the applicant.
    pub contractor: FieldValue,
}

pub fn extract_applicant(text: &NormalizedText, rules: &dyn DialectRules) -> ApplicantInfo {
    let rule = &rules.table().applicant;
    let text = text.text();

    let anchored = rule.anchor.is_match(text);
    let raw_text = if anchored {
        value_or_failed(rule.contents.find_value(text), "applicant")
    } else {
        FieldValue::Unknown
    };

    match &rule.split {
        ApplicantSplit::CareOf {
            marker,
            before,
            after,
            plain,
        } => {
            let Some(contents) = raw_text.as_value() else {
                let outcome = raw_text.clone();
                return ApplicantInfo {
                    applicant: outcome.clone(),
                    contractor: outcome,
                    raw_text,
                };
            };
            let (applicant, contractor) = if marker.is_match(contents) {
                (
                    value_or_failed(before.find_value(contents), "applicant"),
                    value_or_failed(after.find_value(contents), "contractor"),
                )
            } else {
                (
                    value_or_failed(plain.find_value(contents), "applicant"),
                    FieldValue::Unknown,
                )
            };
            ApplicantInfo {
                raw_text,
                applicant,
                contractor,
            }
        }
        ApplicantSplit::Labeled { applicant, agent } => {
            let applicant = if anchored {
                value_or_failed(applicant.find_value(text), "applicant")
            } else {
                FieldValue::Unknown
            };
            let contractor = agent
                .as_ref()
                .map_or(FieldValue::Unknown, |agent| extract_agent(agent, text));
            ApplicantInfo {
                raw_text,
                applicant,
                contractor,
            }
        }
        ApplicantSplit::FromContents { applicant } => {
            let applicant = raw_text
                .as_ref()
                .and_then(|contents| value_or_failed(applicant.find_value(contents), "applicant"));
            ApplicantInfo {
                raw_text,
                applicant,
                contractor: FieldValue::Unknown,
            }
        }
    }
}

fn extract_agent(agent: &AgentRule, text: &str) -> FieldValue {
    if !agent.anchor.is_match(text) {
        return FieldValue::Unknown;
    }
    value_or_failed(agent.name.find_value(text), "contractor")
}

fn value_or_failed(found: Option<&str>, field: &'static str) -> FieldValue {
    match found {
        Some(value) => FieldValue::Value(value.to_string()),
        None => FieldValue::Failed(Failure::RegexExtractionFailed(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::rules::rules_for;
    use notice::models::Dialect;

    #[test]
    fn test_care_of_splits_applicant_and_contractor() {
        let text = NormalizedText::from_text(
            "APPLICANT: Acme Terminals LLC, c/o Coastal Permits Inc., Post Office Box 12, \
             Houma, LA 70361 LOCATION OF WORK: Bayou Lafourche",
        );
        let info = extract_applicant(&text, rules_for(Dialect::Mvn));
        assert_eq!(info.applicant, FieldValue::Value("Acme Terminals LLC".to_string()));
        assert_eq!(
            info.contractor,
            FieldValue::Value("Coastal Permits Inc.".to_string())
        );
        assert!(info.raw_text.as_value().unwrap().contains("Houma"));
    }

    #[test]
    fn test_no_care_of_leaves_contractor_unknown() {
        let text = NormalizedText::from_text(
            "APPLICANT: Jane Smith, 123 Bayou Road, Houma, LA LOCATION OF WORK: wetlands",
        );
        let info = extract_applicant(&text, rules_for(Dialect::Mvn));
        assert_eq!(info.applicant, FieldValue::Value("Jane Smith".to_string()));
        assert!(info.contractor.is_unknown());
    }

    #[test]
    fn test_labeled_agent() {
        let text = NormalizedText::from_text(
            "APPLICANT: City of Orange Beach Post Office Box 458 AGENT: Goodwyn Mills Cawood, \
             11 North Water Street LOCATION: Wolf Bay",
        );
        let info = extract_applicant(&text, rules_for(Dialect::Sam));
        assert_eq!(info.applicant, FieldValue::Value("City of Orange Beach".to_string()));
        assert_eq!(
            info.contractor,
            FieldValue::Value("Goodwyn Mills Cawood".to_string())
        );
    }

    #[test]
    fn test_missing_anchor_is_unknown_everywhere() {
        let text = NormalizedText::from_text("PUBLIC NOTICE no parties named");
        let info = extract_applicant(&text, rules_for(Dialect::Saj));
        assert!(info.raw_text.is_unknown());
        assert!(info.applicant.is_unknown());
        assert!(info.contractor.is_unknown());
    }
}
