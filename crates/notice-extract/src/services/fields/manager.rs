use std::sync::LazyLock;

use notice::models::{Failure, FieldValue};
use notice::utils::{compile, spaced, spaced_ci};
use regex::Regex;

use crate::services::chain::{squeeze, tidy};
use crate::services::normalize::NormalizedText;
use crate::services::rules::{DialectRules, ManagerNameRule};

/// Organizational units commonly captured in place of a person.
static ORG_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    let units = ["Regulatory", "Branch", "Division", "Engineers", "USACE"]
        .map(spaced_ci)
        .join("|");
    compile(&units)
});

static PROJECT_MANAGER: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"{}\s?:?", spaced("Project Manager"))));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// "... at " or "... to " preceding an address.
static EMAIL_LEAD_IN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*\s(?:at|to)\s").expect("email lead-in pattern"));

/// Up to four capitalized words directly before a three-digit area code.
static NAME_BEFORE_PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"((?:[A-Z][a-zA-Z.]*\s){1,3}[A-Z][a-zA-Z.]*)\s*\(?(\d{3})\)?[\s\-.]")
        .expect("name before phone pattern")
});

const MAX_NAME_LEN: usize = 50;

/// Project manager contact details.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagerContact {
    pub name: FieldValue,
    pub phone: FieldValue,
    pub email: FieldValue,
}

pub fn extract_manager(text: &NormalizedText, rules: &dyn DialectRules) -> ManagerContact {
    let table = rules.table();
    let phone = table
        .manager_phone
        .extract(text)
        .map(|phone| phone.trim().to_string());
    let email = table.manager_email.extract(text).map(|raw| clean_email(&raw));
    let name = extract_name(
        text.text(),
        &table.manager_name,
        phone.as_value().map(String::as_str),
    );
    ManagerContact { name, phone, email }
}

fn extract_name(text: &str, rule: &ManagerNameRule, phone: Option<&str>) -> FieldValue {
    if !rule.name.is_anchored(text) {
        return FieldValue::Unknown;
    }

    let scoped = match &rule.scope {
        Some(scope) => match scope.find_value(text) {
            Some(paragraph) => paragraph,
            None => {
                tracing::debug!("manager name: no contact paragraph");
                return FieldValue::Failed(Failure::RegexExtractionFailed("manager name"));
            }
        },
        None => text,
    };

    let candidate = match rule.name.first_capture(scoped) {
        Some(name) => Some(clean_name(name)),
        None => {
            if let (Some(default), Some(found)) = (rule.empty_default, rule.name.first_match(scoped))
            {
                if tidy(found).is_empty() {
                    return FieldValue::Value(default.to_string());
                }
            }
            None
        }
    };

    match candidate {
        Some(name) if !name.is_empty() && !looks_like_org_unit(&name) => FieldValue::Value(name),
        candidate => {
            if let Some(person) = retry_person(text, rule, phone) {
                tracing::debug!("manager name recovered after organizational capture");
                return FieldValue::Value(person);
            }
            match candidate {
                Some(name) if !name.is_empty() => FieldValue::Failed(Failure::SuspectCapture(name)),
                _ => FieldValue::Failed(Failure::RegexExtractionFailed("manager name")),
            }
        }
    }
}

fn retry_person(text: &str, rule: &ManagerNameRule, phone: Option<&str>) -> Option<String> {
    let retried = rule
        .org_unit_retry
        .iter()
        .filter_map(|capture| capture.find_value(text))
        .map(clean_name)
        .find(|name| !name.is_empty() && !looks_like_org_unit(name));
    if retried.is_some() {
        return retried;
    }
    if rule.area_code_lookup {
        return phone.and_then(|phone| name_before_area_code(text, phone));
    }
    None
}

/// Proper-name words directly before the phone number's area code, without
/// any leading organizational words.
fn name_before_area_code(text: &str, phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    let area = digits.get(..3)?;
    let words = NAME_BEFORE_PHONE
        .captures_iter(text)
        .find(|caps| caps.get(2).is_some_and(|m| m.as_str() == area))?
        .get(1)?
        .as_str();
    let words: Vec<&str> = words.split_whitespace().collect();
    let start = words
        .iter()
        .rposition(|word| ORG_UNIT.is_match(word))
        .map_or(0, |i| i + 1);
    let name = words[start..].join(" ");
    (!name.is_empty()).then_some(name)
}

fn looks_like_org_unit(name: &str) -> bool {
    ORG_UNIT.is_match(name) || name.chars().count() > MAX_NAME_LEN
}

fn clean_name(raw: &str) -> String {
    let name = PROJECT_MANAGER.replace_all(raw, " ");
    let name = WHITESPACE.replace_all(&name, " ");
    tidy(&name).to_string()
}

fn clean_email(raw: &str) -> String {
    let email = EMAIL_LEAD_IN.replace(raw, "");
    squeeze(&email).replace(";@", "@").replace("@.", "@")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::rules::rules_for;
    use notice::models::Dialect;

    #[test]
    fn test_mvn_contact_block() {
        let text = NormalizedText::from_text(
            "comments to Project Manager: Jane Doe (504) 862-1234 jane.doe@usace.army.mil Permit",
        );
        let contact = extract_manager(&text, rules_for(Dialect::Mvn));
        assert_eq!(contact.name, FieldValue::Value("Jane Doe".to_string()));
        assert_eq!(contact.phone, FieldValue::Value("(504)862-1234".to_string()));
        assert_eq!(
            contact.email,
            FieldValue::Value("jane.doe@usace.army.mil".to_string())
        );
    }

    #[test]
    fn test_org_unit_capture_is_retried() {
        let text = NormalizedText::from_text(
            "Project Manager: Regulatory Branch Jane Doe (504) 862-1234",
        );
        let contact = extract_manager(&text, rules_for(Dialect::Mvn));
        assert_eq!(contact.name, FieldValue::Value("Jane Doe".to_string()));
    }

    #[test]
    fn test_name_before_area_code() {
        assert_eq!(
            name_before_area_code("contact Regulatory Branch Jane Doe (504) 862-1234", "(504)862-1234"),
            Some("Jane Doe".to_string())
        );
        assert_eq!(
            name_before_area_code("Bayou Road 862 Jane Doe (504) 862-1234", "(504)862-1234"),
            Some("Jane Doe".to_string())
        );
        assert_eq!(name_before_area_code("no phone here", "(504)862-1234"), None);
    }

    #[test]
    fn test_absent_contact_is_unknown() {
        let text = NormalizedText::from_text("PUBLIC NOTICE with no manager details");
        let contact = extract_manager(&text, rules_for(Dialect::Saj));
        assert!(contact.name.is_unknown());
        assert!(contact.phone.is_unknown());
        assert!(contact.email.is_unknown());
    }

    #[test]
    fn test_email_lead_in_removed() {
        assert_eq!(
            clean_email("Mr. Doe at jane.doe ;@usace.army.mil"),
            "jane.doe@usace.army.mil"
        );
    }
}
