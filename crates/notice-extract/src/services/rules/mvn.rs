//! New Orleans District.
//!
//! Notices use full section headings ("LOCATION OF WORK", "CHARACTER OF
//! WORK") and print a bare page number at the foot of every page.

use std::sync::LazyLock;

use notice::models::Dialect;
use notice::utils::{compile, spaced, spaced_lead};
use regex::{Captures, Regex};

use super::{
    application_code_fallback, comment_period_fallback, email_domain, email_fallback,
    enclosure_marker, location_fallback, open_section, phone_fallback, ApplicantRule,
    ApplicantSplit, DialectRules, ManagerNameRule, MitigationRule, RuleTable, PHONE,
};
use crate::services::chain::{Capture, FieldRule};

static TABLE: LazyLock<RuleTable> = LazyLock::new(build);
static ENCLOSURES: LazyLock<Regex> = LazyLock::new(enclosure_marker);

/// Bare page number, optionally dashed, at the top or foot of a page.
static PAGE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*-?\s?(\d+)\s?-?\s|\s-?\s?(\d+)\s?-?\s*$").expect("page number pattern")
});

/// Address and attention markers ending a name inside the applicant block.
const ADDRESS_START: &str =
    r",?\s?Post|,?\s?\bP\s?O\b|,?\s?P\.\s?O\.|,?\s*\d|,?\s?\b[Aa][Tt]{2}";

#[derive(Debug, Clone, Copy, Default)]
pub struct NewOrleans;

impl DialectRules for NewOrleans {
    fn dialect(&self) -> Dialect {
        Dialect::Mvn
    }

    fn table(&self) -> &RuleTable {
        &TABLE
    }

    fn clean_page(&self, page_number: usize, page: &str) -> String {
        let expected = page_number.to_string();
        PAGE_NUMBER
            .replace_all(page, |caps: &Captures| {
                let number = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str());
                if number == Some(expected.as_str()) {
                    " ".to_string()
                } else {
                    caps[0].to_string()
                }
            })
            .into_owned()
    }

    fn ends_notice(&self, page: &str) -> bool {
        ENCLOSURES.is_match(page)
    }
}

fn build() -> RuleTable {
    let project_manager = spaced("Project Manager");
    let branch = spaced("Branch");
    let location = spaced_lead("LOCATION OF WORK");
    let character = spaced_lead("CHARACTER OF WORK");
    let mitigation = spaced("MITIGATION");
    let comment_period = spaced("The comment period");

    RuleTable {
        trailing_boilerplate: Some(Capture::new(
            &format!("{}.*", spaced("Corps of Engineers Permit Criteria")),
            0,
        )),
        comment_window: FieldRule::new("comment window")
            .anchor(&spaced("days"))
            .attempt(
                &format!(r"c\s?l\s?o\s?s\s?e\s?(?:i\s?n)?([\s\d]*){}", spaced("days")),
                1,
            )
            .capture(comment_period_fallback()),
        application_number: FieldRule::new("application number")
            .compact()
            .anchor(r"Application|[Ss][Uu][Bb][Jj][Ee][Cc][Tt]")
            .attempt(
                r"(?:Application|[Ss][Uu][Bb][Jj][Ee][Cc][Tt])#?:?.*?([A-Z]{3}-?\d{4}-?\d{4,5}-?[A-Z]{2,3}).*?(?:WQC|PUBLICNOTICE|Interested|SPECIAL|New|\(Section)",
                1,
            )
            .capture(application_code_fallback()),
        manager_name: ManagerNameRule {
            name: FieldRule::new("manager name")
                .anchor(&project_manager)
                .anchor(&branch)
                .attempt(
                    &format!(
                        r"{pm}\s?:?\s*?(?:{pm}\s?:?|{ca}\s?:?)?\s*?([A-Z][a-zA-Z\s.,]*?)(?:\s*\(|\s*\d|\s*{permit}|\s*{project}|,?\s+(?:at\s+)?[\w.\-]+@)",
                        pm = project_manager,
                        ca = spaced("Certification Analyst"),
                        permit = spaced("Permit"),
                        project = spaced("Project"),
                    ),
                    1,
                )
                .attempt(
                    &format!(
                        r"{branch}([a-zA-Z\s.]*?)(?:\(|\d|{permit}|[\w.\-]+@)",
                        branch = branch,
                        permit = spaced("Permit"),
                    ),
                    1,
                ),
            scope: None,
            org_unit_retry: vec![Capture::new(
                &format!(
                    r"{pm}.*?(?:{branch}|\))\s*?([A-Z][a-zA-Z.]*(?:\s[A-Z][a-zA-Z.]*)*)",
                    pm = project_manager,
                    branch = branch,
                ),
                1,
            )
            .with_max_len(50)],
            area_code_lookup: true,
            empty_default: None,
        },
        manager_phone: FieldRule::new("manager phone")
            .compact()
            .anchor(PHONE)
            .attempt(&format!(r"[a-z.\d]({})\D", PHONE), 1)
            .capture(phone_fallback()),
        manager_email: FieldRule::new("manager email")
            .anchor(&email_domain())
            .attempt(
                &format!(r"([A-Za-z]+[.\-][A-Za-z\s\d.\-]+{})", email_domain()),
                1,
            )
            .capture(email_fallback()),
        applicant: ApplicantRule {
            anchor: compile(&spaced_lead("APPLICANT")),
            contents: Capture::new(
                &format!(
                    r"{}\s?:?(.+?){}",
                    spaced_lead("APPLICANT"),
                    spaced_lead("LOCATION")
                ),
                1,
            ),
            split: ApplicantSplit::CareOf {
                marker: compile(r"c\s?/\s?o"),
                before: Capture::new(r"^(.+?),?\s?c\s?/\s?o", 1),
                after: Capture::new(
                    &format!(r"c\s?/\s?o\s?:?\s?(.+?)(?:{})", ADDRESS_START),
                    1,
                ),
                plain: Capture::new(&format!(r"^(.+?)(?:{}|$)", ADDRESS_START), 1),
            },
        },
        location: FieldRule::new("location of work")
            .anchor(&spaced_lead("LOCATION"))
            .attempt(&format!(r"{}\s?:?(.*?){}", location, character), 1)
            .capture(location_fallback()),
        work_description: FieldRule::new("character of work")
            .anchor(&character)
            .attempt(
                &format!(
                    r"{}\s?:?(.*?)(?:{}|{})",
                    character, mitigation, comment_period
                ),
                1,
            )
            .capture(open_section(&character)),
        mitigation: MitigationRule::Section(
            FieldRule::new("mitigation")
                .anchor(&mitigation)
                .attempt(&format!(r"{}\s?:?(.*?){}", mitigation, comment_period), 1)
                .capture(open_section(&mitigation)),
        ),
    }
}
