//! Galveston District.

use std::sync::LazyLock;

use notice::models::Dialect;
use notice::utils::{compile, spaced, spaced_lead};
use regex::Regex;

use super::{
    application_code_fallback, combined_mitigation, comment_period_fallback, email_domain,
    email_fallback, location_fallback, open_section, party_name, phone_fallback, AgentRule,
    ApplicantRule, ApplicantSplit, DialectRules, ManagerNameRule, RuleTable, APPLICATION_CODE,
    PHONE,
};
use crate::services::chain::{Capture, FieldRule};

static TABLE: LazyLock<RuleTable> = LazyLock::new(build);

/// Page number after a wide gap, e.g. "SWG-2023-00012      2".
static NUMBERED_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{5,}(\d+)").expect("numbered header pattern"));

/// Footer carrying the permit number, e.g. "SWG-2023-00012 # 2".
static PERMIT_FOOTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*?#.*?[\d\s]{5,6}.*?\s{1,2}").expect("permit footer pattern")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct Galveston;

impl DialectRules for Galveston {
    fn dialect(&self) -> Dialect {
        Dialect::Swg
    }

    fn table(&self) -> &RuleTable {
        &TABLE
    }

    fn clean_page(&self, page_number: usize, page: &str) -> String {
        if let Some(end) = numbered_header_end(page, page_number) {
            return page[end..].to_string();
        }
        if let Some(header) = PERMIT_FOOTER.find(page) {
            return page[header.end()..].to_string();
        }
        page.to_string()
    }
}

/// End of a first-line header whose wide gap is followed by the page number.
fn numbered_header_end(page: &str, page_number: usize) -> Option<usize> {
    let first_line_end = page.find('\n').unwrap_or(page.len());
    let expected = page_number.to_string();
    NUMBERED_HEADER
        .captures_iter(page)
        .take_while(|caps| caps.get(0).is_some_and(|m| m.start() <= first_line_end))
        .find_map(|caps| {
            let digits = caps.get(1)?;
            digits
                .as_str()
                .starts_with(&expected)
                .then(|| digits.start() + expected.len())
        })
}

fn build() -> RuleTable {
    let applicant = spaced_lead("APPLICANT");
    let agent = spaced_lead("AGENT");
    let location = spaced("LOCATION");
    let description = spaced("PROJECT DESCRIPTION");

    RuleTable {
        trailing_boilerplate: Some(Capture::new(
            &format!(
                r"({}\s?:?.*){}",
                spaced("CURRENT SITE CONDITIONS"),
                spaced("COMMENT PERIOD")
            ),
            1,
        )),
        comment_window: FieldRule::new("comment window")
            .anchor(&spaced("days"))
            .attempt(
                &format!(r"{}([\s\d]*){}", spaced("within"), spaced("days")),
                1,
            )
            .capture(comment_period_fallback()),
        application_number: FieldRule::new("application number")
            .anchor(r"No:")
            .anchor(APPLICATION_CODE)
            .capture(Capture::new(r"No:(.*?)Of", 1).with_max_len(40))
            .capture(application_code_fallback()),
        manager_name: ManagerNameRule {
            name: FieldRule::new("manager name")
                .anchor(&spaced("COMMENT PERIOD"))
                .attempt(
                    &format!(
                        r"^(.*?)(?:U\s?\.\s?S\s?\.|{}|{}|P\s?O|P\s?\.\s?O\s?\.|\d{{4}}|[Ss]\s?w\s?g\s?_)",
                        spaced("Galveston"),
                        spaced("Post")
                    ),
                    1,
                ),
            scope: Some(Capture::new(
                &format!(
                    r"{}.*{}.*?t\s?o\s?:?(.*?){}",
                    spaced("COMMENT PERIOD"),
                    spaced("submitted"),
                    spaced("DISTRICT")
                ),
                1,
            )),
            org_unit_retry: Vec::new(),
            area_code_lookup: false,
            empty_default: Some("U.S. Army Corps of Engineers"),
        },
        manager_phone: FieldRule::new("manager phone")
            .compact()
            .anchor(PHONE)
            .attempt(&format!(r"[a-z\d]({})Phone", PHONE), 1)
            .capture(phone_fallback()),
        manager_email: FieldRule::new("manager email")
            .anchor(&email_domain())
            .attempt(
                &format!(r"([Ss]\s?[Ww][A-Za-z\s\d_]+{})", email_domain()),
                1,
            )
            .capture(email_fallback()),
        applicant: ApplicantRule {
            anchor: compile(&applicant),
            contents: Capture::new(
                &format!(
                    r"{}\s?:?(.+?)(?:{}|{})",
                    applicant,
                    location,
                    spaced("PROJECT")
                ),
                1,
            ),
            split: ApplicantSplit::Labeled {
                applicant: party_name(&applicant, None),
                agent: Some(AgentRule {
                    anchor: compile(&agent),
                    name: party_name(&agent, Some(&location)),
                }),
            },
        },
        location: FieldRule::new("location of work")
            .anchor(&spaced_lead("LOCATION"))
            .attempt(
                &format!(
                    r"{}\s?:?(.*?)(?:{}|{}|{}|{})",
                    location,
                    spaced("LATITUDE"),
                    spaced("AGENDA"),
                    spaced("PROJECT"),
                    spaced("AVOIDANCE")
                ),
                1,
            )
            .capture(location_fallback()),
        work_description: FieldRule::new("character of work")
            .anchor(&description)
            .attempt(&format!(r"{}\s?:?(.*?)[A-Z\s]+:", description), 1)
            .capture(open_section(&description)),
        mitigation: combined_mitigation(),
    }
}
