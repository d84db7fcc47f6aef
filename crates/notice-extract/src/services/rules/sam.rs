//! Mobile District.
//!
//! Joint notices with a running "Page N of M" header, a comment paragraph
//! that names the manager ("direct any written comments to ...") and
//! separate applicant and agent sections.

use std::sync::LazyLock;

use notice::models::Dialect;
use notice::utils::{compile, spaced, spaced_ci, spaced_lead};
use regex::Regex;

use super::{
    application_code_fallback, combined_mitigation, comment_period_fallback, email_domain,
    email_fallback, enclosure_marker, location_fallback, party_name, phone_fallback,
    proposed_work, AgentRule, ApplicantRule, ApplicantSplit, DialectRules, ManagerNameRule,
    RuleTable, APPLICATION_CODE, PHONE,
};
use crate::services::chain::{Capture, FieldRule};

static TABLE: LazyLock<RuleTable> = LazyLock::new(build);
static ENCLOSURES: LazyLock<Regex> = LazyLock::new(enclosure_marker);

static PAGE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*?Page \d+ of \d+").expect("page header pattern"));
static PERMIT_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*?\d{5}\s?-\s?[A-Z]{3}").expect("permit header pattern"));

/// Terminators after a "contact <name>" style mention.
const MENTION_END: &str = r",|,?\so\s?r|,?\sb\s?y|,?\sa\s?t|,?\si\s?n|,?\sv\s?i\s?a|\d{3,4}|\s{0,2}\(";

#[derive(Debug, Clone, Copy, Default)]
pub struct Mobile;

impl DialectRules for Mobile {
    fn dialect(&self) -> Dialect {
        Dialect::Sam
    }

    fn table(&self) -> &RuleTable {
        &TABLE
    }

    fn clean_page(&self, _page_number: usize, page: &str) -> String {
        if let Some(header) = PAGE_HEADER.find(page) {
            return page[header.end()..].to_string();
        }
        if let Some(header) = PERMIT_HEADER.find(page) {
            return page[header.end()..].to_string();
        }
        page.to_string()
    }

    fn ends_notice(&self, page: &str) -> bool {
        ENCLOSURES.is_match(page)
    }
}

fn build() -> RuleTable {
    let applicant = spaced_lead("APPLICANT");
    let agent = spaced_lead("AGENT");
    let location = spaced("LOCATION");
    let waterway = spaced("WATERWAY");
    let project_manager = spaced_ci("project manager");
    let attention = r"A\s?t\s?t\s?e?\s?n\s?t?\s?i?\s?o?\s?n?";

    RuleTable {
        trailing_boilerplate: Some(Capture::new(
            &format!("{}.*{}", spaced("COMMENTS"), spaced("Protection Agency")),
            0,
        )),
        comment_window: FieldRule::new("comment window")
            .anchor(&spaced("days"))
            .attempt(
                &format!(r"{}([\s\d]*){}", spaced("later than"), spaced("days")),
                1,
            )
            .capture(comment_period_fallback()),
        application_number: FieldRule::new("application number")
            .anchor(r"NO\.")
            .anchor(APPLICATION_CODE)
            .capture(Capture::new(&format!(r"NO\.(.*?){}", spaced("JOINT")), 1).with_max_len(40))
            .capture(application_code_fallback()),
        manager_name: ManagerNameRule {
            name: FieldRule::new("manager name")
                .anchor(r"d\s?i\s?r\s?e\s?c\s?t")
                .anchor(&project_manager)
                .anchor(attention)
                .attempt(
                    &format!(
                        r"(?:{att}\s?\.?:?|{pm}\s?,?:?|{contact})(.*?)(?:,|\so\s?r|\sb\s?y|\sa\s?t|\si\s?n|\d{{3,4}})",
                        att = attention,
                        pm = project_manager,
                        contact = spaced("contact"),
                    ),
                    1,
                ),
            scope: Some(Capture::new(
                &format!(
                    r"(d\s?i\s?r\s?e\s?c\s?t\s?e?\s?d?\s{{0,2}}(?:any\swritten\scomments)?(?:\s?t\s?o|v\s?i\s?a).*?)(?:{}|{}|{})",
                    spaced("Copies"),
                    spaced("copy"),
                    spaced("For additional")
                ),
                1,
            )),
            org_unit_retry: vec![Capture::new(
                &format!(
                    r"(?:{this_app},|{the_pm},|[Mm]\s?a\s?n\s?a\s?g\s?e\s?r.*?\s?{att}\s?,?\.?:?)(\s{{0,2}}[A-Z].*?)(?:{end})",
                    this_app = spaced_ci("manager for this application"),
                    the_pm = spaced_ci("the project manager"),
                    att = attention,
                    end = MENTION_END,
                ),
                1,
            )
            .with_max_len(50)],
            area_code_lookup: false,
            empty_default: None,
        },
        manager_phone: FieldRule::new("manager phone")
            .compact()
            .anchor(PHONE)
            .attempt(&format!(r"concerning.*?[a-z]({})\D", PHONE), 1)
            .capture(phone_fallback()),
        manager_email: FieldRule::new("manager email")
            .anchor(&email_domain())
            .attempt(
                &format!(
                    r"([A-Za-z]+\.[A-Za-z\s\d.]+;?@\.?\s?{})",
                    spaced("usace.army.mil")
                ),
                1,
            )
            .capture(email_fallback()),
        applicant: ApplicantRule {
            anchor: compile(&applicant),
            contents: Capture::new(
                &format!(r"{}\s?:?(.+?)(?:{}|{})", applicant, waterway, location),
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
                    r"(?:(?:{w}\s{{0,2}}(?:{and}|&)\s{{0,2}})?{l}|{w})\s?:?(.*?)(?:{}|{}|{}|{})",
                    spaced("PROJECT"),
                    spaced("PROPOSED"),
                    spaced("APPLICANT"),
                    spaced("WORK"),
                    w = waterway,
                    and = spaced("AND"),
                    l = location,
                ),
                1,
            )
            .capture(location_fallback()),
        work_description: proposed_work(),
        mitigation: combined_mitigation(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_page_drops_running_header() {
        let page = "SAM-2023-00456-ABC Page 2 of 4 The applicant proposes";
        assert_eq!(Mobile.clean_page(2, page).trim(), "The applicant proposes");
        assert_eq!(Mobile.clean_page(2, "no header here"), "no header here");
    }

    #[test]
    fn test_waterway_and_location_heading() {
        let table = Mobile.table();
        let text = "WATERWAY AND LOCATION: Mobile Bay, Baldwin County, Alabama. PROPOSED WORK: pier";
        assert_eq!(
            table.location.first_capture(text),
            Some("Mobile Bay, Baldwin County, Alabama.")
        );
    }

    #[test]
    fn test_agent_name() {
        let table = Mobile.table();
        let ApplicantSplit::Labeled { agent: Some(agent), .. } = &table.applicant.split else {
            panic!("expected labeled applicant split");
        };
        assert_eq!(
            agent.name.find_value("AGENT: Coastal Permits LLC, Post Office Box 12"),
            Some("Coastal Permits LLC")
        );
    }
}
