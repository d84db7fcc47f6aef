//! Jacksonville District.
//!
//! Also the fallback for notices whose URL carries no district marker.

use std::sync::LazyLock;

use notice::models::Dialect;
use notice::utils::{compile, spaced, spaced_lead};
use regex::Regex;

use super::{
    application_code_fallback, combined_mitigation, comment_period_fallback, email_domain,
    email_fallback, location_fallback, phone_fallback, proposed_work, ApplicantRule,
    ApplicantSplit, DialectRules, ManagerNameRule, RuleTable, APPLICATION_CODE, NAME_END, PHONE,
};
use crate::services::chain::{Capture, FieldRule};

static TABLE: LazyLock<RuleTable> = LazyLock::new(build);
static HEARING_REQUEST: LazyLock<Regex> =
    LazyLock::new(|| compile(&spaced("REQUEST FOR PUBLIC HEARING")));

#[derive(Debug, Clone, Copy, Default)]
pub struct Jacksonville;

impl DialectRules for Jacksonville {
    fn dialect(&self) -> Dialect {
        Dialect::Saj
    }

    fn table(&self) -> &RuleTable {
        &TABLE
    }

    fn ends_notice(&self, page: &str) -> bool {
        HEARING_REQUEST.is_match(page)
    }
}

fn build() -> RuleTable {
    let applicant = spaced_lead("APPLICANT");
    let project_manager = r"[Pp]\s?r\s?o\s?j\s?e\s?c\s?t\s{0,2}[Mm]\s?a\s?n\s?a\s?g\s?e\s?r";

    RuleTable {
        trailing_boilerplate: Some(Capture::new(
            &format!("{}.*", spaced("IMPACT ON NATURAL RESOURCES")),
            0,
        )),
        comment_window: FieldRule::new("comment window")
            .anchor(&spaced("days"))
            .attempt(
                &format!(r"{}([\s\d]*){}", spaced("within"), spaced("days")),
                1,
            )
            .capture(comment_period_fallback()),
        application_number: FieldRule::new("application number")
            .anchor(r"No\.")
            .anchor(APPLICATION_CODE)
            .capture(
                Capture::new(&format!(r"No\.(.*?){}", spaced("TO WHOM")), 1).with_max_len(40),
            )
            .capture(application_code_fallback()),
        manager_name: ManagerNameRule {
            name: FieldRule::new("manager name")
                .anchor(project_manager)
                .anchor(&spaced("contact"))
                .anchor(&spaced("directed to"))
                .attempt(
                    &format!(
                        r"(?:(?:t\s?h\s?e|o\s?r)\s{{0,2}}{pm}\s?,?:?|{contact}|{directed})(\s{{0,2}}[A-Z\-].*?)(?:,|,?\so\s?r|,?\sb\s?y|,?\sa\s?t|,?\si\s?n)",
                        pm = project_manager,
                        contact = spaced("contact"),
                        directed = spaced("directed to"),
                    ),
                    1,
                ),
            scope: None,
            org_unit_retry: Vec::new(),
            area_code_lookup: false,
            empty_default: None,
        },
        manager_phone: FieldRule::new("manager phone")
            .compact()
            .anchor(PHONE)
            .attempt(&format!(r"phone.*?({})\D", PHONE), 1)
            .capture(phone_fallback()),
        manager_email: FieldRule::new("manager email")
            .anchor(&email_domain())
            .attempt(
                &format!(
                    r"[Qq]\s?[Uu]\s?[Ee]\s?[Ss]\s?[Tt]\s?[Ii]\s?[Oo]\s?[Nn].*?([A-Za-z’]+[.\-][A-Za-z\s\d.\-’]+{})",
                    email_domain()
                ),
                1,
            )
            .capture(email_fallback()),
        applicant: ApplicantRule {
            anchor: compile(&applicant),
            contents: Capture::new(
                &format!(
                    r"{}\s?:?(.+?)(?:{}|{})",
                    applicant,
                    spaced("WATERWAY"),
                    spaced("LOCATION")
                ),
                1,
            ),
            split: ApplicantSplit::FromContents {
                applicant: Capture::new(&format!(r"^(.+?)(?:{}|$)", NAME_END), 1),
            },
        },
        location: FieldRule::new("location of work")
            .anchor(&spaced_lead("LOCATION"))
            .attempt(
                &format!(
                    r"{}\s?:?(.*?)(?:{}|{}|{})",
                    spaced("LOCATION"),
                    spaced("Directions"),
                    spaced("APPROXIMATE"),
                    spaced("PROJECT")
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
    fn test_manager_after_project_manager_phrase() {
        let table = Jacksonville.table();
        let text = "questions may be directed to the project manager, Jane Q. Doe, at the letterhead address";
        assert_eq!(table.manager_name.name.first_capture(text), Some("Jane Q. Doe"));
    }

    #[test]
    fn test_application_number_before_salutation() {
        let table = Jacksonville.table();
        let text = "PUBLIC NOTICE Permit Application No. SAJ-2023-01234 (SP-ABC) TO WHOM IT MAY CONCERN";
        assert_eq!(
            table.application_number.first_capture(text),
            Some("SAJ-2023-01234 (SP-ABC)")
        );
    }

    #[test]
    fn test_stops_at_hearing_request() {
        assert!(Jacksonville.ends_notice("REQUEST FOR PUBLIC HEARING: Any person"));
        assert!(!Jacksonville.ends_notice("Enclosures"));
    }
}
