//! Per-district rule tables.
//!
//! Each district publishes notices from its own template, so every dialect
//! carries an independently authored set of anchors and boundary phrases.
//! Field extractors are generic over [`DialectRules`] and never branch on the
//! dialect themselves.

mod mvn;
mod sam;
mod saj;
mod swg;

use notice::models::Dialect;
use notice::utils::{compile, spaced};
use regex::Regex;

use super::chain::{Capture, FieldRule};

pub use mvn::NewOrleans;
pub use sam::Mobile;
pub use saj::Jacksonville;
pub use swg::Galveston;

/// Phone number as it appears once spaces are removed.
pub(crate) const PHONE: &str = r"\(?\d{3}\)?-?\d{3}-?\d{4}";

/// Shape of a permit application number, e.g. `MVN-2023-00123-WII`.
pub(crate) const APPLICATION_CODE: &str = r"[A-Z]{3}-\d{4}-\d{4,5}(?:-[A-Z]{2,3})?";

/// Spacing-tolerant `@usace.army.mil`.
pub(crate) fn email_domain() -> String {
    spaced("@usace.army.mil")
}

/// District-specific extraction strategy.
pub trait DialectRules: Send + Sync {
    fn dialect(&self) -> Dialect;

    fn table(&self) -> &RuleTable;

    /// Drop the running header or footer from page `page_number` (1-based).
    /// Never called for the first page.
    fn clean_page(&self, _page_number: usize, page: &str) -> String {
        page.to_string()
    }

    /// Whether the notice body ends on this page, e.g. because the
    /// enclosures start here.
    fn ends_notice(&self, _page: &str) -> bool {
        false
    }
}

/// Anchor and capture tables for one dialect.
#[derive(Debug)]
pub struct RuleTable {
    /// Appendix removed when condensing the text.
    pub trailing_boilerplate: Option<Capture>,
    pub comment_window: FieldRule,
    pub application_number: FieldRule,
    pub manager_name: ManagerNameRule,
    pub manager_phone: FieldRule,
    pub manager_email: FieldRule,
    pub applicant: ApplicantRule,
    pub location: FieldRule,
    pub work_description: FieldRule,
    pub mitigation: MitigationRule,
}

/// Manager name lookup.
///
/// `scope` narrows the text to the paragraph that names the manager before
/// `name` runs. When the capture turns out to be an organizational unit the
/// `org_unit_retry` patterns run over the whole text, and with
/// `area_code_lookup` the words directly before the manager's phone number
/// are tried last.
#[derive(Debug)]
pub struct ManagerNameRule {
    pub name: FieldRule,
    pub scope: Option<Capture>,
    pub org_unit_retry: Vec<Capture>,
    pub area_code_lookup: bool,
    /// Value used when the scoped paragraph names no person.
    pub empty_default: Option<&'static str>,
}

#[derive(Debug)]
pub struct ApplicantRule {
    pub anchor: Regex,
    /// Full applicant block, address included.
    pub contents: Capture,
    pub split: ApplicantSplit,
}

/// How applicant and contractor names are separated.
#[derive(Debug)]
pub enum ApplicantSplit {
    /// "Applicant, c/o Agent, address" inside the applicant block.
    CareOf {
        marker: Regex,
        before: Capture,
        after: Capture,
        /// Applicant when no `c/o` is present.
        plain: Capture,
    },
    /// Applicant read from the text, agent from its own section.
    Labeled {
        applicant: Capture,
        agent: Option<AgentRule>,
    },
    /// Applicant read from the applicant block; no agent section.
    FromContents { applicant: Capture },
}

#[derive(Debug)]
pub struct AgentRule {
    pub anchor: Regex,
    pub name: Capture,
}

#[derive(Debug)]
pub enum MitigationRule {
    /// A single "MITIGATION" section.
    Section(FieldRule),
    /// Separate avoidance and compensatory sections, all required.
    Combined { anchor: Regex, parts: Vec<Capture> },
}

/// Comment window attempt shared by every dialect.
pub(crate) fn comment_period_fallback() -> Capture {
    Capture::new(
        r"(?i:comment\s{0,2}period)\D{0,120}?(\d{1,3})\s{0,2}(?:calendar\s{0,2})?days",
        1,
    )
}

/// Bare permit number anywhere in the text.
pub(crate) fn application_code_fallback() -> Capture {
    Capture::new(&format!("({})", APPLICATION_CODE), 1)
}

pub(crate) fn phone_fallback() -> Capture {
    Capture::new(&format!(r"(?i:phone|telephone|tel\.?)\s?:?\s?({})", PHONE), 1)
}

pub(crate) fn email_fallback() -> Capture {
    Capture::new(&format!(r"([A-Za-z][\w.\-]*{})", email_domain()), 1)
}

/// Location sentence introduced by a bare "LOCATION:" label.
pub(crate) fn location_fallback() -> Capture {
    Capture::new(r"LOCATION\s?:\s?(.{1,600}?\.)\s", 1)
}

/// Everything after the section heading, when no end boundary was found.
pub(crate) fn open_section(heading: &str) -> Capture {
    Capture::new(&format!(r"{}\s?:?(.*)$", heading), 1).with_max_len(4000)
}

/// Markers ending a party name: the start of an address or an attention line.
pub(crate) const NAME_END: &str = r"P\s?o\s?s\s?t|\bP\s?O\b|P\s?\.\s?O\s?\.|\d|c\s?/\s?o|A\s?t\s?t\s?n|A\s?t\s?t\s?e\s?n\s?t\s?i\s?o\s?n";

/// Party name following `label`, ending at an address or at `extra`.
pub(crate) fn party_name(label: &str, extra: Option<&str>) -> Capture {
    let end = match extra {
        Some(extra) => format!("{}|{}", NAME_END, extra),
        None => NAME_END.to_string(),
    };
    Capture::new(&format!(r"{}\s?:?(.+?)(?:{})", label, end), 1)
}

/// "PROPOSED WORK" section used by the Mobile and Jacksonville templates.
pub(crate) fn proposed_work() -> FieldRule {
    let heading = format!(
        "(?:{}|{}|{})",
        spaced("PROPOSED WORK"),
        spaced("WORK DESCRIPTION"),
        spaced("WORK")
    );
    FieldRule::new("character of work")
        .anchor(&spaced("WORK"))
        .attempt(
            &format!(
                r"{}\s?:?(.*?)(?:{}|{}|{})",
                heading,
                spaced("AVOIDANCE"),
                spaced("COASTAL"),
                spaced("The applicant has applied")
            ),
            1,
        )
        .capture(open_section(&heading))
}

/// Avoidance-and-minimization plus compensatory mitigation sections.
pub(crate) fn combined_mitigation() -> MitigationRule {
    let minimization = spaced("MINIMIZATION");
    let mitigation = spaced("MITIGATION");
    MitigationRule::Combined {
        anchor: compile(&format!(
            r"{}\s?(?:&|{})\s?{}|(?:{}\s{{0,2}})?{}",
            spaced("AVOIDANCE"),
            spaced("AND"),
            minimization,
            spaced("COMPENSATORY"),
            mitigation
        )),
        parts: vec![
            Capture::new(
                &format!(
                    r"({}\s{{0,2}}(?:{})?.+?)[A-Z\s]+:",
                    minimization,
                    spaced("INFORMATION")
                ),
                1,
            ),
            Capture::new(&format!(r"({}.+?)[A-Z\s]+:", mitigation), 1),
        ],
    }
}

pub(crate) fn enclosure_marker() -> Regex {
    compile(
        r"E\s?n\s?c\s?l\s?o?\s?s\s?u?\s?r?\s?e?|A\s?t\s?t\s?a\s?c\s?h\s?m\s?e\s?n\s?t|Y\s?o\s?u\s{0,2}a\s?r\s?e\s{0,2}i\s?n\s?v\s?i\s?t\s?e\s?d",
    )
}

/// Rule set for `dialect`.
pub fn rules_for(dialect: Dialect) -> &'static dyn DialectRules {
    match dialect {
        Dialect::Mvn => &NewOrleans,
        Dialect::Sam => &Mobile,
        Dialect::Saj => &Jacksonville,
        Dialect::Swg => &Galveston,
    }
}
