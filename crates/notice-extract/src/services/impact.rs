//! Impact clause decomposition.
//!
//! A work description is split into sentences, each sentence into clauses
//! that carry one quantity in acres, square feet or linear feet. Every clause
//! is classified on its own; duration and condition are then shared between
//! the clauses of a sentence, since "permanently impact A, B and C" only
//! states the duration once.

use std::sync::LazyLock;

use notice::models::{ImpactCondition, ImpactDuration, ImpactEvent, ImpactUnit};
use notice::utils::{compile, spaced};
use regex::Regex;

static SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*?\D\.").expect("sentence pattern"));

static NEGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    keywords(&["impact", "affect", "loss", "fill", "excava", "dredg"])
});

static POSITIVE: LazyLock<Regex> = LazyLock::new(|| keywords(&["benef", "preserv", "creat"]));

static AVOID: LazyLock<Regex> = LazyLock::new(|| compile(&format!(r"\s{}", spaced("avoid"))));

static DURATION: LazyLock<Regex> = LazyLock::new(|| keywords(&["permanent", "temporar"]));

static PERMANENT: LazyLock<Regex> = LazyLock::new(|| compile(&spaced("perm")));

static ACRES: LazyLock<UnitGrammar> = LazyLock::new(|| UnitGrammar {
    unit: ImpactUnit::Acre,
    triggers: &["acre"],
    clause: clause_pattern(r"acres?"),
    quantity: compile(r"([^A-Za-z]+)acres?"),
    habitat: habitat_keywords(),
    type_after: r"acres?\)?.*?of(?:\simpacts\sto|.*?in)?",
});

static SQUARE_FEET: LazyLock<UnitGrammar> = LazyLock::new(|| UnitGrammar {
    unit: ImpactUnit::SquareFeet,
    triggers: &["square", "ft2"],
    clause: clause_pattern(r"(?:square)?-?\s?f[eo]*t2?"),
    quantity: compile(r"([^A-Za-z]+)(?:square|ft2)"),
    habitat: habitat_keywords(),
    type_after: r"(?:square)?-?\s?f[eo]*t2?.*?of(?:\simpacts\sto|.*?in)?",
});

static LINEAR_FEET: LazyLock<UnitGrammar> = LazyLock::new(|| UnitGrammar {
    unit: ImpactUnit::LinearFeet,
    triggers: &["linear"],
    clause: clause_pattern(r"linear\sfe?e?t"),
    quantity: compile(r"([^A-Za-z]+)linear"),
    habitat: compile(&format!(
        "{}|{}|{}",
        spaced("stream"),
        spaced("shoreline"),
        spaced("water")
    )),
    type_after: r".*?of(?:impacts\sto)?",
});

/// How one unit is phrased in a work description.
struct UnitGrammar {
    unit: ImpactUnit,
    /// Substrings a sentence must contain before clauses are looked for.
    triggers: &'static [&'static str],
    clause: Regex,
    /// Leading numeral of a clause.
    quantity: Regex,
    /// Impacted features for this unit.
    habitat: Regex,
    /// Text between the quantity and the impacted feature.
    type_after: &'static str,
}

/// Whether a clause states its own duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DurationEvidence {
    /// Polarity and a duration word both present.
    Stated,
    /// Polarity present but no duration word.
    Missing,
    /// No polarity; the duration may come from a sibling clause.
    Inherited,
}

/// A clause being classified. `condition` is `None` until a sibling supplies
/// one.
#[derive(Debug, Clone)]
struct ClauseDraft {
    quantity: Option<f64>,
    unit: ImpactUnit,
    impact_type: String,
    condition: Option<ImpactCondition>,
    duration: ImpactDuration,
    evidence: DurationEvidence,
}

impl ClauseDraft {
    fn finish(self) -> ImpactEvent {
        ImpactEvent {
            quantity: self.quantity,
            unit: self.unit,
            impact_type: self.impact_type,
            condition: self.condition.unwrap_or(ImpactCondition::Unknown),
            duration: self.duration,
        }
    }
}

/// Impact events stated in a work description, in sentence order.
pub fn decompose_impacts(work_description: &str) -> Vec<ImpactEvent> {
    let mut events = Vec::new();
    for sentence in SENTENCE.find_iter(work_description).map(|m| m.as_str()) {
        let mut drafts: Vec<ClauseDraft> = Vec::new();
        for grammar in [&*ACRES, &*SQUARE_FEET, &*LINEAR_FEET] {
            if !grammar.triggers.iter().any(|t| sentence.contains(t)) {
                continue;
            }
            drafts.extend(
                grammar
                    .clause
                    .captures_iter(sentence)
                    .filter_map(|c| c.get(1))
                    .map(|clause| read_clause(grammar, clause.as_str())),
            );
        }
        if drafts.is_empty() {
            continue;
        }
        share_within_sentence(&mut drafts);
        events.extend(drafts.into_iter().map(ClauseDraft::finish));
    }
    tracing::debug!("{} impact events decomposed", events.len());
    events
}

fn read_clause(grammar: &UnitGrammar, clause: &str) -> ClauseDraft {
    let raw_quantity = grammar
        .quantity
        .captures(clause)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str());
    let quantity = raw_quantity.and_then(parse_quantity);

    let impact_type = if grammar.habitat.is_match(clause) {
        impacted_feature(grammar, clause, raw_quantity)
    } else {
        ImpactEvent::PROJECT_SIZE.to_string()
    };

    let negative = NEGATIVE.is_match(clause);
    let positive = POSITIVE.is_match(clause);
    let mut condition = match (negative, positive) {
        (true, false) if clause.contains("credit") => {
            Some(ImpactCondition::NegativeWithMitigationCredit)
        }
        (true, false) => Some(ImpactCondition::Negative),
        (false, true) => Some(ImpactCondition::Positive),
        (true, true) => Some(ImpactCondition::ManualReviewRequired),
        (false, false) => None,
    };
    if impact_type == ImpactEvent::PROJECT_SIZE {
        condition = Some(ImpactCondition::Neutral);
    }
    if AVOID.is_match(clause) {
        condition = Some(ImpactCondition::Avoided);
    }

    let stated_duration = DURATION.find(clause).map(|m| {
        if PERMANENT.is_match(m.as_str()) {
            ImpactDuration::Permanent
        } else {
            ImpactDuration::Temporary
        }
    });
    let (duration, evidence) = match (negative || positive, stated_duration) {
        (true, Some(duration)) => (duration, DurationEvidence::Stated),
        (true, None) => (ImpactDuration::Unknown, DurationEvidence::Missing),
        (false, _) => (ImpactDuration::Unknown, DurationEvidence::Inherited),
    };

    ClauseDraft {
        quantity,
        unit: grammar.unit,
        impact_type,
        condition,
        duration,
        evidence,
    }
}

/// Feature named after the quantity ("of wetland", "of impacts to the
/// marsh"). Falls back to the keyword itself when the phrasing is unusual.
fn impacted_feature(grammar: &UnitGrammar, clause: &str, raw_quantity: Option<&str>) -> String {
    let keyword = grammar
        .habitat
        .find(clause)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let Some(raw_quantity) = raw_quantity else {
        return keyword;
    };
    let pattern = format!(
        r"{}{}(.*?(?:{}))",
        regex::escape(raw_quantity),
        grammar.type_after,
        grammar.habitat.as_str()
    );
    Regex::new(&pattern)
        .ok()
        .and_then(|re| {
            re.captures(clause)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
        })
        .filter(|feature| !feature.is_empty())
        .unwrap_or(keyword)
}

fn parse_quantity(raw: &str) -> Option<f64> {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | ',' | '('))
        .collect();
    digits.trim().parse().ok()
}

/// Fill inherited durations from the first clause that states one, and
/// placeholder conditions from the first clause that has one. With no
/// condition anywhere in the sentence every clause ends up unknown.
fn share_within_sentence(drafts: &mut [ClauseDraft]) {
    let stated = drafts
        .iter()
        .find(|d| d.evidence == DurationEvidence::Stated)
        .map(|d| d.duration);
    if let Some(duration) = stated {
        for draft in drafts
            .iter_mut()
            .filter(|d| d.evidence == DurationEvidence::Inherited)
        {
            draft.duration = duration;
        }
    }

    let known = drafts.iter().find_map(|d| d.condition);
    for draft in drafts.iter_mut() {
        draft
            .condition
            .get_or_insert(known.unwrap_or(ImpactCondition::Unknown));
    }
}

fn clause_pattern(unit: &str) -> Regex {
    compile(&format!(
        r"(.*?\d*,?\d*\s?\.?\s?\d*-?\s?{}.+?\D(?:,|\.|\sand)[A-Za-z\s]*)",
        unit
    ))
}

fn habitat_keywords() -> Regex {
    compile(&format!(
        "{}|{}|{}|{}|{}|{}",
        spaced("habitat"),
        spaced("wetland"),
        spaced("pond"),
        spaced("waterbottom"),
        spaced("marsh"),
        spaced("water"),
    ))
}

fn keywords(words: &[&str]) -> Regex {
    compile(&words.iter().map(|w| spaced(w)).collect::<Vec<_>>().join("|"))
}
