use std::sync::LazyLock;

use notice::models::{Failure, FieldValue};
use notice::utils::{compile, spaced};
use regex::Regex;

use crate::services::chain::{squeeze, tidy};
use crate::services::normalize::NormalizedText;
use crate::services::rules::DialectRules;

/// Sentences of a location narrative, split at periods not preceded by a
/// digit.
static SENTENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r".*?\D\.").expect("sentence pattern"));

static HAS_COUNTY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[Cc]\s?o\s?u\s?n\s?t\s?y").expect("county marker"));

static COUNTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:,|\sin)([\w\s]+C\s?ounty)").expect("county pattern"));

static CITY_IN_STATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:entitled|in|near|of)\b:?([\w\s]+?),?\s?(?:Louisiana|LA|Alabama|AL|Fl\s?orida|FL|Texas|TX)\b")
        .expect("city pattern")
});

static PARISH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:in|of)\b(.{1,50}?Parish)").expect("parish pattern"));

static HYDROLOGIC: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(r"{}\s?:?\s?([\s\d]*)", spaced("Hydrologic Unit Code")))
});

/// Longest plausible city name.
const MAX_CITY_LEN: usize = 25;

/// Place names read from the location narrative.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationParts {
    pub county: FieldValue,
    pub parish: FieldValue,
    pub city: FieldValue,
    pub hydrologic_unit_code: FieldValue,
}

impl LocationParts {
    /// All parts set to the same outcome.
    pub fn uniform(outcome: FieldValue) -> Self {
        Self {
            county: outcome.clone(),
            parish: outcome.clone(),
            city: outcome.clone(),
            hydrologic_unit_code: outcome,
        }
    }
}

pub fn extract_location(text: &NormalizedText, rules: &dyn DialectRules) -> FieldValue {
    rules.table().location.extract(text)
}

/// Split a location outcome into its place names.
///
/// Parts are unknown when the location is absent and fail with
/// "cannot extract location of work" when it failed.
pub fn location_parts(location: &FieldValue) -> LocationParts {
    let narrative = match location {
        FieldValue::Value(narrative) => narrative,
        FieldValue::Unknown => return LocationParts::uniform(FieldValue::Unknown),
        FieldValue::Failed(_) => {
            return LocationParts::uniform(FieldValue::Failed(Failure::UpstreamMissing(
                "location of work",
            )))
        }
    };

    let mut sentences: Vec<&str> = SENTENCE.find_iter(narrative).map(|m| m.as_str()).collect();
    if sentences.is_empty() {
        sentences.push(narrative);
    }

    let mut counties = Vec::new();
    let mut cities = Vec::new();
    let mut parishes = Vec::new();
    for sentence in &sentences {
        let (county, city) = county_and_city(sentence);
        counties.push(county);
        cities.push(city);
        if sentence.contains("Parish") {
            parishes.push(
                PARISH
                    .captures(sentence)
                    .and_then(|c| c.get(1))
                    .map(|m| tidy(m.as_str()).to_string())
                    .map_or(
                        FieldValue::Failed(Failure::RegexExtractionFailed("parish")),
                        FieldValue::Value,
                    ),
            );
        }
    }

    LocationParts {
        county: aggregate(counties),
        parish: aggregate(parishes),
        city: aggregate(cities),
        hydrologic_unit_code: hydrologic_unit_code(narrative),
    }
}

fn county_and_city(sentence: &str) -> (FieldValue, FieldValue) {
    if !HAS_COUNTY.is_match(sentence) {
        let city = CITY_IN_STATE
            .captures(sentence)
            .and_then(|c| c.get(1))
            .map(|m| tidy(m.as_str()).to_string())
            .filter(|city| !city.is_empty())
            .map_or(
                FieldValue::Failed(Failure::RegexExtractionFailed("city")),
                checked_city,
            );
        return (FieldValue::Unknown, city);
    }

    let Some(raw_county) = COUNTY.captures(sentence).and_then(|c| c.get(1)) else {
        return (
            FieldValue::Failed(Failure::RegexExtractionFailed("county")),
            FieldValue::Failed(Failure::UpstreamMissing("county")),
        );
    };
    let raw_county = tidy(raw_county.as_str());
    let county = raw_county
        .strip_prefix("in ")
        .unwrap_or(raw_county)
        .trim()
        .to_string();

    let city_before_county = Regex::new(&format!(
        r"\b(?:in|near)\b([\w\s]+),\s*{}",
        regex::escape(raw_county)
    ))
    .ok()
    .and_then(|re| {
        re.captures(sentence)
            .and_then(|c| c.get(1))
            .map(|m| tidy(m.as_str()).to_string())
    })
    .filter(|city| !city.is_empty());
    let city = city_before_county.map_or(
        FieldValue::Failed(Failure::RegexExtractionFailed("city")),
        checked_city,
    );
    (FieldValue::Value(county), city)
}

fn checked_city(city: String) -> FieldValue {
    if city.chars().count() > MAX_CITY_LEN {
        FieldValue::Failed(Failure::SuspectCapture(city))
    } else {
        FieldValue::Value(city)
    }
}

/// Merge per-sentence outcomes: distinct values joined with "; ", else the
/// first suspect capture or failure, else unknown.
fn aggregate(outcomes: Vec<FieldValue>) -> FieldValue {
    let mut values: Vec<String> = Vec::new();
    let mut fallback = FieldValue::Unknown;
    for outcome in outcomes {
        match outcome {
            FieldValue::Value(v) => {
                if !values.contains(&v) {
                    values.push(v);
                }
            }
            FieldValue::Failed(failure) => {
                let keep = match (&fallback, &failure) {
                    (FieldValue::Unknown, _) => true,
                    (FieldValue::Failed(Failure::SuspectCapture(_)), _) => false,
                    (_, Failure::SuspectCapture(_)) => true,
                    _ => false,
                };
                if keep {
                    fallback = FieldValue::Failed(failure);
                }
            }
            FieldValue::Unknown => {}
        }
    }
    if values.is_empty() {
        fallback
    } else {
        FieldValue::Value(values.join("; "))
    }
}

fn hydrologic_unit_code(narrative: &str) -> FieldValue {
    let Some(found) = HYDROLOGIC.captures(narrative) else {
        return FieldValue::Unknown;
    };
    let code = found.get(1).map(|m| squeeze(m.as_str())).unwrap_or_default();
    if code.is_empty() {
        FieldValue::Failed(Failure::RegexExtractionFailed("hydrologic unit code"))
    } else {
        FieldValue::Value(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(narrative: &str) -> LocationParts {
        location_parts(&FieldValue::Value(narrative.to_string()))
    }

    #[test]
    fn test_county_and_city() {
        let p = parts("The project is located in Orange Beach, Baldwin County, Alabama.");
        assert_eq!(p.county, FieldValue::Value("Baldwin County".to_string()));
        assert_eq!(p.city, FieldValue::Value("Orange Beach".to_string()));
        assert!(p.parish.is_unknown());
        assert!(p.hydrologic_unit_code.is_unknown());
    }

    #[test]
    fn test_parish_and_city_without_county() {
        let p = parts(
            "The site is near Houma, Louisiana. Work occurs in Terrebonne Parish. \
             Hydrologic Unit Code: 0809 0302",
        );
        assert!(p.county.is_unknown());
        assert_eq!(p.city, FieldValue::Value("Houma".to_string()));
        assert_eq!(p.parish, FieldValue::Value("Terrebonne Parish".to_string()));
        assert_eq!(p.hydrologic_unit_code, FieldValue::Value("08090302".to_string()));
    }

    #[test]
    fn test_overlong_city_is_flagged() {
        let p = parts("Located near the intersection of the old highway and the river road, Texas.");
        assert!(matches!(p.city, FieldValue::Failed(Failure::SuspectCapture(_))));
    }

    #[test]
    fn test_gating_on_location_outcome() {
        let unknown = location_parts(&FieldValue::Unknown);
        assert!(unknown.county.is_unknown());
        assert!(unknown.hydrologic_unit_code.is_unknown());

        let failed = location_parts(&FieldValue::Failed(Failure::RegexExtractionFailed(
            "location of work",
        )));
        assert_eq!(
            failed.city.failure().map(ToString::to_string).as_deref(),
            Some("ERROR: cannot extract location of work")
        );
    }
}
