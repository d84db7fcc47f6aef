//! Coordinate parsing.
//!
//! Notices give coordinates in decimal degrees most of the time, sometimes
//! in degrees/minutes/seconds with symbols, and occasionally as bare
//! space-separated triplets. Longitudes in the covered districts are always
//! west, so they come out negative.

use std::sync::LazyLock;

use notice::models::{Failure, FieldValue};
use regex::Regex;

static LONGITUDE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[Ll]\s?[Oo]\s?[Nn]\s?[Gg]\s?[Ii]\s?[Tt]\s?[Uu]\s?[Dd]\s?[Ee]|[Ll]\s?[Oo]\s?[Nn]\s?[Gg]\s?\.")
        .expect("longitude marker pattern")
});

static LATITUDE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[Ll]\s?[Aa]\s?[Tt]\s?[Ii]\s?[Tt]\s?[Uu]\s?[Dd]\s?[Ee]|[Ll]\s?[Aa]\s?[Tt]\s?\.")
        .expect("latitude marker pattern")
});

/// Decimal longitude after a label, a minus sign or "West".
static LONGITUDE_LABELED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:[Ll]\s?o\s?n\s?g?\s?i?\s?t?\s?u?\s?d?\s?e?\s?\.?:?|-|–|W\s?e?\s?s?\s?t?\s?\.?:?)(\s*[\d\s]{2,3}\.[\d\s]{3,8})",
    )
    .expect("labeled longitude pattern")
});

/// Decimal longitude followed by a west hemisphere letter.
static LONGITUDE_WEST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\d\s]{2,3}\.[\d\s]{3,8})\s*[°ºo]?\s*[Ww]").expect("west longitude pattern")
});

/// Decimal latitude not preceded by a sign, hemisphere or degree symbol.
static LATITUDE_DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^-W°ºo][^-\d°ºo](\d\s?\d\s?\.[\d\s]{4,8})").expect("decimal latitude pattern")
});

static DMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:[Ll]\s?a\s?t|[Ll]\s?o\s?n\s?g)[A-Za-z\s.:-]*?(\d\s?\d\s?[°ºo][\s\d.]*\\?[′'’]?[\d\s.]*[″"”]?)"#,
    )
    .expect("dms pattern")
});

static DEGREES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\d\s]*)[°ºo]").expect("degrees pattern"));
static MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\d.\s]*)[′\\'’]").expect("minutes pattern"));
static SECONDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([\d.\s]*)[″"”]"#).expect("seconds pattern"));

static TRIPLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[Ll]\s?a\s?t\s?\.?|[Ll]\s?o\s?n\s?g\s?\.?\s*?-?)([\d\s.]*)[,)]")
        .expect("triplet pattern")
});

/// Degrees separating longitudes from latitudes in the covered geography.
const LONGITUDE_FLOOR: f64 = 50.0;
const LATITUDE_MIN: f64 = 15.0;

/// Parsed coordinate lists. The lists are paired by index downstream but are
/// not reconciled here.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    pub longitude: FieldValue<Vec<f64>>,
    pub latitude: FieldValue<Vec<f64>>,
    /// Both lists were extracted and their lengths differ.
    pub count_mismatch: bool,
}

pub fn parse_coordinates(text: &str) -> Coordinates {
    let has_longitude = LONGITUDE_MARKER.is_match(text);
    let has_latitude = LATITUDE_MARKER.is_match(text);

    let mut longitude = if has_longitude {
        decimal_longitudes(text)
    } else {
        Vec::new()
    };
    let mut latitude = if has_latitude {
        decimal_latitudes(text)
    } else {
        Vec::new()
    };

    if has_longitude && has_latitude && (longitude.is_empty() || latitude.is_empty()) {
        tracing::debug!("no decimal coordinates, trying degrees/minutes/seconds");
        (longitude, latitude) = split_hemispheres(DMS.captures_iter(text).filter_map(|c| {
            c.get(1).and_then(|m| dms_to_decimal(m.as_str()))
        }));
        if longitude.is_empty() || latitude.is_empty() {
            tracing::debug!("no symbol coordinates, trying bare triplets");
            (longitude, latitude) = split_hemispheres(TRIPLET.captures_iter(text).filter_map(|c| {
                c.get(1).and_then(|m| triplet_to_decimal(m.as_str()))
            }));
        }
    }

    let longitude = outcome(has_longitude, longitude, "longitude");
    let latitude = outcome(has_latitude, latitude, "latitude");
    let count_mismatch = match (&longitude, &latitude) {
        (FieldValue::Value(lon), FieldValue::Value(lat)) => lon.len() != lat.len(),
        _ => false,
    };
    if count_mismatch {
        tracing::warn!("coordinate lists differ in length");
    }

    Coordinates {
        longitude,
        latitude,
        count_mismatch,
    }
}

fn outcome(anchored: bool, values: Vec<f64>, field: &'static str) -> FieldValue<Vec<f64>> {
    if !anchored {
        FieldValue::Unknown
    } else if values.is_empty() {
        FieldValue::Failed(Failure::RegexExtractionFailed(field))
    } else {
        FieldValue::Value(values)
    }
}

fn decimal_longitudes(text: &str) -> Vec<f64> {
    let mut raw: Vec<&str> = capture_all(&LONGITUDE_LABELED, text);
    if raw.is_empty() {
        raw = capture_all(&LONGITUDE_WEST, text);
    }
    let cleaned = most_precise(raw.into_iter().map(clean_decimal).collect());
    cleaned
        .iter()
        .filter_map(|value| value.parse::<f64>().ok())
        .map(|value| -value.abs())
        .collect()
}

fn decimal_latitudes(text: &str) -> Vec<f64> {
    let in_range: Vec<String> = capture_all(&LATITUDE_DECIMAL, text)
        .into_iter()
        .map(clean_decimal)
        .filter(|value| {
            value
                .parse::<f64>()
                .is_ok_and(|v| v > LATITUDE_MIN && v < LONGITUDE_FLOOR)
        })
        .collect();
    most_precise(in_range)
        .iter()
        .filter_map(|value| value.parse::<f64>().ok())
        .collect()
}

fn capture_all<'t>(re: &Regex, text: &'t str) -> Vec<&'t str> {
    re.captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Spaces removed and a leading zero dropped ("090.1234" -> "90.1234").
fn clean_decimal(raw: &str) -> String {
    let value: String = raw.chars().filter(|c| *c != ' ').collect();
    let value = value.trim().to_string();
    match value.strip_prefix('0') {
        Some(rest) => rest.to_string(),
        None => value,
    }
}

/// Keep only the values with the most decimal places; the rest are stray
/// numbers picked up near the coordinates.
fn most_precise(values: Vec<String>) -> Vec<String> {
    let Some(max) = values.iter().map(|v| decimal_places(v)).max() else {
        return values;
    };
    values.into_iter().filter(|v| decimal_places(v) == max).collect()
}

fn decimal_places(value: &str) -> usize {
    value.rsplit('.').next().map_or(0, str::len)
}

fn split_hemispheres(values: impl Iterator<Item = f64>) -> (Vec<f64>, Vec<f64>) {
    let mut longitude = Vec::new();
    let mut latitude = Vec::new();
    for value in values.filter(|v| *v != 0.0) {
        if value > LONGITUDE_FLOOR {
            longitude.push(-value);
        } else if value < LONGITUDE_FLOOR {
            latitude.push(value);
        }
    }
    (longitude, latitude)
}

fn dms_to_decimal(raw: &str) -> Option<f64> {
    let part = |re: &Regex, marker: fn(char) -> bool| -> Option<f64> {
        if !raw.chars().any(marker) {
            return Some(0.0);
        }
        let found = re.captures(raw)?.get(1)?.as_str();
        let digits: String = found.chars().filter(|c| !c.is_whitespace()).collect();
        digits.parse().ok()
    };
    let degrees = part(&DEGREES, |c| matches!(c, '°' | 'º' | 'o'))?;
    let minutes = part(&MINUTES, |c| matches!(c, '′' | '\'' | '’'))?;
    let seconds = part(&SECONDS, |c| matches!(c, '″' | '"' | '”'))?;
    Some(degrees + minutes / 60.0 + seconds / 3600.0)
}

/// "29 57 30.5" as degrees, minutes and seconds.
fn triplet_to_decimal(raw: &str) -> Option<f64> {
    let mut parts = raw.split_whitespace().map(|part| part.parse::<f64>().ok());
    let degrees = parts.next()??;
    let minutes = parts.next()??;
    let seconds = parts.next()??;
    Some(degrees + minutes / 60.0 + seconds / 3600.0)
}
