//! Schema splitter: fans a batch of records out into flat tables.
//!
//! Every failure is reported as `unknown` here; the tables are for
//! dashboards and the diagnostic strings live on in the full records.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::Context;
use notice::models::{
    FieldValue, ImpactCondition, ImpactDuration, ImpactUnit, UNKNOWN,
};
use regex::Regex;
use serde::Serialize;

use super::batch::BatchRecord;

static USACE_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\w+@usace\.army\.mil$").expect("usace email pattern")
});

const MIN_PHONE_DIGITS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MainRow {
    pub notice_id: String,
    pub document_id: String,
    pub application_number: String,
    pub district_code: String,
    pub district_name: String,
    pub url: String,
    pub pdf_url: String,
    pub special_flag: bool,
    pub applicant_name: String,
    pub contractor_name: String,
    pub applicant_details: String,
    /// Digits only, or `unknown`.
    pub hydrologic_unit_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerRow {
    pub notice_id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeRow {
    pub notice_id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRow {
    pub notice_id: String,
    /// One of `county`, `city`, `parish` or `location`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactRow {
    pub notice_id: String,
    pub quantity: Option<f64>,
    pub unit: ImpactUnit,
    #[serde(rename = "type")]
    pub impact_type: String,
    pub condition: ImpactCondition,
    pub duration: ImpactDuration,
}

/// Index-wise longitude/latitude pair. The shorter list leaves the other
/// side null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateRow {
    pub notice_id: String,
    pub index: usize,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

/// Row sets for one batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NoticeTables {
    pub main: Vec<MainRow>,
    pub manager: Vec<ManagerRow>,
    pub character: Vec<NarrativeRow>,
    pub mitigation: Vec<NarrativeRow>,
    pub location: Vec<LocationRow>,
    pub impact: Vec<ImpactRow>,
    pub coordinates: Vec<CoordinateRow>,
}

/// Split records numbered from `Notice_NO_1`.
pub fn split_records(records: &[BatchRecord]) -> NoticeTables {
    split_records_from(records, 1)
}

/// Split records, numbering the first one `Notice_NO_<first_number>`.
pub fn split_records_from(records: &[BatchRecord], first_number: usize) -> NoticeTables {
    let mut tables = NoticeTables::default();
    for (offset, record) in records.iter().enumerate() {
        tables.push(format!("Notice_NO_{}", first_number + offset), record);
    }
    tables
}

impl NoticeTables {
    fn push(&mut self, notice_id: String, record: &BatchRecord) {
        let document = &record.document;
        let result = &record.result;

        self.main.push(MainRow {
            notice_id: notice_id.clone(),
            document_id: clean_str(&document.id),
            application_number: clean(&result.application_number),
            district_code: clean(&result.district_code),
            district_name: clean(&result.district_name),
            url: clean_str(&document.url),
            pdf_url: document.pdf_url.as_deref().map_or(UNKNOWN.to_string(), clean_str),
            special_flag: result.special_notice_flag(),
            applicant_name: clean(&result.applicant_name),
            contractor_name: clean(&result.contractor_name),
            applicant_details: clean(&result.applicant_raw_text),
            hydrologic_unit_code: digits_or_unknown(&result.hydrologic_unit_code),
        });

        let manager = ManagerRow {
            notice_id: notice_id.clone(),
            name: clean(&result.manager_name),
            phone: checked_phone(clean(&result.manager_phone)),
            email: checked_email(clean(&result.manager_email)),
        };
        if [&manager.name, &manager.phone, &manager.email]
            .iter()
            .any(|v| v.as_str() != UNKNOWN)
        {
            self.manager.push(manager);
        }

        if let Some(text) = known(&result.work_description_raw_text) {
            self.character.push(NarrativeRow {
                notice_id: notice_id.clone(),
                text,
            });
        }
        if let Some(text) = known(&result.mitigation_raw_text) {
            self.mitigation.push(NarrativeRow {
                notice_id: notice_id.clone(),
                text,
            });
        }

        let places = [
            ("county", &result.county),
            ("city", &result.city),
            ("parish", &result.parish),
            ("location", &result.location_raw_text),
        ];
        for (kind, field) in places {
            if let Some(value) = known(field) {
                self.location.push(LocationRow {
                    notice_id: notice_id.clone(),
                    kind,
                    value,
                });
            }
        }

        if let FieldValue::Value(events) = &result.impact_events {
            for event in events {
                self.impact.push(ImpactRow {
                    notice_id: notice_id.clone(),
                    quantity: event.quantity,
                    unit: event.unit,
                    impact_type: clean_str(&event.impact_type),
                    condition: event.condition,
                    duration: event.duration,
                });
            }
        }

        let longitude = result.longitude.as_value().map_or(&[][..], Vec::as_slice);
        let latitude = result.latitude.as_value().map_or(&[][..], Vec::as_slice);
        for index in 0..longitude.len().max(latitude.len()) {
            self.coordinates.push(CoordinateRow {
                notice_id: notice_id.clone(),
                index,
                longitude: longitude.get(index).copied(),
                latitude: latitude.get(index).copied(),
            });
        }
    }

    /// Write each table to `<dir>/<table>.jsonl`, creating `dir` if needed.
    pub fn write_jsonl(&self, dir: &Path) -> anyhow::Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create table directory {}", dir.display()))?;
        write_table(dir, "main", &self.main)?;
        write_table(dir, "manager", &self.manager)?;
        write_table(dir, "character", &self.character)?;
        write_table(dir, "mitigation", &self.mitigation)?;
        write_table(dir, "location", &self.location)?;
        write_table(dir, "impact", &self.impact)?;
        write_table(dir, "coordinates", &self.coordinates)?;
        Ok(())
    }
}

fn write_table<T: Serialize>(dir: &Path, name: &str, rows: &[T]) -> anyhow::Result<()> {
    let mut output = String::new();
    for row in rows {
        let line = serde_json::to_string(row)
            .with_context(|| format!("Failed to serialize {} row", name))?;
        let _ = writeln!(output, "{}", line);
    }
    let path = dir.join(format!("{}.jsonl", name));
    fs::write(&path, output).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!("wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Value with failures reported as `unknown`.
fn clean(field: &FieldValue) -> String {
    match field {
        FieldValue::Value(value) => clean_str(value),
        _ => UNKNOWN.to_string(),
    }
}

/// Printable ASCII only: whitespace controls become spaces, anything else
/// outside the printable range becomes `?`.
fn clean_str(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            ' '..='~' => c,
            '\t' | '\n' | '\r' | '\u{0b}' | '\u{0c}' => ' ',
            _ => '?',
        })
        .collect()
}

fn known(field: &FieldValue) -> Option<String> {
    Some(clean(field)).filter(|v| v != UNKNOWN)
}

fn checked_phone(phone: String) -> String {
    if phone.chars().filter(char::is_ascii_digit).count() < MIN_PHONE_DIGITS {
        UNKNOWN.to_string()
    } else {
        phone
    }
}

fn checked_email(email: String) -> String {
    if USACE_EMAIL.is_match(&email) {
        email
    } else {
        UNKNOWN.to_string()
    }
}

fn digits_or_unknown(field: &FieldValue) -> String {
    match field.as_value() {
        Some(code) if !code.is_empty() && code.chars().all(|c| c.is_ascii_digit()) => code.clone(),
        _ => UNKNOWN.to_string(),
    }
}
