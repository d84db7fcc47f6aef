//! The structured record produced for one notice.

use serde::Serialize;

use super::{Dialect, Failure, FieldStatus, FieldValue, ImpactEvent};

/// How the text a record was extracted from was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextExtractionStatus {
    Normal,
    OcrApplied,
    WebpageFallback,
    TotalFailure,
}

impl TextExtractionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::OcrApplied => "ocr_applied",
            Self::WebpageFallback => "webpage_fallback",
            Self::TotalFailure => "total_failure",
        }
    }
}

/// Low-content notice classification.
///
/// The two signals are kept apart; `flag` is their disjunction. Flattened
/// into the record as `specialNoticeFlag`, `explicitMarker` and
/// `noStructuredContent`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialNotice {
    #[serde(rename = "specialNoticeFlag")]
    pub flag: bool,
    /// Text carries an explicit "special public notice" marker.
    pub explicit_marker: bool,
    /// Applicant, location and work description all failed or were absent.
    pub no_structured_content: bool,
}

impl SpecialNotice {
    pub fn new(explicit_marker: bool, no_structured_content: bool) -> Self {
        Self {
            flag: explicit_marker || no_structured_content,
            explicit_marker,
            no_structured_content,
        }
    }
}

/// Extracted fields for one notice. Every field holds a value, `unknown`,
/// or a typed failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub application_number: FieldValue,
    pub district_code: FieldValue,
    pub district_name: FieldValue,
    pub comment_window_days: FieldValue<u32>,
    pub manager_name: FieldValue,
    pub manager_phone: FieldValue,
    pub manager_email: FieldValue,
    pub applicant_raw_text: FieldValue,
    pub applicant_name: FieldValue,
    pub contractor_name: FieldValue,
    pub location_raw_text: FieldValue,
    pub county: FieldValue,
    pub parish: FieldValue,
    pub city: FieldValue,
    pub hydrologic_unit_code: FieldValue,
    pub longitude: FieldValue<Vec<f64>>,
    pub latitude: FieldValue<Vec<f64>>,
    pub work_description_raw_text: FieldValue,
    pub mitigation_raw_text: FieldValue,
    pub water_quality_cert_id: FieldValue,
    pub coastal_use_permit_ids: FieldValue<Vec<String>>,
    pub impact_events: FieldValue<Vec<ImpactEvent>>,
    pub trimmed_text: FieldValue,
    #[serde(flatten)]
    pub special_notice: SpecialNotice,
    pub text_extraction_status: TextExtractionStatus,
    /// Both coordinate lists were extracted but differ in length.
    pub coordinate_count_mismatch: bool,
}

impl ExtractionResult {
    /// Record for a notice no text could be read from. Every field carries
    /// the same failure.
    pub fn total_failure() -> Self {
        Self::filled_with(Failure::TextUnavailable, TextExtractionStatus::TotalFailure)
    }

    /// Record whose every field carries `failure`.
    pub fn filled_with(failure: Failure, status: TextExtractionStatus) -> Self {
        let f = || FieldValue::Failed(failure.clone());
        Self {
            application_number: f(),
            district_code: f(),
            district_name: f(),
            comment_window_days: FieldValue::Failed(failure.clone()),
            manager_name: f(),
            manager_phone: f(),
            manager_email: f(),
            applicant_raw_text: f(),
            applicant_name: f(),
            contractor_name: f(),
            location_raw_text: f(),
            county: f(),
            parish: f(),
            city: f(),
            hydrologic_unit_code: f(),
            longitude: FieldValue::Failed(failure.clone()),
            latitude: FieldValue::Failed(failure.clone()),
            work_description_raw_text: f(),
            mitigation_raw_text: f(),
            water_quality_cert_id: f(),
            coastal_use_permit_ids: FieldValue::Failed(failure.clone()),
            impact_events: FieldValue::Failed(failure.clone()),
            trimmed_text: f(),
            special_notice: SpecialNotice::default(),
            text_extraction_status: status,
            coordinate_count_mismatch: false,
        }
    }

    pub fn dialect(&self) -> Option<Dialect> {
        self.district_code.as_value().and_then(|code| Dialect::from_str(code))
    }

    pub fn special_notice_flag(&self) -> bool {
        self.special_notice.flag
    }

    /// State of every three-way field, in serialization order.
    pub fn field_statuses(&self) -> Vec<(&'static str, FieldStatus<'_>)> {
        vec![
            ("applicationNumber", self.application_number.status()),
            ("districtCode", self.district_code.status()),
            ("districtName", self.district_name.status()),
            ("commentWindowDays", self.comment_window_days.status()),
            ("managerName", self.manager_name.status()),
            ("managerPhone", self.manager_phone.status()),
            ("managerEmail", self.manager_email.status()),
            ("applicantRawText", self.applicant_raw_text.status()),
            ("applicantName", self.applicant_name.status()),
            ("contractorName", self.contractor_name.status()),
            ("locationRawText", self.location_raw_text.status()),
            ("county", self.county.status()),
            ("parish", self.parish.status()),
            ("city", self.city.status()),
            ("hydrologicUnitCode", self.hydrologic_unit_code.status()),
            ("longitude", self.longitude.status()),
            ("latitude", self.latitude.status()),
            ("workDescriptionRawText", self.work_description_raw_text.status()),
            ("mitigationRawText", self.mitigation_raw_text.status()),
            ("waterQualityCertId", self.water_quality_cert_id.status()),
            ("coastalUsePermitIds", self.coastal_use_permit_ids.status()),
            ("impactEvents", self.impact_events.status()),
            ("trimmedText", self.trimmed_text.status()),
        ]
    }
}
