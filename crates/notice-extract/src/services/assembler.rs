//! Record assembly.
//!
//! Obtains a notice's text through the collaborator cascade (binary text,
//! OCR, webpage) and runs every field extractor over it. Any document yields
//! a complete record; when no text can be read at all every field carries
//! the same failure.

use std::sync::{Arc, LazyLock};

use notice::config::Settings;
use notice::models::{
    Dialect, Document, ExtractionResult, Failure, FieldValue, SpecialNotice,
    TextExtractionStatus,
};
use notice::sources::{FallbackTextSource, OcrSource, RawText, TextFailure, TextSource};
use notice::utils::{compile, spaced_ci};
use regex::Regex;

use super::fields::{
    application_number_from_title, extract_applicant, extract_application_number,
    extract_coastal_use_permits, extract_comment_window, extract_location, extract_manager,
    extract_mitigation, extract_water_quality_cert, extract_work_description, location_parts,
};
use super::geo::parse_coordinates;
use super::impact::decompose_impacts;
use super::normalize::NormalizedText;
use super::rules::rules_for;

static SPECIAL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| compile(&spaced_ci("special public notice")));

/// Tunables for a single extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Maximum length of the trimmed text, in characters.
    pub trimmed_text_limit: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            trimmed_text_limit: 5000,
        }
    }
}

impl From<&Settings> for ExtractOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            trimmed_text_limit: settings.trimmed_text_limit,
        }
    }
}

/// Extract every field from already-normalized text.
///
/// Pure: the same document, dialect and text always give the same record.
pub fn extract_from_text(
    document: &Document,
    dialect: Dialect,
    text: &NormalizedText,
    status: TextExtractionStatus,
    options: &ExtractOptions,
) -> ExtractionResult {
    let rules = rules_for(dialect);

    let manager = extract_manager(text, rules);
    let applicant = extract_applicant(text, rules);
    let location = extract_location(text, rules);
    let place = location_parts(&location);
    let work_description = extract_work_description(text, rules);
    let impact_events = match &work_description {
        FieldValue::Value(work) => FieldValue::Value(decompose_impacts(work)),
        FieldValue::Unknown => FieldValue::Unknown,
        FieldValue::Failed(_) => FieldValue::Failed(Failure::UpstreamMissing("character of work")),
    };
    let coordinates = parse_coordinates(text.text());

    let special = SpecialNotice::new(
        SPECIAL_MARKER.is_match(text.text()),
        !applicant.raw_text.is_value() && !location.is_value() && !work_description.is_value(),
    );

    let mut application_number = extract_application_number(text, rules).or_try(|| {
        document
            .title
            .as_deref()
            .and_then(application_number_from_title)
    });
    if special.flag {
        application_number = application_number.failure_as_unknown();
    }

    ExtractionResult {
        application_number,
        district_code: FieldValue::Value(dialect.code().to_string()),
        district_name: FieldValue::Value(dialect.district_name().to_string()),
        comment_window_days: extract_comment_window(text, rules),
        manager_name: manager.name,
        manager_phone: manager.phone,
        manager_email: manager.email,
        applicant_raw_text: applicant.raw_text,
        applicant_name: applicant.applicant,
        contractor_name: applicant.contractor,
        location_raw_text: location,
        county: place.county,
        parish: place.parish,
        city: place.city,
        hydrologic_unit_code: place.hydrologic_unit_code,
        longitude: coordinates.longitude,
        latitude: coordinates.latitude,
        work_description_raw_text: work_description,
        mitigation_raw_text: extract_mitigation(text, rules),
        water_quality_cert_id: extract_water_quality_cert(text),
        coastal_use_permit_ids: extract_coastal_use_permits(text),
        impact_events,
        trimmed_text: FieldValue::Value(text.trimmed(rules, options.trimmed_text_limit)),
        special_notice: special,
        text_extraction_status: status,
        coordinate_count_mismatch: coordinates.count_mismatch,
    }
}

/// Runs the text cascade and field extraction for one document.
pub struct RecordAssembler {
    text: Arc<dyn TextSource>,
    ocr: Arc<dyn OcrSource>,
    fallback: Arc<dyn FallbackTextSource>,
    options: ExtractOptions,
}

impl RecordAssembler {
    pub fn new(
        text: Arc<dyn TextSource>,
        ocr: Arc<dyn OcrSource>,
        fallback: Arc<dyn FallbackTextSource>,
    ) -> Self {
        Self {
            text,
            ocr,
            fallback,
            options: ExtractOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Build the record for `document`.
    pub async fn assemble(&self, document: &Document) -> ExtractionResult {
        let dialect = document.resolved_dialect();

        let Some(pdf_url) = document.pdf_url.as_deref() else {
            tracing::debug!("{}: no binary text url, using webpage", document.id);
            return self.from_fallback(document, dialect).await;
        };

        match self.text.fetch_text(pdf_url, dialect).await {
            Ok(raw) => {
                let text = normalize(&raw, dialect);
                if text.is_empty() {
                    tracing::debug!("{}: decoded text is empty, treating as scanned", document.id);
                    return self.from_ocr(document, dialect, pdf_url).await;
                }
                self.extract(document, dialect, &text, TextExtractionStatus::Normal)
            }
            Err(TextFailure::Scanned) => self.from_ocr(document, dialect, pdf_url).await,
            Err(failure) => {
                tracing::debug!("{}: {}, using webpage", document.id, failure);
                self.from_fallback(document, dialect).await
            }
        }
    }

    async fn from_ocr(&self, document: &Document, dialect: Dialect, pdf_url: &str) -> ExtractionResult {
        tracing::debug!("{}: running OCR", document.id);
        match self.ocr.ocr_text(pdf_url).await {
            Ok(raw) => {
                let text = normalize(&raw, dialect);
                if text.is_empty() {
                    tracing::warn!("{}: OCR produced no text, using webpage", document.id);
                    return self.from_fallback(document, dialect).await;
                }
                self.extract(document, dialect, &text, TextExtractionStatus::OcrApplied)
            }
            Err(e) => {
                tracing::warn!("{}: OCR failed: {}, using webpage", document.id, e);
                self.from_fallback(document, dialect).await
            }
        }
    }

    async fn from_fallback(&self, document: &Document, dialect: Dialect) -> ExtractionResult {
        match self.fallback.fetch_fallback_text(document).await {
            Ok(body) => {
                let text = NormalizedText::from_text(&body);
                if text.is_empty() {
                    tracing::debug!("{}: webpage text is empty", document.id);
                    return ExtractionResult::total_failure();
                }
                self.extract(document, dialect, &text, TextExtractionStatus::WebpageFallback)
            }
            Err(e) => {
                tracing::debug!("{}: webpage text unavailable: {}", document.id, e);
                ExtractionResult::total_failure()
            }
        }
    }

    fn extract(
        &self,
        document: &Document,
        dialect: Dialect,
        text: &NormalizedText,
        status: TextExtractionStatus,
    ) -> ExtractionResult {
        extract_from_text(document, dialect, text, status, &self.options)
    }
}

fn normalize(raw: &RawText, dialect: Dialect) -> NormalizedText {
    NormalizedText::from_pages(&raw.pages, rules_for(dialect))
}
