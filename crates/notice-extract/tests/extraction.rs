//! Whole synthetic notices run through extraction, one per district.

use std::sync::Arc;

use async_trait::async_trait;
use notice::models::{
    Dialect, Document, ExtractionResult, FieldStatus, FieldValue, ImpactCondition,
    ImpactDuration, ImpactUnit, TextExtractionStatus,
};
use notice::sources::{FallbackTextSource, OcrSource, RawText, SourceError, TextFailure, TextSource};
use notice_extract::{extract_from_text, ExtractOptions, NormalizedText, RecordAssembler};

const MVN_NOTICE: &str = "JOINT PUBLIC NOTICE Application #: MVN-2023-00123-WII \
    Interested parties are hereby notified that an application has been received. \
    APPLICANT: Acme Terminals LLC, c/o Coastal Permits Inc., Post Office Box 12, Houma, LA 70361 \
    LOCATION OF WORK: Bayou Lafourche near Golden Meadow, in Lafourche Parish, Louisiana. \
    Latitude: 29.38123, Longitude: -90.26045. \
    CHARACTER OF WORK: Dredge 2 acres of marsh permanently. \
    MITIGATION: The applicant will purchase credits. \
    The comment period will close in 20 days. \
    Project Manager: Jane Doe (504) 862-1234 jane.doe@usace.army.mil Permit";

const SAM_NOTICE: &str = "JOINT PUBLIC NOTICE NO. SAM-2023-00456-JLF JOINT PUBLIC NOTICE \
    APPLICANT: City of Orange Beach Post Office Box 458 \
    AGENT: Goodwyn Mills Cawood, 11 North Water Street \
    WATERWAY AND LOCATION: Wolf Bay, in Baldwin County, Alabama. \
    PROPOSED WORK: The applicant proposes to dredge 0.3 acre of wetland permanently. \
    AVOIDANCE AND MINIMIZATION INFORMATION: The dock was moved landward. \
    COMPENSATORY MITIGATION: Credits will be purchased. CULTURAL RESOURCES: None known.";

const SAJ_NOTICE: &str = "PUBLIC NOTICE Permit Application No. SAJ-2023-01234 (SP-ABC) \
    TO WHOM IT MAY CONCERN: The Jacksonville District has received an application. \
    APPLICANT: Sunshine Marina LLC 100 Harbor Drive Naples, Florida 34102 \
    WATERWAY AND LOCATION: The work would affect Naples Bay, in Collier County, Florida. \
    APPROXIMATE CENTRAL COORDINATES: Latitude: 26.13894, Longitude: -81.79376. \
    PROPOSED WORK: The applicant seeks authorization to fill 500 square feet of wetland permanently. \
    AVOIDANCE AND MINIMIZATION INFORMATION: The dock was shortened. \
    COMPENSATORY MITIGATION: Credits will be purchased. CULTURAL RESOURCES: None known. \
    The comment period for this notice is 30 days. \
    Questions may be directed to the project manager, Jane Q. Doe, at the letterhead address.";

const SWG_NOTICE: &str = "DEPARTMENT OF THE ARMY PERMIT APPLICATION No: SWG-2023-00012 Of THE \
    GALVESTON DISTRICT. APPLICANT: Port of Freeport Post Office Box 615 \
    AGENT: Coastal Consulting LLC, 1200 Main Street \
    LOCATION: The work is in Brazoria County, Texas. \
    LATITUDE & LONGITUDE: Latitude: 28.94512, Longitude: -95.30871. \
    PROJECT DESCRIPTION: The applicant proposes to place fill in 0.2 acre of wetland permanently. \
    AVOIDANCE AND MINIMIZATION: The footprint was reduced. \
    COMPENSATORY MITIGATION: Credits will be purchased. \
    CURRENT SITE CONDITIONS: Open water. \
    COMMENT PERIOD: Comments must be submitted within 30 days to: Jane Doe, \
    U.S. Army Corps of Engineers, Galveston DISTRICT";

fn extract(dialect: Dialect, url: &str, body: &str) -> ExtractionResult {
    let document = Document::new(url).with_dialect(dialect);
    extract_from_text(
        &document,
        dialect,
        &NormalizedText::from_text(body),
        TextExtractionStatus::Normal,
        &ExtractOptions::default(),
    )
}

fn value(field: &FieldValue) -> &str {
    field.as_value().map(String::as_str).unwrap_or("<not extracted>")
}

/// Every field is present, and failures never read as `unknown`.
fn assert_complete(record: &ExtractionResult) {
    for (name, status) in record.field_statuses() {
        if let FieldStatus::Failed(failure) = status {
            let s = failure.to_string();
            assert!(s.starts_with("ERROR:") || s.starts_with("CHECK:"), "{}: {}", name, s);
        }
    }
    let json = serde_json::to_value(record).unwrap();
    let obj = json.as_object().unwrap();
    assert_eq!(obj.len(), 28);
    for (key, value) in obj {
        assert!(!value.is_null(), "{} is null", key);
    }
    if let FieldValue::Value(longitudes) = &record.longitude {
        assert!(longitudes.iter().all(|lon| *lon < 0.0));
    }
}

#[test]
fn test_new_orleans_notice() {
    let record = extract(Dialect::Mvn, "https://www.mvn.usace.army.mil/notice", MVN_NOTICE);
    assert_complete(&record);

    assert_eq!(value(&record.application_number), "MVN-2023-00123-WII");
    assert_eq!(value(&record.district_name), "New Orleans District");
    assert_eq!(value(&record.applicant_name), "Acme Terminals LLC");
    assert_eq!(value(&record.contractor_name), "Coastal Permits Inc.");
    assert_eq!(value(&record.parish), "Lafourche Parish");
    assert_eq!(value(&record.manager_name), "Jane Doe");
    assert_eq!(value(&record.manager_email), "jane.doe@usace.army.mil");
    assert_eq!(record.comment_window_days, FieldValue::Value(20));
    assert_eq!(record.latitude, FieldValue::Value(vec![29.38123]));
    assert_eq!(record.longitude, FieldValue::Value(vec![-90.26045]));
    assert!(!record.coordinate_count_mismatch);

    let events = record.impact_events.as_value().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].unit, ImpactUnit::Acre);
    assert_eq!(events[0].quantity, Some(2.0));
    assert_eq!(events[0].duration, ImpactDuration::Permanent);
    assert!(!record.special_notice_flag());
}

#[test]
fn test_mobile_notice() {
    let record = extract(Dialect::Sam, "https://www.sam.usace.army.mil/notice", SAM_NOTICE);
    assert_complete(&record);

    assert_eq!(value(&record.application_number), "SAM-2023-00456-JLF");
    assert_eq!(value(&record.district_code), "SAM");
    assert_eq!(value(&record.applicant_name), "City of Orange Beach");
    assert_eq!(value(&record.contractor_name), "Goodwyn Mills Cawood");
    assert!(value(&record.location_raw_text).contains("Wolf Bay"));
    assert!(value(&record.mitigation_raw_text).contains("Credits will be purchased"));
    assert!(record.comment_window_days.is_unknown());
    assert!(record.longitude.is_unknown());

    let events = record.impact_events.as_value().unwrap();
    assert_eq!(events.len(), 1);
    assert!(events[0].impact_type.contains("wetland"));
    assert_eq!(events[0].condition, ImpactCondition::Negative);
}

#[test]
fn test_jacksonville_notice() {
    let record = extract(Dialect::Saj, "https://www.saj.usace.army.mil/notice", SAJ_NOTICE);
    assert_complete(&record);

    assert!(value(&record.application_number).starts_with("SAJ-2023-01234"));
    assert_eq!(value(&record.district_name), "Jacksonville District");
    assert_eq!(value(&record.applicant_name), "Sunshine Marina LLC");
    assert_eq!(value(&record.manager_name), "Jane Q. Doe");
    assert_eq!(record.comment_window_days, FieldValue::Value(30));
    assert_eq!(record.latitude, FieldValue::Value(vec![26.13894]));
    assert_eq!(record.longitude, FieldValue::Value(vec![-81.79376]));

    let events = record.impact_events.as_value().unwrap();
    assert_eq!(events[0].unit, ImpactUnit::SquareFeet);
    assert_eq!(events[0].quantity, Some(500.0));
}

#[test]
fn test_galveston_notice() {
    let record = extract(Dialect::Swg, "https://www.swg.usace.army.mil/notice", SWG_NOTICE);
    assert_complete(&record);

    assert_eq!(value(&record.application_number), "SWG-2023-00012");
    assert_eq!(value(&record.applicant_name), "Port of Freeport");
    assert_eq!(value(&record.contractor_name), "Coastal Consulting LLC");
    assert_eq!(value(&record.manager_name), "Jane Doe");
    assert_eq!(record.comment_window_days, FieldValue::Value(30));
    assert!(value(&record.work_description_raw_text).ends_with("permanently."));
    assert!(record.mitigation_raw_text.is_value());
    assert_eq!(record.longitude, FieldValue::Value(vec![-95.30871]));

    let events = record.impact_events.as_value().unwrap();
    assert_eq!(events.len(), 1);
    assert!((events[0].quantity.unwrap() - 0.2).abs() < 1e-9);
    assert_eq!(events[0].condition, ImpactCondition::Negative);
    assert_eq!(events[0].duration, ImpactDuration::Permanent);
}

#[test]
fn test_manager_after_branch_name_is_recovered() {
    let body = MVN_NOTICE.replace(
        "Project Manager: Jane Doe",
        "Project Manager: Regulatory Branch Jane Doe",
    );
    let record = extract(Dialect::Mvn, "https://www.mvn.usace.army.mil/notice", &body);
    assert_complete(&record);
    assert_eq!(value(&record.manager_name), "Jane Doe");
    assert_eq!(value(&record.manager_email), "jane.doe@usace.army.mil");
}

#[test]
fn test_manager_found_before_area_code() {
    let body = MVN_NOTICE.replace(
        "Project Manager: Jane Doe",
        "Project Manager: Regulatory Division Jane Doe",
    );
    let record = extract(Dialect::Mvn, "https://www.mvn.usace.army.mil/notice", &body);
    assert_complete(&record);
    assert_eq!(value(&record.manager_name), "Jane Doe");
}

#[test]
fn test_special_marker_sets_flag() {
    let body = format!("SPECIAL PUBLIC NOTICE {}", MVN_NOTICE);
    let record = extract(Dialect::Mvn, "https://www.mvn.usace.army.mil/notice", &body);
    assert!(record.special_notice_flag());
    assert!(record.special_notice.explicit_marker);
    assert!(!record.special_notice.no_structured_content);

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["specialNoticeFlag"], true);
    assert_eq!(json["explicitMarker"], true);
    assert_eq!(json["noStructuredContent"], false);
}

#[test]
fn test_extraction_is_idempotent() {
    for (dialect, body) in [
        (Dialect::Mvn, MVN_NOTICE),
        (Dialect::Sam, SAM_NOTICE),
        (Dialect::Saj, SAJ_NOTICE),
        (Dialect::Swg, SWG_NOTICE),
    ] {
        let first = extract(dialect, "https://example.gov/notice", body);
        let second = extract(dialect, "https://example.gov/notice", body);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

struct DeadLink;

#[async_trait]
impl TextSource for DeadLink {
    async fn fetch_text(&self, _url: &str, _dialect: Dialect) -> Result<RawText, TextFailure> {
        Err(TextFailure::DeadLink("404 Not Found".to_string()))
    }
}

struct NoOcr;

#[async_trait]
impl OcrSource for NoOcr {
    async fn ocr_text(&self, _url: &str) -> Result<RawText, SourceError> {
        Err(SourceError::Empty)
    }
}

struct Webpage(&'static str);

#[async_trait]
impl FallbackTextSource for Webpage {
    async fn fetch_fallback_text(&self, _document: &Document) -> Result<String, SourceError> {
        Ok(self.0.to_string())
    }
}

fn assembler(webpage: &'static str) -> RecordAssembler {
    RecordAssembler::new(Arc::new(DeadLink), Arc::new(NoOcr), Arc::new(Webpage(webpage)))
}

#[tokio::test]
async fn test_dead_link_with_empty_webpage_fails_every_field() {
    let document = Document::new("https://www.swg.usace.army.mil/notice")
        .with_pdf_url("https://www.swg.usace.army.mil/Portals/26/notice.pdf");
    let record = assembler("").assemble(&document).await;

    assert_eq!(record.text_extraction_status, TextExtractionStatus::TotalFailure);
    let json = serde_json::to_value(&record).unwrap();
    for (key, value) in json.as_object().unwrap() {
        match key.as_str() {
            "textExtractionStatus"
            | "coordinateCountMismatch"
            | "specialNoticeFlag"
            | "explicitMarker"
            | "noStructuredContent" => {}
            _ => assert_eq!(value, "ERROR: fail to read pdf", "{}", key),
        }
    }
}

#[tokio::test]
async fn test_dead_link_with_webpage_text() {
    let document = Document::new("https://www.sam.usace.army.mil/notice")
        .with_pdf_url("https://www.sam.usace.army.mil/Portals/46/notice.pdf");
    let record = assembler(SAM_NOTICE).assemble(&document).await;

    assert_eq!(record.text_extraction_status, TextExtractionStatus::WebpageFallback);
    assert_eq!(record.dialect(), Some(Dialect::Sam));
    assert_eq!(value(&record.applicant_name), "City of Orange Beach");
}
