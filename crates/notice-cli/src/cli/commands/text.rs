//! Extraction over a text file that has already been decoded.

use std::path::Path;

use anyhow::Context;
use notice::config::Settings;
use notice::models::{Dialect, Document, ExtractionResult, TextExtractionStatus};
use notice::sources::RawText;
use notice_extract::services::rules_for;
use notice_extract::{extract_from_text, ExtractOptions, NormalizedText};

fn extract_document(
    settings: &Settings,
    content: &str,
    document: &Document,
) -> ExtractionResult {
    let dialect = document.resolved_dialect();
    let raw = RawText::from_form_feeds(content);
    let text = NormalizedText::from_pages(raw.pages.as_slice(), rules_for(dialect));
    let options = ExtractOptions {
        trimmed_text_limit: settings.trimmed_text_limit,
    };
    extract_from_text(document, dialect, &text, TextExtractionStatus::Normal, &options)
}

pub fn cmd_text(
    settings: &Settings,
    input: &Path,
    dialect: Option<Dialect>,
    url: &str,
    title: Option<String>,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let mut document = Document::new(url);
    document.dialect = dialect;
    document.title = title;

    let result = extract_document(settings, &content, &document);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notice::models::FieldValue;

    const NOTICE: &str = "JOINT PUBLIC NOTICE Application #: MVN-2024-00077-CM \
        Interested parties are hereby notified that an application has been received. \
        APPLICANT: Bayou Docks LLC, Post Office Box 9, Houma, LA 70361 \
        LOCATION OF WORK: Bayou Terrebonne, in Terrebonne Parish, Louisiana. \
        CHARACTER OF WORK: Construct a dock.\u{0c}Page 2 of 2";

    #[test]
    fn test_explicit_dialect() {
        let document = Document::new("").with_dialect(Dialect::Mvn);
        let result = extract_document(&Settings::default(), NOTICE, &document);
        assert_eq!(result.district_code, FieldValue::Value("MVN".to_string()));
        assert_eq!(result.text_extraction_status, TextExtractionStatus::Normal);
    }

    #[test]
    fn test_dialect_from_url() {
        let document = Document::new("https://www.mvn.usace.army.mil/Missions/Regulatory/");
        let result = extract_document(&Settings::default(), NOTICE, &document);
        assert_eq!(result.dialect(), Some(Dialect::Mvn));
    }

    #[test]
    fn test_missing_input_file() {
        let err = cmd_text(
            &Settings::default(),
            Path::new("/nonexistent/notice.txt"),
            None,
            "",
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
