//! Batch extraction over a JSON list of documents.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use console::style;
use notice::config::Settings;
use notice::models::{Document, ExtractionResult};
use notice_analysis::http::build_client;
use notice_analysis::{PdfTextSource, TesseractOcr, WebpageTextSource};
use notice_extract::{
    split_records_from, BatchRecord, BatchRunner, ExtractOptions, RecordAssembler,
};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::cli::progress::track_batch;

pub struct ExtractArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub tables: Option<PathBuf>,
    pub first_notice_number: usize,
    pub concurrency: Option<usize>,
    pub show_progress: bool,
}

/// One line of extraction output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    document_id: &'a str,
    extracted_at: DateTime<Utc>,
    result: &'a ExtractionResult,
}

fn read_documents(path: &Path) -> anyhow::Result<Vec<Document>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of documents", path.display()))
}

fn build_assembler(settings: &Settings) -> anyhow::Result<RecordAssembler> {
    let client = build_client(settings).context("failed to build HTTP client")?;
    let assembler = RecordAssembler::new(
        Arc::new(PdfTextSource::new(client.clone(), settings)),
        Arc::new(TesseractOcr::new(client.clone(), settings)),
        Arc::new(WebpageTextSource::new(client)),
    )
    .with_options(ExtractOptions {
        trimmed_text_limit: settings.trimmed_text_limit,
    });
    Ok(assembler)
}

fn render_lines(records: &[BatchRecord], extracted_at: DateTime<Utc>) -> anyhow::Result<String> {
    let mut lines = String::new();
    for record in records {
        let envelope = Envelope {
            document_id: &record.document.id,
            extracted_at,
            result: &record.result,
        };
        let line = serde_json::to_string(&envelope)?;
        writeln!(lines, "{}", line)?;
    }
    Ok(lines)
}

pub async fn cmd_extract(settings: &Settings, args: ExtractArgs) -> anyhow::Result<()> {
    let documents = read_documents(&args.input)?;
    if documents.is_empty() {
        eprintln!("{} No documents in {}", style("!").yellow(), args.input.display());
        return Ok(());
    }

    let concurrency = args.concurrency.unwrap_or(settings.concurrency);
    let runner =
        BatchRunner::new(Arc::new(build_assembler(settings)?)).with_concurrency(concurrency);

    let (event_tx, event_rx) = mpsc::channel(100);
    let event_handler = tokio::spawn(track_batch(event_rx, args.show_progress));

    let (records, _summary) = runner.run(documents, event_tx).await;
    let aborted = event_handler.await.unwrap_or(0);

    let lines = render_lines(&records, Utc::now())?;
    match args.output {
        Some(ref path) => {
            std::fs::write(path, &lines)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "{} Wrote {} records to {}",
                style("✓").green(),
                records.len(),
                path.display()
            );
        }
        None => print!("{}", lines),
    }

    if let Some(ref dir) = args.tables {
        split_records_from(&records, args.first_notice_number).write_jsonl(dir)?;
        eprintln!("{} Wrote tables to {}", style("✓").green(), dir.display());
    }

    if aborted > 0 {
        tracing::warn!("{} documents aborted during extraction", aborted);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notice::models::{Failure, TextExtractionStatus};
    use tempfile::TempDir;

    #[test]
    fn test_read_documents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("docs.json");
        std::fs::write(
            &path,
            r#"[{"url": "https://www.mvn.usace.army.mil/notice/1", "pdfUrl": "https://www.mvn.usace.army.mil/1.pdf"},
                {"id": "b", "url": "https://www.swg.usace.army.mil/notice/2", "webText": "APPLICANT: Acme"}]"#,
        )
        .unwrap();
        let documents = read_documents(&path).unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(
            documents[0].pdf_url.as_deref(),
            Some("https://www.mvn.usace.army.mil/1.pdf")
        );
        assert_eq!(documents[1].id, "b");
    }

    #[test]
    fn test_read_documents_rejects_object() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("docs.json");
        std::fs::write(&path, r#"{"url": "x"}"#).unwrap();
        assert!(read_documents(&path).is_err());
    }

    #[test]
    fn test_render_lines_envelope() {
        let records = vec![BatchRecord {
            document: Document {
                id: "doc-1".to_string(),
                ..Document::new("https://www.sam.usace.army.mil/notice")
            },
            result: ExtractionResult::filled_with(
                Failure::TextUnavailable,
                TextExtractionStatus::TotalFailure,
            ),
        }];
        let extracted_at = DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let lines = render_lines(&records, extracted_at).unwrap();
        assert_eq!(lines.lines().count(), 1);

        let value: serde_json::Value = serde_json::from_str(lines.trim_end()).unwrap();
        assert_eq!(value["documentId"], "doc-1");
        assert_eq!(value["extractedAt"], "2024-03-01T12:00:00Z");
        assert_eq!(value["result"]["textExtractionStatus"], "total_failure");
    }
}
