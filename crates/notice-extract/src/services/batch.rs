//! Batch runner: the record assembler over many documents with bounded
//! concurrency.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use notice::models::{Document, ExtractionResult, Failure, TextExtractionStatus};
use serde::Serialize;
use tokio::sync::mpsc;

use super::assembler::RecordAssembler;

/// Progress events emitted while a batch runs.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Started {
        total_documents: usize,
    },
    DocumentStarted {
        document_id: String,
    },
    DocumentCompleted {
        document_id: String,
        status: TextExtractionStatus,
    },
    DocumentFailed {
        document_id: String,
        error: String,
    },
    Complete {
        summary: BatchSummary,
    },
}

/// One processed document and its record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRecord {
    pub document: Document,
    pub result: ExtractionResult,
}

/// Counts by text extraction status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub normal: usize,
    pub ocr_applied: usize,
    pub webpage_fallback: usize,
    pub total_failure: usize,
    /// Documents whose task died; they are also counted as total failures.
    pub aborted: usize,
    pub special_notices: usize,
}

impl BatchSummary {
    fn record(&mut self, result: &ExtractionResult) {
        self.total += 1;
        match result.text_extraction_status {
            TextExtractionStatus::Normal => self.normal += 1,
            TextExtractionStatus::OcrApplied => self.ocr_applied += 1,
            TextExtractionStatus::WebpageFallback => self.webpage_fallback += 1,
            TextExtractionStatus::TotalFailure => self.total_failure += 1,
        }
        if result.special_notice_flag() {
            self.special_notices += 1;
        }
    }
}

pub struct BatchRunner {
    assembler: Arc<RecordAssembler>,
    concurrency: usize,
}

impl BatchRunner {
    pub fn new(assembler: Arc<RecordAssembler>) -> Self {
        Self {
            assembler,
            concurrency: 4,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Run every document through the assembler.
    ///
    /// Records come back in input order. Each document runs in its own task;
    /// one that panics yields a record whose every field carries
    /// [`Failure::Internal`] and the rest of the batch carries on. The caller
    /// owns the event receiver; a dropped receiver does not stop the batch.
    pub async fn run(
        &self,
        documents: Vec<Document>,
        event_tx: mpsc::Sender<BatchEvent>,
    ) -> (Vec<BatchRecord>, BatchSummary) {
        let _ = event_tx
            .send(BatchEvent::Started {
                total_documents: documents.len(),
            })
            .await;

        let mut indexed: Vec<(usize, BatchRecord, bool)> =
            stream::iter(documents.into_iter().enumerate())
                .map(|(index, document)| {
                    let assembler = Arc::clone(&self.assembler);
                    let event_tx = event_tx.clone();
                    async move {
                        let (record, aborted) = process(assembler, document, &event_tx).await;
                        (index, record, aborted)
                    }
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;
        indexed.sort_by_key(|(index, _, _)| *index);

        let mut summary = BatchSummary::default();
        let mut records = Vec::with_capacity(indexed.len());
        for (_, record, aborted) in indexed {
            summary.record(&record.result);
            if aborted {
                summary.aborted += 1;
            }
            records.push(record);
        }

        tracing::info!(
            "batch finished: {} documents, {} normal, {} ocr, {} webpage, {} failed",
            summary.total,
            summary.normal,
            summary.ocr_applied,
            summary.webpage_fallback,
            summary.total_failure
        );
        let _ = event_tx
            .send(BatchEvent::Complete {
                summary: summary.clone(),
            })
            .await;

        (records, summary)
    }
}

async fn process(
    assembler: Arc<RecordAssembler>,
    mut document: Document,
    event_tx: &mpsc::Sender<BatchEvent>,
) -> (BatchRecord, bool) {
    document.ensure_id();
    let document_id = document.id.clone();
    let _ = event_tx
        .send(BatchEvent::DocumentStarted {
            document_id: document_id.clone(),
        })
        .await;

    let task_document = document.clone();
    let handle = tokio::spawn(async move { assembler.assemble(&task_document).await });

    match handle.await {
        Ok(result) => {
            tracing::info!(
                "{}: extracted ({})",
                document_id,
                result.text_extraction_status.as_str()
            );
            let _ = event_tx
                .send(BatchEvent::DocumentCompleted {
                    document_id,
                    status: result.text_extraction_status,
                })
                .await;
            (BatchRecord { document, result }, false)
        }
        Err(e) => {
            tracing::warn!("{}: extraction task failed: {}", document_id, e);
            let _ = event_tx
                .send(BatchEvent::DocumentFailed {
                    document_id,
                    error: e.to_string(),
                })
                .await;
            let result = ExtractionResult::filled_with(
                Failure::Internal(e.to_string()),
                TextExtractionStatus::TotalFailure,
            );
            (BatchRecord { document, result }, true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use notice::models::{Dialect, FieldValue};
    use notice::sources::{
        FallbackTextSource, OcrSource, RawText, SourceError, TextFailure, TextSource,
    };
    use std::time::Duration;

    const NOTICE: &str = "JOINT PUBLIC NOTICE Application #: MVN-2023-00456 \
        APPLICANT: Gulf Marine Services, 100 Levee Road, Houma, Louisiana \
        LOCATION OF WORK: Bayou Terrebonne, in Terrebonne Parish, Louisiana. \
        CHARACTER OF WORK: Place fill in 1 acre of wetland permanently. \
        The comment period ends soon.";

    /// Serves the notice; urls ending in "slow.pdf" answer late and urls
    /// containing "panic" blow up.
    struct StubText;

    #[async_trait]
    impl TextSource for StubText {
        async fn fetch_text(&self, url: &str, _dialect: Dialect) -> Result<RawText, TextFailure> {
            if url.contains("panic") {
                panic!("decoder crashed");
            }
            if url.ends_with("slow.pdf") {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            Ok(RawText::new(vec![NOTICE.to_string()]))
        }
    }

    struct NoOcr;

    #[async_trait]
    impl OcrSource for NoOcr {
        async fn ocr_text(&self, _url: &str) -> Result<RawText, SourceError> {
            Err(SourceError::Empty)
        }
    }

    struct NoWeb;

    #[async_trait]
    impl FallbackTextSource for NoWeb {
        async fn fetch_fallback_text(&self, _document: &Document) -> Result<String, SourceError> {
            Err(SourceError::Empty)
        }
    }

    fn runner(concurrency: usize) -> BatchRunner {
        let assembler = RecordAssembler::new(Arc::new(StubText), Arc::new(NoOcr), Arc::new(NoWeb));
        BatchRunner::new(Arc::new(assembler)).with_concurrency(concurrency)
    }

    fn document(name: &str) -> Document {
        Document::new(format!("https://www.mvn.usace.army.mil/{}", name))
            .with_pdf_url(format!("https://www.mvn.usace.army.mil/{}.pdf", name))
    }

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let documents = vec![document("a-slow"), document("b"), document("c")];
        let ids: Vec<String> = documents.iter().map(|d| d.id.clone()).collect();
        let (tx, _rx) = mpsc::channel(32);

        let (records, summary) = runner(3).run(documents, tx).await;

        let got: Vec<String> = records.iter().map(|r| r.document.id.clone()).collect();
        assert_eq!(got, ids);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.normal, 3);
        assert_eq!(summary.aborted, 0);
    }

    #[tokio::test]
    async fn test_panicking_document_does_not_abort_batch() {
        let documents = vec![document("first"), document("panic"), document("last")];
        let (tx, mut rx) = mpsc::channel(32);

        let (records, summary) = runner(2).run(documents, tx).await;

        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0].result.application_number,
            FieldValue::Value("MVN-2023-00456".to_string())
        );
        assert!(records[1]
            .result
            .applicant_name
            .failure()
            .is_some_and(|f| matches!(f, Failure::Internal(_))));
        assert_eq!(
            records[1].result.text_extraction_status,
            TextExtractionStatus::TotalFailure
        );
        assert!(records[2].result.applicant_name.is_value());
        assert_eq!(summary.aborted, 1);
        assert_eq!(summary.total_failure, 1);

        let mut failed = 0;
        let mut completed = false;
        while let Some(event) = rx.recv().await {
            match event {
                BatchEvent::DocumentFailed { .. } => failed += 1,
                BatchEvent::Complete { summary } => {
                    completed = true;
                    assert_eq!(summary.total, 3);
                }
                _ => {}
            }
        }
        assert_eq!(failed, 1);
        assert!(completed);
    }

    #[tokio::test]
    async fn test_documents_without_ids_get_one() {
        let mut doc = document("x");
        doc.id.clear();
        let (tx, _rx) = mpsc::channel(8);
        let (records, _) = runner(1).run(vec![doc], tx).await;
        assert!(records[0].document.id.starts_with("notice-"));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let (tx, _rx) = mpsc::channel(8);
        let (records, summary) = runner(4).run(Vec::new(), tx).await;
        assert!(records.is_empty());
        assert_eq!(summary, BatchSummary::default());
    }
}
