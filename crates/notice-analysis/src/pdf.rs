//! Binary text via `pdftotext`.

use std::path::Path;
use std::process::Command;

use async_trait::async_trait;
use notice::config::Settings;
use notice::models::Dialect;
use notice::sources::{classify_first_page, RawText, SourceError, TextFailure, TextSource};
use reqwest::Client;
use tempfile::TempDir;

use crate::http::{build_client, download_pdf};
use crate::tools::command_output;

/// Downloads a notice PDF and decodes its text layer.
///
/// Page one decides the outcome: no text means the notice is scanned, and
/// text without the public-notice marker means the PDF is an attachment.
pub struct PdfTextSource {
    client: Client,
    pdftotext: String,
}

impl PdfTextSource {
    pub fn new(client: Client, settings: &Settings) -> Self {
        Self {
            client,
            pdftotext: settings.pdftotext_path.clone(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, SourceError> {
        Ok(Self::new(build_client(settings)?, settings))
    }

    async fn decode(&self, source_url: &str) -> Result<RawText, SourceError> {
        let temp = TempDir::new()?;
        let pdf = download_pdf(&self.client, source_url, temp.path()).await?;
        let pdftotext = self.pdftotext.clone();
        let text = tokio::task::spawn_blocking(move || run_pdftotext(&pdftotext, &pdf))
            .await
            .map_err(|e| SourceError::Failed(e.to_string()))??;
        Ok(RawText::from_form_feeds(&text))
    }
}

fn run_pdftotext(pdftotext: &str, pdf: &Path) -> Result<String, SourceError> {
    let output = Command::new(pdftotext)
        .args(["-enc", "UTF-8"])
        .arg(pdf)
        .arg("-")
        .output();
    command_output(output, pdftotext)
}

/// Outcome for decoded pages.
pub(crate) fn classify(raw: RawText) -> Result<RawText, TextFailure> {
    let first = raw.pages.first().map(String::as_str).unwrap_or("");
    match classify_first_page(first) {
        Some(failure) => Err(failure),
        None => Ok(raw),
    }
}

#[async_trait]
impl TextSource for PdfTextSource {
    async fn fetch_text(&self, source_url: &str, dialect: Dialect) -> Result<RawText, TextFailure> {
        match self.decode(source_url).await {
            Ok(raw) => {
                let outcome = classify(raw);
                if let Err(ref failure) = outcome {
                    tracing::debug!("{} ({}): {}", source_url, dialect, failure);
                }
                outcome
            }
            Err(e) => {
                tracing::warn!("{}: could not read PDF: {}", source_url, e);
                Err(TextFailure::DeadLink(e.to_string()))
            }
        }
    }
}
