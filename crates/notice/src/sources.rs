//! Text collaborators consumed by the record assembler.
//!
//! Decoding PDFs, running OCR and scraping webpages happen behind these
//! traits. The assembler only interprets what they return to pick a
//! fallback path.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;

use crate::models::{Dialect, Document};
use crate::utils::{compile, spaced};

/// Canonical marker every complete notice carries on its first page.
static PUBLIC_NOTICE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| compile(&spaced("PUBLIC NOTICE")));

/// Text of a document, one entry per page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawText {
    pub pages: Vec<String>,
}

impl RawText {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    /// Split text on form feeds, the page separator `pdftotext` emits.
    pub fn from_form_feeds(text: &str) -> Self {
        let mut pages: Vec<String> = text.split('\u{0c}').map(str::to_string).collect();
        while pages.last().is_some_and(|p| p.trim().is_empty()) && pages.len() > 1 {
            pages.pop();
        }
        Self { pages }
    }

    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|p| p.trim().is_empty())
    }
}

/// Why the primary binary text could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextFailure {
    /// Page one has no extractable text; the document needs OCR.
    #[error("scanned document")]
    Scanned,
    /// Page one lacks the public-notice marker, so the binary is an
    /// attachment rather than the notice itself.
    #[error("attachment only")]
    AttachmentOnly,
    /// The request or decode step failed.
    #[error("dead link: {0}")]
    DeadLink(String),
}

impl TextFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scanned => "scanned",
            Self::AttachmentOnly => "attachment_only",
            Self::DeadLink(_) => "dead_link",
        }
    }
}

/// Errors from OCR and webpage collaborators.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Extraction failed: {0}")]
    Failed(String),

    #[error("No text produced")]
    Empty,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Classify the first page of a decoded document.
pub fn classify_first_page(page: &str) -> Option<TextFailure> {
    if page.trim().is_empty() {
        Some(TextFailure::Scanned)
    } else if !PUBLIC_NOTICE_MARKER.is_match(page) {
        Some(TextFailure::AttachmentOnly)
    } else {
        None
    }
}

/// Primary text source: decodes the binary behind `source_url`.
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn fetch_text(&self, source_url: &str, dialect: Dialect) -> Result<RawText, TextFailure>;
}

/// OCR for documents classified as scanned.
#[async_trait]
pub trait OcrSource: Send + Sync {
    async fn ocr_text(&self, source_url: &str) -> Result<RawText, SourceError>;
}

/// Webpage body used when the binary is missing or unusable.
#[async_trait]
pub trait FallbackTextSource: Send + Sync {
    async fn fetch_fallback_text(&self, document: &Document) -> Result<String, SourceError>;
}
