//! Public notice documents as handed over by upstream discovery.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::Dialect;

/// One regulatory notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique identifier. Derived from the URLs when left empty.
    #[serde(default)]
    pub id: String,
    /// Webpage the notice was published on.
    pub url: String,
    /// Binary text source (usually a PDF).
    #[serde(default)]
    pub pdf_url: Option<String>,
    /// Display title of the notice.
    #[serde(default)]
    pub title: Option<String>,
    /// Article body already scraped from the webpage, if any.
    #[serde(default)]
    pub web_text: Option<String>,
    /// Explicit dialect, bypassing URL resolution.
    #[serde(default)]
    pub dialect: Option<Dialect>,
}

impl Document {
    pub fn new(url: impl Into<String>) -> Self {
        let mut doc = Self {
            id: String::new(),
            url: url.into(),
            pdf_url: None,
            title: None,
            web_text: None,
            dialect: None,
        };
        doc.ensure_id();
        doc
    }

    pub fn with_pdf_url(mut self, pdf_url: impl Into<String>) -> Self {
        self.pdf_url = Some(pdf_url.into());
        self.id.clear();
        self.ensure_id();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_web_text(mut self, web_text: impl Into<String>) -> Self {
        self.web_text = Some(web_text.into());
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Fill in a content-derived identifier if none was supplied.
    pub fn ensure_id(&mut self) {
        if !self.id.is_empty() {
            return;
        }
        let mut hasher = Sha256::new();
        hasher.update(self.url.as_bytes());
        if let Some(ref pdf_url) = self.pdf_url {
            hasher.update(b"\n");
            hasher.update(pdf_url.as_bytes());
        }
        let digest = format!("{:x}", hasher.finalize());
        self.id = format!("notice-{}", &digest[..16]);
    }

    /// Dialect for this notice: the explicit tag, else the district marker
    /// in the binary-text URL, then the page URL.
    pub fn resolved_dialect(&self) -> Dialect {
        if let Some(dialect) = self.dialect {
            return dialect;
        }
        let urls = self.pdf_url.iter().map(String::as_str).chain([self.url.as_str()]);
        Dialect::resolve_or_default(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_stable() {
        let a = Document::new("https://www.mvn.usace.army.mil/notice/1")
            .with_pdf_url("https://www.mvn.usace.army.mil/notice/1.pdf");
        let b = Document::new("https://www.mvn.usace.army.mil/notice/1")
            .with_pdf_url("https://www.mvn.usace.army.mil/notice/1.pdf");
        assert_eq!(a.id, b.id);
        assert!(a.id.starts_with("notice-"));
        assert_ne!(a.id, Document::new("https://www.mvn.usace.army.mil/notice/1").id);
    }

    #[test]
    fn test_explicit_id_kept() {
        let mut doc: Document =
            serde_json::from_str(r#"{"id": "N-1", "url": "https://example.gov"}"#).unwrap();
        doc.ensure_id();
        assert_eq!(doc.id, "N-1");
    }

    #[test]
    fn test_resolved_dialect_prefers_pdf_url() {
        let doc = Document::new("https://www.sam.usace.army.mil/Media/Public-Notices/")
            .with_pdf_url("https://www.swg.usace.army.mil/Portals/notice.pdf");
        assert_eq!(doc.resolved_dialect(), Dialect::Swg);

        let doc = Document::new("https://www.sam.usace.army.mil/Media/Public-Notices/")
            .with_pdf_url("https://usace.contentdm.oclc.org/x/download");
        assert_eq!(doc.resolved_dialect(), Dialect::Sam);

        let doc = Document::new("https://example.gov").with_dialect(Dialect::Mvn);
        assert_eq!(doc.resolved_dialect(), Dialect::Mvn);
    }
}
