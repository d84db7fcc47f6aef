//! Webpage fallback: the article body of the notice page.

use std::sync::LazyLock;

use async_trait::async_trait;
use notice::config::Settings;
use notice::models::Document;
use notice::sources::{FallbackTextSource, SourceError};
use reqwest::Client;
use scraper::{Html, Selector};

use crate::http::{build_client, fetch_bytes};

static ARTICLE_BODY: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div[itemprop="articleBody"]"#).expect("article body selector")
});

pub struct WebpageTextSource {
    client: Client,
}

impl WebpageTextSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, SourceError> {
        Ok(Self::new(build_client(settings)?))
    }
}

/// Text of every `articleBody` block, without non-breaking spaces or
/// newlines.
pub fn article_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let blocks: Vec<String> = document
        .select(&ARTICLE_BODY)
        .map(|element| element.text().collect::<Vec<_>>().join(" "))
        .collect();
    let text = clean_body(&blocks.join(" "));
    (!text.is_empty()).then_some(text)
}

fn clean_body(text: &str) -> String {
    text.replace(['\u{a0}', '\n', '\r'], " ").trim().to_string()
}

#[async_trait]
impl FallbackTextSource for WebpageTextSource {
    async fn fetch_fallback_text(&self, document: &Document) -> Result<String, SourceError> {
        if let Some(web_text) = document.web_text.as_deref() {
            let text = clean_body(web_text);
            if !text.is_empty() {
                return Ok(text);
            }
        }
        tracing::debug!("{}: fetching notice page {}", document.id, document.url);
        let body = fetch_bytes(&self.client, &document.url).await?;
        article_text(&String::from_utf8_lossy(&body)).ok_or(SourceError::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_body_text() {
        let html = r#"<html><body>
            <div class="nav">Menu</div>
            <div itemprop="articleBody"><p>SPECIAL&nbsp;PUBLIC NOTICE</p>
            <p>Regional general permit</p></div>
        </body></html>"#;
        let text = article_text(html).unwrap();
        assert!(text.starts_with("SPECIAL PUBLIC NOTICE"));
        assert!(text.contains("Regional general permit"));
        assert!(!text.contains("Menu"));
        assert!(!text.contains('\n'));
    }

    #[test]
    fn test_missing_article_body() {
        assert_eq!(article_text("<html><body><p>nothing</p></body></html>"), None);
    }

    #[tokio::test]
    async fn test_prescraped_text_used_without_request() {
        let source = WebpageTextSource::from_settings(&Settings::default()).unwrap();
        let document = Document::new("not a url").with_web_text("APPLICANT:\u{a0}Acme\nLLC");
        let text = source.fetch_fallback_text(&document).await.unwrap();
        assert_eq!(text, "APPLICANT: Acme LLC");
    }

    #[tokio::test]
    async fn test_blank_prescraped_text_fetches_page() {
        let source = WebpageTextSource::from_settings(&Settings::default()).unwrap();
        let document = Document::new("not a url").with_web_text("  \n ");
        assert!(source.fetch_fallback_text(&document).await.is_err());
    }
}
