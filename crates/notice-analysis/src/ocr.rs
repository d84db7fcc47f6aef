//! Tesseract OCR for scanned notices.
//!
//! Pages are rendered to PNG with `pdftoppm` and each image is read with
//! `tesseract` on the command line.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use async_trait::async_trait;
use notice::config::Settings;
use notice::sources::{OcrSource, RawText, SourceError};
use reqwest::Client;
use tempfile::TempDir;

use crate::http::{build_client, download_pdf};
use crate::tools::{command_output, command_status};

#[derive(Debug, Clone)]
struct OcrCommands {
    pdftoppm: String,
    tesseract: String,
    language: String,
    dpi: u32,
}

pub struct TesseractOcr {
    client: Client,
    commands: OcrCommands,
}

impl TesseractOcr {
    pub fn new(client: Client, settings: &Settings) -> Self {
        Self {
            client,
            commands: OcrCommands {
                pdftoppm: settings.pdftoppm_path.clone(),
                tesseract: settings.tesseract_path.clone(),
                language: settings.ocr_language.clone(),
                dpi: settings.ocr_dpi,
            },
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, SourceError> {
        Ok(Self::new(build_client(settings)?, settings))
    }
}

impl OcrCommands {
    /// Render every page of `pdf` into `dir` as `page-NN.png`.
    fn render_pages(&self, pdf: &Path, dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
        let dpi = self.dpi.to_string();
        let status = Command::new(&self.pdftoppm)
            .args(["-png", "-r", &dpi])
            .arg(pdf)
            .arg(dir.join("page"))
            .status();
        command_status(status, &self.pdftoppm)?;

        let images = page_images(dir)?;
        if images.is_empty() {
            return Err(SourceError::Failed("pdftoppm produced no page images".to_string()));
        }
        Ok(images)
    }

    fn read_image(&self, image: &Path) -> Result<String, SourceError> {
        let output = Command::new(&self.tesseract)
            .arg(image)
            .arg("stdout")
            .args(["-l", &self.language])
            .output();
        command_output(output, &self.tesseract)
    }

    fn run(&self, pdf: &Path, dir: &Path) -> Result<RawText, SourceError> {
        let images = self.render_pages(pdf, dir)?;
        let mut pages = Vec::with_capacity(images.len());
        for image in &images {
            pages.push(self.read_image(image)?);
        }
        tracing::debug!("OCR read {} pages", pages.len());
        Ok(RawText::new(pages))
    }
}

/// Rendered page images in page order.
///
/// pdftoppm pads the page number to the width of the page count
/// (page-1.png, page-01.png, page-001.png), so sort numerically.
fn page_images(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let mut images: Vec<(u32, PathBuf)> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter_map(|path| {
            let stem = path.file_stem()?.to_str()?;
            let number = stem.strip_prefix("page-")?.parse().ok()?;
            (path.extension()? == "png").then_some((number, path))
        })
        .collect();
    images.sort_by_key(|(number, _)| *number);
    Ok(images.into_iter().map(|(_, path)| path).collect())
}

#[async_trait]
impl OcrSource for TesseractOcr {
    async fn ocr_text(&self, source_url: &str) -> Result<RawText, SourceError> {
        let temp = TempDir::new()?;
        let pdf = download_pdf(&self.client, source_url, temp.path()).await?;
        let commands = self.commands.clone();
        let dir = temp.path().to_path_buf();
        tokio::task::spawn_blocking(move || commands.run(&pdf, &dir))
            .await
            .map_err(|e| SourceError::Failed(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_images_sorted_numerically() {
        let temp = TempDir::new().unwrap();
        for name in ["page-10.png", "page-02.png", "page-01.png", "notice.pdf", "page-03.txt"] {
            fs::write(temp.path().join(name), b"x").unwrap();
        }
        let images = page_images(temp.path()).unwrap();
        let names: Vec<String> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["page-01.png", "page-02.png", "page-10.png"]);
    }

    #[test]
    fn test_empty_render_dir() {
        let temp = TempDir::new().unwrap();
        assert!(page_images(temp.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_renderer_is_tool_not_found() {
        let temp = TempDir::new().unwrap();
        let commands = OcrCommands {
            pdftoppm: "notice-test-binary-that-does-not-exist".to_string(),
            tesseract: "tesseract".to_string(),
            language: "eng".to_string(),
            dpi: 300,
        };
        let err = commands
            .run(&temp.path().join("notice.pdf"), temp.path())
            .unwrap_err();
        assert!(matches!(err, SourceError::ToolNotFound(_)));
    }
}
