//! Application settings.
//!
//! Loaded from an optional TOML file, then overridden by `NOTICE_*`
//! environment variables (a `.env` file is honoured by the binary).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILENAME: &str = "notice.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Documents processed concurrently by the batch runner.
    pub concurrency: usize,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// User agent for HTTP requests.
    pub user_agent: String,
    pub pdftotext_path: String,
    pub pdftoppm_path: String,
    pub tesseract_path: String,
    /// Tesseract language code.
    pub ocr_language: String,
    /// Render resolution for OCR page images.
    pub ocr_dpi: u32,
    /// Maximum length of the trimmed text field, in characters.
    pub trimmed_text_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            concurrency: 4,
            request_timeout_secs: 30,
            user_agent: "notice/0.4 (public notice research)".to_string(),
            pdftotext_path: "pdftotext".to_string(),
            pdftoppm_path: "pdftoppm".to_string(),
            tesseract_path: "tesseract".to_string(),
            ocr_language: "eng".to_string(),
            ocr_dpi: 300,
            trimmed_text_limit: 5000,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from [`DEFAULT_CONFIG_FILENAME`] when it
    /// exists, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILENAME);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply `NOTICE_*` overrides using `lookup` to read variables.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = lookup("NOTICE_CONCURRENCY") {
            self.concurrency = parse_env("NOTICE_CONCURRENCY", val)?;
        }
        if let Some(val) = lookup("NOTICE_REQUEST_TIMEOUT") {
            self.request_timeout_secs = parse_env("NOTICE_REQUEST_TIMEOUT", val)?;
        }
        if let Some(val) = lookup("NOTICE_USER_AGENT") {
            self.user_agent = val;
        }
        if let Some(val) = lookup("NOTICE_PDFTOTEXT") {
            self.pdftotext_path = val;
        }
        if let Some(val) = lookup("NOTICE_PDFTOPPM") {
            self.pdftoppm_path = val;
        }
        if let Some(val) = lookup("NOTICE_TESSERACT") {
            self.tesseract_path = val;
        }
        if let Some(val) = lookup("NOTICE_OCR_LANGUAGE") {
            self.ocr_language = val;
        }
        if let Some(val) = lookup("NOTICE_OCR_DPI") {
            self.ocr_dpi = parse_env("NOTICE_OCR_DPI", val)?;
        }
        if let Some(val) = lookup("NOTICE_TRIMMED_TEXT_LIMIT") {
            self.trimmed_text_limit = parse_env("NOTICE_TRIMMED_TEXT_LIMIT", val)?;
        }
        if self.concurrency == 0 {
            self.concurrency = 1;
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml("concurrency = 8\nocr_language = \"spa\"").unwrap();
        assert_eq!(settings.concurrency, 8);
        assert_eq!(settings.ocr_language, "spa");
        assert_eq!(settings.trimmed_text_limit, 5000);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("NOTICE_CONCURRENCY", "2"),
            ("NOTICE_TESSERACT", "/opt/tesseract/bin/tesseract"),
        ]
        .into_iter()
        .collect();
        let mut settings = Settings::default();
        settings
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(settings.concurrency, 2);
        assert_eq!(settings.tesseract_path, "/opt/tesseract/bin/tesseract");
    }

    #[test]
    fn test_invalid_env_value() {
        let mut settings = Settings::default();
        let err = settings
            .apply_env(|key| (key == "NOTICE_OCR_DPI").then(|| "high".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { key: "NOTICE_OCR_DPI", .. }));
    }

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notice.toml");
        std::fs::write(&path, "request_timeout_secs = 5\n").unwrap();
        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.request_timeout_secs, 5);

        std::fs::write(&path, "request_timeout_secs = \"soon\"\n").unwrap();
        assert!(matches!(
            Settings::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
