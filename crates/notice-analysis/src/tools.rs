//! External command helpers.

use std::path::PathBuf;
use std::process::{ExitStatus, Output};

use notice::config::Settings;
use notice::sources::SourceError;

/// Where a required binary was found, if anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub name: &'static str,
    /// Configured command name or path.
    pub command: String,
    pub path: Option<PathBuf>,
    pub hint: &'static str,
}

impl ToolStatus {
    pub fn is_available(&self) -> bool {
        self.path.is_some()
    }
}

/// Look up every binary the collaborators shell out to.
pub fn check_tools(settings: &Settings) -> Vec<ToolStatus> {
    [
        ("pdftotext", &settings.pdftotext_path, "install poppler-utils"),
        ("pdftoppm", &settings.pdftoppm_path, "install poppler-utils"),
        ("tesseract", &settings.tesseract_path, "install tesseract-ocr"),
    ]
    .into_iter()
    .map(|(name, command, hint)| ToolStatus {
        name,
        command: command.clone(),
        path: which::which(command).ok(),
        hint,
    })
    .collect()
}

/// Stdout of a finished command, or the matching error.
pub(crate) fn command_output(
    result: std::io::Result<Output>,
    tool: &str,
) -> Result<String, SourceError> {
    match result {
        Ok(output) if output.status.success() => {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        }
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(SourceError::Failed(format!("{} failed: {}", tool, stderr.trim())))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SourceError::ToolNotFound(tool.to_string()))
        }
        Err(e) => Err(SourceError::Io(e)),
    }
}

pub(crate) fn command_status(
    result: std::io::Result<ExitStatus>,
    tool: &str,
) -> Result<(), SourceError> {
    match result {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(SourceError::Failed(format!("{} exited with {}", tool, status))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SourceError::ToolNotFound(tool.to_string()))
        }
        Err(e) => Err(SourceError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn test_missing_binary_is_tool_not_found() {
        let result = Command::new("notice-test-binary-that-does-not-exist").output();
        let err = command_output(result, "notice-test-binary-that-does-not-exist").unwrap_err();
        assert!(matches!(err, SourceError::ToolNotFound(_)));
    }

    #[test]
    fn test_check_tools_reports_configured_commands() {
        let settings = Settings {
            tesseract_path: "notice-test-binary-that-does-not-exist".to_string(),
            ..Settings::default()
        };
        let tools = check_tools(&settings);
        let names: Vec<&str> = tools.iter().map(|t| t.name).collect();
        assert_eq!(names, ["pdftotext", "pdftoppm", "tesseract"]);
        assert!(!tools[2].is_available());
    }
}
