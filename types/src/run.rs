//! Payloads for the quiz's live "run code" endpoint.

use serde::{Deserialize, Serialize};

use crate::Language;

/// Request body for `POST /api/run-code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunRequest {
    pub code: String,
    pub language: Language,
    pub stdin: String,
}

impl RunRequest {
    #[must_use]
    pub fn new(language: Language, code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language,
            stdin: String::new(),
        }
    }

    #[must_use]
    pub fn with_stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = stdin.into();
        self
    }
}

/// Output streams of the run stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RunStage {
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
}

/// Response body of `POST /api/run-code`.
///
/// The server proxies the execution service and adds `success`; on failure
/// only `error` is set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RunResponse {
    #[serde(default)]
    pub success: bool,
    pub error: Option<String>,
    pub run: Option<RunStage>,
    pub execution_time: Option<f64>,
}

impl RunResponse {
    /// Text shown in the output panel.
    #[must_use]
    pub fn display_text(&self) -> String {
        if !self.success {
            let error = self.error.as_deref().unwrap_or("unknown error");
            return format!("Error: {error}");
        }
        let stage = self.run.clone().unwrap_or_default();
        if !stage.stderr.is_empty() {
            return format!("Error:\n{}", stage.stderr);
        }
        if stage.stdout.is_empty() {
            "No output".to_string()
        } else {
            stage.stdout
        }
    }

    #[must_use]
    pub fn stdout(&self) -> &str {
        self.run.as_ref().map_or("", |stage| stage.stdout.as_str())
    }

    #[must_use]
    pub fn stderr(&self) -> &str {
        self.run.as_ref().map_or("", |stage| stage.stderr.as_str())
    }

    /// Judge the run against a test case's expected output.
    ///
    /// Trailing and leading whitespace is ignored on both sides; any stderr
    /// output fails the case.
    #[must_use]
    pub fn verdict(&self, expected: &str) -> TestVerdict {
        if !self.success {
            return TestVerdict::Failed {
                reason: self.error.clone().unwrap_or_else(|| "unknown error".to_string()),
            };
        }
        let actual = self.stdout().trim();
        let stderr = self.stderr();
        if !stderr.is_empty() {
            return TestVerdict::Failed {
                reason: stderr.to_string(),
            };
        }
        if actual == expected.trim() {
            TestVerdict::Passed
        } else {
            TestVerdict::Failed {
                reason: format!("expected {:?}, got {:?}", expected.trim(), actual),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestVerdict {
    Passed,
    Failed { reason: String },
}

impl TestVerdict {
    #[must_use]
    pub fn passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}
