use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Languages accepted by the quiz's code-execution API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    C,
    Java,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported language: {0}")]
pub struct LanguageParseError(pub String);

impl Language {
    pub const ALL: [Language; 3] = [Language::Python, Language::C, Language::Java];

    pub fn parse(value: &str) -> Result<Self, LanguageParseError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "python" | "py" | "python3" => Ok(Self::Python),
            "c" => Ok(Self::C),
            "java" => Ok(Self::Java),
            _ => Err(LanguageParseError(value.to_string())),
        }
    }

    /// Infer the language from a source file's extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "py" => Some(Self::Python),
            "c" | "h" => Some(Self::C),
            "java" => Some(Self::Java),
            _ => None,
        }
    }

    /// Identifier sent over the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::C => "c",
            Self::Java => "java",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::C => "C",
            Self::Java => "Java",
        }
    }

    /// File name the execution sandbox stores the submission under.
    #[must_use]
    pub const fn source_filename(self) -> &'static str {
        match self {
            Self::Python => "main.py",
            Self::C => "main.c",
            Self::Java => "Main.java",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Language {
    type Err = LanguageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
