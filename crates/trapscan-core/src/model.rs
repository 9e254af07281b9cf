use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::UploadError;

/// File types the analysis service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcceptedType {
    Pdf,
    Docx,
}

impl AcceptedType {
    pub const ALL: [AcceptedType; 2] = [AcceptedType::Pdf, AcceptedType::Docx];

    /// Match a lowercased extension against the accepted set.
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.extension() == extension)
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// A file handed to the controller by the intake surface.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    /// Lowercased text after the final `.`; empty when the name has none.
    pub extension: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let extension = extension_of(&name);
        Self {
            name,
            extension,
            bytes,
        }
    }

    /// Check the extension against the accepted set.
    pub fn accepted_type(&self) -> Result<AcceptedType, UploadError> {
        AcceptedType::from_extension(&self.extension).ok_or_else(|| {
            UploadError::UnsupportedFileType {
                extension: self.extension.clone(),
            }
        })
    }
}

impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("extension", &self.extension)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn extension_of(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

/// A validated submission. Built once per submit and never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub file: UploadedFile,
    pub kind: AcceptedType,
}

/// Overall severity reported by the service.
///
/// `Unknown` covers any verdict string this client does not recognise and
/// sorts below `Clean`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Unknown,
    Clean,
    Low,
    Medium,
    High,
}

impl Verdict {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "clean" => Self::Clean,
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Clean => "clean",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// The closed set of hidden-content techniques the service reports.
///
/// Declaration order is presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    WhiteText,
    InvisibleChars,
    SmallText,
    HiddenText,
    HiddenLayers,
}

impl FindingCategory {
    pub const ALL: [FindingCategory; 5] = [
        FindingCategory::WhiteText,
        FindingCategory::InvisibleChars,
        FindingCategory::SmallText,
        FindingCategory::HiddenText,
        FindingCategory::HiddenLayers,
    ];

    /// Payload key carrying this category's findings.
    pub fn key(self) -> &'static str {
        match self {
            Self::WhiteText => "white_text",
            Self::InvisibleChars => "invisible_chars",
            Self::SmallText => "small_text",
            Self::HiddenText => "hidden_text",
            Self::HiddenLayers => "hidden_layers",
        }
    }
}

/// One detected occurrence. Every field is optional on the wire.
///
/// Fields the service populates per category:
/// * `white_text`: `page` or `paragraph`, `text`, `color`, `font_size`, `char_count` (PDF).
/// * `invisible_chars`: `page`, `paragraph` or `location`, `char_code`, `char_name`, `context`.
/// * `small_text`: `page` or `paragraph`, `text`, `font_size`.
/// * `hidden_text`: `paragraph`, `text`, `property`.
/// * `hidden_layers`: `page`, `text`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Finding {
    pub page: Option<u32>,
    pub paragraph: Option<u32>,
    pub location: Option<String>,
    pub char_count: Option<u64>,
    pub text: Option<String>,
    pub context: Option<String>,
    pub char_code: Option<String>,
    pub char_name: Option<String>,
    pub color: Option<String>,
    #[serde(rename = "font_size")]
    pub font_size_pt: Option<f64>,
    pub property: Option<String>,
}

/// A decoded, successful analysis. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub verdict: Verdict,
    pub filename: String,
    pub file_type: String,
    /// Categories the payload carried; absent keys have no entry.
    pub findings: BTreeMap<FindingCategory, Vec<Finding>>,
    pub verdict_message: Option<String>,
    pub suspicious_score: Option<i64>,
    pub total_pages: Option<u64>,
    pub total_paragraphs: Option<u64>,
}

impl AnalysisResult {
    pub fn new(verdict: Verdict, filename: impl Into<String>, file_type: impl Into<String>) -> Self {
        Self {
            verdict,
            filename: filename.into(),
            file_type: file_type.into(),
            findings: BTreeMap::new(),
            verdict_message: None,
            suspicious_score: None,
            total_pages: None,
            total_paragraphs: None,
        }
    }

    pub fn with_findings(mut self, category: FindingCategory, findings: Vec<Finding>) -> Self {
        self.findings.insert(category, findings);
        self
    }

    pub fn findings_for(&self, category: FindingCategory) -> Option<&[Finding]> {
        self.findings.get(&category).map(Vec::as_slice)
    }
}
