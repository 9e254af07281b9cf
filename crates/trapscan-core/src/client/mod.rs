use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::TransportError;
use crate::model::{AnalysisRequest, AnalysisResult, Finding, FindingCategory, Verdict};

pub mod http;

pub use http::{Endpoint, HttpAnalysisClient};

/// What the service said about a submitted file.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResponse {
    Completed(AnalysisResult),
    /// The service answered but reported an `error` field.
    Rejected { message: String },
}

/// Network contract with the remote scanner. One attempt per call, no retries.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(&self, request: AnalysisRequest)
        -> Result<AnalysisResponse, TransportError>;
}

/// Top-level payload. Only `verdict`, `filename` and `file_type` are decoded
/// strictly; everything else is taken field by field and a value of the wrong
/// type is dropped with a warning.
#[derive(Debug, Deserialize)]
struct WirePayload {
    verdict: Option<String>,
    filename: Option<String>,
    file_type: Option<String>,
    verdict_message: Option<Value>,
    suspicious_score: Option<Value>,
    total_pages: Option<Value>,
    total_paragraphs: Option<Value>,
    white_text: Option<Value>,
    invisible_chars: Option<Value>,
    small_text: Option<Value>,
    hidden_text: Option<Value>,
    hidden_layers: Option<Value>,
}

/// Decode a raw HTTP response into an [`AnalysisResponse`].
///
/// A non-blank `error` key wins over everything else in a 2xx body; an empty
/// or whitespace-only `error` counts as absent. Missing `verdict`, `filename`
/// or `file_type` is a malformed response.
pub fn decode_response(status: u16, body: &[u8]) -> Result<AnalysisResponse, TransportError> {
    if !(200..300).contains(&status) {
        tracing::debug!(
            status,
            body = %String::from_utf8_lossy(body),
            "analysis service returned non-success status"
        );
        return Err(TransportError::Status { status });
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|err| TransportError::Malformed(format!("body is not JSON: {err}")))?;
    let Value::Object(map) = &value else {
        return Err(TransportError::Malformed(
            "expected a JSON object at the top level".into(),
        ));
    };

    match map.get("error") {
        None | Some(Value::Null) => {}
        Some(Value::String(message)) if message.trim().is_empty() => {
            tracing::debug!("ignoring blank error field");
        }
        Some(Value::String(message)) => {
            return Ok(AnalysisResponse::Rejected {
                message: message.clone(),
            })
        }
        Some(other) => {
            return Ok(AnalysisResponse::Rejected {
                message: other.to_string(),
            })
        }
    }

    let wire: WirePayload = serde_json::from_value(value)
        .map_err(|err| TransportError::Malformed(err.to_string()))?;
    wire.into_result().map(AnalysisResponse::Completed)
}

impl WirePayload {
    fn into_result(self) -> Result<AnalysisResult, TransportError> {
        let verdict = require(self.verdict, "verdict")?;
        let filename = require(self.filename, "filename")?;
        let file_type = require(self.file_type, "file_type")?;

        let verdict = Verdict::from_wire(&verdict);
        if verdict == Verdict::Unknown {
            tracing::warn!("analysis service returned an unrecognized verdict");
        }

        let mut result = AnalysisResult::new(verdict, filename, file_type);
        result.verdict_message = optional(self.verdict_message, "verdict_message");
        result.suspicious_score = optional(self.suspicious_score, "suspicious_score");
        result.total_pages = optional(self.total_pages, "total_pages");
        result.total_paragraphs = optional(self.total_paragraphs, "total_paragraphs");

        let categories = [
            (FindingCategory::WhiteText, self.white_text),
            (FindingCategory::InvisibleChars, self.invisible_chars),
            (FindingCategory::SmallText, self.small_text),
            (FindingCategory::HiddenText, self.hidden_text),
            (FindingCategory::HiddenLayers, self.hidden_layers),
        ];
        for (category, entries) in categories {
            match entries {
                None | Some(Value::Null) => {}
                Some(Value::Array(entries)) => {
                    let findings = entries
                        .into_iter()
                        .enumerate()
                        .filter_map(|(index, entry)| decode_finding(category, index, entry))
                        .collect();
                    result.findings.insert(category, findings);
                }
                Some(_) => {
                    tracing::warn!(
                        category = category.key(),
                        "ignoring findings list that is not an array"
                    );
                }
            }
        }
        Ok(result)
    }
}

fn require(value: Option<String>, field: &str) -> Result<String, TransportError> {
    value.ok_or_else(|| TransportError::Malformed(format!("missing required field `{field}`")))
}

/// Decode an optional top-level value, dropping it when the type is wrong.
fn optional<T: DeserializeOwned>(value: Option<Value>, field: &str) -> Option<T> {
    match serde_json::from_value(value?) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(field, error = %err, "ignoring mistyped payload field");
            None
        }
    }
}

/// Decode one finding field by field. A mistyped field becomes `None`; an
/// entry that is not an object is skipped.
fn decode_finding(category: FindingCategory, index: usize, entry: Value) -> Option<Finding> {
    let Value::Object(fields) = entry else {
        tracing::warn!(
            category = category.key(),
            index,
            "skipping finding that is not an object"
        );
        return None;
    };

    let mut finding = Finding::default();
    for (key, value) in fields {
        let accepted = match key.as_str() {
            "page" => assign(value, &mut finding.page),
            "paragraph" => assign(value, &mut finding.paragraph),
            "location" => assign(value, &mut finding.location),
            "char_count" => assign(value, &mut finding.char_count),
            "text" => assign(value, &mut finding.text),
            "context" => assign(value, &mut finding.context),
            "char_code" => assign(value, &mut finding.char_code),
            "char_name" => assign(value, &mut finding.char_name),
            "color" => assign(value, &mut finding.color),
            "font_size" => assign(value, &mut finding.font_size_pt),
            "property" => assign(value, &mut finding.property),
            _ => true,
        };
        if !accepted {
            tracing::warn!(
                category = category.key(),
                index,
                field = %key,
                "ignoring mistyped finding field"
            );
        }
    }
    Some(finding)
}

fn assign<T: DeserializeOwned>(value: Value, slot: &mut Option<T>) -> bool {
    match serde_json::from_value(value) {
        Ok(parsed) => {
            *slot = parsed;
            true
        }
        Err(_) => false,
    }
}
