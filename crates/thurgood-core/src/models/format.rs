use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;
use validator::Validate;

use crate::error::ClientError;

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    #[default]
    Md,
    Json,
    Text,
}

impl FromStr for InputFormat {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "md" | "markdown" => Ok(InputFormat::Md),
            "json" => Ok(InputFormat::Json),
            "text" | "txt" => Ok(InputFormat::Text),
            _ => Err(ClientError::validation(format!(
                "Invalid input format: {} (expected md, json or text)",
                s
            ))),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Pdf,
    Docx,
    HtmlPreview,
}

impl OutputFormat {
    /// Binary formats come back as raw bytes, `html_preview` as text.
    pub fn is_binary(&self) -> bool {
        matches!(self, OutputFormat::Pdf | OutputFormat::Docx)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Docx => "docx",
            OutputFormat::HtmlPreview => "html",
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            OutputFormat::Pdf => write!(f, "pdf"),
            OutputFormat::Docx => write!(f, "docx"),
            OutputFormat::HtmlPreview => write!(f, "html_preview"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "docx" => Ok(OutputFormat::Docx),
            "html_preview" | "html" => Ok(OutputFormat::HtmlPreview),
            _ => Err(ClientError::validation(format!(
                "Invalid output format: {} (expected pdf, docx or html_preview)",
                s
            ))),
        }
    }
}

/// `POST /format/v1/document` body
#[derive(Debug, Clone, Serialize, Validate)]
pub struct FormatRequest {
    #[validate(length(min = 1, message = "Document content must not be empty"))]
    pub content: String,
    pub input_format: InputFormat,
    pub output_format: OutputFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormattedDocument {
    Text {
        html: String,
    },
    Binary {
        format: OutputFormat,
        #[serde(skip)]
        bytes: Vec<u8>,
        size_bytes: u64,
    },
    Saved {
        format: OutputFormat,
        path: PathBuf,
        size_bytes: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_binary_formats() {
        assert!(OutputFormat::Pdf.is_binary());
        assert!(OutputFormat::Docx.is_binary());
        assert!(!OutputFormat::HtmlPreview.is_binary());
        assert_eq!(OutputFormat::HtmlPreview.to_string(), "html_preview");
    }

    #[test]
    fn test_request_wire_shape() {
        let request = FormatRequest {
            content: "# Motion to Dismiss".to_string(),
            input_format: InputFormat::Md,
            output_format: OutputFormat::HtmlPreview,
            options: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "content": "# Motion to Dismiss",
                "input_format": "md",
                "output_format": "html_preview"
            })
        );
    }

    #[test]
    fn test_binary_document_serializes_size_only() {
        let doc = FormattedDocument::Binary {
            format: OutputFormat::Docx,
            bytes: vec![1, 2, 3],
            size_bytes: 3,
        };
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({ "kind": "binary", "format": "docx", "size_bytes": 3 })
        );
    }
}
