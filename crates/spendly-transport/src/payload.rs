//! Request and response payloads for the Spendly backend.

use serde::{Deserialize, Serialize};
use spendly_core::Result;
use spendly_core::chat::{ChatEntry, Intent, LoanDetails, SpendingBreakdown};
use std::collections::HashMap;
use std::path::Path;

/// A document selected by the user for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Original file name, forwarded as the multipart file name.
    pub file_name: String,
    /// Raw file contents.
    pub contents: Vec<u8>,
}

impl FileUpload {
    /// Creates an upload from in-memory contents.
    pub fn new(file_name: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            contents,
        }
    }

    /// Reads a document from disk, using the final path component as the
    /// file name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub async fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let contents = tokio::fs::read(path).await?;
        Ok(Self {
            file_name,
            contents,
        })
    }
}

/// Fields transmitted with one `/chat` request.
///
/// Unset optional fields are omitted from the form entirely; they are never
/// sent as null or empty strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessagePayload {
    /// Session identifier correlating turns on the backend.
    pub session_id: String,
    /// The user's message text, already trimmed.
    pub message: String,
    /// The advisory intent selected for this turn.
    pub intent: Intent,
    /// Server-assigned reference of the most recent upload, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    /// CIBIL score; loan turns only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cibil_score: Option<u32>,
    /// Monthly income; loan turns only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<f64>,
    /// Existing EMI total; loan turns only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_emi: Option<f64>,
}

impl MessagePayload {
    /// Creates a payload with the required fields; optional fields unset.
    pub fn new(session_id: impl Into<String>, message: impl Into<String>, intent: Intent) -> Self {
        Self {
            session_id: session_id.into(),
            message: message.into(),
            intent,
            file_path: None,
            cibil_score: None,
            monthly_income: None,
            existing_emi: None,
        }
    }

    /// Attaches the uploaded file reference.
    pub fn with_file_path(mut self, file_path: Option<String>) -> Self {
        self.file_path = file_path;
        self
    }

    /// Copies in the loan fields that are currently set.
    pub fn with_loan_details(mut self, details: &LoanDetails) -> Self {
        self.cibil_score = details.cibil_score;
        self.monthly_income = details.monthly_income;
        self.existing_emi = details.existing_emi;
        self
    }

    /// The ordered `(name, value)` form fields actually transmitted.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("session_id", self.session_id.clone()),
            ("message", self.message.clone()),
            ("intent", self.intent.as_str().to_string()),
        ];
        if let Some(file_path) = &self.file_path {
            fields.push(("file_path", file_path.clone()));
        }
        if let Some(score) = self.cibil_score {
            fields.push(("cibil_score", score.to_string()));
        }
        if let Some(income) = self.monthly_income {
            fields.push(("monthly_income", income.to_string()));
        }
        if let Some(emi) = self.existing_emi {
            fields.push(("existing_emi", emi.to_string()));
        }
        fields
    }
}

/// Server reply to a successful upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    /// Server-generated identifier of the stored document.
    #[serde(default)]
    pub file_id: String,
    /// Original file name as received by the backend.
    #[serde(default)]
    pub filename: String,
    /// Server-side reference the controller attaches to subsequent turns.
    pub path: String,
}

/// Server reply to a `/chat` request.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Echo of the session identifier.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Trailing window of the server-side conversation ledger. The
    /// controller keeps its own ledger and does not consume this.
    #[serde(default)]
    pub messages: Vec<ChatEntry>,
    /// The assistant reply to reveal.
    #[serde(default)]
    pub summary: Option<String>,
    /// Intent-specific result structure.
    #[serde(default)]
    pub data: Option<ChatData>,
}

/// Intent-specific result structure attached to a reply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatData {
    /// Category share of monthly spend, in percent. Spending-plan replies
    /// only; other intents leave this absent.
    #[serde(default)]
    pub category_percent: Option<SpendingBreakdown>,
    /// Remaining intent-specific keys (e.g. `max_emi`, `follow_up_question`),
    /// preserved for hosting shells.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}
