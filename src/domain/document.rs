//! Document records and their wire representation.
//!
//! A `Document` is serialized as JSON inside a `SubmissionRequest` envelope:
//!
//! ```text
//! {"document": {...}, "crypt": "<signature>"}
//! ```
//!
//! Dates use the ISO local date format (`2024-01-31`). Absent dates are
//! written as `null` rather than being left out.

use crate::domain::submission::SubmissionError;
use chrono::NaiveDate;
use serde::Serialize;

/// Document description block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Description {
    pub participant_inn: String,
}

impl Description {
    pub fn new(participant_inn: impl Into<String>) -> Self {
        Self {
            participant_inn: participant_inn.into(),
        }
    }
}

/// A single product line of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Product {
    pub certificate_document: String,
    pub certificate_document_date: Option<NaiveDate>,
    pub certificate_document_number: String,
    pub owner_inn: String,
    pub production_date: Option<NaiveDate>,
    pub tnved_code: String,
    pub uit_code: String,
    pub uitu_code: String,
}

/// A document to be submitted.
///
/// All fields are public; use struct update syntax with `Default` to fill
/// only what you need:
///
/// ```
/// use submit_throttle::{Description, Document};
///
/// let document = Document {
///     description: Description::new("7700000000"),
///     doc_id: "doc-1".to_string(),
///     ..Default::default()
/// };
/// assert!(document.products.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub description: Description,
    pub doc_id: String,
    pub doc_status: String,
    pub doc_type: String,
    pub import_request: bool,
    pub owner_inn: String,
    pub participant_inn: String,
    pub producer_inn: String,
    pub production_date: Option<NaiveDate>,
    pub production_type: String,
    pub products: Vec<Product>,
    pub reg_date: Option<NaiveDate>,
    pub reg_number: String,
}

/// A signed document, ready to be encoded for the remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionRequest {
    document: Document,
    crypt: String,
}

impl SubmissionRequest {
    /// Pair a document with its signature.
    pub fn new(document: Document, signature: impl Into<String>) -> Self {
        Self {
            document,
            crypt: signature.into(),
        }
    }

    /// The wrapped document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The signature sent alongside the document.
    pub fn signature(&self) -> &str {
        &self.crypt
    }

    /// Encode the request as a JSON body.
    ///
    /// # Errors
    /// Returns `SubmissionError::Serialization` if the document cannot be
    /// written as JSON.
    pub fn encode(&self) -> Result<Vec<u8>, SubmissionError> {
        serde_json::to_vec(self).map_err(|e| SubmissionError::Serialization(e.to_string()))
    }
}
