//! Error types for the PDFMonkey client.
//!
//! # Design
//! Four failure classes reach callers: bad setup (`Configuration`), a round
//! trip that never completed (`Transport`), a response with the wrong status
//! (`UnexpectedStatus`), and a response with the right status but a body of
//! the wrong shape (`Decoding`). `UnexpectedStatus` carries the operation and
//! resource id so callers can decide on retries themselves; the client never
//! retries.

use std::fmt;

use thiserror::Error;

/// The remote operation an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetCurrentUser,
    ListDocuments,
    GetDocumentCard,
    GetDocument,
    CreateDocument,
    UpdateDocument,
    DeleteDocument,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetCurrentUser => "get current user",
            Operation::ListDocuments => "list documents",
            Operation::GetDocumentCard => "get document card",
            Operation::GetDocument => "get document",
            Operation::CreateDocument => "create document",
            Operation::UpdateDocument => "update document",
            Operation::DeleteDocument => "delete document",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by `PdfMonkeyClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The client could not be configured, e.g. no api key was resolved.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The HTTP exchange did not complete (DNS, refused connection, I/O).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The service answered with a status other than the operation's
    /// success status.
    #[error("failed to {operation}{}: unexpected status {status}", fmt_id(.id))]
    UnexpectedStatus {
        operation: Operation,
        id: Option<String>,
        status: u16,
    },

    /// The body of a successful response did not match the expected shape.
    #[error("failed to decode {operation} response: {source}")]
    Decoding {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },

    /// The request payload could not be serialized to JSON.
    #[error("failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl ApiError {
    /// Wrap any transport-level failure.
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        ApiError::Transport(err.into())
    }

    /// The observed HTTP status, for `UnexpectedStatus` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

fn fmt_id(id: &Option<String>) -> String {
    match id {
        Some(id) => format!(" with ID {id}"),
        None => String::new(),
    }
}
