//! Synchronous client for the PDFMonkey document-generation API.
//!
//! # Overview
//! `PdfMonkeyClient` turns each API operation into one blocking HTTP round
//! trip: build an `HttpRequest`, hand it to a `Transport`, parse the
//! `HttpResponse` into typed results.
//!
//! # Design
//! - Configuration (`ClientConfig`) is resolved once, from builder settings
//!   and then `PDFMONKEY_*` environment variables, and never changes.
//! - The transport is an owned, injectable dependency; `UreqTransport` is the
//!   default.
//! - `build_*` / `parse_*` methods are public so the protocol can be driven
//!   without the bundled transport.
//! - Every non-success status becomes `ApiError::UnexpectedStatus`; nothing is
//!   retried.
//!
//! ```no_run
//! use pdfmonkey::{ClientConfig, Document, PdfMonkeyClient};
//!
//! let config = ClientConfig::builder().api_key("sk_live_...").build()?;
//! let client = PdfMonkeyClient::new(config);
//! let doc = client.create_document(&Document::from_template(
//!     "template-id",
//!     &serde_json::json!({"name": "Ada"}),
//! ))?;
//! println!("{:?}", doc.status);
//! # Ok::<(), pdfmonkey::ApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use client::PdfMonkeyClient;
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_ENDPOINT};
pub use error::{ApiError, Operation};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::{CurrentUser, Document, DocumentCard, DocumentQuery, GenerationLog, ListDocumentsInput, Page};
