//! Request builder, response parser and executor for the PDFMonkey API.
//!
//! # Design
//! Each operation is split three ways: `build_*` produces an `HttpRequest`,
//! `parse_*` consumes an `HttpResponse`, and the plain method (e.g.
//! `get_document`) runs build, the owned `Transport`, and parse in one
//! blocking round trip. `build_*` and `parse_*` stay public so callers
//! with their own I/O can drive the protocol themselves.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ApiError, Operation};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::types::{
    CurrentUser, CurrentUserEnvelope, Document, DocumentCard, DocumentCardEnvelope, DocumentEnvelope,
    DocumentListEnvelope, ListDocumentsInput,
};

/// Synchronous client for the PDFMonkey API.
///
/// Holds only immutable configuration and its transport, so one instance can
/// be shared across threads when the transport is `Sync`.
#[derive(Debug, Clone)]
pub struct PdfMonkeyClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl PdfMonkeyClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }

    /// Client configured from `PDFMONKEY_API_KEY` / `PDFMONKEY_API_ENDPOINT`.
    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self::new(ClientConfig::from_env()?))
    }
}

impl<T: Transport> PdfMonkeyClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        self.config.endpoint()
    }

    // -----------------------------------------------------------------------
    // Executing operations
    // -----------------------------------------------------------------------

    pub fn get_current_user(&self) -> Result<CurrentUser, ApiError> {
        let response = self.send(Operation::GetCurrentUser, self.build_get_current_user())?;
        self.parse_get_current_user(response)
    }

    pub fn list_documents(&self, input: &ListDocumentsInput) -> Result<Vec<DocumentCard>, ApiError> {
        let request = self.build_list_documents(input)?;
        let response = self.send(Operation::ListDocuments, request)?;
        self.parse_list_documents(response)
    }

    pub fn get_document_card(&self, id: &str) -> Result<DocumentCard, ApiError> {
        let request = self.build_get_document_card(id)?;
        let response = self.send(Operation::GetDocumentCard, request)?;
        self.parse_get_document_card(id, response)
    }

    pub fn get_document(&self, id: &str) -> Result<Document, ApiError> {
        let request = self.build_get_document(id)?;
        let response = self.send(Operation::GetDocument, request)?;
        self.parse_get_document(id, response)
    }

    pub fn create_document(&self, document: &Document) -> Result<Document, ApiError> {
        let request = self.build_create_document(document)?;
        let response = self.send(Operation::CreateDocument, request)?;
        self.parse_create_document(response)
    }

    /// Replace the fields present in `document` on the document `id`.
    pub fn update_document(&self, id: &str, document: &Document) -> Result<(), ApiError> {
        let request = self.build_update_document(id, document)?;
        let response = self.send(Operation::UpdateDocument, request)?;
        self.parse_update_document(id, response)
    }

    pub fn delete_document(&self, id: &str) -> Result<(), ApiError> {
        let request = self.build_delete_document(id)?;
        let response = self.send(Operation::DeleteDocument, request)?;
        self.parse_delete_document(id, response)
    }

    fn send(&self, operation: Operation, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(%operation, method = request.method.as_str(), url = %request.url, "sending request");
        self.transport.execute(request)
    }

    // -----------------------------------------------------------------------
    // Request builders
    // -----------------------------------------------------------------------

    pub fn build_get_current_user(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/current_user", None)
    }

    pub fn build_list_documents(&self, input: &ListDocumentsInput) -> Result<HttpRequest, ApiError> {
        let body = encode(input)?;
        Ok(self.request(HttpMethod::Get, "/documents", Some(body)))
    }

    pub fn build_get_document_card(&self, id: &str) -> Result<HttpRequest, ApiError> {
        let path = resource_path("document_cards", id)?;
        Ok(self.request(HttpMethod::Get, &path, None))
    }

    pub fn build_get_document(&self, id: &str) -> Result<HttpRequest, ApiError> {
        let path = resource_path("documents", id)?;
        Ok(self.request(HttpMethod::Get, &path, None))
    }

    pub fn build_create_document(&self, document: &Document) -> Result<HttpRequest, ApiError> {
        let body = encode(&DocumentEnvelope { document })?;
        Ok(self.request(HttpMethod::Post, "/documents", Some(body)))
    }

    pub fn build_update_document(&self, id: &str, document: &Document) -> Result<HttpRequest, ApiError> {
        let path = resource_path("documents", id)?;
        let body = encode(&DocumentEnvelope { document })?;
        Ok(self.request(HttpMethod::Put, &path, Some(body)))
    }

    pub fn build_delete_document(&self, id: &str) -> Result<HttpRequest, ApiError> {
        let path = resource_path("documents", id)?;
        Ok(self.request(HttpMethod::Delete, &path, None))
    }

    fn request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        let mut headers = Vec::with_capacity(2);
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        headers.push((
            "authorization".to_string(),
            format!("Bearer {}", self.config.api_key()),
        ));
        HttpRequest {
            method,
            url: format!("{}{path}", self.config.endpoint()),
            headers,
            body,
        }
    }

    // -----------------------------------------------------------------------
    // Response parsers
    // -----------------------------------------------------------------------

    pub fn parse_get_current_user(&self, response: HttpResponse) -> Result<CurrentUser, ApiError> {
        check_status(&response, 200, Operation::GetCurrentUser, None)?;
        let envelope: CurrentUserEnvelope = decode(&response, Operation::GetCurrentUser)?;
        Ok(envelope.current_user)
    }

    pub fn parse_list_documents(&self, response: HttpResponse) -> Result<Vec<DocumentCard>, ApiError> {
        check_status(&response, 200, Operation::ListDocuments, None)?;
        let envelope: DocumentListEnvelope = decode(&response, Operation::ListDocuments)?;
        Ok(envelope.documents)
    }

    pub fn parse_get_document_card(&self, id: &str, response: HttpResponse) -> Result<DocumentCard, ApiError> {
        check_status(&response, 200, Operation::GetDocumentCard, Some(id))?;
        let envelope: DocumentCardEnvelope = decode(&response, Operation::GetDocumentCard)?;
        Ok(envelope.document_card)
    }

    pub fn parse_get_document(&self, id: &str, response: HttpResponse) -> Result<Document, ApiError> {
        check_status(&response, 200, Operation::GetDocument, Some(id))?;
        let envelope: DocumentEnvelope<Document> = decode(&response, Operation::GetDocument)?;
        Ok(envelope.document)
    }

    pub fn parse_create_document(&self, response: HttpResponse) -> Result<Document, ApiError> {
        check_status(&response, 201, Operation::CreateDocument, None)?;
        let envelope: DocumentEnvelope<Document> = decode(&response, Operation::CreateDocument)?;
        Ok(envelope.document)
    }

    /// The service echoes the updated document; the body is not inspected.
    pub fn parse_update_document(&self, id: &str, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200, Operation::UpdateDocument, Some(id))
    }

    pub fn parse_delete_document(&self, id: &str, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204, Operation::DeleteDocument, Some(id))
    }
}

/// `/{collection}/{id}` with `id` percent-encoded as one path segment.
///
/// An empty id would address the collection itself, so it is rejected.
fn resource_path(collection: &str, id: &str) -> Result<String, ApiError> {
    if id.is_empty() {
        return Err(ApiError::Configuration(format!(
            "document id must not be empty (/{collection}/{{id}})"
        )));
    }
    Ok(format!("/{collection}/{}", urlencoding::encode(id)))
}

/// Map any status other than `expected` to `ApiError::UnexpectedStatus`.
fn check_status(
    response: &HttpResponse,
    expected: u16,
    operation: Operation,
    id: Option<&str>,
) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    Err(ApiError::UnexpectedStatus {
        operation,
        id: id.map(str::to_string),
        status: response.status,
    })
}

fn encode<S: Serialize>(value: &S) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(ApiError::Serialization)
}

fn decode<D: DeserializeOwned>(response: &HttpResponse, operation: Operation) -> Result<D, ApiError> {
    serde_json::from_slice(&response.body).map_err(|source| ApiError::Decoding { operation, source })
}
