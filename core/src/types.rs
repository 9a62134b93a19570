//! Wire DTOs for the PDFMonkey API.
//!
//! # Design
//! Field names match the service's snake_case JSON keys. Document fields are
//! all optional and omitted when unset, so the same `Document` type serves
//! as create/update input and as response payload. The mock-server crate
//! defines its own copies of these shapes; integration tests catch drift.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Profile of the account the api key belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CurrentUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub available_documents: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current_plan: Option<String>,
    #[serde(default)]
    pub current_plan_interval: Option<String>,
    #[serde(default)]
    pub desired_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub paying_customer: bool,
    #[serde(default)]
    pub trial_ends_on: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub block_resources: bool,
    #[serde(default)]
    pub share_links: bool,
}

/// A generation job and its resulting artifact.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Free-form failure details; the service does not fix its shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_cause: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_logs: Option<Vec<GenerationLog>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    /// Template data, as a JSON-encoded string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_share_link: Option<String>,
    /// e.g. `pending`, `generating`, `success`, `failure`. Not validated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Input for creating a document from `template_id` with `payload`.
    pub fn from_template(template_id: impl Into<String>, payload: &Value) -> Self {
        Document {
            document_template_id: Some(template_id.into()),
            payload: Some(payload.to_string()),
            ..Default::default()
        }
    }
}

/// One entry of a document's generation log.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GenerationLog {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Summary projection of a `Document`, as returned by list endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_template_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_cause: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_share_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Filters for listing documents. Unset fields do not filter.
///
/// Encodes as `{"page": {...}, "q": {...}}`; both objects are always sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListDocumentsInput {
    #[serde(default)]
    pub page: Page,
    #[serde(default)]
    pub q: DocumentQuery,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Page {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentQuery {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub document_template_id: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_since: Option<DateTime<Utc>>,
}

impl ListDocumentsInput {
    pub fn page(mut self, number: u32) -> Self {
        self.page.number = Some(number);
        self
    }

    pub fn template(mut self, template_id: impl Into<String>) -> Self {
        self.q.document_template_id.push(template_id.into());
        self
    }

    pub fn workspace(mut self, workspace_id: impl Into<String>) -> Self {
        self.q.workspace_id = Some(workspace_id.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.q.status = Some(status.into());
        self
    }

    pub fn updated_since(mut self, since: DateTime<Utc>) -> Self {
        self.q.update_since = Some(since);
        self
    }
}

// Envelopes: the service wraps every payload under a single named key.

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentUserEnvelope {
    pub current_user: CurrentUser,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DocumentListEnvelope {
    pub documents: Vec<DocumentCard>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DocumentCardEnvelope {
    pub document_card: DocumentCard,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct DocumentEnvelope<D> {
    pub document: D,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn empty_document_serializes_to_empty_object() {
        let json = serde_json::to_value(Document::default()).unwrap();
        assert_eq!(json, json!({}));
    }

    #[test]
    fn document_round_trips_populated_fields() {
        let input = Document {
            id: Some("doc-1".to_string()),
            app_id: Some("app-1".to_string()),
            checksum: Some("c0ffee".to_string()),
            created_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
            document_template_id: Some("tpl-1".to_string()),
            download_url: Some("https://files.test/doc-1.pdf".to_string()),
            failure_cause: Some(json!({"reason": "timeout", "retries": 2})),
            filename: Some("invoice.pdf".to_string()),
            generation_logs: Some(vec![GenerationLog {
                kind: Some("info".to_string()),
                message: Some("Generation started".to_string()),
                timestamp: Some("2024-03-01T12:00:01.000Z".to_string()),
            }]),
            meta: Some(r#"{"_filename":"invoice.pdf"}"#.to_string()),
            payload: Some(r#"{"total":42}"#.to_string()),
            preview_url: Some("https://preview.test/doc-1".to_string()),
            public_share_link: None,
            status: Some("success".to_string()),
            updated_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 5).unwrap()),
        };
        let encoded = serde_json::to_string(&input).unwrap();
        let decoded: Document = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, input);
        assert!(!encoded.contains("public_share_link"));
    }

    #[test]
    fn generation_log_uses_type_key() {
        let log: GenerationLog =
            serde_json::from_str(r#"{"type":"error","message":"boom","timestamp":"t"}"#).unwrap();
        assert_eq!(log.kind.as_deref(), Some("error"));
        let back = serde_json::to_value(&log).unwrap();
        assert_eq!(back["type"], "error");
    }

    #[test]
    fn document_accepts_nulls_and_unknown_keys() {
        let doc: Document = serde_json::from_str(
            r#"{"id":"a","download_url":null,"failure_cause":null,"xml_data":"ignored"}"#,
        )
        .unwrap();
        assert_eq!(doc.id.as_deref(), Some("a"));
        assert!(doc.download_url.is_none());
        assert!(doc.failure_cause.is_none());
    }

    #[test]
    fn failure_cause_keeps_arbitrary_shape() {
        let card: DocumentCard =
            serde_json::from_str(r#"{"id":"a","failure_cause":["line 1", {"code": 3}]}"#).unwrap();
        assert_eq!(card.failure_cause, Some(json!(["line 1", {"code": 3}])));
    }

    #[test]
    fn default_list_input_sends_empty_page_and_query() {
        let json = serde_json::to_value(ListDocumentsInput::default()).unwrap();
        assert_eq!(json, json!({"page": {}, "q": {}}));
    }

    #[test]
    fn list_input_nests_filters() {
        let since = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let input = ListDocumentsInput::default()
            .page(3)
            .template("tpl-a")
            .template("tpl-b")
            .workspace("ws-1")
            .status("failure")
            .updated_since(since);
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(
            json,
            json!({
                "page": {"number": 3},
                "q": {
                    "document_template_id": ["tpl-a", "tpl-b"],
                    "workspace_id": "ws-1",
                    "status": "failure",
                    "update_since": "2024-01-02T03:04:05Z"
                }
            })
        );
    }

    #[test]
    fn current_user_tolerates_missing_optional_fields() {
        let user: CurrentUser = serde_json::from_str(r#"{"id":"u1"}"#).unwrap();
        assert_eq!(user.id, "u1");
        assert!(!user.paying_customer);
        assert!(user.email.is_none());
    }

    #[test]
    fn current_user_without_id_decodes_with_empty_id() {
        let user: CurrentUser = serde_json::from_str(r#"{"email":"ada@example.test"}"#).unwrap();
        assert_eq!(user.id, "");
        assert_eq!(user.email.as_deref(), Some("ada@example.test"));
    }

    #[test]
    fn document_from_template_encodes_payload() {
        let doc = Document::from_template("tpl-1", &json!({"name": "Ada"}));
        assert_eq!(doc.document_template_id.as_deref(), Some("tpl-1"));
        assert_eq!(doc.payload.as_deref(), Some(r#"{"name":"Ada"}"#));
    }
}
