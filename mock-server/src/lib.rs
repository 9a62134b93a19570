//! In-memory emulation of the PDFMonkey REST API.
//!
//! Serves the same routes and envelopes as the real service, authenticated
//! by a single bearer key. Documents are kept in insertion order.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

/// Documents per page of `GET /documents`.
pub const PAGE_SIZE: usize = 20;

/// Workspace (app) every document created here belongs to.
pub const APP_ID: &str = "8d1b4c0e-5c43-4c1e-9a51-6d2f3b7e0a11";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub app_id: String,
    pub checksum: Option<String>,
    pub created_at: DateTime<Utc>,
    pub document_template_id: String,
    pub download_url: Option<String>,
    pub failure_cause: Option<Value>,
    pub filename: Option<String>,
    pub generation_logs: Vec<GenerationLog>,
    pub meta: Option<String>,
    pub payload: Option<String>,
    pub preview_url: Option<String>,
    pub public_share_link: Option<String>,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationLog {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub timestamp: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DocumentCard {
    pub id: String,
    pub app_id: String,
    pub created_at: DateTime<Utc>,
    pub document_template_id: String,
    pub document_template_identifier: String,
    pub download_url: Option<String>,
    pub failure_cause: Option<Value>,
    pub filename: Option<String>,
    pub meta: Option<String>,
    pub public_share_link: Option<String>,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

impl From<&Document> for DocumentCard {
    fn from(doc: &Document) -> Self {
        DocumentCard {
            id: doc.id.clone(),
            app_id: doc.app_id.clone(),
            created_at: doc.created_at,
            document_template_id: doc.document_template_id.clone(),
            document_template_identifier: format!("template-{}", doc.document_template_id),
            download_url: doc.download_url.clone(),
            failure_cause: doc.failure_cause.clone(),
            filename: doc.filename.clone(),
            meta: doc.meta.clone(),
            public_share_link: doc.public_share_link.clone(),
            status: doc.status.clone(),
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub auth_token: String,
    pub available_documents: i64,
    pub created_at: DateTime<Utc>,
    pub current_plan: String,
    pub current_plan_interval: String,
    pub desired_name: String,
    pub email: String,
    pub lang: String,
    pub paying_customer: bool,
    pub trial_ends_on: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub block_resources: bool,
    pub share_links: bool,
}

/// Incoming document fields for create and update. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct DocumentInput {
    pub document_template_id: Option<String>,
    pub payload: Option<String>,
    pub meta: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DocumentWrapper<T> {
    pub document: T,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListFilter {
    #[serde(default)]
    pub page: PageFilter,
    #[serde(default)]
    pub q: QueryFilter,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageFilter {
    pub number: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QueryFilter {
    #[serde(default)]
    pub document_template_id: Vec<String>,
    pub workspace_id: Option<String>,
    pub status: Option<String>,
    pub update_since: Option<DateTime<Utc>>,
}

impl ListFilter {
    fn matches(&self, doc: &Document) -> bool {
        let q = &self.q;
        (q.document_template_id.is_empty() || q.document_template_id.contains(&doc.document_template_id))
            && q.workspace_id.as_ref().map_or(true, |w| *w == doc.app_id)
            && q.status.as_ref().map_or(true, |s| *s == doc.status)
            && q.update_since.map_or(true, |since| doc.updated_at >= since)
    }
}

pub type Db = Arc<RwLock<Vec<Document>>>;

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    user: Arc<CurrentUser>,
    db: Db,
}

pub fn app(api_key: &str) -> Router {
    let now = Utc::now();
    let state = AppState {
        api_key: Arc::from(api_key),
        user: Arc::new(CurrentUser {
            id: Uuid::new_v4().to_string(),
            auth_token: api_key.to_string(),
            available_documents: 300,
            created_at: now,
            current_plan: "free".to_string(),
            current_plan_interval: "month".to_string(),
            desired_name: "Mock User".to_string(),
            email: "mock@example.test".to_string(),
            lang: "en".to_string(),
            paying_customer: false,
            trial_ends_on: None,
            updated_at: now,
            block_resources: false,
            share_links: true,
        }),
        db: Arc::new(RwLock::new(Vec::new())),
    };
    Router::new()
        .route("/current_user", get(current_user))
        .route("/documents", get(list_documents).post(create_document))
        .route(
            "/documents/{id}",
            get(get_document).put(update_document).delete(delete_document),
        )
        .route("/document_cards/{id}", get(get_document_card))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), StatusCode> {
    let expected = format!("Bearer {}", state.api_key);
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

async fn current_user(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    authorize(&state, &headers)?;
    Ok(Json(serde_json::json!({ "current_user": state.user.as_ref() })))
}

async fn list_documents(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, StatusCode> {
    authorize(&state, &headers)?;
    let filter: ListFilter = if body.is_empty() {
        ListFilter::default()
    } else {
        serde_json::from_slice(&body).map_err(|_| StatusCode::BAD_REQUEST)?
    };
    let page = filter.page.number.unwrap_or(1).max(1);

    let docs = state.db.read().await;
    let cards: Vec<DocumentCard> = docs
        .iter()
        .filter(|d| filter.matches(d))
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .map(DocumentCard::from)
        .collect();
    info!(page, count = cards.len(), "listed documents");
    Ok(Json(serde_json::json!({
        "documents": cards,
        "meta": { "current_page": page },
    })))
}

async fn create_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    authorize(&state, &headers)?;
    let input = document_input(&body)?;
    let template_id = input
        .document_template_id
        .ok_or(StatusCode::UNPROCESSABLE_ENTITY)?;
    let now = Utc::now();
    let id = Uuid::new_v4().to_string();
    let doc = Document {
        filename: Some(format!("{id}.pdf")),
        id,
        app_id: APP_ID.to_string(),
        created_at: now,
        document_template_id: template_id,
        payload: input.payload,
        meta: input.meta,
        status: input.status.unwrap_or_else(|| "pending".to_string()),
        updated_at: now,
        ..Default::default()
    };
    info!(id = %doc.id, "created document");
    state.db.write().await.push(doc.clone());
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "document": doc }))))
}

// Parsed only after `authorize`, so unauthenticated callers always get 401.
fn document_input(body: &[u8]) -> Result<DocumentInput, StatusCode> {
    serde_json::from_slice::<DocumentWrapper<DocumentInput>>(body)
        .map(|wrapper| wrapper.document)
        .map_err(|_| StatusCode::BAD_REQUEST)
}

async fn get_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    authorize(&state, &headers)?;
    let docs = state.db.read().await;
    let doc = docs.iter().find(|d| d.id == id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(serde_json::json!({ "document": doc })))
}

async fn get_document_card(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    authorize(&state, &headers)?;
    let docs = state.db.read().await;
    let doc = docs.iter().find(|d| d.id == id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(serde_json::json!({ "document_card": DocumentCard::from(doc) })))
}

async fn update_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, StatusCode> {
    authorize(&state, &headers)?;
    let input = document_input(&body)?;
    let mut docs = state.db.write().await;
    let doc = docs.iter_mut().find(|d| d.id == id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(template_id) = input.document_template_id {
        doc.document_template_id = template_id;
    }
    if let Some(payload) = input.payload {
        doc.payload = Some(payload);
    }
    if let Some(meta) = input.meta {
        doc.meta = Some(meta);
    }
    if let Some(status) = input.status {
        doc.status = status;
    }
    doc.updated_at = Utc::now();
    Ok(Json(serde_json::json!({ "document": doc })))
}

async fn delete_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    authorize(&state, &headers)?;
    let mut docs = state.db.write().await;
    let index = docs.iter().position(|d| d.id == id).ok_or(StatusCode::NOT_FOUND)?;
    docs.remove(index);
    info!(%id, "deleted document");
    Ok(StatusCode::NO_CONTENT)
}
