//! HTTP route handlers for the admin and public servers.
//!
//! Handlers are kept thin, delegating to the resolver and the content manager.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use zhero_core::{
    ManagerError, Page, PageSummary, Schema, SchemaSummary, StorageError, VocabError,
};

use super::models::{
    ClassDetails, ClassQuery, ErrorResponse, PageQuery, PageRequest, SchemaRequest,
};
use super::AppState;

// =============================================================================
// Errors
// =============================================================================

/// An error rendered as `{"error": "..."}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

impl From<ManagerError> for ApiError {
    fn from(err: ManagerError) -> Self {
        let status = match &err {
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            ManagerError::Storage(StorageError::InvalidName(_))
            | ManagerError::UnknownClass(_)
            | ManagerError::UnknownProperty { .. }
            | ManagerError::InvalidSchema(_)
            | ManagerError::MissingField { .. }
            | ManagerError::UnknownField { .. } => StatusCode::BAD_REQUEST,
            ManagerError::SchemaInUse { .. } => StatusCode::CONFLICT,
            ManagerError::Storage(_) | ManagerError::Vocab(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %err, "request failed");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<VocabError> for ApiError {
    fn from(err: VocabError) -> Self {
        tracing::error!(error = %err, "vocabulary query failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Vocabulary Handlers
// =============================================================================

/// GET `/api/classes?q=` - Stable classes, optionally filtered.
pub async fn list_classes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ClassQuery>,
) -> Json<Vec<String>> {
    let classes = match query.q.as_deref() {
        Some(q) => state.resolver.search_classes(q),
        None => state.resolver.all_classes(),
    };
    Json(classes)
}

/// GET `/api/classes/{name}` - Class with inherited properties and breadcrumbs.
pub async fn get_class(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<ClassDetails>> {
    if !state.resolver.is_class(&name) {
        return Err(ApiError::not_found(format!("Unknown vocabulary class: {}", name)));
    }

    let class = state.resolver.schema_class_by_name(&name)?;
    let breadcrumbs = state
        .hierarchy
        .breadcrumbs_for(&name)
        .map(<[String]>::to_vec)
        .unwrap_or_default();

    Ok(Json(ClassDetails { class, breadcrumbs }))
}

/// GET `/api/classes/{name}/subclasses` - Direct stable subclasses.
pub async fn list_subclasses(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Json<Vec<String>> {
    let class = state.resolver.class_term(&name);
    Json(state.resolver.sub_classes_of(&class))
}

/// GET `/api/hierarchy` - Every breadcrumb path of the class tree.
pub async fn class_hierarchy(State(state): State<Arc<AppState>>) -> Json<Vec<Vec<String>>> {
    Json(state.hierarchy.class_hierarchy().to_vec())
}

// =============================================================================
// Schema Handlers
// =============================================================================

/// GET `/api/schemas`
pub async fn list_schemas(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<SchemaSummary>>> {
    let manager = state.manager.read().await;
    Ok(Json(manager.list_schemas()?))
}

/// POST `/api/schemas` - Create or replace a schema.
pub async fn save_schema(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SchemaRequest>,
) -> ApiResult<Json<Schema>> {
    let mut manager = state.manager.write().await;
    Ok(Json(manager.save_schema(request.into_schema())?))
}

/// GET `/api/schemas/{name}`
pub async fn get_schema(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<Schema>> {
    let manager = state.manager.read().await;
    Ok(Json(manager.get_schema(&name)?))
}

/// DELETE `/api/schemas/{name}`
pub async fn delete_schema(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    let mut manager = state.manager.write().await;
    manager.delete_schema(&name)?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Page Handlers
// =============================================================================

/// GET `/api/pages/{schema}?q=` - Pages, optionally searched.
pub async fn list_pages(
    State(state): State<Arc<AppState>>,
    Path(schema): Path<String>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Vec<PageSummary>>> {
    let manager = state.manager.read().await;
    let pages = match query.q.as_deref() {
        Some(q) => manager.search_pages(&schema, q)?,
        None => manager.list_pages(&schema)?,
    };
    Ok(Json(pages))
}

/// POST `/api/pages/{schema}`
pub async fn create_page(
    State(state): State<Arc<AppState>>,
    Path(schema): Path<String>,
    Json(request): Json<PageRequest>,
) -> ApiResult<(StatusCode, Json<Page>)> {
    let mut manager = state.manager.write().await;
    let page = manager.create_page(&schema, request.data, request.enabled)?;
    Ok((StatusCode::CREATED, Json(page)))
}

/// GET `/api/pages/{schema}/{id}`
pub async fn get_page(
    State(state): State<Arc<AppState>>,
    Path((schema, id)): Path<(String, String)>,
) -> ApiResult<Json<Page>> {
    let manager = state.manager.read().await;
    Ok(Json(manager.get_page(&schema, &id)?))
}

/// PUT `/api/pages/{schema}/{id}`
pub async fn update_page(
    State(state): State<Arc<AppState>>,
    Path((schema, id)): Path<(String, String)>,
    Json(request): Json<PageRequest>,
) -> ApiResult<Json<Page>> {
    let mut manager = state.manager.write().await;
    Ok(Json(manager.update_page(&schema, &id, request.data, request.enabled)?))
}

/// DELETE `/api/pages/{schema}/{id}`
pub async fn delete_page(
    State(state): State<Arc<AppState>>,
    Path((schema, id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let mut manager = state.manager.write().await;
    manager.delete_page(&schema, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/api/pages/{schema}/{id}/enable`
pub async fn enable_page(
    State(state): State<Arc<AppState>>,
    Path((schema, id)): Path<(String, String)>,
) -> ApiResult<Json<Page>> {
    let mut manager = state.manager.write().await;
    Ok(Json(manager.enable_page(&schema, &id, true)?))
}

/// POST `/api/pages/{schema}/{id}/disable`
pub async fn disable_page(
    State(state): State<Arc<AppState>>,
    Path((schema, id)): Path<(String, String)>,
) -> ApiResult<Json<Page>> {
    let mut manager = state.manager.write().await;
    Ok(Json(manager.enable_page(&schema, &id, false)?))
}

// =============================================================================
// Public Handlers
// =============================================================================

/// GET `/{schema}/{id}` - JSON-LD of an enabled page.
pub async fn published_page(
    State(state): State<Arc<AppState>>,
    Path((schema, id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let manager = state.manager.read().await;
    Ok(Json(manager.published_page(&schema, &id)?))
}
