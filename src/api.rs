// Mock API - REST façade over an in-memory collection
//
// The handlers are written once, generic over `Record`, and mounted under
// `/api/<collection>`. Only Budgets are served.

use crate::entities::Budget;
use crate::error::StoreError;
use crate::record::{merge_json, EntityKind, Record, RecordId, NEW_RECORD_ID};
use crate::store::{MemoryStore, Repository};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// One collection shared by all requests
pub type Shared<T> = Arc<Mutex<MemoryStore<T>>>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub budgets: Shared<Budget>,
}

impl AppState {
    pub fn new(budgets: MemoryStore<Budget>) -> Self {
        AppState {
            budgets: Arc::new(Mutex::new(budgets)),
        }
    }

    /// Fresh state with the two fixture budgets
    pub fn seeded() -> Self {
        Self::new(MemoryStore::with_records(Budget::seed()))
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Handler error; every variant renders as `{"message": ...}`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(EntityKind),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(store) => match store {
                StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                StoreError::Validation { .. } | StoreError::Malformed(_) => StatusCode::BAD_REQUEST,
                StoreError::Cycle { .. } => StatusCode::CONFLICT,
                StoreError::Network(_) => StatusCode::BAD_GATEWAY,
            },
        };

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .merge(collection_routes(state.budgets))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// `/api/<collection>` and `/api/<collection>/:id` for one record kind
pub fn collection_routes<T: Record>(store: Shared<T>) -> Router {
    let base = format!("/api/{}", T::KIND.collection());
    let item = format!("{}/:id", base);

    Router::new()
        .route(&base, get(list_records::<T>).post(create_record::<T>))
        .route(
            &item,
            get(get_record::<T>)
                .put(update_record::<T>)
                .delete(delete_record::<T>),
        )
        .with_state(store)
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok", "version": crate::VERSION }))
}

/// GET /api/<collection> - All records, insertion order
async fn list_records<T: Record>(State(store): State<Shared<T>>) -> ApiResult<Json<Vec<T>>> {
    let store = store.lock().await;
    Ok(Json(store.list()?))
}

/// GET /api/<collection>/:id
async fn get_record<T: Record>(
    State(store): State<Shared<T>>,
    Path(id): Path<RecordId>,
) -> ApiResult<Json<T>> {
    let store = store.lock().await;
    store
        .get(id)?
        .map(Json)
        .ok_or(ApiError::NotFound(T::KIND))
}

/// POST /api/<collection> - Body is stored as sent, no field checks.
/// Omitted fields take their defaults.
async fn create_record<T: Record>(
    State(store): State<Shared<T>>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<T>)> {
    let mut record: T = serde_json::from_value(body).map_err(StoreError::from)?;
    record.set_id(NEW_RECORD_ID);

    let mut store = store.lock().await;
    let created = store.add(record)?;

    info!(kind = %T::KIND, id = created.id(), "created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/<collection>/:id - Body is merged over the stored record, no
/// field checks
async fn update_record<T: Record>(
    State(store): State<Shared<T>>,
    Path(id): Path<RecordId>,
    Json(patch): Json<Value>,
) -> ApiResult<Json<T>> {
    let mut store = store.lock().await;
    let existing = store.get(id)?.ok_or(ApiError::NotFound(T::KIND))?;

    let merged = merge_json(&existing, &patch)?;
    let updated = store.update(merged)?.ok_or(ApiError::NotFound(T::KIND))?;
    info!(kind = %T::KIND, id, "updated");
    Ok(Json(updated))
}

/// DELETE /api/<collection>/:id - 204 whether or not the id existed
async fn delete_record<T: Record>(
    State(store): State<Shared<T>>,
    Path(id): Path<RecordId>,
) -> ApiResult<StatusCode> {
    let mut store = store.lock().await;
    store.remove(id)?;
    info!(kind = %T::KIND, id, "deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use tower::ServiceExt;

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&json).unwrap())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn app() -> Router {
        router(AppState::seeded())
    }

    fn new_budget() -> Value {
        json!({
            "name": "New Budget",
            "startDate": "2025-01-01",
            "endDate": "2025-12-31",
            "status": "Draft"
        })
    }

    #[tokio::test]
    async fn test_seeded_list_then_create_third() {
        let app = app();

        let (status, list) = send(&app, Method::GET, "/api/budgets", None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = list
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["FY 2024 Budget", "Q1 2024 Forecast"]);

        let (status, created) = send(&app, Method::POST, "/api/budgets", Some(new_budget())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], 3);

        let (_, list) = send(&app, Method::GET, "/api/budgets", None).await;
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[2]["id"], 3);
        assert_eq!(list[2]["name"], "New Budget");
    }

    #[tokio::test]
    async fn test_post_then_get_returns_payload_plus_id() {
        let app = app();
        let (_, created) = send(&app, Method::POST, "/api/budgets", Some(new_budget())).await;
        let id = created["id"].as_u64().unwrap();

        let (status, fetched) = send(&app, Method::GET, &format!("/api/budgets/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);

        let mut expected = new_budget();
        expected["id"] = json!(id);
        assert_eq!(fetched, expected);
    }

    #[tokio::test]
    async fn test_post_ignores_client_id() {
        let app = app();
        let mut body = new_budget();
        body["id"] = json!(1);

        let (_, created) = send(&app, Method::POST, "/api/budgets", Some(body)).await;
        assert_eq!(created["id"], 3);

        let (_, first) = send(&app, Method::GET, "/api/budgets/1", None).await;
        assert_eq!(first["name"], "FY 2024 Budget");
    }

    #[tokio::test]
    async fn test_get_unknown_is_404_with_message() {
        let (status, body) = send(&app(), Method::GET, "/api/budgets/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "Budget not found" }));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let app = app();

        for id in [1, 1, 999] {
            let uri = format!("/api/budgets/{}", id);
            let (status, body) = send(&app, Method::DELETE, &uri, None).await;
            assert_eq!(status, StatusCode::NO_CONTENT);
            assert_eq!(body, Value::Null);

            let (status, _) = send(&app, Method::GET, &uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }

        let (_, list) = send(&app, Method::GET, "/api/budgets", None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_put_unknown_is_404_and_adds_nothing() {
        let app = app();
        let (status, body) =
            send(&app, Method::PUT, "/api/budgets/7", Some(json!({ "name": "Ghost" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Budget not found");

        let (_, list) = send(&app, Method::GET, "/api/budgets", None).await;
        assert_eq!(list.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_put_merges_partial_body() {
        let app = app();
        let (status, updated) = send(
            &app,
            Method::PUT,
            "/api/budgets/2",
            Some(json!({ "status": "Archived", "id": 50 })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["id"], 2);
        assert_eq!(updated["status"], "Archived");
        assert_eq!(updated["name"], "Q1 2024 Forecast");
        assert_eq!(updated["endDate"], "2024-03-31");
    }

    #[tokio::test]
    async fn test_put_rejects_bad_field_value() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/budgets/1",
            Some(json!({ "status": "Closed" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().starts_with("malformed record"));

        let (_, unchanged) = send(&app, Method::GET, "/api/budgets/1", None).await;
        assert_eq!(unchanged["status"], "Active");
    }

    #[tokio::test]
    async fn test_post_stores_blank_and_partial_bodies() {
        let app = app();

        let mut blank_name = new_budget();
        blank_name["name"] = json!("");
        let (status, created) = send(&app, Method::POST, "/api/budgets", Some(blank_name)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], 3);
        assert_eq!(created["name"], "");

        let (status, created) =
            send(&app, Method::POST, "/api/budgets", Some(json!({ "name": "Partial" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], 4);

        let (status, stored) = send(&app, Method::GET, "/api/budgets/4", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stored["name"], "Partial");
        assert_eq!(stored["startDate"], "1970-01-01");
        assert_eq!(stored["status"], "Draft");

        let (_, list) = send(&app, Method::GET, "/api/budgets", None).await;
        assert_eq!(list.as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_put_stores_blank_name() {
        let app = app();
        let (status, updated) =
            send(&app, Method::PUT, "/api/budgets/1", Some(json!({ "name": "" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "");

        let (_, stored) = send(&app, Method::GET, "/api/budgets/1", None).await;
        assert_eq!(stored["name"], "");
        assert_eq!(stored["status"], "Active");
    }

    #[tokio::test]
    async fn test_delete_then_create_does_not_reuse_id() {
        let app = app();
        send(&app, Method::DELETE, "/api/budgets/2", None).await;

        let (_, created) = send(&app, Method::POST, "/api/budgets", Some(new_budget())).await;
        assert_eq!(created["id"], 3);
    }

    #[tokio::test]
    async fn test_health_and_cors() {
        let request = Request::builder()
            .uri("/api/health")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}
