//! HTTP API v1.
//!
//! Endpoints:
//!
//! - `POST   /v1/chat`          : Run one turn, get the reply
//! - `GET    /v1/dossiers/{id}` : Dossier snapshot
//! - `DELETE /v1/dossiers/{id}` : Reset a dossier
//! - `GET    /v1/tools`         : List available tools

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tess_core::Dossier;
use tess_core::error::{Error, StoreError};

use crate::SharedState;

/// Build the v1 API router. Nest this under "/v1" in the main router.
pub fn v1_router(state: SharedState) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route(
            "/dossiers/{id}",
            get(get_dossier_handler).delete(reset_dossier_handler),
        )
        .route("/tools", get(list_tools_handler))
        .with_state(state)
}

// ── DTOs ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub dossier_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub status: String,
    pub response: String,
    pub dossier_id: String,
    pub persisted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetResponse {
    pub status: String,
    pub dossier_id: String,
    pub deleted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToolDto {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToolListResponse {
    pub tools: Vec<ToolDto>,
    pub count: usize,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            status: "error".into(),
            error: error.into(),
        }),
    )
}

fn store_error(e: StoreError) -> ApiError {
    match e {
        StoreError::InvalidId(_) => api_error(StatusCode::BAD_REQUEST, e.to_string()),
        other => {
            warn!(error = %other, "Dossier store failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if payload.message.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "message cannot be empty"));
    }
    info!(
        dossier_id = payload.dossier_id.as_deref().unwrap_or("-"),
        message_len = payload.message.len(),
        "v1/chat request"
    );

    let reply = state
        .controller
        .handle(payload.dossier_id.as_deref(), &payload.message)
        .await
        .map_err(|e| match e {
            Error::Store(e) => store_error(e),
            other => api_error(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        })?;

    Ok(Json(ChatResponse {
        status: "success".into(),
        response: reply.text,
        dossier_id: reply.dossier_id,
        persisted: reply.persisted,
    }))
}

async fn get_dossier_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Dossier>, ApiError> {
    match state.controller.store().load(&id).await {
        Ok(Some(dossier)) => Ok(Json(dossier)),
        Ok(None) => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("dossier {id} not found"),
        )),
        Err(e) => Err(store_error(e)),
    }
}

async fn reset_dossier_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<ResetResponse>, ApiError> {
    let deleted = state.controller.reset(&id).await.map_err(store_error)?;
    info!(dossier_id = %id, deleted, "Dossier reset via API");

    Ok(Json(ResetResponse {
        status: "success".into(),
        dossier_id: id,
        deleted,
    }))
}

async fn list_tools_handler(State(state): State<SharedState>) -> Json<ToolListResponse> {
    let defs = state.controller.engine().tools().definitions();
    let count = defs.len();

    Json(ToolListResponse {
        tools: defs
            .into_iter()
            .map(|d| ToolDto {
                name: d.name,
                description: d.description,
                parameters: d.parameters,
            })
            .collect(),
        count,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::json;
    use tess_agent::TurnController;
    use tess_core::{DossierStore, EventBus};
    use tess_providers::ScriptedProvider;
    use tess_providers::scripted::{tool_call, tool_call_response};
    use tess_store::InMemoryStore;
    use tower::ServiceExt;

    use crate::GatewayState;

    fn test_state(provider: ScriptedProvider) -> (SharedState, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let controller = TurnController::from_config(
            &tess_config::AppConfig::default(),
            Arc::new(provider),
            store.clone(),
            Arc::new(EventBus::default()),
        );
        (GatewayState::new(Arc::new(controller)), store)
    }

    fn chat_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn chat_returns_reply_and_dossier_id() {
        let (state, store) = test_state(ScriptedProvider::text("Goedemiddag!"));
        let app = v1_router(state);

        let response = app
            .oneshot(chat_request(json!({"message": "Hallo", "dossier_id": "dos-web"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: ChatResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.status, "success");
        assert_eq!(json.response, "Goedemiddag!");
        assert_eq!(json.dossier_id, "dos-web");
        assert!(store.load("dos-web").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn chat_without_dossier_id_starts_one() {
        let (state, _) = test_state(ScriptedProvider::text("Welkom"));
        let app = v1_router(state);

        let response = app
            .oneshot(chat_request(json!({"message": "Hallo"})))
            .await
            .unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: ChatResponse = serde_json::from_slice(&body).unwrap();
        assert!(json.dossier_id.starts_with("dos-"));
    }

    #[tokio::test]
    async fn chat_rejects_empty_message() {
        let (state, _) = test_state(ScriptedProvider::new(vec![]));
        let app = v1_router(state);

        let response = app
            .oneshot(chat_request(json!({"message": "   "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.status, "error");
        assert_eq!(json.error, "message cannot be empty");
    }

    #[tokio::test]
    async fn dossier_snapshot_after_retrieval() {
        let provider = ScriptedProvider::new(vec![Ok(tool_call_response(vec![tool_call(
            "c1",
            "get_case_law",
            json!({"query": "btw"}),
        )]))]);
        let (state, _) = test_state(provider);
        let app = v1_router(state);

        let response = app
            .clone()
            .oneshot(chat_request(json!({"message": "btw-vraag", "dossier_id": "dos-1"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let req = Request::builder()
            .uri("/dossiers/dos-1")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let dossier: Dossier = serde_json::from_slice(&body).unwrap();
        assert_eq!(dossier.case_law.len(), 2);
        assert_eq!(dossier.selected_titles().len(), 2);
    }

    #[tokio::test]
    async fn unknown_dossier_is_404() {
        let (state, _) = test_state(ScriptedProvider::new(vec![]));
        let app = v1_router(state);

        let req = Request::builder()
            .uri("/dossiers/dos-missing")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn reset_deletes_dossier() {
        let (state, store) = test_state(ScriptedProvider::new(vec![]));
        store.save(&Dossier::new("dos-1")).await.unwrap();
        let app = v1_router(state);

        let req = Request::builder()
            .method("DELETE")
            .uri("/dossiers/dos-1")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: ResetResponse = serde_json::from_slice(&body).unwrap();
        assert!(json.deleted);
        assert!(store.load("dos-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reset_unknown_dossier_reports_nothing_deleted() {
        let (state, _) = test_state(ScriptedProvider::new(vec![]));
        let app = v1_router(state);

        let req = Request::builder()
            .method("DELETE")
            .uri("/dossiers/dos-none")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: ResetResponse = serde_json::from_slice(&body).unwrap();
        assert!(!json.deleted);
        assert_eq!(json.dossier_id, "dos-none");
    }

    #[tokio::test]
    async fn list_tools() {
        let (state, _) = test_state(ScriptedProvider::new(vec![]));
        let app = v1_router(state);

        let req = Request::builder()
            .uri("/tools")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: ToolListResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.count, 5);
        let names: Vec<&str> = json.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "get_legislation",
                "get_case_law",
                "remove_sources",
                "restore_sources",
                "generate_tax_answer"
            ]
        );
    }
}
