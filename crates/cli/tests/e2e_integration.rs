//! End-to-end tests for the TESS assistant.
//!
//! These drive the whole stack the binary wires together: config, the HTTP
//! gateway, the turn controller, the five tools, and a file-backed store.
//! The language model is scripted.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use tess_agent::TurnController;
use tess_config::AppConfig;
use tess_core::event::{DomainEvent, EventBus};
use tess_core::{Dossier, DossierStore};
use tess_gateway::{GatewayState, build_router};
use tess_providers::ScriptedProvider;
use tess_providers::scripted::{text_response, tool_call, tool_call_response};
use tess_store::FileStore;

async fn post_chat(app: &axum::Router, dossier_id: &str, message: &str) -> Value {
    let req = Request::builder()
        .method("POST")
        .uri("/v1/chat")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"message": message, "dossier_id": dossier_id}).to_string(),
        ))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

// ── E2E: Full dossier workflow over HTTP ────────────────────────────────

#[tokio::test]
async fn e2e_retrieve_confirm_answer_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::new(dir.path()));
    let provider = Arc::new(ScriptedProvider::new(vec![
        Ok(tool_call_response(vec![
            tool_call("c1", "get_legislation", json!({"query": "btw-tarief"})),
            tool_call("c2", "get_case_law", json!({"query": "btw-tarief"})),
        ])),
        Ok(tool_call_response(vec![tool_call(
            "c3",
            "remove_sources",
            json!({"instruction": "de vennootschapsbelasting is niet relevant"}),
        )])),
        Ok(text_response(
            r#"{"titles": ["Wet op de vennootschapsbelasting 1969, artikel 13"]}"#,
        )),
        Ok(tool_call_response(vec![tool_call(
            "c4",
            "generate_tax_answer",
            json!({"query": "Welk btw-tarief geldt?"}),
        )])),
        Ok(text_response("Het algemene tarief is 21%.")),
    ]));
    let controller = TurnController::from_config(
        &AppConfig::default(),
        provider.clone(),
        store.clone(),
        Arc::new(EventBus::default()),
    );
    let app = build_router(GatewayState::new(Arc::new(controller)));

    let first = post_chat(&app, "dos-e2e", "Welk btw-tarief geldt?").await;
    assert_eq!(first["status"], "success");
    let text = first["response"].as_str().unwrap();
    assert!(text.starts_with("Ik vond de volgende bronnen:"));
    assert!(text.contains("ECLI:NL:HR:2020:123"));

    let second = post_chat(&app, "dos-e2e", "Haal de vpb-wet weg").await;
    assert!(
        second["response"]
            .as_str()
            .unwrap()
            .contains("Wet op de vennootschapsbelasting 1969, artikel 13")
    );

    let third = post_chat(&app, "dos-e2e", "Ja, klopt").await;
    assert_eq!(third["response"], "Het algemene tarief is 21%.");
    assert_eq!(provider.call_count(), 5);

    // The snapshot on disk reflects all three turns.
    let reopened = FileStore::new(dir.path());
    let dossier = reopened.load("dos-e2e").await.unwrap().unwrap();
    assert_eq!(dossier.titles().len(), 4);
    assert_eq!(
        dossier.unselected_titles(),
        vec!["Wet op de vennootschapsbelasting 1969, artikel 13"]
    );
    assert_eq!(dossier.conversation.len(), 6);

    // And the API serves the same snapshot.
    let req = Request::builder()
        .uri("/v1/dossiers/dos-e2e")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let served: Dossier = serde_json::from_slice(&body).unwrap();
    assert_eq!(served, dossier);
}

// ── E2E: Events ─────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_turn_publishes_events() {
    let bus = Arc::new(EventBus::default());
    let mut rx = bus.subscribe();
    let provider = Arc::new(ScriptedProvider::new(vec![Ok(tool_call_response(vec![
        tool_call("c1", "get_case_law", json!({"query": "x"})),
    ]))]));
    let controller = TurnController::from_config(
        &AppConfig::default(),
        provider,
        Arc::new(tess_store::InMemoryStore::new()),
        bus.clone(),
    );

    controller.handle(Some("dos-ev"), "vraag").await.unwrap();

    let mut seen = Vec::new();
    while let Ok(Ok(event)) = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await {
        seen.push(event);
    }

    assert!(seen.iter().any(|e| matches!(
        e.as_ref(),
        DomainEvent::ToolExecuted { tool_name, success: true, .. } if tool_name == "get_case_law"
    )));
    assert!(seen.iter().any(|e| matches!(
        e.as_ref(),
        DomainEvent::PatchApplied { added: 2, .. }
    )));
    assert!(matches!(
        seen.last().map(|e| e.as_ref()),
        Some(DomainEvent::TurnCompleted { tool_calls: 1, persisted: true, .. })
    ));
}

// ── E2E: Configuration ──────────────────────────────────────────────────

#[tokio::test]
async fn e2e_default_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, AppConfig::default_toml()).unwrap();

    let config = AppConfig::load_from(&path).unwrap();
    assert_eq!(config.default_model, "gpt-4o");
    assert_eq!(config.store.backend, "file");
    assert_eq!(config.gateway.port, 8000);
    assert!(config.engine.parallel_tools);
    assert!(config.engine.lock_dossiers);

    // Memory backend wiring from config.
    let mut config = config;
    config.store.backend = "memory".into();
    assert_eq!(tess_store::build_from_config(&config.store).name(), "memory");
}
