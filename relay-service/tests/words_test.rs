//! Integration tests for word generation and history.

mod common;

use axum::http::StatusCode;
use common::{body_json, StubProvider, TestApp};
use relay_service::services::providers::mock::MockTextProvider;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn generated_words_are_returned_and_appended() {
    let stub = StubProvider::completing(r#"["c", "d"]"#).await;
    let app = TestApp::new(stub.client());
    app.state
        .word_store
        .append_words("u1", &["a".to_string(), "b".to_string()])
        .await
        .unwrap();

    let response = app
        .post_json(
            "/api/generate-words",
            json!({ "userId": "u1", "age": 7, "count": 2 }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "success": true, "words": ["c", "d"] })
    );
    assert_eq!(
        app.state.word_store.get_words("u1").await.unwrap(),
        vec!["a", "b", "c", "d"]
    );
}

#[tokio::test]
async fn invalid_count_never_reaches_the_provider() {
    let provider = Arc::new(MockTextProvider::replying(r#"["x"]"#));
    let app = TestApp::new(provider.clone());

    for count in [json!(0), json!(-1), json!(1.5), json!("2")] {
        let response = app
            .post_json(
                "/api/generate-words",
                json!({ "userId": "u1", "age": 7, "count": count }),
            )
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "Count must be a positive integer"
        );
    }

    assert_eq!(provider.calls(), 0);
    assert!(app.state.word_store.get_words("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_fields_are_a_bad_request() {
    let provider = Arc::new(MockTextProvider::replying(r#"["x"]"#));
    let app = TestApp::new(provider.clone());

    let response = app
        .post_json("/api/generate-words", json!({ "age": 7, "count": 2 }))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Missing required fields"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn provider_failure_is_a_server_error_and_nothing_is_stored() {
    let app = TestApp::new(Arc::new(MockTextProvider::failing("rate limited")));

    let response = app
        .post_json(
            "/api/generate-words",
            json!({ "userId": "u1", "age": 7, "count": 2 }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("rate limited"));
    assert!(app.state.word_store.get_words("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn unparseable_model_reply_is_a_server_error() {
    let app = TestApp::new(Arc::new(MockTextProvider::replying("sun, moon, star")));

    let response = app
        .post_json(
            "/api/generate-words",
            json!({ "userId": "u1", "age": "5", "count": 3, "language": "French" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["success"], false);
}

#[tokio::test]
async fn history_grows_across_calls_and_feeds_the_prompt() {
    let provider = Arc::new(MockTextProvider::replying(r#"["tree"]"#));
    let app = TestApp::new(provider.clone());
    let request = json!({ "userId": "u9", "age": 6, "count": 1, "language": "German" });

    for _ in 0..2 {
        let response = app.post_json("/api/generate-words", request.clone()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    // No deduplication: the same reply is appended twice.
    assert_eq!(
        app.state.word_store.get_words("u9").await.unwrap(),
        vec!["tree", "tree"]
    );
    let prompts = provider.prompts();
    assert!(prompts[0].contains("German"));
    assert!(!prompts[0].contains("previously used"));
    assert!(prompts[1].contains("previously used words: tree."));
}

#[tokio::test]
async fn health_reports_ok_with_memory_store() {
    let app = TestApp::new(Arc::new(MockTextProvider::replying("unused")));

    let response = app.send("GET", "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "relay-service");
}
