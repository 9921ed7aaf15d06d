// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the full answer pipeline through the HTTP gateway.
//!
//! Each test builds an isolated router over mock generation and retrieval
//! adapters. Tests are independent and order-insensitive.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use glucora_core::SourceClass;
use glucora_engine::{AnswerEngine, EngineOptions};
use glucora_gateway::auth::AuthConfig;
use glucora_gateway::{GatewayState, build_router};
use glucora_test_utils::{MockGenerator, MockRetriever};
use http_body_util::BodyExt;
use tower::ServiceExt;

fn app(generator: Arc<MockGenerator>, retriever: MockRetriever) -> Router {
    let engine = AnswerEngine::with_memory_counter(
        generator,
        Arc::new(retriever),
        EngineOptions::default(),
    );
    build_router(GatewayState {
        engine: Arc::new(engine),
        auth: AuthConfig { bearer_token: None },
    })
}

async fn ask(app: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::post("/v1/answers")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn greeting_short_circuits_to_direct_tier() {
    let generator = Arc::new(MockGenerator::new().with_response("Hello! How can I help?"));
    let app = app(generator.clone(), MockRetriever::new());

    let (status, body) = ask(
        app,
        serde_json::json!({"question": "hi", "user_id": "alice"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tier"], 1);
    assert_eq!(body["processing_tier"], "MODEL");
    assert_eq!(body["answer"], "Hello! How can I help?");
    assert_eq!(body["metadata"]["model_used"], "gpt-4o");
    assert!(body["sources"].as_array().unwrap().is_empty());
    // A greeting never reaches the classifier: the only call is the answer.
    assert_eq!(generator.request_count(), 1);
}

#[tokio::test]
async fn current_info_question_runs_the_search_tier() {
    let generator = Arc::new(
        MockGenerator::new()
            .with_response("2|0.8|asks about current coverage rules")
            .with_response("Coverage criteria for CGMs were broadened this year."),
    );
    let retriever = MockRetriever::new().with_snippets(SourceClass::Web, 3);
    let app = app(generator.clone(), retriever);

    let (status, body) = ask(
        app,
        serde_json::json!({
            "question": "what are the current CGM coverage rules?",
            "user_id": "alice",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tier"], 2);
    assert_eq!(body["processing_tier"], "SEARCH");
    assert_eq!(body["metadata"]["tools_used"], serde_json::json!(["web_search"]));
    assert_eq!(body["sources"].as_array().unwrap().len(), 3);

    // The answer call sees the retrieved snippets as grounding context.
    let requests = generator.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].user_text.contains("Snippet body 1"));
}

#[tokio::test]
async fn research_cue_runs_all_three_backends() {
    let generator = Arc::new(
        MockGenerator::new().with_response("Recent trials suggest broader benefits."),
    );
    let retriever = MockRetriever::new()
        .with_snippets(SourceClass::Pubmed, 5)
        .with_snippets(SourceClass::ClinicalTrials, 4)
        .with_snippets(SourceClass::MedicalWeb, 2);
    let app = app(generator.clone(), retriever);

    let (status, body) = ask(
        app,
        serde_json::json!({
            "question": "what does the latest research say about metformin and longevity?",
            "user_id": "alice",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tier"], 3);
    assert_eq!(body["processing_tier"], "RESEARCH");
    assert_eq!(body["research_summary"]["total_studies"], 9);
    assert_eq!(body["research_summary"]["pubmed_articles"], 5);
    assert_eq!(body["research_summary"]["clinical_trials"], 4);
    assert_eq!(body["research_summary"]["evidence_quality"], "high");
    assert_eq!(body["sources"].as_array().unwrap().len(), 11);
    // One research admission consumed out of the default ten.
    assert_eq!(body["rate_limit"]["remaining"], 9);
}

#[tokio::test]
async fn supplied_profile_reaches_query_and_prompt() {
    let generator = Arc::new(
        MockGenerator::new()
            .with_response("2|0.8|current device pricing")
            .with_response("Sensor pricing depends on your coverage."),
    );
    let retriever = Arc::new(MockRetriever::new().with_snippets(SourceClass::Web, 2));
    let engine = AnswerEngine::with_memory_counter(
        generator.clone(),
        retriever.clone(),
        EngineOptions::default(),
    );
    let app = build_router(GatewayState {
        engine: Arc::new(engine),
        auth: AuthConfig { bearer_token: None },
    });

    let (status, body) = ask(
        app,
        serde_json::json!({
            "question": "how much do CGM sensors cost right now?",
            "user_id": "alice",
            "profile": {"condition": "type1", "medications": ["insulin aspart"]},
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tier"], 2);

    // The retrieval query carries the condition; the answer prompt carries
    // condition and medications.
    assert!(retriever.queries()[0].1.contains("type 1 diabetes"));
    let requests = generator.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].user_text.contains("type 1 diabetes"));
    assert!(requests[1].user_text.contains("type 1 diabetes"));
    assert!(requests[1].user_text.contains("insulin aspart"));
}

#[tokio::test]
async fn follow_up_resolves_against_the_session_window() {
    let generator = Arc::new(
        MockGenerator::new()
            .with_response("1|0.9|personal log recap")
            .with_response("A 40g carb breakfast explains that spike.")
            .with_response("1|0.9|personal log recap")
            .with_response("For dinner, count the carbs the same way."),
    );
    let app = app(generator.clone(), MockRetriever::new());

    let (status, first) = ask(
        app.clone(),
        serde_json::json!({
            "question": "I had 40g carbs at breakfast and spiked to 10.2, why?",
            "user_id": "alice",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let session_id = first["session_id"].as_str().unwrap().to_string();

    let (status, second) = ask(
        app,
        serde_json::json!({
            "question": "what about the same for dinner?",
            "user_id": "alice",
            "session_id": session_id,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["session_id"].as_str().unwrap(), first["session_id"]);

    // The second answer call carries the resolved antecedent from turn one.
    let requests = generator.requests();
    assert_eq!(requests.len(), 4);
    assert!(requests[3].user_text.contains("what about the same for dinner?"));
    assert!(requests[3].user_text.contains("40g carbs"));
}

#[tokio::test]
async fn research_stream_emits_sources_before_done() {
    let generator = Arc::new(
        MockGenerator::new().with_response("Streamed research synthesis."),
    );
    let retriever = MockRetriever::new()
        .with_snippets(SourceClass::Pubmed, 2)
        .with_snippets(SourceClass::ClinicalTrials, 1);
    let app = app(generator, retriever);

    let response = app
        .oneshot(
            Request::post("/v1/answers")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::ACCEPT, "text/event-stream")
                .body(Body::from(
                    serde_json::json!({
                        "question": "any new clinical trials on tirzepatide?",
                        "user_id": "alice",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    let sources_at = text.find("event: sources").expect("sources event");
    let done_at = text.find("event: done").expect("done event");
    assert!(sources_at < done_at);
    assert!(text.contains("event: token"));
    assert!(text.contains("\"tier\":3") || text.contains("\"tier\": 3"));
}
