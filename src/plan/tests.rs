use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use httpmock::prelude::*;
use serde_json::json;

use super::prompt::compose_prompt;
use super::{PlanRelay, StudyPlanRequest, Subjects};
use crate::client::{
    GeminiClient, GenerateContentRequest, GenerateContentResponse, GenerationClient,
};
use crate::config::{AuthMode, Config};
use crate::error::RelayError;

/// Records every outbound call and answers with a canned response.
struct RecordingClient {
    calls: Mutex<Vec<(String, GenerateContentRequest)>>,
    reply: serde_json::Value,
}

impl RecordingClient {
    fn new(reply: serde_json::Value) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply,
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationClient for RecordingClient {
    async fn generate_content(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, RelayError> {
        self.calls
            .lock()
            .unwrap()
            .push((api_key.to_string(), request.clone()));
        serde_json::from_value(self.reply.clone())
            .map_err(|err| RelayError::malformed(err.to_string()))
    }
}

fn sample_request() -> StudyPlanRequest {
    StudyPlanRequest {
        subjects: Subjects::List(vec!["Math".to_string(), "Physics".to_string()]),
        exam_date: Some("2024-06-01".to_string()),
        study_hours: Some(4.0),
        learning_style: Some("reading".to_string()),
        goals: Some("pass exam".to_string()),
        ..StudyPlanRequest::default()
    }
}

fn plan_reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            { "content": { "parts": [{ "text": text }], "role": "model" }, "finishReason": "STOP" }
        ]
    })
}

fn relay_with(client: Arc<RecordingClient>) -> PlanRelay {
    PlanRelay::new(client, true)
}

#[tokio::test]
async fn returns_candidate_text_unmodified() {
    let text = "# Plan\n\n- **Day 1**: Algebra  \n";
    let client = RecordingClient::new(plan_reply(text));
    let relay = relay_with(client.clone());

    let plan = relay
        .generate_plan(&sample_request(), "abc123")
        .await
        .unwrap();

    assert_eq!(plan.plan_text, text);
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn bearer_prefix_is_stripped_before_use() {
    let client = RecordingClient::new(plan_reply("# Plan"));
    let relay = relay_with(client.clone());

    relay
        .generate_plan(&sample_request(), "Bearer abc123")
        .await
        .unwrap();

    let calls = client.calls.lock().unwrap();
    assert_eq!(calls[0].0, "abc123");
}

#[tokio::test]
async fn missing_credential_fails_before_any_call() {
    let client = RecordingClient::new(plan_reply("# Plan"));
    let relay = relay_with(client.clone());

    for credential in ["", "   ", "Bearer "] {
        let err = relay
            .generate_plan(&sample_request(), credential)
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::MissingCredential), "{credential:?}");
    }
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn missing_required_fields_fail_before_any_call() {
    let client = RecordingClient::new(plan_reply("# Plan"));
    let relay = relay_with(client.clone());

    let mut cases = Vec::new();

    let mut no_subjects = sample_request();
    no_subjects.subjects = Subjects::Joined(" , ".to_string());
    cases.push(no_subjects);

    let mut no_date = sample_request();
    no_date.exam_date = None;
    cases.push(no_date);

    let mut no_hours = sample_request();
    no_hours.study_hours = None;
    cases.push(no_hours);

    let mut blank_goals = sample_request();
    blank_goals.goals = Some("  ".to_string());
    cases.push(blank_goals);

    let mut too_many_hours = sample_request();
    too_many_hours.study_hours = Some(25.0);
    cases.push(too_many_hours);

    for hours in [0.0, 0.5, -1.0, f64::NAN] {
        let mut out_of_range = sample_request();
        out_of_range.study_hours = Some(hours);
        cases.push(out_of_range);
    }

    for request in cases {
        let err = relay.generate_plan(&request, "abc123").await.unwrap_err();
        assert!(matches!(err, RelayError::InvalidRequest(_)), "{request:?}");
    }
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn empty_candidates_is_malformed() {
    let client = RecordingClient::new(json!({ "candidates": [] }));
    let relay = relay_with(client);

    let err = relay
        .generate_plan(&sample_request(), "abc123")
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::MalformedUpstreamResponse(_)));
}

#[tokio::test]
async fn blocked_prompt_reason_is_reported() {
    let client = RecordingClient::new(json!({ "promptFeedback": { "blockReason": "SAFETY" } }));
    let relay = relay_with(client);

    let err = relay
        .generate_plan(&sample_request(), "abc123")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("prompt blocked: SAFETY"));
}

#[tokio::test]
async fn partial_shapes_are_malformed() {
    let replies = [
        json!({ "candidates": [{ "finishReason": "SAFETY" }] }),
        json!({ "candidates": [{ "content": {} }] }),
        json!({ "candidates": [{ "content": { "parts": [] } }] }),
        json!({ "candidates": [{ "content": { "parts": [{}] } }] }),
        json!({ "candidates": [{ "content": { "parts": [{ "text": "" }] } }] }),
    ];

    for reply in replies {
        let relay = relay_with(RecordingClient::new(reply.clone()));
        let err = relay
            .generate_plan(&sample_request(), "abc123")
            .await
            .unwrap_err();
        assert!(
            matches!(err, RelayError::MalformedUpstreamResponse(_)),
            "{reply}"
        );
    }
}

#[tokio::test]
async fn prompt_is_deterministic_across_calls() {
    let client = RecordingClient::new(plan_reply("# Plan"));
    let relay = relay_with(client.clone());

    relay.generate_plan(&sample_request(), "k").await.unwrap();
    relay.generate_plan(&sample_request(), "k").await.unwrap();

    let calls = client.calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].1, calls[1].1);
}

#[tokio::test]
async fn end_to_end_against_mock_provider() {
    let server = MockServer::start_async().await;

    let validated = sample_request().validate().unwrap();
    let expected_prompt = compose_prompt(&validated, true);
    for needle in ["Math, Physics", "2024-06-01", "4", "reading", "pass exam"] {
        assert!(expected_prompt.contains(needle), "prompt lacks {needle}");
    }

    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/models/gemini-1.5-flash:generateContent")
                .query_param("key", "abc123")
                .json_body(json!({
                    "contents": [{ "parts": [{ "text": expected_prompt }] }],
                    "generationConfig": {
                        "temperature": 0.7,
                        "topP": 0.8,
                        "topK": 40,
                        "maxOutputTokens": 2048
                    },
                    "safetySettings": [{
                        "category": "HARM_CATEGORY_HARASSMENT",
                        "threshold": "BLOCK_MEDIUM_AND_ABOVE"
                    }]
                }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(plan_reply("# Plan\n..."));
        })
        .await;

    let mut config = Config::builder().build().unwrap();
    config.provider.base_url = server.base_url();
    config.provider.auth_mode = AuthMode::QueryParam;
    let client = GeminiClient::new(&config.provider).unwrap();
    let relay = PlanRelay::new(Arc::new(client), config.prompt.markdown);

    let plan = relay
        .generate_plan(&sample_request(), "Bearer abc123")
        .await
        .unwrap();

    assert_eq!(plan.plan_text, "# Plan\n...");
    mock.assert_async().await;
}

#[tokio::test]
async fn upstream_failure_message_is_surfaced() {
    let server = MockServer::start_async().await;

    let _mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(403)
                .header("Content-Type", "application/json")
                .body(r#"{"error":{"message":"invalid key"}}"#);
        })
        .await;

    let mut config = Config::builder().build().unwrap();
    config.provider.base_url = server.base_url();
    let client = GeminiClient::new(&config.provider).unwrap();
    let relay = PlanRelay::new(Arc::new(client), true);

    let err = relay
        .generate_plan(&sample_request(), "abc123")
        .await
        .unwrap_err();

    match err {
        RelayError::Upstream { status, message } => {
            assert_eq!(status, Some(403));
            assert_eq!(message, "invalid key");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[test]
fn subjects_accept_array_or_joined_string() {
    let from_array: StudyPlanRequest =
        serde_json::from_value(json!({ "subjects": [" Math ", "", "Physics"] })).unwrap();
    let from_text: StudyPlanRequest =
        serde_json::from_value(json!({ "subjects": "Math,  Physics," })).unwrap();

    assert_eq!(from_array.subjects.display(), "Math, Physics");
    assert_eq!(from_text.subjects.display(), "Math, Physics");
}

#[test]
fn study_hours_accept_numeric_text() {
    let request: StudyPlanRequest =
        serde_json::from_value(json!({ "studyHours": "6" })).unwrap();
    assert_eq!(request.study_hours, Some(6.0));

    let blank: StudyPlanRequest = serde_json::from_value(json!({ "studyHours": "" })).unwrap();
    assert_eq!(blank.study_hours, None);

    assert!(serde_json::from_value::<StudyPlanRequest>(json!({ "studyHours": "lots" })).is_err());
}

#[test]
fn api_key_accepts_legacy_field_name() {
    let request: StudyPlanRequest =
        serde_json::from_value(json!({ "geminiApiKey": "Bearer abc" })).unwrap();
    assert_eq!(request.api_key.as_deref(), Some("Bearer abc"));
}
