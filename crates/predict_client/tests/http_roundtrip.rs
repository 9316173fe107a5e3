//! End-to-end tests of the reqwest transport against a local axum endpoint.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    routing::post,
};
use predict_client::{FormController, PredictConfig, ReqwestTransport, submit};
use serde_json::Value;
use survey_types::{BACKEND_UNREACHABLE, ERROR_OCCURRED, FIELD_COUNT, FIELD_KEYS, FormState, Outcome};

/// Requests seen by the stub endpoint: content type and raw body.
type Seen = Arc<Mutex<Vec<(Option<String>, String)>>>;

/// Start `app` on an ephemeral port and return its `/predict` URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/predict")
}

/// Stub that records each request and answers with a fixed status and body.
fn stub(seen: Seen, status: StatusCode, body: &'static str) -> Router {
    Router::new()
        .route(
            "/predict",
            post(
                move |State(seen): State<Seen>, headers: HeaderMap, request: String| async move {
                    let content_type = headers
                        .get(CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    seen.lock().unwrap().push((content_type, request));
                    (status, body)
                },
            ),
        )
        .with_state(seen)
}

fn filled_form() -> FormState {
    FIELD_KEYS
        .iter()
        .enumerate()
        .fold(FormState::new(), |form, (i, key)| {
            form.with_value(key, (i % 5).to_string()).unwrap()
        })
}

fn config_for(url: String) -> PredictConfig {
    PredictConfig::default().with_endpoint(url)
}

#[tokio::test]
async fn test_request_is_json_with_all_fields_as_strings() {
    let seen = Seen::default();
    let url = serve(stub(seen.clone(), StatusCode::OK, r#"{"stress_level":"1"}"#)).await;
    let config = config_for(url);
    let transport = ReqwestTransport::new(&config).unwrap();

    let outcome = submit(&transport, &config, &filled_form()).await;

    assert_eq!(outcome, Outcome::Label("Moderate Stress"));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0.as_deref(), Some("application/json"));

    let body: Value = serde_json::from_str(&seen[0].1).unwrap();
    let object = body.as_object().unwrap();
    assert_eq!(object.len(), FIELD_COUNT);
    for key in FIELD_KEYS {
        assert!(object[key].is_string(), "{key} should be sent as a string");
    }
    assert_eq!(object["anxiety_level"], "0");
    assert_eq!(object["self_esteem"], "1");
}

#[tokio::test]
async fn test_server_error_message_is_shown() {
    let seen = Seen::default();
    let url = serve(stub(seen, StatusCode::BAD_REQUEST, r#"{"error":"bad input"}"#)).await;
    let config = config_for(url);
    let transport = ReqwestTransport::new(&config).unwrap();

    let outcome = submit(&transport, &config, &filled_form()).await;

    assert_eq!(outcome.display(), Some("bad input"));
}

#[tokio::test]
async fn test_server_error_without_body_uses_fallback() {
    let seen = Seen::default();
    let url = serve(stub(seen, StatusCode::INTERNAL_SERVER_ERROR, "")).await;
    let config = config_for(url);
    let transport = ReqwestTransport::new(&config).unwrap();

    let outcome = submit(&transport, &config, &filled_form()).await;

    assert_eq!(outcome.display(), Some(ERROR_OCCURRED));
}

#[tokio::test]
async fn test_html_reply_is_unreachable() {
    let seen = Seen::default();
    let url = serve(stub(seen, StatusCode::OK, "<html>maintenance</html>")).await;
    let config = config_for(url);
    let transport = ReqwestTransport::new(&config).unwrap();

    let outcome = submit(&transport, &config, &filled_form()).await;

    assert_eq!(outcome, Outcome::Unreachable);
}

#[tokio::test]
async fn test_connection_refused_is_unreachable() {
    // Reserve a port, then free it so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = config_for(format!("http://{addr}/predict"));
    let transport = ReqwestTransport::new(&config).unwrap();
    let mut controller = FormController::new();

    let outcome = controller.run_submit(&transport, &config).await;

    assert_eq!(outcome, Some(Outcome::Unreachable));
    assert_eq!(controller.result_text(), Some(BACKEND_UNREACHABLE));
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_timeout_is_unreachable() {
    let app = Router::new().route(
        "/predict",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            r#"{"stress_level":"0"}"#
        }),
    );
    let url = serve(app).await;
    let config = PredictConfig {
        endpoint: url,
        timeout: Some(Duration::from_millis(100)),
    };
    let transport = ReqwestTransport::new(&config).unwrap();

    let outcome = submit(&transport, &config, &filled_form()).await;

    assert_eq!(outcome, Outcome::Unreachable);
}

#[tokio::test]
async fn test_each_submit_sends_its_own_request() {
    let seen = Seen::default();
    let url = serve(stub(seen.clone(), StatusCode::OK, r#"{"stress_level":"2"}"#)).await;
    let config = config_for(url);
    let transport = ReqwestTransport::new(&config).unwrap();
    let mut controller = FormController::new();

    controller.run_submit(&transport, &config).await;
    controller.run_submit(&transport, &config).await;

    assert_eq!(seen.lock().unwrap().len(), 2);
    assert_eq!(controller.result_text(), Some("High Stress"));
}

// Integration test against the hosted prediction service - skip in CI
#[tokio::test]
#[ignore]
async fn test_live_prediction_service() {
    let config = PredictConfig::from_env();
    let transport = ReqwestTransport::new(&config).unwrap();

    let outcome = submit(&transport, &config, &filled_form()).await;
    println!("Outcome: {outcome:?}");

    assert_ne!(outcome, Outcome::Unreachable);
}
