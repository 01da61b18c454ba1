use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use folio_contact::create_router;
use folio_contact::mailer::{MailError, Mailer, OutgoingEmail};
use folio_contact::rate_limit::RateLimiter;
use folio_contact::state::AppState;
use folio_contact::worker::delivery_worker;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tower::ServiceExt;

// Records what would have been sent
#[derive(Default)]
struct MockMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    fail: bool,
}

#[async_trait]
impl Mailer for MockMailer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<Option<String>, MailError> {
        if self.fail {
            return Err(MailError::Rejected { status: 422, body: "bad sender".into() });
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(Some("msg_123".to_string()))
    }
}

fn state_with(mailer: Option<Arc<MockMailer>>, dev_mode: bool, max_requests: u32) -> Arc<AppState> {
    let mail_tx = mailer.map(|m| {
        let (tx, rx) = mpsc::channel(8);
        tokio::spawn(delivery_worker(rx, m));
        tx
    });

    Arc::new(AppState {
        rate_limiter: Arc::new(RateLimiter::new(max_requests, 3_600_000)),
        min_submission: Duration::from_millis(3000),
        contact_email: "owner@portfolio.dev".to_string(),
        from_address: "Portfolio Contact <noreply@portfolio.dev>".to_string(),
        mail_tx,
        dev_mode,
    })
}

// Helper to create router with a working mailer
fn test_router(mailer: Arc<MockMailer>) -> Router {
    create_router(state_with(Some(mailer), false, 3))
}

fn valid_body() -> Value {
    json!({
        "name": "Grace Hopper",
        "email": "Grace@Navy.MIL",
        "message": "Found a moth in the relay, want to chat?",
        "honeypot": "",
        "timestamp": 12000
    })
}

fn contact_request(ip: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/contact")
        .header("content-type", "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_router(Arc::new(MockMailer::default()));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_preflight() {
    let app = test_router(Arc::new(MockMailer::default()));

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/contact")
                .header("origin", "https://portfolio.example")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let methods = response.headers()["access-control-allow-methods"].to_str().unwrap();
    assert!(methods.contains("POST") && methods.contains("OPTIONS"));
    let allowed = response.headers()["access-control-allow-headers"].to_str().unwrap();
    assert!(allowed.eq_ignore_ascii_case("content-type"));
}

#[tokio::test]
async fn test_cors_header_on_post_responses() {
    let app = test_router(Arc::new(MockMailer::default()));

    let mut request = contact_request("203.0.113.20", &valid_body());
    request
        .headers_mut()
        .insert("origin", "https://portfolio.example".parse().unwrap());
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");

    // error responses need it too or the browser hides the message
    let mut body = valid_body();
    body["honeypot"] = json!("filled");
    let mut request = contact_request("203.0.113.20", &body);
    request
        .headers_mut()
        .insert("origin", "https://portfolio.example".parse().unwrap());
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_submission_success() {
    let mailer = Arc::new(MockMailer::default());
    let app = test_router(Arc::clone(&mailer));

    let response = app.oneshot(contact_request("203.0.113.1", &valid_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-ratelimit-remaining"], "2");
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Message sent successfully!");
    assert_eq!(body["messageId"], "msg_123");

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["owner@portfolio.dev"]);
    assert_eq!(sent[0].reply_to, "grace@navy.mil");
    assert_eq!(sent[0].subject, "Portfolio Contact from Grace Hopper");
}

#[tokio::test]
async fn test_legacy_path() {
    let app = test_router(Arc::new(MockMailer::default()));

    let request = Request::builder()
        .method("POST")
        .uri("/contact")
        .header("content-type", "application/json")
        .body(Body::from(valid_body().to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_honeypot_rejected() {
    let mailer = Arc::new(MockMailer::default());
    let app = test_router(Arc::clone(&mailer));

    let mut body = valid_body();
    body["honeypot"] = json!("https://cheap-pills.example");
    let response = app.oneshot(contact_request("203.0.113.2", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid submission");
    assert!(mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_too_fast_rejected() {
    let app = test_router(Arc::new(MockMailer::default()));

    let mut body = valid_body();
    body["timestamp"] = json!(1200);
    let response = app.oneshot(contact_request("203.0.113.3", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Submission too fast. Please try again.");
}

#[tokio::test]
async fn test_negative_timestamp_rejected() {
    let app = test_router(Arc::new(MockMailer::default()));

    let mut body = valid_body();
    body["timestamp"] = json!(-5);
    let response = app.oneshot(contact_request("203.0.113.13", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Submission too fast. Please try again.");
}

#[tokio::test]
async fn test_zero_timestamp_is_not_timed() {
    let app = test_router(Arc::new(MockMailer::default()));

    let mut body = valid_body();
    body["timestamp"] = json!(0);
    let response = app.oneshot(contact_request("203.0.113.4", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_payload() {
    let app = test_router(Arc::new(MockMailer::default()));

    let request = Request::builder()
        .method("POST")
        .uri("/api/contact")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Invalid form data");
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn test_validation_errors_per_field() {
    let app = test_router(Arc::new(MockMailer::default()));

    let body = json!({ "name": "G", "email": "nope", "message": "hi" });
    let response = app.oneshot(contact_request("203.0.113.5", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Invalid form data");
    assert_eq!(body["errors"]["name"][0], "Name must be at least 2 characters");
    assert_eq!(body["errors"]["email"][0], "Invalid email address");
    assert_eq!(body["errors"]["message"][0], "Message must be at least 10 characters");
}

#[tokio::test]
async fn test_rate_limit_after_max_requests() {
    let app = test_router(Arc::new(MockMailer::default()));

    for expected_remaining in ["2", "1", "0"] {
        let response = app
            .clone()
            .oneshot(contact_request("198.51.100.7", &valid_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-ratelimit-remaining"], expected_remaining);
    }

    let response = app
        .clone()
        .oneshot(contact_request("198.51.100.7, 10.0.0.1", &valid_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()["x-ratelimit-remaining"], "0");
    let retry_after: u64 = response.headers()["retry-after"].to_str().unwrap().parse().unwrap();
    assert!(retry_after > 3500 && retry_after <= 3600, "retry after {}", retry_after);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Too many requests."));

    // another client is unaffected
    let response = app.oneshot(contact_request("198.51.100.8", &valid_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_dev_mode_without_provider() {
    let app = create_router(state_with(None, true, 3));

    let response = app.oneshot(contact_request("203.0.113.9", &valid_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Message received (development mode - email not sent)");
    assert!(body.get("messageId").is_none());
}

#[tokio::test]
async fn test_missing_provider_is_server_error() {
    let app = create_router(state_with(None, false, 3));

    let response = app.oneshot(contact_request("203.0.113.10", &valid_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Email service not configured");
}

#[tokio::test]
async fn test_delivery_failure_is_generic_server_error() {
    let mailer = Arc::new(MockMailer { fail: true, ..Default::default() });
    let app = test_router(mailer);

    let response = app.oneshot(contact_request("203.0.113.11", &valid_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Failed to send email. Please try again later.");
    // provider detail stays in the logs
    assert!(!body.to_string().contains("bad sender"));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = test_router(Arc::new(MockMailer::default()));

    app.clone()
        .oneshot(contact_request("203.0.113.12", &valid_body()))
        .await
        .unwrap();

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("contact_requests_total"));
}
