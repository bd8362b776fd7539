//! Auth client tests against a mock auth service

use console_auth::{
    evaluate_access, AuthClient, AuthConfig, GateOutcome, SessionProvider, SESSION_COOKIE,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const APP_URL: &str = "https://auth.example.test";

fn client(server: &MockServer) -> AuthClient {
    let config = AuthConfig {
        service_url: server.uri(),
        app_url: APP_URL.to_string(),
        origin: APP_URL.to_string(),
        public_url: "http://localhost:3000".to_string(),
    };
    AuthClient::new(config).unwrap()
}

fn cookie() -> String {
    format!("{}=abc.def; cartera-lang=es", SESSION_COOKIE)
}

fn session_body(role: &str, banned: bool) -> serde_json::Value {
    json!({
        "user": {
            "id": "u1",
            "name": "Ana",
            "email": "ana@example.com",
            "emailVerified": true,
            "role": role,
            "banned": banned
        },
        "session": {
            "id": "s1",
            "userId": "u1",
            "token": "abc.def",
            "expiresAt": "2030-01-01T00:00:00Z"
        }
    })
}

// ============================================================
// Session lookup
// ============================================================

#[tokio::test]
async fn forwards_cookie_and_origin() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/get-session"))
        .and(header("cookie", cookie().as_str()))
        .and(header("origin", APP_URL))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("admin", false)))
        .expect(1)
        .mount(&server)
        .await;

    let payload = client(&server).get_session(Some(&cookie())).await;
    let decision = evaluate_access(payload);
    assert_eq!(decision.gate_outcome(), GateOutcome::Proceed);
}

#[tokio::test]
async fn no_session_cookie_skips_the_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("admin", false)))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(client.get_session(None).await.is_none());
    assert!(client.get_session(Some("cartera-lang=en")).await.is_none());
    assert!(client.get_token(Some("")).await.is_none());
}

#[tokio::test]
async fn unauthorized_response_is_no_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/get-session"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    assert!(client(&server).get_session(Some(&cookie())).await.is_none());
}

#[tokio::test]
async fn body_without_session_is_no_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/get-session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": { "id": "u1" } })))
        .mount(&server)
        .await;

    assert!(client(&server).get_session(Some(&cookie())).await.is_none());
}

#[tokio::test]
async fn null_body_is_no_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/get-session"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    assert!(client(&server).get_session(Some(&cookie())).await.is_none());
}

#[tokio::test]
async fn malformed_body_is_no_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/get-session"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    assert!(client(&server).get_session(Some(&cookie())).await.is_none());
}

#[tokio::test]
async fn non_admin_and_banned_are_forbidden() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/get-session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("user", false)))
        .mount(&server)
        .await;
    let decision = evaluate_access(client(&server).get_session(Some(&cookie())).await);
    assert_eq!(decision.gate_outcome(), GateOutcome::Forbidden);

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/get-session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("admin", true)))
        .mount(&server)
        .await;
    let decision = evaluate_access(client(&server).get_session(Some(&cookie())).await);
    assert_eq!(decision.gate_outcome(), GateOutcome::Forbidden);
    assert_eq!(decision.error(), Some("User is banned"));
}

#[tokio::test]
async fn unreachable_service_is_no_session() {
    let server = MockServer::start().await;
    let client = client(&server);
    drop(server);

    assert!(client.get_session(Some(&cookie())).await.is_none());
}

// ============================================================
// Token exchange
// ============================================================

#[tokio::test]
async fn token_is_extracted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/token"))
        .and(header("accept", "application/json"))
        .and(header("origin", APP_URL))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "jwt-123" })))
        .mount(&server)
        .await;

    let token = client(&server).get_token(Some(&cookie())).await;
    assert_eq!(token.as_deref(), Some("jwt-123"));
}

#[tokio::test]
async fn token_failure_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/token"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    assert!(client(&server).get_token(Some(&cookie())).await.is_none());

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    assert!(client(&server).get_token(Some(&cookie())).await.is_none());
}
