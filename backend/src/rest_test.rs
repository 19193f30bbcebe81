use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;

use super::*;

fn session_json() -> Value {
    json!({
        "access_token": "access-1",
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 1_900_000_000,
        "refresh_token": "refresh-1",
        "user": {
            "id": "u1",
            "email": "a@b.com",
            "user_metadata": { "full_name": "Ana" },
            "app_metadata": { "provider": "email" }
        }
    })
}

fn backend() -> RestBackend {
    RestBackend::new(BackendConfig::new("https://abcd.supabase.co", "anon"))
}

fn backend_at(url: &str) -> RestBackend {
    RestBackend::with_storage(BackendConfig::new(url, "anon"), Box::new(MemoryStorage::default()))
}

fn expired_session() -> Session {
    let mut session = parse_session(&session_json().to_string()).unwrap();
    session.access_token = "stale".to_owned();
    session.expires_at = Some(now_unix() - 60);
    session
}

/// Serve exactly one HTTP response on a local port. The handle yields the raw
/// request text.
fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0_u8; 4096];
        loop {
            let n = stream.read(&mut buf).unwrap();
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|l| l.to_ascii_lowercase().strip_prefix("content-length:").map(|v| v.trim().to_owned()))
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= head_end + 4 + content_length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
        String::from_utf8_lossy(&request).into_owned()
    });
    (url, handle)
}

// =============================================================================
// endpoints
// =============================================================================

#[test]
fn auth_endpoint_formats_expected_path() {
    assert_eq!(auth_endpoint("https://x.supabase.co", "token"), "https://x.supabase.co/auth/v1/token");
}

#[test]
fn rest_endpoint_formats_expected_path() {
    assert_eq!(rest_endpoint("http://localhost:54321", "profiles"), "http://localhost:54321/rest/v1/profiles");
}

// =============================================================================
// parse_session / parse_sign_up_response
// =============================================================================

#[test]
fn parse_session_reads_tokens_and_user() {
    let session = parse_session(&session_json().to_string()).unwrap();
    assert_eq!(session.access_token, "access-1");
    assert_eq!(session.expires_at, Some(1_900_000_000));
    assert_eq!(session.user.full_name(), Some("Ana"));
}

#[test]
fn parse_session_invalid_json() {
    assert!(matches!(parse_session("not json"), Err(BackendError::Parse(_))));
}

#[test]
fn sign_up_with_session_is_confirmed() {
    let resp = parse_sign_up_response(&session_json().to_string()).unwrap();
    assert!(resp.session.is_some());
    assert_eq!(resp.user.map(|u| u.id), Some("u1".to_owned()));
}

#[test]
fn sign_up_pending_confirmation_returns_bare_user() {
    let body = json!({ "id": "u2", "email": "new@b.com", "confirmation_sent_at": "2025-01-01T00:00:00Z" });
    let resp = parse_sign_up_response(&body.to_string()).unwrap();
    assert!(resp.session.is_none());
    assert_eq!(resp.user.map(|u| u.id), Some("u2".to_owned()));
}

// =============================================================================
// parse_error
// =============================================================================

#[test]
fn parse_error_reads_legacy_oauth_shape() {
    let body = json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" });
    let err = parse_error(400, &body.to_string());
    assert_eq!(err.to_string(), "Invalid login credentials");
    assert_eq!(err.status(), Some(400));
}

#[test]
fn parse_error_reads_current_auth_shape() {
    let body = json!({ "code": 400, "error_code": "invalid_credentials", "msg": "Invalid login credentials" });
    match parse_error(400, &body.to_string()) {
        BackendError::Api { code, message, .. } => {
            assert_eq!(code.as_deref(), Some("invalid_credentials"));
            assert_eq!(message, "Invalid login credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn parse_error_reads_row_api_shape() {
    let body = json!({
        "code": "PGRST116",
        "details": "The result contains 0 rows",
        "hint": null,
        "message": "JSON object requested, multiple (or no) rows returned"
    });
    let err = parse_error(406, &body.to_string());
    assert!(err.is_not_single_row());
}

#[test]
fn parse_error_falls_back_to_status() {
    let err = parse_error(502, "<html>bad gateway</html>");
    assert_eq!(err.to_string(), "request failed with status 502");
}

// =============================================================================
// session storage + events (no network)
// =============================================================================

#[tokio::test]
async fn get_session_reads_persisted_session() {
    let backend = backend();
    assert!(backend.get_session().await.unwrap().is_none());

    let session = parse_session(&session_json().to_string()).unwrap();
    backend.persist_session(&session);
    assert_eq!(backend.get_session().await.unwrap(), Some(session));
}

#[tokio::test]
async fn unreadable_stored_session_is_discarded() {
    let backend = backend();
    backend.storage.store(&backend.config().storage_key(), "{garbage");
    assert!(backend.get_session().await.unwrap().is_none());
    assert!(backend.storage.load(&backend.config().storage_key()).is_none());
}

#[tokio::test]
async fn sign_out_without_session_clears_and_notifies() {
    let backend = backend();
    let mut sub = backend.on_auth_state_change();

    backend.sign_out().await.unwrap();

    let change = sub.next().await.unwrap();
    assert_eq!(change.event, AuthChangeEvent::SignedOut);
    assert!(change.session.is_none());
    assert!(backend.get_session().await.unwrap().is_none());
}

#[tokio::test]
async fn sign_out_without_session_leaves_storage_empty() {
    let backend = backend();
    backend.storage.store(&backend.config().storage_key(), "{garbage");

    backend.sign_out().await.unwrap();

    assert!(backend.storage.load(&backend.config().storage_key()).is_none());
}

// =============================================================================
// expiry + refresh
// =============================================================================

#[test]
fn with_expiry_derives_from_expires_in() {
    let mut session = parse_session(&session_json().to_string()).unwrap();
    session.expires_at = None;
    assert_eq!(with_expiry(session, 1_000).expires_at, Some(4_600));
}

#[test]
fn with_expiry_keeps_backend_value() {
    let session = parse_session(&session_json().to_string()).unwrap();
    assert_eq!(with_expiry(session, 1_000).expires_at, Some(1_900_000_000));
}

#[test]
fn is_expired_applies_margin() {
    let mut session = parse_session(&session_json().to_string()).unwrap();
    session.expires_at = Some(1_000);
    assert!(!is_expired(&session, 1_000 - EXPIRY_MARGIN_SECS - 1));
    assert!(is_expired(&session, 1_000 - EXPIRY_MARGIN_SECS));
    assert!(is_expired(&session, 2_000));
    session.expires_at = None;
    assert!(!is_expired(&session, i64::MAX));
}

#[test]
fn logout_outcome_treats_dead_token_as_signed_out() {
    for status in [401, 403, 404] {
        let err = BackendError::Api { status, code: None, message: "invalid JWT".to_owned() };
        assert_eq!(logout_outcome(Err(err)), Ok(()));
    }
}

#[test]
fn logout_outcome_propagates_other_failures() {
    let server = BackendError::Api { status: 500, code: None, message: "boom".to_owned() };
    assert_eq!(logout_outcome(Err(server.clone())), Err(server));
    let offline = BackendError::Request("offline".to_owned());
    assert_eq!(logout_outcome(Err(offline.clone())), Err(offline));
    assert_eq!(logout_outcome(Ok(())), Ok(()));
}

#[tokio::test]
async fn expired_session_is_refreshed_persisted_and_announced() {
    let mut fresh = session_json();
    fresh["access_token"] = json!("access-2");
    fresh["refresh_token"] = json!("refresh-2");
    fresh["expires_at"] = json!(now_unix() + 3600);
    let (url, server) = serve_once("200 OK", fresh.to_string());
    let backend = backend_at(&url);
    backend.persist_session(&expired_session());
    let mut sub = backend.on_auth_state_change();

    let session = backend.get_session().await.unwrap().unwrap();

    assert_eq!(session.access_token, "access-2");
    assert_eq!(backend.stored_session().map(|s| s.refresh_token), Some("refresh-2".to_owned()));
    let change = sub.next().await.unwrap();
    assert_eq!(change.event, AuthChangeEvent::TokenRefreshed);
    assert_eq!(change.session.map(|s| s.access_token), Some("access-2".to_owned()));

    let request = server.join().unwrap();
    assert!(request.starts_with("POST /auth/v1/token?grant_type=refresh_token "), "{request}");
    assert!(request.contains(r#""refresh_token":"refresh-1""#), "{request}");
    assert!(!request.contains("Bearer stale"), "{request}");
}

#[tokio::test]
async fn rejected_refresh_discards_stored_session() {
    let body = json!({ "error": "invalid_grant", "error_description": "Invalid Refresh Token: Already Used" });
    let (url, server) = serve_once("400 Bad Request", body.to_string());
    let backend = backend_at(&url);
    backend.persist_session(&expired_session());

    assert_eq!(backend.get_session().await, Ok(None));
    assert!(backend.storage.load(&backend.config().storage_key()).is_none());
    server.join().unwrap();
}

#[tokio::test]
async fn unreachable_refresh_keeps_stored_session() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let backend = backend_at(&url);
    backend.persist_session(&expired_session());

    assert!(matches!(backend.get_session().await, Err(BackendError::Request(_))));
    assert_eq!(backend.stored_session().map(|s| s.access_token), Some("stale".to_owned()));
}

#[tokio::test]
async fn unexpired_session_is_returned_without_network() {
    let backend = backend_at("http://127.0.0.1:1");
    let session = parse_session(&session_json().to_string()).unwrap();
    backend.persist_session(&session);

    assert_eq!(backend.get_session().await, Ok(Some(session)));
}
