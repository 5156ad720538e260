mod common;

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use common::{BAD_REQUEST, INDEX, LOGIN, MemoryFiles, STYLE, UNAUTHORIZED};
use warden::app::{AppContext, ConnectionLimits};
use warden::auth::SessionStore;
use warden::http::connection::Connection;

struct Exchange {
    head: String,
    body: Vec<u8>,
    result: anyhow::Result<()>,
}

impl Exchange {
    fn status_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    fn header(&self, name: &str) -> Option<&str> {
        let prefix = format!("{}: ", name);
        self.head
            .lines()
            .skip(1)
            .find_map(|line| line.strip_prefix(prefix.as_str()))
    }
}

async fn exchange(context: AppContext, raw: &[u8]) -> Exchange {
    let (mut client, server) = tokio::io::duplex(64 * 1024);
    let task = tokio::spawn(async move { Connection::new(server, context).run().await });

    client.write_all(raw).await.unwrap();
    client.shutdown().await.unwrap();

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    let result = task.await.unwrap();

    let split = out
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|i| i + 4)
        .unwrap_or(out.len());
    let head = String::from_utf8_lossy(&out[..split]).into_owned();
    let body = out[split..].to_vec();

    Exchange { head, body, result }
}

#[tokio::test]
async fn test_login_page_without_cookie() {
    let ex = exchange(common::context(SessionStore::new()), b"GET /login HTTP/1.1\r\nHost: localhost\r\n\r\n").await;

    ex.result.as_ref().unwrap();
    assert_eq!(ex.status_line(), "HTTP/1.1 200 OK");
    assert_eq!(ex.header("Content-Length"), Some(LOGIN.len().to_string().as_str()));
    assert_eq!(ex.body, LOGIN);
}

#[tokio::test]
async fn test_login_with_session_cookie_redirects() {
    let sessions = SessionStore::new();
    let session = sessions.create(warden::auth::User::new("admin", "", "correct"));
    let raw = format!(
        "GET /login HTTP/1.1\r\nCookie: theme=dark; JSESSIONID={}\r\n\r\n",
        session.id
    );

    let ex = exchange(common::context(sessions), raw.as_bytes()).await;

    ex.result.as_ref().unwrap();
    assert_eq!(ex.status_line(), "HTTP/1.1 302 Found");
    assert_eq!(ex.header("Location"), Some("/index.html"));
    assert_eq!(ex.body, INDEX);
}

#[tokio::test]
async fn test_login_post_sets_cookie() {
    let sessions = SessionStore::new();
    let raw = b"POST /login HTTP/1.1\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: 30\r\n\r\naccount=admin&password=correct";

    let ex = exchange(common::context(sessions.clone()), raw).await;

    ex.result.as_ref().unwrap();
    assert_eq!(ex.status_line(), "HTTP/1.1 302 Found");
    let cookie = ex.header("Set-Cookie").expect("Set-Cookie header");
    let id = cookie.strip_prefix("JSESSIONID=").unwrap();
    assert!(sessions.is_authenticated(id));
    assert_eq!(ex.body, INDEX);
}

#[tokio::test]
async fn test_login_post_missing_password_is_bad_request() {
    let ex = exchange(
        common::context(SessionStore::new()),
        b"POST /login?account=admin HTTP/1.1\r\n\r\n",
    )
    .await;

    ex.result.as_ref().unwrap();
    assert_eq!(ex.status_line(), "HTTP/1.1 400 Bad Request");
    assert_eq!(ex.body, BAD_REQUEST);
}

#[tokio::test]
async fn test_login_post_wrong_password_is_unauthorized() {
    let ex = exchange(
        common::context(SessionStore::new()),
        b"POST /login?account=admin&password=nope HTTP/1.1\r\n\r\n",
    )
    .await;

    ex.result.as_ref().unwrap();
    assert_eq!(ex.status_line(), "HTTP/1.1 401 Unauthorized");
    assert_eq!(ex.body, UNAUTHORIZED);
}

#[tokio::test]
async fn test_legacy_query_login_wrong_password() {
    let ex = exchange(
        common::context(SessionStore::new()),
        b"GET /login?account=admin&password=wrong HTTP/1.1\r\n\r\n",
    )
    .await;

    ex.result.as_ref().unwrap();
    assert_eq!(ex.status_line(), "HTTP/1.1 401 Unauthorized");
    assert_eq!(ex.body, UNAUTHORIZED);
}

#[tokio::test]
async fn test_static_asset_with_accept() {
    let ex = exchange(
        common::context(SessionStore::new()),
        b"GET /style.css HTTP/1.1\r\nAccept: text/css,*/*;q=0.1\r\n\r\n",
    )
    .await;

    ex.result.as_ref().unwrap();
    assert_eq!(ex.status_line(), "HTTP/1.1 200 OK");
    assert_eq!(ex.header("Content-Type"), Some("text/css"));
    assert_eq!(ex.body, STYLE);
}

#[tokio::test]
async fn test_root_greeting() {
    let ex = exchange(common::context(SessionStore::new()), b"GET / HTTP/1.1\r\n\r\n").await;

    ex.result.as_ref().unwrap();
    assert_eq!(
        ex.head,
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 12\r\n\r\n"
    );
    assert_eq!(ex.body, b"Hello world!");
}

#[tokio::test]
async fn test_malformed_request_line_gets_400_then_error() {
    let ex = exchange(common::context(SessionStore::new()), b"GARBAGE\r\n\r\n").await;

    assert!(ex.result.is_err());
    assert_eq!(ex.status_line(), "HTTP/1.1 400 Bad Request");
    assert_eq!(ex.body, BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_header_gets_400_then_error() {
    let limits = ConnectionLimits {
        max_header_bytes: 256,
        ..ConnectionLimits::default()
    };
    let context = AppContext::new(
        Arc::new(MemoryFiles::standard()),
        common::users(),
        SessionStore::new(),
        limits,
    );
    let raw = format!("GET / HTTP/1.1\r\nX-Big: {}\r\n\r\n", "a".repeat(4096));

    let ex = exchange(context, raw.as_bytes()).await;

    let err = ex.result.as_ref().unwrap_err();
    assert!(err.to_string().contains("header block exceeds limit of 256 bytes"));
    assert_eq!(ex.status_line(), "HTTP/1.1 400 Bad Request");
    assert_eq!(ex.body, BAD_REQUEST);
}

#[tokio::test]
async fn test_parse_error_reported_when_400_cannot_be_sent() {
    let (mut client, server) = tokio::io::duplex(1024);
    client.write_all(b"GARBAGE\r\n\r\n").await.unwrap();
    drop(client);

    let err = Connection::new(server, common::context(SessionStore::new()))
        .run()
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("HTTP parse error"));
}

#[tokio::test]
async fn test_root_with_query_drops_connection() {
    let ex = exchange(common::context(SessionStore::new()), b"GET /?x=1 HTTP/1.1\r\n\r\n").await;

    let err = ex.result.as_ref().unwrap_err();
    assert!(err.to_string().contains("/?x=1"));
    assert!(ex.head.is_empty());
}

#[tokio::test]
async fn test_empty_stream_closes_silently() {
    let ex = exchange(common::context(SessionStore::new()), b"").await;

    assert!(ex.result.is_err());
    assert!(ex.head.is_empty());
    assert!(ex.body.is_empty());
}

#[tokio::test]
async fn test_unknown_legacy_route_drops_connection() {
    let ex = exchange(
        common::context(SessionStore::new()),
        b"GET /search?q=rust HTTP/1.1\r\n\r\n",
    )
    .await;

    let err = ex.result.as_ref().unwrap_err();
    assert!(err.to_string().contains("/search?q=rust"));
    assert!(ex.head.is_empty());
}

#[tokio::test]
async fn test_missing_file_drops_connection() {
    let ex = exchange(
        common::context(SessionStore::new()),
        b"GET /nope.html HTTP/1.1\r\n\r\n",
    )
    .await;

    assert!(ex.result.is_err());
    assert!(ex.head.is_empty());
}

#[tokio::test]
async fn test_short_body_drops_connection() {
    let ex = exchange(
        common::context(SessionStore::new()),
        b"POST /login HTTP/1.1\r\nContent-Length: 50\r\n\r\naccount=admin",
    )
    .await;

    assert!(ex.result.is_err());
    assert!(ex.head.is_empty());
}
