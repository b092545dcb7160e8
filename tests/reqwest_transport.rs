// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Integration tests for the reqwest transport
//!
//! These run the full pipeline against a local mock server:
//! - Cookie replay and Set-Cookie merging across sends
//! - POST form encoding, HEAD, redirect policy
//! - Transport error codes for timeouts and refused connections

use std::time::Duration;

use easyhttp::transport::codes;
use easyhttp::{HttpRequest, Method, RequestConfig, ReqwestTransport};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_cookie_replayed_on_next_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "sid=abc; Path=/; HttpOnly")
                .set_body_string("welcome"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/account"))
        .and(header("cookie", "sid=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("account"))
        .mount(&server)
        .await;

    let mut request = HttpRequest::new(format!("{}/login", server.uri()), Method::Get);
    request.send().await.unwrap();

    let login = request.response().unwrap();
    assert_eq!(login.status_code, 200);
    assert_eq!(login.text(), Some("welcome"));
    assert_eq!(login.set_cookies(), &["sid=abc; Path=/; HttpOnly"]);
    assert_eq!(login.cookie_string, "sid=abc");

    request.open(format!("{}/account", server.uri()), Method::Get);
    request.send().await.unwrap();
    assert_eq!(request.to_string(), "account");
}

#[tokio::test]
async fn test_post_form() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submit"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("user=alice&note=a+b"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = HttpRequest::new(format!("{}/submit", server.uri()), Method::Post);
    request
        .send_body(vec![("user", "alice"), ("note", "a b")])
        .await
        .unwrap();

    assert_eq!(request.response().unwrap().status_code, 201);
}

#[tokio::test]
async fn test_custom_headers_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("x-token", "t1"))
        .and(header("accept-language", "zh-cn"))
        .and(header("pragma", "no-cache"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = HttpRequest::new(server.uri(), Method::Get);
    request.add_header("X-Token", "t1");
    request.send().await.unwrap();

    let response = request.response().unwrap();
    assert!(response.request_headers.contains(&"X-Token: t1".to_string()));
}

#[tokio::test]
async fn test_head_has_no_body() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).insert_header("x-probe", "yes"))
        .mount(&server)
        .await;

    let mut request = HttpRequest::new(server.uri(), Method::Head);
    request.send().await.unwrap();

    let response = request.response().unwrap();
    assert!(response.body.is_empty());
    assert_eq!(response.header("X-Probe"), Some("yes"));
    assert!(response.response_headers_raw.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.response_headers_raw.contains("x-probe: yes\r\n"));
}

#[tokio::test]
async fn test_redirect_policy() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/new"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
        .mount(&server)
        .await;

    let mut request = HttpRequest::new(format!("{}/old", server.uri()), Method::Get);
    request.send().await.unwrap();
    assert_eq!(request.response().unwrap().status_code, 302);
    assert_eq!(request.response().unwrap().header("location"), Some("/new"));

    request.set_follow_redirects(true);
    request.send().await.unwrap();
    assert_eq!(request.response().unwrap().status_code, 200);
    assert_eq!(request.to_string(), "moved");
}

#[tokio::test]
async fn test_redirect_hop_cookies_reach_jar() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("set-cookie", "sid=abc; Path=/")
                .insert_header("location", "/home"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/home"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "lang=en")
                .set_body_string("home"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut request = HttpRequest::new(format!("{}/login", server.uri()), Method::Post);
    request.set_follow_redirects(true);
    request.send_body(vec![("user", "alice")]).await.unwrap();

    let response = request.response().unwrap();
    assert_eq!(response.status_code, 200);
    assert_eq!(response.text(), Some("home"));
    assert!(response.response_headers_raw.starts_with("HTTP/1.1 302 Found\r\n"));
    assert!(response.response_headers_raw.contains("\r\n\r\nHTTP/1.1 200 OK\r\n"));
    assert_eq!(response.set_cookies(), &["sid=abc; Path=/", "lang=en"]);

    let jar = request.cookie_jar();
    assert_eq!(jar.get("sid").as_deref(), Some("abc"));
    assert_eq!(jar.get("lang").as_deref(), Some("en"));
}

#[tokio::test]
async fn test_temporary_redirect_keeps_method_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(307).insert_header("location", "/new"))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/new"))
        .and(body_string("a=1"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = HttpRequest::new(format!("{}/old", server.uri()), Method::Post);
    request.set_follow_redirects(true);
    request.send_body("a=1").await.unwrap();

    assert_eq!(request.response().unwrap().status_code, 201);
}

#[tokio::test]
async fn test_redirect_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/loop"))
        .mount(&server)
        .await;

    let config = RequestConfig::new()
        .url(format!("{}/loop", server.uri()))
        .follow_redirects(true);
    let mut request =
        HttpRequest::with_transport(config, ReqwestTransport::new().max_redirects(2));
    let err = request.send().await.unwrap_err();

    assert_eq!(err.transport_code(), Some(codes::TOO_MANY_REDIRECTS));
    assert!(request.response().is_none());
}

#[tokio::test]
async fn test_host_override() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .mount(&server)
        .await;

    let port = server.address().port();
    let mut request = HttpRequest::new(format!("http://easyhttp.test:{}/ping", port), Method::Get);
    request.add_host_override(format!("easyhttp.test:{}:127.0.0.1", port));
    request.send().await.unwrap();

    assert_eq!(request.to_string(), "pong");
}

#[tokio::test]
async fn test_timeout_reports_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let mut request = HttpRequest::new(server.uri(), Method::Get);
    request.set_timeout(Duration::from_millis(200));
    let err = request.send().await.unwrap_err();

    assert!(err.is_timeout(), "unexpected error: {}", err);
    assert!(request.response().is_none());
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let mut request = HttpRequest::new(format!("http://127.0.0.1:{}/", port), Method::Get);
    let err = request.send().await.unwrap_err();

    assert_eq!(err.transport_code(), Some(codes::COULDNT_CONNECT));
}
