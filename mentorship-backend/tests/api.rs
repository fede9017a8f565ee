//! Requests that are answered before the database is needed.

mod common;

use axum::http::StatusCode;
use common::call;
use mentorship_backend::setup_server;
use mentorship_database::get_database_connection;
use pretty_assertions::assert_eq;
use serde_json::json;

fn app() -> axum::Router {
    // nothing listens on port 1, so any query fails fast
    let pool = get_database_connection("postgres://mentorship@127.0.0.1:1/mentorship").unwrap();
    setup_server(pool)
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = app();
    for uri in [
        "/themes",
        "/skills",
        "/groups",
        "/curators",
        "/students/3/suggestions",
        "/curators/1/works/2/steps/3/materials",
    ] {
        let (status, body) = call(&app, "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(
            body,
            json!({"error": "missing or unknown authentication token"})
        );
    }
}

#[tokio::test]
async fn logout_requires_a_token() {
    let (status, _) = call(&app(), "POST", "/logout", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let (status, _) = call(&app(), "GET", "/projects", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wrong_method_is_rejected() {
    let (status, _) = call(&app(), "PATCH", "/themes", None, None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn unreachable_database_is_a_server_error() {
    let (status, body) = call(&app(), "GET", "/themes", Some("abc"), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("database error"));
}
