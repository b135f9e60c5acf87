mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_register_sets_session_cookie() {
    let (state, _db) = common::create_test_state();
    let server = common::test_server(state);

    let response = server
        .post("/api/users/register")
        .json(&json!({
            "email": "Ada@Example.com",
            "password": "secret123",
            "first_name": "Ada",
            "last_name": "Lovelace"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let cookie = response.header("set-cookie");
    let cookie = cookie.to_str().unwrap();
    assert!(cookie.starts_with("auth_token="));
    assert!(cookie.contains("HttpOnly"));

    let json = response.json::<serde_json::Value>();
    assert!(json["token"].is_string());
    assert!(json["user_id"].is_i64());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let (state, _db) = common::create_test_state();
    common::create_user(&state, "ada@example.com", false).await;
    let server = common::test_server(state);

    let response = server
        .post("/api/users/register")
        .json(&json!({
            "email": "ADA@example.com",
            "password": "secret123",
            "first_name": "Ada",
            "last_name": "Lovelace"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_validation() {
    let (state, _db) = common::create_test_state();
    let server = common::test_server(state);

    let response = server
        .post("/api/users/register")
        .json(&json!({
            "email": "not-an-email",
            "password": "123",
            "first_name": "",
            "last_name": "Lovelace"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_login_and_validate_token() {
    let (state, _db) = common::create_test_state();
    let user = common::create_user(&state, "ada@example.com", false).await;
    let server = common::test_server(state);

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "ada@example.com", "password": "secret123" }))
        .await;

    response.assert_status_ok();
    let token = response.json::<serde_json::Value>()["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server
        .get("/api/auth/validate-token")
        .add_header("Authorization", common::bearer(&token))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["user_id"], user.id);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (state, _db) = common::create_test_state();
    common::create_user(&state, "ada@example.com", false).await;
    let server = common::test_server(state);

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "ada@example.com", "password": "wrong-password" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["message"],
        "Invalid credentials"
    );
}

#[tokio::test]
async fn test_cookie_authenticates() {
    let (state, _db) = common::create_test_state();
    let (user, token) = common::login_as(&state, "ada@example.com", false).await;
    let server = common::test_server(state);

    let response = server
        .get("/api/users/me")
        .add_header("Cookie", format!("theme=dark; auth_token={token}"))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["id"], user.id);
    assert_eq!(json["email"], "ada@example.com");
    assert!(json.get("password_hash").is_none());
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let (state, _db) = common::create_test_state();
    let server = common::test_server(state);

    let response = server.get("/api/my-bookings").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let (state, _db) = common::create_test_state();
    let (_user, token) = common::login_as(&state, "ada@example.com", false).await;
    let server = common::test_server(state);

    let response = server
        .post("/api/auth/logout")
        .add_header("Authorization", common::bearer(&token))
        .await;

    response.assert_status_ok();
    let cookie = response.header("set-cookie");
    assert!(cookie.to_str().unwrap().contains("Max-Age=0"));

    let response = server
        .get("/api/auth/validate-token")
        .add_header("Authorization", common::bearer(&token))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}
