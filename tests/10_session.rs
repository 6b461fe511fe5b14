mod common;

use anyhow::Result;
use axum::http::{header, StatusCode};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn root_returns_liveness_text() -> Result<()> {
    let app = common::test_app();

    let response = app.oneshot(common::get("/", None)).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_text(response).await?;
    assert!(body.contains("running"), "unexpected body: {}", body);
    Ok(())
}

#[tokio::test]
async fn health_reports_store_ok() -> Result<()> {
    let app = common::test_app();

    let response = app.oneshot(common::get("/health", None)).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await?;
    assert_eq!(body["success"], true);
    Ok(())
}

#[tokio::test]
async fn jwt_sets_session_cookie() -> Result<()> {
    let app = common::test_app();

    let response = app
        .oneshot(common::post_json("/jwt", json!({ "email": "a@b.com" }), None))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()?
        .to_string();
    assert!(set_cookie.starts_with("token="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Secure"));
    assert!(set_cookie.contains("SameSite=None"));
    assert!(set_cookie.contains("Max-Age=3600"));

    let body = common::body_json(response).await?;
    assert_eq!(body, json!({ "success": true }));
    Ok(())
}

#[tokio::test]
async fn jwt_rejects_identity_without_email() -> Result<()> {
    let app = common::test_app();

    let response = app
        .oneshot(common::post_json("/jwt", json!({ "email": "not-an-email" }), None))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["email"].is_string());
    Ok(())
}

#[tokio::test]
async fn logout_clears_session_cookie() -> Result<()> {
    let app = common::test_app();
    let cookie = common::login(&app, "a@b.com").await?;

    let response = app
        .oneshot(common::post_json("/logOut", json!({}), Some(&cookie)))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()?
        .to_string();
    // Removal cookie: empty value, immediate expiry, same attributes as
    // issuance so cross-site browsers accept it
    assert!(set_cookie.starts_with("token=;"), "got: {}", set_cookie);
    assert!(set_cookie.contains("Max-Age=0"));
    assert!(set_cookie.contains("Secure"));
    assert!(set_cookie.contains("SameSite=None"));
    assert!(set_cookie.contains("Path=/"));

    let body = common::body_json(response).await?;
    assert_eq!(body, json!({ "success": true }));
    Ok(())
}

#[tokio::test]
async fn logout_without_session_still_sends_removal_cookie() -> Result<()> {
    let app = common::test_app();

    let response = app
        .oneshot(common::post_json("/logOut", json!({}), None))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()?
        .to_string();
    assert!(set_cookie.starts_with("token=;"), "got: {}", set_cookie);
    assert!(set_cookie.contains("Max-Age=0"));
    Ok(())
}

#[tokio::test]
async fn malformed_json_body_gets_error_envelope() -> Result<()> {
    let app = common::test_app();

    let response = app
        .oneshot(common::post_raw("/jwt", "{ not json", None))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["message"].is_string());
    Ok(())
}

#[tokio::test]
async fn protected_route_without_cookie_is_unauthorized() -> Result<()> {
    let app = common::test_app();

    let response = app.oneshot(common::get("/bookings", None)).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = common::body_json(response).await?;
    assert_eq!(body["message"], "Unauthorized Access");
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn protected_route_with_invalid_token_is_unauthorized() -> Result<()> {
    let app = common::test_app();

    let response = app
        .oneshot(common::get("/bookings", Some("token=not-a-real-token")))
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = common::body_json(response).await?;
    assert_eq!(body["message"], "Unauthorized Access");
    Ok(())
}

#[tokio::test]
async fn issued_token_authenticates_protected_routes() -> Result<()> {
    let app = common::test_app();
    let cookie = common::login(&app, "a@b.com").await?;

    let response = app
        .oneshot(common::get("/bookings", Some(&cookie)))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await?;
    assert_eq!(body, json!([]));
    Ok(())
}
