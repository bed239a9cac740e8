//! Account lifecycle integration tests

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::common::{TestApp, ADMIN_PASSWORD, SEEDED_MOVIE};

fn registration(email: &str) -> Value {
    json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": email,
        "password": "analytical-engine",
        "favourite_genres": [{"genre_id": 1, "genre_name": "Drama"}]
    })
}

#[tokio::test]
async fn test_register_login_refresh_flow() {
    let app = TestApp::new().await.unwrap();

    let (status, registered) = app
        .send(Method::POST, "/users", registration("ada@marquee.test"), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registered["role"], "USER");
    let user_id = registered["user_id"].as_str().unwrap().to_string();

    // The issued pair is written back onto the user record
    let stored = app.stored_user(&user_id).await.unwrap();
    assert_eq!(stored["token"], registered["access_token"]);
    assert_eq!(stored["refresh_token"], registered["refresh_token"]);

    let access = registered["access_token"].as_str().unwrap();
    let (status, _) = app
        .send(Method::GET, &format!("/movies/{}", SEEDED_MOVIE), Value::Null, Some(access))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, logged_in) = app
        .send(
            Method::POST,
            "/users/login",
            json!({"email": "ada@marquee.test", "password": "analytical-engine"}),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logged_in["user_id"], user_id.as_str());

    let (status, refreshed) = app
        .send(
            Method::POST,
            "/users/refresh",
            json!({"refresh_token": logged_in["refresh_token"]}),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let stored = app.stored_user(&user_id).await.unwrap();
    assert_eq!(stored["refresh_token"], refreshed["refresh_token"]);
}

#[tokio::test]
async fn test_register_rejects_invalid_and_duplicate() {
    let app = TestApp::new().await.unwrap();

    let (status, body) = app
        .send(Method::POST, "/users", registration("not-an-email"), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = app
        .send(Method::POST, "/users", registration("viewer@marquee.test"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_registration_cannot_claim_admin() {
    let app = TestApp::new().await.unwrap();
    let mut body = registration("mallory@marquee.test");
    body["role"] = json!("ADMIN");

    let (status, registered) = app.send(Method::POST, "/users", body, None).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registered["role"], "USER");
}

#[tokio::test]
async fn test_seeded_admin_logs_in_with_admin_role() {
    let app = TestApp::new().await.unwrap();

    let (status, body) = app
        .send(
            Method::POST,
            "/users/login",
            json!({"email": app.admin.identity.email, "password": ADMIN_PASSWORD}),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "ADMIN");

    let token = body["access_token"].as_str().unwrap();
    let (status, _) = app
        .send(
            Method::PATCH,
            &format!("/movies/review/{}", SEEDED_MOVIE),
            json!({"admin_review": "Excellent from start to finish"}),
            Some(token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_the_same() {
    let app = TestApp::new().await.unwrap();

    let (wrong_status, wrong) = app
        .send(
            Method::POST,
            "/users/login",
            json!({"email": app.user.identity.email, "password": "guess"}),
            None,
        )
        .await;
    let (unknown_status, unknown) = app
        .send(
            Method::POST,
            "/users/login",
            json!({"email": "nobody@marquee.test", "password": "guess"}),
            None,
        )
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong, unknown);
}

#[tokio::test]
async fn test_list_users_hides_credentials() {
    let app = TestApp::new().await.unwrap();
    let token = app.access_token(&app.user);

    let (status, users) = app.send(Method::GET, "/users", Value::Null, Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 2);
    for user in users {
        assert!(user.get("password").is_none());
        assert!(user.get("token").is_none());
        assert!(user.get("refresh_token").is_none());
    }
}
