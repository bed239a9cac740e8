//! Authentication and authorization integration tests
//!
//! Token verification on protected routes, the admin gate, and the
//! behaviour of public routes without credentials.

use axum::http::{Method, StatusCode};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{TimeDelta, Utc};
use marquee_auth::{AuthConfig, TokenIssuer};
use serde_json::{json, Value};

use crate::common::{TestApp, SEEDED_MOVIE};

fn movie_uri() -> String {
    format!("/movies/{}", SEEDED_MOVIE)
}

fn review_uri() -> String {
    format!("/movies/review/{}", SEEDED_MOVIE)
}

/// Replace one dot-separated segment of a token
fn with_segment(token: &str, index: usize, segment: &str) -> String {
    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    parts[index] = segment.to_string();
    parts.join(".")
}

fn encode_json(value: &Value) -> String {
    URL_SAFE_NO_PAD.encode(value.to_string())
}

mod test_protected_routes {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_user_token_reads_movie() {
        let app = TestApp::new().await.unwrap();
        let token = app.access_token(&app.user);

        let (status, body) = app.send(Method::GET, &movie_uri(), Value::Null, Some(&token)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["imdb_id"], SEEDED_MOVIE);
        assert_eq!(body["title"], "The Shawshank Redemption");
    }

    #[test_log::test(tokio::test)]
    async fn test_delete_without_token_is_rejected_and_movie_kept() {
        let app = TestApp::new().await.unwrap();

        let (status, body) = app.send(Method::DELETE, &movie_uri(), Value::Null, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "MISSING_AUTHORIZATION");
        assert!(app.stored_movie(SEEDED_MOVIE).await.is_some());
    }

    #[test_log::test(tokio::test)]
    async fn test_user_cannot_review_and_movie_unchanged() {
        let app = TestApp::new().await.unwrap();
        let token = app.access_token(&app.user);
        let before = app.stored_movie(SEEDED_MOVIE).await.unwrap();

        let (status, body) = app
            .send(
                Method::PATCH,
                &review_uri(),
                json!({"admin_review": "Excellent"}),
                Some(&token),
            )
            .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "INSUFFICIENT_ROLE");
        assert_eq!(app.stored_movie(SEEDED_MOVIE).await.unwrap(), before);
    }

    #[test_log::test(tokio::test)]
    async fn test_token_expired_one_second_ago_is_rejected() {
        let app = TestApp::new().await.unwrap();
        let ttl = TimeDelta::hours(1);
        let issued_at = Utc::now() - ttl - TimeDelta::seconds(1);
        let token = app.access_token_with(&app.user, issued_at, ttl);

        let (status, body) = app.send(Method::GET, &movie_uri(), Value::Null, Some(&token)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_TOKEN");
    }

    #[test_log::test(tokio::test)]
    async fn test_token_close_to_expiry_is_accepted() {
        let app = TestApp::new().await.unwrap();
        let ttl = TimeDelta::hours(1);
        let issued_at = Utc::now() - ttl + TimeDelta::minutes(1);
        let token = app.access_token_with(&app.user, issued_at, ttl);

        let (status, _) = app.send(Method::GET, &movie_uri(), Value::Null, Some(&token)).await;

        assert_eq!(status, StatusCode::OK);
    }

    #[test_log::test(tokio::test)]
    async fn test_admin_passes_gate() {
        let app = TestApp::new().await.unwrap();
        let token = app.access_token(&app.admin);

        let (status, _) = app
            .send(
                Method::PATCH,
                &review_uri(),
                json!({"admin_review": "Good, if long"}),
                Some(&token),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
    }
}

mod test_credential_channel {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_bare_token_is_accepted() {
        let app = TestApp::new().await.unwrap();
        let token = app.access_token(&app.user);

        let (status, _) = app.request(Method::GET, &movie_uri(), Value::Null, Some(&token)).await;

        assert_eq!(status, StatusCode::OK);
    }

    #[test_log::test(tokio::test)]
    async fn test_lowercase_scheme_is_accepted() {
        let app = TestApp::new().await.unwrap();
        let header = format!("bearer {}", app.access_token(&app.user));

        let (status, _) = app
            .request(Method::GET, &movie_uri(), Value::Null, Some(&header))
            .await;

        assert_eq!(status, StatusCode::OK);
    }

    #[test_log::test(tokio::test)]
    async fn test_empty_bearer_is_missing_token() {
        let app = TestApp::new().await.unwrap();

        for header in ["Bearer ", "Bearer", ""] {
            let (status, body) = app
                .request(Method::GET, &movie_uri(), Value::Null, Some(header))
                .await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "header {:?}", header);
            assert_eq!(body["error"]["code"], "MISSING_AUTHORIZATION", "header {:?}", header);
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_garbage_token_is_rejected_generically() {
        let app = TestApp::new().await.unwrap();

        let (status, body) = app
            .send(Method::GET, &movie_uri(), Value::Null, Some("not-a-token"))
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_TOKEN");
        assert_eq!(body["error"]["message"], "Invalid or expired token");
    }
}

mod test_token_tampering {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_refresh_token_is_not_an_access_token() {
        let app = TestApp::new().await.unwrap();
        let refresh_token = app.tokens_for(&app.user).refresh_token;

        let (status, _) = app
            .send(Method::GET, &movie_uri(), Value::Null, Some(&refresh_token))
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test_log::test(tokio::test)]
    async fn test_token_from_other_secret_is_rejected() {
        let app = TestApp::new().await.unwrap();
        let foreign = AuthConfig::new("someone-elses-access", "someone-elses-refresh")
            .unwrap()
            .with_issuer(app.auth_config.issuer());
        let token = TokenIssuer::new(foreign)
            .issue(&app.user.identity)
            .unwrap()
            .access_token;

        let (status, _) = app.send(Method::GET, &movie_uri(), Value::Null, Some(&token)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test_log::test(tokio::test)]
    async fn test_role_escalation_in_payload_is_rejected() {
        let app = TestApp::new().await.unwrap();
        let token = app.access_token(&app.user);

        let payload = token.split('.').nth(1).unwrap();
        let mut claims: Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();
        claims["role"] = json!("ADMIN");
        let forged = with_segment(&token, 1, &encode_json(&claims));

        let (status, _) = app
            .send(
                Method::PATCH,
                &review_uri(),
                json!({"admin_review": "Terrible"}),
                Some(&forged),
            )
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let stored = app.stored_movie(SEEDED_MOVIE).await.unwrap();
        assert_eq!(stored["admin_review"], "");
    }

    #[test_log::test(tokio::test)]
    async fn test_other_declared_algorithms_are_rejected() {
        let app = TestApp::new().await.unwrap();
        let token = app.access_token(&app.user);

        for alg in ["none", "HS512", "RS256"] {
            let header = encode_json(&json!({"alg": alg, "typ": "JWT"}));
            let forged = with_segment(&token, 0, &header);

            let (status, _) = app.send(Method::GET, &movie_uri(), Value::Null, Some(&forged)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "alg {}", alg);
        }

        let header = encode_json(&json!({"alg": "none", "typ": "JWT"}));
        let unsigned = with_segment(&with_segment(&token, 0, &header), 2, "");
        let (status, _) = app.send(Method::GET, &movie_uri(), Value::Null, Some(&unsigned)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

mod test_public_routes {
    use super::*;

    #[tokio::test]
    async fn test_public_routes_need_no_token() {
        let app = TestApp::new().await.unwrap();

        let (status, movies) = app.send(Method::GET, "/movies", Value::Null, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(movies.as_array().unwrap().len(), 1);

        let (status, _) = app.send(Method::GET, "/health", Value::Null, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app.send(Method::GET, "/", Value::Null, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_public_routes_ignore_bad_tokens() {
        let app = TestApp::new().await.unwrap();

        let (status, _) = app.send(Method::GET, "/movies", Value::Null, Some("garbage")).await;
        assert_eq!(status, StatusCode::OK);
    }
}
