//! Catalog integration tests

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::common::{TestApp, SEEDED_MOVIE};

fn movie(imdb_id: &str, genre: &str, ranking_value: i32) -> Value {
    json!({
        "imdb_id": imdb_id,
        "title": format!("Feature {}", imdb_id),
        "poster_path": format!("https://posters.marquee.test/{}.jpg", imdb_id),
        "youtube_id": "dQw4w9WgXcQ",
        "genre": [{"genre_id": 9, "genre_name": genre}],
        "ranking": {"ranking_value": ranking_value, "ranking_name": "Seeded"}
    })
}

#[tokio::test]
async fn test_admin_review_is_classified_and_stored() {
    let app = TestApp::new().await.unwrap();
    let token = app.access_token(&app.admin);

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/movies/review/{}", SEEDED_MOVIE),
            json!({"admin_review": "Simply excellent storytelling"}),
            Some(&token),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ranking_name"], "Excellent");
    assert_eq!(body["admin_review"], "Simply excellent storytelling");

    let stored = app.stored_movie(SEEDED_MOVIE).await.unwrap();
    assert_eq!(stored["admin_review"], "Simply excellent storytelling");
    assert_eq!(stored["ranking"], json!({"ranking_value": 1, "ranking_name": "Excellent"}));
}

#[tokio::test]
async fn test_admin_review_of_missing_movie() {
    let app = TestApp::new().await.unwrap();
    let token = app.access_token(&app.admin);

    let (status, body) = app
        .send(
            Method::PATCH,
            "/movies/review/tt0000000",
            json!({"admin_review": "Good"}),
            Some(&token),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_admin_review_requires_body() {
    let app = TestApp::new().await.unwrap();
    let token = app.access_token(&app.admin);

    let (status, _) = app
        .send(
            Method::PATCH,
            &format!("/movies/review/{}", SEEDED_MOVIE),
            json!({"admin_review": ""}),
            Some(&token),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommendations_follow_favourite_genres() {
    let app = TestApp::new().await.unwrap();
    let token = app.access_token(&app.user);

    for (id, genre, value) in [
        ("tt1000001", "Drama", 4),
        ("tt1000002", "Drama", 2),
        ("tt1000003", "Comedy", 1),
        ("tt1000004", "Drama", 3),
        ("tt1000005", "Drama", 5),
        ("tt1000006", "Drama", 1),
    ] {
        let (status, _) = app
            .send(Method::POST, "/movies", movie(id, genre, value), Some(&token))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, picks) = app
        .send(Method::GET, "/movies/recommended", Value::Null, Some(&token))
        .await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = picks
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["imdb_id"].as_str().unwrap())
        .collect();
    // The seeded movie is unranked (0) and sorts first
    assert_eq!(
        ids,
        vec![SEEDED_MOVIE, "tt1000006", "tt1000002", "tt1000004", "tt1000001"]
    );
}

#[tokio::test]
async fn test_create_and_delete_movie() {
    let app = TestApp::new().await.unwrap();
    let token = app.access_token(&app.user);

    let (status, _) = app
        .send(Method::POST, "/movies", movie("tt2000001", "Crime", 2), Some(&token))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .send(Method::POST, "/movies", movie("tt2000001", "Crime", 2), Some(&token))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .send(Method::DELETE, "/movies/tt2000001", Value::Null, Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);
    assert!(app.stored_movie("tt2000001").await.is_none());

    let (status, body) = app
        .send(Method::DELETE, "/movies/tt2000001", Value::Null, Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], false);
    assert_eq!(body["deleted_count"], 0);
}
