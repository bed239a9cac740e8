//! Movie handlers
//!
//! - GET    /movies                   : List movies (public)
//! - GET    /movies/{imdb_id}         : Fetch one movie
//! - POST   /movies                   : Add a movie
//! - DELETE /movies/{imdb_id}         : Remove a movie
//! - GET    /movies/recommended       : Best ranked movies in the caller's favourite genres
//! - PATCH  /movies/review/{imdb_id}  : Admin review, ranked by the classifier

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use marquee_auth::{AdminUser, RequestIdentity};
use marquee_common::{Error, Genre, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::CatalogState;
use crate::domain::entities::{Movie, Ranking, RECOMMENDATION_LIMIT};

// ============================================================
// DTOs
// ============================================================

/// Request to add a movie
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMovieRequest {
    #[validate(length(min = 2, max = 20))]
    pub imdb_id: String,

    #[validate(length(min = 2, max = 500))]
    pub title: String,

    #[validate(url)]
    pub poster_path: String,

    #[validate(length(min = 1))]
    pub youtube_id: String,

    #[validate(length(min = 1), nested)]
    pub genre: Vec<Genre>,

    #[serde(default)]
    pub admin_review: String,

    #[validate(nested)]
    pub ranking: Ranking,
}

impl From<CreateMovieRequest> for Movie {
    fn from(request: CreateMovieRequest) -> Self {
        Self {
            imdb_id: request.imdb_id,
            title: request.title,
            poster_path: request.poster_path,
            youtube_id: request.youtube_id,
            genre: request.genre,
            admin_review: request.admin_review,
            ranking: request.ranking,
        }
    }
}

/// Outcome of a delete; a missing movie is reported, not an error
#[derive(Debug, Serialize)]
pub struct DeleteMovieResponse {
    pub deleted: bool,
    pub deleted_count: u64,
    pub message: String,
}

/// Request to set the admin review of a movie
#[derive(Debug, Deserialize, Validate)]
pub struct AdminReviewRequest {
    #[validate(length(min = 1, max = 5000))]
    pub admin_review: String,
}

#[derive(Debug, Serialize)]
pub struct AdminReviewResponse {
    pub ranking_name: String,
    pub admin_review: String,
}

const MOVIE_NOT_FOUND: &str = "Movie not found";

// ============================================================
// Handlers
// ============================================================

/// GET /movies: List all movies
pub async fn list_movies(State(state): State<CatalogState>) -> Result<Json<Vec<Movie>>> {
    let movies = state.repos.movies.list_all().await?;
    Ok(Json(movies))
}

/// GET /movies/{imdb_id}: Fetch a single movie
pub async fn get_movie(
    State(state): State<CatalogState>,
    Path(imdb_id): Path<String>,
) -> Result<Json<Movie>> {
    let movie = state
        .repos
        .movies
        .find_by_imdb_id(&imdb_id)
        .await?
        .ok_or_else(|| Error::NotFound(MOVIE_NOT_FOUND.to_string()))?;

    Ok(Json(movie))
}

/// POST /movies: Add a movie
pub async fn create_movie(
    identity: RequestIdentity,
    State(state): State<CatalogState>,
    ValidatedJson(request): ValidatedJson<CreateMovieRequest>,
) -> Result<(StatusCode, Json<Movie>)> {
    if state.repos.movies.exists(&request.imdb_id).await? {
        return Err(Error::Conflict(format!(
            "Movie {} already exists",
            request.imdb_id
        )));
    }

    let movie = Movie::from(request);
    state.repos.movies.create(&movie).await?;

    tracing::info!(
        imdb_id = %movie.imdb_id,
        created_by = %identity.user_id(),
        "Movie created"
    );

    Ok((StatusCode::CREATED, Json(movie)))
}

/// DELETE /movies/{imdb_id}: Remove a movie
pub async fn delete_movie(
    identity: RequestIdentity,
    State(state): State<CatalogState>,
    Path(imdb_id): Path<String>,
) -> Result<Json<DeleteMovieResponse>> {
    let deleted_count = state.repos.movies.delete(&imdb_id).await?;

    if deleted_count == 0 {
        return Ok(Json(DeleteMovieResponse {
            deleted: false,
            deleted_count,
            message: MOVIE_NOT_FOUND.to_string(),
        }));
    }

    tracing::info!(imdb_id = %imdb_id, deleted_by = %identity.user_id(), "Movie deleted");

    Ok(Json(DeleteMovieResponse {
        deleted: true,
        deleted_count,
        message: "Movie deleted".to_string(),
    }))
}

/// GET /movies/recommended: Movies in the caller's favourite genres
pub async fn recommended_movies(
    identity: RequestIdentity,
    State(state): State<CatalogState>,
) -> Result<Json<Vec<Movie>>> {
    let genres = state
        .repos
        .preferences
        .favourite_genres(identity.user_id())
        .await?;

    let movies = state
        .repos
        .movies
        .recommended(&genres, RECOMMENDATION_LIMIT)
        .await?;

    tracing::debug!(
        user_id = %identity.user_id(),
        genres = genres.len(),
        count = movies.len(),
        "Recommended movies"
    );

    Ok(Json(movies))
}

/// PATCH /movies/review/{imdb_id}: Set the admin review and its ranking
pub async fn update_review(
    admin: AdminUser,
    State(state): State<CatalogState>,
    Path(imdb_id): Path<String>,
    ValidatedJson(request): ValidatedJson<AdminReviewRequest>,
) -> Result<Json<AdminReviewResponse>> {
    if !state.repos.movies.exists(&imdb_id).await? {
        return Err(Error::NotFound(MOVIE_NOT_FOUND.to_string()));
    }

    let rankings = state.repos.rankings.list().await?;
    let candidates: Vec<String> = rankings
        .iter()
        .filter(|ranking| ranking.is_ranked())
        .map(|ranking| ranking.ranking_name.clone())
        .collect();

    let ranking_name = state
        .classifier
        .classify(&request.admin_review, &candidates)
        .await?;

    let ranking = rankings
        .into_iter()
        .find(|ranking| ranking.ranking_name == ranking_name)
        .ok_or_else(|| {
            Error::Upstream(format!("Classifier answered unknown ranking '{}'", ranking_name))
        })?;

    let matched = state
        .repos
        .movies
        .update_review(&imdb_id, &request.admin_review, &ranking)
        .await?;
    if matched == 0 {
        return Err(Error::NotFound(MOVIE_NOT_FOUND.to_string()));
    }

    tracing::info!(
        imdb_id = %imdb_id,
        reviewed_by = %admin.identity().user_id(),
        provider = state.classifier.provider(),
        ranking = %ranking.ranking_name,
        "Admin review updated"
    );

    Ok(Json(AdminReviewResponse {
        ranking_name: ranking.ranking_name,
        admin_review: request.admin_review,
    }))
}
