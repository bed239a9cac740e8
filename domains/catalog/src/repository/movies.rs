//! Movie repository

use std::sync::Arc;
use std::time::Duration;

use marquee_common::{
    collections, from_document, to_document, with_timeout, Document, DocumentStore, Filter,
    FindOptions, Result, SortOrder,
};
use serde_json::Value;

use crate::domain::entities::{Movie, Ranking};

#[derive(Clone)]
pub struct MovieRepository {
    store: Arc<dyn DocumentStore>,
    timeout: Duration,
}

impl MovieRepository {
    pub fn new(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// List every movie
    pub async fn list_all(&self) -> Result<Vec<Movie>> {
        self.find(Filter::all(), FindOptions::default()).await
    }

    /// Find movie by IMDb id
    pub async fn find_by_imdb_id(&self, imdb_id: &str) -> Result<Option<Movie>> {
        let document = with_timeout(
            self.timeout,
            self.store
                .find_one(collections::MOVIES, &Filter::eq("imdb_id", imdb_id)),
        )
        .await?;

        match document {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }

    /// Whether a movie with this IMDb id is stored
    pub async fn exists(&self, imdb_id: &str) -> Result<bool> {
        let count = with_timeout(
            self.timeout,
            self.store
                .count_documents(collections::MOVIES, &Filter::eq("imdb_id", imdb_id)),
        )
        .await?;
        Ok(count > 0)
    }

    /// Insert a new movie record
    pub async fn create(&self, movie: &Movie) -> Result<()> {
        let document = to_document(movie)?;
        with_timeout(
            self.timeout,
            self.store.insert_one(collections::MOVIES, document),
        )
        .await?;
        Ok(())
    }

    /// Delete a movie, returning the number of removed records
    pub async fn delete(&self, imdb_id: &str) -> Result<u64> {
        let deleted = with_timeout(
            self.timeout,
            self.store
                .delete_one(collections::MOVIES, &Filter::eq("imdb_id", imdb_id)),
        )
        .await?;
        Ok(deleted)
    }

    /// Set the admin review and its ranking, returning the matched count
    pub async fn update_review(
        &self,
        imdb_id: &str,
        review: &str,
        ranking: &Ranking,
    ) -> Result<u64> {
        let mut patch = Document::new();
        patch.insert("admin_review".to_string(), Value::from(review));
        patch.insert("ranking".to_string(), serde_json::to_value(ranking)?);

        let matched = with_timeout(
            self.timeout,
            self.store.update_one(
                collections::MOVIES,
                &Filter::eq("imdb_id", imdb_id),
                patch,
            ),
        )
        .await?;
        Ok(matched)
    }

    /// Movies in any of the given genres, best ranked first
    pub async fn recommended(&self, genre_names: &[String], limit: usize) -> Result<Vec<Movie>> {
        let values = genre_names.iter().map(|name| Value::from(name.as_str())).collect();
        self.find(
            Filter::any_of("genre.genre_name", values),
            FindOptions::default()
                .sorted_by("ranking.ranking_value", SortOrder::Ascending)
                .limit(limit),
        )
        .await
    }

    async fn find(&self, filter: Filter, options: FindOptions) -> Result<Vec<Movie>> {
        let documents = with_timeout(
            self.timeout,
            self.store.find(collections::MOVIES, &filter, &options),
        )
        .await?;

        let movies = documents
            .into_iter()
            .map(from_document::<Movie>)
            .collect::<std::result::Result<Vec<Movie>, _>>()?;
        Ok(movies)
    }
}
