//! PostgreSQL document store
//!
//! Every collection lives in the single `documents` table as JSONB bodies.
//! Filter conditions compile to `jsonb_path_exists` predicates; the jsonpath
//! text is assembled from validated path segments and the compared values
//! are always bound as parameters.

use async_trait::async_trait;
use marquee_common::db::path_segments;
use marquee_common::{Document, DocumentStore, Filter, FindOptions, SortOrder, StoreError};
use serde_json::json;
use sqlx::postgres::{PgPoolOptions, Postgres};
use sqlx::types::Json;
use sqlx::{PgPool, QueryBuilder};

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool against `database_url`
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(format!("migration failed: {}", e)))
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT body FROM documents");
        push_selection(&mut query, collection, filter)?;
        query.push(" ORDER BY id LIMIT 1");

        let body = query
            .build_query_scalar::<Json<Document>>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(body.map(|Json(document)| document))
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT body FROM documents");
        push_selection(&mut query, collection, filter)?;

        query.push(" ORDER BY ");
        if let Some((path, order)) = &options.sort {
            let segments: Vec<String> = path_segments(path)?
                .into_iter()
                .map(str::to_string)
                .collect();
            query.push("body #> ");
            query.push_bind(segments);
            query.push("::text[]");
            query.push(match order {
                SortOrder::Ascending => " ASC NULLS LAST, ",
                SortOrder::Descending => " DESC NULLS FIRST, ",
            });
        }
        query.push("id");

        if let Some(limit) = options.limit {
            query.push(" LIMIT ");
            query.push_bind(limit as i64);
        }

        let bodies = query
            .build_query_scalar::<Json<Document>>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(bodies.into_iter().map(|Json(document)| document).collect())
    }

    async fn count_documents(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM documents");
        push_selection(&mut query, collection, filter)?;

        let count = query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count.max(0) as u64)
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO documents (collection, body) VALUES ($1, $2)")
            .bind(collection)
            .bind(Json(document))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        patch: Document,
    ) -> Result<u64, StoreError> {
        let mut query = QueryBuilder::<Postgres>::new("UPDATE documents SET body = body || ");
        query.push_bind(Json(patch));
        query.push(", updated_at = NOW() WHERE id = (SELECT id FROM documents");
        push_selection(&mut query, collection, filter)?;
        query.push(" ORDER BY id LIMIT 1)");

        let result = query
            .build()
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let mut query = QueryBuilder::<Postgres>::new(
            "DELETE FROM documents WHERE id = (SELECT id FROM documents",
        );
        push_selection(&mut query, collection, filter)?;
        query.push(" ORDER BY id LIMIT 1)");

        let result = query
            .build()
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}

/// Append `WHERE collection = $n AND <conditions>` to the query
fn push_selection(
    query: &mut QueryBuilder<'_, Postgres>,
    collection: &str,
    filter: &Filter,
) -> Result<(), StoreError> {
    filter.validate()?;

    query.push(" WHERE collection = ");
    query.push_bind(collection.to_string());

    for condition in filter.conditions() {
        let jsonpath = condition_jsonpath(&condition.segments()?);
        query.push(" AND jsonb_path_exists(body, '");
        query.push(jsonpath);
        query.push("'::jsonpath, ");
        query.push_bind(Json(json!({ "vals": condition.values })));
        query.push("::jsonb)");
    }
    Ok(())
}

/// Lax-mode jsonpath testing whether any value at the path equals any of `$vals`.
///
/// Lax mode unwraps arrays on member access, so `genre.genre_name` reaches
/// into each element of a `genre` array.
fn condition_jsonpath(segments: &[&str]) -> String {
    let mut path = String::from("$");
    for segment in segments {
        path.push_str(".\"");
        path.push_str(segment);
        path.push('"');
    }
    path.push_str(" ? (@ == $vals[*])");
    path
}

fn map_sqlx_error(error: sqlx::Error) -> StoreError {
    match error {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::AlreadyExists,
        other => {
            tracing::error!(error = %other, "Document store query failed");
            StoreError::Backend(other.to_string())
        }
    }
}
