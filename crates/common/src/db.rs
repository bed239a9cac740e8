//! Document store contract shared by every domain
//!
//! Domains never talk to a database driver directly. They depend on the
//! narrow [`DocumentStore`] trait: JSON documents grouped in named
//! collections, selected with equality filters over dotted field paths.
//! Concrete backends live in `marquee-store`.

use std::cmp::Ordering;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// A stored document: a JSON object
pub type Document = Map<String, Value>;

/// Collection names used across domains
pub mod collections {
    pub const USERS: &str = "users";
    pub const MOVIES: &str = "movies";
    pub const RANKINGS: &str = "rankings";
}

/// Storage-specific error types
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Record already exists")]
    AlreadyExists,

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Storage operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// A single condition: the value found at `path` equals one of `values`.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub path: String,
    pub values: Vec<Value>,
}

impl Condition {
    /// Split the dotted path into validated segments.
    ///
    /// Segments are restricted to `[A-Za-z0-9_]` so that backends can embed
    /// them in query languages without escaping.
    pub fn segments(&self) -> Result<Vec<&str>, StoreError> {
        path_segments(&self.path)
    }

    fn matches(&self, document: &Document) -> bool {
        let Ok(segments) = self.segments() else {
            return false;
        };
        let mut found = Vec::new();
        if let Some((head, rest)) = segments.split_first() {
            if let Some(value) = document.get(*head) {
                collect_values(value, rest, &mut found);
            }
        }
        found
            .iter()
            .any(|candidate| self.values.iter().any(|wanted| wanted == *candidate))
    }
}

/// Conjunction of [`Condition`]s. An empty filter selects every document.
///
/// Paths traverse arrays: `genre.genre_name` matches a document whose
/// `genre` array holds any object with a matching `genre_name`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// Filter selecting every document
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter on a single field equality
    pub fn eq(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and_eq(path, value)
    }

    /// Filter on a field matching any of the given values
    pub fn any_of(path: impl Into<String>, values: Vec<Value>) -> Self {
        Self::all().and_any_of(path, values)
    }

    /// Add an equality condition
    pub fn and_eq(self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and_any_of(path, vec![value.into()])
    }

    /// Add a membership condition
    pub fn and_any_of(mut self, path: impl Into<String>, values: Vec<Value>) -> Self {
        self.conditions.push(Condition {
            path: path.into(),
            values,
        });
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Reject filters with malformed paths before they reach a backend
    pub fn validate(&self) -> Result<(), StoreError> {
        for condition in &self.conditions {
            condition.segments()?;
        }
        Ok(())
    }

    /// Evaluate the filter against a document
    pub fn matches(&self, document: &Document) -> bool {
        self.conditions.iter().all(|c| c.matches(document))
    }
}

/// Sort direction for [`FindOptions`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Options for multi-document reads
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub sort: Option<(String, SortOrder)>,
    pub limit: Option<usize>,
}

impl FindOptions {
    pub fn sorted_by(mut self, path: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some((path.into(), order));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Order two documents by the configured sort path.
    ///
    /// Documents missing the field sort after present ones in ascending
    /// order and before them in descending order.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let Some((path, order)) = &self.sort else {
            return Ordering::Equal;
        };
        let Ok(segments) = path_segments(path) else {
            return Ordering::Equal;
        };
        let ordering = match (first_value(a, &segments), first_value(b, &segments)) {
            (Some(x), Some(y)) => compare_values(x, y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// Narrow storage interface consumed by the domains.
///
/// Mirrors the document-database operations the application needs:
/// single and multi reads, counting, inserting, a `$set`-style patch of
/// top-level fields, and single deletes.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_one(&self, collection: &str, filter: &Filter)
        -> Result<Option<Document>, StoreError>;

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Document>, StoreError>;

    async fn count_documents(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;

    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError>;

    /// Merge `patch` into the first matching document. Returns the matched count.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        patch: Document,
    ) -> Result<u64, StoreError>;

    /// Delete the first matching document. Returns the deleted count.
    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;
}

/// Run a store call under a deadline
pub async fn with_timeout<T, F>(limit: Duration, operation: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(limit, operation)
        .await
        .map_err(|_| StoreError::Timeout(limit))?
}

/// Serialize a value into a [`Document`]
pub fn to_document<T: serde::Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::InvalidDocument(format!(
            "expected a JSON object, got {}",
            other
        ))),
        Err(e) => Err(StoreError::InvalidDocument(e.to_string())),
    }
}

/// Deserialize a [`Document`] into a typed value
pub fn from_document<T: serde::de::DeserializeOwned>(document: Document) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(document))
        .map_err(|e| StoreError::InvalidDocument(e.to_string()))
}

/// Split a dotted field path into segments restricted to `[A-Za-z0-9_]`
pub fn path_segments(path: &str) -> Result<Vec<&str>, StoreError> {
    let segments: Vec<&str> = path.split('.').collect();
    let valid = segments.iter().all(|s| {
        !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    });
    if valid {
        Ok(segments)
    } else {
        Err(StoreError::InvalidFilter(format!("invalid field path '{}'", path)))
    }
}

fn collect_values<'a>(value: &'a Value, segments: &[&str], found: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_values(item, segments, found);
            }
        }
        _ => match segments.split_first() {
            None => found.push(value),
            Some((head, rest)) => {
                if let Some(next) = value.get(*head) {
                    collect_values(next, rest, found);
                }
            }
        },
    }
}

fn first_value<'a>(document: &'a Document, segments: &[&str]) -> Option<&'a Value> {
    let (head, rest) = segments.split_first()?;
    let mut found = Vec::new();
    collect_values(document.get(*head)?, rest, &mut found);
    found.into_iter().find(|v| !v.is_null())
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
