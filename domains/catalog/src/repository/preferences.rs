//! Reads a user's favourite genres from the users collection

use std::sync::Arc;
use std::time::Duration;

use marquee_common::{collections, with_timeout, DocumentStore, Filter, Genre, Result};
use serde::Deserialize;

#[derive(Deserialize)]
struct FavouriteGenres {
    #[serde(default)]
    favourite_genres: Vec<Genre>,
}

#[derive(Clone)]
pub struct PreferenceRepository {
    store: Arc<dyn DocumentStore>,
    timeout: Duration,
}

impl PreferenceRepository {
    pub fn new(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Favourite genre names for a user. An unknown user has none.
    pub async fn favourite_genres(&self, user_id: &str) -> Result<Vec<String>> {
        let document = with_timeout(
            self.timeout,
            self.store
                .find_one(collections::USERS, &Filter::eq("user_id", user_id)),
        )
        .await?;

        let Some(document) = document else {
            tracing::debug!(user_id = %user_id, "No user record, no favourite genres");
            return Ok(Vec::new());
        };
        let record: FavouriteGenres = serde_json::from_value(document.into())?;
        Ok(record
            .favourite_genres
            .into_iter()
            .map(|genre| genre.genre_name)
            .collect())
    }
}
