//! Ranking repository

use std::sync::Arc;
use std::time::Duration;

use marquee_common::{
    collections, from_document, with_timeout, DocumentStore, Filter, FindOptions, Result,
    SortOrder,
};

use crate::domain::entities::Ranking;

#[derive(Clone)]
pub struct RankingRepository {
    store: Arc<dyn DocumentStore>,
    timeout: Duration,
}

impl RankingRepository {
    pub fn new(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Every ranking level, best first
    pub async fn list(&self) -> Result<Vec<Ranking>> {
        let documents = with_timeout(
            self.timeout,
            self.store.find(
                collections::RANKINGS,
                &Filter::all(),
                &FindOptions::default().sorted_by("ranking_value", SortOrder::Ascending),
            ),
        )
        .await?;

        let rankings = documents
            .into_iter()
            .map(from_document::<Ranking>)
            .collect::<std::result::Result<Vec<Ranking>, _>>()?;
        Ok(rankings)
    }
}
