//! Mirrors the latest issued token pair onto the user record
//!
//! The copy is informational: verification never reads it, so a failed
//! write leaves issued tokens valid.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use marquee_common::{collections, with_timeout, Document, DocumentStore, Filter, StoreError};
use serde_json::json;

use crate::claims::TokenPair;

#[derive(Clone)]
pub struct SessionRecorder {
    store: Arc<dyn DocumentStore>,
    timeout: Duration,
}

impl SessionRecorder {
    pub fn new(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Write `token`, `refresh_token` and `updated_at` on the user record
    pub async fn persist(
        &self,
        user_id: &str,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<(), StoreError> {
        let mut patch = Document::new();
        patch.insert("token".to_string(), json!(access_token));
        patch.insert("refresh_token".to_string(), json!(refresh_token));
        patch.insert("updated_at".to_string(), json!(Utc::now()));

        let matched = with_timeout(
            self.timeout,
            self.store
                .update_one(collections::USERS, &Filter::eq("user_id", user_id), patch),
        )
        .await?;

        if matched == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Persist the pair, logging instead of returning any failure
    pub async fn record(&self, user_id: &str, tokens: &TokenPair) {
        if let Err(e) = self
            .persist(user_id, &tokens.access_token, &tokens.refresh_token)
            .await
        {
            tracing::error!(user_id = %user_id, error = %e, "Failed to record session tokens");
        }
    }
}
