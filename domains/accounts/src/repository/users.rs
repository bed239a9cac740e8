//! User repository

use std::sync::Arc;
use std::time::Duration;

use marquee_common::{
    collections, from_document, to_document, with_timeout, DocumentStore, Filter, FindOptions,
    Result,
};

use crate::domain::entities::{normalize_email, User};

#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
    timeout: Duration,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Find user by ID
    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<User>> {
        self.find_one(Filter::eq("user_id", user_id)).await
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.find_one(Filter::eq("email", normalize_email(email))).await
    }

    /// Whether an account already uses this email
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count = with_timeout(
            self.timeout,
            self.store.count_documents(
                collections::USERS,
                &Filter::eq("email", normalize_email(email)),
            ),
        )
        .await?;
        Ok(count > 0)
    }

    /// Insert a new user record
    pub async fn create(&self, user: &User) -> Result<()> {
        let document = to_document(user)?;
        with_timeout(
            self.timeout,
            self.store.insert_one(collections::USERS, document),
        )
        .await?;
        Ok(())
    }

    /// List every user
    pub async fn list(&self) -> Result<Vec<User>> {
        let documents = with_timeout(
            self.timeout,
            self.store
                .find(collections::USERS, &Filter::all(), &FindOptions::default()),
        )
        .await?;

        let users = documents
            .into_iter()
            .map(from_document::<User>)
            .collect::<std::result::Result<Vec<User>, _>>()?;
        Ok(users)
    }

    async fn find_one(&self, filter: Filter) -> Result<Option<User>> {
        let document = with_timeout(
            self.timeout,
            self.store.find_one(collections::USERS, &filter),
        )
        .await?;

        match document {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }
}
