//! Repository implementations for Accounts domain

pub mod users;

use std::sync::Arc;
use std::time::Duration;

use marquee_common::DocumentStore;

pub use users::UserRepository;

/// Combined repository access for the Accounts domain
#[derive(Clone)]
pub struct AccountsRepositories {
    pub users: UserRepository,
}

impl AccountsRepositories {
    pub fn new(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self {
            users: UserRepository::new(store, timeout),
        }
    }
}
