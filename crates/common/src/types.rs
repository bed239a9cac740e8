//! Vocabulary shared between the accounts and catalog domains

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Movie genre, used on movies and on a user's favourite list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Genre {
    pub genre_id: i32,
    #[validate(length(min = 1, max = 100))]
    pub genre_name: String,
}
