//! Domain entities for the catalog domain

use marquee_common::Genre;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Maximum number of movies returned by the recommendation query
pub const RECOMMENDATION_LIMIT: usize = 5;

/// A ranking level. Lower values are better; `0` marks "not ranked" and is
/// never offered to the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Ranking {
    #[validate(range(min = 0))]
    pub ranking_value: i32,
    #[validate(length(min = 1, max = 100))]
    pub ranking_name: String,
}

impl Ranking {
    pub fn is_ranked(&self) -> bool {
        self.ranking_value != 0
    }
}

/// Stored movie record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub imdb_id: String,
    pub title: String,
    pub poster_path: String,
    pub youtube_id: String,
    #[serde(default)]
    pub genre: Vec<Genre>,
    #[serde(default)]
    pub admin_review: String,
    pub ranking: Ranking,
}
