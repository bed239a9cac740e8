//! Mock Review Classifier
//!
//! Used by `ClassifierFactory` when provider is `mock`.
//! Picks the first candidate named in the review, otherwise the last one.

use crate::{ClassifierError, ReviewClassifier};

#[derive(Debug, Clone, Default)]
pub struct MockClassifier;

impl MockClassifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl ReviewClassifier for MockClassifier {
    async fn classify(
        &self,
        review: &str,
        candidates: &[String],
    ) -> Result<String, ClassifierError> {
        tracing::info!("Mock classifier processing review");

        let review = review.to_lowercase();
        candidates
            .iter()
            .find(|candidate| review.contains(&candidate.to_lowercase()))
            .or_else(|| candidates.last())
            .cloned()
            .ok_or(ClassifierError::NoCandidates)
    }

    fn provider(&self) -> &'static str {
        "mock"
    }
}
