//! Marquee Review Classifier
//!
//! Maps a free-text admin review onto one of the configured ranking names:
//! - OpenAI chat completions for production
//! - Deterministic mock for tests and local development

use std::sync::Arc;

use marquee_common::{ClassifierProvider, Config};
use thiserror::Error;

pub mod mock;
pub mod openai;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Classifier configuration error: {0}")]
    Configuration(String),

    #[error("No ranking candidates to classify against")]
    NoCandidates,

    #[error("Classifier request failed: {0}")]
    Request(String),

    #[error("Classifier rate limit exceeded")]
    RateLimit,

    #[error("Classifier response error: {0}")]
    Response(String),

    #[error("Classifier answered '{0}', which is not a known ranking")]
    UnexpectedAnswer(String),
}

impl From<ClassifierError> for marquee_common::Error {
    fn from(error: ClassifierError) -> Self {
        match error {
            ClassifierError::Configuration(_) | ClassifierError::NoCandidates => {
                marquee_common::Error::Internal(error.to_string())
            }
            other => marquee_common::Error::Upstream(other.to_string()),
        }
    }
}

/// Classifies review text into one of the candidate ranking names
#[async_trait::async_trait]
pub trait ReviewClassifier: Send + Sync {
    /// Return the candidate that best describes `review`.
    ///
    /// The returned name is always one of `candidates`, spelled as given.
    async fn classify(&self, review: &str, candidates: &[String])
        -> Result<String, ClassifierError>;

    /// Provider name for logs
    fn provider(&self) -> &'static str;
}

/// Classifier service configuration
#[derive(Clone)]
pub struct ClassifierConfig {
    pub provider: ClassifierProvider,
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Prompt text; `{rankings}` is replaced with the candidate names
    pub prompt_template: String,
}

impl std::fmt::Debug for ClassifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ClassifierConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            provider: config.classifier_provider,
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
            base_url: config.openai_base_url.clone(),
            prompt_template: config.prompt_template.clone(),
        }
    }

    /// Render the prompt for a set of candidates
    pub fn render_prompt(&self, candidates: &[String]) -> String {
        self.prompt_template
            .replace("{rankings}", &candidates.join(", "))
    }
}

/// Map a raw model answer onto the canonical candidate spelling.
///
/// Surrounding whitespace, quotes and trailing punctuation are ignored,
/// and the comparison is case-insensitive.
pub fn match_candidate(answer: &str, candidates: &[String]) -> Option<String> {
    let cleaned = answer
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
        .trim_end_matches(['.', '!', ','])
        .trim();

    candidates
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(cleaned))
        .cloned()
}

/// Classifier factory
pub struct ClassifierFactory;

impl ClassifierFactory {
    /// Create the classifier selected by configuration
    pub fn create(config: ClassifierConfig) -> Result<Arc<dyn ReviewClassifier>, ClassifierError> {
        match config.provider {
            ClassifierProvider::OpenAi => {
                tracing::info!(model = %config.model, "Creating OpenAI review classifier");
                Ok(Arc::new(openai::OpenAiClassifier::new(config)?))
            }
            ClassifierProvider::Mock => {
                tracing::info!("Creating mock review classifier");
                Ok(Arc::new(mock::MockClassifier::new()))
            }
        }
    }
}
