//! OpenAI Chat Completions Implementation
//!
//! Calls `{base_url}/chat/completions` using reqwest HTTP client.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{match_candidate, ClassifierConfig, ClassifierError, ReviewClassifier};

/// Chat Completions request body
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Chat Completions response body
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// OpenAI API error response
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// OpenAI review classifier
pub struct OpenAiClassifier {
    client: Client,
    config: ClassifierConfig,
    api_key: String,
}

impl OpenAiClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ClassifierError::Configuration("OPENAI_API_KEY is required".to_string())
            })?;

        Ok(Self {
            client: Client::new(),
            config,
            api_key,
        })
    }

    fn build_request(&self, review: &str, candidates: &[String]) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            temperature: 0.0,
            messages: vec![ChatMessage {
                role: "user",
                content: format!("{}{}", self.config.render_prompt(candidates), review),
            }],
        }
    }
}

#[async_trait::async_trait]
impl ReviewClassifier for OpenAiClassifier {
    async fn classify(
        &self,
        review: &str,
        candidates: &[String],
    ) -> Result<String, ClassifierError> {
        if candidates.is_empty() {
            return Err(ClassifierError::NoCandidates);
        }

        let body = self.build_request(review, candidates);
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));

        tracing::debug!(
            model = %body.model,
            candidates = candidates.len(),
            "Sending classification request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClassifierError::Request(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ClassifierError::RateLimit);
        }

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_body) {
                return Err(ClassifierError::Response(format!(
                    "OpenAI API error ({}): {}",
                    status, error_response.error.message
                )));
            }

            return Err(ClassifierError::Response(format!(
                "OpenAI API returned {}: {}",
                status, error_body
            )));
        }

        let api_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::Response(format!("Failed to parse response: {}", e)))?;

        let answer = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ClassifierError::Response("Response contained no answer".to_string()))?;

        match_candidate(&answer, candidates).ok_or_else(|| {
            tracing::warn!(answer = %answer, "Classifier answer outside candidate rankings");
            ClassifierError::UnexpectedAnswer(answer.trim().to_string())
        })
    }

    fn provider(&self) -> &'static str {
        "openai"
    }
}
