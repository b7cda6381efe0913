//! Structured dish recommendation handler.
//!
//! Lists the catalog, asks the model to pick one candidate with a single-shot
//! completion, and grounds the reply back to a concrete candidate.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::recommendation::{
    PromptTemplate, Recommendation, RecommendationRequest, ResolveError,
};
use crate::ports::{CandidateCatalog, ChatRequest, CompletionClient, CompletionError, MessageRole};

/// Configuration for the recommendation handler.
#[derive(Debug, Clone)]
pub struct RecommendationConfig {
    /// Model identifier sent upstream.
    pub model: String,
    pub template: PromptTemplate,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            model: "deepseek-chat".to_string(),
            template: PromptTemplate::default(),
        }
    }
}

impl RecommendationConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }
}

/// Errors that can occur while producing a recommendation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecommendError {
    #[error("invalid request: {0}")]
    InputMalformed(String),

    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("AI request failed: {0}")]
    Upstream(CompletionError),

    #[error("malformed AI response: {0}")]
    MalformedUpstreamResponse(String),

    #[error("AI reply named no dish")]
    EmptySelection,

    #[error("AI recommended a dish not in the catalog: {name}")]
    SelectionNotFound { name: String },
}

impl RecommendError {
    /// Numeric error code reported to clients.
    pub fn code(&self) -> u16 {
        match self {
            RecommendError::InputMalformed(_) => 1,
            RecommendError::CatalogUnavailable(_) => 2,
            RecommendError::Upstream(_) | RecommendError::MalformedUpstreamResponse(_) => 3,
            RecommendError::EmptySelection | RecommendError::SelectionNotFound { .. } => 4,
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> u16 {
        match self {
            RecommendError::InputMalformed(_) => 400,
            RecommendError::CatalogUnavailable(_) => 503,
            RecommendError::Upstream(_) | RecommendError::MalformedUpstreamResponse(_) => 502,
            RecommendError::EmptySelection | RecommendError::SelectionNotFound { .. } => 422,
        }
    }
}

impl From<CompletionError> for RecommendError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::MalformedResponse(detail) => {
                RecommendError::MalformedUpstreamResponse(detail)
            }
            other => RecommendError::Upstream(other),
        }
    }
}

impl From<ResolveError> for RecommendError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::EmptySelection => RecommendError::EmptySelection,
            ResolveError::SelectionNotFound { name } => RecommendError::SelectionNotFound { name },
        }
    }
}

/// Handler for structured recommendations.
pub struct RecommendDishHandler {
    catalog: Arc<dyn CandidateCatalog>,
    client: Arc<dyn CompletionClient>,
    config: RecommendationConfig,
}

impl RecommendDishHandler {
    pub fn new(
        catalog: Arc<dyn CandidateCatalog>,
        client: Arc<dyn CompletionClient>,
        config: RecommendationConfig,
    ) -> Self {
        Self {
            catalog,
            client,
            config,
        }
    }

    /// Produces one recommendation. No step is retried.
    pub async fn handle(
        &self,
        request: RecommendationRequest,
    ) -> Result<Recommendation, RecommendError> {
        // 1. Snapshot the candidates
        let candidates = self.catalog.list_candidates().await.map_err(|e| {
            tracing::error!(error = %e, "failed to list candidates");
            RecommendError::CatalogUnavailable(e.to_string())
        })?;

        // 2. Render the prompt
        let prompt = self.config.template.render(&request, &candidates);
        tracing::debug!(
            user_id = request.user_id,
            distance = %request.distance,
            candidates = candidates.len(),
            prompt = %prompt,
            "submitting recommendation prompt"
        );

        // 3. Ask the model
        let chat = ChatRequest::new(&self.config.model).with_message(MessageRole::User, prompt);
        let completion = self.client.complete(chat).await.map_err(|e| {
            tracing::warn!(error = %e, "recommendation completion failed");
            RecommendError::from(e)
        })?;

        let reply = completion.first_content().ok_or_else(|| {
            RecommendError::MalformedUpstreamResponse("response has no message content".to_string())
        })?;
        tracing::debug!(reply = %reply, "recommendation reply received");

        // 4. Ground the reply
        let resolution = self.config.template.resolve(reply, &candidates).map_err(|e| {
            tracing::warn!(error = %e, "could not ground recommendation reply");
            RecommendError::from(e)
        })?;

        // 5. Best-effort like lookup
        let liked = match self
            .catalog
            .is_liked(request.user_id, resolution.candidate.id)
            .await
        {
            Ok(liked) => liked,
            Err(e) => {
                tracing::warn!(error = %e, dish_id = resolution.candidate.id, "like lookup failed");
                false
            }
        };

        tracing::info!(
            user_id = request.user_id,
            dish_id = resolution.candidate.id,
            dish = %resolution.candidate.name,
            "recommendation resolved"
        );

        Ok(Recommendation {
            candidate: resolution.candidate,
            reason: resolution.reason,
            liked,
        })
    }
}
