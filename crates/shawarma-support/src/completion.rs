use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use shawarma_core::{ChatMessage, Sender};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

impl From<&ChatMessage> for Turn {
    fn from(message: &ChatMessage) -> Self {
        let speaker = match message.sender {
            Sender::Vendor => Speaker::User,
            Sender::Support => Speaker::Model,
        };
        Self {
            speaker,
            text: message.text.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion service is not configured")]
    Unavailable,
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("completion service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("completion response contained no text")]
    EmptyResponse,
    #[error("completion timed out after {0:?}")]
    Timeout(Duration),
    #[error("completion service error: {0}")]
    Service(String),
}

/// Ordered transcript in, reply text out.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, transcript: &[Turn]) -> Result<String, CompletionError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCompletion;

#[async_trait]
impl CompletionService for DisabledCompletion {
    async fn complete(&self, _transcript: &[Turn]) -> Result<String, CompletionError> {
        Err(CompletionError::Unavailable)
    }
}
