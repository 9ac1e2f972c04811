pub mod completion;
pub mod gemini;
pub mod session;

use std::{sync::Arc, time::Duration};

use tracing::warn;

pub use completion::{CompletionError, CompletionService, DisabledCompletion, Speaker, Turn};
pub use gemini::GeminiClient;
pub use session::{
    ChatError, ChatSession, ChatThread, FALLBACK_REPLY, GREETING, SendOutcome, UNAVAILABLE_REPLY,
};

/// Picks the completion backend once at startup. Without an API key every
/// send short-circuits to the unavailable reply and nothing touches the network.
pub fn completion_backend(
    api_key: Option<&str>,
    model: &str,
    timeout: Duration,
) -> Result<Arc<dyn CompletionService>, CompletionError> {
    match api_key.map(str::trim).filter(|key| !key.is_empty()) {
        Some(key) => Ok(Arc::new(GeminiClient::new(key, model, timeout)?)),
        None => {
            warn!("Gemini API key not found, support chat will answer with the unavailable notice");
            Ok(Arc::new(DisabledCompletion))
        }
    }
}
