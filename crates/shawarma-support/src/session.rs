use std::{sync::Arc, time::Duration};

use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use shawarma_core::{ChatMessage, Sender};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::completion::{CompletionError, CompletionService, Turn};

pub const GREETING: &str = "Hello! How can I help you today?";
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't connect. Please try again.";
pub const UNAVAILABLE_REPLY: &str =
    "AI support is currently unavailable. Please configure your API key.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("message text is empty")]
    EmptyMessage,
    #[error("a reply is still pending")]
    Busy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    Replied(ChatMessage),
    /// The service failed and the fixed fallback was appended instead.
    Degraded(ChatMessage),
    /// The transcript was reset while waiting; the reply was dropped.
    Discarded,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ChatThread {
    pub messages: Vec<ChatMessage>,
    pub awaiting_reply: bool,
}

struct Transcript {
    generation: u64,
    next_id: u64,
    messages: Vec<ChatMessage>,
    in_flight: bool,
}

impl Transcript {
    fn fresh(generation: u64) -> Self {
        let mut transcript = Self {
            generation,
            next_id: 1,
            messages: Vec::new(),
            in_flight: false,
        };
        transcript.push(GREETING.to_string(), Sender::Support);
        transcript
    }

    fn push(&mut self, text: String, sender: Sender) -> ChatMessage {
        let message = ChatMessage {
            id: self.next_id,
            text,
            sender,
            timestamp: Utc::now(),
        };
        self.next_id += 1;
        self.messages.push(message.clone());
        message
    }
}

/// Clears the in-flight flag if a send is dropped before its reply lands.
struct PendingReply<'a> {
    transcript: &'a Mutex<Transcript>,
    generation: u64,
    armed: bool,
}

impl PendingReply<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PendingReply<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut transcript = self.transcript.lock();
        if transcript.generation == self.generation && transcript.in_flight {
            transcript.in_flight = false;
            debug!(generation = self.generation, "pending reply abandoned");
        }
    }
}

/// One support conversation. At most one completion call is outstanding.
pub struct ChatSession {
    service: Arc<dyn CompletionService>,
    timeout: Duration,
    transcript: Mutex<Transcript>,
}

impl ChatSession {
    pub fn new(service: Arc<dyn CompletionService>, timeout: Duration) -> Self {
        Self {
            service,
            timeout,
            transcript: Mutex::new(Transcript::fresh(0)),
        }
    }

    pub fn thread(&self) -> ChatThread {
        let transcript = self.transcript.lock();
        ChatThread {
            messages: transcript.messages.clone(),
            awaiting_reply: transcript.in_flight,
        }
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.transcript.lock().messages.clone()
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.transcript.lock().in_flight
    }

    pub async fn send_message(&self, text: &str) -> Result<SendOutcome, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let (generation, history) = {
            let mut transcript = self.transcript.lock();
            if transcript.in_flight {
                return Err(ChatError::Busy);
            }
            transcript.push(text.to_string(), Sender::Vendor);
            transcript.in_flight = true;
            let history: Vec<Turn> = transcript.messages.iter().map(Turn::from).collect();
            (transcript.generation, history)
        };
        let mut pending = PendingReply {
            transcript: &self.transcript,
            generation,
            armed: true,
        };

        let reply = match tokio::time::timeout(self.timeout, self.service.complete(&history)).await
        {
            Ok(result) => result,
            Err(_) => Err(CompletionError::Timeout(self.timeout)),
        };

        let (text, degraded) = match reply {
            Ok(text) => (text, false),
            Err(CompletionError::Unavailable) => {
                warn!("support chat unavailable, answering with notice");
                (UNAVAILABLE_REPLY.to_string(), true)
            }
            Err(err) => {
                error!("support completion failed: {err}");
                (FALLBACK_REPLY.to_string(), true)
            }
        };

        pending.disarm();
        let mut transcript = self.transcript.lock();
        if transcript.generation != generation {
            debug!(generation, "dropping reply for an abandoned transcript");
            return Ok(SendOutcome::Discarded);
        }

        transcript.in_flight = false;
        let message = transcript.push(text, Sender::Support);
        Ok(if degraded {
            SendOutcome::Degraded(message)
        } else {
            SendOutcome::Replied(message)
        })
    }

    /// Abandons the current conversation and any reply still on its way.
    pub fn reset(&self) {
        let mut transcript = self.transcript.lock();
        let generation = transcript.generation + 1;
        *transcript = Transcript::fresh(generation);
    }
}
