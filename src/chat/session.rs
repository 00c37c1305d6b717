//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the conversation
//! and drives the read-send-print loop.

use crate::backend::GenerativeBackend;
use crate::chat::commands::{InputCommand, parse_input};
use crate::chat::config::ChatConfig;
use crate::chat::input::{LineSource, collect_input, read_block};
use crate::credential::{API_KEY_URL, Credential};
use crate::error::{Error, ErrorKind, Result};
use crate::observability::{SESSION_CREDENTIAL_REVOKED, SESSION_EXCHANGE_ERRORS, SESSION_EXCHANGES};
use crate::render::Renderer;
use crate::types::{Content, GenerateContentRequest, GenerationConfig, Model, SafetySetting};

/// Prompt printed before each input.
pub const INPUT_PROMPT: &str = "> ";

/// Printed when the user leaves.
pub const FAREWELL: &str = "Goodbye! Thanks for chatting.";

/// Printed, after the error prefix, for input with no text.
pub const EMPTY_CONTENT_MESSAGE: &str = "Content must not be empty. Please enter some text.";

const REVOCATION_REASONS: [&str; 3] = [
    "1. API key quota/rate limit reached",
    "2. API key expiration",
    "3. API key being revoked",
];

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user asked to leave, or input ended.
    Exit,
    /// The credential stopped being accepted.
    CredentialRevoked {
        /// Exchanges that succeeded before the credential was rejected.
        completed: u64,
    },
}

/// A chat session that manages conversation state and API interactions.
///
/// The whole conversation is sent on every exchange. It grows by a user and
/// a model turn only when an exchange succeeds.
pub struct ChatSession<B: GenerativeBackend> {
    backend: B,
    credential: Credential,
    model: Model,
    generation: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
    messages: Vec<Content>,
    request_count: u64,
    completed_count: u64,
}

impl<B: GenerativeBackend> ChatSession<B> {
    /// Creates a session seeded with the configured preamble.
    pub fn new(backend: B, credential: Credential, model: Model, config: &ChatConfig) -> Self {
        Self {
            backend,
            credential,
            model,
            generation: config.generation,
            safety_settings: config.safety_settings.clone(),
            messages: config.preamble.clone(),
            request_count: 0,
            completed_count: 0,
        }
    }

    /// Returns the model used for responses.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Returns the conversation so far, preamble included.
    pub fn messages(&self) -> &[Content] {
        &self.messages
    }

    /// Returns the number of turns in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Returns the number of exchanges attempted.
    pub fn request_count(&self) -> u64 {
        self.request_count
    }

    /// Returns the number of exchanges that produced a reply.
    pub fn completed_count(&self) -> u64 {
        self.completed_count
    }

    /// Sends `text` as the next user turn and returns the model's reply.
    ///
    /// # Errors
    ///
    /// Returns the backend's error, or [`Error::EmptyResponse`] when the reply
    /// has no text. The conversation is unchanged on error.
    pub async fn exchange(&mut self, text: &str) -> Result<String> {
        self.request_count += 1;
        SESSION_EXCHANGES.click();
        self.backend.configure(&self.credential);

        let mut contents = self.messages.clone();
        contents.push(Content::user(text));
        let request = GenerateContentRequest::new(contents)
            .with_generation_config(self.generation)
            .with_safety_settings(self.safety_settings.clone());

        let reply = self
            .backend
            .generate_content(&self.model, &request)
            .await
            .and_then(|response| {
                response
                    .text()
                    .ok_or_else(|| Error::empty_response(response.empty_reason()))
            });
        match reply {
            Ok(reply) => {
                self.messages.push(Content::user(text));
                self.messages.push(Content::model(reply.clone()));
                self.completed_count += 1;
                Ok(reply)
            }
            Err(err) => {
                SESSION_EXCHANGE_ERRORS.click();
                Err(err)
            }
        }
    }

    /// Runs the interactive loop until the user leaves, input ends, or the
    /// credential is rejected.
    ///
    /// # Errors
    ///
    /// Only failures to read input are returned; remote failures are
    /// reported through `renderer`.
    pub async fn run<S: LineSource + ?Sized>(
        &mut self,
        input: &mut S,
        renderer: &mut dyn Renderer,
    ) -> Result<SessionEnd> {
        loop {
            renderer.print_prompt(INPUT_PROMPT);
            let Some(unit) = collect_input(input).await? else {
                renderer.print_info(&format!("\n{FAREWELL}"));
                return Ok(SessionEnd::Exit);
            };

            let text = match parse_input(&unit) {
                InputCommand::Exit => {
                    renderer.print_info(&format!("\n{FAREWELL}"));
                    return Ok(SessionEnd::Exit);
                }
                InputCommand::BeginBlock(delimiter) => {
                    renderer.print_info(delimiter.instructions());
                    read_block(input, delimiter.closing()).await?
                }
                InputCommand::Message(text) => text,
            };
            if text.trim().is_empty() {
                renderer.print_error(EMPTY_CONTENT_MESSAGE);
                continue;
            }

            match self.exchange(&text).await {
                Ok(reply) => renderer.print_reply(&reply),
                Err(err) => match err.kind() {
                    ErrorKind::CredentialInvalid => {
                        let completed = self.completed_count;
                        SESSION_CREDENTIAL_REVOKED.click();
                        report_revoked(renderer, completed);
                        return Ok(SessionEnd::CredentialRevoked { completed });
                    }
                    ErrorKind::EmptyContent => renderer.print_error(EMPTY_CONTENT_MESSAGE),
                    ErrorKind::Other => renderer.print_error(&err.to_string()),
                },
            }
        }
    }
}

fn report_revoked(renderer: &mut dyn Renderer, completed: u64) {
    renderer.print_error(&format!(
        "API key became invalid after {completed} requests. This might be due to:"
    ));
    for reason in REVOCATION_REASONS {
        renderer.print_warning(reason);
    }
    renderer.print_warning(&format!("\nPlease get a new API key from {API_KEY_URL}"));
}
