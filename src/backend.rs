//! The seam between the interactive layers and the remote service.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::Gemini;
use crate::credential::Credential;
use crate::error::{Error, Result};
use crate::types::{
    GenerateContentRequest, GenerateContentResponse, Model, ModelInfo, ModelListResponse,
};

/// The two remote operations the chat client needs.
///
/// [`Gemini`] is the production implementation; [`ScriptedBackend`] plays
/// back canned results.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Use `credential` for every subsequent call.
    fn configure(&mut self, credential: &Credential);

    /// List available models. Used to check that a credential is accepted.
    async fn list_models(&self) -> Result<ModelListResponse>;

    /// Generate the next model turn for `request`.
    async fn generate_content(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;
}

#[async_trait]
impl GenerativeBackend for Gemini {
    fn configure(&mut self, credential: &Credential) {
        self.set_credential(credential.clone());
    }

    async fn list_models(&self) -> Result<ModelListResponse> {
        Gemini::list_models(self).await
    }

    async fn generate_content(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        Gemini::generate_content(self, model, request).await
    }
}

#[derive(Default)]
struct Script {
    listings: VecDeque<Result<ModelListResponse>>,
    replies: VecDeque<Result<GenerateContentResponse>>,
    credentials: Vec<String>,
    list_calls: usize,
    requests: Vec<(Model, GenerateContentRequest)>,
}

/// A backend that answers from queues of prepared results.
///
/// Clones share state, so a clone kept by the caller can inspect what the
/// backend saw after it was moved into a session. Running out of prepared
/// results is an error.
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
}

impl ScriptedBackend {
    /// A backend with nothing prepared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result for the next `list_models` call.
    pub fn with_listing(self, listing: Result<ModelListResponse>) -> Self {
        self.lock().listings.push_back(listing);
        self
    }

    /// Queue a successful listing with one usable model.
    pub fn accepting(self) -> Self {
        let listing = ModelListResponse::new(vec![ModelInfo::new("models/gemini-2.0-flash")], None);
        self.with_listing(Ok(listing))
    }

    /// Queue a result for the next `generate_content` call.
    pub fn with_reply(self, reply: Result<GenerateContentResponse>) -> Self {
        self.lock().replies.push_back(reply);
        self
    }

    /// Queue a successful reply with `text`.
    pub fn replying(self, text: impl Into<String>) -> Self {
        self.with_reply(Ok(GenerateContentResponse::from_text(text)))
    }

    /// Every credential passed to `configure`, in order.
    pub fn configured(&self) -> Vec<String> {
        self.lock().credentials.clone()
    }

    /// Number of `list_models` calls.
    pub fn list_calls(&self) -> usize {
        self.lock().list_calls
    }

    /// Every `generate_content` call, in order.
    pub fn requests(&self) -> Vec<(Model, GenerateContentRequest)> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    fn configure(&mut self, credential: &Credential) {
        self.lock().credentials.push(credential.expose().to_string());
    }

    async fn list_models(&self) -> Result<ModelListResponse> {
        let mut script = self.lock();
        script.list_calls += 1;
        script
            .listings
            .pop_front()
            .unwrap_or_else(|| Err(Error::internal_server("no scripted listing left")))
    }

    async fn generate_content(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let mut script = self.lock();
        script.requests.push((model.clone(), request.clone()));
        script
            .replies
            .pop_front()
            .unwrap_or_else(|| Err(Error::internal_server("no scripted reply left")))
    }
}
