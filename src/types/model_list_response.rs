use serde::{Deserialize, Serialize};

use crate::types::ModelInfo;

/// Response from the list models API endpoint.
///
/// Contains one page of available models.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelListResponse {
    /// List of models returned by the API.
    #[serde(default)]
    pub models: Vec<ModelInfo>,

    /// Token for the next page, if there are more results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

impl ModelListResponse {
    /// Create a new `ModelListResponse`.
    pub fn new(models: Vec<ModelInfo>, next_page_token: Option<String>) -> Self {
        Self {
            models,
            next_page_token,
        }
    }

    /// Get the list of models.
    pub fn models(&self) -> &[ModelInfo] {
        &self.models
    }

    /// Whether the page is empty.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Check if there are more results available.
    pub fn has_more(&self) -> bool {
        self.next_page_token.is_some()
    }
}
