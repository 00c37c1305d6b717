use serde::{Deserialize, Serialize};

use crate::types::{Content, GenerationConfig, SafetySetting};

/// Body of a `models/{model}:generateContent` request.
///
/// The API is stateless: the full conversation is sent every time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation so far, ending with the new user turn.
    pub contents: Vec<Content>,

    /// Sampling parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,

    /// Per-category safety thresholds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub safety_settings: Vec<SafetySetting>,
}

impl GenerateContentRequest {
    /// Create a request with no generation config or safety settings.
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            contents,
            generation_config: None,
            safety_settings: Vec::new(),
        }
    }

    /// Set the generation config.
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    /// Set the safety settings.
    pub fn with_safety_settings(mut self, settings: Vec<SafetySetting>) -> Self {
        self.safety_settings = settings;
        self
    }
}

/// One generated alternative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The generated turn. Absent when the candidate was blocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,

    /// Why generation stopped, e.g. `STOP` or `SAFETY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Feedback about the prompt itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was blocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

/// Token accounting for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt.
    #[serde(default)]
    pub prompt_token_count: u32,

    /// Tokens across all candidates.
    #[serde(default)]
    pub candidates_token_count: u32,

    /// Prompt plus candidates.
    #[serde(default)]
    pub total_token_count: u32,
}

/// Response of a `generateContent` call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated alternatives; the client only ever asks for one.
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Present when the prompt was blocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,

    /// Token usage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// A finished response with a single model turn.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(Content::model(text)),
                finish_reason: Some("STOP".to_string()),
            }],
            prompt_feedback: None,
            usage_metadata: None,
        }
    }

    /// Text of the first candidate that has any, skipping empty ones.
    pub fn text(&self) -> Option<String> {
        self.candidates
            .iter()
            .filter_map(|candidate| candidate.content.as_ref())
            .map(Content::text)
            .find(|text| !text.is_empty())
    }

    /// The best explanation for a response without text.
    pub fn empty_reason(&self) -> Option<String> {
        self.prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.clone())
            .or_else(|| {
                self.candidates
                    .first()
                    .and_then(|candidate| candidate.finish_reason.clone())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HarmBlockThreshold, HarmCategory};

    #[test]
    fn test_request_serialization() {
        let request = GenerateContentRequest::new(vec![Content::user("hello")])
            .with_generation_config(GenerationConfig::default().with_top_k(Some(40)))
            .with_safety_settings(vec![SafetySetting::new(
                HarmCategory::Harassment,
                HarmBlockThreshold::BlockNone,
            )]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "hello"}]}],
                "generationConfig": {"topK": 40},
                "safetySettings": [
                    {"category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_NONE"}
                ]
            })
        );
    }

    #[test]
    fn test_response_text() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "hi"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {
                "promptTokenCount": 5,
                "candidatesTokenCount": 1,
                "totalTokenCount": 6
            }
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("hi"));
        assert_eq!(response.usage_metadata.unwrap().total_token_count, 6);
    }

    #[test]
    fn test_response_text_skips_empty_candidates() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                {"finishReason": "SAFETY"},
                {"content": {"role": "model", "parts": [{"text": ""}]}},
                {"content": {"role": "model", "parts": [{"text": "second"}]}},
                {"content": {"role": "model", "parts": [{"text": "third"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("second"));
    }

    #[test]
    fn test_blocked_prompt_has_no_text() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();
        assert_eq!(response.text(), None);
        assert_eq!(response.empty_reason().as_deref(), Some("SAFETY"));
    }

    #[test]
    fn test_blocked_candidate_reason() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"finishReason": "RECITATION"}]
        }))
        .unwrap();
        assert_eq!(response.text(), None);
        assert_eq!(response.empty_reason().as_deref(), Some("RECITATION"));
    }
}
