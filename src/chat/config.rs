//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::path::PathBuf;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::credential::DEFAULT_CREDENTIAL_FILE;
use crate::types::{Content, GenerationConfig, Model, SafetySetting};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Instruction seeded as the first user turn of every conversation.
pub const PREAMBLE_INSTRUCTION: &str = "You are a direct and concise AI assistant. Answer questions directly without any extra explanations or pleasantries. Just give the answer.";

/// Acknowledgement seeded as the first model turn of every conversation.
pub const PREAMBLE_ACKNOWLEDGEMENT: &str =
    "Understood. I will provide direct answers without extra talk.";

/// Command-line arguments for the gemini-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use, skipping the selection menu.
    #[arrrg(optional, "Model to use (default: choose from a menu)", "MODEL")]
    pub model: Option<String>,

    /// File holding the API key.
    #[arrrg(optional, "File holding GOOGLE_API_KEY (default: .env)", "PATH")]
    pub env_file: Option<String>,

    /// Base URL of the API.
    #[arrrg(optional, "API base URL", "URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECS")]
    pub timeout: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Print client diagnostics to stderr.
    #[arrrg(flag, "Print request diagnostics to stderr")]
    pub verbose: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Model chosen up front; `None` means ask.
    pub model: Option<Model>,

    /// Where the credential is stored.
    pub env_file: PathBuf,

    /// Override for the API base URL.
    pub base_url: Option<String>,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Whether to log client interactions to stderr.
    pub verbose: bool,

    /// Sampling parameters sent with every request.
    pub generation: GenerationConfig,

    /// Safety thresholds sent with every request.
    pub safety_settings: Vec<SafetySetting>,

    /// Turns every conversation starts with.
    pub preamble: Vec<Content>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: chosen interactively
    /// - Credential file: `.env`
    /// - Timeout: 60 seconds
    /// - Color: enabled
    /// - Sampling: temperature 0.2, top-p 0.8, top-k 40
    /// - Safety: nothing blocked
    pub fn new() -> Self {
        Self {
            model: None,
            env_file: PathBuf::from(DEFAULT_CREDENTIAL_FILE),
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            use_color: true,
            verbose: false,
            generation: GenerationConfig::direct(),
            safety_settings: SafetySetting::block_none(),
            preamble: vec![
                Content::user(PREAMBLE_INSTRUCTION),
                Content::model(PREAMBLE_ACKNOWLEDGEMENT),
            ],
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = Some(model);
        self
    }

    /// Sets the credential file.
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = path.into();
        self
    }

    /// Sets the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Enables stderr diagnostics.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets the sampling parameters.
    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Sets the safety thresholds.
    pub fn with_safety_settings(mut self, safety_settings: Vec<SafetySetting>) -> Self {
        self.safety_settings = safety_settings;
        self
    }

    /// Replaces the seeded turns.
    pub fn with_preamble(mut self, preamble: Vec<Content>) -> Self {
        self.preamble = preamble;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let defaults = ChatConfig::new();
        ChatConfig {
            model: args
                .model
                .map(|s| s.parse::<Model>().unwrap_or(Model::Custom(s))),
            env_file: args.env_file.map(PathBuf::from).unwrap_or(defaults.env_file),
            base_url: args.base_url,
            timeout: args
                .timeout
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            use_color: !args.no_color,
            verbose: args.verbose,
            ..ChatConfig::new()
        }
    }
}
