// Public modules
pub mod content;
pub mod generate_content;
pub mod generation_config;
pub mod model;
pub mod model_info;
pub mod model_list_response;
pub mod safety_setting;

// Re-exports
pub use content::{Content, Part, Role};
pub use generate_content::{
    Candidate, GenerateContentRequest, GenerateContentResponse, PromptFeedback, UsageMetadata,
};
pub use generation_config::GenerationConfig;
pub use model::{KnownModel, Model};
pub use model_info::ModelInfo;
pub use model_list_response::ModelListResponse;
pub use safety_setting::{HarmBlockThreshold, HarmCategory, SafetySetting};
