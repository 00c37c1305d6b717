// Public modules
pub mod backend;
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod credential;
pub mod error;
pub mod observability;
pub mod render;
pub mod types;
pub mod validator;

// Re-exports
pub use backend::{GenerativeBackend, ScriptedBackend};
pub use client::Gemini;
pub use client_logger::{ClientLogger, StderrLogger};
pub use credential::{Credential, CredentialStore};
pub use error::{Error, ErrorKind, Result};
pub use observability::register_biometrics;
pub use types::*;
pub use validator::{Verification, obtain_credential, verify};
