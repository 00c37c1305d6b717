//! Logging trait for Gemini client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows callers to
//! capture every API interaction passing through the [`Gemini`] client, and
//! [`StderrLogger`], a one-line-per-event implementation used by `--verbose`.
//!
//! [`Gemini`]: crate::Gemini

use std::io::{self, Write};
use std::time::Duration;

use crate::{Error, GenerateContentResponse, ModelListResponse};

/// A trait for logging Gemini client operations.
///
/// Implementations must never log the credential.
///
/// # Example
///
/// ```rust,ignore
/// use gemini_chat::{ClientLogger, Error, GenerateContentResponse, ModelListResponse};
/// use std::sync::Mutex;
///
/// struct CountingLogger {
///     calls: Mutex<usize>,
/// }
///
/// impl ClientLogger for CountingLogger {
///     fn log_request(&self, _: &str, _: &str) {
///         *self.calls.lock().unwrap() += 1;
///     }
///     fn log_model_list(&self, _: &ModelListResponse, _: Duration) {}
///     fn log_response(&self, _: &GenerateContentResponse, _: Duration) {}
///     fn log_error(&self, _: &Error) {}
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Called before a request is sent.
    ///
    /// `operation` is the API method (`models.list`, `generateContent`) and
    /// `target` the model or collection it addresses.
    fn log_request(&self, operation: &str, target: &str);

    /// Log a successful list models call.
    fn log_model_list(&self, response: &ModelListResponse, elapsed: Duration);

    /// Log a successful generate call.
    fn log_response(&self, response: &GenerateContentResponse, elapsed: Duration);

    /// Log a failed call.
    fn log_error(&self, error: &Error);
}

/// Writes terse diagnostics to standard error.
#[derive(Debug, Default)]
pub struct StderrLogger;

impl StderrLogger {
    /// Create a new stderr logger.
    pub fn new() -> Self {
        Self
    }

    fn emit(&self, line: &str) {
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "[gemini-chat] {line}");
    }
}

impl ClientLogger for StderrLogger {
    fn log_request(&self, operation: &str, target: &str) {
        self.emit(&format!("{operation} -> {target}"));
    }

    fn log_model_list(&self, response: &ModelListResponse, elapsed: Duration) {
        self.emit(&format!(
            "models.list returned {} models in {:.2}s",
            response.models().len(),
            elapsed.as_secs_f64()
        ));
    }

    fn log_response(&self, response: &GenerateContentResponse, elapsed: Duration) {
        let tokens = response
            .usage_metadata
            .map(|usage| usage.total_token_count)
            .unwrap_or(0);
        self.emit(&format!(
            "generateContent returned {} candidates ({} tokens) in {:.2}s",
            response.candidates.len(),
            tokens,
            elapsed.as_secs_f64()
        ));
    }

    fn log_error(&self, error: &Error) {
        self.emit(&format!("request failed: {error}"));
    }
}
