//! The interactive side of gemini-chat.
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`input`]: line sources and paste-aware input collection
//! - [`commands`]: classification of what the user typed
//! - [`selector`]: the model menu
//! - [`session`]: the conversation and the read-send-print loop

mod commands;
mod config;
mod input;
mod selector;
mod session;

pub use crate::render::{PlainTextRenderer, RecordingRenderer, Rendered, Renderer};
pub use commands::{BlockDelimiter, InputCommand, parse_input};
pub use config::{
    ChatArgs, ChatConfig, DEFAULT_TIMEOUT_SECS, PREAMBLE_ACKNOWLEDGEMENT, PREAMBLE_INSTRUCTION,
};
pub use input::{LineSource, PASTE_POLL, ScriptedInput, TerminalInput, collect_input, read_block};
pub use selector::select_model;
pub use session::{
    ChatSession, EMPTY_CONTENT_MESSAGE, FAREWELL, INPUT_PROMPT, SessionEnd,
};
