//! Output rendering for the chat application.
//!
//! Everything the user sees goes through a [`Renderer`]. The default
//! [`PlainTextRenderer`] writes to stdout with optional ANSI styling;
//! [`RecordingRenderer`] keeps output in memory.

use std::io::{self, Stdout, Write};

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for model replies).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for yellow text (used for warnings).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Icon printed in front of every model reply.
pub const REPLY_ICON: &str = "✨";

/// Trait for rendering chat output.
pub trait Renderer: Send {
    /// Print a prompt and leave the cursor after it.
    fn print_prompt(&mut self, prompt: &str);

    /// Print a model reply.
    fn print_reply(&mut self, text: &str);

    /// Print an error message, prefixed with `Error: `.
    fn print_error(&mut self, error: &str);

    /// Print a warning or remediation message verbatim.
    fn print_warning(&mut self, warning: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
        }
    }

    /// Whether ANSI styling is emitted.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    fn write_styled(&mut self, style: &str, text: &str) {
        let mut out = self.stdout.lock();
        if self.use_color {
            let _ = writeln!(out, "{style}{text}{ANSI_RESET}");
        } else {
            let _ = writeln!(out, "{text}");
        }
        let _ = out.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_prompt(&mut self, prompt: &str) {
        let mut out = self.stdout.lock();
        let _ = write!(out, "{prompt}");
        let _ = out.flush();
    }

    fn print_reply(&mut self, text: &str) {
        let mut out = self.stdout.lock();
        if self.use_color {
            let _ = writeln!(out, "{REPLY_ICON} {ANSI_CYAN}{text}{ANSI_RESET}");
        } else {
            let _ = writeln!(out, "{REPLY_ICON} {text}");
        }
        let _ = out.flush();
    }

    fn print_error(&mut self, error: &str) {
        self.write_styled(ANSI_RED, &format!("Error: {error}"));
    }

    fn print_warning(&mut self, warning: &str) {
        self.write_styled(ANSI_YELLOW, warning);
    }

    fn print_info(&mut self, info: &str) {
        let mut out = self.stdout.lock();
        let _ = writeln!(out, "{info}");
        let _ = out.flush();
    }
}

/// One line of recorded output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// A prompt.
    Prompt(String),
    /// A model reply.
    Reply(String),
    /// An error, without the `Error: ` prefix.
    Error(String),
    /// A warning.
    Warning(String),
    /// Informational text.
    Info(String),
}

/// Renderer that records output instead of printing it.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    output: Vec<Rendered>,
}

impl RecordingRenderer {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything rendered so far.
    pub fn output(&self) -> &[Rendered] {
        &self.output
    }

    /// Model replies in order.
    pub fn replies(&self) -> Vec<&str> {
        self.output
            .iter()
            .filter_map(|r| match r {
                Rendered::Reply(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Errors in order.
    pub fn errors(&self) -> Vec<&str> {
        self.output
            .iter()
            .filter_map(|r| match r {
                Rendered::Error(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether any non-prompt line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.output.iter().any(|r| match r {
            Rendered::Prompt(_) => false,
            Rendered::Reply(text)
            | Rendered::Error(text)
            | Rendered::Warning(text)
            | Rendered::Info(text) => text.contains(needle),
        })
    }
}

impl Renderer for RecordingRenderer {
    fn print_prompt(&mut self, prompt: &str) {
        self.output.push(Rendered::Prompt(prompt.to_string()));
    }

    fn print_reply(&mut self, text: &str) {
        self.output.push(Rendered::Reply(text.to_string()));
    }

    fn print_error(&mut self, error: &str) {
        self.output.push(Rendered::Error(error.to_string()));
    }

    fn print_warning(&mut self, warning: &str) {
        self.output.push(Rendered::Warning(warning.to_string()));
    }

    fn print_info(&mut self, info: &str) {
        self.output.push(Rendered::Info(info.to_string()));
    }
}
