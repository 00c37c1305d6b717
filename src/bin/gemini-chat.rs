//! Interactive chat with Gemini models.
//!
//! On start the tool makes sure it has an API key the service accepts,
//! asks which model to use, and then relays lines between the terminal and
//! the model until the user types `exit` or `quit`.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage; the key is read from ./.env or asked for
//! gemini-chat
//!
//! # Skip the model menu
//! gemini-chat --model gemini-2.0-flash
//!
//! # Keep the key somewhere else and log requests to stderr
//! gemini-chat --env-file ~/.config/gemini.env --verbose
//! ```
//!
//! # Input
//!
//! - Pasted multi-line text is sent as one message.
//! - `<multiline>` ... `</multiline>` or a ``` fence sends everything in
//!   between as one message.
//!
//! # Exit status
//!
//! 0 when the user leaves, 1 when no valid key could be obtained or the
//! terminal fails, 130 on Ctrl+C.

use std::process;
use std::sync::Arc;

use arrrg::CommandLine;

use gemini_chat::chat::{
    ChatArgs, ChatConfig, ChatSession, PlainTextRenderer, Renderer, SessionEnd, TerminalInput,
    select_model,
};
use gemini_chat::{CredentialStore, Error, Gemini, StderrLogger, obtain_credential};

const BANNER: &str = "Chat started! Type 'exit' or 'quit' to end the conversation.";

/// Main entry point for the gemini-chat application.
#[tokio::main]
async fn main() {
    let (args, _) = ChatArgs::from_command_line_relaxed("gemini-chat [OPTIONS]");
    let config = ChatConfig::from(args);
    let mut renderer = PlainTextRenderer::with_color(config.use_color);

    if let Err(err) = ctrlc::set_handler(|| {
        println!("\nGoodbye!");
        process::exit(130);
    }) {
        renderer.print_error(&format!("failed to install Ctrl+C handler: {err}"));
    }

    let code = match run(&config, &mut renderer).await {
        Ok(_) => 0,
        Err(err) => {
            // Verification failures were already explained to the user.
            if !err.is_authentication() && !err.is_validation() {
                renderer.print_error(&err.to_string());
            }
            1
        }
    };
    // A pending stdin read would otherwise hold the runtime open.
    process::exit(code);
}

async fn run(config: &ChatConfig, renderer: &mut PlainTextRenderer) -> Result<SessionEnd, Error> {
    let mut client = Gemini::with_options(None, config.base_url.clone(), Some(config.timeout))?;
    if config.verbose {
        client = client.with_logger(Arc::new(StderrLogger::new()));
    }
    let store = CredentialStore::new(&config.env_file).with_env_fallback();
    let mut input = TerminalInput::new();

    let credential = obtain_credential(&store, &mut client, &mut input, renderer).await?;
    let model = match &config.model {
        Some(model) => model.clone(),
        None => select_model(&mut input, renderer).await?,
    };

    renderer.print_info(&format!("\n{BANNER}"));
    renderer.print_info(&"-".repeat(60));

    let mut session = ChatSession::new(client, credential, model, config);
    session.run(&mut input, renderer).await
}
