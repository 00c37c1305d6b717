//! The model selection menu.

use std::io;

use crate::chat::input::LineSource;
use crate::error::{Error, Result};
use crate::render::Renderer;
use crate::types::{KnownModel, Model};

const MENU_PROMPT: &str = "Select a model (1-3): ";
const INVALID_CHOICE: &str = "Invalid choice. Please select 1, 2, or 3.";

/// Lists the known models and asks until a valid menu key is entered.
///
/// End of input is an error; there is no default model.
pub async fn select_model<S, R>(input: &mut S, renderer: &mut R) -> Result<Model>
where
    S: LineSource + ?Sized,
    R: Renderer + ?Sized,
{
    renderer.print_info("\nAvailable models:");
    for model in KnownModel::ALL {
        renderer.print_info(&format!("{}. {}", model.menu_key(), model.display_name()));
    }

    loop {
        renderer.print_prompt(MENU_PROMPT);
        let Some(line) = input.read_line().await? else {
            return Err(Error::io(
                "input closed before a model was selected",
                io::Error::from(io::ErrorKind::UnexpectedEof),
            ));
        };
        match KnownModel::from_menu_key(line.trim()) {
            Some(model) => return Ok(Model::Known(model)),
            None => renderer.print_info(INVALID_CHOICE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::input::ScriptedInput;
    use crate::render::{Rendered, RecordingRenderer};

    #[tokio::test]
    async fn lists_models_in_menu_order() {
        let mut input = ScriptedInput::typed_lines(["1"]);
        let mut renderer = RecordingRenderer::new();
        select_model(&mut input, &mut renderer).await.unwrap();

        let infos: Vec<_> = renderer
            .output()
            .iter()
            .filter_map(|r| match r {
                Rendered::Info(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            infos,
            vec![
                "\nAvailable models:",
                "1. Gemini 2.5 Pro (Experimental)",
                "2. Gemini 2.0 Flash",
                "3. Gemini 1.5 Flash",
            ]
        );
    }

    #[tokio::test]
    async fn each_key_maps_to_its_model() {
        for (key, id) in [
            ("1", "gemini-2.5-pro-exp-03-25"),
            ("2", "gemini-2.0-flash"),
            (" 3 ", "gemini-1.5-flash"),
        ] {
            let mut input = ScriptedInput::typed_lines([key]);
            let model = select_model(&mut input, &mut RecordingRenderer::new())
                .await
                .unwrap();
            assert_eq!(model.id(), id);
        }
    }

    #[tokio::test]
    async fn reprompts_until_valid() {
        let mut input = ScriptedInput::typed_lines(["4", "", "two", "2"]);
        let mut renderer = RecordingRenderer::new();
        let model = select_model(&mut input, &mut renderer).await.unwrap();

        assert_eq!(model, Model::Known(KnownModel::Gemini20Flash));
        let rejections = renderer
            .output()
            .iter()
            .filter(|r| **r == Rendered::Info(INVALID_CHOICE.to_string()))
            .count();
        assert_eq!(rejections, 3);
        let prompts = renderer
            .output()
            .iter()
            .filter(|r| matches!(r, Rendered::Prompt(_)))
            .count();
        assert_eq!(prompts, 4);
    }

    #[tokio::test]
    async fn eof_is_an_error() {
        let mut input = ScriptedInput::typed_lines(["9"]);
        let err = select_model(&mut input, &mut RecordingRenderer::new())
            .await
            .unwrap_err();
        assert!(err.is_io());
    }
}
