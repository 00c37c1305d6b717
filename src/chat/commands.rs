//! Classification of a collected input unit.
//!
//! Two keywords end the session and two markers open a multi-line block.
//! Everything else is a message for the model.

/// Words that end the session, compared case-insensitively.
const EXIT_KEYWORDS: [&str; 2] = ["exit", "quit"];

/// A kind of explicit multi-line block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockDelimiter {
    /// `<multiline>` ... `</multiline>`.
    Multiline,
    /// A fence of three backticks on both ends.
    Fence,
}

impl BlockDelimiter {
    /// The line that opens the block.
    pub fn opening(&self) -> &'static str {
        match self {
            BlockDelimiter::Multiline => "<multiline>",
            BlockDelimiter::Fence => "```",
        }
    }

    /// The line that closes the block.
    pub fn closing(&self) -> &'static str {
        match self {
            BlockDelimiter::Multiline => "</multiline>",
            BlockDelimiter::Fence => "```",
        }
    }

    /// Instructions printed when the block opens.
    pub fn instructions(&self) -> &'static str {
        match self {
            BlockDelimiter::Multiline => {
                "Enter your multiline input (type '</multiline>' on a new line when done):"
            }
            BlockDelimiter::Fence => "Paste your multiline content (end with ``` on a new line):",
        }
    }
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// End the session.
    Exit,
    /// Read a block of raw lines up to the closing delimiter.
    BeginBlock(BlockDelimiter),
    /// Send the text as-is.
    Message(String),
}

/// Classifies one input unit.
///
/// Keywords and markers are recognized on the trimmed text; a message keeps
/// its original text.
///
/// # Examples
///
/// ```
/// # use gemini_chat::chat::{InputCommand, parse_input};
/// assert_eq!(parse_input("  QUIT "), InputCommand::Exit);
/// assert_eq!(parse_input("hello"), InputCommand::Message("hello".to_string()));
/// ```
pub fn parse_input(input: &str) -> InputCommand {
    let trimmed = input.trim();
    if EXIT_KEYWORDS
        .iter()
        .any(|keyword| trimmed.eq_ignore_ascii_case(keyword))
    {
        return InputCommand::Exit;
    }
    for delimiter in [BlockDelimiter::Multiline, BlockDelimiter::Fence] {
        if trimmed == delimiter.opening() {
            return InputCommand::BeginBlock(delimiter);
        }
    }
    InputCommand::Message(input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_keywords_any_case() {
        for input in ["exit", "quit", "EXIT", "Quit", "  eXiT\t"] {
            assert_eq!(parse_input(input), InputCommand::Exit, "{input:?}");
        }
    }

    #[test]
    fn exit_keyword_must_be_whole_input() {
        assert_eq!(
            parse_input("quit smoking"),
            InputCommand::Message("quit smoking".to_string())
        );
        assert_eq!(
            parse_input("exit\nnow"),
            InputCommand::Message("exit\nnow".to_string())
        );
    }

    #[test]
    fn block_markers() {
        assert_eq!(
            parse_input("<multiline>"),
            InputCommand::BeginBlock(BlockDelimiter::Multiline)
        );
        assert_eq!(
            parse_input(" ``` "),
            InputCommand::BeginBlock(BlockDelimiter::Fence)
        );
        assert_eq!(
            parse_input("<MULTILINE>"),
            InputCommand::Message("<MULTILINE>".to_string())
        );
    }

    #[test]
    fn fence_closes_with_itself() {
        assert_eq!(BlockDelimiter::Fence.opening(), BlockDelimiter::Fence.closing());
        assert_eq!(BlockDelimiter::Multiline.closing(), "</multiline>");
    }

    #[test]
    fn messages_keep_their_text() {
        assert_eq!(
            parse_input("  indented\n  code"),
            InputCommand::Message("  indented\n  code".to_string())
        );
        assert_eq!(parse_input("   "), InputCommand::Message("   ".to_string()));
    }
}
