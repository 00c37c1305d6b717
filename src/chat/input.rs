//! Line input with paste detection.
//!
//! Typing produces one line at a time. A paste delivers many lines at once,
//! so after each line the collector checks, with a near-zero timeout, whether
//! more input is already waiting. If it is, the waiting lines are drained and
//! joined into one input unit.
//!
//! This is a heuristic: a very fast typist, or automation that writes in
//! bursts, can trigger it too.

use std::collections::VecDeque;
use std::io::{self, IsTerminal};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines, Stdin};

/// How long to wait for more input before deciding a line was typed.
pub const PASTE_POLL: Duration = Duration::from_millis(1);

/// A source of input lines.
#[async_trait]
pub trait LineSource: Send {
    /// Read the next line without its terminator. `None` at end of input.
    async fn read_line(&mut self) -> io::Result<Option<String>>;

    /// Whether a line can be read without waiting longer than `timeout`.
    async fn poll_ready(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Whether a person is typing into this source.
    fn is_interactive(&self) -> bool;
}

/// Reads one input unit from `source`.
///
/// Interactive sources that have more lines ready immediately after the first
/// are drained and the lines joined with `\n`. Returns `None` at end of input.
pub async fn collect_input<S: LineSource + ?Sized>(source: &mut S) -> io::Result<Option<String>> {
    let Some(first) = source.read_line().await? else {
        return Ok(None);
    };
    if !source.is_interactive() {
        return Ok(Some(first));
    }

    let mut lines = vec![first];
    while source.poll_ready(PASTE_POLL).await? {
        match source.read_line().await? {
            Some(line) => lines.push(line),
            None => break,
        }
    }
    Ok(Some(lines.join("\n")))
}

/// Reads raw lines until one whose trimmed text equals `end_marker`.
///
/// The marker line is consumed and not included. End of input also ends the
/// block. Lines are joined with `\n`.
pub async fn read_block<S: LineSource + ?Sized>(
    source: &mut S,
    end_marker: &str,
) -> io::Result<String> {
    let mut lines = Vec::new();
    while let Some(line) = source.read_line().await? {
        if line.trim() == end_marker {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

/// Lines read from standard input, or from any other async reader.
///
/// A line drawn by [`LineSource::poll_ready`] is held back until the next
/// [`LineSource::read_line`].
pub struct TerminalInput<R = Stdin> {
    lines: Lines<BufReader<R>>,
    pending: Option<String>,
    eof: bool,
    interactive: bool,
}

impl TerminalInput<Stdin> {
    /// Wraps the process's standard input.
    pub fn new() -> Self {
        Self::from_reader(tokio::io::stdin(), io::stdin().is_terminal())
    }
}

impl<R: AsyncRead + Unpin> TerminalInput<R> {
    /// Reads lines from `reader`, treating it as typed input when `interactive`.
    pub fn from_reader(reader: R, interactive: bool) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            pending: None,
            eof: false,
            interactive,
        }
    }

    async fn next_line(&mut self) -> io::Result<Option<String>> {
        if self.eof {
            return Ok(None);
        }
        let line = self.lines.next_line().await?;
        if line.is_none() {
            self.eof = true;
        }
        Ok(line)
    }
}

impl Default for TerminalInput<Stdin> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> LineSource for TerminalInput<R> {
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }
        self.next_line().await
    }

    async fn poll_ready(&mut self, timeout: Duration) -> io::Result<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        if self.eof {
            return Ok(false);
        }
        // `Lines::next_line` is cancel safe, so a timed-out read loses nothing.
        match tokio::time::timeout(timeout, self.next_line()).await {
            Ok(Ok(Some(line))) => {
                self.pending = Some(line);
                Ok(true)
            }
            Ok(Ok(None)) => Ok(false),
            Ok(Err(err)) => Err(err),
            Err(_) => Ok(false),
        }
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

#[derive(Debug, Clone)]
struct ScriptedLine {
    text: String,
    burst: bool,
}

/// A predetermined sequence of lines.
///
/// Each line is either typed (arrives on its own) or part of a paste (already
/// waiting when the previous line is read).
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    lines: VecDeque<ScriptedLine>,
    interactive: bool,
    reads: usize,
}

impl ScriptedInput {
    /// An empty, interactive script.
    pub fn new() -> Self {
        Self {
            lines: VecDeque::new(),
            interactive: true,
            reads: 0,
        }
    }

    /// A script of individually typed lines.
    pub fn typed_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        lines.into_iter().fold(Self::new(), |script, line| script.typed(line))
    }

    /// Append a line that arrives on its own.
    pub fn typed(mut self, line: impl Into<String>) -> Self {
        self.lines.push_back(ScriptedLine {
            text: line.into(),
            burst: false,
        });
        self
    }

    /// Append lines that arrive together, as a paste does.
    pub fn pasted<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for (index, line) in lines.into_iter().enumerate() {
            self.lines.push_back(ScriptedLine {
                text: line.into(),
                burst: index > 0,
            });
        }
        self
    }

    /// Behave like redirected input rather than a terminal.
    pub fn non_interactive(mut self) -> Self {
        self.interactive = false;
        self
    }

    /// Lines not yet read.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }

    /// Lines read so far.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl Default for ScriptedInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LineSource for ScriptedInput {
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        let line = self.lines.pop_front().map(|line| line.text);
        if line.is_some() {
            self.reads += 1;
        }
        Ok(line)
    }

    async fn poll_ready(&mut self, _: Duration) -> io::Result<bool> {
        Ok(self.lines.front().is_some_and(|line| line.burst))
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncWriteExt;

    use super::*;

    #[tokio::test]
    async fn typed_lines_are_separate_units() {
        let mut input = ScriptedInput::typed_lines(["one", "two"]);
        assert_eq!(collect_input(&mut input).await.unwrap().as_deref(), Some("one"));
        assert_eq!(collect_input(&mut input).await.unwrap().as_deref(), Some("two"));
        assert_eq!(collect_input(&mut input).await.unwrap(), None);
    }

    #[tokio::test]
    async fn pasted_lines_are_joined() {
        let mut input = ScriptedInput::new()
            .pasted(["fn main() {", "    println!(\"hi\");", "}"])
            .typed("next");
        assert_eq!(
            collect_input(&mut input).await.unwrap().as_deref(),
            Some("fn main() {\n    println!(\"hi\");\n}")
        );
        assert_eq!(collect_input(&mut input).await.unwrap().as_deref(), Some("next"));
    }

    #[tokio::test]
    async fn back_to_back_pastes_stay_apart() {
        let mut input = ScriptedInput::new().pasted(["a", "b"]).pasted(["c", "d"]);
        assert_eq!(collect_input(&mut input).await.unwrap().as_deref(), Some("a\nb"));
        assert_eq!(collect_input(&mut input).await.unwrap().as_deref(), Some("c\nd"));
    }

    #[tokio::test]
    async fn non_interactive_never_joins() {
        let mut input = ScriptedInput::new().pasted(["a", "b"]).non_interactive();
        assert_eq!(collect_input(&mut input).await.unwrap().as_deref(), Some("a"));
        assert_eq!(collect_input(&mut input).await.unwrap().as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn block_stops_at_trimmed_marker() {
        let mut input = ScriptedInput::typed_lines(["a", "  b", " </multiline> ", "after"]);
        assert_eq!(read_block(&mut input, "</multiline>").await.unwrap(), "a\n  b");
        assert_eq!(input.remaining(), 1);
    }

    #[tokio::test]
    async fn reader_line_drawn_by_poll_is_held_back() {
        let (mut writer, reader) = tokio::io::duplex(64);
        let mut input = TerminalInput::from_reader(reader, true);
        writer.write_all(b"a\nb\n").await.unwrap();

        assert_eq!(input.read_line().await.unwrap().as_deref(), Some("a"));
        assert!(input.poll_ready(PASTE_POLL).await.unwrap());
        assert!(input.poll_ready(PASTE_POLL).await.unwrap());
        assert_eq!(input.read_line().await.unwrap().as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn timed_out_poll_loses_no_input() {
        let (mut writer, reader) = tokio::io::duplex(64);
        let mut input = TerminalInput::from_reader(reader, true);

        assert!(!input.poll_ready(PASTE_POLL).await.unwrap());
        writer.write_all(b"par").await.unwrap();
        assert!(!input.poll_ready(PASTE_POLL).await.unwrap());
        writer.write_all(b"tial\nlate\n").await.unwrap();

        assert_eq!(input.read_line().await.unwrap().as_deref(), Some("partial"));
        assert_eq!(input.read_line().await.unwrap().as_deref(), Some("late"));
    }

    #[tokio::test]
    async fn closed_reader_is_end_of_input() {
        let (mut writer, reader) = tokio::io::duplex(64);
        let mut input = TerminalInput::from_reader(reader, true);
        writer.write_all(b"last\n").await.unwrap();
        drop(writer);

        assert_eq!(input.read_line().await.unwrap().as_deref(), Some("last"));
        assert!(!input.poll_ready(PASTE_POLL).await.unwrap());
        assert_eq!(input.read_line().await.unwrap(), None);
        assert_eq!(input.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn reader_burst_is_one_unit() {
        let (mut writer, reader) = tokio::io::duplex(64);
        let mut input = TerminalInput::from_reader(reader, true);
        writer.write_all(b"x\ny\nz\n").await.unwrap();
        drop(writer);

        assert_eq!(collect_input(&mut input).await.unwrap().as_deref(), Some("x\ny\nz"));
        assert_eq!(collect_input(&mut input).await.unwrap(), None);
    }

    #[tokio::test]
    async fn redirected_reader_is_line_by_line() {
        let (mut writer, reader) = tokio::io::duplex(64);
        let mut input = TerminalInput::from_reader(reader, false);
        writer.write_all(b"x\ny\n").await.unwrap();
        drop(writer);

        assert!(!input.is_interactive());
        assert_eq!(collect_input(&mut input).await.unwrap().as_deref(), Some("x"));
        assert_eq!(collect_input(&mut input).await.unwrap().as_deref(), Some("y"));
    }

    #[tokio::test]
    async fn block_ends_at_eof() {
        let mut input = ScriptedInput::typed_lines(["a", "b"]);
        assert_eq!(read_block(&mut input, "```").await.unwrap(), "a\nb");
        assert_eq!(read_block(&mut input, "```").await.unwrap(), "");
    }
}
