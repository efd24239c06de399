//! Line editor with history and verb completion

use peer_compare::menu::input::LineSource;
use peer_compare::{Command, CompareError, Result};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};

/// Completes the first word of a line against the menu verbs
#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct VerbCompleter;

/// Verbs starting with the word under the cursor, with the word's start offset
///
/// Only the first word is completed; arguments are left alone.
pub fn complete_verb(line: &str, pos: usize) -> (usize, Vec<&'static str>) {
    let head = &line[..pos];
    let start = head.len() - head.trim_start().len();
    let word = &head[start..];

    if word.contains(char::is_whitespace) {
        return (pos, Vec::new());
    }

    let candidates = Command::verbs().filter(|verb| verb.starts_with(word)).collect();
    (start, candidates)
}

impl Completer for VerbCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, verbs) = complete_verb(line, pos);
        let pairs = verbs
            .into_iter()
            .map(|verb| Pair {
                display: verb.to_string(),
                replacement: verb.to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}

/// Interactive terminal input backed by rustyline
pub struct LineEditor {
    editor: Editor<VerbCompleter, DefaultHistory>,
}

impl LineEditor {
    pub fn new() -> Result<Self> {
        let mut editor = Editor::new().map_err(readline_error)?;
        editor.set_helper(Some(VerbCompleter));
        Ok(Self { editor })
    }
}

fn readline_error(err: ReadlineError) -> CompareError {
    match err {
        ReadlineError::Io(e) => CompareError::Io(e),
        other => CompareError::Other(other.to_string()),
    }
}

impl LineSource for LineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            // Ctrl-C abandons the current line only
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(readline_error(e)),
        }
    }
}
