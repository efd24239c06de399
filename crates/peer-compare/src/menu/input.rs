//! Line input sources for menu loops

use crate::error::Result;
use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Blocking source of menu input lines
pub trait LineSource {
    /// Show `prompt` and read one line; `Ok(None)` at end of input
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Plain buffered reader, prompting on the given writer
pub struct StdinLines<R, W> {
    reader: R,
    writer: W,
}

impl StdinLines<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Read from the process's stdin, prompting on stdout
    pub fn stdin() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> StdinLines<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<R: BufRead, W: Write> LineSource for StdinLines<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.writer, "{prompt}")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Pre-recorded lines, echoed after the prompt as they are consumed
#[derive(Debug, Default)]
pub struct ScriptedLines {
    lines: VecDeque<String>,
    echo: bool,
}

impl ScriptedLines {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            echo: false,
        }
    }

    /// Split a `;`-separated command string, e.g. `"select NIO,LI; historical"`
    pub fn from_script(script: &str) -> Self {
        Self::new(script.split(';').map(str::trim).filter(|line| !line.is_empty()))
    }

    /// Print each prompt and line as it is consumed
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Lines not yet consumed
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedLines {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let line = self.lines.pop_front();
        if self.echo {
            if let Some(line) = &line {
                println!("{prompt}{line}");
            }
        }
        Ok(line)
    }
}
