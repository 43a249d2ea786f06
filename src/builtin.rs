use crate::command::{CommandError, LINE_ENDING};
use crate::io_adapters::System;
use log::warn;
use std::path::Path;

/// Built-in commands known to the shell at compile time.
///
/// Builtins run in-process: they take the previous stage's output as a string
/// and return their own output.
pub trait BuiltinCommand: Sized {
    /// Canonical name of the command, e.g. "echo" or "wc".
    fn name() -> &'static str;

    /// Build the command from the words following its name.
    fn from_args(args: Vec<String>) -> Self;

    /// Executes the command on `input`.
    fn execute(&self, input: &str, system: &dyn System) -> Result<String, CommandError>;
}

/// Write the arguments separated by single spaces. Input is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Echo {
    pub args: Vec<String>,
}

impl BuiltinCommand for Echo {
    fn name() -> &'static str {
        "echo"
    }

    fn from_args(args: Vec<String>) -> Self {
        Self { args }
    }

    fn execute(&self, _input: &str, _system: &dyn System) -> Result<String, CommandError> {
        Ok(self.args.join(" "))
    }
}

/// Concatenate files, or pass input through when no files are given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cat {
    pub files: Vec<String>,
}

impl BuiltinCommand for Cat {
    fn name() -> &'static str {
        "cat"
    }

    fn from_args(files: Vec<String>) -> Self {
        Self { files }
    }

    fn execute(&self, input: &str, system: &dyn System) -> Result<String, CommandError> {
        if self.files.is_empty() {
            return Ok(input.to_string());
        }
        let mut out = String::new();
        for fname in &self.files {
            match system.read_file(Path::new(fname)) {
                Ok(content) => out.push_str(&content),
                // Unreadable files are skipped, not fatal.
                Err(e) => warn!("cat: {}: {}", fname, e),
            }
        }
        Ok(out)
    }
}

/// Line, word and character counts of a text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub lines: usize,
    pub words: usize,
    pub chars: usize,
}

impl Counts {
    /// Lines are the segments between line breaks, so text without a trailing
    /// newline still counts its last line and `""` counts as one line.
    pub fn of(text: &str) -> Self {
        Self {
            lines: text.split('\n').count(),
            words: text.split_whitespace().count(),
            chars: text.chars().count(),
        }
    }

    fn add(self, other: Counts) -> Counts {
        Counts {
            lines: self.lines + other.lines,
            words: self.words + other.words,
            chars: self.chars + other.chars,
        }
    }
}

impl std::fmt::Display for Counts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.lines, self.words, self.chars)
    }
}

/// Count lines, words and characters of the input or of each named file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wc {
    pub files: Vec<String>,
}

impl BuiltinCommand for Wc {
    fn name() -> &'static str {
        "wc"
    }

    fn from_args(files: Vec<String>) -> Self {
        Self { files }
    }

    fn execute(&self, input: &str, system: &dyn System) -> Result<String, CommandError> {
        if self.files.is_empty() {
            return Ok(Counts::of(input).to_string());
        }

        let mut lines = Vec::with_capacity(self.files.len() + 1);
        let mut total = Counts::default();
        for fname in &self.files {
            // Unlike cat and grep, a missing file fails the whole command.
            let content = system
                .read_file(Path::new(fname))
                .map_err(|e| CommandError::Execution(format!("wc: {}: {}", fname, e)))?;
            let counts = Counts::of(&content);
            total = total.add(counts);
            lines.push(format!("{}: {}", fname, counts));
        }
        if self.files.len() > 1 {
            lines.push(format!("total: {}", total));
        }
        Ok(lines.join(LINE_ENDING))
    }
}

/// Print the current working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pwd;

impl BuiltinCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn from_args(_args: Vec<String>) -> Self {
        Pwd
    }

    fn execute(&self, _input: &str, system: &dyn System) -> Result<String, CommandError> {
        let dir = system
            .current_dir()
            .map_err(|e| CommandError::Execution(format!("pwd: {}", e)))?;
        Ok(dir.to_string_lossy().into_owned())
    }
}

/// Stop the shell. Produces no output; arguments are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit;

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn from_args(_args: Vec<String>) -> Self {
        Exit
    }

    fn execute(&self, _input: &str, _system: &dyn System) -> Result<String, CommandError> {
        Ok(String::new())
    }
}
