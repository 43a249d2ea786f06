//! The `grep` builtin: argument parsing and line filtering.

use crate::builtin::BuiltinCommand;
use crate::command::{CommandError, LINE_ENDING};
use crate::io_adapters::System;
use argh::{EarlyExit, FromArgs};
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::path::Path;
use thiserror::Error;

#[derive(FromArgs, Debug)]
/// print lines matching a pattern
struct GrepOptions {
    #[argh(switch, short = 'i')]
    /// ignore case distinctions
    ignore_case: bool,

    #[argh(switch, short = 'w')]
    /// match only whole words (using non-word characters as boundaries)
    word_regexp: bool,

    #[argh(option, short = 'A')]
    /// print NUM lines of trailing context after matching lines
    after_context: Option<String>,

    #[argh(positional)]
    /// the pattern to search for (a regular expression)
    pattern: String,

    #[argh(positional)]
    /// files to search. If none provided, reads the piped input.
    files: Vec<String>,
}

/// Why grep's arguments were rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrepArgsError {
    /// Unknown flag, missing pattern or similar, as reported by the parser.
    #[error("{0}")]
    Usage(String),
    /// `--help` was requested; holds the usage text.
    #[error("{0}")]
    Help(String),
    /// `-A` got something that is not an integer.
    #[error("-A argument is not a number: {0}")]
    InvalidNumber(String),
    /// `-A` got a negative integer.
    #[error("-A argument < 0: {0}")]
    NegativeCount(i64),
}

/// Validated grep arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrepArgs {
    pub ignore_case: bool,
    pub word_regexp: bool,
    pub after_context: usize,
    pub pattern: String,
    pub files: Vec<String>,
}

impl GrepArgs {
    /// Parse `grep`'s arguments (without the command name).
    pub fn parse(args: &[String]) -> Result<Self, GrepArgsError> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let options = GrepOptions::from_args(&[Grep::name()], &args).map_err(
            |EarlyExit { output, status }| match status {
                Ok(()) => GrepArgsError::Help(output),
                Err(()) => GrepArgsError::Usage(output.trim_end().to_string()),
            },
        )?;

        let after_context = match options.after_context {
            None => 0,
            Some(raw) => {
                let n: i64 = raw
                    .parse()
                    .map_err(|_| GrepArgsError::InvalidNumber(raw.clone()))?;
                usize::try_from(n).map_err(|_| GrepArgsError::NegativeCount(n))?
            }
        };

        Ok(Self {
            ignore_case: options.ignore_case,
            word_regexp: options.word_regexp,
            after_context,
            pattern: options.pattern,
            files: options.files,
        })
    }
}

/// Compiled pattern plus the trailing-context setting.
#[derive(Debug, Clone)]
pub struct GrepEngine {
    regex: Regex,
    after_context: usize,
}

impl GrepEngine {
    pub fn new(args: &GrepArgs) -> Result<Self, regex::Error> {
        let pattern = if args.word_regexp {
            format!(r"\b({})\b", args.pattern)
        } else {
            args.pattern.clone()
        };

        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(args.ignore_case)
            .build()?;

        Ok(Self {
            regex,
            after_context: args.after_context,
        })
    }

    /// Keeps matching lines and up to `after_context` lines after each match.
    ///
    /// A match resets the context counter, so overlapping windows extend
    /// rather than stack. Every emitted line ends with [`LINE_ENDING`].
    pub fn filter(&self, text: &str) -> String {
        let mut out = String::new();
        let mut remaining = 0;

        for line in text.split('\n') {
            if self.regex.is_match(line) {
                remaining = self.after_context;
            } else if remaining > 0 {
                remaining -= 1;
            } else {
                continue;
            }
            out.push_str(line);
            out.push_str(LINE_ENDING);
        }
        out
    }
}

/// Print lines matching a pattern, from files or from the piped input.
///
/// Arguments are kept raw and parsed on execution, so bad flags surface as a
/// command error like any other failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grep {
    pub args: Vec<String>,
}

impl BuiltinCommand for Grep {
    fn name() -> &'static str {
        "grep"
    }

    fn from_args(args: Vec<String>) -> Self {
        Self { args }
    }

    fn execute(&self, input: &str, system: &dyn System) -> Result<String, CommandError> {
        let args = match GrepArgs::parse(&self.args) {
            Ok(args) => args,
            Err(GrepArgsError::Help(usage)) => return Ok(usage),
            Err(e) => return Err(CommandError::Execution(format!("grep: {}", e))),
        };
        debug!("grep with {:?}", args);

        let engine = GrepEngine::new(&args).map_err(|e| {
            CommandError::Execution(format!("grep: invalid pattern {}: {}", args.pattern, e))
        })?;

        if args.files.is_empty() {
            return Ok(engine.filter(input));
        }

        let mut out = String::new();
        for file_name in &args.files {
            match system.read_file(Path::new(file_name)) {
                Ok(content) => out.push_str(&engine.filter(&content)),
                Err(e) => warn!("grep: {}: {}", file_name, e),
            }
        }
        Ok(out)
    }
}
