use crate::builtin::{BuiltinCommand, Cat, Echo, Exit, Pwd, Wc};
use crate::external::ExternalCommand;
use crate::grep::Grep;
use crate::io_adapters::System;
use thiserror::Error;

/// Line terminator appended by commands that emit whole lines.
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
/// Line terminator appended by commands that emit whole lines.
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Errors raised by [`Command::execute`].
///
/// Either one aborts the rest of the pipeline it happened in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// An external program could not be located or launched.
    #[error("{0}: command not found")]
    NotFound(String),
    /// A command ran but failed: non-zero exit, bad arguments, missing input file.
    #[error("{0}")]
    Execution(String),
}

/// One stage of a pipeline.
///
/// The set of commands is closed; anything that is not a builtin is an
/// [`ExternalCommand`]. Each stage turns the previous stage's output into its
/// own output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Echo(Echo),
    Cat(Cat),
    Wc(Wc),
    Grep(Grep),
    Pwd(Pwd),
    Exit(Exit),
    External(ExternalCommand),
}

fn try_builtin<T: BuiltinCommand>(name: &str, args: &mut Vec<String>) -> Option<T> {
    (name == T::name()).then(|| T::from_args(std::mem::take(args)))
}

impl Command {
    /// Builds the command selected by `name`, an exact match against the builtin
    /// names, falling back to an external program.
    pub fn from_argv(name: String, mut args: Vec<String>) -> Self {
        let a = &mut args;
        if let Some(c) = try_builtin(&name, a) {
            return Command::Echo(c);
        }
        if let Some(c) = try_builtin(&name, a) {
            return Command::Cat(c);
        }
        if let Some(c) = try_builtin(&name, a) {
            return Command::Wc(c);
        }
        if let Some(c) = try_builtin(&name, a) {
            return Command::Grep(c);
        }
        if let Some(c) = try_builtin(&name, a) {
            return Command::Pwd(c);
        }
        if let Some(c) = try_builtin(&name, a) {
            return Command::Exit(c);
        }
        Command::External(ExternalCommand::new(name, args))
    }

    /// Name the command was invoked by.
    pub fn name(&self) -> &str {
        match self {
            Command::Echo(_) => Echo::name(),
            Command::Cat(_) => Cat::name(),
            Command::Wc(_) => Wc::name(),
            Command::Grep(_) => Grep::name(),
            Command::Pwd(_) => Pwd::name(),
            Command::Exit(_) => Exit::name(),
            Command::External(c) => c.program(),
        }
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, Command::Exit(_))
    }

    /// Runs the command on `input` and returns everything it produced.
    pub fn execute(&self, input: &str, system: &dyn System) -> Result<String, CommandError> {
        match self {
            Command::Echo(c) => c.execute(input, system),
            Command::Cat(c) => c.execute(input, system),
            Command::Wc(c) => c.execute(input, system),
            Command::Grep(c) => c.execute(input, system),
            Command::Pwd(c) => c.execute(input, system),
            Command::Exit(c) => c.execute(input, system),
            Command::External(c) => c.execute(input, system),
        }
    }
}
