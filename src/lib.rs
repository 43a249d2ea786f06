//! A small interactive shell with pipelines of built-in and external commands.
//!
//! A line is first expanded (`$name` references), then tokenized and parsed into
//! a [`Statement`]: either a variable assignment or a pipeline. The
//! [`Interpreter`] runs pipelines by feeding each command's output string to the
//! next command. Stages run one after another, not concurrently.
//!
//! Built-ins are `echo`, `cat`, `wc`, `grep`, `pwd` and `exit`; any other name is
//! looked up in `PATH` and run as a child process. All operating system access
//! goes through the [`System`] trait so it can be replaced in tests.

mod builtin;
pub mod command;
pub mod env;
mod external;
mod grep;
pub mod io_adapters;
mod interpreter;
pub mod lexer;
pub mod parser;

pub use builtin::{BuiltinCommand, Cat, Counts, Echo, Exit, Pwd, Wc};
pub use command::{Command, CommandError};
pub use external::{ExternalCommand, resolve_program};
pub use grep::{Grep, GrepArgs, GrepArgsError, GrepEngine};
pub use interpreter::{Interpreter, Status, print_result};
pub use io_adapters::{OsSystem, System};
pub use parser::{Statement, parse};
