use crate::command::CommandError;
use crate::io_adapters::{LaunchError, System};
use log::debug;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Command that is not a builtin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
}

impl ExternalCommand {
    pub fn new(program: String, args: Vec<String>) -> Self {
        Self { program, args }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Runs the program with `input` on its stdin and returns its stdout.
    ///
    /// A non-zero exit fails with the first line the program wrote to stderr.
    pub fn execute(&self, input: &str, system: &dyn System) -> Result<String, CommandError> {
        debug!("spawning {} {:?}", self.program, self.args);
        let output = system
            .run(&self.program, &self.args, input)
            .map_err(|e| match e {
                LaunchError::NotFound => CommandError::NotFound(self.program.clone()),
                LaunchError::Io(e) => {
                    CommandError::Execution(format!("{}: {}", self.program, e))
                }
            })?;

        match output.code {
            Some(0) => Ok(output.stdout),
            code => {
                debug!("{} exited with {:?}", self.program, code);
                let message = match (output.stderr.lines().next(), code) {
                    (Some(first_line), _) => first_line.to_string(),
                    (None, Some(code)) => format!("{}: exit status {}", self.program, code),
                    (None, None) => format!("{}: terminated by signal", self.program),
                };
                Err(CommandError::Execution(message))
            }
        }
    }
}

/// Locates the executable a program name refers to.
///
/// A name with a path separator (`./tool`, `bin/tool`, `/usr/bin/tool`) is
/// taken relative to `cwd` and must exist. A bare name is searched in the
/// `search_paths` entries in order; off Unix a file in `cwd` wins first.
pub fn resolve_program(search_paths: &OsStr, cwd: &Path, program: &str) -> Option<PathBuf> {
    let path = Path::new(program);
    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, _) => None,
        (Some(_), None) => {
            if cfg!(not(unix)) {
                let local = cwd.join(path);
                if local.is_file() {
                    return Some(local);
                }
            }
            std::env::split_paths(search_paths)
                .map(|dir| dir.join(path))
                .find(|candidate| candidate.is_file())
        }
        _ => {
            let full = cwd.join(path);
            full.exists().then_some(full)
        }
    }
}
