//! Everything the commands need from the operating system.
//!
//! Commands never touch the filesystem, processes or the working directory
//! directly; they go through a [`System`] so tests can swap in a fake.

use crate::external::resolve_program;
use log::trace;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command as ProcessCommand, Stdio};

/// Captured result of a finished child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` if the process was killed by a signal.
    pub code: Option<i32>,
}

/// Why a program could not be started.
#[derive(Debug)]
pub enum LaunchError {
    /// No executable with that name was found.
    NotFound,
    /// It was found but spawning or talking to it failed.
    Io(io::Error),
}

/// File, process and working-directory services used by commands.
pub trait System {
    /// Read the whole file as text.
    fn read_file(&self, path: &Path) -> io::Result<String>;

    /// Run `program` with `args`, feeding `stdin` and waiting for it to finish.
    fn run(&self, program: &str, args: &[String], stdin: &str)
        -> Result<ProcessOutput, LaunchError>;

    /// Current working directory of the shell.
    fn current_dir(&self) -> io::Result<PathBuf>;
}

/// [`System`] backed by the real operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSystem;

impl System for OsSystem {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn run(
        &self,
        program: &str,
        args: &[String],
        stdin: &str,
    ) -> Result<ProcessOutput, LaunchError> {
        let search_paths = std::env::var_os("PATH").unwrap_or_default();
        let cwd = self.current_dir().map_err(LaunchError::Io)?;
        let executable = resolve_program(&search_paths, &cwd, program)
            .ok_or(LaunchError::NotFound)?;
        trace!("resolved {} to {}", program, executable.display());

        let mut child = ProcessCommand::new(&executable)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => LaunchError::NotFound,
                _ => LaunchError::Io(e),
            })?;

        // Feed stdin from another thread so a child that writes a lot before
        // reading everything can't deadlock against us.
        let writer = child.stdin.take().map(|mut child_stdin| {
            let input = stdin.to_owned();
            std::thread::spawn(move || {
                // The child may exit without reading; a broken pipe is fine.
                let _ = child_stdin.write_all(input.as_bytes());
            })
        });

        let output = child.wait_with_output().map_err(LaunchError::Io)?;
        if let Some(writer) = writer {
            let _ = writer.join();
        }

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code(),
        })
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }
}
