use crate::command::CommandError;
use crate::env::VariableStore;
use crate::io_adapters::{OsSystem, System};
use crate::parser::{self, Statement};
use log::debug;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Whether the shell should keep reading lines after a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Continue,
    Exit,
}

/// A minimal shell interpreter: parses lines and runs the resulting statements.
///
/// The interpreter owns the session's [`VariableStore`] and the [`System`] the
/// commands talk to. Everything runs on the calling thread, one line at a time.
///
/// Example
/// ```
/// use pipeshell::{Interpreter, Status};
/// let mut sh = Interpreter::default();
/// sh.run_line("greeting=hello").unwrap();
/// let (out, status) = sh.run_line("echo $greeting world | wc").unwrap();
/// assert_eq!(out, "1 2 11");
/// assert_eq!(status, Status::Continue);
/// ```
pub struct Interpreter {
    vars: VariableStore,
    system: Box<dyn System>,
}

impl Interpreter {
    /// Create a new interpreter running commands against `system`.
    pub fn new(system: Box<dyn System>) -> Self {
        Self {
            vars: VariableStore::new(),
            system,
        }
    }

    pub fn vars(&self) -> &VariableStore {
        &self.vars
    }

    /// Executes a parsed statement.
    ///
    /// Pipelines are folded left to right: each command gets the previous
    /// command's full output as input, the first one gets `""`. The first failing
    /// command aborts the rest. The status is [`Status::Exit`] only for a
    /// pipeline made of a lone `exit`.
    pub fn execute(&mut self, statement: &Statement) -> Result<(String, Status), CommandError> {
        match statement {
            Statement::Assignment { name, value } => {
                self.vars.set(name.clone(), value.clone());
                Ok((String::new(), Status::Continue))
            }
            Statement::Pipeline(commands) => {
                let status = match commands.as_slice() {
                    [only] if only.is_exit() => Status::Exit,
                    _ => Status::Continue,
                };

                let mut acc = String::new();
                for command in commands {
                    debug!("running {} on {} bytes of input", command.name(), acc.len());
                    acc = command.execute(&acc, self.system.as_ref())?;
                }
                Ok((acc, status))
            }
        }
    }

    /// Parses and executes one line. A blank line does nothing.
    pub fn run_line(&mut self, line: &str) -> anyhow::Result<(String, Status)> {
        match parser::parse(line, &self.vars)? {
            Some(statement) => Ok(self.execute(&statement)?),
            None => Ok((String::new(), Status::Continue)),
        }
    }

    /// Read-Eval-Print Loop.
    ///
    /// Prints each result, reports failures on stderr and keeps going until
    /// `exit`, end of input or an interrupt.
    pub fn repl(&mut self, prompt: &str) -> rustyline::Result<()> {
        let mut rl = DefaultEditor::new()?;

        loop {
            match rl.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    match self.run_line(&line) {
                        Ok((out, status)) => {
                            print_result(&out);
                            if status == Status::Exit {
                                break;
                            }
                        }
                        Err(e) => eprintln!("error: {:#}", e),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }
}

impl Default for Interpreter {
    /// An interpreter talking to the real operating system.
    fn default() -> Self {
        Self::new(Box::new(OsSystem))
    }
}

/// Prints a statement's output, ending it with a newline if it lacks one.
pub fn print_result(out: &str) {
    if out.is_empty() {
        return;
    }
    if out.ends_with('\n') {
        print!("{}", out);
    } else {
        println!("{}", out);
    }
}

#[cfg(test)]
mod pipeline_tests {
    use super::*;
    use crate::builtin::{BuiltinCommand, Cat, Echo, Wc};
    use crate::command::{Command, LINE_ENDING};
    use crate::external::ExternalCommand;
    use crate::grep::Grep;
    use crate::io_adapters::fake::FakeSystem;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn fake_interpreter() -> Interpreter {
        Interpreter::new(Box::new(
            FakeSystem::new().with_file("file1", "content1"),
        ))
    }

    fn run(interp: &mut Interpreter, commands: Vec<Command>) -> Result<String, CommandError> {
        let (out, status) = interp.execute(&Statement::Pipeline(commands))?;
        assert_eq!(status, Status::Continue);
        Ok(out)
    }

    #[test]
    fn test_echo_pipe_wc_output() {
        let mut interp = fake_interpreter();
        let (out, status) = interp.run_line("echo \"22\" | wc").unwrap();
        assert_eq!(status, Status::Continue);
        assert_eq!(out, "1 1 2");
    }

    #[test]
    fn test_each_stage_sees_only_previous_output() {
        let mut interp = fake_interpreter();
        let out = run(
            &mut interp,
            vec![
                Command::Echo(Echo::from_args(strings(&["kek"]))),
                Command::Echo(Echo::from_args(strings(&["lol"]))),
            ],
        );
        assert_eq!(out, Ok("lol".to_string()));

        let out = run(
            &mut interp,
            vec![
                Command::Echo(Echo::from_args(strings(&["kek"]))),
                Command::Cat(Cat::from_args(strings(&["file1"]))),
            ],
        );
        assert_eq!(out, Ok("content1".to_string()));
    }

    #[test]
    fn test_first_stage_gets_empty_input() {
        let mut interp = fake_interpreter();
        let out = run(&mut interp, vec![Command::Wc(Wc::from_args(Vec::new()))]);
        assert_eq!(out, Ok("1 0 0".to_string()));
    }

    #[test]
    fn test_grep_in_pipeline() {
        let mut interp = fake_interpreter();
        let out = run(
            &mut interp,
            vec![
                Command::Echo(Echo::from_args(strings(&["A"]))),
                Command::Grep(Grep::from_args(strings(&["-i", "a"]))),
            ],
        );
        assert_eq!(out, Ok(format!("A{}", LINE_ENDING)));
    }

    #[test]
    fn test_error_aborts_remaining_commands() {
        let mut interp = fake_interpreter();
        let res = run(
            &mut interp,
            vec![
                Command::Echo(Echo::from_args(strings(&["x"]))),
                Command::Wc(Wc::from_args(strings(&["missing"]))),
                Command::External(ExternalCommand::new("never".to_string(), Vec::new())),
            ],
        );
        assert!(matches!(res, Err(CommandError::Execution(_))));
    }

    #[test]
    fn test_not_found_propagates() {
        let mut interp = fake_interpreter();
        let res = interp.run_line("echo x | frobnicate");
        let err = res.unwrap_err();
        assert_eq!(
            err.downcast_ref::<CommandError>(),
            Some(&CommandError::NotFound("frobnicate".to_string()))
        );
    }

    #[test]
    fn test_assignment_then_use() {
        let mut interp = fake_interpreter();
        assert_eq!(
            interp.run_line("a=kek").unwrap(),
            (String::new(), Status::Continue)
        );
        assert_eq!(interp.vars().get("a"), Some("kek"));
        assert_eq!(interp.run_line("echo $a").unwrap().0, "kek");
    }

    #[test]
    fn test_exit_status() {
        let mut interp = fake_interpreter();
        assert_eq!(
            interp.run_line("exit").unwrap(),
            (String::new(), Status::Exit)
        );
        // exit is only special on its own
        assert_eq!(interp.run_line("echo a | exit").unwrap().1, Status::Continue);
        assert_eq!(interp.run_line("exit | echo a").unwrap().1, Status::Continue);
    }

    #[test]
    fn test_blank_line_is_noop() {
        let mut interp = fake_interpreter();
        assert_eq!(
            interp.run_line("  ").unwrap(),
            (String::new(), Status::Continue)
        );
    }

    #[test]
    fn test_failed_line_keeps_session() {
        let mut interp = fake_interpreter();
        interp.run_line("x=1").unwrap();
        assert!(interp.run_line("grep -q x").is_err());
        assert!(interp.run_line("echo \"unterminated").is_err());
        assert_eq!(interp.run_line("echo $x").unwrap().0, "1");
    }
}
