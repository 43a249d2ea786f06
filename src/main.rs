use anyhow::{Result, anyhow};
use argh::FromArgs;
use pipeshell::{Interpreter, Status, print_result};

#[derive(FromArgs)]
/// A minimal shell: echo, cat, wc, grep, pwd, exit, pipes and variables.
struct Options {
    #[argh(option, short = 'c')]
    /// run this line instead of starting the interactive loop (may repeat)
    command: Vec<String>,

    #[argh(option, default = "String::from(\"$ \")")]
    /// prompt shown by the interactive loop
    prompt: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let options: Options = argh::from_env();
    let mut shell = Interpreter::default();

    if options.command.is_empty() {
        shell.repl(&options.prompt)?;
        return Ok(());
    }

    run_commands(&mut shell, &options.command)
}

/// Runs each `-c` line in order, stopping early on `exit`. Every line runs even
/// when an earlier one fails; the result is an error if any of them failed.
fn run_commands(shell: &mut Interpreter, lines: &[String]) -> Result<()> {
    let mut failed = false;
    for line in lines {
        match shell.run_line(line) {
            Ok((out, status)) => {
                print_result(&out);
                if status == Status::Exit {
                    break;
                }
            }
            Err(e) => {
                eprintln!("error: {:#}", e);
                failed = true;
            }
        }
    }
    if failed {
        return Err(anyhow!("one or more commands failed"));
    }
    Ok(())
}
