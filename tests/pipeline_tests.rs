use pipeshell::command::LINE_ENDING;
use pipeshell::{
    BuiltinCommand, Command, CommandError, Echo, Grep, Interpreter, OsSystem, Statement, Status,
    Wc,
};
use std::env as stdenv;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Writes `content` to `dir/name`; the file goes away with `dir`.
fn temp_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let p = dir.path().join(name);
    let mut f = fs::File::create(&p).expect("create tmp file");
    write!(f, "{}", content).expect("write");
    p
}

fn run_pipeline(commands: Vec<Command>) -> Result<String, CommandError> {
    let mut shell = Interpreter::default();
    let (out, status) = shell.execute(&Statement::Pipeline(commands))?;
    assert_eq!(status, Status::Continue);
    Ok(out)
}

#[test]
fn wc_of_piped_word() {
    let out = run_pipeline(vec![
        Command::Echo(Echo::from_args(strings(&["kek"]))),
        Command::Wc(Wc::from_args(Vec::new())),
    ]);
    assert_eq!(out, Ok("1 1 3".to_string()));
}

#[test]
fn grep_whole_word_with_context_from_file() {
    let dir = TempDir::new().unwrap();
    let file4 = temp_file(&dir, "file4", "1\n2\nkek find me lol\nkeeeeek\n");
    let name = file4.to_string_lossy().to_string();

    let out = run_pipeline(vec![Command::Grep(Grep::from_args(strings(&[
        "-w", "-A", "1", "find", &name,
    ])))]);
    assert_eq!(
        out,
        Ok(format!("kek find me lol{0}keeeeek{0}", LINE_ENDING))
    );
}

#[test]
fn grep_rejects_bad_arguments_before_reading_files() {
    // the file does not exist; the error must come from argument parsing
    for args in [
        &["-A", "-10", "find", "no_such_file"][..],
        &["-q", "find", "no_such_file"][..],
    ] {
        let res = run_pipeline(vec![Command::Grep(Grep::from_args(strings(args)))]);
        assert!(matches!(res, Err(CommandError::Execution(_))), "{:?}", args);
    }
}

#[test]
fn cat_and_wc_on_real_files() {
    let dir = TempDir::new().unwrap();
    let a = temp_file(&dir, "a", "one two\nthree\n");
    let b = temp_file(&dir, "b", "four");
    let (a_name, b_name) = (
        a.to_string_lossy().to_string(),
        b.to_string_lossy().to_string(),
    );

    let mut shell = Interpreter::default();
    let (out, _) = shell
        .run_line(&format!("cat {} missing_file {} | wc", a_name, b_name))
        .unwrap();
    assert_eq!(out, "3 4 18");

    let (out, _) = shell.run_line(&format!("wc {} {}", a_name, b_name)).unwrap();
    let expected = [
        format!("{}: 3 3 14", a_name),
        format!("{}: 1 1 4", b_name),
        "total: 4 4 18".to_string(),
    ]
    .join(LINE_ENDING);
    assert_eq!(out, expected);
}

#[test]
fn unknown_program_is_not_found() {
    let mut shell = Interpreter::new(Box::new(OsSystem));
    let err = shell.run_line("pipeshell_no_such_program arg").unwrap_err();
    assert_eq!(
        err.downcast_ref::<CommandError>(),
        Some(&CommandError::NotFound(
            "pipeshell_no_such_program".to_string()
        ))
    );
}

#[cfg(unix)]
#[test]
fn failing_program_reports_first_stderr_line() {
    let mut shell = Interpreter::default();
    let err = shell
        .run_line("sh -c \"echo first >&2; echo second >&2; exit 1\"")
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<CommandError>(),
        Some(&CommandError::Execution("first".to_string()))
    );
}

#[cfg(unix)]
#[test]
fn external_commands_in_the_middle_of_a_pipeline() {
    let mut shell = Interpreter::default();
    shell.run_line("word=banana").unwrap();
    let (out, status) = shell.run_line("echo $word | tr a-z A-Z | wc").unwrap();
    assert_eq!(out, "1 1 6");
    assert_eq!(status, Status::Continue);
}

#[test]
fn pwd_matches_process_directory() {
    let mut shell = Interpreter::default();
    let (out, _) = shell.run_line("pwd").unwrap();
    assert_eq!(out, stdenv::current_dir().unwrap().to_string_lossy());
}

#[test]
fn exit_stops_the_session() {
    let mut shell = Interpreter::default();
    assert_eq!(shell.run_line("exit").unwrap().1, Status::Exit);
}

#[test]
fn apostrophe_inside_double_quotes_still_substitutes() {
    let mut shell = Interpreter::default();
    shell.run_line("x=1").unwrap();
    let (out, _) = shell.run_line("echo \"it's $x\" '$x'").unwrap();
    assert_eq!(out, "it's 1 $x");
}
