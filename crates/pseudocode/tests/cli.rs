//! CLI tests for the pseudocode binary.

use assert_cmd::Command;
use insta::assert_snapshot;
use tempfile::TempDir;

/// A command isolated from the user's config and log settings.
fn pseudocode(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pseudocode").unwrap();
    cmd.current_dir(dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("xdg"))
        .env_remove("RUST_LOG");
    cmd
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

const GRADES: &str = r#"score = int(input())
if score >= 7:
    print("Pass")
elif score >= 4:
    print("Retake")
else:
    print("Fail")
"#;

#[test]
fn translate_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("grades.py"), GRADES).unwrap();

    let output = pseudocode(&dir)
        .args(["translate", "grades.py"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_snapshot!(stdout(&output), @r#"
score ← int(input())
IF score ≥ 7 THEN
    OUTPUT "Pass"
ELSE IF score ≥ 4 THEN
    OUTPUT "Retake"
ELSE
    OUTPUT "Fail"
END IF
"#);
    assert!(stderr(&output).is_empty());
}

#[test]
fn translate_stdin() {
    let dir = TempDir::new().unwrap();
    let output = pseudocode(&dir)
        .arg("translate")
        .write_stdin("for i in range(0, 10):\n    print(i)\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout(&output), "loop i from 0 to 9\n    OUTPUT i\nend loop\n");
}

#[test]
fn translate_to_output_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("x.py"), "x = 1\n").unwrap();

    let output = pseudocode(&dir)
        .args(["translate", "x.py", "-o", "x.pseudo"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
    let written = std::fs::read_to_string(dir.path().join("x.pseudo")).unwrap();
    assert_eq!(written, "x ← 1\n");
}

#[test]
fn flagged_constructs_warn_and_strict_fails() {
    let dir = TempDir::new().unwrap();
    let source = "a = 1\nimport math\nb = 2\n";

    let output = pseudocode(&dir)
        .arg("translate")
        .write_stdin(source)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("// ⚠ unsupported import statement: import math"));
    assert!(stderr(&output).contains("unsupported import statement"));

    let output = pseudocode(&dir)
        .args(["translate", "--strict"])
        .write_stdin(source)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).contains("a ← 1"));

    let output = pseudocode(&dir)
        .args(["translate", "--strict"])
        .write_stdin("a = 1\n")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn json_result() {
    let dir = TempDir::new().unwrap();
    let output = pseudocode(&dir)
        .args(["translate", "--json"])
        .write_stdin("y = x ** 2\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["input"], "-");
    assert_eq!(result["source_language"], "python");
    assert_eq!(result["target_language"], "ib");
    assert_eq!(result["code"], "y ← x ? 2");
    assert_eq!(result["flags"][0]["line"], 1);
    assert_eq!(result["flags"][0]["construct"], "operator");
    assert!(result.get("output").is_none());
}

#[test]
fn ir_dump() {
    let dir = TempDir::new().unwrap();
    let output = pseudocode(&dir)
        .args(["translate", "--ir"])
        .write_stdin("x = 5\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    let ir: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(ir["body"][0]["Assign"]["value"]["Literal"]["Number"], "5");
}

#[test]
fn syntax_error_exits_with_one_line() {
    let dir = TempDir::new().unwrap();
    let output = pseudocode(&dir)
        .arg("translate")
        .write_stdin("x = 1\nif x\n    y = 2\n")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    let err = stderr(&output);
    assert_eq!(err.lines().count(), 1, "{err}");
    assert!(err.starts_with("error: failed to parse - as python: syntax error at line 2"));
}

#[test]
fn missing_input_file() {
    let dir = TempDir::new().unwrap();
    let output = pseudocode(&dir)
        .args(["translate", "nope.py"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("error: failed to read nope.py"));
}

#[test]
fn project_config_changes_rendering() {
    let dir = TempDir::new().unwrap();
    let config_dir = dir.path().join(".pseudocode");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[render]\nindent_width = 2\noutput_functions = [\"show\"]\n",
    )
    .unwrap();

    let output = pseudocode(&dir)
        .arg("translate")
        .write_stdin("while going:\n    show(step)\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout(&output), "WHILE going DO\n  OUTPUT step\nEND WHILE\n");
}

#[test]
fn languages_lists_registry() {
    let dir = TempDir::new().unwrap();
    let output = pseudocode(&dir).arg("languages").output().unwrap();

    assert!(output.status.success());
    assert_snapshot!(stdout(&output), @r"
Readers:
  python (.py, .pyw)
Writers:
  ib (.pseudo)
");
}
