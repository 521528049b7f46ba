//! End-to-end checks of the rdfuml binary

use std::fs;
use std::process::Command;

fn rdfuml() -> Command {
    Command::new(env!("CARGO_BIN_EXE_rdfuml"))
}

#[test]
fn test_help_lists_options() {
    let output = rdfuml().arg("--help").output().unwrap();
    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    for flag in ["--output", "--input", "--namespace", "--rdfs", "--dot", "--renderer"] {
        assert!(help.contains(flag), "missing {} in help", flag);
    }
}

#[test]
fn test_missing_input_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let output = rdfuml()
        .arg(dir.path().join("absent.ttl"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn test_unknown_format_override_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("data.ttl");
    fs::write(&input, "<http://e.org/a> a <http://e.org/T> .").unwrap();

    let output = rdfuml()
        .args(["-i", "trix"])
        .arg(&input)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unsupported input format"));
}

#[test]
fn test_failed_layout_keeps_dot_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("data.ttl");
    fs::write(
        &input,
        "@prefix ex: <http://example.org/> . ex:a a ex:T ; ex:p ex:b .",
    )
    .unwrap();
    let out = dir.path().join("data.svg");

    let output = rdfuml()
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .arg("-d")
        .arg("--dot-command")
        .arg(dir.path().join("no-such-dot"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Renderer invocation failed"));
    let dot = fs::read_to_string(dir.path().join("data.svg.dot")).unwrap();
    assert!(dot.contains("\"ex_a\" -> \"ex_b\""));
}
