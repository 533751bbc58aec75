use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn formula(source: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".wf")
        .tempfile()
        .expect("temp file");
    file.write_all(source.as_bytes()).expect("write formula");
    file
}

#[test]
fn tokens_as_json() {
    let file = formula("var x = 1;\nx * 42");
    let mut cmd = cargo_bin_cmd!("wflang");
    cmd.arg("tokens").arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"Var\"").and(predicate::str::contains("\"literal\": \"42\"")));
}

#[test]
fn tokens_simple_format() {
    let file = formula("sumTime(over day, hours)");
    let mut cmd = cargo_bin_cmd!("wflang");
    cmd.arg("tokens")
        .arg(file.path())
        .arg("--format")
        .arg("simple");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("BUILTIN \"sumTime\""));
}

#[test]
fn tokens_rejects_unknown_format() {
    let file = formula("1");
    let mut cmd = cargo_bin_cmd!("wflang");
    cmd.arg("tokens").arg(file.path()).arg("--format").arg("yaml");

    cmd.assert().failure();
}

#[test]
fn ast_prints_tree() {
    let file = formula("var x = 1;\nx * 42");
    let mut cmd = cargo_bin_cmd!("wflang");
    cmd.arg("ast").arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("VarBinding").and(predicate::str::contains("Infix")));
}

#[test]
fn check_passes_clean_formula() {
    let file = formula("var threshold = 40;\nmax(threshold, 0)");
    let mut cmd = cargo_bin_cmd!("wflang");
    cmd.arg("check").arg(file.path());

    cmd.assert().success().stdout(predicate::str::ends_with(": ok\n"));
}

#[test]
fn check_fails_on_reserved_word() {
    let file = formula("var sum = 1;");
    let mut cmd = cargo_bin_cmd!("wflang");
    cmd.arg("check").arg(file.path());

    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains(":1:5: error[reserved word]"));
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut cmd = cargo_bin_cmd!("wflang");
    cmd.arg("check").arg(dir.path().join("absent.wf"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Cannot read"));
}

#[test]
fn repl_reads_stdin_until_quit() {
    let mut cmd = cargo_bin_cmd!("wflang");
    cmd.arg("repl").write_stdin("1\n:tokens x\n.q\n2\n");

    cmd.assert().success().stdout(
        predicate::str::contains("=> 1\n")
            .and(predicate::str::contains("IDENT \"x\""))
            .and(predicate::str::contains("=> 2").not()),
    );
}
