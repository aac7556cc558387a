use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("postfix-regex").unwrap()
}

#[test]
fn matches() {
    cmd()
        .arg("a?a?b")
        .arg("ab")
        .assert()
        .code(0)
        .stdout("The string 'ab' matches\n");
}

#[test]
fn does_not_match() {
    cmd()
        .arg("^abc")
        .arg("zabc")
        .assert()
        .code(1)
        .stdout("The string 'zabc' doesn't match\n");
}

#[test]
fn malformed_pattern() {
    cmd()
        .arg("a+???a+bc**")
        .arg("abc")
        .assert()
        .failure()
        .code(predicate::ne(0).and(predicate::ne(1)))
        .stdout("")
        .stderr("Can't parse the regular expression\n");
}

#[test]
fn missing_arguments() {
    cmd()
        .arg("abc")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<STRING>"));
}
