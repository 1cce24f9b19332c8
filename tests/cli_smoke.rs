use predicates::prelude::*;

#[test]
fn help_lists_the_serve_flags() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("multiview");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--addr"))
        .stdout(predicate::str::contains("--web-dir"));
}

#[test]
fn invalid_addr_is_rejected() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("multiview");
    cmd.args(["--addr", "not-an-addr"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--addr"));
}
