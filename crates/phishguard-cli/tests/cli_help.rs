use assert_cmd::Command;

#[test]
fn help_lists_commands() {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("phishguard"));
    let output = cmd
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&output);
    for name in ["serve", "check"] {
        assert!(text.contains(name), "missing command {name}");
    }
}

#[test]
fn invalid_log_level_is_rejected() {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("phishguard"));
    cmd.arg("--log-level")
        .arg("chatty")
        .arg("check")
        .arg("snapshot.json");
    cmd.assert().failure().code(2);
}
