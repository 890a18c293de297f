use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicU64, Ordering};

fn run(workdir: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_wwparse"));
    cmd.current_dir(workdir);
    cmd.args(args).output().expect("run wwparse")
}

fn make_temp_dir() -> PathBuf {
    static DIR_SEQ: AtomicU64 = AtomicU64::new(0);
    let seq = DIR_SEQ.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!("wwparse-exit-test-{}-{seq}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(dir.join("logs")).expect("create log dir");
    dir
}

fn write_log(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join("logs").join(name), contents).expect("write log");
}

#[test]
fn missing_required_option_exits_2() {
    let dir = make_temp_dir();
    let out = run(&dir, &["-i", "logs", "-o", "report.csv"]);
    assert_eq!(out.status.code(), Some(2));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unknown_format_value_exits_2() {
    let dir = make_temp_dir();
    let out = run(
        &dir,
        &["-i", "logs", "-p", "IP", "-o", "report.csv", "-f", "yaml"],
    );
    assert_eq!(out.status.code(), Some(2));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn verbose_and_quiet_conflict_exits_2() {
    let dir = make_temp_dir();
    let out = run(
        &dir,
        &["-i", "logs", "-p", "IP", "-o", "report.csv", "-v", "-q"],
    );
    assert_eq!(out.status.code(), Some(2));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn xml_format_exits_1_without_output() {
    let dir = make_temp_dir();
    write_log(&dir, "exampleorg.json", r#"{"HTTPServer": "nginx"}"#);

    let out = run(
        &dir,
        &["-i", "logs", "-p", "IP", "-o", "report.csv", "-f", "xml"],
    );
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("not supported"));
    assert!(!dir.join("report.csv").exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_input_folder_exits_1() {
    let dir = make_temp_dir();
    let out = run(&dir, &["-i", "no-such-logs", "-p", "IP", "-o", "report.csv"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("no-such-logs"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn folder_without_logs_exits_1() {
    let dir = make_temp_dir();
    std::fs::write(dir.join("logs").join("notes.txt"), "no logs").expect("write file");

    let out = run(&dir, &["-i", "logs", "-p", "IP", "-o", "report.csv"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("no .json log files"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn malformed_log_exits_1_and_names_file() {
    let dir = make_temp_dir();
    write_log(&dir, "good.json", r#"{"HTTPServer": "nginx"}"#);
    write_log(&dir, "zz-refused.json", "https://example.org Connection refused");

    let out = run(&dir, &["-i", "logs", "-p", "IP", "-o", "report.csv"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("zz-refused.json"));
    assert!(!dir.join("report.csv").exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn blank_field_list_exits_1() {
    let dir = make_temp_dir();
    write_log(&dir, "exampleorg.json", r#"{"HTTPServer": "nginx"}"#);

    let out = run(&dir, &["-i", "logs", "-p", " ", "-o", "report.csv"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("field"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_targets_file_exits_2() {
    let dir = make_temp_dir();
    write_log(&dir, "exampleorg.json", r#"{"HTTPServer": "nginx"}"#);

    let out = run(
        &dir,
        &[
            "-i",
            "logs",
            "-p",
            "IP",
            "-o",
            "report.csv",
            "--targets",
            "no-such-urls.txt",
        ],
    );
    assert_eq!(out.status.code(), Some(2));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn init_config_creates_default_file() {
    let dir = make_temp_dir();

    let out = run(&dir, &["--init-config"]);
    assert!(out.status.success());

    let config = std::fs::read_to_string(dir.join(".wwparse.toml")).expect("read config");
    assert!(config.contains("[aggregator]"));

    // A second run refuses to clobber the existing file.
    let again = run(&dir, &["--init-config"]);
    assert_eq!(again.status.code(), Some(1));

    let _ = std::fs::remove_dir_all(&dir);
}
