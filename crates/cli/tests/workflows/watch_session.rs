//! `tmpwatch watch` start/quit cycle

use super::Workspace;
use std::time::Duration;

#[test]
fn test_watch_creates_directory_and_quits_on_q() {
    let ws = Workspace::new();
    assert!(!ws.watch_dir.exists());

    let result = ws
        .command("watch")
        .args(&["--quiet"])
        .stdin("q\n")
        .assert_success()
        .unwrap();

    assert!(ws.watch_dir.is_dir());
    assert!(result.contains_stdout("Watching for temporary files"));
    assert!(result.contains_stdout(&ws.log_file.display().to_string()));

    let log = std::fs::read_to_string(&ws.log_file).unwrap();
    let lines: Vec<_> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains(" - Started watching directory: "));
    assert!(lines[1].contains(" - Stopped watching directory: "));
}

#[test]
fn test_watch_ignores_other_input_until_q() {
    let ws = Workspace::new();

    ws.command("watch")
        .args(&["--quiet"])
        .stdin("hello\nquit\nQ\n")
        .assert_success()
        .unwrap();

    let log = std::fs::read_to_string(&ws.log_file).unwrap();
    assert!(log.lines().last().unwrap().contains("Stopped watching directory"));
}

#[test]
fn test_watch_echoes_log_lines_unless_quiet() {
    let ws = Workspace::new();

    let result = ws.command("watch").stdin("q\n").assert_success().unwrap();
    assert!(result.contains_stdout(" - Started watching directory: "));
    assert!(result.contains_stdout(" - Stopped watching directory: "));
}

#[test]
fn test_watch_with_sweep_removes_existing_files() {
    let ws = Workspace::new();
    std::fs::create_dir_all(&ws.watch_dir).unwrap();
    std::fs::write(ws.watch_dir.join("old.tmp"), b"x").unwrap();
    std::fs::write(ws.watch_dir.join("keep.txt"), b"x").unwrap();

    ws.command("watch")
        .args(&["--quiet", "--sweep-existing"])
        .stdin("q\n")
        .assert_success()
        .unwrap();

    assert!(!ws.watch_dir.join("old.tmp").exists());
    assert!(ws.watch_dir.join("keep.txt").exists());

    let log = std::fs::read_to_string(&ws.log_file).unwrap();
    assert!(log.contains("Removed existing temporary file: old.tmp"));
}

#[test]
fn test_watch_rejects_bad_pattern() {
    let ws = Workspace::new();

    let result = ws
        .command("watch")
        .args(&["--pattern", "nested/*.tmp"])
        .stdin("q\n")
        .assert_failure()
        .unwrap();

    assert!(result.contains_stderr("invalid name pattern"));
}

#[test]
fn test_watch_rejects_out_of_range_grace() {
    let ws = Workspace::new();

    let result = ws
        .command("watch")
        .args(&["--grace-ms", "999999"])
        .stdin("q\n")
        .assert_failure()
        .unwrap();

    assert!(result.contains_stderr("grace_ms"));
}

#[test]
fn test_watch_keeps_deleting_after_stdout_closes() {
    use std::io::{BufRead, BufReader, Write};

    let ws = Workspace::new();
    let mut child = ws.command("watch").spawn().unwrap();

    // Read until the watcher is live, then hang up like `| head` would
    let stdout = child.stdout.take().unwrap();
    let mut reader = BufReader::new(stdout);
    let mut line = String::new();
    while !line.contains("Started watching directory") {
        line.clear();
        assert!(reader.read_line(&mut line).unwrap() > 0, "stdout ended early");
    }
    drop(reader);

    for name in ["first.tmp", "second.tmp"] {
        let file = ws.watch_dir.join(name);
        std::fs::write(&file, b"x").unwrap();
        assert!(
            crate::common::wait_until(Duration::from_secs(5), || !file.exists()),
            "{} was not deleted",
            name
        );
    }

    child.stdin.take().unwrap().write_all(b"q\n").unwrap();
    let status = crate::common::wait_with_timeout(&mut child, Duration::from_secs(5)).unwrap();
    assert!(status.is_some_and(|s| s.success()));

    let log = std::fs::read_to_string(&ws.log_file).unwrap();
    assert!(log.contains("File first.tmp deleted successfully"));
    assert!(log.contains("File second.tmp deleted successfully"));
    assert!(log.lines().last().unwrap().contains("Stopped watching directory"));
}

#[cfg(unix)]
#[test]
fn test_watch_exits_on_interrupt_with_stdin_open() {
    let ws = Workspace::new();
    let mut child = ws.command("watch").args(&["--quiet"]).spawn().unwrap();
    // Keep stdin open for the whole session
    let _stdin = child.stdin.take().unwrap();

    let log_file = ws.log_file.clone();
    let started = crate::common::wait_until(Duration::from_secs(5), || {
        std::fs::read_to_string(&log_file)
            .map(|log| log.contains("Started watching directory"))
            .unwrap_or(false)
    });
    assert!(started);
    // Give the Ctrl+C listener time to register after the start entry
    std::thread::sleep(Duration::from_millis(300));

    let killed = std::process::Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(killed.success());

    let status = crate::common::wait_with_timeout(&mut child, Duration::from_secs(5)).unwrap();
    if status.is_none() {
        let _ = child.kill();
    }
    assert!(status.is_some_and(|s| s.success()), "exit status {:?}", status);

    let log = std::fs::read_to_string(&ws.log_file).unwrap();
    assert!(log.lines().last().unwrap().contains("Stopped watching directory"));
}
