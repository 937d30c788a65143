//! `tmpwatch sweep` and `tmpwatch log`

use super::Workspace;

#[test]
fn test_sweep_deletes_matching_files() {
    let ws = Workspace::new();
    std::fs::create_dir_all(&ws.watch_dir).unwrap();
    std::fs::write(ws.watch_dir.join("a.tmp"), b"x").unwrap();
    std::fs::write(ws.watch_dir.join("b.TMP"), b"x").unwrap();
    std::fs::write(ws.watch_dir.join("c.txt"), b"x").unwrap();

    let result = ws.command("sweep").assert_success().unwrap();

    assert!(result.contains_stdout("Removed 2 of 2 matching files"));
    assert!(!ws.watch_dir.join("a.tmp").exists());
    assert!(!ws.watch_dir.join("b.TMP").exists());
    assert!(ws.watch_dir.join("c.txt").exists());
}

#[test]
fn test_sweep_with_custom_pattern() {
    let ws = Workspace::new();
    std::fs::create_dir_all(&ws.watch_dir).unwrap();
    std::fs::write(ws.watch_dir.join("a.tmp"), b"x").unwrap();
    std::fs::write(ws.watch_dir.join("download.part"), b"x").unwrap();

    ws.command("sweep")
        .args(&["--pattern", "*.part"])
        .assert_success()
        .unwrap();

    assert!(ws.watch_dir.join("a.tmp").exists());
    assert!(!ws.watch_dir.join("download.part").exists());
}

#[test]
fn test_sweep_missing_directory_fails() {
    let ws = Workspace::new();

    let result = ws.command("sweep").assert_failure().unwrap();
    assert!(result.contains_stderr("does not exist"));
}

#[test]
fn test_sweep_empty_directory() {
    let ws = Workspace::new();
    std::fs::create_dir_all(&ws.watch_dir).unwrap();

    let result = ws.command("sweep").assert_success().unwrap();
    assert!(result.contains_stdout("No files matching"));
}

#[test]
fn test_log_shows_last_entries() {
    let ws = Workspace::new();
    std::fs::create_dir_all(ws.log_file.parent().unwrap()).unwrap();
    std::fs::write(
        &ws.log_file,
        "2024-01-03 14:30:00 - Detected new temporary file: a.tmp\n\
         2024-01-03 14:30:01 - File a.tmp deleted successfully\n\
         not a log line\n\
         2024-01-03 14:30:02 - File a.tmp was removed\n",
    )
    .unwrap();

    let mut cmd = crate::common::TmpwatchCommand::new(ws.root.path());
    let result = cmd
        .args(&["log", "--limit", "2"])
        .path_arg("--config", &ws.config_file)
        .path_arg("--log", &ws.log_file)
        .assert_success()
        .unwrap();

    assert!(!result.contains_stdout("Detected new temporary file"));
    assert!(result.contains_stdout("File a.tmp deleted successfully"));
    assert!(result.contains_stdout("File a.tmp was removed"));
    assert!(result.contains_stdout("1 earlier entries not shown"));
}

#[test]
fn test_log_without_file() {
    let ws = Workspace::new();

    let mut cmd = crate::common::TmpwatchCommand::new(ws.root.path());
    let result = cmd
        .args(&["log"])
        .path_arg("--config", &ws.config_file)
        .path_arg("--log", &ws.log_file)
        .assert_success()
        .unwrap();

    assert!(result.contains_stdout("No log entries"));
}
