//! End-to-end runs of the management tool binary

use std::path::Path;
use std::process::{Command, Output};

fn run_tool(data_dir: &Path, db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tool_device_manager"))
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--db")
        .arg(db)
        .args(args)
        .output()
        .expect("failed to run tool_device_manager")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_export_to_stdout_reimports() {
    let dir = tempfile::tempdir().unwrap();
    let source_db = dir.path().join("source.db");
    let target_db = dir.path().join("target.db");

    let added = run_tool(
        dir.path(),
        &source_db,
        &["add", "10.0.0.5", "AA:BB:CC:DD:EE:FF", "Printer"],
    );
    assert!(added.status.success(), "{}", String::from_utf8_lossy(&added.stderr));

    let exported = run_tool(dir.path(), &source_db, &["export"]);
    assert!(exported.status.success());
    let csv = stdout(&exported);
    assert!(csv.starts_with("ip,mac,name,created_at"), "stdout was: {}", csv);
    assert!(csv.contains("10.0.0.5,AA:BB:CC:DD:EE:FF,Printer"));
    // Log lines still reach the console, on stderr
    assert!(String::from_utf8_lossy(&exported.stderr).contains("Devices database ready"));

    let csv_path = dir.path().join("devices.csv");
    std::fs::write(&csv_path, &csv).unwrap();

    let imported = run_tool(
        dir.path(),
        &target_db,
        &["import", csv_path.to_str().unwrap()],
    );
    assert!(imported.status.success(), "{}", String::from_utf8_lossy(&imported.stderr));
    assert!(stdout(&imported).contains("1 of 1 row(s) imported"));

    let listed = run_tool(dir.path(), &target_db, &["list"]);
    assert!(stdout(&listed).contains("Printer"));
}
