//! Integration tests for the coursecat CLI.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn run_coursecat(args: &[&str], dir: &Path) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_coursecat"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to execute coursecat");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let status = output.status.code().unwrap_or(1);

    (stdout, stderr, status)
}

fn add_course(name: &str, extra: &[&str], dir: &Path) -> i64 {
    let mut args = vec![
        "add",
        name,
        "--price",
        "50",
        "--duration",
        "6",
        "--type",
        "certificate",
        "--difficulty",
        "beginner",
    ];
    args.extend_from_slice(extra);
    let (stdout, stderr, status) = run_coursecat(&args, dir);
    assert_eq!(status, 0, "add failed: {stderr}");
    // "Created course #N: name"
    stdout
        .trim()
        .strip_prefix("Created course #")
        .and_then(|rest| rest.split(':').next())
        .and_then(|id| id.parse().ok())
        .expect("no course id in output")
}

#[test]
fn test_init_creates_database() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    let (_stdout, _stderr, status) = run_coursecat(&["init"], dir);
    assert_eq!(status, 0);
    assert!(dir.join("coursecat.db").exists());

    // Second init must fail.
    let (_stdout, stderr, status) = run_coursecat(&["init"], dir);
    assert_ne!(status, 0);
    assert!(stderr.contains("Already initialized"));
}

#[test]
fn test_commands_require_init() {
    let temp = TempDir::new().unwrap();
    let (_stdout, stderr, status) = run_coursecat(&["list"], temp.path());
    assert_ne!(status, 0);
    assert!(stderr.contains("Not initialized"));
}

#[test]
fn test_enrollment_workflow() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    run_coursecat(&["init"], dir);

    let intro = add_course("Intro to Algebra", &[], dir);
    let advanced = add_course(
        "Advanced Algebra",
        &["--prereq", &intro.to_string()],
        dir,
    );

    let (stdout, _, status) = run_coursecat(&["student", "Ada"], dir);
    assert_eq!(status, 0);
    assert!(stdout.contains("Registered student #1"));

    // Gate rejects the advanced course before the intro is completed.
    let (_stdout, stderr, status) =
        run_coursecat(&["enroll", "1", &advanced.to_string()], dir);
    assert_ne!(status, 0);
    assert!(stderr.contains("Intro to Algebra"));

    let (_stdout, _stderr, status) = run_coursecat(&["enroll", "1", &intro.to_string()], dir);
    assert_eq!(status, 0);

    // Pending is not enough.
    let (_stdout, _stderr, status) =
        run_coursecat(&["enroll", "1", &advanced.to_string()], dir);
    assert_ne!(status, 0);

    let (_stdout, _stderr, status) =
        run_coursecat(&["grade", "1", &intro.to_string(), "91.5"], dir);
    assert_eq!(status, 0);

    let (stdout, _, status) = run_coursecat(&["enroll", "1", &advanced.to_string()], dir);
    assert_eq!(status, 0);
    assert!(stdout.contains("pending"));

    let (stdout, _, _) = run_coursecat(&["transcript", "1"], dir);
    assert!(stdout.contains("Intro to Algebra"));
    assert!(stdout.contains("Advanced Algebra"));
    assert!(stdout.contains("91.5"));
}

#[test]
fn test_cycle_rejected() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    run_coursecat(&["init"], dir);

    let a = add_course("A", &[], dir);
    let b = add_course("B", &["--prereq", &a.to_string()], dir);

    let (_stdout, stderr, status) = run_coursecat(
        &["edit", &a.to_string(), "--prereq", &b.to_string()],
        dir,
    );
    assert_ne!(status, 0);
    assert!(stderr.contains("circular"));

    // The original edge is still intact.
    let (stdout, _, _) = run_coursecat(&["show", &b.to_string()], dir);
    assert!(stdout.contains("Requires:"));
    assert!(stdout.contains("[#1] A"));
}

#[test]
fn test_rm_blocked_and_forced() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    run_coursecat(&["init"], dir);

    let a = add_course("A", &[], dir);
    let _b = add_course("B", &["--prereq", &a.to_string()], dir);

    let (_stdout, stderr, status) = run_coursecat(&["rm", &a.to_string()], dir);
    assert_ne!(status, 0);
    assert!(stderr.contains("B"));

    let (stdout, _, status) = run_coursecat(&["rm", &a.to_string(), "--force"], dir);
    assert_eq!(status, 0);
    assert!(stdout.contains("1 dependent course(s)"));

    let (_stdout, _stderr, status) = run_coursecat(&["show", &a.to_string()], dir);
    assert_ne!(status, 0);
}

#[test]
fn test_rm_with_replacement() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    run_coursecat(&["init"], dir);

    let b = add_course("B", &[], dir);
    let d = add_course("D", &[], dir);
    let _a = add_course("A", &["--prereq", &b.to_string()], dir);
    let c = add_course(
        "C",
        &["--prereq", &b.to_string(), "--prereq", &d.to_string()],
        dir,
    );

    let (stdout, _, status) = run_coursecat(
        &["rm", &b.to_string(), "--replace-with", &d.to_string()],
        dir,
    );
    assert_eq!(status, 0);
    assert!(stdout.contains(&format!("now require #{d}")));

    // C already required D, so it keeps a single edge.
    let (stdout, _, _) = run_coursecat(&["show", &c.to_string()], dir);
    let requires_d = stdout.matches("[#2] D").count();
    assert_eq!(requires_d, 1);
}

#[test]
fn test_list_json() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    run_coursecat(&["init"], dir);

    add_course("Solo", &[], dir);

    let (stdout, _, status) = run_coursecat(&["list", "--json"], dir);
    assert_eq!(status, 0);

    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let courses = parsed.as_array().unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["name"], "Solo");
    assert_eq!(courses[0]["course_type"], "certificate");
}

#[test]
fn test_edit_validation() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    run_coursecat(&["init"], dir);

    let a = add_course("A", &[], dir);

    let (_stdout, stderr, status) =
        run_coursecat(&["edit", &a.to_string(), "--duration", "0"], dir);
    assert_ne!(status, 0);
    assert!(stderr.contains("duration"));

    let (_stdout, _stderr, status) =
        run_coursecat(&["edit", &a.to_string(), "--price", "75"], dir);
    assert_eq!(status, 0);

    let (stdout, _, _) = run_coursecat(&["show", &a.to_string()], dir);
    assert!(stdout.contains("$75.00"));
}
