//! Runs every TOML scenario under tests/scenarios

use std::fs;
use std::path::{Path, PathBuf};

use pitball::testing::{SCENARIOS_DIR, TestResult, parse_test_file, run_test};

fn collect(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(&path, out);
        } else if path.extension().is_some_and(|e| e == "toml") {
            out.push(path);
        }
    }
}

#[test]
fn all_scenarios_pass() {
    let mut files = Vec::new();
    collect(Path::new(SCENARIOS_DIR), &mut files);
    files.sort();
    assert!(!files.is_empty(), "no scenarios found in {}", SCENARIOS_DIR);

    let mut failures = Vec::new();
    for path in &files {
        let result = match parse_test_file(path) {
            Ok(def) => run_test(&def),
            Err(message) => TestResult::Error { message },
        };
        match result {
            TestResult::Pass { .. } => {}
            TestResult::Fail { error } => failures.push(format!("{}: {}", path.display(), error)),
            TestResult::Error { message } => {
                failures.push(format!("{}: {}", path.display(), message))
            }
        }
    }

    assert!(failures.is_empty(), "{}", failures.join("\n"));
}
