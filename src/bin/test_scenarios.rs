//! Scenario test runner CLI
//!
//! Usage:
//!   cargo run --bin test-scenarios                          # Run all scenarios
//!   cargo run --bin test-scenarios -- scoring/              # Run one category
//!   cargo run --bin test-scenarios -- scoring/goal_and_serve
//!   cargo run --bin test-scenarios -- --list                # List without running
//!   cargo run --bin test-scenarios -- --verbose             # Descriptions and full failures

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use pitball::testing::{SCENARIOS_DIR, TestResult, parse_test_file, run_test};

#[derive(Default)]
struct Options {
    verbose: bool,
    list: bool,
    filter: Option<String>,
}

fn parse_args() -> Options {
    let mut options = Options::default();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--verbose" | "-v" => options.verbose = true,
            "--list" | "-l" => options.list = true,
            other if !other.starts_with('-') => options.filter = Some(other.to_string()),
            other => eprintln!("Ignoring unknown option {}", other),
        }
    }
    options
}

#[derive(Default)]
struct Tally {
    passed: usize,
    failed: usize,
    errors: usize,
}

fn main() -> ExitCode {
    let options = parse_args();

    println!("Pitball Scenarios");
    println!("=================\n");

    let scenarios_path = Path::new(SCENARIOS_DIR);
    if !scenarios_path.exists() {
        println!("No scenarios directory found at {}", SCENARIOS_DIR);
        return ExitCode::FAILURE;
    }

    let tests = discover_tests(scenarios_path, options.filter.as_deref());
    if tests.is_empty() {
        println!("No scenario files found.");
        if let Some(f) = &options.filter {
            println!("Filter: {}", f);
        }
        return ExitCode::FAILURE;
    }

    if options.list {
        for path in &tests {
            println!("  {}", relative(scenarios_path, path));
        }
        println!("\n{} scenarios", tests.len());
        return ExitCode::SUCCESS;
    }

    let started = Instant::now();
    let mut tally = Tally::default();
    let mut current_category = String::new();

    for test_path in &tests {
        let rel_path = test_path.strip_prefix(scenarios_path).unwrap_or(test_path);

        if let Some(parent) = rel_path.parent() {
            let category = parent.to_string_lossy().to_string();
            if category != current_category && !category.is_empty() {
                if !current_category.is_empty() {
                    println!();
                }
                println!("{}/", category);
                current_category = category;
            }
        }

        let test_name = rel_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let result = match parse_test_file(test_path) {
            Ok(def) => {
                if options.verbose
                    && let Some(description) = &def.description
                {
                    println!("  # {}", description);
                }
                run_test(&def)
            }
            Err(message) => TestResult::Error { message },
        };

        match &result {
            TestResult::Pass { .. } => tally.passed += 1,
            TestResult::Fail { .. } => tally.failed += 1,
            TestResult::Error { .. } => tally.errors += 1,
        }
        print_result(&test_name, &result, options.verbose);
    }

    println!("\n=================");
    println!(
        "Results: {} passed, {} failed, {} errors ({:.2}s)",
        tally.passed,
        tally.failed,
        tally.errors,
        started.elapsed().as_secs_f32()
    );

    if tally.failed > 0 || tally.errors > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn relative(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}

fn discover_tests(base: &Path, filter: Option<&str>) -> Vec<PathBuf> {
    let mut tests = Vec::new();
    discover_tests_recursive(base, base, filter, &mut tests);
    tests.sort();
    tests
}

fn discover_tests_recursive(
    base: &Path,
    current: &Path,
    filter: Option<&str>,
    tests: &mut Vec<PathBuf>,
) {
    let Ok(entries) = fs::read_dir(current) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();

        if path.is_dir() {
            discover_tests_recursive(base, &path, filter, tests);
        } else if path.extension().is_some_and(|e| e == "toml") {
            if filter.is_some_and(|f| !relative(base, &path).contains(f)) {
                continue;
            }
            tests.push(path);
        }
    }
}

fn print_result(name: &str, result: &TestResult, verbose: bool) {
    let dots = ".".repeat(40 - name.len().min(39));

    match result {
        TestResult::Pass { frames } => {
            println!("  {} {} PASS ({} frames)", name, dots, frames);
        }
        TestResult::Fail { error } => {
            println!("  {} {} FAIL", name, dots);
            if verbose {
                println!("    {}", error);
            } else {
                println!("    {}", error.message);
            }
        }
        TestResult::Error { message } => {
            println!("  {} {} ERROR", name, dots);
            println!("    {}", message);
        }
    }
}
