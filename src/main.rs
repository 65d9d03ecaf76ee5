//! Pitball - headless match runner
//!
//! Usage:
//!   cargo run                                   # One idle round with default tuning
//!   cargo run -- --config config/gameplay_tuning.json --frames 500
//!   cargo run -- --scenario tests/scenarios/scoring/goal_and_serve.toml
//!   cargo run -- --log-dir logs --no-log

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bevy::prelude::*;
use pitball::constants::GAMEPLAY_TUNING_FILE;
use pitball::events::{EventBus, EventLogConfig, EventLogger};
use pitball::scoring::GameState;
use pitball::simulation::{HeadlessAppBuilder, elapsed, step};
use pitball::testing::{TestResult, parse_test_file, run_test_with};
use pitball::tuning::GameplayTuning;

/// Command-line options
#[derive(Debug, Clone)]
struct RunConfig {
    config_path: String,
    scenario: Option<PathBuf>,
    /// Ticks to run; defaults to one full round
    frames: Option<u64>,
    log_dir: PathBuf,
    log_events: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            config_path: GAMEPLAY_TUNING_FILE.to_string(),
            scenario: None,
            frames: None,
            log_dir: EventLogConfig::default().log_dir,
            log_events: true,
        }
    }
}

impl RunConfig {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut config = Self::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" => {
                    if i + 1 < args.len() {
                        config.config_path = args[i + 1].clone();
                        i += 1;
                    }
                }
                "--scenario" => {
                    if i + 1 < args.len() {
                        config.scenario = Some(PathBuf::from(&args[i + 1]));
                        i += 1;
                    }
                }
                "--frames" => {
                    if i + 1 < args.len() {
                        config.frames = args[i + 1].parse().ok();
                        i += 1;
                    }
                }
                "--log-dir" => {
                    if i + 1 < args.len() {
                        config.log_dir = PathBuf::from(&args[i + 1]);
                        i += 1;
                    }
                }
                "--no-log" => config.log_events = false,
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                other => eprintln!("Ignoring unknown argument {}", other),
            }
            i += 1;
        }
        config
    }
}

fn print_help() {
    println!("pitball - headless match runner");
    println!();
    println!("Options:");
    println!("  --config <json>     Gameplay tuning file (default {})", GAMEPLAY_TUNING_FILE);
    println!("  --scenario <toml>   Run a scenario's placements and inputs instead of an idle round");
    println!("  --frames <n>        Ticks to run (default: one full round)");
    println!("  --log-dir <dir>     Event log directory (default logs)");
    println!("  --no-log            Do not write an event log");
}

fn main() -> ExitCode {
    let config = RunConfig::from_args();

    let mut logger = EventLogger::new(EventLogConfig {
        log_dir: config.log_dir.clone(),
        enabled: config.log_events,
    });

    let builder = HeadlessAppBuilder::new()
        .with_config_file(&config.config_path)
        .with_logging();

    let code = match &config.scenario {
        Some(path) => run_scenario(path, builder, &mut logger),
        None => run_round(builder, config.frames, &mut logger),
    };

    logger.end_session();
    code
}

/// Run a scenario file with event logging, reporting its checks
fn run_scenario(
    path: &Path,
    builder: HeadlessAppBuilder,
    logger: &mut EventLogger,
) -> ExitCode {
    let def = match parse_test_file(path) {
        Ok(def) => def,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    logger.start_session();
    let result = run_test_with(&def, builder, |events| logger.log_all(events));

    match result {
        TestResult::Pass { frames } => {
            info!("Scenario '{}' passed after {} frames", def.name, frames);
            ExitCode::SUCCESS
        }
        TestResult::Fail { error } => {
            error!("Scenario '{}' failed: {}", def.name, error);
            ExitCode::FAILURE
        }
        TestResult::Error { message } => {
            error!("Scenario '{}' could not run: {}", def.name, message);
            ExitCode::FAILURE
        }
    }
}

/// Start a new game and step it until `frames` ticks (or the round) are done
fn run_round(builder: HeadlessAppBuilder, frames: Option<u64>, logger: &mut EventLogger) -> ExitCode {
    let mut app = match builder.with_new_game().build() {
        Ok(app) => app,
        Err(e) => {
            error!("Setup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let frames = frames.unwrap_or_else(|| {
        let tuning = app.world().resource::<GameplayTuning>();
        (tuning.rules.round_duration / tuning.fixed_timestep).ceil() as u64 + 1
    });

    logger.start_session();
    for _ in 0..frames {
        step(&mut app);
        let events = app.world_mut().resource_mut::<EventBus>().drain();
        logger.log_all(&events);
    }

    let game = app.world().resource::<GameState>();
    info!(
        "Stopped after {} ticks ({:.2}s): {:?}, score {} - {}",
        frames,
        elapsed(&app).as_secs_f32(),
        game.phase,
        game.scores.player1,
        game.scores.player2
    );
    if let Some(path) = logger.path() {
        info!("Event log: {}", path.display());
    }
    ExitCode::SUCCESS
}
