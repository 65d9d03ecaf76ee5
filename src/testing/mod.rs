//! Scenario testing system for deterministic game testing
//!
//! Provides infrastructure for running scripted input tests against
//! headless simulation to verify game mechanics.

pub mod assertions;
pub mod input;
pub mod parser;
pub mod runner;

pub use assertions::{AssertionError, CapturedEvent, WorldState, check_sequence, check_state};
pub use input::{CurrentInputState, ScriptedInputs, ScriptedSampler, apply_scripted_input};
pub use parser::{
    EntityDef, ExpectedEvent, FrameInput, InputSnapshot, StateAssertion, TestDefinition,
    TestExpectations, TestSetup, parse_test_file, parse_test_str,
};
pub use runner::{TestResult, run_test, run_test_with};

/// Default path for test scenarios
pub const SCENARIOS_DIR: &str = "tests/scenarios";
