//! Stimulus scripts, configuration files and reports for the `rtlsim` binary.

use env_logger as _;

/// JSON simulation configuration.
pub mod config;
/// CLI error types.
pub mod errors;
/// Stimulus script and LCD sequence execution.
pub mod runner;
/// AXI stimulus script parser.
pub mod script;
