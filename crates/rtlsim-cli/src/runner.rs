//! Executes stimulus scripts and LCD init sequences, collecting reports.

use std::fmt;

use log::{debug, info};
use rtlsim_core::{
    idle_edges, read_transaction, reset_edge, write_transaction, AxiConfig, AxiLiteRegisterFile,
    AxiResponse, ConfigError, LcdConfig, LcdInitController, LcdState, PhaseTicks, TraceEvent,
    TransactionLimits,
};

use crate::script::{ScriptCommand, ScriptLine};

/// Outcome of one script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineReport {
    /// 1-indexed source line.
    pub line: usize,
    /// Source text.
    pub text: String,
    /// What the bus returned.
    pub observed: String,
    /// Expectations that did not hold.
    pub failures: Vec<String>,
}

impl LineReport {
    /// Returns true if every expectation on the line held.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for LineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed() { "ok" } else { "FAILED" };
        write!(
            f,
            "line {}: {} => {} ... {status}",
            self.line, self.text, self.observed
        )
    }
}

/// Result of running a whole script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptReport {
    /// Per-line results in script order.
    pub lines: Vec<LineReport>,
    /// Edges applied to the slave.
    pub edges: u64,
    /// Trace events in edge order.
    pub events: Vec<TraceEvent>,
}

impl ScriptReport {
    /// Returns true if every line passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.lines.iter().all(LineReport::passed)
    }

    /// Returns pass/fail counts.
    #[must_use]
    pub fn summary(&self) -> ScriptSummary {
        let passed = self.lines.iter().filter(|line| line.passed()).count();
        ScriptSummary {
            passed,
            failed: self.lines.len() - passed,
            total: self.lines.len(),
        }
    }
}

/// Pass/fail counts for a script run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptSummary {
    /// Lines whose expectations held.
    pub passed: usize,
    /// Lines with at least one failed expectation.
    pub failed: usize,
    /// Lines executed.
    pub total: usize,
}

impl fmt::Display for ScriptSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} passed, {} failed", self.passed, self.failed)
    }
}

/// Runs `script` against a freshly constructed register file.
///
/// # Errors
///
/// Returns the [`ConfigError`] if `config` is rejected.
pub fn run_script(
    config: AxiConfig,
    script: &[ScriptLine],
    limits: TransactionLimits,
) -> Result<ScriptReport, ConfigError> {
    let mut slave = AxiLiteRegisterFile::new(config)?;
    let mut events = Vec::new();
    let full_strobe = config.data_width.full_strobe();

    let lines: Vec<LineReport> = script
        .iter()
        .map(|line| {
            let mut failures = Vec::new();
            let observed = match line.command {
                ScriptCommand::Write {
                    addr,
                    data,
                    strobe,
                    response,
                } => match write_transaction(
                    &mut slave,
                    addr,
                    data,
                    strobe.unwrap_or(full_strobe),
                    limits,
                    &mut events,
                ) {
                    Ok(done) => {
                        check_response(response, done.response, &mut failures);
                        format!("{} ({} edges)", done.response.mnemonic(), done.edges)
                    }
                    Err(error) => {
                        failures.push(error.to_string());
                        "no response".to_string()
                    }
                },
                ScriptCommand::Read {
                    addr,
                    check,
                    response,
                } => match read_transaction(&mut slave, addr, limits, &mut events) {
                    Ok(done) => {
                        check_response(response, done.response, &mut failures);
                        if let Some(check) = check {
                            if !check.holds(done.data) {
                                failures.push(format!(
                                    "expected data {} {:#x}, got {:#x}",
                                    check.operator, check.expected, done.data
                                ));
                            }
                        }
                        format!(
                            "{:#x} {} ({} edges)",
                            done.data,
                            done.response.mnemonic(),
                            done.edges
                        )
                    }
                    Err(error) => {
                        failures.push(error.to_string());
                        "no response".to_string()
                    }
                },
                ScriptCommand::Reset => {
                    reset_edge(&mut slave, &mut events);
                    "reset".to_string()
                }
                ScriptCommand::Idle(count) => {
                    idle_edges(&mut slave, count, &mut events);
                    format!("{count} idle edges")
                }
            };
            debug!("script line {}: {observed}", line.line);
            LineReport {
                line: line.line,
                text: line.text.clone(),
                observed,
                failures,
            }
        })
        .collect();

    Ok(ScriptReport {
        lines,
        edges: slave.edges(),
        events,
    })
}

fn check_response(expected: Option<AxiResponse>, actual: AxiResponse, failures: &mut Vec<String>) {
    if let Some(expected) = expected {
        if expected != actual {
            failures.push(format!(
                "expected response {}, got {}",
                expected.mnemonic(),
                actual.mnemonic()
            ));
        }
    }
}

/// A sequencer state and the edge that entered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseEntry {
    /// State entered.
    pub state: LcdState,
    /// Edge count at entry; zero for the power-up state.
    pub edge: u64,
    /// Instruction word latched on entry.
    pub command: Option<u8>,
}

impl fmt::Display for PhaseEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>10}  {:?}", self.edge, self.state)?;
        if let Some(command) = self.command {
            write!(f, " (command {command:#04x})")?;
        }
        Ok(())
    }
}

/// Result of running the LCD controller to RUN_MODE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcdReport {
    /// Phase durations in ticks.
    pub ticks: PhaseTicks,
    /// States in the order they were entered.
    pub phases: Vec<PhaseEntry>,
    /// Enable strobes issued during initialization.
    pub pulses: usize,
    /// Edges until RUN_MODE.
    pub edges: u64,
    /// Trace events in edge order.
    pub events: Vec<TraceEvent>,
}

/// Runs a controller built from `config` until initialization completes.
///
/// # Errors
///
/// Returns the [`ConfigError`] if `config` is rejected.
pub fn run_lcd(config: &LcdConfig) -> Result<LcdReport, ConfigError> {
    let mut controller = LcdInitController::new(config)?;
    let mut events = Vec::new();
    let edges = controller.run_to_completion(&mut events);
    info!("lcd: run mode after {edges} edges");

    let mut phases = vec![PhaseEntry {
        state: LcdState::PowerUp,
        edge: 0,
        command: None,
    }];
    phases.extend(events.iter().filter_map(|event| match *event {
        TraceEvent::LcdStateEntered {
            edge,
            state,
            command,
        } => Some(PhaseEntry {
            state,
            edge,
            command,
        }),
        _ => None,
    }));
    let pulses = events
        .iter()
        .filter(|event| matches!(event, TraceEvent::LcdEnablePulse { .. }))
        .count();

    Ok(LcdReport {
        ticks: controller.phase_ticks(),
        phases,
        pulses,
        edges,
        events,
    })
}

/// Renders a trace event as a single line.
#[must_use]
pub fn describe_event(event: &TraceEvent) -> String {
    match *event {
        TraceEvent::AxiReset { edge } => format!("{edge:>10}  axi reset"),
        TraceEvent::AxiReadTransition { edge, from, to } => {
            format!("{edge:>10}  read  {from:?} -> {to:?}")
        }
        TraceEvent::AxiWriteTransition { edge, from, to } => {
            format!("{edge:>10}  write {from:?} -> {to:?}")
        }
        TraceEvent::AxiDecodeError {
            edge,
            channel,
            addr,
        } => format!("{edge:>10}  {channel:?} decode error at {addr:#x}"),
        TraceEvent::AxiResponseAccepted {
            edge,
            channel,
            response,
        } => format!("{edge:>10}  {channel:?} response {}", response.mnemonic()),
        TraceEvent::AxiRegisterWrite {
            edge,
            index,
            previous,
            value,
            strobe,
        } => format!(
            "{edge:>10}  reg[{index}] {previous:#x} -> {value:#x} (strobe {strobe:#06b})"
        ),
        TraceEvent::LcdStateEntered { edge, state, .. } => {
            format!("{edge:>10}  lcd {state:?}")
        }
        TraceEvent::LcdEnablePulse { edge, state, data } => {
            format!("{edge:>10}  lcd enable {data:#04x} in {state:?}")
        }
    }
}
