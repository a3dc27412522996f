//! CLI entry point for the `rtlsim` binary.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::error;
use rtlsim_cli::config::SimConfig;
use rtlsim_cli::errors::CliError;
use rtlsim_cli::runner::{describe_event, run_lcd, run_script};
use rtlsim_cli::script::parse_script;
use rtlsim_core::{DisplayLines, FontSize, LcdBusWidth, TraceEvent, TransactionLimits};
use serde as _;
use serde_json as _;
#[cfg(test)]
use tempfile as _;
use thiserror as _;

const USAGE_TEXT: &str = "\
Usage: rtlsim <command> [options]

Commands:
  axi <script>  Run an AXI4-Lite stimulus script against the register file
  lcd           Run the LCD controller through its initialization sequence

Options:
  -c, --config <file>   JSON configuration ({\"axi\": {...}, \"lcd\": {...}})
  -t, --trace           Print trace events to stderr
      --clock-hz <hz>   LCD clock frequency (lcd only)
      --lines <1|2>     Display lines (lcd only)
      --font <8|11>     Font height in dots (lcd only)
      --bus <4|8>       Data bus width (lcd only)
  -h, --help            Show this help message

Examples:
  rtlsim axi smoke.axi
  rtlsim axi smoke.axi --config board.json --trace
  rtlsim lcd --clock-hz 50000000 --lines 2 --font 11
";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Axi(AxiArgs),
    Lcd(LcdArgs),
}

#[derive(Debug, PartialEq, Eq)]
struct AxiArgs {
    script: PathBuf,
    config: Option<PathBuf>,
    trace: bool,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct LcdArgs {
    config: Option<PathBuf>,
    clock_hz: Option<u64>,
    lines: Option<DisplayLines>,
    font: Option<FontSize>,
    bus_width: Option<LcdBusWidth>,
    trace: bool,
}

#[derive(Debug)]
enum ParseResult {
    Command(Command),
    Help,
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let first = args.next().ok_or_else(|| "missing command".to_string())?;

    if first == "--help" || first == "-h" {
        return Ok(ParseResult::Help);
    }

    let command_str = first.to_string_lossy().to_string();

    match command_str.as_str() {
        "axi" => parse_axi_args(args)
            .map(Command::Axi)
            .map(ParseResult::Command),
        "lcd" => parse_lcd_args(args)
            .map(Command::Lcd)
            .map(ParseResult::Command),
        other => Err(format!("unknown command: {other}")),
    }
}

fn option_value(
    args: &mut impl Iterator<Item = OsString>,
    flag: &OsString,
) -> Result<String, String> {
    args.next()
        .map(|value| value.to_string_lossy().to_string())
        .ok_or_else(|| format!("missing value for {}", flag.to_string_lossy()))
}

#[allow(clippy::while_let_on_iterator)]
fn parse_axi_args(mut args: impl Iterator<Item = OsString>) -> Result<AxiArgs, String> {
    let mut script: Option<PathBuf> = None;
    let mut config: Option<PathBuf> = None;
    let mut trace = false;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg == "--trace" || arg == "-t" {
            trace = true;
            continue;
        }

        if arg == "--config" || arg == "-c" {
            config = Some(PathBuf::from(option_value(&mut args, &arg)?));
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if script.is_some() {
            return Err("multiple script paths provided".to_string());
        }
        script = Some(PathBuf::from(arg));
    }

    let script = script.ok_or_else(|| "missing script path".to_string())?;
    Ok(AxiArgs {
        script,
        config,
        trace,
    })
}

#[allow(clippy::while_let_on_iterator)]
fn parse_lcd_args(mut args: impl Iterator<Item = OsString>) -> Result<LcdArgs, String> {
    let mut parsed = LcdArgs::default();

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg == "--trace" || arg == "-t" {
            parsed.trace = true;
        } else if arg == "--config" || arg == "-c" {
            parsed.config = Some(PathBuf::from(option_value(&mut args, &arg)?));
        } else if arg == "--clock-hz" {
            let value = option_value(&mut args, &arg)?;
            parsed.clock_hz = Some(
                value
                    .parse()
                    .map_err(|_| format!("invalid clock frequency: {value}"))?,
            );
        } else if arg == "--lines" {
            let value = option_value(&mut args, &arg)?;
            parsed.lines = Some(
                value
                    .parse()
                    .ok()
                    .and_then(DisplayLines::from_count)
                    .ok_or_else(|| format!("lines must be 1 or 2, got {value}"))?,
            );
        } else if arg == "--font" {
            let value = option_value(&mut args, &arg)?;
            parsed.font = Some(match value.as_str() {
                "8" => FontSize::Dots5x8,
                "11" => FontSize::Dots5x11,
                _ => return Err(format!("font must be 8 or 11, got {value}")),
            });
        } else if arg == "--bus" {
            let value = option_value(&mut args, &arg)?;
            parsed.bus_width = Some(
                value
                    .parse()
                    .ok()
                    .and_then(LcdBusWidth::from_lines)
                    .ok_or_else(|| format!("bus must be 4 or 8, got {value}"))?,
            );
        } else if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        } else {
            return Err(format!("unexpected argument: {}", arg.to_string_lossy()));
        }
    }

    Ok(parsed)
}

fn print_trace(events: &[TraceEvent]) {
    for event in events {
        eprintln!("{}", describe_event(event));
    }
}

fn read_script(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn run_axi(args: &AxiArgs) -> Result<bool, CliError> {
    let config = SimConfig::load(args.config.as_deref())?;
    let source = read_script(&args.script)?;
    let script = parse_script(&source)?;
    let report = run_script(config.axi, &script, TransactionLimits::default())?;

    if args.trace {
        print_trace(&report.events);
    }

    for line in &report.lines {
        println!("{line}");
        for failure in &line.failures {
            println!("  {failure}");
        }
    }

    let summary = report.summary();
    println!();
    println!(
        "Script Summary: {summary} (total: {}, {} edges)",
        summary.total, report.edges
    );

    Ok(report.all_passed())
}

fn run_lcd_command(args: &LcdArgs) -> Result<bool, CliError> {
    let mut config = SimConfig::load(args.config.as_deref())?.lcd;
    if let Some(clock_hz) = args.clock_hz {
        config.clock_hz = clock_hz;
    }
    if let Some(lines) = args.lines {
        config.lines = lines;
    }
    if let Some(font) = args.font {
        config.font = font;
    }
    if let Some(bus_width) = args.bus_width {
        config.bus_width = bus_width;
    }

    let report = run_lcd(&config)?;

    if args.trace {
        print_trace(&report.events);
    }

    println!(
        "Clock {} Hz: power-on {} ticks, function-set {} ticks, clear {} ticks, pulse {} ticks",
        config.clock_hz,
        report.ticks.power_on,
        report.ticks.function_set,
        report.ticks.display_clear,
        report.ticks.pulse_width
    );
    for phase in &report.phases {
        println!("{phase}");
    }
    println!();
    println!(
        "Run mode after {} edges ({} enable pulses)",
        report.edges, report.pulses
    );

    Ok(true)
}

fn exit_status(result: Result<bool, CliError>) -> i32 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            1
        }
    }
}

fn main() {
    env_logger::init();

    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Command(Command::Axi(args))) => exit_status(run_axi(&args)),
        Ok(ParseResult::Command(Command::Lcd(args))) => exit_status(run_lcd_command(&args)),
        Err(error) => {
            if error.starts_with("Usage:") {
                println!("{error}");
            } else {
                eprintln!("error: {error}");
                eprintln!("{USAGE_TEXT}");
            }
            1
        }
    };

    std::process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::path::PathBuf;

    fn os(args: &[&str]) -> impl Iterator<Item = OsString> {
        args.iter()
            .map(OsString::from)
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn parses_axi_command() {
        let result = parse_axi_args(os(&["smoke.axi", "-c", "board.json", "--trace"]))
            .expect("valid axi args should parse");

        assert_eq!(
            result,
            AxiArgs {
                script: PathBuf::from("smoke.axi"),
                config: Some(PathBuf::from("board.json")),
                trace: true,
            }
        );
    }

    #[test]
    fn parses_lcd_overrides() {
        let result = parse_lcd_args(os(&[
            "--clock-hz",
            "50000000",
            "--lines",
            "1",
            "--font",
            "11",
            "--bus",
            "4",
        ]))
        .expect("valid lcd args should parse");

        assert_eq!(
            result,
            LcdArgs {
                clock_hz: Some(50_000_000),
                lines: Some(DisplayLines::One),
                font: Some(FontSize::Dots5x11),
                bus_width: Some(LcdBusWidth::Four),
                ..LcdArgs::default()
            }
        );
    }

    #[test]
    fn parses_help_flag() {
        let result = parse_args(os(&["--help"])).expect("help should parse without error");
        assert!(matches!(result, ParseResult::Help));
    }

    #[test]
    fn rejects_unknown_command() {
        let error = parse_args(os(&["uart"])).expect_err("unknown command should fail parse");
        assert!(error.contains("unknown command"));
    }

    #[test]
    fn axi_requires_a_script() {
        let error = parse_axi_args(os(&["--trace"])).expect_err("missing script should fail");
        assert!(error.contains("missing script"));
    }

    #[test]
    fn lcd_rejects_unsupported_geometry() {
        let error = parse_lcd_args(os(&["--lines", "4"])).expect_err("four lines unsupported");
        assert!(error.contains("lines must be 1 or 2"));

        let error = parse_lcd_args(os(&["--bus", "16"])).expect_err("16-bit bus unsupported");
        assert!(error.contains("bus must be 4 or 8"));

        let error = parse_lcd_args(os(&["--clock-hz"])).expect_err("missing value");
        assert!(error.contains("missing value for --clock-hz"));
    }

    #[test]
    fn lcd_rejects_positional_arguments() {
        let error = parse_lcd_args(os(&["display.json"])).expect_err("no positional args");
        assert!(error.contains("unexpected argument"));
    }
}
