//! Parser for AXI stimulus scripts.
//!
//! One command per line; `;` or `#` starts a comment. Literals are decimal,
//! `0x` hex or `0b` binary, with optional `_` separators.
//!
//! - `write <addr> <data> [mask <strobe>] [-> <RESP>]`
//! - `read <addr> [== <value> | != <value>] [-> <RESP>]`
//! - `reset`
//! - `idle <edges>`

use std::fmt;
use std::iter::Peekable;
use std::str::SplitWhitespace;

use rtlsim_core::AxiResponse;

use crate::errors::{ScriptError, ScriptErrorKind};

/// Comparison applied to read data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "=="),
            Self::NotEqual => write!(f, "!="),
        }
    }
}

/// Expected read data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataCheck {
    /// Comparison operator.
    pub operator: ComparisonOp,
    /// Value compared against.
    pub expected: u64,
}

impl DataCheck {
    /// Returns true if `actual` satisfies the check.
    #[must_use]
    pub const fn holds(&self, actual: u64) -> bool {
        match self.operator {
            ComparisonOp::Equal => actual == self.expected,
            ComparisonOp::NotEqual => actual != self.expected,
        }
    }
}

/// One stimulus command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptCommand {
    /// Full write transaction.
    Write {
        /// Byte address.
        addr: u64,
        /// Write data.
        data: u64,
        /// Byte strobe; `None` enables every lane.
        strobe: Option<u8>,
        /// Expected response.
        response: Option<AxiResponse>,
    },
    /// Full read transaction.
    Read {
        /// Byte address.
        addr: u64,
        /// Expected data.
        check: Option<DataCheck>,
        /// Expected response.
        response: Option<AxiResponse>,
    },
    /// One edge with reset asserted.
    Reset,
    /// Edges with every input low.
    Idle(u32),
}

/// A parsed command with its source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    /// 1-indexed line number.
    pub line: usize,
    /// Line text without comment or surrounding whitespace.
    pub text: String,
    /// Parsed command.
    pub command: ScriptCommand,
}

type Tokens<'a> = Peekable<SplitWhitespace<'a>>;

/// Parses a whole script, skipping blank and comment-only lines.
///
/// # Errors
///
/// Returns the first [`ScriptError`] encountered.
pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut lines = Vec::new();

    for (idx, raw) in source.lines().enumerate() {
        let text = strip_comment(raw).trim();
        if text.is_empty() {
            continue;
        }

        let command = parse_command(text).map_err(|kind| ScriptError {
            line: idx + 1,
            text: text.to_string(),
            kind,
        })?;
        lines.push(ScriptLine {
            line: idx + 1,
            text: text.to_string(),
            command,
        });
    }

    Ok(lines)
}

/// Parses a numeric literal.
///
/// # Errors
///
/// Returns [`ScriptErrorKind::InvalidLiteral`] for anything that is not a
/// decimal, `0x` hex or `0b` binary `u64`.
pub fn parse_literal(text: &str) -> Result<u64, ScriptErrorKind> {
    let digits: String = text.chars().filter(|c| *c != '_').collect();
    let parsed = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16)
    } else if let Some(bin) = digits
        .strip_prefix("0b")
        .or_else(|| digits.strip_prefix("0B"))
    {
        u64::from_str_radix(bin, 2)
    } else {
        digits.parse()
    };
    parsed.map_err(|_| ScriptErrorKind::InvalidLiteral(text.to_string()))
}

fn strip_comment(line: &str) -> &str {
    match line.find([';', '#']) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_command(text: &str) -> Result<ScriptCommand, ScriptErrorKind> {
    let mut tokens = text.split_whitespace().peekable();
    let word = tokens
        .next()
        .ok_or(ScriptErrorKind::MissingOperand("command"))?;

    let command = match word.to_ascii_lowercase().as_str() {
        "write" => {
            let addr = operand(&mut tokens, "address")?;
            let data = operand(&mut tokens, "data")?;
            let strobe = match tokens.next_if(|t| t.eq_ignore_ascii_case("mask")) {
                Some(_) => {
                    let value = operand(&mut tokens, "strobe")?;
                    Some(u8::try_from(value).map_err(|_| ScriptErrorKind::StrobeTooWide(value))?)
                }
                None => None,
            };
            ScriptCommand::Write {
                addr,
                data,
                strobe,
                response: expected_response(&mut tokens)?,
            }
        }
        "read" => {
            let addr = operand(&mut tokens, "address")?;
            let check = match tokens.next_if(|t| *t == "==" || *t == "!=") {
                Some(op) => Some(DataCheck {
                    operator: if op == "==" {
                        ComparisonOp::Equal
                    } else {
                        ComparisonOp::NotEqual
                    },
                    expected: operand(&mut tokens, "expected value")?,
                }),
                None => None,
            };
            ScriptCommand::Read {
                addr,
                check,
                response: expected_response(&mut tokens)?,
            }
        }
        "reset" => ScriptCommand::Reset,
        "idle" => {
            let count = operand(&mut tokens, "edge count")?;
            ScriptCommand::Idle(
                u32::try_from(count).map_err(|_| ScriptErrorKind::IdleTooLong(count))?,
            )
        }
        _ => return Err(ScriptErrorKind::UnknownCommand(word.to_string())),
    };

    match tokens.next() {
        Some(extra) => Err(ScriptErrorKind::Trailing(extra.to_string())),
        None => Ok(command),
    }
}

fn operand(tokens: &mut Tokens<'_>, what: &'static str) -> Result<u64, ScriptErrorKind> {
    let token = tokens.next().ok_or(ScriptErrorKind::MissingOperand(what))?;
    parse_literal(token)
}

fn expected_response(tokens: &mut Tokens<'_>) -> Result<Option<AxiResponse>, ScriptErrorKind> {
    if tokens.next_if_eq(&"->").is_none() {
        return Ok(None);
    }
    let token = tokens
        .next()
        .ok_or(ScriptErrorKind::MissingOperand("response"))?;
    AxiResponse::from_mnemonic(token)
        .map(Some)
        .ok_or_else(|| ScriptErrorKind::UnknownResponse(token.to_string()))
}
