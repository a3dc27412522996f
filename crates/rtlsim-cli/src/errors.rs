use std::io;
use std::path::PathBuf;

use rtlsim_core::ConfigError;
use thiserror::Error;

/// Reason a script line failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptErrorKind {
    /// First word is not a known command.
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    /// A required operand is absent.
    #[error("missing {0}")]
    MissingOperand(&'static str),
    /// A numeric literal could not be parsed.
    #[error("invalid literal `{0}`")]
    InvalidLiteral(String),
    /// A response mnemonic is not one of OKAY, EXOKAY, SLVERR or DECERR.
    #[error("unknown response `{0}`")]
    UnknownResponse(String),
    /// A strobe does not fit in eight byte lanes.
    #[error("strobe {0:#x} wider than eight lanes")]
    StrobeTooWide(u64),
    /// An idle count does not fit in 32 bits.
    #[error("idle count {0} too large")]
    IdleTooLong(u64),
    /// Tokens remain after a complete command.
    #[error("unexpected `{0}`")]
    Trailing(String),
}

/// Parse failure with the offending line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind} (in '{text}')")]
pub struct ScriptError {
    /// 1-indexed line number.
    pub line: usize,
    /// Line text without its comment.
    pub text: String,
    /// What went wrong.
    pub kind: ScriptErrorKind,
}

/// Failure of a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// A file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A configuration file is not valid JSON for [`crate::config::SimConfig`].
    #[error("invalid config {}: {source}", path.display())]
    ConfigFormat {
        /// File that failed.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The configuration was rejected by a model.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A stimulus script failed to parse.
    #[error(transparent)]
    Script(#[from] ScriptError),
}

#[cfg(test)]
mod tests {
    use super::{ScriptError, ScriptErrorKind};

    #[test]
    fn script_error_names_line_and_text() {
        let error = ScriptError {
            line: 3,
            text: "wrote 0x4".to_string(),
            kind: ScriptErrorKind::UnknownCommand("wrote".to_string()),
        };
        assert_eq!(
            error.to_string(),
            "line 3: unknown command `wrote` (in 'wrote 0x4')"
        );
    }
}
