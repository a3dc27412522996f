use std::fs;
use std::path::Path;

use rtlsim_core::{AxiConfig, LcdConfig};
use serde::{Deserialize, Serialize};

use crate::errors::CliError;

/// Model configuration read from a JSON file.
///
/// Both sections are optional; missing fields take the model defaults.
///
/// ```json
/// { "axi": { "register_count": 8 }, "lcd": { "clock_hz": 50000000 } }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Register-file configuration.
    pub axi: AxiConfig,
    /// LCD controller configuration.
    pub lcd: LcdConfig,
}

impl SimConfig {
    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the JSON error for malformed or mistyped input.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Reads a configuration file, or returns the defaults when `path` is
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Io`] if the file cannot be read and
    /// [`CliError::ConfigFormat`] if it does not parse.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| CliError::ConfigFormat {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rtlsim_core::{DataWidth, DisplayLines, LcdBusWidth};

    use super::SimConfig;
    use crate::errors::CliError;

    #[test]
    fn empty_object_gives_defaults() {
        let config = SimConfig::from_json("{}").expect("empty config parses");
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = SimConfig::from_json(
            r#"{ "axi": { "data_width": "Bits64", "register_count": 8 },
                 "lcd": { "clock_hz": 50000000, "lines": "One", "bus_width": "Four" } }"#,
        )
        .expect("config parses");
        assert_eq!(config.axi.data_width, DataWidth::Bits64);
        assert_eq!(config.axi.register_count, 8);
        assert_eq!(config.axi.addr_width_bits, 32);
        assert_eq!(config.lcd.clock_hz, 50_000_000);
        assert_eq!(config.lcd.lines, DisplayLines::One);
        assert_eq!(config.lcd.bus_width, LcdBusWidth::Four);
        assert_eq!(config.lcd.timing.power_on_ns, 50_000_000);
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(SimConfig::from_json(r#"{ "uart": {} }"#).is_err());
    }

    #[test]
    fn load_reads_files_and_reports_paths() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("sim.json");
        fs::write(&path, r#"{ "axi": { "register_count": 2 } }"#).expect("write config");

        let config = SimConfig::load(Some(&path)).expect("config loads");
        assert_eq!(config.axi.register_count, 2);

        let missing = dir.path().join("missing.json");
        let error = SimConfig::load(Some(&missing)).expect_err("missing file fails");
        assert!(matches!(error, CliError::Io { .. }));
        assert!(error.to_string().contains("missing.json"));

        fs::write(&path, "{ not json").expect("write config");
        let error = SimConfig::load(Some(&path)).expect_err("bad json fails");
        assert!(matches!(error, CliError::ConfigFormat { .. }));
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(SimConfig::load(None).expect("defaults"), SimConfig::default());
    }
}
