use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for a law library.
///
/// Controls how references are detected during extraction and how strictly
/// the library treats unexpected files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Whether references to documents that do not exist in the library are
    /// kept (and reported by `validate`) or silently dropped at extraction
    /// time.
    pub keep_broken_references: bool,

    /// Whether bare numbers ("see 40") are treated as references during
    /// extraction.
    ///
    /// Off by default: bare numbers produce too many false positives in
    /// prose that mentions trick counts and scores.
    pub detect_bare_numbers: bool,

    /// Number of characters of surrounding text captured as the context of
    /// each detected reference.
    context_window: usize,

    /// Whether the library directory may contain markdown files whose names
    /// are not valid document ids.
    pub allow_unrecognised: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keep_broken_references: true,
            detect_bare_numbers: false,
            context_window: default_context_window(),
            allow_unrecognised: false,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or
    /// if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the reference context window, in characters.
    #[must_use]
    pub const fn context_window(&self) -> usize {
        self.context_window
    }
}

const fn default_context_window() -> usize {
    80
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the
/// domain type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_true")]
        keep_broken_references: bool,

        #[serde(default)]
        detect_bare_numbers: bool,

        #[serde(default = "default_context_window")]
        context_window: usize,

        #[serde(default)]
        allow_unrecognised: bool,
    },
}

const fn default_true() -> bool {
    true
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                keep_broken_references,
                detect_bare_numbers,
                context_window,
                allow_unrecognised,
            } => Self {
                keep_broken_references,
                detect_bare_numbers,
                context_window,
                allow_unrecognised,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            keep_broken_references: config.keep_broken_references,
            detect_bare_numbers: config.detect_bare_numbers,
            context_window: config.context_window,
            allow_unrecognised: config.allow_unrecognised,
        }
    }
}
