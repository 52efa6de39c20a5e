#![forbid(unsafe_code)]

//! `prep.toml` configuration. Every key is optional.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// Log severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// everything
    Trace,
    /// per-step details
    Debug,
    /// progress messages
    Info,
    /// recoverable problems
    Warn,
    /// failures only
    Error,
}

impl LogLevel {
    /// Lowercase name, as written in the config file
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: LogLevel,
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Command-line values that take precedence over the config file.
///
/// `None` keeps whatever the file (or the defaults) set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    /// replaces `corpus`
    pub corpus: Option<PathBuf>,
    /// replaces `embeddings`
    pub embeddings: Option<PathBuf>,
    /// replaces `seed`
    pub seed: Option<u64>,
    /// replaces `test_fraction`
    pub test_fraction: Option<f64>,
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepConfig {
    /// CSV with `title,summary,score` columns and a header row
    #[serde(default = "default_corpus")]
    pub corpus: PathBuf,
    /// GloVe text file; coverage is skipped when unset
    #[serde(default)]
    pub embeddings: Option<PathBuf>,
    /// share of records held out for testing, in (0, 1)
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    /// seed for the partition; fresh entropy when unset
    #[serde(default)]
    pub seed: Option<u64>,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_corpus() -> PathBuf {
    PathBuf::from("data/movies.csv")
}

fn default_test_fraction() -> f64 {
    sampler::DEFAULT_TEST_FRACTION
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            corpus: default_corpus(),
            embeddings: None,
            test_fraction: default_test_fraction(),
            seed: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl PrepConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| PrepError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Read `path` if it exists, defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Replace every setting the command line provided.
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(path) = overrides.corpus {
            self.corpus = path;
        }
        if let Some(path) = overrides.embeddings {
            self.embeddings = Some(path);
        }
        if let Some(seed) = overrides.seed {
            self.seed = Some(seed);
        }
        if let Some(fraction) = overrides.test_fraction {
            self.test_fraction = fraction;
        }
    }

    /// Effective log level for `verbose` occurrences of `-v`: the configured
    /// level for none, debug for one, trace for more.
    pub fn log_level(&self, verbose: u8) -> tracing::Level {
        match verbose {
            0 => self.logging.level.into(),
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() -> Result<()> {
        let cfg = PrepConfig::from_toml_str("")?;
        assert_eq!(cfg, PrepConfig::default());
        assert_eq!(cfg.test_fraction, 0.2);
        assert_eq!(cfg.logging.level, LogLevel::Info);
        Ok(())
    }

    #[test]
    fn full_file() -> Result<()> {
        let cfg = PrepConfig::from_toml_str(
            r#"
            corpus = "movies.csv"
            embeddings = "glove.6B.50d.txt"
            test_fraction = 0.25
            seed = 42

            [logging]
            level = "debug"
            "#,
        )?;
        assert_eq!(cfg.corpus, PathBuf::from("movies.csv"));
        assert_eq!(cfg.embeddings, Some(PathBuf::from("glove.6B.50d.txt")));
        assert_eq!(cfg.test_fraction, 0.25);
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.logging.level, LogLevel::Debug);
        Ok(())
    }

    #[test]
    fn unknown_level_is_rejected() {
        let parsed = PrepConfig::from_toml_str("[logging]\nlevel = \"loud\"");
        assert!(matches!(parsed, Err(PrepError::Config(_))));
    }

    #[test]
    fn serializes_back() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let cfg = PrepConfig {
            seed: Some(7),
            ..PrepConfig::default()
        };
        let text = toml::to_string(&cfg)?;
        assert_eq!(PrepConfig::from_toml_str(&text)?, cfg);
        Ok(())
    }

    #[test]
    fn missing_file_falls_back() -> Result<()> {
        let cfg = PrepConfig::load_or_default("does/not/exist.toml")?;
        assert_eq!(cfg, PrepConfig::default());
        Ok(())
    }

    #[test]
    fn level_names() {
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(tracing::Level::from(LogLevel::Trace), tracing::Level::TRACE);
    }

    fn from_file() -> Result<PrepConfig> {
        PrepConfig::from_toml_str(
            r#"
            corpus = "file.csv"
            embeddings = "file.txt"
            test_fraction = 0.25
            seed = 1
            "#,
        )
    }

    #[test]
    fn no_overrides_keep_file_values() -> Result<()> {
        let mut cfg = from_file()?;
        cfg.apply_overrides(Overrides::default());
        assert_eq!(cfg, from_file()?);
        Ok(())
    }

    #[test]
    fn overrides_replace_file_values() -> Result<()> {
        let mut cfg = from_file()?;
        cfg.apply_overrides(Overrides {
            corpus: Some("cli.csv".into()),
            embeddings: Some("cli.txt".into()),
            seed: Some(9),
            test_fraction: Some(0.5),
        });
        assert_eq!(cfg.corpus, PathBuf::from("cli.csv"));
        assert_eq!(cfg.embeddings, Some(PathBuf::from("cli.txt")));
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.test_fraction, 0.5);
        Ok(())
    }

    #[test]
    fn partial_overrides_mix_with_file() -> Result<()> {
        let mut cfg = from_file()?;
        cfg.apply_overrides(Overrides {
            seed: Some(3),
            ..Overrides::default()
        });
        assert_eq!(cfg.seed, Some(3));
        assert_eq!(cfg.corpus, PathBuf::from("file.csv"));
        assert_eq!(cfg.embeddings, Some(PathBuf::from("file.txt")));
        assert_eq!(cfg.test_fraction, 0.25);
        Ok(())
    }

    #[test]
    fn overrides_fill_unset_values() {
        let mut cfg = PrepConfig::default();
        cfg.apply_overrides(Overrides {
            embeddings: Some("glove.txt".into()),
            seed: Some(42),
            ..Overrides::default()
        });
        assert_eq!(cfg.embeddings, Some(PathBuf::from("glove.txt")));
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.corpus, PathBuf::from("data/movies.csv"));
    }

    #[test]
    fn verbosity_raises_log_level() {
        let cfg = PrepConfig {
            logging: LoggingConfig {
                level: LogLevel::Warn,
            },
            ..PrepConfig::default()
        };
        assert_eq!(cfg.log_level(0), tracing::Level::WARN);
        assert_eq!(cfg.log_level(1), tracing::Level::DEBUG);
        assert_eq!(cfg.log_level(2), tracing::Level::TRACE);
        assert_eq!(cfg.log_level(5), tracing::Level::TRACE);
    }
}
