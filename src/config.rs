//! Command line configuration.
//!
//! ```text
//! chainset <input file> <number of lines> [--output <path>] [--seed <u64>] [--log <level>]
//! ```

use std::fmt::Display;
use std::path::PathBuf;

use crate::log::Level;
use crate::report::DEFAULT_ANALYSIS_PATH;

pub const USAGE: &str =
    "Usage: chainset <input file> <number of lines> [--output <path>] [--seed <u64>] [--log <level>]";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input: PathBuf,
    /// How many records to read from `input`.
    pub lines: usize,
    /// CSV file results are appended to.
    pub output: PathBuf,
    /// Fixes the shuffled ordering; random when absent.
    pub seed: Option<u64>,
    pub log_level: Level,
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Wrong number of positional arguments.
    Usage,
    MissingValue(String),
    UnknownFlag(String),
    InvalidValue { flag: &'static str, value: String },
}

macro_rules! with {
    ($name:ident, $field:ident, $ty:ty) => {
        pub fn $name(mut self, value: $ty) -> Self {
            self.$field = value;
            self
        }
    };
}

impl Config {
    pub fn new(input: impl Into<PathBuf>, lines: usize) -> Self {
        Self {
            input: input.into(),
            lines,
            output: PathBuf::from(DEFAULT_ANALYSIS_PATH),
            seed: None,
            log_level: Level::Info,
        }
    }

    with!(with_output, output, PathBuf);
    with!(with_seed, seed, Option<u64>);
    with!(with_log_level, log_level, Level);

    /// Parses the arguments that follow the program name.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut positional = Vec::with_capacity(2);
        let mut output = None;
        let mut seed = None;
        let mut log_level = None;

        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            let mut value = || args.next().ok_or_else(|| ConfigError::MissingValue(arg.clone()));

            match arg.as_str() {
                "--output" | "-o" => output = Some(PathBuf::from(value()?)),
                "--seed" => {
                    let raw = value()?;
                    seed = Some(raw.parse().map_err(|_| ConfigError::InvalidValue {
                        flag: "--seed",
                        value: raw,
                    })?);
                }
                "--log" => {
                    let raw = value()?;
                    let level = Level::try_from(raw.as_str()).ok();
                    log_level = Some(level.ok_or(ConfigError::InvalidValue {
                        flag: "--log",
                        value: raw,
                    })?);
                }
                flag if flag.starts_with("--") => return Err(ConfigError::UnknownFlag(arg)),
                _ => positional.push(arg),
            }
        }

        let [input, lines] = <[String; 2]>::try_from(positional).map_err(|_| ConfigError::Usage)?;
        let lines = lines.parse().map_err(|_| ConfigError::InvalidValue {
            flag: "<number of lines>",
            value: lines,
        })?;

        let mut config = Self::new(input, lines).with_seed(seed);
        if let Some(output) = output {
            config = config.with_output(output);
        }
        if let Some(level) = log_level {
            config = config.with_log_level(level);
        }

        Ok(config)
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usage => f.write_str(USAGE),
            Self::MissingValue(flag) => write!(f, "{flag} needs a value\n{USAGE}"),
            Self::UnknownFlag(flag) => write!(f, "unknown option {flag}\n{USAGE}"),
            Self::InvalidValue { flag, value } => write!(f, "invalid value {value:?} for {flag}"),
        }
    }
}

impl std::error::Error for ConfigError {}
