//! A small file logger.
//!
//! Nothing is written until [`init`] runs; afterwards the [`error!`],
//! [`warn!`], [`info!`] and [`debug!`] macros append to [`LOG_FILE_PATH`]
//! whatever passes the configured [`Level`].
//!
//! [`error!`]: crate::error!
//! [`warn!`]: crate::warn!
//! [`info!`]: crate::info!
//! [`debug!`]: crate::debug!

use std::{
    fmt::Display,
    fs::{File, OpenOptions},
    io::{self, Write},
    path::Path,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex, OnceLock,
    },
};

#[repr(usize)]
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy)]
pub enum Level {
    /// Designates serious errors.
    Error = 1,
    /// Designates hazardous situations.
    Warn,
    /// Designates useful information.
    Info,
    /// Designates lower priority information.
    Debug,
}

#[derive(Debug, PartialEq, PartialOrd)]
pub enum ParseError<'p> {
    InvalidString(&'p str),
}

/// Zero means the logger was never initialised.
static LOG_LEVEL: AtomicUsize = AtomicUsize::new(0);
static LOG_FILE: OnceLock<Mutex<File>> = OnceLock::new();

pub const LOG_FILE_PATH: &str = "chainset.log";

#[macro_export]
macro_rules! error {
    ($($args:tt)*) => {
        $crate::log::log_silently(
            $crate::log::Level::Error,
            format_args!("{}:{} - {}", file!(), line!(), format_args!($($args)*)),
        )
    };
}

#[macro_export]
macro_rules! warn {
    ($($args:tt)*) => {
        $crate::log::log_silently(
            $crate::log::Level::Warn,
            format_args!("{}:{} - {}", file!(), line!(), format_args!($($args)*)),
        )
    };
}

#[macro_export]
macro_rules! info {
    ($($args:tt)*) => {
        $crate::log::log_silently(
            $crate::log::Level::Info,
            format_args!("{}:{} - {}", file!(), line!(), format_args!($($args)*)),
        )
    };
}

#[macro_export]
macro_rules! debug {
    ($($args:tt)*) => {
        $crate::log::log_silently(
            $crate::log::Level::Debug,
            format_args!("{}:{} - {}", file!(), line!(), format_args!($($args)*)),
        )
    };
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let string = match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        };

        f.write_str(string)
    }
}

/// Opens the log file and sets the level. Only the first call opens the
/// file, later ones just change the level.
pub fn init(level: Level) -> io::Result<()> {
    init_at(LOG_FILE_PATH, level)
}

pub fn init_at(path: impl AsRef<Path>, level: Level) -> io::Result<()> {
    if LOG_FILE.get().is_none() {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        // losing the race is fine, the winner's file is the one kept.
        let _ = LOG_FILE.set(Mutex::new(file));
    }

    LOG_LEVEL.store(level as usize, Ordering::Release);
    Ok(())
}

pub fn enabled(level: Level) -> bool {
    level as usize <= LOG_LEVEL.load(Ordering::Acquire)
}

pub fn log(level: Level, message: impl Display) -> io::Result<()> {
    if !enabled(level) {
        return Ok(());
    }

    let Some(file) = LOG_FILE.get() else {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            "Attempted to write to logger not initialised",
        ));
    };

    let mut file = file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    writeln!(file, "[{level:#?}]: {message}")?;
    file.flush()
}

/// What the macros call: a log line that can't be written isn't worth
/// failing the caller for.
#[doc(hidden)]
pub fn log_silently(level: Level, message: std::fmt::Arguments<'_>) {
    if !enabled(level) {
        return;
    }

    if let Err(e) = log(level, message) {
        eprintln!("Failed to log: {e}");
    }
}

impl<'p> TryFrom<&'p str> for Level {
    type Error = ParseError<'p>;

    fn try_from(s: &'p str) -> Result<Self, ParseError<'p>> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Level::Error),
            "warn" => Ok(Level::Warn),
            "info" => Ok(Level::Info),
            "debug" => Ok(Level::Debug),
            _ => Err(ParseError::InvalidString(s)),
        }
    }
}

impl<'p> Display for ParseError<'p> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidString(s) => {
                write!(f, "'{s}' doesn't match any log level")
            }
        }
    }
}
