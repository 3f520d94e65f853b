use std::fmt::Display;

use crate::config::ConfigError;
use crate::core::collections::AllocErr;

/// Everything that can stop a benchmark run.
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Config(ConfigError),
    /// The table couldn't be allocated or grown.
    Alloc(AllocErr),
    /// The table answered something it shouldn't have.
    Inconsistent(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Alloc(err) => write!(f, "{err}"),
            Self::Inconsistent(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Alloc(err) => Some(err),
            Self::Inconsistent(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ConfigError> for Error {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<AllocErr> for Error {
    fn from(value: AllocErr) -> Self {
        Self::Alloc(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Builder, ChainedHashSet};

    fn build(capacity: usize) -> crate::Result<ChainedHashSet<u32>> {
        Ok(Builder::new().capacity(capacity).try_build()?)
    }

    #[test]
    fn oversized_table_is_an_alloc_error() {
        let err = build(usize::MAX).unwrap_err();

        assert!(matches!(err, Error::Alloc(AllocErr::CapacityOverflow)));
        assert_eq!(err.to_string(), "capacity overflow");
        assert!(std::error::Error::source(&err).is_some());
        assert!(build(16).is_ok());
    }
}
