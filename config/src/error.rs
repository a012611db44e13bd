use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a single line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LineErrorKind {
    #[error("section name cannot be empty")]
    EmptySectionName,

    #[error("invalid configuration line")]
    InvalidLine,

    #[error("key cannot be empty")]
    EmptyKey,

    #[error("configuration line without section")]
    LineOutsideSection,
}

/// A parse failure localized to one line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}: {kind}")]
pub struct LineError {
    /// The offending line, after whole-line trimming.
    pub line: String,
    pub kind: LineErrorKind,
}

impl LineError {
    #[must_use]
    pub fn new(line: impl Into<String>, kind: LineErrorKind) -> Self {
        Self {
            line: line.into(),
            kind,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to open config file {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("failed to read config file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("configuration file error: {}:{line_no}\n\t{source}", .path.display())]
    Line {
        path: PathBuf,
        line_no: usize,
        source: LineError,
    },

    #[error("configuration has already been parsed")]
    AlreadyParsed,
}

impl ConfigError {
    /// The file the failure occurred in, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Open { path, .. } | Self::Read { path, .. } | Self::Line { path, .. } => {
                Some(path.as_path())
            }
            Self::AlreadyParsed => None,
        }
    }

    #[must_use]
    pub const fn line_error(&self) -> Option<&LineError> {
        match self {
            Self::Line { source, .. } => Some(source),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Open { .. } | Self::Read { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no such section [{section}] was set")]
    NoSuchSection { section: String },

    #[error("no such key [{key}] was set under section [{section}]")]
    NoSuchKey { section: String, key: String },
}

impl LookupError {
    #[must_use]
    pub fn no_such_section(section: impl Into<String>) -> Self {
        Self::NoSuchSection {
            section: section.into(),
        }
    }

    #[must_use]
    pub fn no_such_key(section: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NoSuchKey {
            section: section.into(),
            key: key.into(),
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NoSuchSection { .. } | Self::NoSuchKey { .. })
    }

    #[must_use]
    pub const fn is_no_such_section(&self) -> bool {
        matches!(self, Self::NoSuchSection { .. })
    }

    #[must_use]
    pub const fn is_no_such_key(&self) -> bool {
        matches!(self, Self::NoSuchKey { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_error_shows_line_and_cause() {
        let err = LineError::new("= x", LineErrorKind::InvalidLine);
        assert_eq!(err.to_string(), "= x: invalid configuration line");
    }

    #[test]
    fn config_error_carries_location() {
        let err = ConfigError::Line {
            path: PathBuf::from("app.ini"),
            line_no: 3,
            source: LineError::new("k = v", LineErrorKind::LineOutsideSection),
        };
        assert_eq!(
            err.to_string(),
            "configuration file error: app.ini:3\n\tk = v: configuration line without section"
        );
        assert_eq!(err.path(), Some(Path::new("app.ini")));
        assert_eq!(
            err.line_error().map(|e| e.kind),
            Some(LineErrorKind::LineOutsideSection)
        );
        assert!(!err.is_io());
    }

    #[test]
    fn lookup_error_messages() {
        assert_eq!(
            LookupError::no_such_section("db").to_string(),
            "no such section [db] was set"
        );
        assert_eq!(
            LookupError::no_such_key("db", "port").to_string(),
            "no such key [port] was set under section [db]"
        );
    }

    #[test]
    fn lookup_errors_are_not_found() {
        let section = LookupError::no_such_section("db");
        let key = LookupError::no_such_key("db", "port");
        assert!(section.is_not_found());
        assert!(key.is_not_found());
        assert!(section.is_no_such_section() && !section.is_no_such_key());
        assert!(key.is_no_such_key() && !key.is_no_such_section());
    }
}
