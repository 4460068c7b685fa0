use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Where in a document a value was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Root,
    Context(usize),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Root => write!(f, "root values"),
            Location::Context(index) => write!(f, "context[{}]", index),
        }
    }
}

/// Errors raised while turning a document into a [`Dictionary`](crate::Dictionary).
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("row {row} of key '{key}' at {location} should be [min, max, text], but '{found}'")]
    Row {
        location: Location,
        key: String,
        row: usize,
        found: String,
    },
    #[error("first value of key '{key}' at {location} should be int, but '{found}'")]
    Min {
        location: Location,
        key: String,
        found: String,
    },
    #[error("second value of key '{key}' at {location} should be int, but '{found}'")]
    Max {
        location: Location,
        key: String,
        found: String,
    },
    #[error("third value of key '{key}' at {location} should be string, but '{found}'")]
    Text {
        location: Location,
        key: String,
        found: String,
    },
    #[error("value of key '{key}' at {location} should be string or pluralisation array, but '{found}'")]
    Value {
        location: Location,
        key: String,
        found: String,
    },
}

impl ParseError {
    /// The offending translation key, if the error is tied to one.
    pub fn key(&self) -> Option<&str> {
        match self {
            ParseError::Json(_) | ParseError::Yaml(_) => None,
            ParseError::Row { key, .. }
            | ParseError::Min { key, .. }
            | ParseError::Max { key, .. }
            | ParseError::Text { key, .. }
            | ParseError::Value { key, .. } => Some(key),
        }
    }

    pub fn location(&self) -> Option<Location> {
        match self {
            ParseError::Json(_) | ParseError::Yaml(_) => None,
            ParseError::Row { location, .. }
            | ParseError::Min { location, .. }
            | ParseError::Max { location, .. }
            | ParseError::Text { location, .. }
            | ParseError::Value { location, .. } => Some(*location),
        }
    }
}

/// Errors raised while reading dictionaries from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("unsupported dictionary format: {}", .0.display())]
    Format(PathBuf),
    #[error("invalid locale file name {}: {source}", path.display())]
    Locale {
        path: PathBuf,
        #[source]
        source: LocaleError,
    },
    #[error("default locale '{0}' has no dictionary")]
    MissingDefault(String),
}

/// The dynamic shape of a translate argument, used in usage errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Text,
    Count,
    Replace,
    Context,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgKind::Text => "fallback text",
            ArgKind::Count => "count",
            ArgKind::Replace => "replacement map",
            ArgKind::Context => "context map",
        };
        f.write_str(name)
    }
}

/// A translate call whose arguments match no accepted shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    #[error("first argument should be count, fallback text or replacement map, but got {0}")]
    UnexpectedFirst(ArgKind),
    #[error("fourth argument should be a context map, but got {0}")]
    FourthNotContext(ArgKind),
    #[error("at most 4 arguments are accepted, but got {0}")]
    TooMany(usize),
}

/// Errors from the locale registry.
#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("invalid locale tag '{tag}': {reason}")]
    InvalidTag { tag: String, reason: String },
    #[error("locale '{0}' is not registered")]
    Unknown(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
