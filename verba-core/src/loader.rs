//! Dictionary loader: turns a JSON or YAML document into a [`Dictionary`].
//!
//! Document shape:
//!
//! ```json
//! {
//!   "values": {
//!     "Cancel": "Cancelar",
//!     "%n comments": [[0, 0, "%n comments"], [1, 1, "%n comment"], [2, null, "%n comments"]]
//!   },
//!   "contexts": [
//!     { "matches": { "gender": "female" }, "values": { "their": "her" } }
//!   ]
//! }
//! ```
//!
//! Both sections are optional. A `null` lower bound means `i64::MIN`, a `null`
//! upper bound means `i64::MAX`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::dictionary::{ContextRule, Dictionary, Entry, Range};
use crate::error::{LoadError, Location, ParseError};
use crate::params::Context;

#[derive(Debug, Default, Deserialize)]
struct RawDocument {
    #[serde(default)]
    values: Option<Map<String, Value>>,
    #[serde(default)]
    contexts: Option<Vec<RawContext>>,
}

#[derive(Debug, Deserialize)]
struct RawContext {
    #[serde(default)]
    matches: Option<HashMap<String, String>>,
    #[serde(default)]
    values: Option<Map<String, Value>>,
}

/// Builds a dictionary from an already parsed JSON value.
pub fn parse(document: Value) -> Result<Dictionary, ParseError> {
    let raw: RawDocument = serde_json::from_value(document)?;
    build(raw)
}

pub fn from_json_str(json: &str) -> Result<Dictionary, ParseError> {
    let raw: RawDocument = serde_json::from_str(json)?;
    build(raw)
}

pub fn from_json_slice(json: &[u8]) -> Result<Dictionary, ParseError> {
    let raw: RawDocument = serde_json::from_slice(json)?;
    build(raw)
}

pub fn from_yaml_str(yaml: &str) -> Result<Dictionary, ParseError> {
    let raw: RawDocument = serde_yaml::from_str(yaml)?;
    build(raw)
}

/// Like [`from_json_str`], but panics on malformed input.
///
/// Meant for static initialisation where the document ships with the binary.
pub fn must_from_json_str(json: &str) -> Dictionary {
    match from_json_str(json) {
        Ok(dictionary) => dictionary,
        Err(e) => panic!("invalid dictionary document: {}", e),
    }
}

impl FromStr for Dictionary {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_json_str(s)
    }
}

/// Reads one dictionary file; the format follows the extension
/// (`.json`, `.yaml` or `.yml`).
pub fn load_file(path: impl AsRef<Path>) -> Result<Dictionary, LoadError> {
    let path = path.as_ref();
    let format = DocumentFormat::of(path).ok_or_else(|| LoadError::Format(path.to_path_buf()))?;

    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed = match format {
        DocumentFormat::Json => from_json_str(&content),
        DocumentFormat::Yaml => from_yaml_str(&content),
    };

    let dictionary = parsed.map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        entries = dictionary.len(),
        contexts = dictionary.contexts().len(),
        "loaded dictionary"
    );
    Ok(dictionary)
}

/// Paths of the dictionary files (`.json`, `.yaml`, `.yml`) in `dir`, sorted
/// by file name. Other files are skipped.
pub fn dictionary_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, LoadError> {
    let dir = dir.as_ref();
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && DocumentFormat::of(path).is_some())
        .collect();
    paths.sort();
    Ok(paths)
}

/// Loads every dictionary file in `dir`, keyed by file stem, sorted by file name.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Vec<(String, Dictionary)>, LoadError> {
    dictionary_files(dir)?
        .into_iter()
        .filter_map(|path| {
            let stem = path.file_stem()?.to_str()?.to_string();
            Some((stem, path))
        })
        .map(|(stem, path)| load_file(&path).map(|dictionary| (stem, dictionary)))
        .collect()
}

/// Embeds a dictionary document at compile time and parses it on call.
///
/// `include_dictionary!("en.json")` parses JSON,
/// `include_dictionary!("en.yaml", yaml)` parses YAML.
#[macro_export]
macro_rules! include_dictionary {
    ($path:expr) => {
        $crate::loader::from_json_str(include_str!($path))
    };
    ($path:expr, json) => {
        $crate::loader::from_json_str(include_str!($path))
    };
    ($path:expr, yaml) => {
        $crate::loader::from_yaml_str(include_str!($path))
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    fn of(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(DocumentFormat::Json),
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            _ => None,
        }
    }
}

fn build(raw: RawDocument) -> Result<Dictionary, ParseError> {
    let mut dictionary = Dictionary::new();

    for (key, value) in raw.values.unwrap_or_default() {
        let entry = parse_value(Location::Root, &key, value)?;
        dictionary.insert_entry(key, entry);
    }

    for (index, raw_context) in raw.contexts.unwrap_or_default().into_iter().enumerate() {
        let matches: Context = raw_context.matches.unwrap_or_default().into();
        let mut rule = ContextRule::new(matches);
        for (key, value) in raw_context.values.unwrap_or_default() {
            let entry = parse_value(Location::Context(index), &key, value)?;
            rule.entries.insert(key, entry);
        }
        dictionary.push_context(rule);
    }

    Ok(dictionary)
}

fn parse_value(location: Location, key: &str, value: Value) -> Result<Entry, ParseError> {
    match value {
        Value::String(text) => Ok(Entry::Simple(text)),
        Value::Array(rows) => rows
            .into_iter()
            .enumerate()
            .map(|(row, value)| parse_row(location, key, row, value))
            .collect::<Result<Vec<_>, _>>()
            .map(Entry::Plural),
        other => Err(ParseError::Value {
            location,
            key: key.to_string(),
            found: other.to_string(),
        }),
    }
}

fn parse_row(location: Location, key: &str, row: usize, value: Value) -> Result<Range, ParseError> {
    let row_err = |found: String| ParseError::Row {
        location,
        key: key.to_string(),
        row,
        found,
    };

    let cells = match value {
        Value::Array(cells) => cells,
        other => return Err(row_err(other.to_string())),
    };
    let [min, max, text]: [Value; 3] = cells
        .try_into()
        .map_err(|cells: Vec<Value>| row_err(Value::Array(cells).to_string()))?;

    let min = bound(&min).ok_or_else(|| ParseError::Min {
        location,
        key: key.to_string(),
        found: min.to_string(),
    })?;
    let max = bound(&max).ok_or_else(|| ParseError::Max {
        location,
        key: key.to_string(),
        found: max.to_string(),
    })?;
    let template = match text {
        Value::String(template) => template,
        other => {
            return Err(ParseError::Text {
                location,
                key: key.to_string(),
                found: other.to_string(),
            });
        }
    };

    Ok(Range::new(min, max, template))
}

/// `Some(None)` for `null`, `Some(Some(n))` for an integral number, `None` otherwise.
fn bound(value: &Value) -> Option<Option<i64>> {
    match value {
        Value::Null => Some(None),
        Value::Number(number) => {
            if let Some(n) = number.as_i64() {
                return Some(Some(n));
            }
            let float = number.as_f64()?;
            let integral = float.fract() == 0.0 && float >= i64::MIN as f64 && float < i64::MAX as f64;
            integral.then_some(Some(float as i64))
        }
        _ => None,
    }
}
