//! In-memory translation tables.
//!
//! A [`Dictionary`] maps source keys to [`Entry`] values and carries an ordered
//! list of [`ContextRule`]s. Keys are matched exactly and case-sensitively.

use std::collections::HashMap;

use crate::params::Context;

/// One pluralisation row: an inclusive count interval and its template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    pub min: i64,
    pub max: i64,
    pub template: String,
}

impl Range {
    /// An open bound (`None`) extends to `i64::MIN` / `i64::MAX`.
    pub fn new(min: Option<i64>, max: Option<i64>, template: impl Into<String>) -> Self {
        Self {
            min: min.unwrap_or(i64::MIN),
            max: max.unwrap_or(i64::MAX),
            template: template.into(),
        }
    }

    pub fn contains(&self, count: i64) -> bool {
        self.min <= count && count <= self.max
    }
}

/// Translation data for a single key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Used only when no count is supplied.
    Simple(String),
    /// Used only when a count is supplied; rows are tried in order.
    Plural(Vec<Range>),
}

impl Entry {
    /// Picks the template usable for `count`, or `None` when this entry does
    /// not qualify (wrong shape for the call, or no row contains the count).
    pub fn select(&self, count: Option<i64>) -> Option<&str> {
        match (self, count) {
            (Entry::Simple(template), None) => Some(template),
            (Entry::Plural(ranges), Some(n)) => ranges
                .iter()
                .find(|range| range.contains(n))
                .map(|range| range.template.as_str()),
            _ => None,
        }
    }
}

pub type Entries = HashMap<String, Entry>;

/// An alternate entry table selected when the caller's context satisfies `matches`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextRule {
    pub matches: Context,
    pub entries: Entries,
}

impl ContextRule {
    pub fn new(matches: Context) -> Self {
        Self {
            matches,
            entries: Entries::new(),
        }
    }

    pub fn with_entry(mut self, key: impl Into<String>, entry: Entry) -> Self {
        self.entries.insert(key.into(), entry);
        self
    }

    pub fn applies_to(&self, context: &Context) -> bool {
        context.satisfies(&self.matches)
    }
}

/// The translation table of one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: Entries,
    contexts: Vec<ContextRule>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single simple entry to the root table, replacing any previous
    /// entry under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), Entry::Simple(value.into()));
    }

    pub fn insert_entry(&mut self, key: impl Into<String>, entry: Entry) {
        self.entries.insert(key.into(), entry);
    }

    pub fn push_context(&mut self, rule: ContextRule) {
        self.contexts.push(rule);
    }

    /// Folds `other` into this dictionary: root entries overwrite, context
    /// rules are appended after the existing ones.
    pub fn merge(&mut self, other: Dictionary) {
        self.entries.extend(other.entries);
        self.contexts.extend(other.contexts);
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> &Entries {
        &self.entries
    }

    pub fn contexts(&self) -> &[ContextRule] {
        &self.contexts
    }

    /// The first context rule satisfied by `context`, in document order.
    pub fn context_rule(&self, context: &Context) -> Option<&ContextRule> {
        self.contexts.iter().find(|rule| rule.applies_to(context))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.contexts.clear();
    }

    /// Number of root entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.contexts.is_empty()
    }
}
