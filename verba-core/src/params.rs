//! Runtime parameters of a translate call: named replacements and context tags.

use std::collections::HashMap;
use std::collections::hash_map;

use serde::{Deserialize, Serialize};

macro_rules! string_map {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(HashMap<String, String>);

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            /// Builder-style insert; the value is stored in its `Display` form.
            pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
                self.insert(key, value);
                self
            }

            pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> Option<String> {
                self.0.insert(key.into(), value.to_string())
            }

            pub fn remove(&mut self, key: &str) -> Option<String> {
                self.0.remove(key)
            }

            pub fn get(&self, key: &str) -> Option<&str> {
                self.0.get(key).map(String::as_str)
            }

            pub fn clear(&mut self) {
                self.0.clear();
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn iter(&self) -> hash_map::Iter<'_, String, String> {
                self.0.iter()
            }
        }

        impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for $name {
            fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                Self(
                    iter.into_iter()
                        .map(|(k, v)| (k.into(), v.to_string()))
                        .collect(),
                )
            }
        }

        impl<K: Into<String>, V: ToString, const N: usize> From<[(K, V); N]> for $name {
            fn from(pairs: [(K, V); N]) -> Self {
                pairs.into_iter().collect()
            }
        }

        impl From<HashMap<String, String>> for $name {
            fn from(map: HashMap<String, String>) -> Self {
                Self(map)
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = (&'a String, &'a String);
            type IntoIter = hash_map::Iter<'a, String, String>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}

string_map!(
    /// Values substituted for `%{name}` placeholders.
    Replace
);

string_map!(
    /// Condition tags (for example `gender = female`) that select a context rule.
    Context
);

impl Context {
    /// True when every `(key, value)` of `required` is present here with an equal value.
    ///
    /// Extra keys in `self` are ignored; an empty `required` is always satisfied.
    pub fn satisfies(&self, required: &Context) -> bool {
        required
            .iter()
            .all(|(key, value)| self.get(key) == Some(value.as_str()))
    }
}
