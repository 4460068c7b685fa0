use std::collections::HashMap;

use crate::args::{Arg, CallArgs};
use crate::dictionary::Dictionary;
use crate::engine;
use crate::error::{ArgsError, ParseError};
use crate::loader;
use crate::params::Context;

/// Anything that can resolve a key into display text.
pub trait Translate {
    /// Resolves `key` with fully typed arguments. Never fails.
    fn translate_with(&self, key: &str, args: &CallArgs) -> String;

    fn translate(&self, key: &str) -> String {
        self.translate_with(key, &CallArgs::default())
    }

    /// Resolves `key` with a loosely typed argument list.
    fn try_translate_args(&self, key: &str, args: &[Arg]) -> Result<String, ArgsError> {
        let call = CallArgs::from_args(args)?;
        Ok(self.translate_with(key, &call))
    }

    /// Resolves `key` with a loosely typed argument list.
    ///
    /// # Panics
    ///
    /// When the arguments match no accepted shape; that is a call-site bug,
    /// not a missing translation.
    fn translate_args(&self, key: &str, args: &[Arg]) -> String {
        match self.try_translate_args(key, args) {
            Ok(text) => text,
            Err(e) => panic!("invalid arguments to translate '{}': {}", key, e),
        }
    }

    /// Translates every value of `map`, treating each value as a key.
    fn translate_map(&self, map: &HashMap<String, String>) -> HashMap<String, String> {
        map.iter()
            .map(|(name, key)| (name.clone(), self.translate(key)))
            .collect()
    }
}

impl<T: Translate + ?Sized> Translate for &T {
    fn translate_with(&self, key: &str, args: &CallArgs) -> String {
        (**self).translate_with(key, args)
    }
}

/// `t!(translator, key, args...)` forwards to [`Translate::translate_args`].
///
/// ```
/// use verba_core::{t, Replace, Translator};
///
/// let tr = Translator::from_json_str(r#"{"values": {"%n comments": [[1, 1, "%n comment"], [2, null, "%n comments"]]}}"#).unwrap();
/// assert_eq!(t!(tr, "%n comments", 1), "1 comment");
/// assert_eq!(t!(tr, "Welcome %{name}", Replace::from([("name", "John")])), "Welcome John");
/// ```
#[macro_export]
macro_rules! t {
    ($translator:expr, $key:expr $(, $arg:expr)* $(,)?) => {
        $crate::Translate::translate_args(&$translator, $key, &[$($crate::Arg::from($arg)),*])
    };
}

/// A dictionary together with a default context.
///
/// The default context applies to every call that does not carry its own.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    dictionary: Dictionary,
    context: Context,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dictionary(dictionary: Dictionary) -> Self {
        Self {
            dictionary,
            context: Context::new(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ParseError> {
        loader::from_json_str(json).map(Self::from_dictionary)
    }

    /// Like [`Translator::from_json_str`], but panics on malformed input.
    pub fn must_from_json_str(json: &str) -> Self {
        Self::from_dictionary(loader::must_from_json_str(json))
    }

    /// Merges another dictionary into this one.
    pub fn add(&mut self, dictionary: Dictionary) {
        self.dictionary.merge(dictionary);
    }

    pub fn add_json_str(&mut self, json: &str) -> Result<(), ParseError> {
        let dictionary = loader::from_json_str(json)?;
        self.add(dictionary);
        Ok(())
    }

    /// Adds one simple entry, for long texts kept outside the document.
    pub fn add_entry(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.dictionary.insert(key, value);
    }

    pub fn set_context(&mut self, key: impl Into<String>, value: impl ToString) {
        self.context.insert(key, value);
    }

    pub fn clear_context(&mut self, key: &str) {
        self.context.remove(key);
    }

    pub fn reset_context(&mut self) {
        self.context.clear();
    }

    pub fn reset_data(&mut self) {
        self.dictionary.clear();
    }

    pub fn reset(&mut self) {
        self.reset_data();
        self.reset_context();
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn context(&self) -> &Context {
        &self.context
    }
}

impl Translate for Translator {
    fn translate_with(&self, key: &str, args: &CallArgs) -> String {
        let context = args.context.as_ref().unwrap_or(&self.context);
        engine::translate_in_context(&self.dictionary, key, args, Some(context))
    }
}
