use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};
use unic_langid::LanguageIdentifier;

use super::accept::parse_accept_language;
use super::matcher::{Confidence, Matcher};
use crate::args::{Arg, CallArgs};
use crate::dictionary::Dictionary;
use crate::engine;
use crate::error::{LoadError, LocaleError};
use crate::loader;
use crate::translator::Translate;

/// Dictionaries keyed by locale, negotiated against `Accept-Language` lists.
///
/// Registration order matters: the first registered locale is the fallback
/// when nothing in a preference list matches.
///
/// Dictionaries are handed out as `Arc` snapshots, so translating never takes
/// the registry lock. [`LocaleRegistry::add_entry`] replaces the stored
/// snapshot (copy-on-write) under the lock.
#[derive(Debug, Default)]
pub struct LocaleRegistry {
    state: Mutex<RegistryState>,
}

#[derive(Debug, Default)]
struct RegistryState {
    dictionaries: HashMap<LanguageIdentifier, Arc<Dictionary>>,
    tags: Vec<LanguageIdentifier>,
    /// Rebuilt lazily by the next negotiation after a registration.
    matcher: Option<Matcher>,
}

impl LocaleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every dictionary file of `dir` (see [`loader::load_dir`]); the
    /// file stem is the locale tag.
    ///
    /// `default` is registered first so it becomes the negotiation fallback;
    /// otherwise files are registered in file name order.
    pub fn from_dir(dir: impl AsRef<Path>, default: Option<&str>) -> Result<Self, LoadError> {
        let dir = dir.as_ref();
        let mut tagged = Vec::new();
        for (stem, dictionary) in loader::load_dir(dir)? {
            let tag = parse_tag(&stem).map_err(|source| LoadError::Locale {
                path: dir.join(&stem),
                source,
            })?;
            tagged.push((tag, dictionary));
        }

        if let Some(default) = default {
            let position = parse_tag(default)
                .ok()
                .and_then(|wanted| tagged.iter().position(|(tag, _)| *tag == wanted))
                .ok_or_else(|| LoadError::MissingDefault(default.to_string()))?;
            let first = tagged.remove(position);
            tagged.insert(0, first);
        }

        let registry = Self::new();
        for (tag, dictionary) in tagged {
            registry.register_tag(tag, dictionary);
        }
        Ok(registry)
    }

    fn state(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds or replaces the dictionary for `tag`.
    pub fn register(&self, tag: &str, dictionary: Dictionary) -> Result<LanguageIdentifier, LocaleError> {
        let tag = parse_tag(tag)?;
        self.register_tag(tag.clone(), dictionary);
        Ok(tag)
    }

    pub fn register_tag(&self, tag: LanguageIdentifier, dictionary: Dictionary) {
        let entries = dictionary.len();
        let mut state = self.state();
        if state
            .dictionaries
            .insert(tag.clone(), Arc::new(dictionary))
            .is_none()
        {
            state.tags.push(tag.clone());
        }
        state.matcher = None;
        info!(locale = %tag, entries, "registered dictionary");
    }

    /// Parses a JSON document and registers it under `tag`.
    pub fn register_document(&self, tag: &str, json: &str) -> Result<LanguageIdentifier, LocaleError> {
        let dictionary = loader::from_json_str(json)?;
        self.register(tag, dictionary)
    }

    /// Like [`LocaleRegistry::register_document`], but panics on failure.
    /// Meant for startup code registering documents shipped with the binary.
    pub fn must_register_document(&self, tag: &str, json: &str) {
        if let Err(e) = self.register_document(tag, json) {
            panic!("failed to register locale '{}': {}", tag, e);
        }
    }

    /// Adds one simple entry to an already registered locale.
    ///
    /// Translators selected earlier keep the snapshot they were given.
    pub fn add_entry(
        &self,
        tag: &str,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), LocaleError> {
        let id = parse_tag(tag)?;
        let mut state = self.state();
        let dictionary = state
            .dictionaries
            .get_mut(&id)
            .ok_or_else(|| LocaleError::Unknown(tag.to_string()))?;
        Arc::make_mut(dictionary).insert(key, value);
        Ok(())
    }

    /// The negotiated locale and its dictionary; `None` only when empty.
    pub fn negotiate(&self, preference: &str) -> Option<Negotiated> {
        let preferences = parse_accept_language(preference);

        let mut guard = self.state();
        let state = &mut *guard;
        let matcher = state
            .matcher
            .get_or_insert_with(|| Matcher::new(&state.tags));
        let found = matcher.best_match(&preferences)?;

        let tag = state.tags.get(found.index)?.clone();
        let dictionary = Arc::clone(state.dictionaries.get(&tag)?);
        debug!(preference, locale = %tag, confidence = ?found.confidence, "negotiated locale");
        Some(Negotiated {
            tag,
            dictionary,
            confidence: found.confidence,
        })
    }

    /// A translator bound to the best registered match for `preference`.
    ///
    /// An empty registry yields a translator over an empty dictionary, which
    /// passes every key through.
    pub fn select(&self, preference: &str) -> BoundTranslator {
        match self.negotiate(preference) {
            Some(negotiated) => BoundTranslator {
                tag: Some(negotiated.tag),
                dictionary: negotiated.dictionary,
            },
            None => BoundTranslator::default(),
        }
    }

    /// The matched dictionary itself, for callers wrapping it in their own translator.
    pub fn select_translator(&self, preference: &str) -> Option<Arc<Dictionary>> {
        self.negotiate(preference).map(|negotiated| negotiated.dictionary)
    }

    pub fn get(&self, tag: &str) -> Option<Arc<Dictionary>> {
        let id = parse_tag(tag).ok()?;
        self.state().dictionaries.get(&id).cloned()
    }

    /// Registered tags in registration order.
    pub fn tags(&self) -> Vec<LanguageIdentifier> {
        self.state().tags.clone()
    }

    pub fn default_tag(&self) -> Option<LanguageIdentifier> {
        self.state().tags.first().cloned()
    }

    pub fn len(&self) -> usize {
        self.state().tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().tags.is_empty()
    }
}

/// Outcome of [`LocaleRegistry::negotiate`].
#[derive(Debug, Clone)]
pub struct Negotiated {
    pub tag: LanguageIdentifier,
    pub dictionary: Arc<Dictionary>,
    pub confidence: Confidence,
}

fn parse_tag(tag: &str) -> Result<LanguageIdentifier, LocaleError> {
    tag.parse().map_err(|e: unic_langid::LanguageIdentifierError| LocaleError::InvalidTag {
        tag: tag.to_string(),
        reason: e.to_string(),
    })
}

/// A translator closed over one negotiated dictionary.
#[derive(Debug, Clone, Default)]
pub struct BoundTranslator {
    tag: Option<LanguageIdentifier>,
    dictionary: Arc<Dictionary>,
}

impl BoundTranslator {
    pub fn new(tag: Option<LanguageIdentifier>, dictionary: Arc<Dictionary>) -> Self {
        Self { tag, dictionary }
    }

    /// The negotiated locale; `None` when the registry was empty.
    pub fn tag(&self) -> Option<&LanguageIdentifier> {
        self.tag.as_ref()
    }

    pub fn dictionary(&self) -> &Arc<Dictionary> {
        &self.dictionary
    }

    /// Turns the translator into a plain `key, args -> text` function.
    ///
    /// The returned function panics on malformed argument lists, like
    /// [`Translate::translate_args`].
    pub fn into_fn(self) -> impl Fn(&str, &[Arg]) -> String + Clone + Send + Sync {
        move |key: &str, args: &[Arg]| self.translate_args(key, args)
    }
}

impl Translate for BoundTranslator {
    fn translate_with(&self, key: &str, args: &CallArgs) -> String {
        engine::translate(&self.dictionary, key, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn registry() -> LocaleRegistry {
        let registry = LocaleRegistry::new();
        registry.must_register_document("en", "{}");
        registry.must_register_document("ja", r#"{"values": {"Cancel": "キャンセル"}}"#);
        registry
    }

    #[test]
    fn test_select_language_code() {
        let registry = registry();

        let tr = registry.select("en");
        assert_eq!(tr.translate("Cancel"), "Cancel");

        let tr = registry.select("ja,en-us;q=0.7,en;q=0.3");
        assert_eq!(tr.translate("Cancel"), "キャンセル");
        assert_eq!(tr.tag().map(ToString::to_string), Some("ja".to_string()));

        let tr = registry.select("de,fr;q=0.7,pt;q=0.3");
        assert_eq!(tr.translate("Cancel"), "Cancel");
        assert_eq!(tr.tag().map(ToString::to_string), Some("en".to_string()));
    }

    #[test]
    fn test_malformed_quality_loses_to_weighted_preference() {
        let registry = registry();
        registry.must_register_document("fr", r#"{"values": {"Cancel": "Annuler"}}"#);

        let tr = registry.select("ja;q=0.9, fr;q=bogus");
        assert_eq!(tr.tag().map(ToString::to_string), Some("ja".to_string()));
        assert_eq!(tr.translate("Cancel"), "キャンセル");

        let negotiated = registry.negotiate("fr;q=bogus").unwrap();
        assert_eq!(negotiated.tag.to_string(), "en");
        assert_eq!(negotiated.confidence, Confidence::Default);
    }

    #[test]
    fn test_empty_registry_passes_through() {
        let registry = LocaleRegistry::new();
        let tr = registry.select("ja");
        assert!(tr.tag().is_none());
        assert_eq!(tr.translate("Cancel"), "Cancel");
        assert!(registry.negotiate("ja").is_none());
    }

    #[test]
    fn test_register_invalidates_matcher() {
        let registry = LocaleRegistry::new();
        registry.must_register_document("en", "{}");
        assert_eq!(registry.select("pt").tag().map(ToString::to_string), Some("en".into()));

        registry.must_register_document("pt", r#"{"values": {"Cancel": "Cancelar"}}"#);
        let tr = registry.select("pt");
        assert_eq!(tr.translate("Cancel"), "Cancelar");
    }

    #[test]
    fn test_reregister_keeps_order_and_replaces() {
        let registry = registry();
        registry.must_register_document("en", r#"{"values": {"Cancel": "Abort"}}"#);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.default_tag().map(|t| t.to_string()), Some("en".into()));
        assert_eq!(registry.select("xx").translate("Cancel"), "Abort");
    }

    #[test]
    fn test_register_rejects_invalid_tag() {
        let registry = LocaleRegistry::new();
        let err = registry.register("not a tag!", Dictionary::new()).unwrap_err();
        assert!(matches!(err, LocaleError::InvalidTag { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_document_propagates_parse_error() {
        let registry = LocaleRegistry::new();
        let err = registry
            .register_document("en", r#"{"values": {"k": 1}}"#)
            .unwrap_err();
        assert!(matches!(err, LocaleError::Parse(_)));
    }

    #[test]
    fn test_add_entry_is_copy_on_write() {
        let registry = registry();
        let before = registry.select("ja");

        registry
            .add_entry("ja", "_terms", "利用規約の全文")
            .unwrap();

        assert_eq!(before.translate("_terms"), "_terms");
        assert_eq!(registry.select("ja").translate("_terms"), "利用規約の全文");
        assert!(matches!(
            registry.add_entry("fr", "k", "v"),
            Err(LocaleError::Unknown(_))
        ));
    }

    #[test]
    fn test_bound_fn() {
        let registry = registry();
        let tr = registry.select("ja").into_fn();
        assert_eq!(tr("Cancel", &[]), "キャンセル");
        assert_eq!(tr("%n items", &[Arg::Count(3)]), "3 items");
    }

    #[test]
    fn test_concurrent_register_and_select() {
        let registry = Arc::new(registry());
        let extra = ["fr", "de", "it", "es"];
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    if i % 2 == 0 {
                        registry.must_register_document(extra[i / 2], "{}");
                    }
                    registry.select("ja").translate("Cancel")
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "キャンセル");
        }
        assert_eq!(registry.len(), 6);
    }
}
