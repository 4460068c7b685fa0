//! Key-based message translation with pluralization ranges, context rules
//! and `Accept-Language` negotiation.
//!
//! ```
//! use verba_core::{LocaleRegistry, Translate};
//!
//! let registry = LocaleRegistry::new();
//! registry.must_register_document("en", "{}");
//! registry.must_register_document("ja", r#"{"values": {"Cancel": "キャンセル"}}"#);
//!
//! let tr = registry.select("ja,en-us;q=0.7,en;q=0.3");
//! assert_eq!(tr.translate("Cancel"), "キャンセル");
//! ```

pub mod args;
pub mod config;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod loader;
pub mod locale;
pub mod params;
pub mod translator;

pub use args::{Arg, CallArgs};
pub use dictionary::{ContextRule, Dictionary, Entry, Range};
pub use error::{ArgKind, ArgsError, LoadError, LocaleError, Location, ParseError};
pub use locale::{BoundTranslator, LocaleRegistry, parse_accept_language};
pub use params::{Context, Replace};
pub use translator::{Translate, Translator};
