//! Locale negotiation: `Accept-Language` parsing, tag matching and the
//! multi-locale dictionary registry.

mod accept;
mod matcher;
mod registry;

pub use accept::{Preference, parse_accept_language};
pub use matcher::{Confidence, Match, Matcher};
pub use registry::{BoundTranslator, LocaleRegistry, Negotiated};
