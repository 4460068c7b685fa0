use std::cmp::Ordering;

use tracing::trace;
use unic_langid::LanguageIdentifier;

/// One entry of an `Accept-Language` list.
#[derive(Debug, Clone, PartialEq)]
pub struct Preference {
    /// `None` for the `*` wildcard.
    pub tag: Option<LanguageIdentifier>,
    pub quality: f32,
}

/// Parses `"ja,en-US;q=0.7,en;q=0.3"` into preferences ordered by descending
/// quality. Entries with equal quality keep their written order.
///
/// Entries with an unparsable tag, a malformed `q` parameter or `q=0` are
/// dropped; a missing `q` counts as `1.0`.
pub fn parse_accept_language(header: &str) -> Vec<Preference> {
    let mut prefs: Vec<Preference> = header
        .split(',')
        .filter_map(|part| {
            let mut sections = part.split(';');
            let raw_tag = sections.next()?.trim();
            if raw_tag.is_empty() {
                return None;
            }

            let quality = match sections.find_map(|param| param.trim().strip_prefix("q=")) {
                None => 1.0,
                Some(raw) => match raw.trim().parse::<f32>() {
                    Ok(q) if q.is_finite() => q.clamp(0.0, 1.0),
                    _ => {
                        trace!(tag = raw_tag, quality = raw, "skipping malformed quality");
                        return None;
                    }
                },
            };
            if quality <= 0.0 {
                return None;
            }

            if raw_tag == "*" {
                return Some(Preference { tag: None, quality });
            }

            match raw_tag.parse::<LanguageIdentifier>() {
                Ok(tag) => Some(Preference {
                    tag: Some(tag),
                    quality,
                }),
                Err(e) => {
                    trace!(tag = raw_tag, error = %e, "skipping unparsable language tag");
                    None
                }
            }
        })
        .collect();

    // 按权重降序排列
    prefs.sort_by(|a, b| b.quality.partial_cmp(&a.quality).unwrap_or(Ordering::Equal));
    prefs
}
