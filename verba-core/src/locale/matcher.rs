use unic_langid::LanguageIdentifier;

use super::accept::Preference;

/// How a negotiated locale was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// Every subtag of the preferred and the supported tag agree.
    Exact,
    /// The tags share the primary language and possibly further subtags.
    Prefix,
    /// No preference matched; the first supported tag was used.
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub index: usize,
    pub confidence: Confidence,
}

/// Negotiates a preference list against a fixed, ordered set of supported tags.
///
/// Preferences are tried by descending quality. For each one the supported tag
/// sharing the longest run of leading subtags wins; among equals the tag with
/// the fewest subtags, then the earlier registered one. At least the primary
/// language must agree. The wildcard `*` and an unmatched list both resolve
/// to the first supported tag.
#[derive(Debug, Clone)]
pub struct Matcher {
    supported: Vec<Vec<String>>,
}

impl Matcher {
    pub fn new<'a>(supported: impl IntoIterator<Item = &'a LanguageIdentifier>) -> Self {
        Self {
            supported: supported.into_iter().map(subtags).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.supported.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supported.is_empty()
    }

    /// `None` only when no tag is supported.
    pub fn best_match(&self, preferences: &[Preference]) -> Option<Match> {
        if self.supported.is_empty() {
            return None;
        }

        for preference in preferences {
            let Some(tag) = &preference.tag else {
                return Some(Match {
                    index: 0,
                    confidence: Confidence::Default,
                });
            };
            if let Some(found) = self.closest(&subtags(tag)) {
                return Some(found);
            }
        }

        Some(Match {
            index: 0,
            confidence: Confidence::Default,
        })
    }

    fn closest(&self, wanted: &[String]) -> Option<Match> {
        let mut best: Option<(usize, usize)> = None;
        for (index, candidate) in self.supported.iter().enumerate() {
            let shared = shared_prefix(wanted, candidate);
            if shared == 0 {
                continue;
            }
            let better = best.is_none_or(|(current, longest)| {
                shared > longest
                    || (shared == longest && candidate.len() < self.supported[current].len())
            });
            if better {
                best = Some((index, shared));
            }
        }

        best.map(|(index, shared)| Match {
            index,
            confidence: if shared == wanted.len() && shared == self.supported[index].len() {
                Confidence::Exact
            } else {
                Confidence::Prefix
            },
        })
    }
}

fn subtags(tag: &LanguageIdentifier) -> Vec<String> {
    tag.to_string()
        .split('-')
        .map(|s| s.to_ascii_lowercase())
        .collect()
}

fn shared_prefix(a: &[String], b: &[String]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
