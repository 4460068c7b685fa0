//! Translation resolution: context selection, range matching and placeholder
//! substitution.
//!
//! Resolution never fails. When neither the matched context rule nor the root
//! table yields a usable entry, the fallback text (or the key itself) is used
//! as the template, so a missing translation degrades to readable text.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::trace;

use crate::args::CallArgs;
use crate::dictionary::{Dictionary, Entries};
use crate::params::{Context, Replace};

/// Resolves `key` against `dictionary` using the context carried in `args`.
pub fn translate(dictionary: &Dictionary, key: &str, args: &CallArgs) -> String {
    translate_in_context(dictionary, key, args, args.context.as_ref())
}

/// Like [`translate`], but with an explicit context, ignoring `args.context`.
pub fn translate_in_context(
    dictionary: &Dictionary,
    key: &str,
    args: &CallArgs,
    context: Option<&Context>,
) -> String {
    if let Some(found) = lookup(dictionary, key, args.count, &args.replace, context) {
        return found;
    }

    trace!(key, count = ?args.count, "no translation, using original text");
    let original = args.fallback.as_deref().unwrap_or(key);
    substitute(original, args.count, &args.replace)
}

/// The substituted translation of `key`, or `None` when nothing qualifies.
pub fn lookup(
    dictionary: &Dictionary,
    key: &str,
    count: Option<i64>,
    replace: &Replace,
    context: Option<&Context>,
) -> Option<String> {
    let rule = context.and_then(|context| dictionary.context_rule(context));
    if let Some(found) = rule.and_then(|rule| find(&rule.entries, key, count, replace)) {
        return Some(found);
    }
    find(dictionary.entries(), key, count, replace)
}

fn find(entries: &Entries, key: &str, count: Option<i64>, replace: &Replace) -> Option<String> {
    let template = entries.get(key)?.select(count)?;
    Some(substitute(template, count, replace))
}

/// Replaces `%n`, `-%n` and `%{name}` in a single pass over `template`.
///
/// `%n` / `-%n` are only touched when a count is given; `%{name}` only when
/// `name` is a key of `replace`, whatever characters the key contains.
/// Everything else is left verbatim and substituted values are never rescanned.
pub fn substitute(template: &str, count: Option<i64>, replace: &Replace) -> String {
    if count.is_none() && replace.is_empty() {
        return template.to_string();
    }

    static COUNT_ONLY: OnceLock<Regex> = OnceLock::new();
    let keyed;
    let re = if replace.is_empty() {
        COUNT_ONLY.get_or_init(|| Regex::new(r"-%n|%n").expect("Invalid regex pattern"))
    } else {
        keyed = match placeholder_pattern(replace) {
            Ok(re) => re,
            Err(e) => {
                trace!(error = %e, "replacement keys do not fit one pattern, substituting in order");
                return substitute_each(template, count, replace);
            }
        };
        &keyed
    };

    let result = re.replace_all(template, |caps: &Captures| {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        if let Some(name) = caps.get(1) {
            return replace.get(name.as_str()).unwrap_or(whole).to_string();
        }
        match count {
            Some(n) if whole == "-%n" => (-i128::from(n)).to_string(),
            Some(n) => n.to_string(),
            None => whole.to_string(),
        }
    });

    result.into_owned()
}

/// `-%n|%n|%\{(k1|k2|...)\}` over the escaped keys, longest key first.
fn placeholder_pattern(replace: &Replace) -> Result<Regex, regex::Error> {
    let mut names: Vec<&str> = replace.iter().map(|(name, _)| name.as_str()).collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let alternation = names
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"-%n|%n|%\{{({})\}}", alternation))
}

/// Left-to-right scan used when the keys are too many for one pattern.
fn substitute_each(template: &str, count: Option<i64>, replace: &Replace) -> String {
    let mut names: Vec<(&String, &String)> = replace.iter().collect();
    names.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    'scan: while !rest.is_empty() {
        if let Some(n) = count {
            if let Some(tail) = rest.strip_prefix("-%n") {
                out.push_str(&(-i128::from(n)).to_string());
                rest = tail;
                continue;
            }
            if let Some(tail) = rest.strip_prefix("%n") {
                out.push_str(&n.to_string());
                rest = tail;
                continue;
            }
        }
        if let Some(after) = rest.strip_prefix("%{") {
            for (name, value) in &names {
                if let Some(tail) = after.strip_prefix(name.as_str()).and_then(|t| t.strip_prefix('}')) {
                    out.push_str(value);
                    rest = tail;
                    continue 'scan;
                }
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{ContextRule, Entry, Range};

    fn due_dictionary() -> Dictionary {
        let mut dict = Dictionary::new();
        dict.insert_entry(
            "Due in %n days",
            Entry::Plural(vec![
                Range::new(None, Some(-2), "Due -%n days ago"),
                Range::new(Some(-1), Some(-1), "Due Yesterday"),
                Range::new(Some(0), Some(0), "Due Today"),
                Range::new(Some(1), Some(1), "Due Tomorrow"),
                Range::new(Some(2), None, "Due in %n days"),
            ]),
        );
        dict
    }

    #[test]
    fn test_substitute_count_and_negated_count() {
        let none = Replace::new();
        assert_eq!(substitute("%n items", Some(3), &none), "3 items");
        assert_eq!(substitute("-%n days ago", Some(-5), &none), "5 days ago");
        assert_eq!(substitute("a -%n b %n", Some(2), &none), "a -2 b 2");
        assert_eq!(
            substitute("-%n", Some(i64::MIN), &none),
            "9223372036854775808"
        );
    }

    #[test]
    fn test_substitute_without_count_leaves_count_markers() {
        let replace = Replace::new().with("name", "John");
        assert_eq!(
            substitute("%{name} has %n and -%n", None, &replace),
            "John has %n and -%n"
        );
    }

    #[test]
    fn test_substitute_unknown_placeholder_is_verbatim() {
        let replace = Replace::new().with("name", "John");
        assert_eq!(
            substitute("%{name} and %{other}", None, &replace),
            "John and %{other}"
        );
    }

    #[test]
    fn test_substitute_keys_with_brace_and_percent() {
        let replace = Replace::from([("a%b", "X"), ("x{y", "Y"), ("}", "Z"), ("", "E")]);
        assert_eq!(
            substitute("[%{a%b}] [%{x{y}] [%{}}] [%{}] [%{a%}]", None, &replace),
            "[X] [Y] [Z] [E] [%{a%}]"
        );
        assert_eq!(
            substitute_each("[%{a%b}] [%{x{y}] -%n %n", Some(-4), &replace),
            "[X] [Y] 4 -4"
        );
    }

    #[test]
    fn test_substitute_prefers_longest_key() {
        let replace = Replace::from([("a", "short"), ("a}b", "long")]);
        assert_eq!(substitute("%{a}b}", None, &replace), "long");
        assert_eq!(substitute("%{a}c", None, &replace), "shortc");
    }

    #[test]
    fn test_substitute_does_not_rescan_values() {
        let replace = Replace::new().with("a", "%{b}").with("b", "%n");
        assert_eq!(substitute("%{a}|%{b}", Some(7), &replace), "%{b}|%n");
    }

    #[test]
    fn test_plural_ranges_in_order() {
        let dict = due_dictionary();
        let at = |n: i64| translate(&dict, "Due in %n days", &CallArgs::new().count(n));

        assert_eq!(at(-2), "Due 2 days ago");
        assert_eq!(at(-40), "Due 40 days ago");
        assert_eq!(at(-1), "Due Yesterday");
        assert_eq!(at(0), "Due Today");
        assert_eq!(at(1), "Due Tomorrow");
        assert_eq!(at(2), "Due in 2 days");
    }

    #[test]
    fn test_overlapping_ranges_first_listed_wins() {
        let mut dict = Dictionary::new();
        dict.insert_entry(
            "k",
            Entry::Plural(vec![
                Range::new(Some(0), Some(10), "wide"),
                Range::new(Some(5), Some(5), "narrow"),
            ]),
        );
        assert_eq!(translate(&dict, "k", &CallArgs::new().count(5)), "wide");
    }

    #[test]
    fn test_shape_mismatch_falls_through_to_key() {
        let mut dict = due_dictionary();
        dict.insert("Cancel", "Cancelar");

        assert_eq!(translate(&dict, "Cancel", &CallArgs::new()), "Cancelar");
        assert_eq!(translate(&dict, "Cancel", &CallArgs::new().count(2)), "Cancel");
        assert_eq!(
            translate(&dict, "Due in %n days", &CallArgs::new()),
            "Due in %n days"
        );
    }

    #[test]
    fn test_range_miss_uses_original_text_with_count() {
        let mut dict = Dictionary::new();
        dict.insert_entry(
            "%n apples",
            Entry::Plural(vec![Range::new(Some(1), Some(1), "one apple")]),
        );
        assert_eq!(
            translate(&dict, "%n apples", &CallArgs::new().count(3)),
            "3 apples"
        );
        assert_eq!(
            translate(&dict, "_apples", &CallArgs::new().count(3).fallback("%n apples")),
            "3 apples"
        );
    }

    #[test]
    fn test_missing_key_uses_key_or_fallback() {
        let dict = Dictionary::new();
        assert_eq!(translate(&dict, "Hello", &CallArgs::new()), "Hello");
        assert_eq!(
            translate(
                &dict,
                "_short_key",
                &CallArgs::new().fallback("This is a long piece of text")
            ),
            "This is a long piece of text"
        );
    }

    #[test]
    fn test_context_entry_wins_over_root() {
        let mut dict = Dictionary::new();
        dict.insert("their", "their");
        dict.push_context(
            ContextRule::new(Context::from([("gender", "female")]))
                .with_entry("their", Entry::Simple("her".into())),
        );

        let female = CallArgs::new().context(Context::from([("gender", "female")]));
        let male = CallArgs::new().context(Context::from([("gender", "male")]));
        assert_eq!(translate(&dict, "their", &female), "her");
        assert_eq!(translate(&dict, "their", &male), "their");
        assert_eq!(translate(&dict, "their", &CallArgs::new()), "their");
    }

    #[test]
    fn test_unusable_context_entry_falls_back_to_root() {
        let mut dict = Dictionary::new();
        dict.insert_entry(
            "%n photos",
            Entry::Plural(vec![Range::new(None, None, "%n photos (root)")]),
        );
        dict.push_context(
            ContextRule::new(Context::from([("gender", "male")]))
                .with_entry("%n photos", Entry::Simple("simple only".into())),
        );

        let args = CallArgs::new()
            .count(3)
            .context(Context::from([("gender", "male")]));
        assert_eq!(translate(&dict, "%n photos", &args), "3 photos (root)");
    }

    #[test]
    fn test_translate_is_repeatable() {
        let dict = due_dictionary();
        let args = CallArgs::new().count(-3);
        let first = translate(&dict, "Due in %n days", &args);
        let second = translate(&dict, "Due in %n days", &args);
        assert_eq!(first, second);
    }
}
