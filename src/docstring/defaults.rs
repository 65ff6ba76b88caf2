//! `defaults to <value>` phrases inside parameter descriptions

use crate::core::values::DefaultValue;
use once_cell::sync::Lazy;
use regex::Regex;

// `(defaults to X)` closing the description
static PAREN_DEFAULT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\(\s*(?:defaults?\s+to|default\s+is|default\s*[:=])\s*(?P<value>.+?)\s*\)\s*\.?\s*$",
    )
    .unwrap()
});

// `..., defaults to X.` as the last sentence of the description. A bare
// `default: X` label only counts at the start of a sentence or clause
static PLAIN_DEFAULT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:\b(?:defaults?\s+to|default\s+is)|(?:^|[.,;])\s*default\s*[:=])\s*(?P<value>(?:[^.\s]|\.\S|\s)+?)\s*\.?\s*$",
    )
    .unwrap()
});

static ANY_DEFAULT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bdefaults?\s+to\b|\bdefault\s+is\b|(?:^|[.,;(])\s*default\s*[:=]").unwrap()
});

/// Split a description into the text before its trailing defaults phrase and
/// the parsed default.
///
/// The separating `,`/`;` before the phrase is dropped; a sentence-ending `.`
/// is kept. Descriptions without a phrase come back unchanged.
pub fn extract_default(doc: &str) -> (Option<String>, Option<DefaultValue>) {
    let captures = PAREN_DEFAULT
        .captures(doc)
        .or_else(|| PLAIN_DEFAULT.captures(doc));

    let Some(captures) = captures else {
        return (non_empty(doc.trim()), None);
    };
    let (Some(whole), Some(value)) = (captures.get(0), captures.name("value")) else {
        return (non_empty(doc.trim()), None);
    };

    // a sentence-ending `.` matched before a `Default:` label stays in the prose
    let end = whole.start() + usize::from(whole.as_str().starts_with('.'));
    let prefix = doc[..end].trim_end();
    let prefix = prefix
        .strip_suffix(',')
        .or_else(|| prefix.strip_suffix(';'))
        .unwrap_or(prefix)
        .trim();
    (
        non_empty(prefix),
        Some(DefaultValue::from_doc_text(value.as_str())),
    )
}

/// Whether the description already states its default
pub fn has_default_phrase(doc: &str) -> bool {
    ANY_DEFAULT.is_match(doc)
}

/// Append a `defaults to` phrase the way [`extract_default`] reads it back
pub fn append_default(doc: Option<&str>, default: &DefaultValue) -> String {
    let value = default.to_doc_text();
    match doc.map(str::trim).filter(|d| !d.is_empty()) {
        None => format!("Defaults to {value}"),
        Some(doc) if doc.ends_with('.') => format!("{doc} Defaults to {value}"),
        Some(doc) => format!("{doc}, defaults to {value}"),
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}
