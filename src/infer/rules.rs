//! Phrase templates, one producer function per rule.
//!
//! Every producer returns `None` when its template does not apply.

use super::vocabulary::{canonical_type, dtype_type, scalar_type};
use super::{InferenceRule, Phrase};
use once_cell::sync::Lazy;
use regex::Regex;

static OR_NONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:an?\s+)?(?P<noun>[A-Za-z_]+)\s+or\s+None\b").unwrap());
static DEFAULTS_TO_NONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:an?\s+)?(?P<noun>[A-Za-z_]+)[,.;]?\s+defaults?\s+to\s+`*None\b").unwrap()
});
static BACKTICK_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"`(?P<lit>'[^'`]*'|"[^"`]*")`"#).unwrap());
static BACKTICK_BOOL: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(?:True|False)`").unwrap());
static SCALAR_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?P<word>integer|int|boolean|bool|float|string|str)\b").unwrap()
});
static ONE_OF_BRACES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bone\s+of\s*`?\{(?P<items>[^}]*)\}").unwrap());
static SLASH_ALTERNATIVES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:an?\s+)?(?P<alts>[A-Za-z_]+(?:/[A-Za-z_]+)+)\b").unwrap()
});
static LEADING_NOUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:an?\s+|the\s+)?(?P<noun>[A-Za-z_]+)\b").unwrap());
static DTYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"`(?P<dtype>u?int(?:8|16|32|64)?|float(?:16|32|64)?|bool_?)`").unwrap()
});
static BOOL_HINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^whether\b|\bwhether\s+(?:to|or\s+not)\b|\bif\s+true\b").unwrap()
});
static INT_HINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bfrequency\b|\bnumber\s+of\b|\bin\s+epochs\b|\bif\s+set\s+to\s+0\b").unwrap()
});
static STR_HINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bpath\b|\bdirectory\b|\bfilename\b|\bfile\s+name\b|\burl\b").unwrap()
});

/// Rules in evaluation order
pub fn default_rules() -> Vec<InferenceRule> {
    vec![
        InferenceRule::new("optional_none", optional_none),
        InferenceRule::new("literal_with_scalars", literal_with_scalars),
        InferenceRule::new("literal_set", literal_set),
        InferenceRule::new("slash_alternatives", slash_alternatives),
        InferenceRule::new("leading_noun", leading_noun),
        InferenceRule::new("dtype_mention", dtype_mention),
        InferenceRule::new("keyword_hints", keyword_hints),
        InferenceRule::new("name_hints", name_hints),
    ]
}

/// `Int or None`, `String, defaults to None`
fn optional_none(phrase: &Phrase) -> Option<String> {
    OR_NONE
        .captures(&phrase.text)
        .or_else(|| DEFAULTS_TO_NONE.captures(&phrase.text))
        .and_then(|c| c.name("noun"))
        .and_then(|noun| canonical_type(noun.as_str()))
        .map(|typ| format!("Optional[{typ}]"))
}

/// Text up to the first sentence break outside backticks
fn first_sentence(text: &str) -> &str {
    let mut in_code = false;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '`' => in_code = !in_code,
            '.' if !in_code => {
                let ends = chars
                    .peek()
                    .map_or(true, |(_, next)| next.is_whitespace() || next.is_uppercase());
                if ends {
                    return &text[..i];
                }
            }
            _ => {}
        }
    }
    text
}

fn backtick_literals(sentence: &str) -> Vec<&str> {
    BACKTICK_LITERAL
        .captures_iter(sentence)
        .filter_map(|c| c.name("lit"))
        .map(|m| m.as_str())
        .collect()
}

/// Scalar type nouns outside code spans, plus backticked `True`/`False`, in
/// order of appearance
fn scalar_mentions(sentence: &str) -> Vec<&'static str> {
    let mut found: Vec<(usize, &'static str)> = BACKTICK_BOOL
        .find_iter(sentence)
        .map(|m| (m.start(), "bool"))
        .collect();

    let mut prose = String::with_capacity(sentence.len());
    let mut in_code = false;
    for c in sentence.chars() {
        if c == '`' {
            in_code = !in_code;
        }
        if in_code || c == '`' {
            // Same byte width keeps offsets comparable with `sentence`
            prose.extend(std::iter::repeat(' ').take(c.len_utf8()));
        } else {
            prose.push(c);
        }
    }
    found.extend(
        SCALAR_WORD
            .captures_iter(&prose)
            .filter_map(|c| c.name("word"))
            .filter_map(|m| scalar_type(m.as_str()).map(|typ| (m.start(), typ))),
    );
    found.sort_by_key(|(pos, _)| *pos);

    let mut types: Vec<&'static str> = Vec::new();
    for (_, typ) in found {
        if !types.contains(&typ) {
            types.push(typ);
        }
    }
    types
}

/// ``"`'epoch'`, integer, or boolean"`` → `Union[Literal['epoch'], int, bool]`
fn literal_with_scalars(phrase: &Phrase) -> Option<String> {
    let sentence = first_sentence(&phrase.text);
    let literals = backtick_literals(sentence);
    let scalars = scalar_mentions(sentence);
    if literals.is_empty() || scalars.is_empty() {
        return None;
    }
    Some(format!(
        "Union[Literal[{}], {}]",
        literals.join(", "),
        scalars.join(", ")
    ))
}

fn is_quoted(item: &str) -> bool {
    let bytes = item.as_bytes();
    bytes.len() >= 2
        && bytes[0] == bytes[bytes.len() - 1]
        && (bytes[0] == b'\'' || bytes[0] == b'"')
}

/// `One of {'a', 'b'}` or several backticked quoted alternatives
fn literal_set(phrase: &Phrase) -> Option<String> {
    if let Some(items) = ONE_OF_BRACES
        .captures(&phrase.text)
        .and_then(|c| c.name("items"))
    {
        let items: Vec<&str> = items.as_str().split(',').map(str::trim).collect();
        if !items.is_empty() && items.iter().all(|item| is_quoted(item)) {
            return Some(format!("Literal[{}]", items.join(", ")));
        }
    }

    let literals = backtick_literals(first_sentence(&phrase.text));
    (literals.len() >= 2).then(|| format!("Literal[{}]", literals.join(", ")))
}

/// `A list/tuple` → `Union[list,tuple]`
fn slash_alternatives(phrase: &Phrase) -> Option<String> {
    let alts = SLASH_ALTERNATIVES.captures(&phrase.text)?.name("alts")?;
    let types: Option<Vec<&str>> = alts.as_str().split('/').map(canonical_type).collect();
    types.map(|types| format!("Union[{}]", types.join(",")))
}

/// `String.`, `Integer, ...`, `A boolean ...`
fn leading_noun(phrase: &Phrase) -> Option<String> {
    let noun = LEADING_NOUN.captures(&phrase.text)?.name("noun")?;
    canonical_type(noun.as_str()).map(str::to_string)
}

/// ``Explicit `int64`-castable`` → `int`
fn dtype_mention(phrase: &Phrase) -> Option<String> {
    let dtype = DTYPE.captures(&phrase.text)?.name("dtype")?;
    dtype_type(dtype.as_str()).map(str::to_string)
}

fn keyword_hints(phrase: &Phrase) -> Option<String> {
    [(&BOOL_HINT, "bool"), (&INT_HINT, "int"), (&STR_HINT, "str")]
        .into_iter()
        .find(|(pattern, _)| pattern.is_match(&phrase.text))
        .map(|(_, typ)| typ.to_string())
}

fn name_hints(phrase: &Phrase) -> Option<String> {
    let name = phrase.name.to_ascii_lowercase();
    if name.is_empty() {
        return None;
    }
    let starts = |prefixes: &[&str]| prefixes.iter().any(|p| name.starts_with(p));
    let ends = |suffixes: &[&str]| suffixes.iter().any(|s| name.ends_with(s));

    let typ = if starts(&["is_", "has_", "use_", "enable_", "should_"])
        || matches!(name.as_str(), "verbose" | "debug")
    {
        "bool"
    } else if starts(&["num_", "n_"])
        || ends(&["_count", "_size", "_steps", "_epochs", "_freq", "_frequency"])
    {
        "int"
    } else if ends(&["_dir", "_path", "_file", "_filename", "_url", "_name"])
        || matches!(name.as_str(), "path" | "directory" | "filename" | "url" | "name")
    {
        "str"
    } else if ends(&["_rate", "_ratio", "_prob", "_probability"]) {
        "float"
    } else {
        return None;
    };
    Some(typ.to_string())
}
