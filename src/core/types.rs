//! Helpers over serialized Python type expressions (`Optional[int]`, `Literal['a', 'b']`).
//!
//! Types travel through the IR as strings; these helpers look inside them
//! without building a full type AST.

/// Split `text` on `sep` at bracket depth zero, ignoring separators in quotes.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' => quote = Some(c),
                '[' | '(' | '{' => depth += 1,
                ']' | ')' | '}' => depth -= 1,
                _ if c == sep && depth == 0 => {
                    parts.push(text[start..i].trim());
                    start = i + c.len_utf8();
                }
                _ => {}
            },
        }
    }
    let last = text[start..].trim();
    if !last.is_empty() || !parts.is_empty() {
        parts.push(last);
    }
    parts
}

/// If `typ` is `Name[...]` for one of `names` (optionally `typing.`-qualified),
/// return the bracketed contents.
pub fn unwrap_generic<'a>(typ: &'a str, names: &[&str]) -> Option<&'a str> {
    let typ = typ.trim();
    let open = typ.find('[')?;
    let head = typ[..open].trim();
    let head = head.strip_prefix("typing.").unwrap_or(head);
    if !names.contains(&head) || !typ.ends_with(']') {
        return None;
    }
    let inner = &typ[open + 1..typ.len() - 1];
    // `Optional[int] | Foo[str]` must not be read as one generic
    let mut depth = 0;
    for c in inner.chars() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            _ => {}
        }
    }
    Some(inner.trim())
}

/// Bracketed arguments of a generic, split at the top level.
pub fn generic_args<'a>(typ: &'a str, names: &[&str]) -> Option<Vec<&'a str>> {
    unwrap_generic(typ, names).map(|inner| split_top_level(inner, ','))
}

/// `Optional[X]` → `X`
pub fn strip_optional(typ: &str) -> Option<&str> {
    unwrap_generic(typ, &["Optional"])
}

/// Wrap in `Optional[...]` unless already optional
pub fn make_optional(typ: &str) -> String {
    if strip_optional(typ).is_some() {
        typ.to_string()
    } else {
        format!("Optional[{typ}]")
    }
}

/// Identifier or dotted path (`str`, `np.ndarray`)
pub fn is_simple_name(typ: &str) -> bool {
    !typ.is_empty()
        && typ.split('.').all(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}
