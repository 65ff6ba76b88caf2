//! NumPy style `Parameters` / `Returns` sections.
//!
//! Other underlined sections are skipped (`Raises`) or kept as prose.

use super::{cleandoc, indent_of, RawFields};
use crate::core::ir::IntermediateRepr;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Params,
    Returns,
    Skipped,
    Prose,
}

fn section_kind(title: &str) -> Section {
    match title {
        "Parameters" | "Other Parameters" | "Attributes" => Section::Params,
        "Returns" | "Yields" => Section::Returns,
        "Raises" | "Warns" => Section::Skipped,
        _ => Section::Prose,
    }
}

fn is_underline(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3 && trimmed.chars().all(|c| c == '-')
}

pub fn parse(text: &str) -> (IntermediateRepr, bool) {
    let lines = cleandoc(text);
    let mut description = Vec::new();
    let mut fields = RawFields::default();
    let mut section = Section::Prose;
    let mut current: Option<String> = None;
    let mut in_returns_entry = false;

    let mut i = 0;
    while i < lines.len() {
        let line = &lines[i];
        let trimmed = line.trim();

        if lines.get(i + 1).is_some_and(|next| is_underline(next)) && !trimmed.is_empty() {
            section = section_kind(trimmed);
            current = None;
            in_returns_entry = false;
            if section == Section::Prose {
                description.push(line.clone());
                description.push(lines[i + 1].clone());
            }
            i += 2;
            continue;
        }
        i += 1;

        match section {
            Section::Prose => description.push(line.clone()),
            Section::Skipped => {}
            _ if trimmed.is_empty() => {}
            Section::Params if indent_of(line) == 0 => {
                let (name, typ) = match trimmed.split_once(':') {
                    Some((name, typ)) => (name.trim(), Some(typ.trim())),
                    None => (trimmed, None),
                };
                if name.starts_with('*') {
                    current = None;
                    continue;
                }
                let field = fields.param(name);
                field.typ = typ.filter(|t| !t.is_empty()).map(str::to_string);
                current = Some(name.to_string());
            }
            Section::Params => {
                if let Some(name) = &current {
                    fields.param(name).doc.push(trimmed.to_string());
                }
            }
            Section::Returns if indent_of(line) == 0 => {
                // `name : type` or a bare `type`
                let typ = trimmed
                    .split_once(':')
                    .map_or(trimmed, |(_, typ)| typ)
                    .trim();
                let returns = fields.returns();
                if returns.typ.is_none() {
                    returns.typ = Some(typ.to_string());
                }
                in_returns_entry = true;
            }
            Section::Returns => {
                if in_returns_entry {
                    fields.returns().doc.push(trimmed.to_string());
                }
            }
        }
    }

    while description.last().is_some_and(|l: &String| l.trim().is_empty()) {
        description.pop();
    }
    fields.into_ir(&description)
}
