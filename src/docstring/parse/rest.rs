//! reStructuredText field lists (`:param x:`, `:type x:`, `:return:`, `:rtype:`)

use super::{cleandoc, RawField, RawFields};
use crate::core::ir::IntermediateRepr;
use once_cell::sync::Lazy;
use regex::Regex;

static FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^:(?P<kind>[A-Za-z_]+)(?:\s+(?P<arg>[^:]*?))?\s*:(?:\s+(?P<rest>.*))?$").unwrap()
});

enum Target {
    Param(String),
    ParamType(String),
    Returns,
    ReturnType,
    Ignored,
}

fn classify(kind: &str, arg: Option<&str>) -> Target {
    match (kind, arg) {
        (
            "param" | "parameter" | "arg" | "argument" | "key" | "keyword" | "cvar" | "ivar"
            | "var",
            Some(arg),
        ) => {
            // `:param int x:` carries the type before the name
            let mut words = arg.split_whitespace();
            match (words.next(), words.next()) {
                (Some(_), Some(name)) => Target::Param(name.to_string()),
                (Some(name), None) => Target::Param(name.to_string()),
                _ => Target::Ignored,
            }
        }
        ("type" | "vartype", Some(arg)) => Target::ParamType(arg.trim().to_string()),
        ("return" | "returns", None) => Target::Returns,
        ("rtype", None) => Target::ReturnType,
        _ => Target::Ignored,
    }
}

fn inline_type(arg: Option<&str>) -> Option<String> {
    let mut words = arg?.split_whitespace();
    match (words.next(), words.next()) {
        (Some(typ), Some(_)) => Some(typ.to_string()),
        _ => None,
    }
}

/// Where continuation lines of the current field go
enum Sink {
    Doc(String),
    Type(String),
    ReturnsDoc,
    ReturnsType,
    Nowhere,
}

pub fn parse(text: &str) -> (IntermediateRepr, bool) {
    let lines = cleandoc(text);
    let mut description = Vec::new();
    let mut fields = RawFields::default();
    let mut sink: Option<Sink> = None;

    for line in &lines {
        let trimmed = line.trim();
        let Some(captures) = FIELD.captures(trimmed) else {
            match &sink {
                None => description.push(line.clone()),
                Some(_) if trimmed.is_empty() => {}
                Some(target) => append(&mut fields, target, trimmed),
            }
            continue;
        };

        let kind = captures.name("kind").map_or("", |m| m.as_str());
        let arg = captures.name("arg").map(|m| m.as_str()).filter(|a| !a.is_empty());
        let rest = captures.name("rest").map_or("", |m| m.as_str()).trim();

        let target = match classify(kind, arg) {
            Target::Param(name) => {
                let field = fields.param(&name);
                if let Some(typ) = inline_type(arg) {
                    field.typ.get_or_insert(typ);
                }
                Sink::Doc(name)
            }
            Target::ParamType(name) => Sink::Type(name),
            Target::Returns => Sink::ReturnsDoc,
            Target::ReturnType => Sink::ReturnsType,
            Target::Ignored => Sink::Nowhere,
        };
        touch(&mut fields, &target);
        if !rest.is_empty() {
            append(&mut fields, &target, rest);
        }
        sink = Some(target);
    }

    while description.last().is_some_and(|l: &String| l.trim().is_empty()) {
        description.pop();
    }
    fields.into_ir(&description)
}

/// Register a field even when it carries no text
fn touch(fields: &mut RawFields, target: &Sink) {
    match target {
        Sink::Doc(name) | Sink::Type(name) => {
            fields.param(name);
        }
        Sink::ReturnsDoc | Sink::ReturnsType => {
            fields.returns();
        }
        Sink::Nowhere => {}
    }
}

fn append(fields: &mut RawFields, target: &Sink, text: &str) {
    let push_type = |field: &mut RawField| {
        let typ = field.typ.get_or_insert_with(String::new);
        if !typ.is_empty() {
            typ.push(' ');
        }
        typ.push_str(text);
    };
    match target {
        Sink::Doc(name) => fields.param(name).doc.push(text.to_string()),
        Sink::Type(name) => push_type(fields.param(name)),
        Sink::ReturnsDoc => fields.returns().doc.push(text.to_string()),
        Sink::ReturnsType => push_type(fields.returns()),
        Sink::Nowhere => {}
    }
}
