//! Google style sections (`Args:`, `Returns:`, `Raises:`)

use super::{cleandoc, indent_of, RawFields};
use crate::core::ir::IntermediateRepr;
use crate::core::types::is_simple_name;
use once_cell::sync::Lazy;
use regex::Regex;

static SECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<title>[A-Z][A-Za-z ]*?)\s*:\s*$").unwrap());

static ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>\*{0,2}[A-Za-z_][A-Za-z0-9_]*)\s*(?:\((?P<typ>.+?)\))?\s*:(?:\s+(?P<doc>.*))?$")
        .unwrap()
});

static RETURN_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<typ>[^:\s][^:]*?)\s*:(?:\s+(?P<doc>.*))?$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Params,
    Returns,
    Raises,
}

fn section_kind(title: &str) -> Option<Section> {
    match title {
        "Args" | "Arguments" | "Parameters" | "Params" | "Attributes" | "Keyword Args"
        | "Keyword Arguments" | "Other Parameters" => Some(Section::Params),
        "Returns" | "Return" | "Yields" => Some(Section::Returns),
        "Raises" => Some(Section::Raises),
        _ => None,
    }
}

pub fn parse(text: &str) -> (IntermediateRepr, bool) {
    let lines = cleandoc(text);
    let mut description = Vec::new();
    let mut fields = RawFields::default();
    let mut section: Option<Section> = None;
    let mut entry_indent: Option<usize> = None;
    let mut current: Option<String> = None;

    for line in &lines {
        let trimmed = line.trim();
        let indent = indent_of(line);

        if indent == 0 && !trimmed.is_empty() {
            let title = SECTION
                .captures(trimmed)
                .and_then(|c| c.name("title"))
                .and_then(|t| section_kind(t.as_str()));
            section = title;
            entry_indent = None;
            current = None;
            if section.is_none() {
                description.push(line.clone());
            }
            continue;
        }

        let Some(kind) = section else {
            description.push(line.clone());
            continue;
        };
        if trimmed.is_empty() {
            continue;
        }

        let base = *entry_indent.get_or_insert(indent);
        let starts_entry = indent <= base;
        match kind {
            Section::Params if starts_entry => {
                current = None;
                let Some(captures) = ENTRY.captures(trimmed) else {
                    continue;
                };
                let name = captures.name("name").map_or("", |m| m.as_str());
                if name.starts_with('*') {
                    continue;
                }
                let field = fields.param(name);
                if let Some(typ) = captures.name("typ") {
                    field.typ = Some(typ.as_str().to_string());
                }
                if let Some(doc) = captures.name("doc") {
                    field.doc.push(doc.as_str().trim().to_string());
                }
                current = Some(name.to_string());
            }
            Section::Params => {
                if let Some(name) = &current {
                    fields.param(name).doc.push(trimmed.to_string());
                }
            }
            Section::Returns => {
                let returns = fields.returns();
                let first = starts_entry && returns.doc.is_empty() && returns.typ.is_none();
                let typed = RETURN_ENTRY
                    .captures(trimmed)
                    .filter(|c| c.name("typ").is_some_and(|t| looks_like_type(t.as_str())));
                match typed {
                    Some(captures) if first => {
                        returns.typ = captures.name("typ").map(|t| t.as_str().to_string());
                        if let Some(doc) = captures.name("doc") {
                            returns.doc.push(doc.as_str().trim().to_string());
                        }
                    }
                    _ => returns.doc.push(trimmed.to_string()),
                }
            }
            Section::Raises => {}
        }
    }

    while description.last().is_some_and(|l: &String| l.trim().is_empty()) {
        description.pop();
    }
    fields.into_ir(&description)
}

fn looks_like_type(text: &str) -> bool {
    match text.split_once('[') {
        Some((head, _)) => is_simple_name(head) && text.ends_with(']'),
        None => is_simple_name(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ir::ParamVal;
    use crate::core::values::DefaultValue;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_args_and_returns() {
        let (ir, returns_found) = parse(indoc! {"
            Summary line

            Args:
                dataset_name (str): name of dataset. Defaults to mnist.
                tfds_dir (str, optional): directory to look for models in
                    across lines
                untyped: no type here

            Returns:
                bool: whether it worked

            Raises:
                ValueError: on failure
        "});
        assert!(returns_found);
        assert_eq!(ir.doc.as_deref(), Some("Summary line"));
        assert_eq!(
            ir.params.keys().collect::<Vec<_>>(),
            vec!["dataset_name", "tfds_dir", "untyped"]
        );
        assert_eq!(
            ir.params.get("dataset_name"),
            Some(
                &ParamVal::new()
                    .with_typ("str")
                    .with_doc("name of dataset.")
                    .with_default(DefaultValue::Str("mnist".into()))
            )
        );
        assert_eq!(
            ir.params.get("tfds_dir"),
            Some(
                &ParamVal::new()
                    .with_typ("Optional[str]")
                    .with_doc("directory to look for models in\nacross lines")
            )
        );
        assert_eq!(
            ir.returns,
            Some(ParamVal::new().with_typ("bool").with_doc("whether it worked"))
        );
    }

    #[test]
    fn test_returns_without_type() {
        let (ir, _) = parse("Summary\n\nReturns:\n    The thing that was built.\n");
        assert_eq!(
            ir.returns,
            Some(ParamVal::new().with_doc("The thing that was built."))
        );
    }

    #[test]
    fn test_unknown_section_stays_in_description() {
        let (ir, returns_found) = parse("Summary\n\nExample:\n    run()\n");
        assert!(!returns_found);
        assert_eq!(ir.doc.as_deref(), Some("Summary\n\nExample:\n    run()"));
    }
}
