//! Dialect parsers producing an [`IntermediateRepr`] from documentation text

pub mod google;
pub mod numpy;
pub mod rest;

use super::defaults::extract_default;
use crate::core::ir::{IntermediateRepr, ParamVal, RETURN_KEY};
use crate::core::types::make_optional;

/// Raw field text collected by a dialect parser before defaults are split out
#[derive(Debug, Default)]
pub(crate) struct RawField {
    pub doc: Vec<String>,
    pub typ: Option<String>,
}

impl RawField {
    fn into_param(self) -> ParamVal {
        let text = self.doc.join("\n");
        let (doc, default) = extract_default(&text);
        ParamVal {
            typ: self.typ.map(|t| clean_type(&t)).filter(|t| !t.is_empty()),
            doc,
            default,
        }
    }
}

/// Fields in first-seen order plus the returns field
#[derive(Debug, Default)]
pub(crate) struct RawFields {
    params: Vec<(String, RawField)>,
    returns: Option<RawField>,
}

impl RawFields {
    pub fn param(&mut self, name: &str) -> &mut RawField {
        if name == RETURN_KEY {
            return self.returns();
        }
        let i = match self.params.iter().position(|(n, _)| n == name) {
            Some(i) => i,
            None => {
                self.params.push((name.to_string(), RawField::default()));
                self.params.len() - 1
            }
        };
        &mut self.params[i].1
    }

    pub fn returns(&mut self) -> &mut RawField {
        self.returns.get_or_insert_with(RawField::default)
    }

    pub fn into_ir(self, description: &[String]) -> (IntermediateRepr, bool) {
        let returns_found = self.returns.is_some();
        let mut ir = IntermediateRepr {
            doc: join_description(description),
            ..IntermediateRepr::default()
        };
        for (name, field) in self.params {
            ir.params.insert(name, field.into_param());
        }
        ir.returns = self.returns.map(RawField::into_param);
        ir.prune_empty_returns();
        (ir, returns_found)
    }
}

/// `inspect.cleandoc`-style normalization: strip the first line, dedent the
/// rest, drop leading and trailing blank lines
pub fn cleandoc(text: &str) -> Vec<String> {
    let expanded = text.replace('\t', "    ");
    let mut lines = expanded.lines();
    let first = lines.next().unwrap_or_default().trim().to_string();
    let rest: Vec<&str> = lines.collect();
    let margin = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out = vec![first];
    out.extend(
        rest.iter()
            .map(|line| line.get(margin..).unwrap_or("").trim_end().to_string()),
    );
    while out.first().is_some_and(|l| l.is_empty()) {
        out.remove(0);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out
}

/// Indentation width of a line
pub(crate) fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn join_description(lines: &[String]) -> Option<String> {
    let text = lines.join("\n");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Strip code fences and fold a trailing `, optional` into `Optional[...]`
pub(crate) fn clean_type(typ: &str) -> String {
    let typ = strip_fences(typ.trim());
    match typ.strip_suffix(", optional").or_else(|| typ.strip_suffix(",optional")) {
        Some(inner) => make_optional(strip_fences(inner.trim())),
        None => typ.to_string(),
    }
}

fn strip_fences(text: &str) -> &str {
    text.strip_prefix("```")
        .and_then(|t| t.strip_suffix("```"))
        .or_else(|| text.strip_prefix('`').and_then(|t| t.strip_suffix('`')))
        .unwrap_or(text)
        .trim()
}
