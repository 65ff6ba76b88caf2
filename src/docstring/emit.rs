//! reStructuredText docstring emission

use super::defaults::{append_default, has_default_phrase};
use crate::core::errors::{DoctransError, Result};
use crate::core::ir::{IntermediateRepr, ParamVal, RETURN_KEY};
use crate::core::values::DocstringFormat;

const INDENT: &str = "    ";

/// Field keyword used for parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldWord {
    /// `:param x:` for callables
    #[default]
    Param,
    /// `:cvar x:` for class attributes
    Cvar,
}

impl FieldWord {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Param => "param",
            Self::Cvar => "cvar",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocstringEmitOptions {
    pub format: DocstringFormat,
    /// Append `Defaults to X` to descriptions that do not state their default
    pub emit_default_doc: bool,
    /// Emit `:type`/`:rtype:` lines (types are not carried inline)
    pub emit_types: bool,
    pub word: FieldWord,
    /// Blank line between parameter groups
    pub emit_separating_tab: bool,
}

impl Default for DocstringEmitOptions {
    fn default() -> Self {
        Self {
            format: DocstringFormat::Rest,
            emit_default_doc: true,
            emit_types: true,
            word: FieldWord::Param,
            emit_separating_tab: true,
        }
    }
}

/// Render the description, parameters and returns of `ir` as a reST docstring
pub fn emit_docstring(ir: &IntermediateRepr, options: &DocstringEmitOptions) -> Result<String> {
    if options.format != DocstringFormat::Rest {
        return Err(DoctransError::UnsupportedDialect(options.format));
    }

    let mut groups: Vec<Vec<String>> = ir
        .params
        .iter()
        .filter_map(|(name, param)| param_group(name, param, options))
        .collect();
    if let Some(returns) = &ir.returns {
        groups.extend(returns_group(returns, options));
    }

    let separator = options.emit_separating_tab && options.emit_types;
    let mut lines: Vec<String> = Vec::new();
    if let Some(doc) = ir.doc.as_deref().filter(|d| !d.trim().is_empty()) {
        lines.extend(doc.trim().lines().map(str::to_string));
        if !groups.is_empty() {
            lines.push(String::new());
        }
    }
    for (i, group) in groups.into_iter().enumerate() {
        if i > 0 && separator {
            lines.push(String::new());
        }
        lines.extend(group);
    }
    Ok(lines.join("\n"))
}

/// Description with its default stated, when requested and not already there
pub fn doc_with_default(param: &ParamVal, emit_default_doc: bool) -> Option<String> {
    let doc = param.doc.as_deref().filter(|d| !d.trim().is_empty());
    match (&param.default, doc) {
        (Some(default), doc) if emit_default_doc && !doc.is_some_and(has_default_phrase) => {
            Some(append_default(doc, default))
        }
        (_, doc) => doc.map(str::to_string),
    }
}

fn param_group(name: &str, param: &ParamVal, options: &DocstringEmitOptions) -> Option<Vec<String>> {
    field_group(
        &format!(":{} {name}:", options.word.as_str()),
        &format!(":type {name}:"),
        param,
        options,
    )
}

fn returns_group(returns: &ParamVal, options: &DocstringEmitOptions) -> Option<Vec<String>> {
    match options.word {
        FieldWord::Param => field_group(":return:", ":rtype:", returns, options),
        FieldWord::Cvar => field_group(
            &format!(":cvar {RETURN_KEY}:"),
            &format!(":type {RETURN_KEY}:"),
            returns,
            options,
        ),
    }
}

fn field_group(
    head: &str,
    type_head: &str,
    param: &ParamVal,
    options: &DocstringEmitOptions,
) -> Option<Vec<String>> {
    let doc = doc_with_default(param, options.emit_default_doc);
    let type_line = param
        .typ
        .as_deref()
        .filter(|_| options.emit_types)
        .map(|typ| format!("{type_head} ```{typ}```"));
    if doc.is_none() && type_line.is_none() {
        return None;
    }

    let mut lines = vec![match doc {
        Some(doc) => format!("{head} {doc}"),
        None => head.to_string(),
    }];
    lines.extend(type_line);
    Some(lines)
}

/// Docstring text laid out for embedding in a body at `indent_level`.
///
/// Content lines are indented one step deeper than the enclosing construct;
/// with `emit_separating_tab` the closing quotes get their own line.
pub fn indent_docstring(text: &str, indent_level: usize, emit_separating_tab: bool) -> String {
    let prefix = INDENT.repeat(indent_level + 1);
    let mut out = String::new();
    for line in text.lines() {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(&prefix);
            out.push_str(line);
        }
    }
    if emit_separating_tab {
        out.push('\n');
        out.push_str(&prefix);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::values::DefaultValue;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn sample() -> IntermediateRepr {
        IntermediateRepr::named("f")
            .with_doc("Summary")
            .with_param(
                "a",
                ParamVal::new()
                    .with_typ("int")
                    .with_doc("first")
                    .with_default(DefaultValue::Int(5)),
            )
            .with_param("b", ParamVal::new().with_typ("Optional[str]"))
            .with_returns(ParamVal::new().with_typ("bool").with_doc("ok"))
    }

    #[test]
    fn test_emit_with_types() {
        let text = emit_docstring(&sample(), &DocstringEmitOptions::default()).unwrap();
        assert_eq!(
            text,
            indoc! {"
                Summary

                :param a: first, defaults to 5
                :type a: ```int```

                :param b:
                :type b: ```Optional[str]```

                :return: ok
                :rtype: ```bool```"}
        );
    }

    #[test]
    fn test_emit_inline_types_cvar() {
        let options = DocstringEmitOptions {
            emit_types: false,
            emit_default_doc: false,
            word: FieldWord::Cvar,
            ..DocstringEmitOptions::default()
        };
        let text = emit_docstring(&sample(), &options).unwrap();
        assert_eq!(text, "Summary\n\n:cvar a: first\n:cvar return_type: ok");
    }

    #[test]
    fn test_emit_rejects_other_dialects() {
        for format in [DocstringFormat::Google, DocstringFormat::Numpy] {
            let options = DocstringEmitOptions {
                format,
                ..DocstringEmitOptions::default()
            };
            assert_eq!(
                emit_docstring(&sample(), &options),
                Err(DoctransError::UnsupportedDialect(format))
            );
        }
    }

    #[test]
    fn test_indent_docstring() {
        assert_eq!(
            indent_docstring("Summary\n\n:param a: x", 0, true),
            "\n    Summary\n\n    :param a: x\n    "
        );
        assert_eq!(indent_docstring("Summary", 1, false), "\n        Summary");
    }
}
