//! IR to an argument-parser setup function

use super::{docstring_stmt, EmitOptions};
use crate::core::errors::Result;
use crate::core::ir::{IntermediateRepr, ParamVal};
use crate::core::types::{is_simple_name, split_top_level, strip_optional, unwrap_generic};
use crate::core::values::DefaultValue;
use crate::docstring::{doc_with_default, has_default_phrase, FieldWord};
use crate::parse::argparse::DEFAULT_PARSER_NAME;
use crate::syntax::{Arg, Arguments, Constant, Expr, FunctionDef, Keyword, Stmt};
use tracing::debug;

pub const DEFAULT_FUNCTION_NAME: &str = "set_cli_args";

fn parser() -> Expr {
    Expr::name(DEFAULT_PARSER_NAME)
}

/// `type=` value for a Python type, `None` when argparse's default (`str`)
/// applies or the type is not a callable name
fn type_keyword(typ: &str) -> Option<Expr> {
    match typ {
        "str" => None,
        "dict" => Some(Expr::name("loads")),
        t if is_simple_name(t) => Some(Expr::name(t)),
        t => {
            debug!(typ = t, "No argparse type for compound type");
            None
        }
    }
}

/// `(choices, element type)` of a `Literal[...]`
fn choices_of(inner: &str) -> (Expr, Option<Expr>) {
    let values = split_top_level(inner, ',');
    let all_strings = values
        .iter()
        .all(|v| v.starts_with('\'') || v.starts_with('"'));
    let all_ints = values.iter().all(|v| v.parse::<i64>().is_ok());
    let typ = match (all_strings, all_ints) {
        (true, _) => None,
        (_, true) => Some(Expr::name("int")),
        _ => None,
    };
    (
        Expr::Tuple(values.iter().map(|v| Expr::Raw(v.to_string())).collect()),
        typ,
    )
}

fn add_argument(name: &str, param: &ParamVal, options: &EmitOptions) -> Stmt {
    let mut keywords = Vec::new();
    let help = doc_with_default(param, options.emit_default_doc);
    let typ = param.typ.as_deref();

    let flag = match (typ, &param.default) {
        (Some("bool"), Some(DefaultValue::Bool(false))) => Some("store_true"),
        (Some("bool"), Some(DefaultValue::Bool(true))) => Some("store_false"),
        _ => None,
    };

    if let Some(action) = flag {
        keywords.push(Keyword::new("action", Expr::str(action)));
        keywords.extend(help.map(|h| Keyword::new("help", Expr::str(h))));
    } else {
        let (inner, required) = match typ {
            Some(t) => match strip_optional(t) {
                Some(inner) => (Some(inner), false),
                None => (Some(t), true),
            },
            None => (None, false),
        };

        let mut action = None;
        let mut choices = None;
        let mut type_kw = None;
        if let Some(inner) = inner {
            let element = match unwrap_generic(inner, &["List", "list"]) {
                Some(element) => {
                    action = Some("append");
                    element
                }
                None => inner,
            };
            match unwrap_generic(element, &["Literal"]) {
                Some(values) => {
                    let (tuple, typ) = choices_of(values);
                    choices = Some(tuple);
                    type_kw = typ;
                }
                None => type_kw = type_keyword(element),
            }
        }

        keywords.extend(type_kw.map(|t| Keyword::new("type", t)));
        keywords.extend(choices.map(|c| Keyword::new("choices", c)));
        keywords.extend(action.map(|a| Keyword::new("action", Expr::str(a))));
        keywords.extend(help.as_deref().map(|h| Keyword::new("help", Expr::str(h))));
        if required {
            keywords.push(Keyword::new("required", Expr::Constant(Constant::Bool(true))));
        }
        let doc_states_default = param.doc.as_deref().is_some_and(has_default_phrase);
        if let Some(default) = &param.default {
            if options.emit_default_doc || !doc_states_default {
                keywords.push(Keyword::new("default", default.to_expr()));
            }
        }
    }

    Stmt::Expr(Expr::call(
        Expr::attr(parser(), "add_argument"),
        vec![Expr::str(format!("--{name}"))],
        keywords,
    ))
}

/// Docstring IR of the setup function itself
fn setup_docstring_ir(ir: &IntermediateRepr) -> IntermediateRepr {
    let mut doc_ir = IntermediateRepr::new().with_doc("Set CLI arguments").with_param(
        DEFAULT_PARSER_NAME,
        ParamVal::new()
            .with_typ("ArgumentParser")
            .with_doc("argument parser"),
    );
    doc_ir.returns = ir.returns.as_ref().map(|returns| ParamVal {
        typ: returns
            .typ
            .as_ref()
            .map(|t| format!("Tuple[ArgumentParser, {t}]")),
        doc: Some(match &returns.doc {
            Some(doc) => format!("{DEFAULT_PARSER_NAME}, {doc}"),
            None => DEFAULT_PARSER_NAME.to_string(),
        }),
        default: None,
    });
    doc_ir
}

/// Emit `def set_cli_args(argument_parser): ...` configuring one argument per
/// parameter
pub fn argparse_function(ir: &IntermediateRepr, options: &EmitOptions) -> Result<Stmt> {
    let name = options
        .function_name
        .clone()
        .unwrap_or_else(|| DEFAULT_FUNCTION_NAME.to_string());
    debug!(name = %name, params = ir.params.len(), "Emitting argument parser function");

    let mut body = Vec::new();
    if !ir.params.is_empty() || ir.returns.is_some() {
        let docstring_options = EmitOptions {
            inline_types: false,
            emit_default_doc: false,
            ..options.clone()
        }
        .docstring_options(FieldWord::Param);
        body.extend(docstring_stmt(
            &setup_docstring_ir(ir),
            &docstring_options,
            options.indent_level,
        )?);
    }

    body.push(Stmt::Assign {
        target: Expr::attr(parser(), "description"),
        value: Expr::str(ir.doc.as_deref().unwrap_or_default()),
    });
    body.extend(
        ir.params
            .iter()
            .map(|(name, param)| add_argument(name, param, options)),
    );
    body.extend(ir.body.iter().cloned());

    if let Some(returns) = &ir.returns {
        body.push(Stmt::Return(Some(match &returns.default {
            Some(default) => Expr::Tuple(vec![parser(), default.to_expr()]),
            None => parser(),
        })));
    }

    Ok(Stmt::FunctionDef(FunctionDef {
        name,
        args: Arguments {
            args: vec![Arg::new(DEFAULT_PARSER_NAME)],
            ..Arguments::default()
        },
        body,
        ..FunctionDef::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::to_source;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_ir() {
        let stmt = argparse_function(&IntermediateRepr::new(), &EmitOptions::default()).unwrap();
        assert_eq!(
            to_source(&stmt).trim_end(),
            "def set_cli_args(argument_parser):\n    argument_parser.description = ''"
        );
    }

    #[test]
    fn test_arguments() {
        let ir = IntermediateRepr::new()
            .with_doc("Acquire")
            .with_param(
                "dataset_name",
                ParamVal::new()
                    .with_typ("str")
                    .with_doc("name of dataset")
                    .with_default(DefaultValue::Str("mnist".into())),
            )
            .with_param(
                "K",
                ParamVal::new()
                    .with_typ("Literal['np', 'tf']")
                    .with_default(DefaultValue::Str("np".into())),
            )
            .with_param("as_numpy", ParamVal::new().with_typ("Optional[bool]"))
            .with_param("kwargs", ParamVal::new().with_typ("Optional[dict]"))
            .with_param(
                "verbose",
                ParamVal::new().with_typ("bool").with_default(DefaultValue::Bool(false)),
            )
            .with_param("layers", ParamVal::new().with_typ("List[int]"));
        let options = EmitOptions {
            emit_default_doc: false,
            ..EmitOptions::default()
        };
        let source = to_source(&argparse_function(&ir, &options).unwrap());
        assert_eq!(
            source,
            indoc! {r#"
                def set_cli_args(argument_parser):
                    """
                    Set CLI arguments

                    :param argument_parser: argument parser
                    :type argument_parser: ```ArgumentParser```
                    """
                    argument_parser.description = 'Acquire'
                    argument_parser.add_argument('--dataset_name', help='name of dataset', required=True, default='mnist')
                    argument_parser.add_argument('--K', choices=('np', 'tf'), required=True, default='np')
                    argument_parser.add_argument('--as_numpy', type=bool)
                    argument_parser.add_argument('--kwargs', type=loads)
                    argument_parser.add_argument('--verbose', action='store_true')
                    argument_parser.add_argument('--layers', type=int, action='append', required=True)
            "#}
        );
    }

    #[test]
    fn test_returns_default() {
        let ir = IntermediateRepr::new().with_returns(
            ParamVal::new()
                .with_typ("int")
                .with_doc("answer")
                .with_default(DefaultValue::Int(42)),
        );
        let source = to_source(&argparse_function(&ir, &EmitOptions::default()).unwrap());
        assert!(source.contains(":return: argument_parser, answer"));
        assert!(source.contains(":rtype: ```Tuple[ArgumentParser, int]```"));
        assert!(source.trim_end().ends_with("return argument_parser, 42"));
    }
}
