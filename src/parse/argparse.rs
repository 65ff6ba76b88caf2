//! Argument-parser setup functions to IR
//!
//! ```python
//! def set_cli_args(argument_parser):
//!     argument_parser.description = 'Acquire from the official model zoo'
//!     argument_parser.add_argument('--dataset_name', required=True, default='mnist')
//!     return argument_parser
//! ```

use super::ParseOptions;
use crate::core::errors::{DoctransError, Result};
use crate::core::ir::{IntermediateRepr, ParamMap, ParamVal};
use crate::core::types::{make_optional, unwrap_generic};
use crate::core::values::DefaultValue;
use crate::docstring::{self, extract_default};
use crate::infer;
use crate::reconcile::merge_param;
use crate::syntax::{expr_to_source, quote_str, Call, Constant, Expr, FunctionDef, Stmt};
use tracing::{debug, warn};

/// Name of the parser argument when the function declares none
pub const DEFAULT_PARSER_NAME: &str = "argument_parser";

/// Statement shapes recognized in a parser setup body
#[derive(Debug)]
enum ArgparseStmt<'a> {
    Docstring(&'a str),
    Description(&'a Expr),
    AddArgument(&'a Call),
    Return(Option<&'a Expr>),
    Pass,
    Other(&'a Stmt),
}

impl ArgparseStmt<'_> {
    fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

fn is_parser(expr: &Expr, parser: &str) -> bool {
    matches!(expr, Expr::Name(id) if id == parser)
}

fn classify<'a>(index: usize, stmt: &'a Stmt, parser: &str) -> ArgparseStmt<'a> {
    match stmt {
        Stmt::Expr(Expr::Constant(Constant::Str(text))) if index == 0 => {
            ArgparseStmt::Docstring(text)
        }
        Stmt::Assign {
            target: Expr::Attribute { value, attr },
            value: description,
        } if attr == "description" && is_parser(value, parser) => {
            ArgparseStmt::Description(description)
        }
        Stmt::Expr(Expr::Call(call)) => match call.func.as_ref() {
            Expr::Attribute { value, attr } if attr == "add_argument" && is_parser(value, parser) => {
                ArgparseStmt::AddArgument(call)
            }
            _ => ArgparseStmt::Other(stmt),
        },
        Stmt::Return(value) => ArgparseStmt::Return(value.as_ref()),
        Stmt::Pass => ArgparseStmt::Pass,
        _ => ArgparseStmt::Other(stmt),
    }
}

/// Parameter name from the option strings: the first `--long` form, else the
/// first given; `dest=` overrides
fn argument_name(call: &Call) -> Option<String> {
    if let Some(dest) = call.keyword("dest").and_then(Expr::as_str) {
        return Some(dest.to_string());
    }
    let flags: Vec<&str> = call.args.iter().filter_map(Expr::as_str).collect();
    let flag = flags
        .iter()
        .find(|flag| flag.starts_with("--"))
        .or_else(|| flags.first())?;
    let name = flag.trim_start_matches('-').replace('-', "_");
    (!name.is_empty()).then_some(name)
}

fn type_name(expr: &Expr) -> String {
    match expr.dotted_name().as_deref() {
        Some("loads" | "json.loads") => "dict".to_string(),
        Some(name) => name.to_string(),
        None => expr_to_source(expr),
    }
}

fn literal_of(choices: &Expr) -> String {
    let items = match choices {
        Expr::Tuple(items) | Expr::List(items) => items.as_slice(),
        other => std::slice::from_ref(other),
    };
    let values: Vec<String> = items
        .iter()
        .map(|item| match item {
            Expr::Constant(Constant::Str(s)) => quote_str(s),
            other => expr_to_source(other),
        })
        .collect();
    format!("Literal[{}]", values.join(", "))
}

fn is_true(expr: Option<&Expr>) -> bool {
    matches!(expr, Some(Expr::Constant(Constant::Bool(true))))
}

/// One `add_argument(...)` call as `(name, param)`
fn add_argument_to_param(call: &Call) -> Result<(String, ParamVal)> {
    let name = argument_name(call).ok_or_else(|| {
        DoctransError::unsupported(format!(
            "add_argument without an option name: `{}`",
            expr_to_source(&Expr::Call(call.clone()))
        ))
    })?;

    for keyword in &call.keywords {
        match keyword.arg.as_deref() {
            Some(
                "type" | "choices" | "action" | "nargs" | "help" | "required" | "default"
                | "dest",
            ) => {}
            other => warn!(
                argument = %name,
                keyword = other.unwrap_or("**"),
                "Ignoring unrecognized add_argument keyword"
            ),
        }
    }

    let action = call.keyword("action").and_then(Expr::as_str);
    let (doc, help_default) = match call.keyword("help").and_then(Expr::as_str) {
        Some(help) => extract_default(help),
        None => (None, None),
    };
    let mut default = call
        .keyword("default")
        .map(DefaultValue::from_expr)
        .or(help_default);

    let mut typ = match action {
        Some("store_true") => {
            default.get_or_insert(DefaultValue::Bool(false));
            "bool".to_string()
        }
        Some("store_false") => {
            default.get_or_insert(DefaultValue::Bool(true));
            "bool".to_string()
        }
        _ => call
            .keyword("choices")
            .map(literal_of)
            .or_else(|| call.keyword("type").map(type_name))
            .unwrap_or_else(|| "str".to_string()),
    };

    let repeated = action == Some("append")
        || matches!(call.keyword("nargs").and_then(Expr::as_str), Some("*" | "+"));
    if repeated {
        typ = format!("List[{typ}]");
    }

    let store_flag = matches!(action, Some("store_true" | "store_false"));
    if !store_flag && !is_true(call.keyword("required")) {
        typ = make_optional(&typ);
    }

    Ok((
        name,
        ParamVal {
            typ: Some(typ),
            doc,
            default,
        },
    ))
}

/// Returns doc and type from the setup docstring, without the parser itself
fn strip_parser_returns(returns: &mut ParamVal, parser: &str) {
    if let Some(doc) = returns.doc.take() {
        let trimmed = doc
            .strip_prefix(parser)
            .and_then(|rest| rest.strip_prefix(','))
            .map(str::trim)
            .unwrap_or(doc.trim());
        returns.doc = (!trimmed.is_empty() && trimmed != parser).then(|| trimmed.to_string());
    }
    if let Some(typ) = returns.typ.take() {
        let unwrapped = unwrap_generic(&typ, &["Tuple", "tuple"]).map(|inner| {
            inner
                .split_once(',')
                .filter(|(head, _)| head.trim().ends_with("ArgumentParser"))
                .map(|(_, rest)| rest.trim().to_string())
        });
        returns.typ = match unwrapped {
            Some(rest) => rest,
            None if typ.ends_with("ArgumentParser") => None,
            None => Some(typ),
        };
    }
}

/// Fold `:param` docs of the setup function into the matching arguments
fn merge_documented_params(ir: &mut IntermediateRepr, documented: ParamMap, parser: &str) {
    for (name, doc_param) in documented {
        if name == parser {
            continue;
        }
        match ir.params.get_mut(&name) {
            Some(param) => *param = merge_param(std::mem::take(param), doc_param),
            None => debug!(param = %name, "Documented param has no add_argument call"),
        }
    }
}

/// Parse a function that configures a command-line argument parser
pub fn argparse_function(def: &FunctionDef, options: &ParseOptions) -> Result<IntermediateRepr> {
    debug!(name = %def.name, "Parsing argument parser function");
    let parser = def
        .args
        .positional()
        .next()
        .map_or(DEFAULT_PARSER_NAME, |arg| arg.name.as_str());

    let mut ir = IntermediateRepr {
        name: (!def.name.is_empty()).then(|| def.name.clone()),
        ..IntermediateRepr::default()
    };

    let statements: Vec<ArgparseStmt> = def
        .body
        .iter()
        .enumerate()
        .map(|(index, stmt)| classify(index, stmt, parser))
        .collect();
    if statements.iter().all(|s| matches!(s, ArgparseStmt::Pass)) {
        return Ok(ir);
    }
    if !statements.iter().any(ArgparseStmt::is_recognized) {
        return Err(DoctransError::unsupported(format!(
            "`{}` does not configure `{parser}`",
            def.name
        )));
    }

    let mut doc_text = None;
    let mut description = None;
    let mut returned = None;
    for statement in statements {
        match statement {
            ArgparseStmt::Docstring(text) => doc_text = Some(text),
            ArgparseStmt::Pass => {}
            ArgparseStmt::Description(expr) => {
                description = Some(match expr.as_str() {
                    Some(text) => text.trim().to_string(),
                    None => expr_to_source(expr),
                });
            }
            ArgparseStmt::AddArgument(call) => {
                let (name, param) = add_argument_to_param(call)?;
                ir.params.insert(name, param);
            }
            ArgparseStmt::Return(value) => {
                returned = match value {
                    Some(Expr::Tuple(items))
                        if items.len() == 2 && is_parser(&items[0], parser) =>
                    {
                        Some(DefaultValue::from_expr(&items[1]))
                    }
                    Some(Expr::Tuple(items)) if items.first().is_some_and(|e| is_parser(e, parser)) => {
                        Some(DefaultValue::from_expr(&Expr::Tuple(items[1..].to_vec())))
                    }
                    _ => None,
                };
            }
            ArgparseStmt::Other(stmt) => ir.body.push(stmt.clone()),
        }
    }

    let mut documented =
        doc_text.map(|text| docstring::parse_docstring(text, options.docstring_format));
    if let Some(documented) = documented.as_mut() {
        merge_documented_params(&mut ir, std::mem::take(&mut documented.params), parser);
    }
    let mut doc_returns = documented.as_ref().and_then(|d| d.returns.clone());
    if let Some(returns) = doc_returns.as_mut() {
        strip_parser_returns(returns, parser);
    }

    ir.doc = description
        .filter(|d| !d.is_empty())
        .or_else(|| documented.and_then(|d| d.doc));
    if returned.is_some() {
        let mut returns = doc_returns.unwrap_or_default();
        returns.default = returned;
        ir.returns = Some(returns);
    } else {
        ir.returns = doc_returns.filter(|r| !r.is_empty());
    }

    if options.infer_type {
        infer::fill_missing_types(&mut ir);
    }
    Ok(ir)
}
