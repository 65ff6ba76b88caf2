//! Function definitions to IR

use super::{documented_ir, ParseOptions};
use crate::core::errors::Result;
use crate::core::ir::{Header, IntermediateRepr, ParamVal};
use crate::core::values::{DefaultValue, FunctionKind};
use crate::infer;
use crate::reconcile;
use crate::syntax::{body_without_docstring, expr_to_source, Arg, FunctionDef, Stmt};
use tracing::debug;

/// How the function binds its first argument, from decorators then the
/// first parameter name
pub fn function_kind(def: &FunctionDef) -> FunctionKind {
    for decorator in &def.decorators {
        match decorator.dotted_name().as_deref() {
            Some("staticmethod") => return FunctionKind::Static,
            Some("classmethod") => return FunctionKind::ClassMethod,
            _ => {}
        }
    }
    match def.args.positional().next().map(|arg| arg.name.as_str()) {
        Some("self") => FunctionKind::SelfMethod,
        Some("cls") => FunctionKind::ClassMethod,
        _ => FunctionKind::Static,
    }
}

fn arg_to_param(arg: &Arg) -> ParamVal {
    ParamVal {
        typ: arg.annotation.as_ref().map(expr_to_source),
        doc: None,
        default: arg.default.as_ref().map(DefaultValue::from_expr),
    }
}

/// Parse a function: signature, `-> T`, docstring, final `return <expr>` and
/// the remaining body statements
pub fn function(def: &FunctionDef, options: &ParseOptions) -> Result<IntermediateRepr> {
    debug!(name = %def.name, "Parsing function");
    let kind = function_kind(def);

    let mut structural = IntermediateRepr {
        name: (!def.name.is_empty()).then(|| def.name.clone()),
        kind: Some(kind),
        header: Header::function(def.decorators.clone(), def.is_async),
        ..IntermediateRepr::default()
    };

    let skip_first = usize::from(kind.first_arg().is_some_and(|first| {
        def.args.positional().next().is_some_and(|arg| arg.name == first)
    }));
    for arg in def
        .args
        .positional()
        .skip(skip_first)
        .chain(def.args.kwonlyargs.iter())
    {
        structural.params.insert(arg.name.clone(), arg_to_param(arg));
    }
    for star in [&def.args.vararg, &def.args.kwarg].into_iter().flatten() {
        debug!(name = %star.name, "Dropping variadic parameter");
    }

    // the printer restores `pass` for an empty body
    let mut body: Vec<Stmt> = body_without_docstring(&def.body)
        .iter()
        .filter(|stmt| !matches!(stmt, Stmt::Pass))
        .cloned()
        .collect();
    let returned = match body.last() {
        Some(Stmt::Return(Some(value))) => Some(DefaultValue::from_expr(value)),
        _ => None,
    };
    if returned.is_some() {
        body.pop();
    }
    structural.body = body;

    if def.returns.is_some() || returned.is_some() {
        structural.returns = Some(ParamVal {
            typ: def.returns.as_ref().map(expr_to_source),
            doc: None,
            default: returned,
        });
    }

    let mut ir = match documented_ir(&def.body, options) {
        Some((documented, _)) => reconcile::merge(structural, documented),
        None => structural,
    };
    if options.infer_type {
        infer::fill_missing_types(&mut ir);
    }
    Ok(ir)
}
