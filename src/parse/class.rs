//! Classes with typed class-level fields to IR

use super::{documented_ir, function::function, ParseOptions};
use crate::core::errors::{DoctransError, Result};
use crate::core::ir::{Header, IntermediateRepr, ParamVal, RETURN_KEY};
use crate::core::values::DefaultValue;
use crate::infer;
use crate::reconcile;
use crate::syntax::{expr_to_source, ClassDef, Expr, Stmt};
use tracing::debug;

fn is_dunder(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

/// `(name, param)` for a class-level field declaration
fn field(stmt: &Stmt) -> Option<(&str, ParamVal)> {
    let (target, annotation, value) = match stmt {
        Stmt::AnnAssign {
            target,
            annotation,
            value,
        } => (target, Some(annotation), value.as_ref()),
        Stmt::Assign { target, value } => (target, None, Some(value)),
        _ => return None,
    };
    let Expr::Name(name) = target else {
        return None;
    };
    if is_dunder(name) {
        return None;
    }
    Some((
        name.as_str(),
        ParamVal {
            typ: annotation.map(expr_to_source),
            doc: None,
            default: value.map(DefaultValue::from_expr),
        },
    ))
}

fn structural_ir(class: &ClassDef) -> IntermediateRepr {
    let mut ir = IntermediateRepr {
        header: Header::class(
            class.decorators.clone(),
            class.bases.clone(),
            class.keywords.clone(),
        ),
        ..IntermediateRepr::named(class.name.clone())
    };
    for (name, param) in class.body.iter().filter_map(field) {
        if name == RETURN_KEY {
            ir.returns = Some(param);
        } else {
            ir.params.insert(name, param);
        }
    }
    ir
}

/// Parse a class: fields in declaration order, `return_type` as returns,
/// descriptions from the class docstring
pub fn class_(class: &ClassDef, options: &ParseOptions) -> Result<IntermediateRepr> {
    debug!(name = %class.name, "Parsing class");
    let structural = structural_ir(class);
    let mut ir = match documented_ir(&class.body, options) {
        Some((documented, _)) => reconcile::merge(structural, documented),
        None => structural,
    };
    if options.infer_type {
        infer::fill_missing_types(&mut ir);
    }
    Ok(ir)
}

/// Parse a class and merge in the method `method_name`, which contributes
/// the returns and documents the parameters it shares with the class
pub fn class_with_method(
    class: &ClassDef,
    method_name: &str,
    options: &ParseOptions,
) -> Result<IntermediateRepr> {
    let method = class
        .body
        .iter()
        .filter_map(Stmt::as_function)
        .find(|def| def.name == method_name)
        .ok_or_else(|| {
            DoctransError::unsupported(format!(
                "class `{}` has no method `{method_name}`",
                class.name
            ))
        })?;

    let class_ir = class_(class, &ParseOptions {
        infer_type: false,
        ..options.clone()
    })?;
    let method_ir = function(method, &ParseOptions {
        infer_type: false,
        ..options.clone()
    })?;

    let mut ir = reconcile::merge(class_ir, method_ir);
    ir.body = Vec::new();
    if options.infer_type {
        infer::fill_missing_types(&mut ir);
    }
    Ok(ir)
}
