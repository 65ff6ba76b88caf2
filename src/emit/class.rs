//! IR to a class with typed class-level fields

use super::{docstring_stmt, EmitOptions};
use crate::core::errors::Result;
use crate::core::ir::{Header, IntermediateRepr, ParamVal, RETURN_KEY};
use crate::docstring::FieldWord;
use crate::syntax::{Arg, Arguments, ClassDef, Expr, FunctionDef, Stmt};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_CLASS_NAME: &str = "ConfigClass";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassOptions {
    /// Overrides the name taken from the IR
    pub class_name: Option<String>,
    pub bases: Vec<String>,
    /// Add a `__call__` method assigning every field
    pub emit_call: bool,
}

impl Default for ClassOptions {
    fn default() -> Self {
        Self {
            class_name: None,
            bases: vec!["object".to_string()],
            emit_call: false,
        }
    }
}

/// Declaration for one field; `None` for a field only the docstring can
/// carry (no type, no default)
fn field(name: &str, param: &ParamVal, inline_types: bool) -> Option<Stmt> {
    let target = Expr::name(name);
    let value = param.default.as_ref().map(|d| d.to_expr());
    // an annotation is the only way to declare a field without a value
    let annotation = param
        .typ
        .as_deref()
        .filter(|_| inline_types || value.is_none());
    match (annotation, value) {
        (Some(typ), value) => Some(Stmt::AnnAssign {
            target,
            annotation: Expr::Raw(typ.to_string()),
            value,
        }),
        (None, Some(value)) => Some(Stmt::Assign { target, value }),
        (None, None) => None,
    }
}

fn call_method(ir: &IntermediateRepr) -> Stmt {
    let mut body: Vec<Stmt> = ir
        .params
        .keys()
        .map(|name| Stmt::Assign {
            target: Expr::attr(Expr::name("self"), name),
            value: Expr::name(name),
        })
        .collect();
    body.extend(ir.body.iter().cloned());

    let mut args = vec![Arg::new("self")];
    args.extend(ir.params.keys().map(Arg::new));
    Stmt::FunctionDef(FunctionDef {
        name: "__call__".to_string(),
        args: Arguments {
            args,
            ..Arguments::default()
        },
        body,
        ..FunctionDef::default()
    })
}

/// Emit a class whose docstring documents each field with `:cvar`
pub fn class_(
    ir: &IntermediateRepr,
    options: &EmitOptions,
    class_options: &ClassOptions,
) -> Result<Stmt> {
    let name = class_options
        .class_name
        .clone()
        .or_else(|| ir.name.clone())
        .unwrap_or_else(|| DEFAULT_CLASS_NAME.to_string());
    debug!(name = %name, params = ir.params.len(), "Emitting class");

    let mut body = Vec::new();
    body.extend(docstring_stmt(
        ir,
        &options.docstring_options(FieldWord::Cvar),
        options.indent_level,
    )?);
    body.extend(
        ir.params
            .iter()
            .filter_map(|(name, param)| field(name, param, options.inline_types)),
    );
    if let Some(returns) = &ir.returns {
        body.extend(field(RETURN_KEY, returns, options.inline_types));
    }

    if class_options.emit_call {
        body.push(call_method(ir));
    } else if !ir.body.is_empty() {
        debug!(
            statements = ir.body.len(),
            "Dropping body statements without a __call__ method"
        );
    }

    let (decorators, bases, keywords) = match &ir.header {
        Header::Class {
            decorators,
            bases,
            keywords,
        } => (decorators.clone(), bases.clone(), keywords.clone()),
        _ => (Vec::new(), Vec::new(), Vec::new()),
    };
    let bases = if bases.is_empty() {
        class_options.bases.iter().map(Expr::name).collect()
    } else {
        bases
    };

    Ok(Stmt::ClassDef(ClassDef {
        name,
        decorators,
        bases,
        keywords,
        body,
    }))
}
