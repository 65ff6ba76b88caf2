//! IR to a function definition

use super::{docstring_stmt, EmitOptions};
use crate::core::errors::Result;
use crate::core::ir::{Header, IntermediateRepr, ParamVal};
use crate::core::values::FunctionKind;
use crate::docstring::FieldWord;
use crate::syntax::{Arg, Arguments, Expr, FunctionDef, Stmt};
use tracing::{debug, warn};

pub const DEFAULT_FUNCTION_NAME: &str = "function";

fn to_arg(name: &str, param: &ParamVal, inline_types: bool) -> Arg {
    Arg {
        name: name.to_string(),
        annotation: param
            .typ
            .as_ref()
            .filter(|_| inline_types)
            .map(|typ| Expr::Raw(typ.clone())),
        default: param.default.as_ref().map(|d| d.to_expr()),
    }
}

/// Positional parameters unless asked for keyword-only ones, or unless a
/// parameter without a default follows one with a default
fn arguments(ir: &IntermediateRepr, kind: FunctionKind, options: &EmitOptions) -> Arguments {
    let params: Vec<Arg> = ir
        .params
        .iter()
        .map(|(name, param)| to_arg(name, param, options.inline_types))
        .collect();

    let first_default = params.iter().position(|arg| arg.default.is_some());
    let misordered = first_default.is_some_and(|start| {
        params[start..].iter().any(|arg| arg.default.is_none())
    });
    let split = if options.emit_as_kwonlyargs {
        0
    } else if misordered {
        warn!(
            name = ?ir.name,
            "Parameter without default follows one with a default; emitting keyword-only parameters"
        );
        first_default.unwrap_or(0)
    } else {
        params.len()
    };

    let mut args: Vec<Arg> = kind.first_arg().map(Arg::new).into_iter().collect();
    let mut params = params;
    let kwonlyargs = params.split_off(split);
    args.extend(params);
    Arguments {
        args,
        kwonlyargs,
        ..Arguments::default()
    }
}

/// Decorators and async-ness of a parsed function; a `staticmethod` or
/// `classmethod` decorator only survives when it matches `kind`
fn header(ir: &IntermediateRepr, kind: FunctionKind) -> (Vec<Expr>, bool) {
    let Header::Function {
        decorators,
        is_async,
    } = &ir.header
    else {
        return (Vec::new(), false);
    };
    let decorators = decorators
        .iter()
        .filter(|decorator| match decorator.dotted_name().as_deref() {
            Some("staticmethod") => kind == FunctionKind::Static,
            Some("classmethod") => kind == FunctionKind::ClassMethod,
            _ => true,
        })
        .cloned()
        .collect();
    (decorators, *is_async)
}

/// Emit a function whose docstring, signature and final `return` carry the IR
pub fn function(ir: &IntermediateRepr, options: &EmitOptions) -> Result<Stmt> {
    let name = options
        .function_name
        .clone()
        .or_else(|| ir.name.clone())
        .unwrap_or_else(|| DEFAULT_FUNCTION_NAME.to_string());
    let kind = options
        .function_type
        .or(ir.kind)
        .unwrap_or(FunctionKind::Static);
    debug!(name = %name, kind = %kind, "Emitting function");

    let mut body = Vec::new();
    body.extend(docstring_stmt(
        ir,
        &options.docstring_options(FieldWord::Param),
        options.indent_level,
    )?);
    body.extend(ir.body.iter().cloned());
    if let Some(default) = ir.returns.as_ref().and_then(|r| r.default.as_ref()) {
        body.push(Stmt::Return(Some(default.to_expr())));
    }

    let (decorators, is_async) = header(ir, kind);
    Ok(Stmt::FunctionDef(FunctionDef {
        name,
        decorators,
        is_async,
        args: arguments(ir, kind, options),
        returns: ir
            .returns
            .as_ref()
            .and_then(|r| r.typ.as_ref())
            .filter(|_| options.inline_types)
            .map(|typ| Expr::Raw(typ.clone())),
        body,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::values::DefaultValue;
    use crate::syntax::{parse_statement, to_source};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_method_with_returns() {
        let ir = IntermediateRepr::named("method_name")
            .with_doc("Do the thing")
            .with_param(
                "dataset_name",
                ParamVal::new()
                    .with_typ("str")
                    .with_doc("name of dataset")
                    .with_default(DefaultValue::Str("mnist".into())),
            )
            .with_returns(
                ParamVal::new()
                    .with_typ("bool")
                    .with_doc("success")
                    .with_default(DefaultValue::Bool(true)),
            );
        let options = EmitOptions {
            function_type: Some(FunctionKind::SelfMethod),
            ..EmitOptions::default()
        };
        assert_eq!(
            to_source(&function(&ir, &options).unwrap()),
            indoc! {r#"
                def method_name(self, dataset_name: str = 'mnist') -> bool:
                    """
                    Do the thing

                    :param dataset_name: name of dataset, defaults to mnist
                    :return: success, defaults to True
                    """
                    return True
            "#}
        );
    }

    #[test]
    fn test_decorators_survive_function_round_trip() {
        let Stmt::FunctionDef(def) = parse_statement(indoc! {"
            @app.route('/x')
            @staticmethod
            async def handler(a: int = 1):
                pass
        "})
        .unwrap() else {
            panic!("expected function");
        };
        let ir = crate::parse::function(&def, &crate::parse::ParseOptions::default()).unwrap();
        let options = EmitOptions {
            emit_default_doc: false,
            ..EmitOptions::default()
        };
        assert_eq!(
            to_source(&function(&ir, &options).unwrap()),
            "@app.route('/x')\n@staticmethod\nasync def handler(a: int = 1):\n    pass\n"
        );

        let as_method = EmitOptions {
            function_type: Some(FunctionKind::SelfMethod),
            ..options
        };
        assert_eq!(
            to_source(&function(&ir, &as_method).unwrap()),
            "@app.route('/x')\nasync def handler(self, a: int = 1):\n    pass\n"
        );
    }

    #[test]
    fn test_misordered_defaults_become_keyword_only() {
        let ir = IntermediateRepr::named("f")
            .with_param("a", ParamVal::new().with_default(DefaultValue::Int(1)))
            .with_param("b", ParamVal::new().with_typ("int"));
        let options = EmitOptions {
            emit_default_doc: false,
            ..EmitOptions::default()
        };
        assert_eq!(
            to_source(&function(&ir, &options).unwrap()),
            "def f(*, a=1, b: int):\n    pass\n"
        );
    }

    #[test]
    fn test_kwonly_option_and_docstring_types() {
        let ir = IntermediateRepr::named("f").with_param("a", ParamVal::new().with_typ("int"));
        let options = EmitOptions {
            emit_as_kwonlyargs: true,
            inline_types: false,
            ..EmitOptions::default()
        };
        assert_eq!(
            to_source(&function(&ir, &options).unwrap()),
            indoc! {r#"
                def f(*, a):
                    """
                    :param a:
                    :type a: ```int```
                    """
            "#}
        );
    }
}
