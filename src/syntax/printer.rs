//! Render the syntax model back to Python source

use super::ast::{Arg, Arguments, Call, ClassDef, Constant, Expr, FunctionDef, Keyword, Stmt};

const INDENT: &str = "    ";

/// Source text of a statement, newline-terminated
pub fn to_source(stmt: &Stmt) -> String {
    to_source_at(stmt, 0)
}

/// Source text of a statement indented `level` steps
pub fn to_source_at(stmt: &Stmt, level: usize) -> String {
    let mut out = String::new();
    write_stmt(&mut out, stmt, level);
    out
}

/// Source text of a whole module; top-level definitions are separated by two blank lines
pub fn module_to_source(stmts: &[Stmt]) -> String {
    let mut out = String::new();
    for (i, stmt) in stmts.iter().enumerate() {
        if i > 0 && is_definition(stmt) {
            out.push_str("\n\n");
        }
        write_stmt(&mut out, stmt, 0);
    }
    out
}

fn is_definition(stmt: &Stmt) -> bool {
    matches!(stmt, Stmt::FunctionDef(_) | Stmt::ClassDef(_))
}

fn push_line(out: &mut String, level: usize, line: &str) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
    out.push_str(line);
    out.push('\n');
}

fn write_stmt(out: &mut String, stmt: &Stmt, level: usize) {
    match stmt {
        Stmt::Expr(Expr::Constant(Constant::Str(text))) => {
            push_line(out, level, &docstring_literal(text));
        }
        Stmt::Expr(expr) => push_line(out, level, &expr_to_source(expr)),
        Stmt::Assign { target, value } => push_line(
            out,
            level,
            &format!("{} = {}", expr_to_source(target), expr_to_source(value)),
        ),
        Stmt::AnnAssign {
            target,
            annotation,
            value,
        } => {
            let mut line = format!("{}: {}", expr_to_source(target), expr_to_source(annotation));
            if let Some(value) = value {
                line.push_str(" = ");
                line.push_str(&expr_to_source(value));
            }
            push_line(out, level, &line);
        }
        Stmt::Return(None) => push_line(out, level, "return"),
        Stmt::Return(Some(Expr::Tuple(elts))) if !elts.is_empty() => {
            let values: Vec<_> = elts.iter().map(expr_to_source).collect();
            push_line(out, level, &format!("return {}", values.join(", ")));
        }
        Stmt::Return(Some(value)) => {
            push_line(out, level, &format!("return {}", expr_to_source(value)))
        }
        Stmt::Pass => push_line(out, level, "pass"),
        Stmt::Raw(text) => {
            for line in text.lines() {
                if line.trim().is_empty() {
                    out.push('\n');
                } else {
                    push_line(out, level, line);
                }
            }
        }
        Stmt::FunctionDef(def) => write_function(out, def, level),
        Stmt::ClassDef(def) => write_class(out, def, level),
    }
}

fn write_decorators(out: &mut String, decorators: &[Expr], level: usize) {
    for decorator in decorators {
        push_line(out, level, &format!("@{}", expr_to_source(decorator)));
    }
}

fn write_function(out: &mut String, def: &FunctionDef, level: usize) {
    write_decorators(out, &def.decorators, level);
    let mut header = String::new();
    if def.is_async {
        header.push_str("async ");
    }
    header.push_str(&format!("def {}({})", def.name, arguments_to_source(&def.args)));
    if let Some(returns) = &def.returns {
        header.push_str(" -> ");
        header.push_str(&expr_to_source(returns));
    }
    header.push(':');
    push_line(out, level, &header);
    write_body(out, &def.body, level + 1);
}

fn write_class(out: &mut String, def: &ClassDef, level: usize) {
    write_decorators(out, &def.decorators, level);
    let mut parts: Vec<String> = def.bases.iter().map(expr_to_source).collect();
    parts.extend(def.keywords.iter().map(keyword_to_source));
    let header = if parts.is_empty() {
        format!("class {}:", def.name)
    } else {
        format!("class {}({}):", def.name, parts.join(", "))
    };
    push_line(out, level, &header);
    write_body(out, &def.body, level + 1);
}

fn write_body(out: &mut String, body: &[Stmt], level: usize) {
    if body.is_empty() {
        push_line(out, level, "pass");
        return;
    }
    for (i, stmt) in body.iter().enumerate() {
        if i > 0 && is_definition(stmt) {
            out.push('\n');
        }
        write_stmt(out, stmt, level);
    }
}

/// Parameter list without the surrounding parentheses
pub fn arguments_to_source(args: &Arguments) -> String {
    let mut parts: Vec<String> = args.posonlyargs.iter().map(arg_to_source).collect();
    if !parts.is_empty() {
        parts.push("/".to_string());
    }
    parts.extend(args.args.iter().map(arg_to_source));
    match &args.vararg {
        Some(vararg) => parts.push(format!("*{}", arg_to_source(vararg))),
        None if !args.kwonlyargs.is_empty() => parts.push("*".to_string()),
        None => {}
    }
    parts.extend(args.kwonlyargs.iter().map(arg_to_source));
    if let Some(kwarg) = &args.kwarg {
        parts.push(format!("**{}", arg_to_source(kwarg)));
    }
    parts.join(", ")
}

fn arg_to_source(arg: &Arg) -> String {
    match (&arg.annotation, &arg.default) {
        (Some(annotation), Some(default)) => format!(
            "{}: {} = {}",
            arg.name,
            expr_to_source(annotation),
            expr_to_source(default)
        ),
        (Some(annotation), None) => format!("{}: {}", arg.name, expr_to_source(annotation)),
        (None, Some(default)) => format!("{}={}", arg.name, expr_to_source(default)),
        (None, None) => arg.name.clone(),
    }
}

fn keyword_to_source(keyword: &Keyword) -> String {
    match &keyword.arg {
        Some(arg) => format!("{arg}={}", expr_to_source(&keyword.value)),
        None => format!("**{}", expr_to_source(&keyword.value)),
    }
}

/// Source text of an expression
pub fn expr_to_source(expr: &Expr) -> String {
    match expr {
        Expr::Name(id) => id.clone(),
        Expr::Constant(constant) => constant_to_source(constant),
        Expr::Attribute { value, attr } => format!("{}.{attr}", expr_to_source(value)),
        Expr::Call(call) => call_to_source(call),
        Expr::Tuple(elts) => match elts.as_slice() {
            [single] => format!("({},)", expr_to_source(single)),
            _ => format!("({})", join_exprs(elts)),
        },
        Expr::List(elts) => format!("[{}]", join_exprs(elts)),
        Expr::Raw(text) => text.clone(),
    }
}

fn join_exprs(exprs: &[Expr]) -> String {
    exprs.iter().map(expr_to_source).collect::<Vec<_>>().join(", ")
}

fn call_to_source(call: &Call) -> String {
    let mut parts: Vec<String> = call.args.iter().map(expr_to_source).collect();
    parts.extend(call.keywords.iter().map(keyword_to_source));
    format!("{}({})", expr_to_source(&call.func), parts.join(", "))
}

fn constant_to_source(constant: &Constant) -> String {
    match constant {
        Constant::None => "None".to_string(),
        Constant::Bool(true) => "True".to_string(),
        Constant::Bool(false) => "False".to_string(),
        Constant::Str(s) => quote_str(s),
        Constant::Number(n) => n.clone(),
    }
}

/// Python `repr` of a string: single quotes unless the text contains one
pub fn quote_str(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn docstring_literal(text: &str) -> String {
    let mut escaped = text.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"");
    if escaped.ends_with('"') {
        escaped.pop();
        escaped.push_str("\\\"");
    }
    format!("\"\"\"{escaped}\"\"\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::{parse_expression, parse_module};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quote_str() {
        assert_eq!(quote_str("np"), "'np'");
        assert_eq!(quote_str("it's"), "\"it's\"");
        assert_eq!(quote_str("a\nb"), "'a\\nb'");
        assert_eq!(quote_str("both ' and \""), "'both \\' and \"'");
    }

    #[test]
    fn test_expr_round_trip() {
        for source in [
            "Column('id', Integer, primary_key=True)",
            "np.empty(0)",
            "(np.empty(0), np.empty(0))",
            "[1, 2]",
            "(x,)",
            "Optional[List[str]]",
        ] {
            assert_eq!(expr_to_source(&parse_expression(source).unwrap()), source);
        }
    }

    #[test]
    fn test_function_round_trip() {
        let source = indoc! {r#"
            @staticmethod
            def f(a, b: int = 5, *, c='x', **kwargs) -> bool:
                """Doc"""
                x = 1
                return a, b
        "#};
        let stmts = parse_module(source).unwrap();
        assert_eq!(module_to_source(&stmts), source);
    }

    #[test]
    fn test_class_with_nested_method() {
        let source = indoc! {r#"
            class A(object):
                """Doc"""
                x: int = 5

                def __call__(self):
                    self.x = x
        "#};
        let stmts = parse_module(source).unwrap();
        assert_eq!(module_to_source(&stmts), source);
    }

    #[test]
    fn test_raw_statement_is_reindented() {
        let source = indoc! {"
            def f():
                if x:
                    y = 1
        "};
        let stmts = parse_module(source).unwrap();
        assert_eq!(module_to_source(&stmts), source);
    }

    #[test]
    fn test_docstring_escaping() {
        assert_eq!(docstring_literal("a\\b"), r#""""a\\b""""#);
        assert_eq!(docstring_literal("say \"hi\""), r#""""say "hi\"""""#);
    }
}
