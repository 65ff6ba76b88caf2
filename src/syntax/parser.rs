//! Tree-sitter lowering of Python source into the owned syntax model

use super::ast::{Arg, Arguments, Call, ClassDef, Constant, Expr, FunctionDef, Keyword, Stmt};
use crate::core::errors::{DoctransError, Result};
use tree_sitter::{Node, Parser, Tree};

/// Parse a Python module into statements
pub fn parse_module(source: &str) -> Result<Vec<Stmt>> {
    let source = dedent(source);
    let tree = parse_tree(&source)?;
    let lowerer = Lowerer { source: &source };
    Ok(lowerer.block(tree.root_node()))
}

/// Parse the first statement of `source`
pub fn parse_statement(source: &str) -> Result<Stmt> {
    parse_module(source)?
        .into_iter()
        .find(|stmt| !is_comment(stmt))
        .ok_or_else(|| DoctransError::syntax(1, 1, "expected a statement"))
}

/// Parse a single expression such as `Column('id', Integer)`
pub fn parse_expression(source: &str) -> Result<Expr> {
    match parse_statement(source)? {
        Stmt::Expr(expr) => Ok(expr),
        _ => Err(DoctransError::syntax(1, 1, "expected an expression")),
    }
}

fn is_comment(stmt: &Stmt) -> bool {
    matches!(stmt, Stmt::Raw(text) if text.starts_with('#'))
}

fn parse_tree(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| DoctransError::syntax(1, 1, format!("failed to load Python grammar: {e}")))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| DoctransError::syntax(1, 1, "parser produced no tree"))?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(first_error(root, source));
    }
    Ok(tree)
}

fn first_error(root: Node<'_>, source: &str) -> DoctransError {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let message = if node.is_missing() {
                format!("missing `{}`", node.kind())
            } else {
                let text = node_text(&node, source);
                let snippet: String = text.chars().take(20).collect();
                format!("unexpected `{}`", snippet.trim())
            };
            return DoctransError::syntax(node_line(&node), node_column(&node), message);
        }
        // Depth-first, leftmost child first
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).filter(|c| c.has_error()).collect();
        stack.extend(children.into_iter().rev());
    }
    DoctransError::syntax(node_line(&root), node_column(&root), "invalid syntax")
}

/// Get text for a tree-sitter node
fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Get the line number for a tree-sitter node (1-indexed)
fn node_line(node: &Node) -> usize {
    node.start_position().row + 1
}

/// Get the column number for a tree-sitter node (1-indexed)
fn node_column(node: &Node) -> usize {
    node.start_position().column + 1
}

fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// Remove the common leading whitespace of every non-blank line
pub fn dedent(source: &str) -> String {
    let margin = source
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    if margin == 0 {
        return source.to_string();
    }
    source
        .lines()
        .map(|line| line.get(margin..).unwrap_or_else(|| line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
}

struct Lowerer<'a> {
    source: &'a str,
}

impl<'a> Lowerer<'a> {
    fn text(&self, node: &Node) -> &'a str {
        node_text(node, self.source)
    }

    /// Node text with continuation lines dedented by the node's start column
    fn raw(&self, node: &Node) -> String {
        let column = node.start_position().column;
        let text = self.text(node);
        let mut lines = text.lines();
        let mut out = lines.next().unwrap_or_default().to_string();
        for line in lines {
            out.push('\n');
            let indent = line.len() - line.trim_start().len();
            out.push_str(&line[indent.min(column)..]);
        }
        out
    }

    fn block(&self, node: Node) -> Vec<Stmt> {
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        children.into_iter().map(|child| self.stmt(child)).collect()
    }

    fn stmt(&self, node: Node) -> Stmt {
        match node.kind() {
            "expression_statement" => self.expression_statement(node),
            "return_statement" => {
                let value = named_children(node).into_iter().next().map(|child| {
                    if child.kind() == "expression_list" {
                        Expr::Tuple(self.exprs(child))
                    } else {
                        self.expr(child)
                    }
                });
                Stmt::Return(value)
            }
            "pass_statement" => Stmt::Pass,
            "function_definition" => Stmt::FunctionDef(self.function(node, Vec::new())),
            "class_definition" => Stmt::ClassDef(self.class(node, Vec::new())),
            "decorated_definition" => self.decorated(node),
            "comment" => Stmt::Raw(self.text(&node).to_string()),
            _ => Stmt::Raw(self.raw(&node)),
        }
    }

    fn expression_statement(&self, node: Node) -> Stmt {
        let children = named_children(node);
        let [child] = children.as_slice() else {
            return Stmt::Raw(self.raw(&node));
        };
        if child.kind() != "assignment" {
            return Stmt::Expr(self.expr(*child));
        }

        let left = child.child_by_field_name("left");
        let right = child.child_by_field_name("right");
        let typ = child.child_by_field_name("type");
        match (left, right, typ) {
            // `a = b = c` nests an assignment on the right
            (_, Some(right), _) if right.kind() == "assignment" => Stmt::Raw(self.raw(&node)),
            (Some(left), value, Some(typ)) => Stmt::AnnAssign {
                target: self.expr(left),
                annotation: self.expr(typ),
                value: value.map(|v| self.expr(v)),
            },
            (Some(left), Some(right), None) => Stmt::Assign {
                target: self.expr(left),
                value: self.expr(right),
            },
            _ => Stmt::Raw(self.raw(&node)),
        }
    }

    fn decorated(&self, node: Node) -> Stmt {
        let decorators = named_children(node)
            .into_iter()
            .filter(|child| child.kind() == "decorator")
            .filter_map(|decorator| named_children(decorator).into_iter().next())
            .map(|expr| self.expr(expr))
            .collect();
        match node.child_by_field_name("definition") {
            Some(def) if def.kind() == "function_definition" => {
                Stmt::FunctionDef(self.function(def, decorators))
            }
            Some(def) if def.kind() == "class_definition" => {
                Stmt::ClassDef(self.class(def, decorators))
            }
            _ => Stmt::Raw(self.raw(&node)),
        }
    }

    fn function(&self, node: Node, decorators: Vec<Expr>) -> FunctionDef {
        let is_async = node.child(0).is_some_and(|c| c.kind() == "async");
        FunctionDef {
            name: self.field_text(node, "name"),
            decorators,
            is_async,
            args: node
                .child_by_field_name("parameters")
                .map(|params| self.parameters(params))
                .unwrap_or_default(),
            returns: node
                .child_by_field_name("return_type")
                .map(|ret| self.expr(ret)),
            body: node
                .child_by_field_name("body")
                .map(|body| self.block(body))
                .unwrap_or_default(),
        }
    }

    fn class(&self, node: Node, decorators: Vec<Expr>) -> ClassDef {
        let (bases, keywords) = node
            .child_by_field_name("superclasses")
            .map(|args| self.arguments(args))
            .unwrap_or_default();
        ClassDef {
            name: self.field_text(node, "name"),
            decorators,
            bases,
            keywords,
            body: node
                .child_by_field_name("body")
                .map(|body| self.block(body))
                .unwrap_or_default(),
        }
    }

    fn field_text(&self, node: Node, field: &str) -> String {
        node.child_by_field_name(field)
            .map(|n| self.text(&n).to_string())
            .unwrap_or_default()
    }

    fn parameters(&self, node: Node) -> Arguments {
        let mut arguments = Arguments::default();
        let mut keyword_only = false;

        for param in named_children(node) {
            let arg = match param.kind() {
                "positional_separator" => {
                    arguments.posonlyargs.append(&mut arguments.args);
                    continue;
                }
                "keyword_separator" => {
                    keyword_only = true;
                    continue;
                }
                "list_splat_pattern" => {
                    keyword_only = true;
                    arguments.vararg = Some(Arg::new(self.splat_name(param)));
                    continue;
                }
                "dictionary_splat_pattern" => {
                    arguments.kwarg = Some(Arg::new(self.splat_name(param)));
                    continue;
                }
                "identifier" => Arg::new(self.text(&param)),
                "typed_parameter" => {
                    let annotation = param.child_by_field_name("type").map(|t| self.expr(t));
                    let Some(inner) = named_children(param).into_iter().next() else {
                        continue;
                    };
                    let arg = Arg {
                        name: self.splat_name(inner),
                        annotation,
                        default: None,
                    };
                    match inner.kind() {
                        "list_splat_pattern" => {
                            keyword_only = true;
                            arguments.vararg = Some(arg);
                            continue;
                        }
                        "dictionary_splat_pattern" => {
                            arguments.kwarg = Some(arg);
                            continue;
                        }
                        _ => arg,
                    }
                }
                "default_parameter" | "typed_default_parameter" => Arg {
                    name: self.field_text(param, "name"),
                    annotation: param.child_by_field_name("type").map(|t| self.expr(t)),
                    default: param.child_by_field_name("value").map(|v| self.expr(v)),
                },
                _ => continue,
            };
            if keyword_only {
                arguments.kwonlyargs.push(arg);
            } else {
                arguments.args.push(arg);
            }
        }
        arguments
    }

    fn splat_name(&self, node: Node) -> String {
        match node.kind() {
            "list_splat_pattern" | "dictionary_splat_pattern" => named_children(node)
                .into_iter()
                .next()
                .map(|n| self.text(&n).to_string())
                .unwrap_or_default(),
            _ => self.text(&node).to_string(),
        }
    }

    fn exprs(&self, node: Node) -> Vec<Expr> {
        named_children(node)
            .into_iter()
            .map(|child| self.expr(child))
            .collect()
    }

    fn expr(&self, node: Node) -> Expr {
        match node.kind() {
            "identifier" => Expr::Name(self.text(&node).to_string()),
            "true" => Expr::Constant(Constant::Bool(true)),
            "false" => Expr::Constant(Constant::Bool(false)),
            "none" => Expr::Constant(Constant::None),
            "integer" | "float" => Expr::Constant(Constant::Number(self.text(&node).to_string())),
            "string" => match decode_string(self.text(&node)) {
                Some(value) => Expr::str(value),
                None => Expr::Raw(self.text(&node).to_string()),
            },
            "concatenated_string" => {
                let parts: Option<Vec<String>> = named_children(node)
                    .into_iter()
                    .map(|part| decode_string(self.text(&part)))
                    .collect();
                match parts {
                    Some(parts) => Expr::str(parts.concat()),
                    None => Expr::Raw(self.raw(&node)),
                }
            }
            "attribute" => match (
                node.child_by_field_name("object"),
                node.child_by_field_name("attribute"),
            ) {
                (Some(object), Some(attr)) => Expr::attr(self.expr(object), self.text(&attr)),
                _ => Expr::Raw(self.raw(&node)),
            },
            "call" => self.call(node),
            "tuple" | "expression_list" => Expr::Tuple(self.exprs(node)),
            "list" => Expr::List(self.exprs(node)),
            "parenthesized_expression" | "type" => {
                let children = named_children(node);
                match children.as_slice() {
                    [inner] => self.expr(*inner),
                    _ => Expr::Raw(self.raw(&node)),
                }
            }
            _ => Expr::Raw(self.raw(&node)),
        }
    }

    fn call(&self, node: Node) -> Expr {
        let (Some(func), Some(args)) = (
            node.child_by_field_name("function"),
            node.child_by_field_name("arguments"),
        ) else {
            return Expr::Raw(self.raw(&node));
        };
        if args.kind() != "argument_list" {
            // Generator argument: `f(x for x in y)`
            return Expr::Raw(self.raw(&node));
        }
        let (args, keywords) = self.arguments(args);
        Expr::Call(Call {
            func: Box::new(self.expr(func)),
            args,
            keywords,
        })
    }

    fn arguments(&self, node: Node) -> (Vec<Expr>, Vec<Keyword>) {
        let mut args = Vec::new();
        let mut keywords = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "keyword_argument" => {
                    let (Some(name), Some(value)) = (
                        child.child_by_field_name("name"),
                        child.child_by_field_name("value"),
                    ) else {
                        continue;
                    };
                    keywords.push(Keyword::new(self.text(&name), self.expr(value)));
                }
                "dictionary_splat" => {
                    if let Some(value) = named_children(child).into_iter().next() {
                        keywords.push(Keyword {
                            arg: None,
                            value: self.expr(value),
                        });
                    }
                }
                _ => args.push(self.expr(child)),
            }
        }
        (args, keywords)
    }
}

/// Decode a plain or raw string literal; bytes and f-strings are left alone
fn decode_string(literal: &str) -> Option<String> {
    let prefix_len = literal
        .find(|c: char| c == '\'' || c == '"')
        .filter(|&i| i <= 2)?;
    let prefix = literal[..prefix_len].to_ascii_lowercase();
    if prefix.contains('b') || prefix.contains('f') {
        return None;
    }
    let raw = prefix.contains('r');

    let body = &literal[prefix_len..];
    let quote = if body.starts_with("\"\"\"") || body.starts_with("'''") {
        &body[..3]
    } else {
        &body[..1]
    };
    let inner = body.strip_prefix(quote)?.strip_suffix(quote)?;
    Some(if raw {
        inner.to_string()
    } else {
        unescape(inner)
    })
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\n') => {}
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('a') => out.push('\u{07}'),
            Some('b') => out.push('\u{08}'),
            Some('f') => out.push('\u{0c}'),
            Some('v') => out.push('\u{0b}'),
            Some(kind @ ('x' | 'u' | 'U')) => {
                let width = match kind {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = (0..width).filter_map(|_| chars.next()).collect();
                match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('\\');
                        out.push(kind);
                        out.push_str(&digits);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_parse_function_signature() {
        let stmt = parse_statement(indoc! {r#"
            @staticmethod
            def f(a, b: int = 5, *args, c: str, **kwargs) -> bool:
                """Doc"""
                return True
        "#})
        .unwrap();
        let Stmt::FunctionDef(def) = stmt else {
            panic!("expected function");
        };
        assert_eq!(def.name, "f");
        assert_eq!(def.decorators, vec![Expr::name("staticmethod")]);
        assert_eq!(def.args.args.len(), 2);
        assert_eq!(def.args.args[1].annotation, Some(Expr::name("int")));
        assert_eq!(
            def.args.args[1].default,
            Some(Expr::Constant(Constant::Number("5".into())))
        );
        assert_eq!(def.args.vararg.as_ref().map(|a| a.name.as_str()), Some("args"));
        assert_eq!(def.args.kwonlyargs[0].name, "c");
        assert_eq!(def.args.kwarg.as_ref().map(|a| a.name.as_str()), Some("kwargs"));
        assert_eq!(def.returns, Some(Expr::name("bool")));
        assert_eq!(def.body[0], Stmt::docstring("Doc"));
        assert_eq!(def.body[1], Stmt::Return(Some(Expr::Constant(Constant::Bool(true)))));
    }

    #[test]
    fn test_parse_call_expression() {
        let expr = parse_expression("Column('id', Integer, primary_key=True, **extra)").unwrap();
        let Expr::Call(call) = expr else {
            panic!("expected call");
        };
        assert_eq!(call.callee_name(), Some("Column"));
        assert_eq!(call.args, vec![Expr::str("id"), Expr::name("Integer")]);
        assert_eq!(call.keywords.len(), 2);
        assert_eq!(call.keywords[1].arg, None);
    }

    #[test]
    fn test_parse_class_fields() {
        let stmts = parse_module(indoc! {"
            class Config(object):
                name: str = 'x'
                count = 5
                flag: bool
        "})
        .unwrap();
        let class = stmts[0].as_class().unwrap();
        assert_eq!(class.bases, vec![Expr::name("object")]);
        assert!(matches!(class.body[0], Stmt::AnnAssign { value: Some(_), .. }));
        assert!(matches!(class.body[1], Stmt::Assign { .. }));
        assert!(matches!(class.body[2], Stmt::AnnAssign { value: None, .. }));
    }

    #[test]
    fn test_generic_annotation_is_raw() {
        let stmt = parse_statement("x: Optional[List[int]] = None").unwrap();
        let Stmt::AnnAssign { annotation, .. } = stmt else {
            panic!("expected annotated assignment");
        };
        assert_eq!(annotation, Expr::Raw("Optional[List[int]]".into()));
    }

    #[test]
    fn test_return_tuple() {
        let stmt = parse_statement("return argument_parser, (np.empty(0), np.empty(0))").unwrap();
        let Stmt::Return(Some(Expr::Tuple(elts))) = stmt else {
            panic!("expected tuple return");
        };
        assert_eq!(elts[0], Expr::name("argument_parser"));
        assert!(matches!(elts[1], Expr::Tuple(_)));
    }

    #[test]
    fn test_syntax_error_location() {
        let err = parse_module("def f(:\n    pass\n").unwrap_err();
        assert!(matches!(err, DoctransError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_string_decoding() {
        assert_eq!(decode_string(r#"'a\'b'"#).as_deref(), Some("a'b"));
        assert_eq!(decode_string(r#"r'\d+'"#).as_deref(), Some(r"\d+"));
        assert_eq!(decode_string("'''x\ny'''").as_deref(), Some("x\ny"));
        assert_eq!(decode_string("f'{x}'"), None);
    }

    #[test]
    fn test_dedent_indented_snippet() {
        let stmt = parse_statement("    def method(self):\n        pass\n").unwrap();
        assert_eq!(stmt.as_function().map(|f| f.name.as_str()), Some("method"));
    }
}
