//! Python syntax model, tree-sitter parser and source printer.
//!
//! Structural parsers consume [`Stmt`]/[`Expr`] values and emitters produce
//! them; [`to_source`] renders them back to Python text.

pub mod ast;
pub mod parser;
pub mod printer;

pub use ast::{
    body_docstring, body_without_docstring, find_call, find_class, find_function, Arg, Arguments,
    Call, ClassDef, Constant, Expr, FunctionDef, Keyword, Stmt,
};
pub use parser::{dedent, parse_expression, parse_module, parse_statement};
pub use printer::{
    arguments_to_source, expr_to_source, module_to_source, quote_str, to_source, to_source_at,
};
