//! Structural parsers: Python constructs to the intermediate representation

pub mod argparse;
pub mod class;
pub mod function;
pub mod sqlalchemy;

pub use argparse::argparse_function;
pub use class::{class_, class_with_method};
pub use function::function;
pub use sqlalchemy::{
    column_call_name_manipulator, column_call_to_param, sqlalchemy_class, sqlalchemy_table,
    NameOperation,
};

use crate::core::ir::IntermediateRepr;
use crate::core::values::DocstringFormat;
use crate::docstring;
use crate::syntax::{body_docstring, Stmt};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Dialect of embedded docstrings; detected when absent
    pub docstring_format: Option<DocstringFormat>,
    /// Fill missing types from defaults and descriptions
    pub infer_type: bool,
}

/// IR read from the docstring heading `body`, with its returns flag
pub(crate) fn documented_ir(body: &[Stmt], options: &ParseOptions) -> Option<(IntermediateRepr, bool)> {
    body_docstring(body).map(|text| {
        let parsed = docstring::parse(text, options.docstring_format);
        (parsed.ir, parsed.returns_found)
    })
}
