//! Structural emitters: the intermediate representation back to Python constructs

pub mod argparse;
pub mod class;
pub mod function;
pub mod sqlalchemy;

pub use argparse::argparse_function;
pub use class::{class_, ClassOptions};
pub use function::function;
pub use sqlalchemy::{param_to_column, sqlalchemy_table, TableOptions};

use crate::core::errors::Result;
use crate::core::ir::IntermediateRepr;
use crate::core::values::{DocstringFormat, FunctionKind};
use crate::docstring::{emit_docstring, indent_docstring, DocstringEmitOptions, FieldWord};
use crate::syntax::Stmt;
use serde::{Deserialize, Serialize};

/// Options shared by every emitter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitOptions {
    /// State defaults in descriptions (`Defaults to X`)
    pub emit_default_doc: bool,
    /// Put types in annotations rather than `:type` docstring fields
    pub inline_types: bool,
    /// Make every function parameter keyword-only
    pub emit_as_kwonlyargs: bool,
    /// Nesting depth of the emitted construct
    pub indent_level: usize,
    /// Blank lines between docstring field groups and before closing quotes
    pub emit_separating_tab: bool,
    /// Overrides the name taken from the IR
    pub function_name: Option<String>,
    /// Overrides the kind taken from the IR
    pub function_type: Option<FunctionKind>,
    pub docstring_format: DocstringFormat,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            emit_default_doc: true,
            inline_types: true,
            emit_as_kwonlyargs: false,
            indent_level: 0,
            emit_separating_tab: true,
            function_name: None,
            function_type: None,
            docstring_format: DocstringFormat::Rest,
        }
    }
}

impl EmitOptions {
    pub(crate) fn docstring_options(&self, word: FieldWord) -> DocstringEmitOptions {
        DocstringEmitOptions {
            format: self.docstring_format,
            emit_default_doc: self.emit_default_doc,
            emit_types: !self.inline_types,
            word,
            emit_separating_tab: self.emit_separating_tab,
        }
    }
}

/// Docstring statement for `ir`, or `None` when it would be empty
pub(crate) fn docstring_stmt(
    ir: &IntermediateRepr,
    docstring_options: &DocstringEmitOptions,
    indent_level: usize,
) -> Result<Option<Stmt>> {
    let text = emit_docstring(ir, docstring_options)?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(Stmt::docstring(indent_docstring(
        &text,
        indent_level,
        docstring_options.emit_separating_tab,
    ))))
}
