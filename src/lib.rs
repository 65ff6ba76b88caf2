// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod docstring;
pub mod emit;
pub mod infer;
pub mod parse;
pub mod reconcile;
pub mod syntax;

// Re-export commonly used types
pub use crate::core::{
    DefaultValue, DocstringFormat, DoctransError, FunctionKind, Header, IntermediateRepr, ParamMap,
    ParamVal, Result, RETURN_KEY,
};

pub use crate::docstring::{
    detect_dialect, emit_docstring, parse as parse_docstring_with_returns, parse_docstring,
    Detection, DocstringEmitOptions, ParsedDocstring,
};

pub use crate::infer::{
    fill_missing_types, infer, parse_adhoc_doc_for_typ, InferenceRule, TypeInferencer,
};

pub use crate::parse::ParseOptions;

pub use crate::emit::{ClassOptions, EmitOptions, TableOptions};

pub use crate::config::{load_config, DoctransConfig};

pub use crate::syntax::{parse_expression, parse_module, parse_statement, to_source};
