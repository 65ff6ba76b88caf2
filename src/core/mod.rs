pub mod errors;
pub mod ir;
pub mod types;
pub mod values;

pub use errors::{DoctransError, Result};
pub use ir::{Header, IntermediateRepr, ParamMap, ParamVal, RETURN_KEY};
pub use values::{DefaultValue, DocstringFormat, FunctionKind};
