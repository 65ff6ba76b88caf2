use crate::emit::{ClassOptions, EmitOptions, TableOptions};
use crate::parse::ParseOptions;
use serde::{Deserialize, Serialize};

/// Root configuration structure, read from `.doctrans.toml`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DoctransConfig {
    /// Options shared by every emitter
    pub emit: EmitOptions,

    /// Options for structural and docstring parsing
    pub parse: ParseOptions,

    /// Class emitter options
    pub class: ClassOptions,

    /// Table emitter options
    pub table: TableOptions,
}
