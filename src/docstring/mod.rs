//! Documentation text to and from the intermediate representation.
//!
//! Parsing accepts reST, Google and NumPy dialects and never fails: text
//! without recognizable markers is kept as prose. Emission produces reST only.

pub mod defaults;
pub mod detect;
pub mod emit;
pub mod parse;

pub use defaults::{append_default, extract_default, has_default_phrase};
pub use detect::{detect_dialect, Detection};
pub use emit::{doc_with_default, emit_docstring, indent_docstring, DocstringEmitOptions, FieldWord};

use crate::core::ir::IntermediateRepr;
use crate::core::values::DocstringFormat;
use tracing::debug;

/// Result of parsing a documentation block
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocstring {
    pub ir: IntermediateRepr,
    /// Whether a returns field was present, even an empty one
    pub returns_found: bool,
    /// Dialect the text was read as
    pub format: DocstringFormat,
}

/// Parse documentation text; the dialect is detected when `format` is `None`
pub fn parse(text: &str, format: Option<DocstringFormat>) -> ParsedDocstring {
    let format = format.unwrap_or_else(|| {
        let detection = detect_dialect(text);
        debug!(
            format = %detection.format,
            confidence = detection.confidence,
            "Detected docstring dialect"
        );
        detection.format
    });

    let (ir, returns_found) = match format {
        DocstringFormat::Rest => parse::rest::parse(text),
        DocstringFormat::Google => parse::google::parse(text),
        DocstringFormat::Numpy => parse::numpy::parse(text),
    };
    ParsedDocstring {
        ir,
        returns_found,
        format,
    }
}

/// Parse documentation text into just the IR
pub fn parse_docstring(text: &str, format: Option<DocstringFormat>) -> IntermediateRepr {
    parse(text, format).ir
}
