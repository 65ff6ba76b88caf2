//! Scalar value types shared by the intermediate representation.

use crate::core::errors::DoctransError;
use crate::syntax::{expr_to_source, quote_str, Constant, Expr};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Documentation dialects recognized by the docstring parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocstringFormat {
    /// reStructuredText field lists (`:param x:`); the only emitted dialect
    #[default]
    Rest,
    /// Google style `Args:` / `Returns:` sections
    Google,
    /// NumPy style underlined `Parameters` / `Returns` sections
    Numpy,
}

impl DocstringFormat {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rest => "rest",
            Self::Google => "google",
            Self::Numpy => "numpy",
        }
    }
}

impl fmt::Display for DocstringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocstringFormat {
    type Err = DoctransError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rest" | "rst" | "restructuredtext" | "sphinx" => Ok(Self::Rest),
            "google" => Ok(Self::Google),
            "numpy" | "numpydoc" => Ok(Self::Numpy),
            other => Err(DoctransError::Config(format!(
                "unknown docstring format `{other}`"
            ))),
        }
    }
}

/// How a callable binds its first argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    /// Free function or `@staticmethod`
    Static,
    /// Instance method taking `self`
    #[serde(rename = "self")]
    SelfMethod,
    /// Class-level construct taking `cls`
    #[serde(rename = "cls")]
    ClassMethod,
}

impl FunctionKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::SelfMethod => "self",
            Self::ClassMethod => "cls",
        }
    }

    /// The implicit leading argument, if any
    pub const fn first_arg(&self) -> Option<&'static str> {
        match self {
            Self::Static => None,
            Self::SelfMethod => Some("self"),
            Self::ClassMethod => Some("cls"),
        }
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FunctionKind {
    type Err = DoctransError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" | "function" => Ok(Self::Static),
            "self" | "method" => Ok(Self::SelfMethod),
            "cls" | "class" | "classmethod" => Ok(Self::ClassMethod),
            other => Err(DoctransError::Config(format!(
                "unknown function type `{other}`"
            ))),
        }
    }
}

/// A parameter default.
///
/// Trivial literals are kept typed; anything else is held as the unevaluated
/// source text of the expression in [`DefaultValue::Code`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Code(String),
}

impl DefaultValue {
    /// Convert a Python expression into a default value
    pub fn from_expr(expr: &Expr) -> Self {
        match expr {
            Expr::Constant(Constant::None) => Self::None,
            Expr::Constant(Constant::Bool(b)) => Self::Bool(*b),
            Expr::Constant(Constant::Str(s)) => Self::Str(s.clone()),
            Expr::Constant(Constant::Number(n)) => Self::from_number(n),
            Expr::Raw(text) => Self::from_number(text),
            other => Self::Code(expr_to_source(other)),
        }
    }

    fn from_number(text: &str) -> Self {
        let trimmed = text.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Self::Int(i);
        }
        if looks_like_float(trimmed) {
            if let Ok(f) = trimmed.parse::<f64>() {
                return Self::Float(f);
            }
        }
        Self::Code(text.to_string())
    }

    /// Convert back into a Python expression
    pub fn to_expr(&self) -> Expr {
        match self {
            Self::None => Expr::Constant(Constant::None),
            Self::Bool(b) => Expr::Constant(Constant::Bool(*b)),
            Self::Int(i) if *i < 0 => Expr::Raw(i.to_string()),
            Self::Int(i) => Expr::Constant(Constant::Number(i.to_string())),
            Self::Float(f) if *f < 0.0 => Expr::Raw(format!("{f:?}")),
            Self::Float(f) => Expr::Constant(Constant::Number(format!("{f:?}"))),
            Self::Str(s) => Expr::Constant(Constant::Str(s.clone())),
            Self::Code(code) => Expr::Raw(code.clone()),
        }
    }

    /// Python source spelling of this default
    pub fn to_source(&self) -> String {
        expr_to_source(&self.to_expr())
    }

    /// Parse the value of a `defaults to <value>` clause
    pub fn from_doc_text(text: &str) -> Self {
        let trimmed = text.trim();
        if let Some(inner) = strip_fence(trimmed) {
            return match Self::literal(inner) {
                Some(value) => value,
                None => Self::Code(inner.to_string()),
            };
        }
        Self::literal(trimmed).unwrap_or_else(|| Self::Str(trimmed.to_string()))
    }

    fn literal(text: &str) -> Option<Self> {
        match text {
            "None" => return Some(Self::None),
            "True" => return Some(Self::Bool(true)),
            "False" => return Some(Self::Bool(false)),
            _ => {}
        }
        if let Ok(i) = text.parse::<i64>() {
            return Some(Self::Int(i));
        }
        if looks_like_float(text) {
            if let Ok(f) = text.parse::<f64>() {
                return Some(Self::Float(f));
            }
        }
        unquote(text).map(Self::Str)
    }

    /// Spelling used inside a `Defaults to ...` phrase
    pub fn to_doc_text(&self) -> String {
        match self {
            Self::None => "None".to_string(),
            Self::Bool(true) => "True".to_string(),
            Self::Bool(false) => "False".to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => format!("{f:?}"),
            Self::Str(s) => {
                if Self::from_doc_text(s) == Self::Str(s.clone()) && !s.trim().is_empty() {
                    s.clone()
                } else {
                    quote_str(s)
                }
            }
            Self::Code(code) => format!("```{code}```"),
        }
    }

    /// The builtin type name of a literal default
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            Self::Bool(_) => Some("bool"),
            Self::Int(_) => Some("int"),
            Self::Float(_) => Some("float"),
            Self::Str(_) => Some("str"),
            Self::None | Self::Code(_) => None,
        }
    }
}

fn looks_like_float(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '-' | '+'))
        && text.chars().any(|c| c.is_ascii_digit())
}

fn strip_fence(text: &str) -> Option<&str> {
    let inner = text
        .strip_prefix("```")
        .and_then(|t| t.strip_suffix("```"))
        .or_else(|| text.strip_prefix('`').and_then(|t| t.strip_suffix('`')))?;
    (!inner.is_empty()).then_some(inner)
}

fn unquote(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return Some(text[1..text.len() - 1].to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_doc_text_literals() {
        assert_eq!(DefaultValue::from_doc_text("None"), DefaultValue::None);
        assert_eq!(DefaultValue::from_doc_text("5"), DefaultValue::Int(5));
        assert_eq!(DefaultValue::from_doc_text("0.5"), DefaultValue::Float(0.5));
        assert_eq!(DefaultValue::from_doc_text("True"), DefaultValue::Bool(true));
        assert_eq!(
            DefaultValue::from_doc_text("mnist"),
            DefaultValue::Str("mnist".into())
        );
        assert_eq!(
            DefaultValue::from_doc_text("'5'"),
            DefaultValue::Str("5".into())
        );
    }

    #[test]
    fn test_from_doc_text_code_fence() {
        assert_eq!(
            DefaultValue::from_doc_text("```(np.empty(0), np.empty(0))```"),
            DefaultValue::Code("(np.empty(0), np.empty(0))".into())
        );
        assert_eq!(DefaultValue::from_doc_text("`None`"), DefaultValue::None);
    }

    #[test]
    fn test_doc_text_round_trips() {
        for value in [
            DefaultValue::None,
            DefaultValue::Bool(false),
            DefaultValue::Int(-3),
            DefaultValue::Float(1.0),
            DefaultValue::Str("~/tensorflow_datasets".into()),
            DefaultValue::Str("5".into()),
            DefaultValue::Code("{}".into()),
        ] {
            assert_eq!(DefaultValue::from_doc_text(&value.to_doc_text()), value);
        }
    }

    #[test]
    fn test_expr_conversion() {
        assert_eq!(
            DefaultValue::from_expr(&Expr::Constant(Constant::Number("16".into()))),
            DefaultValue::Int(16)
        );
        assert_eq!(
            DefaultValue::from_expr(&Expr::Raw("-1".into())),
            DefaultValue::Int(-1)
        );
        assert_eq!(DefaultValue::Str("np".into()).to_source(), "'np'");
        assert_eq!(DefaultValue::Float(1.0).to_source(), "1.0");
        assert_eq!(DefaultValue::Code("{}".into()).to_source(), "{}");
    }

    #[test]
    fn test_format_and_kind_parsing() {
        assert_eq!("NumPy".parse::<DocstringFormat>(), Ok(DocstringFormat::Numpy));
        assert!("epytext".parse::<DocstringFormat>().is_err());
        assert_eq!("self".parse::<FunctionKind>(), Ok(FunctionKind::SelfMethod));
        assert_eq!(FunctionKind::ClassMethod.first_arg(), Some("cls"));
    }
}
