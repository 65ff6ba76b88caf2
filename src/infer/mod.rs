//! Ad-hoc type inference from natural-language parameter descriptions.
//!
//! The inferencer is an ordered list of [`InferenceRule`]s; the first rule
//! that produces a type wins. Inference is purely textual and deterministic.

pub mod rules;
pub mod vocabulary;

use crate::core::ir::{IntermediateRepr, ParamVal};
use once_cell::sync::Lazy;
use tracing::trace;

/// Unconstrained type marker returned when no rule matches
pub const ANY: &str = "Any";

/// Description and parameter name a rule looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    pub text: String,
    pub name: String,
}

impl Phrase {
    pub fn new(text: &str, name: &str) -> Self {
        Self {
            text: text.trim().to_string(),
            name: name.to_string(),
        }
    }
}

/// One phrase template
#[derive(Debug, Clone, Copy)]
pub struct InferenceRule {
    pub name: &'static str,
    pub apply: fn(&Phrase) -> Option<String>,
}

impl InferenceRule {
    pub const fn new(name: &'static str, apply: fn(&Phrase) -> Option<String>) -> Self {
        Self { name, apply }
    }
}

#[derive(Debug, Clone)]
pub struct TypeInferencer {
    rules: Vec<InferenceRule>,
}

impl Default for TypeInferencer {
    fn default() -> Self {
        Self {
            rules: rules::default_rules(),
        }
    }
}

impl TypeInferencer {
    /// Inferencer with no rules; everything infers to [`ANY`]
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule after the existing ones
    pub fn with_rule(mut self, rule: InferenceRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[InferenceRule] {
        &self.rules
    }

    /// Type from the first matching rule, if any
    pub fn infer_opt(&self, description: &str, name: &str) -> Option<String> {
        let phrase = Phrase::new(description, name);
        self.rules.iter().find_map(|rule| {
            let typ = (rule.apply)(&phrase)?;
            trace!(rule = rule.name, name, typ = %typ, "Inferred type");
            Some(typ)
        })
    }

    /// Type from the first matching rule, or [`ANY`]
    pub fn infer(&self, description: &str, name: &str) -> String {
        self.infer_opt(description, name)
            .unwrap_or_else(|| ANY.to_string())
    }
}

static DEFAULT_INFERENCER: Lazy<TypeInferencer> = Lazy::new(TypeInferencer::default);

/// Infer a type string from a description using the default rules
pub fn infer(description: &str, name: &str) -> String {
    DEFAULT_INFERENCER.infer(description, name)
}

/// Inferred type alongside the unchanged description
pub fn parse_adhoc_doc_for_typ(description: &str, name: &str) -> (String, String) {
    (infer(description, name), description.to_string())
}

/// Fill absent `typ` values from literal defaults, then from descriptions.
///
/// Explicit types are never overwritten and [`ANY`] is never written.
pub fn fill_missing_types(ir: &mut IntermediateRepr) {
    fill_missing_types_with(&DEFAULT_INFERENCER, ir);
}

pub fn fill_missing_types_with(inferencer: &TypeInferencer, ir: &mut IntermediateRepr) {
    for (name, param) in ir.params.iter_mut() {
        fill_param(inferencer, name, param);
    }
    if let Some(returns) = ir.returns.as_mut() {
        fill_param(inferencer, "", returns);
    }
}

fn fill_param(inferencer: &TypeInferencer, name: &str, param: &mut ParamVal) {
    if param.typ.is_some() {
        return;
    }
    param.typ = param
        .default
        .as_ref()
        .and_then(|default| default.type_name())
        .map(str::to_string)
        .or_else(|| {
            param
                .doc
                .as_deref()
                .and_then(|doc| inferencer.infer_opt(doc, name))
        });
}
