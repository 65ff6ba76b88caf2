//! Property-based tests for conversions
//!
//! Invariants checked for generated inputs:
//! - Parameter order survives every structural round trip
//! - Type inference is deterministic
//! - Docstrings re-parse to the IR they were emitted from

use doctrans::emit::{self, ClassOptions, EmitOptions};
use doctrans::parse::{self, ParseOptions};
use doctrans::syntax::Stmt;
use doctrans::{
    emit_docstring, infer, parse_docstring, parse_statement, to_source, DocstringEmitOptions,
    FunctionKind, IntermediateRepr, ParamVal,
};
use proptest::prelude::*;

const PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

fn python_identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,10}".prop_filter("not reserved", |s| {
        !PYTHON_KEYWORDS.contains(&s.as_str()) && !matches!(s.as_str(), "self" | "cls")
    })
}

fn python_type() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["str", "int", "bool", "float", "dict", "Optional[str]", "List[int]"])
        .prop_map(str::to_string)
}

fn description() -> impl Strategy<Value = String> {
    "[a-z]{1,8}( [a-z]{1,8}){0,4}"
}

/// IR with unique parameter names in generation order; some parameters are
/// documented only
fn ir_strategy() -> impl Strategy<Value = IntermediateRepr> {
    let param = (python_identifier(), prop::option::of(python_type()), description());
    prop::collection::vec(param, 0..6).prop_map(|params| {
        let mut ir = IntermediateRepr::new();
        for (name, typ, doc) in params {
            if !ir.params.contains_key(&name) {
                ir.params.insert(name, ParamVal { typ, ..ParamVal::new().with_doc(doc) });
            }
        }
        ir
    })
}

fn names(ir: &IntermediateRepr) -> Vec<String> {
    ir.params.keys().map(str::to_string).collect()
}

proptest! {
    #[test]
    fn prop_function_round_trip_preserves_params(ir in ir_strategy()) {
        let stmt = emit::function(&ir, &EmitOptions::default()).unwrap();
        let Stmt::FunctionDef(def) = parse_statement(&to_source(&stmt)).unwrap() else {
            panic!("expected a function");
        };
        let parsed = parse::function(&def, &ParseOptions::default()).unwrap();
        prop_assert_eq!(
            parsed,
            IntermediateRepr {
                name: Some("function".into()),
                kind: Some(FunctionKind::Static),
                ..ir
            }
        );
    }

    #[test]
    fn prop_class_round_trip_preserves_order(ir in ir_strategy()) {
        let stmt = emit::class_(&ir, &EmitOptions::default(), &ClassOptions::default()).unwrap();
        let Stmt::ClassDef(class) = parse_statement(&to_source(&stmt)).unwrap() else {
            panic!("expected a class");
        };
        let parsed = parse::class_(&class, &ParseOptions::default()).unwrap();
        prop_assert_eq!(names(&parsed), names(&ir));
        prop_assert_eq!(parsed.params, ir.params);
    }

    #[test]
    fn prop_docstring_round_trip(ir in ir_strategy()) {
        let options = DocstringEmitOptions {
            emit_types: true,
            ..DocstringEmitOptions::default()
        };
        let text = emit_docstring(&ir, &options).unwrap();
        prop_assert_eq!(parse_docstring(&text, None), ir);
    }

    #[test]
    fn prop_inference_is_deterministic(text in ".{0,60}", name in python_identifier()) {
        prop_assert_eq!(infer(&text, &name), infer(&text, &name));
    }
}
