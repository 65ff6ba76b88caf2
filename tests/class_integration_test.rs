mod common;

use common::{canonical_ir, canonical_named};
use doctrans::emit::{self, ClassOptions, EmitOptions};
use doctrans::parse::{self, ParseOptions};
use doctrans::syntax::{ClassDef, Stmt};
use doctrans::{parse_statement, to_source, FunctionKind};
use indoc::indoc;
use pretty_assertions::assert_eq;

fn reparse(stmt: &Stmt) -> ClassDef {
    match parse_statement(&to_source(stmt)).unwrap() {
        Stmt::ClassDef(class) => class,
        other => panic!("expected a class, got {other:?}"),
    }
}

#[test]
fn test_round_trip_inline_types() {
    let stmt = emit::class_(&canonical_ir(), &EmitOptions::default(), &ClassOptions::default()).unwrap();
    let ir = parse::class_(&reparse(&stmt), &ParseOptions::default()).unwrap();
    assert_eq!(ir, canonical_named("ConfigClass"));
}

#[test]
fn test_round_trip_docstring_types() {
    let options = EmitOptions {
        inline_types: false,
        ..EmitOptions::default()
    };
    let stmt = emit::class_(&canonical_ir(), &options, &ClassOptions::default()).unwrap();
    let source = to_source(&stmt);
    assert!(source.contains(":type dataset_name: ```str```"));
    let ir = parse::class_(&reparse(&stmt), &ParseOptions::default()).unwrap();
    assert_eq!(ir, canonical_named("ConfigClass"));
}

#[test]
fn test_class_with_method_takes_method_returns() {
    let class = match parse_statement(indoc! {r#"
        class Runner(object):
            """
            Runs things

            :cvar epochs: how many epochs
            """
            epochs: int = 3

            def run(self, epochs: int = 3, verbose: bool = False) -> float:
                """
                :param verbose: print progress
                :return: the loss
                """
                train(epochs)
                return 0.5
    "#})
    .unwrap()
    {
        Stmt::ClassDef(class) => class,
        other => panic!("expected a class, got {other:?}"),
    };
    let ir = parse::class_with_method(&class, "run", &ParseOptions::default()).unwrap();
    assert_eq!(ir.doc.as_deref(), Some("Runs things"));
    assert_eq!(ir.params.keys().collect::<Vec<_>>(), vec!["epochs", "verbose"]);
    assert_eq!(
        ir.params.get("epochs").and_then(|p| p.doc.as_deref()),
        Some("how many epochs")
    );
    let returns = ir.returns.unwrap();
    assert_eq!(returns.typ.as_deref(), Some("float"));
    assert_eq!(returns.doc.as_deref(), Some("the loss"));
    assert!(ir.body.is_empty());
    assert_eq!(ir.name.as_deref(), Some("Runner"));
    assert_eq!(ir.kind, Some(FunctionKind::SelfMethod));
}

#[test]
fn test_base_classes_survive_class_round_trip() {
    let class = match parse_statement(indoc! {r#"
        @dataclass
        class Config(Base):
            """
            :cvar epochs: how many epochs
            """
            epochs: int = 3
    "#})
    .unwrap()
    {
        Stmt::ClassDef(class) => class,
        other => panic!("expected a class, got {other:?}"),
    };
    let ir = parse::class_(&class, &ParseOptions::default()).unwrap();
    let stmt = emit::class_(&ir, &EmitOptions::default(), &ClassOptions::default()).unwrap();
    assert!(to_source(&stmt).starts_with("@dataclass\nclass Config(Base):\n"));
    assert_eq!(parse::class_(&reparse(&stmt), &ParseOptions::default()).unwrap(), ir);

    let function = emit::function(&ir, &EmitOptions::default()).unwrap();
    assert!(to_source(&function).starts_with("def Config(epochs: int = 3):"));
}
