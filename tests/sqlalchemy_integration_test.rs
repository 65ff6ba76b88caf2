mod common;

use common::canonical_ir;
use doctrans::emit::{self, TableOptions};
use doctrans::parse::{self, ParseOptions};
use doctrans::syntax::{expr_to_source, Expr, Stmt};
use doctrans::{parse_expression, parse_statement, IntermediateRepr};
use indoc::indoc;
use pretty_assertions::assert_eq;

fn canonical_table() -> IntermediateRepr {
    IntermediateRepr {
        name: Some("config_tbl".into()),
        returns: None,
        ..canonical_ir()
    }
}

#[test]
fn test_table_round_trip() {
    let table = emit::sqlalchemy_table(&canonical_table(), &TableOptions::default()).unwrap();
    let Expr::Call(call) = parse_expression(&expr_to_source(&table)).unwrap() else {
        panic!("expected a call");
    };
    assert_eq!(parse::sqlalchemy_table(&call).unwrap(), canonical_table());
}

#[test]
fn test_first_column_is_primary_key() {
    let source = expr_to_source(
        &emit::sqlalchemy_table(&canonical_table(), &TableOptions::default()).unwrap(),
    );
    assert!(source.starts_with(
        "Table('config_tbl', metadata, Column('dataset_name', String, doc='name of dataset', \
         default='mnist', primary_key=True)"
    ));
    assert_eq!(source.matches("primary_key=True").count(), 1);
}

#[test]
fn test_explicit_primary_key_and_name() {
    let options = TableOptions {
        table_name: Some("datasets".into()),
        metadata_name: "meta".into(),
        primary_key: Some("K".into()),
    };
    let source = expr_to_source(&emit::sqlalchemy_table(&canonical_table(), &options).unwrap());
    assert!(source.starts_with("Table('datasets', meta, "));
    assert!(source.contains("Column('K', Enum('np', 'tf', name='K'), doc='backend engine, e.g., `np` or `tf`', default='np', primary_key=True)"));
}

#[test]
fn test_declarative_class_matches_table() {
    let class = match parse_statement(indoc! {r#"
        class Config(Base):
            """Acquire from the official tensorflow_datasets model zoo, or the ophthalmology focussed ml-prepare library"""
            __tablename__ = 'config_tbl'
            dataset_name = Column(String, doc='name of dataset', default='mnist', primary_key=True)
            tfds_dir = Column(String, doc='directory to look for models in', default='~/tensorflow_datasets', nullable=True)
            K = Column(Enum('np', 'tf', name='K'), doc='backend engine, e.g., `np` or `tf`', default='np')
            as_numpy = Column(Boolean, doc='Convert to numpy ndarrays', nullable=True)
            data_loader_kwargs = Column(JSON, doc='pass this as arguments to data_loader function', nullable=True)
    "#})
    .unwrap()
    {
        Stmt::ClassDef(class) => class,
        other => panic!("expected a class, got {other:?}"),
    };
    let ir = parse::sqlalchemy_class(&class, &ParseOptions::default()).unwrap();
    assert_eq!(
        ir,
        IntermediateRepr {
            name: Some("Config".into()),
            ..canonical_table()
        }
    );
}
