//! SQLAlchemy `Column(...)`, `Table(...)` and declarative classes to IR

use super::{documented_ir, ParseOptions};
use crate::core::errors::{DoctransError, Result};
use crate::core::ir::{IntermediateRepr, ParamVal};
use crate::core::types::make_optional;
use crate::core::values::DefaultValue;
use crate::infer;
use crate::reconcile;
use crate::syntax::{expr_to_source, quote_str, Call, ClassDef, Constant, Expr, Keyword, Stmt};
use tracing::{debug, warn};

/// Marker appended to the description of foreign-key columns
pub fn foreign_key_marker(target: &str) -> String {
    format!("[FK({target})]")
}

/// Edit applied to the name argument of a `Column(...)` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameOperation {
    /// Insert a leading name argument, replacing any existing one
    Add(String),
    /// Change the existing name (positional or `name=`), adding it when absent
    Rename(String),
    /// Drop the name, positional and keyword
    Remove,
}

/// Apply `op` to the name of a column call and hand the call back
pub fn column_call_name_manipulator(mut call: Call, op: NameOperation) -> Call {
    let positional = matches!(call.args.first(), Some(Expr::Constant(Constant::Str(_))));
    let keyword = call
        .keywords
        .iter()
        .position(|k| k.arg.as_deref() == Some("name"));

    match op {
        NameOperation::Add(name) => {
            if let Some(index) = keyword {
                call.keywords.remove(index);
            }
            if positional {
                call.args[0] = Expr::str(name);
            } else {
                call.args.insert(0, Expr::str(name));
            }
        }
        NameOperation::Rename(name) => match (positional, keyword) {
            (true, _) => call.args[0] = Expr::str(name),
            (false, Some(index)) => call.keywords[index] = Keyword::new("name", Expr::str(name)),
            (false, None) => call.args.insert(0, Expr::str(name)),
        },
        NameOperation::Remove => {
            if positional {
                call.args.remove(0);
            }
            if let Some(index) = keyword {
                call.keywords.remove(index);
            }
        }
    }
    call
}

/// Positional arguments of a `Column(...)` call
#[derive(Debug)]
enum ColumnArg<'a> {
    Name(&'a str),
    Type(String),
    ForeignKey(String),
    Unsupported(&'a Expr),
}

fn simple_column_type(name: &str) -> Option<&'static str> {
    Some(match name {
        "String" | "Text" | "Unicode" | "UnicodeText" | "VARCHAR" | "CHAR" => "str",
        "Integer" | "BigInteger" | "SmallInteger" | "INTEGER" | "BIGINT" => "int",
        "Boolean" | "BOOLEAN" => "bool",
        "Float" | "Numeric" | "FLOAT" | "REAL" => "float",
        "JSON" | "JSONB" => "dict",
        "LargeBinary" | "BLOB" => "bytes",
        "DateTime" | "TIMESTAMP" => "datetime",
        "Date" => "date",
        _ => return None,
    })
}

/// Python type of a column type expression (`String`, `String(50)`,
/// `Enum('a', 'b')`, `ARRAY(Integer)`)
fn column_type(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Name(id) | Expr::Attribute { attr: id, .. } => {
            simple_column_type(id).map(str::to_string)
        }
        Expr::Call(call) => match call.callee_name()? {
            "Enum" => {
                let values: Vec<String> = call
                    .args
                    .iter()
                    .map(|arg| match arg.as_str() {
                        Some(s) => quote_str(s),
                        None => expr_to_source(arg),
                    })
                    .collect();
                (!values.is_empty()).then(|| format!("Literal[{}]", values.join(", ")))
            }
            "ARRAY" => call
                .args
                .first()
                .and_then(column_type)
                .map(|inner| format!("List[{inner}]")),
            other => simple_column_type(other).map(str::to_string),
        },
        _ => None,
    }
}

fn foreign_key_target(call: &Call) -> String {
    let target = match call.callee_name() {
        // ForeignKeyConstraint(['local'], ['remote.id'])
        Some("ForeignKeyConstraint") => call.args.get(1),
        _ => call.args.first(),
    };
    match target {
        Some(Expr::List(items) | Expr::Tuple(items)) => items
            .iter()
            .map(|item| item.as_str().map_or_else(|| expr_to_source(item), str::to_string))
            .collect::<Vec<_>>()
            .join(", "),
        Some(expr) => expr
            .as_str()
            .map_or_else(|| expr_to_source(expr), str::to_string),
        None => String::new(),
    }
}

fn classify(arg: &Expr) -> ColumnArg<'_> {
    if let Some(name) = arg.as_str() {
        return ColumnArg::Name(name);
    }
    if let Some(call) = arg.as_call() {
        if matches!(
            call.callee_name(),
            Some("ForeignKey" | "ForeignKeyConstraint")
        ) {
            return ColumnArg::ForeignKey(foreign_key_target(call));
        }
    }
    match column_type(arg) {
        Some(typ) => ColumnArg::Type(typ),
        None => ColumnArg::Unsupported(arg),
    }
}

const COLUMN_KEYWORDS: &[&str] = &[
    "name",
    "nullable",
    "doc",
    "comment",
    "default",
    "server_default",
    "primary_key",
    "unique",
    "index",
    "autoincrement",
];

/// Convert one `Column(...)` call into `(name, param)`
pub fn column_call_to_param(call: &Call) -> Result<(String, ParamVal)> {
    let source = || expr_to_source(&Expr::Call(call.clone()));
    if call.callee_name() != Some("Column") {
        return Err(DoctransError::unsupported(format!(
            "expected a Column call: `{}`",
            source()
        )));
    }

    let mut name = call.keyword("name").and_then(Expr::as_str).map(str::to_string);
    let mut typ = None;
    let mut foreign_keys = Vec::new();
    for arg in &call.args {
        match classify(arg) {
            ColumnArg::Name(n) => {
                name.get_or_insert_with(|| n.to_string());
            }
            ColumnArg::Type(t) => typ = Some(t),
            ColumnArg::ForeignKey(target) => foreign_keys.push(target),
            ColumnArg::Unsupported(expr) => {
                return Err(DoctransError::unsupported(format!(
                    "column argument `{}` in `{}`",
                    expr_to_source(expr),
                    source()
                )))
            }
        }
    }
    let name = name.ok_or_else(|| {
        DoctransError::unsupported(format!("column without a name: `{}`", source()))
    })?;

    for keyword in &call.keywords {
        if !keyword
            .arg
            .as_deref()
            .is_some_and(|arg| COLUMN_KEYWORDS.contains(&arg))
        {
            warn!(
                column = %name,
                keyword = keyword.arg.as_deref().unwrap_or("**"),
                "Ignoring unrecognized Column keyword"
            );
        }
    }

    let nullable = matches!(
        call.keyword("nullable"),
        Some(Expr::Constant(Constant::Bool(true)))
    );
    let typ = match typ {
        Some(t) if nullable => Some(make_optional(&t)),
        other => other,
    };

    let mut doc = call
        .keyword("doc")
        .or_else(|| call.keyword("comment"))
        .and_then(Expr::as_str)
        .map(str::to_string);
    let default = if foreign_keys.is_empty() {
        call.keyword("default")
            .or_else(|| call.keyword("server_default"))
            .map(DefaultValue::from_expr)
    } else {
        let markers: Vec<String> = foreign_keys.iter().map(|t| foreign_key_marker(t)).collect();
        let markers = markers.join(" ");
        doc = Some(match doc {
            Some(d) => format!("{d} {markers}"),
            None => markers,
        });
        None
    };

    Ok((name, ParamVal { typ, doc, default }))
}

/// Parse `Table('name', metadata, Column(...), ..., comment='...')`
pub fn sqlalchemy_table(call: &Call) -> Result<IntermediateRepr> {
    if call.callee_name() != Some("Table") {
        return Err(DoctransError::unsupported(format!(
            "expected a Table call: `{}`",
            expr_to_source(&Expr::Call(call.clone()))
        )));
    }
    let mut ir = IntermediateRepr {
        name: call.args.first().and_then(Expr::as_str).map(str::to_string),
        doc: call.keyword("comment").and_then(Expr::as_str).map(str::to_string),
        ..IntermediateRepr::default()
    };
    debug!(table = ?ir.name, "Parsing table");

    for arg in call.args.iter().skip(1) {
        match arg.as_call() {
            Some(column) if column.callee_name() == Some("Column") => {
                let (name, param) = column_call_to_param(column)?;
                ir.params.insert(name, param);
            }
            _ => debug!(argument = %expr_to_source(arg), "Skipping non-column table argument"),
        }
    }
    Ok(ir)
}

/// Parse a declarative class whose fields are `name = Column(...)`
pub fn sqlalchemy_class(class: &ClassDef, options: &ParseOptions) -> Result<IntermediateRepr> {
    debug!(name = %class.name, "Parsing declarative class");
    let mut structural = IntermediateRepr::named(class.name.clone());
    for stmt in &class.body {
        let Stmt::Assign {
            target: Expr::Name(field),
            value: Expr::Call(call),
        } = stmt
        else {
            continue;
        };
        if call.callee_name() != Some("Column") {
            continue;
        }
        let call = column_call_name_manipulator(call.clone(), NameOperation::Rename(field.clone()));
        let (name, param) = column_call_to_param(&call)?;
        structural.params.insert(name, param);
    }

    let mut ir = match documented_ir(&class.body, options) {
        Some((documented, _)) => reconcile::merge(structural, documented),
        None => structural,
    };
    if options.infer_type {
        infer::fill_missing_types(&mut ir);
    }
    Ok(ir)
}
