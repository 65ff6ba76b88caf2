//! IR to a SQLAlchemy `Table(...)` call

use crate::core::errors::{DoctransError, Result};
use crate::core::ir::{IntermediateRepr, ParamVal};
use crate::core::types::{split_top_level, strip_optional, unwrap_generic};
use crate::syntax::{Call, Constant, Expr, Keyword};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

static FK_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\[FK\((?P<target>[^)]*)\)\]").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Overrides the name taken from the IR
    pub table_name: Option<String>,
    pub metadata_name: String,
    /// Primary key column; the first column when absent
    pub primary_key: Option<String>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            table_name: None,
            metadata_name: "metadata".to_string(),
            primary_key: None,
        }
    }
}

/// Column type expression for a Python type
fn column_type(name: &str, typ: &str) -> Result<Expr> {
    if let Some(inner) = unwrap_generic(typ, &["List", "list"]) {
        return Ok(Expr::call(
            Expr::name("ARRAY"),
            vec![column_type(name, inner)?],
            Vec::new(),
        ));
    }
    if let Some(values) = unwrap_generic(typ, &["Literal"]) {
        return Ok(Expr::call(
            Expr::name("Enum"),
            split_top_level(values, ',')
                .into_iter()
                .map(|v| Expr::Raw(v.to_string()))
                .collect(),
            vec![Keyword::new("name", Expr::str(name))],
        ));
    }
    let sql = match typ {
        "str" => "String",
        "int" => "Integer",
        "bool" => "Boolean",
        "float" => "Float",
        "dict" => "JSON",
        "bytes" => "LargeBinary",
        "datetime" => "DateTime",
        "date" => "Date",
        other => {
            return Err(DoctransError::unsupported(format!(
                "no column type for `{other}` (column `{name}`)"
            )))
        }
    };
    Ok(Expr::name(sql))
}

/// Build `Column(...)` for one parameter
pub fn param_to_column(name: &str, param: &ParamVal, primary_key: bool) -> Result<Call> {
    let mut args = vec![Expr::str(name)];
    let mut keywords = Vec::new();

    let (typ, nullable) = match param.typ.as_deref() {
        Some(typ) => match strip_optional(typ) {
            Some(inner) => (inner, true),
            None => (typ, false),
        },
        None => {
            debug!(column = name, "Untyped column emitted as String");
            ("str", false)
        }
    };
    args.push(column_type(name, typ)?);

    let mut doc = param.doc.clone();
    if let Some(text) = doc.take() {
        for captures in FK_MARKER.captures_iter(&text) {
            if let Some(target) = captures.name("target") {
                args.push(Expr::call(
                    Expr::name("ForeignKey"),
                    vec![Expr::str(target.as_str())],
                    Vec::new(),
                ));
            }
        }
        let stripped = FK_MARKER.replace_all(&text, "").trim().to_string();
        doc = (!stripped.is_empty()).then_some(stripped);
    }

    keywords.extend(doc.map(|d| Keyword::new("doc", Expr::str(d))));
    keywords.extend(
        param
            .default
            .as_ref()
            .map(|d| Keyword::new("default", d.to_expr())),
    );
    if nullable {
        keywords.push(Keyword::new("nullable", Expr::Constant(Constant::Bool(true))));
    }
    if primary_key {
        keywords.push(Keyword::new("primary_key", Expr::Constant(Constant::Bool(true))));
    }

    Ok(Call {
        func: Box::new(Expr::name("Column")),
        args,
        keywords,
    })
}

/// Emit `Table('name', metadata, Column(...), ..., comment='...')`
pub fn sqlalchemy_table(ir: &IntermediateRepr, options: &TableOptions) -> Result<Expr> {
    let name = options
        .table_name
        .clone()
        .or_else(|| ir.name.clone())
        .ok_or_else(|| DoctransError::unsupported("table without a name"))?;
    debug!(table = %name, columns = ir.params.len(), "Emitting table");

    let primary_key = options
        .primary_key
        .as_deref()
        .or_else(|| ir.params.keys().next());

    let mut args = vec![Expr::str(name), Expr::name(&options.metadata_name)];
    for (column, param) in ir.params.iter() {
        args.push(Expr::Call(param_to_column(
            column,
            param,
            primary_key == Some(column),
        )?));
    }

    let keywords = ir
        .doc
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| Keyword::new("comment", Expr::str(d)))
        .into_iter()
        .collect();
    Ok(Expr::call(Expr::name("Table"), args, keywords))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::values::DefaultValue;
    use crate::parse::sqlalchemy::{column_call_to_param, sqlalchemy_table as parse_table};
    use crate::syntax::expr_to_source;
    use pretty_assertions::assert_eq;

    fn sample() -> IntermediateRepr {
        IntermediateRepr::named("config_tbl")
            .with_doc("Acquire")
            .with_param(
                "dataset_name",
                ParamVal::new()
                    .with_typ("str")
                    .with_doc("name of dataset")
                    .with_default(DefaultValue::Str("mnist".into())),
            )
            .with_param(
                "K",
                ParamVal::new()
                    .with_typ("Literal['np', 'tf']")
                    .with_default(DefaultValue::Str("np".into())),
            )
            .with_param(
                "owner",
                ParamVal::new()
                    .with_typ("Optional[int]")
                    .with_doc("owner [FK(user.id)]"),
            )
    }

    #[test]
    fn test_table_source() {
        assert_eq!(
            expr_to_source(&sqlalchemy_table(&sample(), &TableOptions::default()).unwrap()),
            "Table('config_tbl', metadata, \
             Column('dataset_name', String, doc='name of dataset', default='mnist', primary_key=True), \
             Column('K', Enum('np', 'tf', name='K'), default='np'), \
             Column('owner', Integer, ForeignKey('user.id'), doc='owner', nullable=True), \
             comment='Acquire')"
        );
    }

    #[test]
    fn test_table_round_trip() {
        let Expr::Call(call) = sqlalchemy_table(&sample(), &TableOptions::default()).unwrap() else {
            panic!("expected call");
        };
        assert_eq!(parse_table(&call).unwrap(), sample());
    }

    #[test]
    fn test_column_round_trip() {
        let param = ParamVal::new()
            .with_typ("Optional[List[float]]")
            .with_doc("weights");
        let column = param_to_column("weights", &param, false).unwrap();
        assert_eq!(column_call_to_param(&column).unwrap(), ("weights".to_string(), param));
    }

    #[test]
    fn test_unknown_type_is_unsupported() {
        let param = ParamVal::new().with_typ("Union[int, str]");
        assert!(matches!(
            param_to_column("x", &param, false),
            Err(DoctransError::UnsupportedConstruct(_))
        ));
    }
}
