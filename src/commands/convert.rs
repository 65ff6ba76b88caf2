use super::read_input;
use crate::cli::{SourceKind, TargetKind};
use crate::config::{load_config, DoctransConfig};
use crate::core::{DocstringFormat, IntermediateRepr};
use crate::docstring::{self, emit_docstring, FieldWord};
use crate::emit;
use crate::parse;
use crate::syntax::{expr_to_source, find_call, find_class, find_function, parse_module, to_source};
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use tracing::info;

/// Everything `doctrans convert` was asked to do
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub input: PathBuf,
    pub from: SourceKind,
    pub to: TargetKind,
    pub name: Option<String>,
    pub method: Option<String>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub inline_types: Option<bool>,
    pub no_default_doc: bool,
    pub kwonly: bool,
    pub infer_type: bool,
    /// Input dialect only; emission keeps `emit.docstring_format`
    pub docstring_format: Option<DocstringFormat>,
}

impl ConvertConfig {
    /// File configuration with command-line flags applied on top
    fn effective_config(&self) -> DoctransConfig {
        let mut config = load_config(self.config.as_deref());
        if let Some(inline_types) = self.inline_types {
            config.emit.inline_types = inline_types;
        }
        if self.no_default_doc {
            config.emit.emit_default_doc = false;
        }
        if self.kwonly {
            config.emit.emit_as_kwonlyargs = true;
        }
        if self.infer_type {
            config.parse.infer_type = true;
        }
        if self.docstring_format.is_some() {
            config.parse.docstring_format = self.docstring_format;
        }
        config
    }
}

fn not_found(what: &str, name: Option<&str>) -> anyhow::Error {
    match name {
        Some(name) => anyhow!("No {what} named `{name}` in input"),
        None => anyhow!("No {what} in input"),
    }
}

/// Parse the input text into an IR
pub fn read_ir(
    source: &str,
    from: SourceKind,
    name: Option<&str>,
    method: Option<&str>,
    options: &parse::ParseOptions,
) -> Result<IntermediateRepr> {
    let module = || parse_module(source).context("Failed to parse Python input");
    let ir = match from {
        SourceKind::Docstring => docstring::parse_docstring(source, options.docstring_format),
        SourceKind::Argparse => {
            let stmts = module()?;
            let def = find_function(&stmts, name).ok_or_else(|| not_found("function", name))?;
            parse::argparse_function(def, options)?
        }
        SourceKind::Function => {
            let stmts = module()?;
            let def = find_function(&stmts, name).ok_or_else(|| not_found("function", name))?;
            parse::function(def, options)?
        }
        SourceKind::Class => {
            let stmts = module()?;
            let class = find_class(&stmts, name).ok_or_else(|| not_found("class", name))?;
            match method {
                Some(method) => parse::class_with_method(class, method, options)?,
                None => parse::class_(class, options)?,
            }
        }
        SourceKind::SqlalchemyClass => {
            let stmts = module()?;
            let class = find_class(&stmts, name).ok_or_else(|| not_found("class", name))?;
            parse::sqlalchemy_class(class, options)?
        }
        SourceKind::SqlalchemyTable => {
            let stmts = module()?;
            let call = find_call(&stmts, "Table").ok_or_else(|| not_found("Table call", None))?;
            parse::sqlalchemy_table(call)?
        }
    };
    Ok(ir)
}

/// Render an IR in the target representation
pub fn write_ir(ir: &IntermediateRepr, to: TargetKind, config: &DoctransConfig) -> Result<String> {
    let rendered = match to {
        TargetKind::Ir => serde_json::to_string_pretty(ir).context("Failed to serialize IR")? + "\n",
        TargetKind::Docstring => {
            emit_docstring(ir, &config.emit.docstring_options(FieldWord::Param))? + "\n"
        }
        TargetKind::Argparse => to_source(&emit::argparse_function(ir, &config.emit)?),
        TargetKind::Function => to_source(&emit::function(ir, &config.emit)?),
        TargetKind::Class => to_source(&emit::class_(ir, &config.emit, &config.class)?),
        TargetKind::SqlalchemyTable => {
            let table = emit::sqlalchemy_table(ir, &config.table)?;
            format!("{} = {}\n", table_variable(ir, config), expr_to_source(&table))
        }
    };
    Ok(rendered)
}

fn table_variable(ir: &IntermediateRepr, config: &DoctransConfig) -> String {
    config
        .table
        .table_name
        .as_deref()
        .or(ir.name.as_deref())
        .map_or_else(|| "table".to_string(), |name| format!("{name}_tbl"))
}

/// Run `doctrans convert`
pub fn convert(request: ConvertConfig) -> Result<()> {
    let config = request.effective_config();
    let source = read_input(&request.input)?;

    let ir = read_ir(
        &source,
        request.from,
        request.name.as_deref(),
        request.method.as_deref(),
        &config.parse,
    )
    .with_context(|| format!("Failed to read {:?} from {}", request.from, request.input.display()))?;
    info!(params = ir.params.len(), "Parsed input");

    let rendered = write_ir(&ir, request.to, &config)
        .with_context(|| format!("Failed to emit {:?}", request.to))?;

    match &request.output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{rendered}"),
    }
    Ok(())
}
