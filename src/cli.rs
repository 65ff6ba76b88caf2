use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "doctrans")]
#[command(
    about = "Convert between docstrings, argparse functions, classes and SQLAlchemy tables",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Increase verbosity level (can be repeated: -v, -vv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert one construct into another representation
    Convert {
        /// Python source or docstring file (`-` for stdin)
        input: PathBuf,

        /// Representation of the input
        #[arg(long, value_enum)]
        from: SourceKind,

        /// Representation to produce
        #[arg(long, value_enum)]
        to: TargetKind,

        /// Name of the function or class to read (the first one when omitted)
        #[arg(long)]
        name: Option<String>,

        /// Merge this method of the input class
        #[arg(long)]
        method: Option<String>,

        /// Configuration file (defaults to the nearest .doctrans.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Put types in annotations (`true`) or in docstring fields (`false`)
        #[arg(long)]
        inline_types: Option<bool>,

        /// Do not state defaults in descriptions
        #[arg(long)]
        no_default_doc: bool,

        /// Emit keyword-only function parameters
        #[arg(long)]
        kwonly: bool,

        /// Fill missing types from defaults and descriptions
        #[arg(long)]
        infer_type: bool,

        /// Docstring dialect of the input (detected when omitted). Emitted
        /// docstrings are always reST
        #[arg(long, value_enum)]
        docstring_format: Option<DialectArg>,
    },

    /// Report the dialect of a docstring
    Detect {
        /// Docstring file (`-` for stdin)
        input: PathBuf,
    },

    /// Write a default .doctrans.toml configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    Argparse,
    Class,
    Function,
    Docstring,
    SqlalchemyTable,
    SqlalchemyClass,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TargetKind {
    Argparse,
    Class,
    Function,
    Docstring,
    SqlalchemyTable,
    /// The intermediate representation as JSON
    Ir,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
    Rest,
    Google,
    Numpy,
}

impl From<DialectArg> for crate::core::DocstringFormat {
    fn from(dialect: DialectArg) -> Self {
        match dialect {
            DialectArg::Rest => Self::Rest,
            DialectArg::Google => Self::Google,
            DialectArg::Numpy => Self::Numpy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::parse_from([
            "doctrans",
            "convert",
            "in.py",
            "--from",
            "sqlalchemy-table",
            "--to",
            "ir",
            "--inline-types",
            "false",
            "-v",
        ]);
        assert_eq!(cli.verbosity, 1);
        match cli.command {
            Commands::Convert {
                from,
                to,
                inline_types,
                ..
            } => {
                assert_eq!(from, SourceKind::SqlalchemyTable);
                assert_eq!(to, TargetKind::Ir);
                assert_eq!(inline_types, Some(false));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
