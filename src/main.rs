use anyhow::Result;
use clap::Parser;
use doctrans::cli::{Cli, Commands};
use doctrans::commands::ConvertConfig;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("doctrans={default_level}")));

    if tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    match cli.command {
        Commands::Convert {
            input,
            from,
            to,
            name,
            method,
            config,
            output,
            inline_types,
            no_default_doc,
            kwonly,
            infer_type,
            docstring_format,
        } => doctrans::commands::convert(ConvertConfig {
            input,
            from,
            to,
            name,
            method,
            config,
            output,
            inline_types,
            no_default_doc,
            kwonly,
            infer_type,
            docstring_format: docstring_format.map(Into::into),
        }),
        Commands::Detect { input } => doctrans::commands::detect(&input),
        Commands::Init { force } => doctrans::commands::init_config(force),
    }
}
