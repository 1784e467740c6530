//! relsql: compile relational expression trees to SQL
//!
//! # Usage
//!
//! ```bash
//! # Compile a JSON tree with the configured dialect
//! relsql compile query.json
//!
//! # Pick a dialect and emit the full command as JSON
//! relsql compile query.json --dialect postgres --format json
//!
//! # List registered dialects
//! relsql dialects
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use relsql::prelude::*;
use tracing::Level;

#[derive(Parser)]
#[command(name = "relsql")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compile relational expression trees to dialect-specific SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    relsql compile query.json
    relsql compile query.json --dialect sqlserver --parameterize
    relsql compile - --format json < query.json")]
struct Cli {
    /// Config file (defaults to ./relsql.toml, then the user config dir)
    #[arg(short, long, env = "RELSQL_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Sql,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a JSON-encoded SELECT tree
    Compile {
        /// Path to the tree, or `-` for stdin
        input: String,

        /// Target dialect (overrides the config file)
        #[arg(short, long)]
        dialect: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "sql")]
        format: OutputFormat,

        /// Send literals as parameters too
        #[arg(short, long)]
        parameterize: bool,
    },
    /// List registered dialects
    Dialects,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = RelSqlConfig::load(cli.config.as_deref())?;
    let registry = config.registry();

    match &cli.command {
        Commands::Dialects => {
            for id in registry.ids() {
                let marker = if id == config.compiler.dialect { "*" } else { " " };
                println!("{} {}", marker.green(), id);
            }
        }
        Commands::Compile {
            input,
            dialect,
            format,
            parameterize,
        } => {
            let content = if input == "-" {
                std::io::read_to_string(std::io::stdin()).context("reading stdin")?
            } else {
                std::fs::read_to_string(input).with_context(|| format!("reading {}", input))?
            };
            let select: SelectExpr = serde_json::from_str(&content).context("parsing tree")?;

            let dialect = dialect.as_deref().unwrap_or(&config.compiler.dialect);
            let mut options = config.compile_options();
            options.parameterize_literals |= *parameterize;

            let output = registry.compile(dialect, &select, options)?;
            print_output(&output, *format)?;
        }
    }
    Ok(())
}

fn print_output(output: &CommandOutput, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(output)?),
        OutputFormat::Sql => {
            println!("{}", output.sql());
            if !output.parameters().is_empty() {
                println!();
                println!("{}", "Bindings:".cyan());
                for (i, binding) in output.parameters().iter().enumerate() {
                    let name = binding.name.as_deref().unwrap_or("-");
                    println!(
                        "  {} {} = {} ({})",
                        format!("#{}", i + 1).dimmed(),
                        name,
                        binding.value.to_string().yellow(),
                        binding.ty
                    );
                }
            }
        }
    }
    Ok(())
}
