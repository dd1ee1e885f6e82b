//! sqlstencil CLI - prepare and render SQL templates
//!
//! Usage:
//!   sqlstencil prepare <template.sql> --entity <name> [--dialect <dialect>]
//!   sqlstencil render <template.sql> --entity <name> [--params <json>]
//!   sqlstencil dialects
//!
//! Examples:
//!   sqlstencil prepare queries/active_users.sql --entity User --dialect sqlserver
//!   sqlstencil render queries/active_users.sql --entity User --params '{"take": 10}'
//!   echo 'SELECT {{columns}} FROM {{table}}' | sqlstencil prepare - --entity User

use clap::{Parser, Subcommand, ValueEnum};
use sqlstencil::config::Settings;
use sqlstencil::sql::{Dialect, SqlDialect};
use sqlstencil::template::{prepare, Params, PlaceholderContext, PreparedTemplate};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sqlstencil")]
#[command(about = "sqlstencil - SQL templates and expression translation for multiple dialects")]
#[command(version)]
struct Cli {
    /// Config file (defaults to SQLSTENCIL_CONFIG, then ./sqlstencil.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepare a template and print its static SQL
    Prepare {
        #[command(flatten)]
        template: TemplateArgs,

        /// Output format
        #[arg(short, long, default_value = "sql")]
        output: OutputFormat,
    },

    /// Prepare and render a template with runtime parameters
    Render {
        #[command(flatten)]
        template: TemplateArgs,

        /// Runtime parameters as a JSON object
        #[arg(short, long)]
        params: Option<String>,
    },

    /// List supported dialects
    Dialects,
}

#[derive(clap::Args)]
struct TemplateArgs {
    /// Path to the template file, or `-` for stdin
    file: PathBuf,

    /// Entity whose catalog the template is prepared against
    #[arg(short, long)]
    entity: String,

    /// SQL dialect (overrides the config default)
    #[arg(short, long)]
    dialect: Option<Dialect>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Output SQL only
    Sql,
    /// Output SQL with comments describing runtime inputs
    Verbose,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Prepare { template, output } => {
            load_template(cli.config, &template).map(|t| print_prepared(&t, output))
        }
        Commands::Render { template, params } => {
            load_template(cli.config, &template).and_then(|t| cmd_render(&t, params))
        }
        Commands::Dialects => {
            cmd_dialects();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_template(
    config: Option<PathBuf>,
    args: &TemplateArgs,
) -> Result<PreparedTemplate, Box<dyn std::error::Error>> {
    let settings = match config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::load()?,
    };

    let text = if args.file.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        text
    } else {
        fs::read_to_string(&args.file)
            .map_err(|e| format!("reading '{}': {}", args.file.display(), e))?
    };

    let dialect = args.dialect.unwrap_or(settings.dialect);
    let ctx = PlaceholderContext::new(dialect, settings.catalog(&args.entity)?);
    Ok(prepare(&text, &ctx)?)
}

fn print_prepared(template: &PreparedTemplate, output: OutputFormat) {
    match output {
        OutputFormat::Sql => println!("{}", template.sql()),
        OutputFormat::Verbose => {
            println!("-- sqlstencil prepared SQL");
            println!("-- Dialect: {}", template.dialect());
            if !template.parameter_names().is_empty() {
                println!("-- Bind parameters: {}", template.parameter_names().join(", "));
            }
            if template.has_dynamic_placeholders() {
                println!("-- Runtime keys: {}", template.runtime_keys().join(", "));
            }
            println!();
            println!("{}", template.sql());
        }
    }
}

fn cmd_render(
    template: &PreparedTemplate,
    params: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let params: Option<Params> = params.as_deref().map(serde_json::from_str).transpose()?;
    println!("{}", template.render(params.as_ref())?);
    Ok(())
}

fn cmd_dialects() {
    for dialect in Dialect::ALL {
        let example = dialect.format_parameter("id");
        println!(
            "{:<10} params: {:<4} pagination: {:?}",
            dialect.to_string(),
            example,
            dialect.pagination_style()
        );
    }
}
