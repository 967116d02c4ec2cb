//! taglint CLI
//!
//! Command-line interface for checking struct field tags in front-end model exports

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use taglint_core::{Dialect, Result, init_tracing};
use tracing::error;

#[derive(Parser)]
#[command(name = "taglint")]
#[command(about = "taglint: static checks for json, bson and binding struct tags")]
#[command(version = taglint_core::VERSION)]
#[command(
    long_about = "taglint checks the struct field tags found in front-end model exports\n\
(*.taglint.json / *.taglint.yaml) against the json, bson and binding dialects.\n\
\n\
Examples:\n  \
taglint check                      # Check exports under the current directory\n  \
taglint check --dialect json out/  # Only run the json rules\n  \
taglint check --fix .              # Rewrite redundant json tag names\n  \
taglint rules                      # List all available rules\n  \
taglint config schema              # Print the configuration JSON Schema"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.taglintrc.json/.taglintrc.toml/taglint.yaml)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check struct tags in model exports
    Check {
        /// Export files or directories to check
        #[arg(help = "Exports or directories (default: current directory)")]
        paths: Vec<PathBuf>,

        /// Dialects to check (repeatable)
        #[arg(short, long, value_enum, help = "Only check these dialects")]
        dialect: Vec<DialectArg>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Apply safe fixes to the referenced source files
        #[arg(long, help = "Apply safe fixes in place")]
        fix: bool,

        /// Print a unified diff of the fixes without writing
        #[arg(long, help = "Show fixes as a diff without writing")]
        diff: bool,

        /// Include patterns (glob)
        #[arg(long, help = "Include patterns (replace configured ones)")]
        include: Vec<String>,

        /// Exclude patterns (glob)
        #[arg(long, help = "Exclude patterns (replace configured ones)")]
        exclude: Vec<String>,
    },

    /// List available rules
    Rules {
        /// Only list rules of this dialect
        #[arg(short, long, value_enum)]
        dialect: Option<DialectArg>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: ListFormat,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the JSON Schema of the configuration file
    Schema,
    /// Show the configuration in effect
    Show,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable output with code frames
    Human,
    /// JSON output
    Json,
    /// SARIF output for CI integration
    Sarif,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
enum ListFormat {
    Human,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
enum DialectArg {
    Json,
    Bson,
    Binding,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Json => Dialect::Json,
            DialectArg::Bson => Dialect::Bson,
            DialectArg::Binding => Dialect::Binding,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize colored output
    if !cli.no_color && std::env::var("NO_COLOR").is_err() {
        colored::control::set_override(true);
    } else {
        colored::control::set_override(false);
    }

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "taglint=error",
        1 => "taglint=warn",
        2 => "taglint=info",
        3 => "taglint=debug",
        _ => "taglint=trace",
    };
    init_tracing(log_level);

    match run_command(cli) {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("taglint failed: {}", e);
            std::process::exit(2);
        }
    }
}

/// Run the selected command; `Ok(false)` means diagnostics remain
fn run_command(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Check {
            paths,
            dialect,
            format,
            fix,
            diff,
            include,
            exclude,
        } => commands::check_command(commands::CheckOptions {
            paths,
            dialects: dialect.into_iter().map(Dialect::from).collect(),
            format,
            fix,
            diff,
            include,
            exclude,
            config_path: cli.config,
            use_colors: !cli.no_color,
        }),
        Commands::Rules { dialect, format } => {
            commands::rules_command(dialect.map(Dialect::from), format, cli.config)?;
            Ok(true)
        }
        Commands::Config { action } => {
            match action {
                ConfigAction::Schema => commands::config_schema_command()?,
                ConfigAction::Show => commands::config_show_command(cli.config)?,
            }
            Ok(true)
        }
    }
}
