mod commands;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Language server and checker for Hyprland configuration files.
#[derive(Parser)]
#[command(
    name = "hyprls",
    version,
    about = "Language server and checker for Hyprland configuration files"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log at debug level unless HYPRLS_LOG or RUST_LOG say otherwise
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Also append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Language Server Protocol server over stdio
    Serve,

    /// Print the section tree of a configuration file
    Parse {
        /// Path to the configuration file
        file: PathBuf,
    },

    /// Check section nesting and variable types of a configuration file
    Check {
        /// Path to the configuration file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose, cli.log_file.as_deref()) {
        report_error(
            &format!("cannot initialise logging: {}", e),
            cli.output,
            cli.quiet,
        );
        process::exit(1);
    }

    match cli.command {
        Commands::Serve => {
            tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting language server");
            if let Err(e) = hyprls_lsp::run() {
                tracing::error!(error = %e, "language server stopped");
                eprintln!("LSP server error: {}", e);
                process::exit(1);
            }
        }
        Commands::Parse { file } => {
            commands::parse::cmd_parse(&file, cli.output, cli.quiet);
        }
        Commands::Check { file } => {
            commands::check::cmd_check(&file, cli.output, cli.quiet);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
