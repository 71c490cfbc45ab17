use clap::{Parser, Subcommand};
use colored::Colorize;
use sheetmark::cli;
use sheetmark::config::SheetmarkConfig;
use sheetmark::error::SheetmarkError;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sheetmark")]
#[command(about = "Import .txt/.docx/.xlsx into editor HTML and export it back.")]
#[command(long_about = "Sheetmark - document import/export for an HTML rich-text editor

COMMANDS:
  import  - .txt / .docx / .xlsx → editor HTML
  export  - editor HTML → .txt / .docx / .xlsx

EXAMPLES:
  sheetmark import report.docx -o report.html
  sheetmark import intro.txt budget.xlsx -o page.html   # text, then table appended
  sheetmark import budget.xlsx --json                   # merged layout as JSON
  sheetmark export page.html table.xlsx                 # first table only")]
#[command(version)]
struct Cli {
    /// YAML config file (table attributes, sheet index, export names)
    #[arg(long, global = true, env = "SHEETMARK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Import files into one editor document.

Files are applied in order, like successive uploads:
  .txt   replaces the content (one paragraph per line)
  .docx  replaces the content (headings, lists, bold/italic, tables)
  .xlsx  appends a table; merged cells become rowspan/colspan

The suffix match is case-sensitive.")]
    /// Import .txt/.docx/.xlsx files into editor HTML
    Import {
        /// Input files (.txt, .docx, .xlsx)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit the imported spreadsheet tables as JSON instead of HTML
        #[arg(long)]
        json: bool,

        /// Show verbose import steps
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Export editor HTML to a file.

The output suffix, or --format, picks the format:
  .txt   block text separated by a blank line
  .docx  Word document
  .xlsx  first table, flattened row by row (merges are not rebuilt)

An existing directory as output receives the configured default name
(table.xlsx, document.docx, document.txt).

Exits with code 2 when an .xlsx export finds no table.")]
    /// Export editor HTML to .txt/.docx/.xlsx
    Export {
        /// HTML file holding the editor content
        input: PathBuf,

        /// Output file (.txt, .docx, .xlsx) or directory
        output: PathBuf,

        /// Format to write regardless of the output suffix (txt, docx, xlsx)
        #[arg(short, long)]
        format: Option<String>,

        /// Show verbose export steps
        #[arg(short, long)]
        verbose: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "sheetmark=debug" } else { "sheetmark=warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Commands::Import { verbose, .. } | Commands::Export { verbose, .. } => *verbose,
    };
    init_tracing(verbose);

    let config = match SheetmarkConfig::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "❌ Config error:".bold().red(), e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Import {
            inputs,
            output,
            json,
            verbose,
        } => cli::import(inputs, output, json, config, verbose),
        Commands::Export {
            input,
            output,
            format,
            verbose,
        } => cli::export(input, output, format, config, verbose),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(SheetmarkError::NoTableToExport) = e.downcast_ref::<SheetmarkError>() {
                eprintln!("{}", "⚠️  No tables to export".bold().yellow());
                return ExitCode::from(2);
            }
            eprintln!("{} {:#}", "❌ Error:".bold().red(), e);
            ExitCode::FAILURE
        }
    }
}
