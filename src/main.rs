use clap::{Parser, Subcommand};
use sheetpass::cli;
use sheetpass::error::SheetpassResult;
use sheetpass::types::SupportedFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheetpass")]
#[command(about = "Load a CSV or Excel table and save it again as CSV or Excel.")]
#[command(long_about = "sheetpass - CSV / Excel passthrough

Loads one table at a time from a .csv or .xlsx file (first worksheet) and
writes it back out as CSV or Excel. Column order is kept, no index column
is added. A table can be saved once per load.

COMMANDS:
  convert   - Load INPUT and save it as OUTPUT
  inspect   - Show columns, inferred types and the first rows
  session   - Interactive open / drop / save loop on stdin

EXAMPLES:
  sheetpass convert data.csv data.xlsx
  sheetpass convert report.xlsx export --to csv     # writes export.csv
  sheetpass inspect data.csv --rows 10
  sheetpass session

Logging goes to stderr; set RUST_LOG (e.g. RUST_LOG=sheetpass=debug) to tune it.")]
#[command(version)]
struct Cli {
    /// Show verbose output and debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Load INPUT (.csv or .xlsx) and save it as OUTPUT.

The output format comes from OUTPUT's extension unless --to is given.
If OUTPUT has no extension, --to is required and the extension is appended.

EXAMPLES:
  sheetpass convert survey.csv survey.xlsx
  sheetpass convert budget.xlsx budget.csv
  sheetpass convert budget.xlsx out --to csv")]
    /// Convert a CSV or Excel file to CSV or Excel
    Convert {
        /// Input file (.csv or .xlsx)
        input: PathBuf,

        /// Output file
        output: PathBuf,

        /// Output format (csv or xlsx); defaults to OUTPUT's extension
        #[arg(short, long)]
        to: Option<SupportedFormat>,
    },

    /// Show columns, inferred types and the first rows of a file
    Inspect {
        /// Input file (.csv or .xlsx)
        input: PathBuf,

        /// Number of rows to preview
        #[arg(short, long, default_value = "5")]
        rows: usize,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    #[command(long_about = "Interactive session over stdin, one command per line.

COMMANDS:
  open <path>              Load a .csv or .xlsx file
  drop <payload>           Load a drag-and-drop path ({...} quoting allowed)
  save <csv|xlsx> <path>   Save the loaded table, then clear it
  status                   Show the drop-zone status
  preview [rows]           Show columns and the first rows
  reset                    Discard the loaded table
  quit                     Leave the session")]
    /// Interactive open / drop / save session
    Session,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "sheetpass=debug"
    } else {
        "sheetpass=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> SheetpassResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert { input, output, to } => cli::convert(input, output, to, cli.verbose),

        Commands::Inspect { input, rows, json } => cli::inspect(input, rows, json),

        Commands::Session => cli::session(),
    }
}
