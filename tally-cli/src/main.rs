use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tally_finance::{by_description, process_upload, write_csv, Dashboard, Upload};
use tally_ingest::SourceKind;
use tracing::info;

mod config;
mod dash;
mod logging;
mod report;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")"),
    about = "Bank statement dashboard for CSV and PDF exports"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Statement file (.csv or .pdf)
    file: PathBuf,

    /// Password for an encrypted PDF
    #[arg(long)]
    password: Option<String>,

    /// Override the format guessed from the extension (csv|pdf)
    #[arg(long)]
    format: Option<SourceKind>,

    /// Read ambiguous dates as month/day instead of day/month
    #[arg(long)]
    month_first: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Totals, net flow and closing balance
    Summary {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        json: bool,
    },

    /// Debit and credit totals per day
    Daily {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        json: bool,
    },

    /// Debit and credit totals per calendar month
    Monthly {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        json: bool,
    },

    /// Cumulative net amount per record
    Running {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        json: bool,
    },

    /// List records, optionally filtered by description
    Table {
        #[command(flatten)]
        input: InputArgs,

        /// Case-insensitive description substring
        #[arg(long)]
        search: Option<String>,

        /// Limit number of rows printed (default: 50)
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },

    /// Write the normalized statement as CSV
    Export {
        #[command(flatten)]
        input: InputArgs,

        /// Case-insensitive description substring
        #[arg(long)]
        search: Option<String>,

        /// Output path (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Interactive dashboard (TTY required)
    Dash {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Manage ~/.tally/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config (never overwrites)
    Init,

    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    logging::init(&cfg.log.filter);

    let symbol = cfg.display.currency_symbol.as_str();

    match cli.command {
        Command::Summary { input, json } => {
            let dash = load(&input, &cfg)?;
            if json {
                print_json(&dash.summary)?;
            } else {
                print!("{}", report::render_summary(&dash, symbol));
            }
        }

        Command::Daily { input, json } => {
            let dash = load(&input, &cfg)?;
            if json {
                print_json(&dash.daily)?;
            } else {
                print!("{}", report::render_daily(&dash));
            }
        }

        Command::Monthly { input, json } => {
            let dash = load(&input, &cfg)?;
            if json {
                print_json(&dash.monthly)?;
            } else {
                print!("{}", report::render_monthly(&dash));
            }
        }

        Command::Running { input, json } => {
            let dash = load(&input, &cfg)?;
            if json {
                print_json(&dash.running)?;
            } else {
                print!("{}", report::render_running(&dash));
            }
        }

        Command::Table {
            input,
            search,
            limit,
        } => {
            let dash = load(&input, &cfg)?;
            let filtered = by_description(&dash.statement, search.as_deref().unwrap_or(""));
            print!(
                "{}",
                report::render_table(&filtered, dash.statement.len(), limit)
            );
        }

        Command::Export { input, search, out } => {
            let dash = load(&input, &cfg)?;
            let filtered = by_description(&dash.statement, search.as_deref().unwrap_or(""));
            match out {
                Some(path) => {
                    let f = File::create(&path)
                        .with_context(|| format!("create {}", path.display()))?;
                    write_csv(&filtered, BufWriter::new(f))?;
                    println!("Wrote {} records to {}", filtered.len(), path.display());
                }
                None => {
                    let stdout = io::stdout();
                    write_csv(&filtered, stdout.lock())?;
                }
            }
        }

        Command::Dash { input } => {
            let dash = load(&input, &cfg)?;
            dash::run_dash(&dash, symbol)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config(&cfg)?,
        },
    }

    Ok(())
}

/// Read the file and run the whole pipeline
fn load(input: &InputArgs, cfg: &Config) -> Result<Dashboard> {
    let kind = match input.format {
        Some(kind) => kind,
        None => SourceKind::from_path(&input.file)
            .with_context(|| format!("cannot tell the format of {}", input.file.display()))?,
    };
    let bytes = state::read_upload(&input.file)?;

    let mut opts = cfg.pipeline_options();
    if input.month_first {
        opts.normalize.day_first = false;
    }

    let upload = Upload {
        kind,
        bytes: &bytes,
        password: input.password.as_deref(),
    };
    let dash = process_upload(&upload, &opts)
        .with_context(|| format!("process {}", input.file.display()))?;
    info!(path = %input.file.display(), records = dash.statement.len(), "loaded statement");
    Ok(dash)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("serialize json")?;
    writeln!(stdout)?;
    Ok(())
}
