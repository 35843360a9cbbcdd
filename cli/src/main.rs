use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use rsvp_cli::{logging, render_table, App, AppConfig};
use rsvp_core::{AddEncoding, Attendance, ExportFormat, NewEntry, SubmissionState};
use tracing::debug;

/// Collect and review wedding RSVPs stored in a spreadsheet script
#[derive(Parser)]
#[command(name = "rsvp")]
#[command(version)]
struct Cli {
    /// Path to configuration file (defaults to ./rsvp.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one RSVP to the store
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, value_enum, default_value_t = AttendingArg::Yes)]
        attending: AttendingArg,
        #[arg(long, default_value_t = 0)]
        guests: u32,
        #[arg(long, default_value = "")]
        message: String,
        /// Send as a JSON POST instead of the configured encoding
        #[arg(long)]
        post: bool,
    },
    /// List every RSVP collected so far
    List {
        #[arg(long)]
        admin_code: Option<String>,
        #[arg(long, value_enum, default_value_t = ListFormat::Table)]
        format: ListFormat,
    },
    /// Download the RSVP list as a spreadsheet
    Export {
        #[arg(long)]
        admin_code: Option<String>,
        #[arg(long, value_enum, default_value_t = ExportArg::Xlsx)]
        format: ExportArg,
        /// Directory to write the file into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Show whether the store is configured and what an admin would see
    Status {
        #[arg(long)]
        admin_code: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AttendingArg {
    Yes,
    No,
}

impl From<AttendingArg> for Attendance {
    fn from(arg: AttendingArg) -> Self {
        match arg {
            AttendingArg::Yes => Attendance::Yes,
            AttendingArg::No => Attendance::No,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ListFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportArg {
    Xlsx,
    Csv,
}

impl From<ExportArg> for ExportFormat {
    fn from(arg: ExportArg) -> Self {
        match arg {
            ExportArg::Xlsx => ExportFormat::Xlsx,
            ExportArg::Csv => ExportFormat::Csv,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    match cli.verbose {
        0 => {}
        1 => config.logging.level = "info".to_string(),
        2 => config.logging.level = "debug".to_string(),
        _ => config.logging.level = "trace".to_string(),
    }
    logging::init_logging(&config.logging);
    debug!(configured = config.store.endpoint_url.is_some(), "configuration loaded");

    let mut app = App::from_config(&config)?;

    match cli.command {
        Commands::Submit {
            name,
            email,
            attending,
            guests,
            message,
            post,
        } => {
            let entry = NewEntry {
                name,
                email,
                attending: attending.into(),
                guests,
                message,
                timestamp: None,
            };
            let state = if post {
                app.submit_encoded(entry, AddEncoding::JsonBody)
            } else {
                app.submit(entry)
            };
            match state {
                SubmissionState::Success => println!("Thank you! Your RSVP has been saved."),
                SubmissionState::Error(message) => {
                    eprintln!("{message}");
                    return Ok(ExitCode::FAILURE);
                }
                other => debug!(state = ?other, "submission did not finish"),
            }
        }
        Commands::List { admin_code, format } => {
            let entries = app.list(admin_code.as_deref())?;
            match format {
                ListFormat::Table => println!("{}", render_table(&entries)),
                ListFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
            }
        }
        Commands::Export { admin_code, format, out } => {
            let path = app.export(admin_code.as_deref(), format.into(), &out)?;
            println!("{}", path.display());
        }
        Commands::Status { admin_code } => {
            let status = app.status(admin_code.as_deref());
            println!("{}", serde_json::to_string_pretty(&status)?);
            if let Some(warning) = status.sheets_warning {
                eprintln!("warning: {warning}");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
