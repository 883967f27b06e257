// Entrypoint for the CLI application.
// - `upload` sends one file without prompting and exits non-zero on failure.
// - Without a subcommand the interactive menu from `ui` takes over.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tbl_evidence::{ui, ClientConfig, EvidenceClient, EvidenceRequest};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tbl-evidence", version, about = "Upload evidence to Tugboat Logic collector endpoints")]
struct Cli {
    /// Credential file downloaded from the custom integration page
    #[arg(long, short = 'c', global = true)]
    credentials: Option<PathBuf>,

    /// Log each step of the upload
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a single evidence file
    Upload {
        /// File to upload
        #[arg(long, short = 'f')]
        file: PathBuf,

        /// MIME type of the file (text/plain, text/csv, image/jpeg, ...)
        #[arg(long = "type", short = 't')]
        mime_type: String,

        /// Collector URL, or several separated by commas
        #[arg(long, short = 'u')]
        url: String,

        /// Collected date, YYYY-MM-DD; defaults to today
        #[arg(long)]
        collected: Option<String>,
    },
}

fn init_tracing(debug: bool) {
    let default = if debug { "tbl_evidence=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_client(credentials: PathBuf, debug: bool) -> anyhow::Result<EvidenceClient> {
    let config = ClientConfig::builder()
        .credential_file(&credentials)
        .debug(debug)
        .build()
        .with_context(|| format!("Failed to load credentials from {}", credentials.display()))?;
    Ok(EvidenceClient::new(config)?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Some(Command::Upload {
            file,
            mime_type,
            url,
            collected,
        }) => {
            let creds = cli
                .credentials
                .unwrap_or_else(|| PathBuf::from(ui::DEFAULT_CREDENTIAL_FILE));
            let client = build_client(creds, cli.debug)?;
            let mut req = EvidenceRequest::new(file, mime_type, &url);
            req.collected = collected;
            let result = client.submit(&req);
            ui::report(&result);
            result?;
        }
        None => {
            // An explicit --credentials flag is loaded up front; otherwise
            // the menu asks for it.
            let client = match cli.credentials {
                Some(path) => Some(build_client(path, cli.debug)?),
                None => None,
            };
            ui::main_menu(client, cli.debug)?;
        }
    }
    Ok(())
}
