// UI layer: provides a simple interactive menu using `dialoguer`.
// The functions are small and synchronous to make the flow easy to follow.

use crate::api::{EvidenceClient, EvidenceRequest};
use crate::config::ClientConfig;
use crate::error::Error;
use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

/// Credential file name offered by the vendor's integration page.
pub const DEFAULT_CREDENTIAL_FILE: &str = "http-headers.json";

/// MIME types offered in the upload flow. The last entry lets the user
/// type anything else.
const MIME_CHOICES: &[&str] = &[
    "text/plain",
    "text/csv",
    "image/jpeg",
    "image/png",
    "application/pdf",
    "other...",
];

/// Main interactive menu. `client` is `None` until credentials have been
/// loaded; uploading is refused until then.
pub fn main_menu(mut client: Option<EvidenceClient>, debug: bool) -> Result<()> {
    loop {
        let items = vec!["Load credentials", "Upload evidence", "Exit"];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => {
                if let Some(c) = handle_load_credentials(debug)? {
                    client = Some(c);
                }
            }
            1 => {
                let Some(c) = &client else {
                    println!("You should load credentials first.");
                    continue;
                };
                handle_upload(c)?;
            }
            2 => break,
            _ => {}
        }
    }
    Ok(())
}

/// Prompt for a credential file, defaulting to the last one that loaded.
fn handle_load_credentials(debug: bool) -> Result<Option<EvidenceClient>> {
    let default = load_last_credential_path()
        .unwrap_or_else(|_| DEFAULT_CREDENTIAL_FILE.to_string());
    let path: String = Input::new()
        .with_prompt("Credential file")
        .default(default)
        .interact_text()?;

    let config = ClientConfig::builder()
        .credential_file(&path)
        .debug(debug)
        .build();
    match config.and_then(EvidenceClient::new) {
        Ok(client) => {
            println!(
                "{}",
                format!("Loaded credentials for {}", client.config().credentials().username).green()
            );
            persist_credential_path(&path)?;
            Ok(Some(client))
        }
        Err(e) => {
            println!("{}", format!("Could not load credentials: {}", e).red());
            Ok(None)
        }
    }
}

/// Collect file, type and destinations, then upload with a spinner.
fn handle_upload(client: &EvidenceClient) -> Result<()> {
    let file: String = Input::new().with_prompt("Evidence file path").interact_text()?;
    let choice = Select::new()
        .with_prompt("File type")
        .items(MIME_CHOICES)
        .default(0)
        .interact()?;
    let mime_type = if choice == MIME_CHOICES.len() - 1 {
        Input::<String>::new().with_prompt("MIME type").interact_text()?
    } else {
        MIME_CHOICES[choice].to_string()
    };
    let urls: String = Input::new()
        .with_prompt("Collector URL(s), comma separated")
        .interact_text()?;
    let collected: String = Input::new()
        .with_prompt("Collected date (YYYY-MM-DD)")
        .default(crate::multipart::today())
        .interact_text()?;

    let req = EvidenceRequest::new(file, mime_type, &urls).collected(collected);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message("Uploading...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = client.submit(&req);
    spinner.finish_and_clear();

    report(&result);
    Ok(())
}

/// Print the outcome of an upload in color.
pub fn report(result: &crate::error::Result<()>) {
    match result {
        Ok(()) => println!("{}", "Evidence uploaded successfully.".green()),
        Err(Error::PartialSuccess {
            succeeded,
            total,
            last,
        }) => println!(
            "{}",
            format!(
                "Uploaded to {} of {} URLs, last error: {}",
                succeeded, total, last
            )
            .yellow()
        ),
        Err(e) => println!("{}", format!("Upload failed: {}", e).red()),
    }
}

fn state_file() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(".tbl_evidence")
}

/// Remember the credential file path in the user's home directory.
fn persist_credential_path(path: &str) -> Result<()> {
    let abs = std::fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path));
    std::fs::write(state_file(), abs.to_string_lossy().as_bytes())?;
    Ok(())
}

/// Load the remembered credential file path.
fn load_last_credential_path() -> Result<String> {
    let data = std::fs::read_to_string(state_file())?;
    let path = data.trim();
    if path.is_empty() {
        anyhow::bail!("no remembered credential file");
    }
    Ok(path.to_string())
}
