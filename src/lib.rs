// Library root
// -----------
// Client for the Tugboat Logic evidence collector API. The binary
// (`main.rs`) is a thin front end over these modules.
//
// Module responsibilities:
// - `credentials`: loads and validates the integration's username,
//   password and API key.
// - `config`: applies configuration options into a `ClientConfig`.
// - `multipart`: encodes the evidence file and collected date as a
//   reusable multipart/form-data body.
// - `api`: sends the body to each collector URL and aggregates results.
// - `ui`: interactive terminal flows used when no subcommand is given.
pub mod api;
pub mod config;
pub mod credentials;
pub mod error;
pub mod multipart;
pub mod ui;

pub use api::{aggregate, split_urls, EvidenceClient, EvidenceRequest, UrlOutcome};
pub use config::{load_config, ClientConfig, ClientConfigBuilder, ConfigOption};
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use multipart::{encode_evidence, EncodedForm};
