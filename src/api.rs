// API client module: a small blocking HTTP client that pushes evidence
// files to one or more collector endpoints. Delivery is sequential and
// best-effort: every destination is tried, and the per-URL results are
// folded into one overall result.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::multipart::{encode_evidence, EncodedForm};
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use std::path::PathBuf;
use tracing::debug;

pub const API_KEY_HEADER: &str = "X-API-KEY";

/// A fully specified upload: one file, its declared MIME type, where to
/// send it and, optionally, the collected date to report.
#[derive(Debug, Clone)]
pub struct EvidenceRequest {
    pub file_path: PathBuf,
    pub mime_type: String,
    pub urls: Vec<String>,
    pub collected: Option<String>,
}

impl EvidenceRequest {
    /// Build a request from a comma separated URL string.
    pub fn new(file_path: impl Into<PathBuf>, mime_type: impl Into<String>, urls: &str) -> Self {
        EvidenceRequest {
            file_path: file_path.into(),
            mime_type: mime_type.into(),
            urls: split_urls(urls),
            collected: None,
        }
    }

    pub fn collected(mut self, date: impl Into<String>) -> Self {
        self.collected = Some(date.into());
        self
    }
}

/// Result of sending to a single destination.
#[derive(Debug)]
pub struct UrlOutcome {
    pub url: String,
    pub result: Result<()>,
}

/// Evidence uploader. Holds the configuration and a reqwest blocking
/// client shared by every send.
#[derive(Clone, Debug)]
pub struct EvidenceClient {
    client: Client,
    config: ClientConfig,
}

impl EvidenceClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;
        Ok(EvidenceClient { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Upload `file_path` as `mime_type` to every URL in the comma
    /// separated `urls`, with today's date as the collected date.
    pub fn upload(&self, file_path: &str, mime_type: &str, urls: &str) -> Result<()> {
        if urls.trim().is_empty() {
            return Err(Error::validation(
                "TBL evidence task endpoint (URL) must be specified",
            ));
        }
        self.submit(&EvidenceRequest::new(file_path, mime_type, urls))
    }

    /// Upload a fully specified request.
    pub fn submit(&self, req: &EvidenceRequest) -> Result<()> {
        let urls: Vec<String> = req
            .urls
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
            .map(str::to_owned)
            .collect();
        if urls.is_empty() {
            return Err(Error::validation(
                "TBL evidence task endpoint (URL) must be specified",
            ));
        }
        if self.config.debug() {
            debug!(
                file = %req.file_path.display(),
                mime_type = %req.mime_type,
                "upload request"
            );
            debug!(count = urls.len(), ?urls, "destination URLs");
        }
        if req.file_path.as_os_str().is_empty() {
            return Err(Error::validation("evidence filename must be specified"));
        }
        if req.mime_type.is_empty() {
            return Err(Error::validation("file type must be specified"));
        }
        self.config.credentials().validate()?;

        let form = encode_evidence(&req.file_path, &req.mime_type, req.collected.as_deref())?;
        if self.config.debug() {
            debug!(
                bytes = form.body.len(),
                content_type = %form.content_type,
                "multipart body built"
            );
        }

        if let [url] = urls.as_slice() {
            if self.config.debug() {
                debug!(%url, "uploading to single URL");
            }
            return self.send(url, &form);
        }

        if self.config.debug() {
            debug!(count = urls.len(), "uploading to multiple URLs");
        }
        let outcomes = urls
            .into_iter()
            .map(|url| {
                if self.config.debug() {
                    debug!(%url, "uploading");
                }
                let result = self.send(&url, &form);
                if self.config.debug() {
                    match &result {
                        Ok(()) => debug!(%url, "upload succeeded"),
                        Err(e) => debug!(%url, error = %e, "upload failed"),
                    }
                }
                UrlOutcome { url, result }
            })
            .collect();

        let overall = aggregate(outcomes);
        if self.config.debug() {
            match &overall {
                Ok(()) => debug!("all uploads completed successfully"),
                Err(e) if e.is_partial_success() => debug!(error = %e, "partial success"),
                Err(e) => debug!(error = %e, "all uploads failed"),
            }
        }
        overall
    }

    /// POST one copy of the body. Only 201 Created counts as success.
    fn send(&self, url: &str, form: &EncodedForm) -> Result<()> {
        let creds = self.config.credentials();
        if self.config.debug() {
            debug!(%url, "sending HTTP request");
        }
        let res = self
            .client
            .post(url)
            .header(AUTHORIZATION, creds.basic_auth_header())
            .header(API_KEY_HEADER, creds.api_key.as_str())
            .header(CONTENT_TYPE, form.content_type.as_str())
            .body(form.body.clone())
            .send()
            .map_err(|source| {
                if self.config.debug() {
                    debug!(%url, error = %source, "HTTP request failed");
                }
                Error::Network {
                    url: url.to_owned(),
                    source,
                }
            })?;

        let status = res.status();
        if status != StatusCode::CREATED {
            let err = Error::Protocol {
                url: url.to_owned(),
                status,
            };
            if self.config.debug() {
                debug!(%url, error = %err, "upload rejected");
            }
            return Err(err);
        }
        if self.config.debug() {
            debug!(%url, "upload successful (HTTP 201)");
        }
        Ok(())
    }
}

/// Split a comma separated URL list, trimming whitespace and dropping
/// empty entries. Order is preserved.
pub fn split_urls(urls: &str) -> Vec<String> {
    urls.split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Fold per-URL results into one: all ok is `Ok`, none ok is the last
/// error, anything in between is `Error::PartialSuccess`.
pub fn aggregate(outcomes: Vec<UrlOutcome>) -> Result<()> {
    let total = outcomes.len();
    let mut succeeded = 0;
    let mut last = None;
    for outcome in outcomes {
        match outcome.result {
            Ok(()) => succeeded += 1,
            Err(e) => last = Some(e),
        }
    }
    match last {
        None => Ok(()),
        Some(last) if succeeded == 0 => Err(last),
        Some(last) => Err(Error::PartialSuccess {
            succeeded,
            total,
            last: Box::new(last),
        }),
    }
}
