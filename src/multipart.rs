// multipart/form-data encoding for an evidence upload.
//
// reqwest's own `multipart::Form` can only be sent once and hides its
// bytes, so the body is encoded here into a plain buffer that can be
// cloned for every destination. The file part always carries the MIME
// type the caller declared.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const FILE_FIELD: &str = "file";
pub const COLLECTED_FIELD: &str = "collected";

/// An encoded request body and the `Content-Type` header that goes with it.
#[derive(Debug, Clone)]
pub struct EncodedForm {
    pub body: Vec<u8>,
    pub content_type: String,
    pub boundary: String,
}

/// Today's date as sent in the `collected` field.
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Encode `file_path` as the `file` part plus a `collected` field.
/// The file is read once and closed before this returns.
pub fn encode_evidence(
    file_path: &Path,
    mime_type: &str,
    collected: Option<&str>,
) -> Result<EncodedForm> {
    let io_err = |source| Error::Io {
        path: file_path.to_path_buf(),
        source,
    };
    let mut file = File::open(file_path).map_err(io_err)?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents).map_err(io_err)?;
    drop(file);

    let file_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let collected = collected.map(str::to_owned).unwrap_or_else(today);

    let boundary = uuid::Uuid::new_v4().simple().to_string();
    let mut body = Vec::with_capacity(contents.len() + 512);

    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            escape_quotes(FILE_FIELD),
            escape_quotes(&file_name)
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime_type).as_bytes());
    body.extend_from_slice(&contents);
    body.extend_from_slice(b"\r\n");

    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
            escape_quotes(COLLECTED_FIELD)
        )
        .as_bytes(),
    );
    body.extend_from_slice(collected.as_bytes());
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    Ok(EncodedForm {
        body,
        content_type: format!("multipart/form-data; boundary={}", boundary),
        boundary,
    })
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
