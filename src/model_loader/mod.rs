/// Model blob acquisition
///
/// The operators take the serialized tokenizer model as in-memory bytes and
/// never look inside it. This module covers how those bytes get there: read
/// straight from disk, or transported as base64 text (the form a host graph's
/// string tensor carries). Base64 input may be line-wrapped, so ASCII
/// whitespace is stripped before decoding.
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::info;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("failed to read model blob: {0}")]
    Io(#[from] std::io::Error),

    #[error("model blob is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// How the blob is stored on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobTransport {
    /// Raw serialized model bytes
    Raw,
    /// Base64 text, possibly line-wrapped
    Base64,
}

/// Read a model blob from a file under the given transport
///
/// # Errors
/// `BlobError::Io` if the file cannot be read, `BlobError::Base64` if a
/// base64 file does not decode.
pub fn read_blob<P: AsRef<Path>>(path: P, transport: BlobTransport) -> Result<Vec<u8>, BlobError> {
    let path = path.as_ref();
    let raw = std::fs::read(path)?;
    let blob = match transport {
        BlobTransport::Raw => raw,
        BlobTransport::Base64 => decode_base64_text(&raw)?,
    };
    info!(
        "loaded model blob from {} ({} bytes, {:?})",
        path.display(),
        blob.len(),
        transport
    );
    Ok(blob)
}

/// Decode base64 text into blob bytes, tolerating embedded whitespace
pub fn decode_base64_text(text: &[u8]) -> Result<Vec<u8>, BlobError> {
    let compact: Vec<u8> = text
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    Ok(STANDARD.decode(&compact)?)
}
