//! Where comment sets come from.
//!
//! Two sources feed the overlay:
//!
//! | Source  | Shape                                  | Entry point        |
//! |---------|----------------------------------------|--------------------|
//! | Remote  | `{ "success": bool, "items": [...] }`  | [`parse_remote`]   |
//! | Upload  | `[...]` or the remote envelope         | [`parse_upload`]   |
//!
//! The HTTP request itself is not made here. [`remote_url`] builds the
//! address and the caller owns the transport.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::record::CommentRecord;

/// Endpoint the overlay fetches from unless configured otherwise.
pub const DEFAULT_ENDPOINT: &str = "https://mechakucha-api.herokuapp.com/himawari";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("comment set id is empty")]
    EmptyId,

    #[error("comment source reported failure (success = false)")]
    Rejected,

    #[error("malformed comment JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The remote API's response body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub items: Vec<CommentRecord>,
}

impl Envelope {
    /// Unwrap the items, or [`SourceError::Rejected`] when `success` is false.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Rejected`] for an unsuccessful envelope.
    pub fn into_items(self) -> Result<Vec<CommentRecord>, SourceError> {
        if self.success {
            Ok(self.items)
        } else {
            Err(SourceError::Rejected)
        }
    }
}

/// Either shape an uploaded file may take.
#[derive(Deserialize)]
#[serde(untagged)]
enum UploadDocument {
    List(Vec<CommentRecord>),
    Envelope(Envelope),
}

/// Address of comment set `id` under `endpoint`: `<endpoint>/<id>/danmaku`.
///
/// # Errors
///
/// Returns [`SourceError::EmptyId`] if `id` is blank.
pub fn remote_url(endpoint: &str, id: &str) -> Result<String, SourceError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(SourceError::EmptyId);
    }
    Ok(format!("{}/{id}/danmaku", endpoint.trim_end_matches('/')))
}

/// Parse a remote response body.
///
/// # Errors
///
/// [`SourceError::Json`] for malformed bodies, [`SourceError::Rejected`]
/// when the envelope says `success: false`.
pub fn parse_remote(body: &str) -> Result<Vec<CommentRecord>, SourceError> {
    let envelope: Envelope = serde_json::from_str(body)?;
    let items = envelope.into_items()?;
    tracing::debug!(count = items.len(), "parsed remote comment set");
    Ok(items)
}

/// Parse an uploaded comment file: a bare array of records, or an envelope.
///
/// # Errors
///
/// [`SourceError::Json`] when the text is neither shape;
/// [`SourceError::Rejected`] for an envelope with `success: false`.
pub fn parse_upload(body: &str) -> Result<Vec<CommentRecord>, SourceError> {
    let items = match serde_json::from_str(body)? {
        UploadDocument::List(items) => items,
        UploadDocument::Envelope(envelope) => envelope.into_items()?,
    };
    tracing::debug!(count = items.len(), "parsed uploaded comment set");
    Ok(items)
}

/// Read and parse an uploaded comment file from disk.
///
/// # Errors
///
/// [`SourceError::Io`] if the file cannot be read, otherwise as
/// [`parse_upload`].
pub fn read_upload(path: &Path) -> Result<Vec<CommentRecord>, SourceError> {
    let body = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_upload(&body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
