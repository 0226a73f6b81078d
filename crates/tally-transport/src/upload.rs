//! Multipart import request construction.
//!
//! The request follows the GraphQL multipart convention:
//! - `operations`: the mutation and its variables, with `file` set to `null`
//! - `map`: placeholder `"0"` → `["variables.file"]`
//! - `0`: the file bytes, streamed from disk when the file is a path

use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};
use tokio_util::io::ReaderStream;

use crate::error::TransportError;
use crate::queries::IMPORT_MUTATION;

const FILE_PLACEHOLDER: &str = "0";

/// A file selected for import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadFile {
    /// Streamed from disk on every attempt.
    Path { path: PathBuf, name: String },
    /// Already in memory (stdin, tests).
    Memory { name: String, bytes: Vec<u8> },
}

impl UploadFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());
        Self::Path { path, name }
    }

    pub fn in_memory(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::Memory {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        match self {
            Self::Path { name, .. } | Self::Memory { name, .. } => name,
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Path { path, .. } => Some(path),
            Self::Memory { .. } => None,
        }
    }

    async fn to_part(&self) -> Result<Part, TransportError> {
        let part = match self {
            Self::Path { path, .. } => {
                let file = tokio::fs::File::open(path).await?;
                let len = file.metadata().await?.len();
                let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
                Part::stream_with_length(body, len)
            }
            Self::Memory { bytes, .. } => Part::bytes(bytes.clone()),
        };
        Ok(part.file_name(self.file_name().to_string()))
    }
}

/// Caller-supplied import options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Label stored with the imported rows. Blank or absent → the file name.
    pub source: Option<String>,
    /// Overwrite rows whose order id already exists.
    pub upsert: bool,
}

impl UploadOptions {
    #[must_use]
    pub fn source_label(&self, file: &UploadFile) -> String {
        self.source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| file.file_name().trim())
            .to_string()
    }
}

pub fn operations_json(source: &str, upsert: bool) -> Value {
    json!({
        "query": IMPORT_MUTATION,
        "variables": { "file": null, "source": source, "up": upsert },
    })
}

pub fn map_json() -> Value {
    json!({ "0": ["variables.file"] })
}

/// Assemble the multipart body. Opens the file, so a retry re-streams it.
pub async fn build_form(
    file: &UploadFile,
    source: &str,
    upsert: bool,
) -> Result<Form, TransportError> {
    let part = file.to_part().await?;
    Ok(Form::new()
        .text("operations", operations_json(source, upsert).to_string())
        .text("map", map_json().to_string())
        .part(FILE_PLACEHOLDER, part))
}
