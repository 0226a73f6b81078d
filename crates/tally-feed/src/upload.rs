//! Upload session: the state behind an import form.
//!
//! Keeps the selected file across attempts so a failed upload can be
//! retried as-is. Only one submission runs at a time.

use parking_lot::Mutex;
use serde::Serialize;
use tally_core::entities::ImportResult;
use tally_transport::{CancellationToken, SalesBackend, UploadFile, UploadOptions};
use tracing::{info, warn};

use crate::error::FeedError;

#[derive(Debug, Clone, Default)]
pub struct UploadState {
    pub file: Option<UploadFile>,
    /// Source label as typed. Pre-filled from the file name on selection.
    pub source: String,
    pub upsert: bool,
    pub busy: bool,
    pub error: Option<FeedError>,
    pub last_result: Option<ImportResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadSkip {
    NoFile,
    Busy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Imported(ImportResult),
    Failed(FeedError),
    Skipped(UploadSkip),
    Cancelled,
}

pub struct UploadSession<B> {
    backend: B,
    state: Mutex<UploadState>,
}

impl<B: SalesBackend> UploadSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: Mutex::new(UploadState::default()),
        }
    }

    /// Select `file`. An empty source label takes the file name.
    pub fn select_file(&self, file: UploadFile) {
        let mut state = self.state.lock();
        if state.source.trim().is_empty() {
            state.source = file.file_name().to_string();
        }
        state.file = Some(file);
    }

    pub fn clear_file(&self) {
        self.state.lock().file = None;
    }

    pub fn set_source(&self, source: impl Into<String>) {
        self.state.lock().source = source.into();
    }

    pub fn set_upsert(&self, upsert: bool) {
        self.state.lock().upsert = upsert;
    }

    #[must_use]
    pub fn snapshot(&self) -> UploadState {
        self.state.lock().clone()
    }

    /// Upload the selected file.
    ///
    /// Does nothing without a file or while another submission is running.
    /// On failure the error is kept and the file stays selected.
    pub async fn submit(&self, cancel: CancellationToken) -> SubmitOutcome {
        let (file, options) = {
            let mut state = self.state.lock();
            if state.busy {
                return SubmitOutcome::Skipped(UploadSkip::Busy);
            }
            let Some(file) = state.file.clone() else {
                return SubmitOutcome::Skipped(UploadSkip::NoFile);
            };
            state.busy = true;
            state.error = None;
            let options = UploadOptions {
                source: Some(state.source.clone()),
                upsert: state.upsert,
            };
            (file, options)
        };

        let label = options.source_label(&file);
        info!(file = file.file_name(), source = %label, upsert = options.upsert, "uploading");
        let result = self.backend.import_sales(file, options, cancel).await;

        let mut state = self.state.lock();
        state.busy = false;
        match result {
            Ok(result) => {
                state.last_result = Some(result.clone());
                SubmitOutcome::Imported(result)
            }
            Err(err) if err.is_cancelled() => SubmitOutcome::Cancelled,
            Err(err) => {
                warn!(category = err.category().as_str(), error = %err, "upload failed");
                let err = FeedError::from(&err);
                state.error = Some(err.clone());
                SubmitOutcome::Failed(err)
            }
        }
    }
}

/// File size for display: KB below one megabyte, MB above.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn human_size(bytes: u64) -> String {
    let kb = bytes as f64 / 1024.0;
    if kb < 1024.0 {
        format!("{kb:.1} KB")
    } else {
        format!("{:.2} MB", kb / 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{ScriptedBackend, import_result};
    use pretty_assertions::assert_eq;
    use tally_transport::TransportError;

    fn csv(name: &str) -> UploadFile {
        UploadFile::in_memory(name, b"Region,Country\nEurope,France\n".to_vec())
    }

    #[test]
    fn selecting_a_file_prefills_an_empty_source() {
        let session = UploadSession::new(ScriptedBackend::new());
        session.select_file(csv("orders.csv"));
        assert_eq!(session.snapshot().source, "orders.csv");

        session.set_source("q3");
        session.select_file(csv("other.csv"));
        let state = session.snapshot();
        assert_eq!(state.source, "q3");
        assert_eq!(state.file.map(|f| f.file_name().to_string()), Some("other.csv".into()));
    }

    #[tokio::test]
    async fn submit_without_file_does_nothing() {
        let backend = ScriptedBackend::new();
        let session = UploadSession::new(backend.clone());
        assert_eq!(
            session.submit(CancellationToken::new()).await,
            SubmitOutcome::Skipped(UploadSkip::NoFile)
        );
        assert!(backend.uploads().is_empty());
    }

    #[tokio::test]
    async fn successful_upload_reports_the_result() {
        let backend = ScriptedBackend::new();
        backend.import(Ok(import_result("orders.csv")));
        let session = UploadSession::new(backend.clone());
        session.select_file(csv("orders.csv"));

        let outcome = session.submit(CancellationToken::new()).await;
        let SubmitOutcome::Imported(result) = outcome else {
            panic!("expected import, got {outcome:?}");
        };
        assert_eq!(result.inserted, 120);
        assert_eq!(result.total_rows, 125);
        assert_eq!(result.invalid_rows, 5);

        let uploads = backend.uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].0, "orders.csv");
        assert_eq!(uploads[0].1.source.as_deref(), Some("orders.csv"));
        assert!(!uploads[0].1.upsert);

        let state = session.snapshot();
        assert!(!state.busy);
        assert_eq!(state.error, None);
        assert_eq!(state.last_result, Some(result));
    }

    #[tokio::test]
    async fn failure_keeps_the_file_for_retry() {
        let backend = ScriptedBackend::new();
        backend
            .import(Err(TransportError::Status {
                status: 502,
                snippet: "<html>Bad Gateway</html>".into(),
            }))
            .import(Ok(import_result("orders.csv")));
        let session = UploadSession::new(backend.clone());
        session.select_file(csv("orders.csv"));
        session.set_upsert(true);

        let outcome = session.submit(CancellationToken::new()).await;
        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        let state = session.snapshot();
        assert!(state.file.is_some());
        assert!(!state.busy);
        assert!(state.error.unwrap().message.contains("Bad Gateway"));

        let retry = session.submit(CancellationToken::new()).await;
        assert!(matches!(retry, SubmitOutcome::Imported(_)));
        assert_eq!(session.snapshot().error, None);

        let uploads = backend.uploads();
        assert_eq!(uploads.len(), 2);
        assert!(uploads.iter().all(|(name, options)| name == "orders.csv" && options.upsert));
    }

    #[test]
    fn sizes_switch_units_at_one_megabyte() {
        assert_eq!(human_size(512), "0.5 KB");
        assert_eq!(human_size(10 * 1024), "10.0 KB");
        assert_eq!(human_size(3 * 1024 * 1024 / 2), "1.50 MB");
    }
}
