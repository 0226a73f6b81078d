//! # tally-transport
//!
//! HTTP transport for Tally.
//!
//! Executes the paginated `salesPage` query and the multipart `importSales`
//! mutation against a single POST endpoint, with:
//! - cooperative cancellation through [`CancellationToken`] on every call
//! - typed errors split into cancelled / transport / server / protocol
//! - a [`SalesBackend`] seam so the feed controller can run against
//!   scripted backends in tests

mod client;
mod error;
mod http;
mod queries;
mod upload;

pub use client::GraphqlClient;
pub use error::{ErrorCategory, TransportError};
pub use queries::{IMPORT_MUTATION, PageRequest, SALES_PAGE_QUERY};
pub use upload::{UploadFile, UploadOptions};

use std::future::Future;

use tally_core::entities::{ImportResult, Page};
pub use tokio_util::sync::CancellationToken;

/// The remote operations the feed and uploader depend on.
///
/// Futures must be `Send` so callers can spawn them.
pub trait SalesBackend: Send + Sync + 'static {
    /// Run one paginated query. Resolves to [`TransportError::Cancelled`] once
    /// `cancel` fires.
    fn sales_page(
        &self,
        request: PageRequest,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<Page, TransportError>> + Send;

    /// Submit one file to the import mutation.
    fn import_sales(
        &self,
        file: UploadFile,
        options: UploadOptions,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<ImportResult, TransportError>> + Send;
}

impl SalesBackend for GraphqlClient {
    async fn sales_page(
        &self,
        request: PageRequest,
        cancel: CancellationToken,
    ) -> Result<Page, TransportError> {
        self.fetch_page(&request, &cancel).await
    }

    async fn import_sales(
        &self,
        file: UploadFile,
        options: UploadOptions,
        cancel: CancellationToken,
    ) -> Result<ImportResult, TransportError> {
        self.upload(&file, &options, &cancel).await
    }
}

/// Existence probe: does the server hold at least one record?
///
/// # Errors
///
/// Propagates any [`TransportError`] from the probe query.
pub async fn has_any_sales<B: SalesBackend>(
    backend: &B,
    cancel: CancellationToken,
) -> Result<bool, TransportError> {
    let page = backend.sales_page(PageRequest::probe(), cancel).await?;
    Ok(!page.is_empty())
}
