//! HTTP client for the sales endpoint.

use std::future::Future;

use reqwest::header::{ACCEPT, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::json;
use tally_config::{EndpointConfig, TallyConfig};
use tally_core::entities::{ImportResult, Page};
use tokio_util::sync::CancellationToken;

use crate::error::TransportError;
use crate::http::{decode_field, read_json_body};
use crate::queries::{PageRequest, SALES_PAGE_QUERY};
use crate::upload::{UploadFile, UploadOptions, build_form};

const DEFAULT_SNIPPET_CHARS: usize = 400;

/// Client for the single POST endpoint that serves queries, mutations, and uploads.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    http: reqwest::Client,
    endpoint: String,
    snippet_chars: usize,
}

impl GraphqlClient {
    /// Build a client for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Http`] if the underlying `reqwest::Client` fails to build.
    pub fn new(endpoint: &EndpointConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .user_agent(endpoint.user_agent.as_str())
            .timeout(endpoint.timeout())
            .cookie_store(endpoint.send_credentials)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.url.clone(),
            snippet_chars: DEFAULT_SNIPPET_CHARS,
        })
    }

    /// Build a client from the full configuration.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn from_config(config: &TallyConfig) -> Result<Self, TransportError> {
        Ok(Self::new(&config.endpoint)?.with_snippet_chars(config.upload.body_snippet_chars))
    }

    #[must_use]
    pub const fn with_snippet_chars(mut self, snippet_chars: usize) -> Self {
        self.snippet_chars = snippet_chars;
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute a JSON-encoded operation and decode `data.<field>`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Cancelled`] if `cancel` fires first, otherwise
    /// any transport, server, or protocol error from the response.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
        field: &'static str,
        cancel: &CancellationToken,
    ) -> Result<T, TransportError> {
        let request = self
            .http
            .post(&self.endpoint)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .json(&json!({ "query": query, "variables": variables }));

        run_cancellable(cancel, async {
            let resp = request.send().await?;
            let body = read_json_body(resp, self.snippet_chars).await?;
            decode_field(body, field, self.snippet_chars)
        })
        .await
    }

    /// Fetch one page of the `salesPage` connection.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`].
    pub async fn fetch_page(
        &self,
        request: &PageRequest,
        cancel: &CancellationToken,
    ) -> Result<Page, TransportError> {
        let variables = serde_json::to_value(request)
            .map_err(|e| TransportError::Decode(format!("page variables: {e}")))?;
        tracing::debug!(
            first = request.first,
            after = request.after.as_ref().map(tally_core::entities::Cursor::as_str),
            direction = %request.direction,
            "requesting sales page"
        );
        self.execute(SALES_PAGE_QUERY, variables, "salesPage", cancel)
            .await
    }

    /// Stream `file` to the import mutation as a multipart request.
    ///
    /// No JSON content type is set; reqwest writes the multipart boundary header.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] if the file cannot be opened,
    /// [`TransportError::Status`] with a body snippet for non-JSON responses,
    /// [`TransportError::Server`] for an error list, and
    /// [`TransportError::MissingData`] if `importSales` is absent.
    pub async fn upload(
        &self,
        file: &UploadFile,
        options: &UploadOptions,
        cancel: &CancellationToken,
    ) -> Result<ImportResult, TransportError> {
        let source = options.source_label(file);
        run_cancellable(cancel, async {
            let form = build_form(file, &source, options.upsert).await?;
            let resp = self.http.post(&self.endpoint).multipart(form).send().await?;
            let body = read_json_body(resp, self.snippet_chars).await?;
            let result: ImportResult = decode_field(body, "importSales", self.snippet_chars)?;
            tracing::info!(
                source = %result.source,
                inserted = result.inserted,
                total_rows = result.total_rows,
                invalid_rows = result.invalid_rows,
                duration_ms = result.duration_ms,
                "import finished"
            );
            Ok(result)
        })
        .await
    }
}

/// Race `fut` against `cancel`; cancellation wins ties.
pub(crate) async fn run_cancellable<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T, TransportError>>,
) -> Result<T, TransportError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(TransportError::Cancelled),
        result = fut => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_from_default_config() {
        let client = GraphqlClient::from_config(&TallyConfig::default()).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:5010/graphql");
        assert_eq!(client.snippet_chars, 400);
    }

    #[tokio::test]
    async fn pre_cancelled_call_never_hits_the_network() {
        let client = GraphqlClient::from_config(&TallyConfig::default()).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = client
            .fetch_page(&PageRequest::probe(), &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }
}
