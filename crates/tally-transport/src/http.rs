//! Shared HTTP response helpers.
//!
//! Centralizes the content-type and status checks so the query and upload
//! paths only deal with envelope decoding. Non-JSON bodies (proxy error pages,
//! HTML 502s) become [`TransportError::Status`] with a truncated snippet
//! instead of a raw parse failure.

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::TransportError;

/// A response whose body is known to be JSON.
#[derive(Debug)]
pub struct JsonBody {
    pub status: StatusCode,
    pub text: String,
}

/// Read a response body, rejecting anything that is not JSON.
///
/// The status is kept so the caller can still report a non-success code
/// when the JSON envelope carries no error list.
pub async fn read_json_body(
    resp: reqwest::Response,
    snippet_chars: usize,
) -> Result<JsonBody, TransportError> {
    let status = resp.status();
    let json = is_json(&resp);
    let text = resp.text().await?;
    if !json {
        return Err(TransportError::Status {
            status: status.as_u16(),
            snippet: truncate_snippet(&text, snippet_chars),
        });
    }
    Ok(JsonBody { status, text })
}

fn is_json(resp: &reqwest::Response) -> bool {
    resp.headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

/// Keep at most `max_chars` characters, cutting on a char boundary.
pub fn truncate_snippet(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[derive(Deserialize)]
struct Envelope {
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Option<Vec<ErrorItem>>,
}

#[derive(Deserialize)]
struct ErrorItem {
    message: String,
}

/// Decode `{data, errors}` and pull `data.<field>` out as `T`.
///
/// An error list wins over everything else; a non-success status with no
/// error list is reported as [`TransportError::Status`].
pub fn decode_field<T: DeserializeOwned>(
    body: JsonBody,
    field: &'static str,
    snippet_chars: usize,
) -> Result<T, TransportError> {
    let envelope: Envelope = serde_json::from_str(&body.text)
        .map_err(|e| TransportError::Decode(format!("response envelope: {e}")))?;

    if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
        return Err(TransportError::Server(
            errors.into_iter().map(|e| e.message).collect(),
        ));
    }

    if !body.status.is_success() {
        return Err(TransportError::Status {
            status: body.status.as_u16(),
            snippet: truncate_snippet(&body.text, snippet_chars),
        });
    }

    let value = envelope
        .data
        .and_then(|mut data| data.get_mut(field).map(serde_json::Value::take))
        .filter(|value| !value.is_null())
        .ok_or(TransportError::MissingData(field))?;

    serde_json::from_value(value).map_err(|e| TransportError::Decode(format!("data.{field}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16, content_type: &str, body: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .header("Content-Type", content_type)
                .body(body.to_string())
                .unwrap(),
        )
    }

    fn json_body(status: u16, text: &str) -> JsonBody {
        JsonBody {
            status: StatusCode::from_u16(status).unwrap(),
            text: text.to_string(),
        }
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_snippet("héllo wörld", 4), "héll");
        assert_eq!(truncate_snippet("short", 400), "short");
        assert_eq!(truncate_snippet("", 10), "");
    }

    #[tokio::test]
    async fn html_body_becomes_status_error() {
        let body = format!("<html><body>{}</body></html>", "x".repeat(1000));
        let resp = mock_response(502, "text/html; charset=utf-8", &body);
        let err = read_json_body(resp, 400).await.unwrap_err();
        match err {
            TransportError::Status { status, snippet } => {
                assert_eq!(status, 502);
                assert_eq!(snippet.chars().count(), 400);
                assert!(snippet.starts_with("<html><body>"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn json_body_passes_through() {
        let resp = mock_response(200, "application/json", r#"{"data":{}}"#);
        let body = read_json_body(resp, 400).await.unwrap();
        assert_eq!(body.status, StatusCode::OK);
        assert_eq!(body.text, r#"{"data":{}}"#);
    }

    #[test]
    fn error_list_is_aggregated() {
        let body = json_body(
            200,
            r#"{"data": null, "errors": [{"message": "a"}, {"message": "b"}]}"#,
        );
        let err = decode_field::<serde_json::Value>(body, "salesPage", 400).unwrap_err();
        assert_eq!(err.to_string(), "a | b");
    }

    #[test]
    fn empty_error_list_is_ignored() {
        let body = json_body(200, r#"{"data": {"salesPage": 7}, "errors": []}"#);
        let value: u32 = decode_field(body, "salesPage", 400).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn missing_or_null_field_is_protocol_error() {
        let body = json_body(200, r#"{"data": {}}"#);
        let err = decode_field::<serde_json::Value>(body, "importSales", 400).unwrap_err();
        assert!(matches!(err, TransportError::MissingData("importSales")));

        let body = json_body(200, r#"{"data": {"importSales": null}}"#);
        let err = decode_field::<serde_json::Value>(body, "importSales", 400).unwrap_err();
        assert!(matches!(err, TransportError::MissingData("importSales")));
    }

    #[test]
    fn non_success_json_without_errors_is_status_error() {
        let body = json_body(500, r#"{"data": null}"#);
        let err = decode_field::<serde_json::Value>(body, "salesPage", 400).unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 500, .. }));
    }

    #[test]
    fn malformed_json_is_decode_error() {
        let body = json_body(200, "{not json");
        let err = decode_field::<serde_json::Value>(body, "salesPage", 400).unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }
}
