use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::SalesRecord;

/// Opaque, server-issued pagination token. Passed back verbatim; never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cursor {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A record paired with the cursor that resumes pagination after it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Edge {
    pub cursor: Cursor,
    pub node: SalesRecord,
}

/// Pagination state returned alongside a page of edges.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Cursor to resume after; `None` when the page was empty and no cursor
    /// was supplied.
    #[serde(default)]
    pub end_cursor: Option<Cursor>,
    pub has_next_page: bool,
}

impl PageInfo {
    /// State before anything has been loaded: no cursor, more assumed to exist.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            end_cursor: None,
            has_next_page: true,
        }
    }
}

impl Default for PageInfo {
    fn default() -> Self {
        Self::initial()
    }
}

/// One page of the `salesPage` connection.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub edges: Vec<Edge>,
    pub page_info: PageInfo,
}

impl Page {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
