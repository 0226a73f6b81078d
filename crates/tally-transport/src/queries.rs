//! Operation documents and request variables.

use serde::Serialize;
use tally_core::entities::Cursor;
use tally_core::enums::SortDirection;
use tally_core::filter::{QueryParams, SalesFilter};

pub const SALES_PAGE_QUERY: &str = r"
query SalesPage($first: Int!, $after: String, $filter: SalesFilter, $direction: SortDirection) {
  salesPage(first: $first, after: $after, filter: $filter, direction: $direction) {
    edges {
      cursor
      node {
        orderId region country itemType salesChannel orderPriority
        orderDate shipDate unitsSold unitPrice unitCost totalRevenue totalCost totalProfit
      }
    }
    pageInfo { endCursor hasNextPage }
  }
}
";

pub const IMPORT_MUTATION: &str = r"
mutation ImportSales($file: Upload!, $source: String!, $up: Boolean) {
  importSales(file: $file, source: $source, updateOnConflict: $up) {
    inserted
    skippedConflicts
    dupInFile
    invalidRows
    totalRows
    durationMs
    source
    updateMode
  }
}
";

/// Variables of one `salesPage` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub first: u32,
    pub after: Option<Cursor>,
    pub filter: Option<SalesFilter>,
    pub direction: SortDirection,
}

impl PageRequest {
    /// Start over from the beginning under `params`.
    #[must_use]
    pub fn first_page(page_size: u32, params: &QueryParams) -> Self {
        Self {
            first: page_size,
            after: None,
            filter: params.filter.clone(),
            direction: params.direction,
        }
    }

    /// Continue after `cursor` under the same `params` that produced it.
    #[must_use]
    pub fn after(page_size: u32, cursor: Option<Cursor>, params: &QueryParams) -> Self {
        Self {
            after: cursor,
            ..Self::first_page(page_size, params)
        }
    }

    /// One unfiltered row, newest first: enough to tell whether any data exists.
    #[must_use]
    pub const fn probe() -> Self {
        Self {
            first: 1,
            after: None,
            filter: None,
            direction: SortDirection::Desc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn probe_variables() {
        let json = serde_json::to_value(PageRequest::probe()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "first": 1, "after": null, "filter": null, "direction": "DESC" })
        );
    }

    #[test]
    fn continuation_keeps_params() {
        let params = QueryParams {
            filter: Some(SalesFilter {
                q: Some("Fra".into()),
                ..SalesFilter::default()
            }),
            direction: SortDirection::Asc,
        };
        let req = PageRequest::after(50, Some(Cursor::from("c50")), &params);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "first": 50,
                "after": "c50",
                "filter": { "q": "Fra" },
                "direction": "ASC"
            })
        );
    }
}
