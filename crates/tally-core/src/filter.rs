//! Filter values and the raw inputs they are derived from.
//!
//! [`RawFilter`] is what the user is typing right now. It is resolved into an
//! immutable [`SalesFilter`] on every debounce tick; a filter with no keys
//! resolves to `None` (unfiltered).

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{FilterField, SortDirection};
use crate::errors::CoreError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Predicate sent as the `filter` variable of `salesPage`. Absent keys are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesFilter {
    /// Case-insensitive substring match over country, region, and item type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date_from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date_to: Option<NaiveDate>,
}

impl SalesFilter {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.q.is_none()
            && self.country.is_none()
            && self.item_type.is_none()
            && self.order_date_from.is_none()
            && self.order_date_to.is_none()
    }
}

/// Unvalidated text inputs, updated on every keystroke.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFilter {
    pub q: String,
    pub country: String,
    pub item_type: String,
    pub order_date_from: String,
    pub order_date_to: String,
}

/// Outcome of resolving a [`RawFilter`].
#[derive(Debug)]
pub struct ResolvedFilter {
    pub filter: Option<SalesFilter>,
    /// Inputs that could not be parsed and were left out of `filter`.
    pub invalid: Vec<CoreError>,
}

impl RawFilter {
    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    #[must_use]
    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Query => &self.q,
            FilterField::Country => &self.country,
            FilterField::ItemType => &self.item_type,
            FilterField::OrderDateFrom => &self.order_date_from,
            FilterField::OrderDateTo => &self.order_date_to,
        }
    }

    fn slot_mut(&mut self, field: FilterField) -> &mut String {
        match field {
            FilterField::Query => &mut self.q,
            FilterField::Country => &mut self.country,
            FilterField::ItemType => &mut self.item_type,
            FilterField::OrderDateFrom => &mut self.order_date_from,
            FilterField::OrderDateTo => &mut self.order_date_to,
        }
    }

    /// Trim every input, drop empties and unparseable dates, and build a new filter value.
    #[must_use]
    pub fn resolve(&self) -> ResolvedFilter {
        let mut invalid = Vec::new();
        let mut date = |field: FilterField| -> Option<NaiveDate> {
            let text = non_empty(self.get(field))?;
            match NaiveDate::parse_from_str(&text, DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    invalid.push(CoreError::InvalidValue {
                        kind: "date",
                        value: text,
                    });
                    None
                }
            }
        };

        let filter = SalesFilter {
            order_date_from: date(FilterField::OrderDateFrom),
            order_date_to: date(FilterField::OrderDateTo),
            q: non_empty(&self.q),
            country: non_empty(&self.country),
            item_type: non_empty(&self.item_type),
        };

        ResolvedFilter {
            filter: (!filter.is_empty()).then_some(filter),
            invalid,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parameters a fresh fetch is issued under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct QueryParams {
    pub filter: Option<SalesFilter>,
    pub direction: SortDirection,
}
