//! Sort, update-mode, startup-strategy, and filter-field enums.
//!
//! Wire enums keep the server's spelling (`ASC`, `DO_UPDATE`); enums that
//! only appear in configuration use `snake_case`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// SortDirection
// ---------------------------------------------------------------------------

/// Ordering of the paginated sales query (by order date, then order id).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(CoreError::InvalidValue {
                kind: "sort direction",
                value: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// UpdateMode
// ---------------------------------------------------------------------------

/// Conflict policy the server applied to an import, echoed back in the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateMode {
    /// Rows whose order id already exists are skipped.
    DoNothing,
    /// Rows whose order id already exists overwrite the stored row.
    DoUpdate,
}

impl UpdateMode {
    #[must_use]
    pub const fn from_upsert(upsert: bool) -> Self {
        if upsert { Self::DoUpdate } else { Self::DoNothing }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DoNothing => "DO_NOTHING",
            Self::DoUpdate => "DO_UPDATE",
        }
    }
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// InitialStrategy
// ---------------------------------------------------------------------------

/// How a feed controller behaves on `start()`.
///
/// ```text
/// probe_then_decide → probe (1 row) → empty     → NoData
///                                   → non-empty → fresh fetch
/// fetch_directly    → fresh fetch
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum InitialStrategy {
    #[default]
    ProbeThenDecide,
    FetchDirectly,
}

// ---------------------------------------------------------------------------
// FilterField
// ---------------------------------------------------------------------------

/// A raw, user-editable filter input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    /// Free-text search over country, region, and item type.
    Query,
    /// Exact country name.
    Country,
    /// Exact item type.
    ItemType,
    /// Inclusive lower bound on order date (`YYYY-MM-DD`).
    OrderDateFrom,
    /// Inclusive upper bound on order date (`YYYY-MM-DD`).
    OrderDateTo,
}

impl FilterField {
    pub const ALL: [Self; 5] = [
        Self::Query,
        Self::Country,
        Self::ItemType,
        Self::OrderDateFrom,
        Self::OrderDateTo,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "q",
            Self::Country => "country",
            Self::ItemType => "item",
            Self::OrderDateFrom => "from",
            Self::OrderDateTo => "to",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "q" | "query" | "search" => Ok(Self::Query),
            "country" => Ok(Self::Country),
            "item" | "item_type" | "itemType" => Ok(Self::ItemType),
            "from" | "order_date_from" | "orderDateFrom" => Ok(Self::OrderDateFrom),
            "to" | "order_date_to" | "orderDateTo" => Ok(Self::OrderDateTo),
            other => Err(CoreError::UnknownField(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_direction_wire_spelling() {
        assert_eq!(serde_json::to_string(&SortDirection::Asc).unwrap(), "\"ASC\"");
        assert_eq!(serde_json::to_string(&SortDirection::Desc).unwrap(), "\"DESC\"");
        assert_eq!(SortDirection::default(), SortDirection::Desc);
    }

    #[test]
    fn sort_direction_parses_case_insensitively() {
        assert_eq!("Asc".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert_eq!(" desc ".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("up".parse::<SortDirection>().is_err());
    }

    #[test]
    fn update_mode_tracks_upsert_flag() {
        assert_eq!(UpdateMode::from_upsert(false), UpdateMode::DoNothing);
        assert_eq!(UpdateMode::from_upsert(true), UpdateMode::DoUpdate);
        let parsed: UpdateMode = serde_json::from_str("\"DO_UPDATE\"").unwrap();
        assert_eq!(parsed, UpdateMode::DoUpdate);
    }

    #[test]
    fn initial_strategy_config_spelling() {
        let parsed: InitialStrategy = serde_json::from_str("\"fetch_directly\"").unwrap();
        assert_eq!(parsed, InitialStrategy::FetchDirectly);
        assert_eq!(InitialStrategy::default(), InitialStrategy::ProbeThenDecide);
    }

    #[test]
    fn filter_field_aliases() {
        for field in FilterField::ALL {
            assert_eq!(field.as_str().parse::<FilterField>().unwrap(), field);
        }
        assert_eq!("itemType".parse::<FilterField>().unwrap(), FilterField::ItemType);
        assert!(matches!(
            "region".parse::<FilterField>(),
            Err(CoreError::UnknownField(name)) if name == "region"
        ));
    }
}
