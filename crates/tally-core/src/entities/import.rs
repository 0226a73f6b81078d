use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::UpdateMode;

/// Summary returned once per upload by the `importSales` mutation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub inserted: u64,
    pub skipped_conflicts: u64,
    pub dup_in_file: u64,
    pub invalid_rows: u64,
    pub total_rows: u64,
    pub duration_ms: f64,
    /// Source label, echoed back.
    pub source: String,
    /// Conflict policy, echoed back.
    pub update_mode: UpdateMode,
}

impl ImportResult {
    /// Rows that passed validation (inserted or skipped as conflicts).
    #[must_use]
    pub const fn valid_rows(&self) -> u64 {
        self.total_rows.saturating_sub(self.invalid_rows)
    }
}
