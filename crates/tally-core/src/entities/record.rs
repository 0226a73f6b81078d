use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// One sales transaction as returned by the server. Immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    /// Server-assigned order id. Accepted as a JSON number or string.
    #[serde(deserialize_with = "string_or_number")]
    #[schemars(with = "String")]
    pub order_id: String,
    pub region: String,
    pub country: String,
    pub item_type: String,
    pub sales_channel: String,
    pub order_priority: String,
    pub order_date: NaiveDate,
    pub ship_date: NaiveDate,
    pub units_sold: i64,
    pub unit_price: f64,
    pub unit_cost: f64,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_profit: f64,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Unsigned(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Int(n) => n.to_string(),
        Raw::Unsigned(n) => n.to_string(),
    })
}
