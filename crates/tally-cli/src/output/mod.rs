use serde::Serialize;
use serde_json::Value;
use tally_core::entities::SalesRecord;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_key_values(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render(value, format)?);
    Ok(())
}

const RECORD_COLUMNS: [&str; 10] = [
    "order_id",
    "order_date",
    "country",
    "region",
    "item_type",
    "channel",
    "priority",
    "units",
    "revenue",
    "profit",
];

/// Render sales rows: a fixed-column table, a JSON array, or one JSON object per line.
pub fn render_records(records: &[SalesRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Raw => {
            let mut out = String::new();
            for record in records {
                out.push_str(&serde_json::to_string(record)?);
                out.push('\n');
            }
            Ok(out)
        }
        OutputFormat::Table => {
            if records.is_empty() {
                return Ok(String::from("(no rows)"));
            }
            let rows = records.iter().map(record_row).collect::<Vec<_>>();
            Ok(table::render_table(&RECORD_COLUMNS, &rows, table_options()))
        }
    }
}

pub fn output_records(records: &[SalesRecord], format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render_records(records, format)?;
    if format == OutputFormat::Raw {
        print!("{rendered}");
    } else {
        println!("{rendered}");
    }
    Ok(())
}

fn record_row(record: &SalesRecord) -> Vec<String> {
    vec![
        record.order_id.clone(),
        record.order_date.to_string(),
        record.country.clone(),
        record.region.clone(),
        record.item_type.clone(),
        record.sales_channel.clone(),
        record.order_priority.clone(),
        record.units_sold.to_string(),
        format!("{:.2}", record.total_revenue),
        format!("{:.2}", record.total_profit),
    ]
}

fn table_options() -> table::TableOptions {
    let terminal = ui::terminal();
    table::TableOptions {
        max_width: terminal.width,
        color: terminal.color,
    }
}

/// Objects become a two-column key/value table, nested values flattened
/// with dotted keys.
fn render_key_values<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let value = serde_json::to_value(value)?;
    let mut rows = Vec::new();
    flatten("", &value, &mut rows);
    Ok(table::render_table(&["key", "value"], &rows, table_options()))
}

fn flatten(prefix: &str, value: &Value, rows: &mut Vec<Vec<String>>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, nested) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, nested, rows);
            }
        }
        other => {
            let key = if prefix.is_empty() { "value" } else { prefix };
            rows.push(vec![key.to_string(), value_to_cell(other)]);
        }
    }
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;
    use tally_core::entities::SalesRecord;

    use super::{render, render_records};
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Status {
        rows: u32,
        page_info: PageInfo,
    }

    #[derive(Serialize)]
    struct PageInfo {
        end_cursor: Option<&'static str>,
        has_next_page: bool,
    }

    fn status() -> Status {
        Status {
            rows: 80,
            page_info: PageInfo {
                end_cursor: Some("c80"),
                has_next_page: false,
            },
        }
    }

    fn record() -> SalesRecord {
        serde_json::from_value(serde_json::json!({
            "orderId": 686_800_706,
            "region": "Europe",
            "country": "France",
            "itemType": "Cosmetics",
            "salesChannel": "Online",
            "orderPriority": "H",
            "orderDate": "2014-10-08",
            "shipDate": "2014-10-15",
            "unitsSold": 8446,
            "unitPrice": 437.2,
            "unitCost": 263.33,
            "totalRevenue": 3_692_591.2,
            "totalCost": 2_224_085.18,
            "totalProfit": 1_468_506.02
        }))
        .expect("fixture should parse")
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&status(), OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["rows"], 80);
        assert_eq!(parsed["page_info"]["end_cursor"], "c80");
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&status(), OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn table_render_flattens_nested_keys() {
        let out = render(&status(), OutputFormat::Table).expect("table render should work");
        assert!(out.lines().next().is_some_and(|line| line.contains("key")));
        assert!(out.contains("page_info.has_next_page"));
        assert!(out.contains("c80"));
    }

    #[test]
    fn records_render_as_fixed_columns() {
        let out = render_records(&[record()], OutputFormat::Table).expect("table render");
        let header = out.lines().next().expect("header line");
        assert!(header.starts_with("order_id"));
        assert!(out.contains("686800706"));
        assert!(out.contains("1468506.02"));
    }

    #[test]
    fn records_raw_is_ndjson() {
        let out = render_records(&[record(), record()], OutputFormat::Raw).expect("raw render");
        assert_eq!(out.lines().count(), 2);
        assert!(out.lines().all(|line| line.contains("\"orderId\":\"686800706\"")));
    }

    #[test]
    fn no_records_in_table_mode() {
        let out = render_records(&[], OutputFormat::Table).expect("table render");
        assert_eq!(out, "(no rows)");
    }
}
