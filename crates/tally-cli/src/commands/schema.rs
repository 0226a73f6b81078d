use schemars::{Schema, schema_for};
use tally_core::entities::{ImportResult, Page, SalesRecord};
use tally_core::filter::SalesFilter;

use crate::cli::root_commands::{SchemaArgs, SchemaType};
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::output;

/// Handle `tally schema`. Table output is not meaningful for a schema, so it
/// falls back to pretty JSON.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let format = match flags.format {
        OutputFormat::Raw => OutputFormat::Raw,
        OutputFormat::Json | OutputFormat::Table => OutputFormat::Json,
    };
    output(&schema(args.type_name), format)
}

fn schema(type_name: SchemaType) -> Schema {
    match type_name {
        SchemaType::Page => schema_for!(Page),
        SchemaType::Filter => schema_for!(SalesFilter),
        SchemaType::ImportResult => schema_for!(ImportResult),
        SchemaType::Record => schema_for!(SalesRecord),
    }
}
