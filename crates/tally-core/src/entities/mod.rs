//! Wire entities for the paginated sales query and the import mutation.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` and use
//! the server's camelCase field names on the wire.

mod import;
mod page;
mod record;

pub use import::ImportResult;
pub use page::{Cursor, Edge, Page, PageInfo};
pub use record::SalesRecord;
