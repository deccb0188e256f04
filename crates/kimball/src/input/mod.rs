//! Bronze-layer input: file parsing and the profile store.

mod parser;
mod source;
mod store;

pub use parser::{Parser, ParserConfig};
pub use source::{DataTable, SourceMetadata};
pub use store::{BRONZE_TYPE, BronzeStore, ProfileStore, StoreConfig};
