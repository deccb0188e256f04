//! Join relationship discovery across tables.

mod discoverer;
mod types;

pub use discoverer::{Discovery, DiscoveryConfig, RelationshipDiscoverer};
pub use types::{Relationship, relationship_type, types_compatible};
