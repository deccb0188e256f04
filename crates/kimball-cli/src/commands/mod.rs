//! CLI command implementations.

pub mod analyze;
pub mod infer;
pub mod status;
