//! Domain types of the client matching core.

pub mod candidate;
pub mod fields;
pub mod match_result;
pub mod registry;
pub mod types;
