//! Database models and configuration shared across the crate.

pub mod config;
pub mod registry;
