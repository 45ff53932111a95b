//! Gateways to the matching endpoint.

pub mod http;

pub use http::HttpMatchGateway;
