//! Boundary adapters: JSON input and the HTTP API.

pub mod http;
pub mod json;
