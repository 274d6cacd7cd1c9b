//! REST API over schema-validated record collections.
//!
//! Exposes every registered model under `/api/v1/{model}` with list, get,
//! create, update and delete routes. The binary in `main.rs` wires
//! [`config::Config`] into [`server::serve`]; tests build the router directly
//! with [`server::router`].

pub mod config;
pub mod error;
pub mod fixtures;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
