//! # Kirana payment server
//! This module hosts the REST server for the Kirana storefront backend. It is responsible for:
//! Authenticating buyers and admins via JWT access tokens.
//! Exposing the order lifecycle endpoints (create, query, track, cancel, delete, fulfilment updates).
//! Receiving eSewa payment callbacks from the client and handing them to the engine's verification pipeline.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/orders` and friends: the order lifecycle endpoints. See [routes] for the full list.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
