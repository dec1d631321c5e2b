#![doc = "The `taskhub` library crate."]
#![doc = ""]
#![doc = "This crate contains the core business logic for the TaskHub application:"]
#![doc = "domain models, the record-store abstraction, token and password handling,"]
#![doc = "the authentication middleware, routing configuration, and error handling."]
#![doc = "It is used by the main binary (`main.rs`) to construct and run the server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use crate::auth::token::TokenManager;
use crate::store::Store;

/// Shared application state, constructed once in `main` and injected into
/// handlers and middleware via `web::Data<AppState>`.
///
/// There is deliberately no module-level store handle anywhere in the crate;
/// every component that touches persistence receives it through this struct.
pub struct AppState {
    /// The record store behind all user/task/project/tag persistence.
    pub store: Arc<dyn Store>,
    /// Issues and verifies bearer tokens. Holds the signing keys, built once
    /// at startup from configuration.
    pub tokens: TokenManager,
    /// bcrypt work factor used when hashing new passwords.
    pub bcrypt_cost: u32,
}
