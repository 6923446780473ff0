pub mod config;
pub mod domain;
pub mod export;
pub mod forms;
pub mod notify;
pub mod repository;
pub mod routes;
pub mod services;
pub mod view;

/// Store used when the identity provider does not name one.
pub const DEFAULT_STORE_ID: &str = "default";
