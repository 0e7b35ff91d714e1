#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod http;
pub mod mail;
pub mod policy;
pub mod schema;
pub mod server;
pub mod services;
pub mod store;
pub mod types;
pub mod util;
pub mod validate;

pub use app::App;

#[cfg(test)]
pub(crate) mod test_utils;
