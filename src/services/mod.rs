//! Typed endpoint wrappers over [`ApiClient`](crate::client::ApiClient).
//!
//! One module per endpoint family; wire types specific to a family live in
//! its module. The full endpoint catalog lives in the console pages, which
//! build on these patterns.

pub mod auth;
pub mod settings;
pub mod users;
