//! Typed endpoint wrappers
//!
//! Each wrapper fixes the method, path and query/body shape for one backend
//! endpoint and delegates everything else to [`crate::ApiClient::request`].

pub mod activities;
pub mod days;
pub mod health;
pub mod itineraries;
pub mod travel;
pub mod users;
pub mod weather;

pub use health::Diagnostics;
