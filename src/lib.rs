//! Account registration, password login, HS256 bearer tokens and a
//! token-gated profile endpoint.
//!
//! The HTTP surface lives in [`app`]; the pieces it is built from are usable
//! on their own:
//!
//! - [`auth::password`] hashes and verifies passwords (Argon2id).
//! - [`auth::jwt::TokenCodec`] issues and parses tokens.
//! - [`auth::extractors::authorize`] turns a request's headers into a user.
//! - [`auth::services`] registers users and logs them in.
//! - [`profile::services`] applies sparse profile updates.
//! - [`users::UserStore`] is the persistence seam.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod profile;
pub mod state;
pub mod users;
