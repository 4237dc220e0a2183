//! Request extractors shared by handlers.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated operator from a JWT Bearer token.
//! - [`client_addr::ClientAddr`] -- Resolves the originating client IP.

pub mod auth;
pub mod client_addr;
