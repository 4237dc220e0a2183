//! Domain types and pure helpers for the contact submissions service.
//!
//! This crate has zero internal deps so it can be shared by the store, the
//! HTTP server and the dashboard client.

pub mod contact;
pub mod error;
pub mod export;
pub mod network;
pub mod search;
pub mod submission;
pub mod types;
