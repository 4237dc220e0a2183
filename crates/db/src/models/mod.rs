//! Database row structs and their mapping into domain types.

pub mod submission;
