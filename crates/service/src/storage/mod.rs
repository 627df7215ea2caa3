//! Storage abstractions for service layer
//!
//! The restaurant table trait plus the file-backed implementation used by
//! the server and the test suites.

pub mod table_store;
pub mod json_table_store;
