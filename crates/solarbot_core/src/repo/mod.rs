//! Storage gateway abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define single-document CRUD contracts over the panel collection.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths enforce `Panel::validate()` before persistence.
//! - Missing records are reported as `None`/`false`, not as errors.

pub mod panel_store;
