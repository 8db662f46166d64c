//! Domain model for solar panel monitoring records.
//!
//! # Responsibility
//! - Define the canonical panel record shared by storage and handlers.
//!
//! # Invariants
//! - Every persisted panel is identified by a positive, store-assigned `PanelId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod panel;
