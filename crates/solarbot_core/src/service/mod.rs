//! Core use-case services.
//!
//! # Responsibility
//! - Apply panel lifecycle rules around the storage gateway.
//! - Derive summary statistics from the stored panel set.
//! - Keep handler layers decoupled from storage details.

pub mod panel_service;
pub mod statistics;
