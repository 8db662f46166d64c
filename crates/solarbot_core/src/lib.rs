//! Core domain logic for the SolarBot panel registry.
//! This crate is the single source of truth for panel invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::StoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::panel::{
    OperationStatus, Panel, PanelId, PanelValidationError, UNASSIGNED_PANEL_ID,
};
pub use repo::panel_store::{PanelStore, SqlitePanelStore, StoreError, StoreResult};
pub use service::panel_service::PanelService;
pub use service::statistics::{summarize, PanelStatistics};
