//! Request-handler boundary for the SolarBot panel API.
//!
//! Handlers take path ids and raw JSON bodies and return an [`ApiResponse`]
//! envelope a router can forward verbatim. Routing itself lives elsewhere.

pub mod api;
pub mod error;
pub mod response;

pub use api::{PanelHandlers, PANELS_ROUTE};
pub use error::ApiError;
pub use response::{ApiResponse, ApiStatus};
