//! Panel domain model.
//!
//! # Responsibility
//! - Define the solar panel record and its operation status.
//! - Provide write-path validation shared by handlers and storage.
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never changes afterwards.
//! - `installed_at` is set once at creation.
//! - `last_updated_at`, when set, is never earlier than `installed_at`.
//! - `name` and `location` are non-blank for every persisted record.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned panel identifier.
pub type PanelId = i64;

/// Marker for a panel that has not been persisted yet.
pub const UNASSIGNED_PANEL_ID: PanelId = 0;

/// Operating state of a panel.
///
/// Closed set: request bodies carrying any other label fail to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OperationStatus {
    /// Producing or ready to produce.
    #[default]
    Active,
    /// Switched off or disconnected.
    Inactive,
    /// Temporarily out of service for upkeep.
    Maintenance,
}

impl OperationStatus {
    /// Stable label used in storage and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Maintenance => "Maintenance",
        }
    }

    /// Parses a stored label. Matching is exact.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Active" => Some(Self::Active),
            "Inactive" => Some(Self::Inactive),
            "Maintenance" => Some(Self::Maintenance),
            _ => None,
        }
    }
}

impl Display for OperationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Solar panel monitoring record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    /// `0` until the store assigns one.
    #[serde(default)]
    pub id: PanelId,
    pub name: String,
    pub location: String,
    /// Rated capacity in kilowatts.
    #[serde(rename = "capacityKW", default)]
    pub capacity_kw: f64,
    /// Current output in kilowatts. May exceed capacity.
    #[serde(rename = "currentGenerationKW", default)]
    pub current_generation_kw: f64,
    #[serde(default)]
    pub operation_status: OperationStatus,
    /// Unix epoch milliseconds.
    #[serde(default)]
    pub installed_at: i64,
    /// Unix epoch milliseconds of the last successful write.
    #[serde(default)]
    pub last_updated_at: Option<i64>,
}

impl Panel {
    /// Creates an unsaved panel with zeroed timestamps.
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        capacity_kw: f64,
        current_generation_kw: f64,
        operation_status: OperationStatus,
    ) -> Self {
        Self {
            id: UNASSIGNED_PANEL_ID,
            name: name.into(),
            location: location.into(),
            capacity_kw,
            current_generation_kw,
            operation_status,
            installed_at: 0,
            last_updated_at: None,
        }
    }

    /// Checks the fields a caller controls.
    ///
    /// Timestamps are owned by the service and are not checked here.
    pub fn validate(&self) -> Result<(), PanelValidationError> {
        if self.name.trim().is_empty() {
            return Err(PanelValidationError::EmptyName);
        }
        if self.location.trim().is_empty() {
            return Err(PanelValidationError::EmptyLocation);
        }
        if !self.capacity_kw.is_finite() {
            return Err(PanelValidationError::NonFiniteValue {
                field: "capacityKW",
            });
        }
        if !self.current_generation_kw.is_finite() {
            return Err(PanelValidationError::NonFiniteValue {
                field: "currentGenerationKW",
            });
        }
        Ok(())
    }
}

/// Write-path validation failure for a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelValidationError {
    EmptyName,
    EmptyLocation,
    NonFiniteValue { field: &'static str },
}

impl Display for PanelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "panel name is required"),
            Self::EmptyLocation => write!(f, "panel location is required"),
            Self::NonFiniteValue { field } => write!(f, "`{field}` must be a finite number"),
        }
    }
}

impl Error for PanelValidationError {}

#[cfg(test)]
mod tests {
    use super::{OperationStatus, Panel, PanelValidationError};

    fn sample() -> Panel {
        Panel::new("Roof A", "Lisbon", 10.0, 8.0, OperationStatus::Active)
    }

    #[test]
    fn whitespace_name_or_location_is_rejected() {
        let mut panel = sample();
        panel.name = " \t".to_string();
        assert_eq!(panel.validate(), Err(PanelValidationError::EmptyName));

        let mut panel = sample();
        panel.location = String::new();
        assert_eq!(panel.validate(), Err(PanelValidationError::EmptyLocation));
    }

    #[test]
    fn non_finite_readings_are_rejected() {
        let mut panel = sample();
        panel.current_generation_kw = f64::NAN;
        assert_eq!(
            panel.validate(),
            Err(PanelValidationError::NonFiniteValue {
                field: "currentGenerationKW"
            })
        );
    }

    #[test]
    fn generation_above_capacity_is_allowed() {
        let mut panel = sample();
        panel.current_generation_kw = 12.5;
        assert!(panel.validate().is_ok());
    }

    #[test]
    fn status_labels_parse_exactly() {
        for status in [
            OperationStatus::Active,
            OperationStatus::Inactive,
            OperationStatus::Maintenance,
        ] {
            assert_eq!(OperationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OperationStatus::parse("active"), None);
        assert_eq!(OperationStatus::parse("Offline"), None);
    }
}
