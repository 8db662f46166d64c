//! Summary statistics over the panel set.
//!
//! Pure computation; callers pass the full set fetched for the request.

use crate::model::panel::{OperationStatus, Panel};
use serde::{Deserialize, Serialize};

/// Snapshot summary of all stored panels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelStatistics {
    pub total_count: usize,
    pub active_count: usize,
    pub inactive_count: usize,
    pub maintenance_count: usize,
    #[serde(rename = "totalCapacityKW")]
    pub total_capacity_kw: f64,
    #[serde(rename = "totalGenerationKW")]
    pub total_generation_kw: f64,
    #[serde(rename = "averageGenerationKW")]
    pub average_generation_kw: f64,
    /// Ratio of summed generation to summed capacity, in percent.
    pub average_efficiency_percent: f64,
}

impl PanelStatistics {
    /// Whether every sum and average is a finite number.
    pub fn is_finite(&self) -> bool {
        [
            self.total_capacity_kw,
            self.total_generation_kw,
            self.average_generation_kw,
            self.average_efficiency_percent,
        ]
        .iter()
        .all(|value| value.is_finite())
    }
}

/// Computes counts, sums and averages over `panels`.
///
/// Efficiency is the ratio of sums, not the mean of per-panel ratios, and is
/// `0` whenever total capacity is not positive.
pub fn summarize(panels: &[Panel]) -> PanelStatistics {
    let mut stats = PanelStatistics {
        total_count: panels.len(),
        ..PanelStatistics::default()
    };

    for panel in panels {
        match panel.operation_status {
            OperationStatus::Active => stats.active_count += 1,
            OperationStatus::Inactive => stats.inactive_count += 1,
            OperationStatus::Maintenance => stats.maintenance_count += 1,
        }
        stats.total_capacity_kw += panel.capacity_kw;
        stats.total_generation_kw += panel.current_generation_kw;
    }

    if stats.total_count > 0 {
        stats.average_generation_kw = stats.total_generation_kw / stats.total_count as f64;
        if stats.total_capacity_kw > 0.0 {
            stats.average_efficiency_percent =
                stats.total_generation_kw / stats.total_capacity_kw * 100.0;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::{summarize, PanelStatistics};
    use crate::model::panel::{OperationStatus, Panel};

    fn panel(capacity: f64, generation: f64, status: OperationStatus) -> Panel {
        Panel::new("p", "site", capacity, generation, status)
    }

    #[test]
    fn empty_set_is_all_zero() {
        assert_eq!(summarize(&[]), PanelStatistics::default());
    }

    #[test]
    fn mixed_fleet_uses_ratio_of_sums() {
        let panels = [
            panel(10.0, 8.0, OperationStatus::Active),
            panel(15.0, 12.0, OperationStatus::Active),
            panel(5.0, 0.0, OperationStatus::Maintenance),
        ];

        let stats = summarize(&panels);
        assert_eq!(stats.total_count, 3);
        assert_eq!(stats.active_count, 2);
        assert_eq!(stats.inactive_count, 0);
        assert_eq!(stats.maintenance_count, 1);
        assert_eq!(stats.total_capacity_kw, 30.0);
        assert_eq!(stats.total_generation_kw, 20.0);
        assert!((stats.average_generation_kw - 20.0 / 3.0).abs() < 1e-9);
        assert!((stats.average_efficiency_percent - 66.666_666_666).abs() < 1e-6);
    }

    #[test]
    fn zero_capacity_reports_zero_efficiency() {
        let panels = [panel(0.0, 3.0, OperationStatus::Inactive)];

        let stats = summarize(&panels);
        assert_eq!(stats.inactive_count, 1);
        assert_eq!(stats.average_generation_kw, 3.0);
        assert_eq!(stats.average_efficiency_percent, 0.0);
    }

    #[test]
    fn overflowing_sums_are_not_finite() {
        let panels = [
            panel(1.0e308, 1.0e308, OperationStatus::Active),
            panel(1.0e308, 1.0e308, OperationStatus::Active),
        ];

        let stats = summarize(&panels);
        assert!(stats.total_capacity_kw.is_infinite());
        assert!(stats.average_efficiency_percent.is_nan());
        assert!(!stats.is_finite());
        assert!(summarize(&panels[..1]).is_finite());
    }

    #[test]
    fn serializes_with_kw_suffixed_field_names() {
        let json = serde_json::to_value(summarize(&[])).unwrap();
        assert!(json.get("totalCapacityKW").is_some());
        assert!(json.get("averageEfficiencyPercent").is_some());
        assert!(json.get("maintenanceCount").is_some());
    }
}
