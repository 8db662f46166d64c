//! Panel repository service.
//!
//! # Responsibility
//! - Provide list/get/create/update/delete/exists entry points for callers.
//! - Own identifier assignment and timestamp stamping.
//!
//! # Invariants
//! - `create` always lets the store assign the id.
//! - `update` carries `id` and `installed_at` over from the stored record and
//!   replaces every other field with the caller's values.
//! - `last_updated_at` never moves backwards and never precedes `installed_at`.
//! - Storage faults propagate unchanged; nothing here retries.

use crate::model::panel::{Panel, PanelId, UNASSIGNED_PANEL_ID};
use crate::repo::panel_store::{PanelStore, StoreError, StoreResult};
use crate::service::statistics::{summarize, PanelStatistics};
use log::info;
use std::time::{SystemTime, UNIX_EPOCH};

/// Use-case service wrapper for panel CRUD operations.
pub struct PanelService<S: PanelStore> {
    store: S,
}

impl<S: PanelStore> PanelService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn get_all(&self) -> StoreResult<Vec<Panel>> {
        self.store.find_all()
    }

    pub fn get_by_id(&self, id: PanelId) -> StoreResult<Option<Panel>> {
        self.store.find_by_id(id)
    }

    /// Persists a new panel and returns it with the assigned id.
    ///
    /// # Contract
    /// - Incoming `id` and timestamps are discarded.
    /// - `installed_at` and `last_updated_at` are both stamped with now.
    pub fn create(&self, mut panel: Panel) -> StoreResult<Panel> {
        let now = now_epoch_ms();
        panel.id = UNASSIGNED_PANEL_ID;
        panel.installed_at = now;
        panel.last_updated_at = Some(now);

        panel.id = self.store.insert(&panel)?;
        info!(
            "event=panel_create module=service status=ok panel_id={}",
            panel.id
        );
        Ok(panel)
    }

    /// Replaces the stored panel `id` with the caller's values.
    ///
    /// Returns `Ok(false)` without writing when no panel has that id.
    pub fn update(&self, id: PanelId, mut panel: Panel) -> StoreResult<bool> {
        let Some(existing) = self.store.find_by_id(id)? else {
            info!("event=panel_update module=service status=not_found panel_id={id}");
            return Ok(false);
        };

        panel.id = id;
        panel.installed_at = existing.installed_at;
        panel.last_updated_at = Some(refreshed_timestamp(&existing, now_epoch_ms()));

        let updated = self.store.update(&panel)?;
        info!(
            "event=panel_update module=service status={} panel_id={id}",
            if updated { "ok" } else { "not_found" }
        );
        Ok(updated)
    }

    pub fn delete(&self, id: PanelId) -> StoreResult<bool> {
        let deleted = self.store.delete(id)?;
        info!(
            "event=panel_delete module=service status={} panel_id={id}",
            if deleted { "ok" } else { "not_found" }
        );
        Ok(deleted)
    }

    pub fn exists(&self, id: PanelId) -> StoreResult<bool> {
        self.store.exists(id)
    }

    /// Recomputes summary statistics over every stored panel.
    ///
    /// Fails when the stored readings are too large to sum to finite values.
    pub fn statistics(&self) -> StoreResult<PanelStatistics> {
        let panels = self.store.find_all()?;
        let stats = summarize(&panels);
        if !stats.is_finite() {
            return Err(StoreError::InvalidData(format!(
                "kW totals over {} panels overflow",
                stats.total_count
            )));
        }
        Ok(stats)
    }
}

fn refreshed_timestamp(existing: &Panel, now: i64) -> i64 {
    let floor = existing
        .last_updated_at
        .map_or(existing.installed_at, |previous| {
            previous.max(existing.installed_at)
        });
    now.max(floor)
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}

#[cfg(test)]
mod tests {
    use super::{refreshed_timestamp, PanelService};
    use crate::model::panel::{OperationStatus, Panel, PanelId};
    use crate::repo::panel_store::{PanelStore, StoreError, StoreResult};
    use std::cell::RefCell;

    /// Vec-backed store for exercising service rules without SQLite.
    #[derive(Default)]
    struct MemoryStore {
        panels: RefCell<Vec<Panel>>,
        next_id: RefCell<PanelId>,
    }

    impl PanelStore for MemoryStore {
        fn find_all(&self) -> StoreResult<Vec<Panel>> {
            Ok(self.panels.borrow().clone())
        }

        fn find_by_id(&self, id: PanelId) -> StoreResult<Option<Panel>> {
            Ok(self.panels.borrow().iter().find(|p| p.id == id).cloned())
        }

        fn insert(&self, panel: &Panel) -> StoreResult<PanelId> {
            let mut next_id = self.next_id.borrow_mut();
            *next_id += 1;
            let mut stored = panel.clone();
            stored.id = *next_id;
            self.panels.borrow_mut().push(stored);
            Ok(*next_id)
        }

        fn update(&self, panel: &Panel) -> StoreResult<bool> {
            let mut panels = self.panels.borrow_mut();
            match panels.iter_mut().find(|p| p.id == panel.id) {
                Some(slot) => {
                    *slot = panel.clone();
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        fn delete(&self, id: PanelId) -> StoreResult<bool> {
            let mut panels = self.panels.borrow_mut();
            let before = panels.len();
            panels.retain(|p| p.id != id);
            Ok(panels.len() != before)
        }

        fn exists(&self, id: PanelId) -> StoreResult<bool> {
            Ok(self.panels.borrow().iter().any(|p| p.id == id))
        }
    }

    fn sample(name: &str) -> Panel {
        Panel::new(name, "Porto", 10.0, 6.0, OperationStatus::Active)
    }

    #[test]
    fn create_discards_caller_id_and_timestamps() {
        let service = PanelService::new(MemoryStore::default());
        let mut panel = sample("roof");
        panel.id = 77;
        panel.installed_at = 5;
        panel.last_updated_at = Some(6);

        let created = service.create(panel).unwrap();
        assert_eq!(created.id, 1);
        assert!(created.installed_at > 6);
        assert_eq!(created.last_updated_at, Some(created.installed_at));
    }

    #[test]
    fn update_carries_over_id_and_installed_at() {
        let service = PanelService::new(MemoryStore::default());
        let created = service.create(sample("roof")).unwrap();

        let mut replacement = sample("carport");
        replacement.id = 999;
        replacement.installed_at = 1;
        replacement.operation_status = OperationStatus::Maintenance;
        assert!(service.update(created.id, replacement).unwrap());

        let stored = service.get_by_id(created.id).unwrap().unwrap();
        assert_eq!(stored.id, created.id);
        assert_eq!(stored.name, "carport");
        assert_eq!(stored.operation_status, OperationStatus::Maintenance);
        assert_eq!(stored.installed_at, created.installed_at);
        assert!(stored.last_updated_at >= created.last_updated_at);
    }

    #[test]
    fn update_of_missing_panel_writes_nothing() {
        let service = PanelService::new(MemoryStore::default());
        service.create(sample("roof")).unwrap();

        assert!(!service.update(42, sample("ghost")).unwrap());
        let all = service.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "roof");
    }

    #[test]
    fn statistics_fail_when_totals_overflow() {
        let service = PanelService::new(MemoryStore::default());
        for name in ["big a", "big b"] {
            let mut panel = sample(name);
            panel.capacity_kw = 1.0e308;
            panel.current_generation_kw = 1.0e308;
            service.create(panel).unwrap();
        }

        let err = service.statistics().unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(message) if message.contains("overflow")));
    }

    #[test]
    fn refreshed_timestamp_never_moves_backwards() {
        let mut existing = sample("roof");
        existing.installed_at = 1_000;
        existing.last_updated_at = Some(5_000);

        assert_eq!(refreshed_timestamp(&existing, 3_000), 5_000);
        assert_eq!(refreshed_timestamp(&existing, 9_000), 9_000);

        existing.last_updated_at = None;
        assert_eq!(refreshed_timestamp(&existing, 500), 1_000);
    }
}
