//! Panel request handlers.
//!
//! # Responsibility
//! - Validate request shape before any storage access.
//! - Delegate to `PanelService` and map results onto response envelopes.
//!
//! # Invariants
//! - Handlers never panic; every failure becomes a 4xx/5xx envelope.
//! - Create and update bodies are checked with the same field rules.
//! - An update whose body id differs from the path id is rejected even when
//!   the id does not exist.

use crate::error::ApiError;
use crate::response::{to_body, ApiResponse, ApiStatus};
use serde::Deserialize;
use serde_json::Value;
use solarbot_core::{
    OperationStatus, Panel, PanelId, PanelService, PanelStore, SqlitePanelStore, StoreConfig,
};

/// Collection route a router mounts these handlers under.
pub const PANELS_ROUTE: &str = "/api/v1/solar-panels";

type ApiResult<T> = Result<T, ApiError>;

/// Caller-controlled panel fields. Timestamps are owned by the service, so
/// `installedAt`/`lastUpdatedAt` in a body are skipped without being decoded.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PanelRequest {
    #[serde(default)]
    id: PanelId,
    name: String,
    location: String,
    #[serde(rename = "capacityKW", default)]
    capacity_kw: f64,
    #[serde(rename = "currentGenerationKW", default)]
    current_generation_kw: f64,
    #[serde(default)]
    operation_status: OperationStatus,
}

impl From<PanelRequest> for Panel {
    fn from(request: PanelRequest) -> Self {
        let mut panel = Panel::new(
            request.name,
            request.location,
            request.capacity_kw,
            request.current_generation_kw,
            request.operation_status,
        );
        panel.id = request.id;
        panel
    }
}

/// Request handlers bound to one panel service.
pub struct PanelHandlers<S: PanelStore = SqlitePanelStore> {
    service: PanelService<S>,
}

impl PanelHandlers<SqlitePanelStore> {
    /// Builds handlers over the SQLite store at `config`.
    pub fn from_config(config: StoreConfig) -> Self {
        Self::new(PanelService::new(SqlitePanelStore::new(config)))
    }
}

impl<S: PanelStore> PanelHandlers<S> {
    pub fn new(service: PanelService<S>) -> Self {
        Self { service }
    }

    /// `GET /solar-panels` -> 200 with every panel.
    pub fn list_panels(&self) -> ApiResponse {
        respond("panel_list", || {
            let panels = self.service.get_all()?;
            Ok(ApiResponse::json(ApiStatus::Ok, to_body(&panels)?))
        })
    }

    /// `GET /solar-panels/{id}` -> 200 or 404.
    pub fn get_panel(&self, id: PanelId) -> ApiResponse {
        respond("panel_get", || {
            let panel = self.service.get_by_id(id)?.ok_or(ApiError::NotFound(id))?;
            Ok(ApiResponse::json(ApiStatus::Ok, to_body(&panel)?))
        })
    }

    /// `POST /solar-panels` -> 201 with the created panel and its location.
    ///
    /// Any `id` or timestamps in the body are ignored.
    pub fn create_panel(&self, body: &str) -> ApiResponse {
        respond("panel_create", || {
            let panel = decode_panel(body)?;
            let created = self.service.create(panel)?;
            Ok(
                ApiResponse::json(ApiStatus::Created, to_body(&created)?)
                    .with_location(format!("{PANELS_ROUTE}/{}", created.id)),
            )
        })
    }

    /// `PUT /solar-panels/{id}` -> 204, 400 or 404.
    ///
    /// Full replacement: every mutable field comes from the body.
    pub fn update_panel(&self, id: PanelId, body: &str) -> ApiResponse {
        respond("panel_update", || {
            let panel = decode_panel(body)?;
            if panel.id != id {
                return Err(ApiError::Validation(format!(
                    "path id {id} does not match body id {}",
                    panel.id
                )));
            }
            if !self.service.update(id, panel)? {
                return Err(ApiError::NotFound(id));
            }
            Ok(ApiResponse::no_content())
        })
    }

    /// `DELETE /solar-panels/{id}` -> 204 or 404.
    pub fn delete_panel(&self, id: PanelId) -> ApiResponse {
        respond("panel_delete", || {
            if !self.service.delete(id)? {
                return Err(ApiError::NotFound(id));
            }
            Ok(ApiResponse::no_content())
        })
    }

    /// `GET /solar-panels/statistics` -> 200 with the fleet summary.
    pub fn get_statistics(&self) -> ApiResponse {
        respond("panel_statistics", || {
            let stats = self.service.statistics()?;
            Ok(ApiResponse::json(ApiStatus::Ok, to_body(&stats)?))
        })
    }
}

fn respond(
    operation: &'static str,
    handler: impl FnOnce() -> ApiResult<ApiResponse>,
) -> ApiResponse {
    handler().unwrap_or_else(|err| err.into_response(operation))
}

fn decode_panel(body: &str) -> ApiResult<Panel> {
    let value: Value = serde_json::from_str(body)
        .map_err(|err| ApiError::Validation(format!("request body is not valid JSON: {err}")))?;
    if !value.is_object() {
        return Err(ApiError::Validation(
            "request body must be a JSON object".to_string(),
        ));
    }
    let panel: Panel = serde_json::from_value::<PanelRequest>(value)
        .map_err(|err| ApiError::Validation(format!("invalid solar panel: {err}")))?
        .into();
    panel
        .validate()
        .map_err(|err| ApiError::Validation(err.to_string()))?;
    Ok(panel)
}

#[cfg(test)]
mod tests {
    use super::decode_panel;
    use crate::error::ApiError;
    use solarbot_core::OperationStatus;

    #[test]
    fn decode_applies_defaults_for_omitted_fields() {
        let panel = decode_panel(r#"{"name":"Roof","location":"Braga"}"#).unwrap();
        assert_eq!(panel.id, 0);
        assert_eq!(panel.capacity_kw, 0.0);
        assert_eq!(panel.operation_status, OperationStatus::Active);
        assert_eq!(panel.last_updated_at, None);
    }

    #[test]
    fn decode_rejects_unknown_status_label() {
        let err = decode_panel(
            r#"{"name":"Roof","location":"Braga","operationStatus":"Offline"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(message) if message.contains("Offline")));
    }

    #[test]
    fn decode_skips_timestamp_fields_of_any_shape() {
        let panel = decode_panel(
            r#"{"name":"Roof","location":"Braga","installedAt":"2024-01-01","lastUpdatedAt":{}}"#,
        )
        .unwrap();
        assert_eq!(panel.installed_at, 0);
        assert_eq!(panel.last_updated_at, None);
    }

    #[test]
    fn decode_rejects_non_object_bodies() {
        assert!(matches!(decode_panel("[]"), Err(ApiError::Validation(_))));
        assert!(matches!(decode_panel("{"), Err(ApiError::Validation(_))));
    }

    #[test]
    fn decode_rejects_blank_location() {
        let err = decode_panel(r#"{"name":"Roof","location":"  "}"#).unwrap_err();
        assert!(matches!(err, ApiError::Validation(message) if message.contains("location")));
    }
}
