//! Panel storage gateway and its SQLite implementation.
//!
//! # Responsibility
//! - Provide atomic single-document operations over the `solar_panels`
//!   collection.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Each operation opens its own connection and releases it before
//!   returning. No connection outlives a call.
//! - `insert` ignores the incoming id; the store assigns a fresh positive one.
//! - `update` fully replaces every stored column except `id`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::config::StoreConfig;
use crate::db::{open_db, DbError};
use crate::model::panel::{OperationStatus, Panel, PanelId, PanelValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PANEL_SELECT_SQL: &str = "SELECT
    id,
    name,
    location,
    capacity_kw,
    current_generation_kw,
    operation_status,
    installed_at,
    last_updated_at
FROM solar_panels";

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage gateway error.
#[derive(Debug)]
pub enum StoreError {
    Validation(PanelValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted panel data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<PanelValidationError> for StoreError {
    fn from(value: PanelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Single-document CRUD primitives over the panel collection.
pub trait PanelStore {
    fn find_all(&self) -> StoreResult<Vec<Panel>>;
    fn find_by_id(&self, id: PanelId) -> StoreResult<Option<Panel>>;
    fn insert(&self, panel: &Panel) -> StoreResult<PanelId>;
    fn update(&self, panel: &Panel) -> StoreResult<bool>;
    fn delete(&self, id: PanelId) -> StoreResult<bool>;
    fn exists(&self, id: PanelId) -> StoreResult<bool>;
}

/// SQLite-backed panel store. Holds configuration only.
#[derive(Debug, Clone)]
pub struct SqlitePanelStore {
    config: StoreConfig,
}

impl SqlitePanelStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn connect(&self) -> StoreResult<Connection> {
        Ok(open_db(self.config.db_path())?)
    }
}

impl PanelStore for SqlitePanelStore {
    fn find_all(&self) -> StoreResult<Vec<Panel>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!("{PANEL_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut panels = Vec::new();

        while let Some(row) = rows.next()? {
            panels.push(parse_panel_row(row)?);
        }

        Ok(panels)
    }

    fn find_by_id(&self, id: PanelId) -> StoreResult<Option<Panel>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!("{PANEL_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_panel_row(row)?));
        }

        Ok(None)
    }

    fn insert(&self, panel: &Panel) -> StoreResult<PanelId> {
        panel.validate()?;

        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO solar_panels (
                name,
                location,
                capacity_kw,
                current_generation_kw,
                operation_status,
                installed_at,
                last_updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                panel.name.as_str(),
                panel.location.as_str(),
                panel.capacity_kw,
                panel.current_generation_kw,
                panel.operation_status.as_str(),
                panel.installed_at,
                panel.last_updated_at,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn update(&self, panel: &Panel) -> StoreResult<bool> {
        panel.validate()?;

        let conn = self.connect()?;
        let changed = conn.execute(
            "UPDATE solar_panels
             SET
                name = ?1,
                location = ?2,
                capacity_kw = ?3,
                current_generation_kw = ?4,
                operation_status = ?5,
                installed_at = ?6,
                last_updated_at = ?7
             WHERE id = ?8;",
            params![
                panel.name.as_str(),
                panel.location.as_str(),
                panel.capacity_kw,
                panel.current_generation_kw,
                panel.operation_status.as_str(),
                panel.installed_at,
                panel.last_updated_at,
                panel.id,
            ],
        )?;

        Ok(changed > 0)
    }

    fn delete(&self, id: PanelId) -> StoreResult<bool> {
        let conn = self.connect()?;
        let changed = conn.execute("DELETE FROM solar_panels WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn exists(&self, id: PanelId) -> StoreResult<bool> {
        let conn = self.connect()?;
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM solar_panels WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_panel_row(row: &Row<'_>) -> StoreResult<Panel> {
    let id: PanelId = row.get("id")?;

    let status_text: String = row.get("operation_status")?;
    let operation_status = OperationStatus::parse(&status_text).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "invalid operation status `{status_text}` in solar_panels.operation_status (id {id})"
        ))
    })?;

    let panel = Panel {
        id,
        name: row.get("name")?,
        location: row.get("location")?,
        capacity_kw: row.get("capacity_kw")?,
        current_generation_kw: row.get("current_generation_kw")?,
        operation_status,
        installed_at: row.get("installed_at")?,
        last_updated_at: row.get("last_updated_at")?,
    };
    panel
        .validate()
        .map_err(|err| StoreError::InvalidData(format!("panel {id}: {err}")))?;
    Ok(panel)
}
