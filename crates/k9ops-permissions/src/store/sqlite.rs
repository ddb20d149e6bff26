//! SQLite-backed grant store
//!
//! Grants and audit records live in one database file so the paired write
//! can commit as a single transaction. WAL mode is enabled for file-backed
//! databases.

use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use crate::audit::{AuditLog, AuditRecord, RequestOrigin};
use crate::error::Result;
use crate::models::{Grant, GrantKey, GrantScope, PermissionAction, ProjectId, SubjectId};

use super::GrantStore;

/// SQLite-backed grant store
pub struct SqliteGrantStore {
    conn: Mutex<Connection>,
}

impl SqliteGrantStore {
    /// Open (or create) a database at the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            -- Grant rows. project_id '' is global scope: SQLite treats
            -- NULLs as distinct in unique constraints, which would break
            -- the one-row-per-key upsert.
            CREATE TABLE IF NOT EXISTS grants (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                subject_id TEXT NOT NULL,
                section TEXT NOT NULL,
                subsection TEXT NOT NULL,
                action TEXT NOT NULL,
                project_id TEXT NOT NULL DEFAULT '',
                granted INTEGER NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(subject_id, section, subsection, action, project_id)
            );

            CREATE INDEX IF NOT EXISTS idx_grants_subject
                ON grants(subject_id);

            -- Append-only audit trail. No UPDATE or DELETE is ever issued
            -- against this table.
            CREATE TABLE IF NOT EXISTS audit_records (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                timestamp TEXT NOT NULL,
                actor_id TEXT NOT NULL,
                subject_id TEXT NOT NULL,
                section TEXT NOT NULL,
                subsection TEXT NOT NULL,
                action TEXT NOT NULL,
                project_id TEXT,
                old_value INTEGER NOT NULL,
                new_value INTEGER NOT NULL,
                remote_addr TEXT,
                user_agent TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_audit_subject
                ON audit_records(subject_id, timestamp);
            "#,
        )?;

        Ok(())
    }

    fn insert_audit_record(conn: &Connection, record: &AuditRecord) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO audit_records (id, timestamp, actor_id, subject_id, section,
                                       subsection, action, project_id, old_value,
                                       new_value, remote_addr, user_agent)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                record.id,
                record.timestamp.to_rfc3339(),
                record.actor.as_str(),
                record.subject.as_str(),
                record.section,
                record.subsection,
                record.action.as_str(),
                record.scope.project_id().map(|p| p.as_str()),
                record.old_value,
                record.new_value,
                record.origin.remote_addr,
                record.origin.user_agent,
            ],
        )?;
        Ok(())
    }
}

const GRANT_COLUMNS: &str =
    "subject_id, section, subsection, action, project_id, granted, updated_at";

fn row_to_grant(row: &rusqlite::Row<'_>) -> rusqlite::Result<Grant> {
    let action_token: String = row.get(3)?;
    let action = PermissionAction::parse(&action_token).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("unknown action token: {action_token}").into(),
        )
    })?;

    let project_id: String = row.get(4)?;
    let scope = if project_id.is_empty() {
        GrantScope::Global
    } else {
        GrantScope::Project(ProjectId::new(project_id))
    };

    let updated_at: String = row.get(6)?;
    let updated_at = DateTime::parse_from_rfc3339(&updated_at)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                6,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?
        .with_timezone(&Utc);

    Ok(Grant {
        subject: SubjectId::new(row.get::<_, String>(0)?),
        section: row.get(1)?,
        subsection: row.get(2)?,
        action,
        scope,
        granted: row.get(5)?,
        updated_at,
    })
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<AuditRecord> {
    let timestamp: String = row.get(1)?;
    let timestamp = DateTime::parse_from_rfc3339(&timestamp)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?
        .with_timezone(&Utc);

    let action_token: String = row.get(6)?;
    let action = PermissionAction::parse(&action_token).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            rusqlite::types::Type::Text,
            format!("unknown action token: {action_token}").into(),
        )
    })?;

    let project_id: Option<String> = row.get(7)?;
    let scope = match project_id {
        Some(id) => GrantScope::Project(ProjectId::new(id)),
        None => GrantScope::Global,
    };

    Ok(AuditRecord {
        id: row.get(0)?,
        timestamp,
        actor: SubjectId::new(row.get::<_, String>(2)?),
        subject: SubjectId::new(row.get::<_, String>(3)?),
        section: row.get(4)?,
        subsection: row.get(5)?,
        action,
        scope,
        old_value: row.get(8)?,
        new_value: row.get(9)?,
        origin: RequestOrigin {
            remote_addr: row.get(10)?,
            user_agent: row.get(11)?,
        },
    })
}

impl GrantStore for SqliteGrantStore {
    fn find(&self, key: &GrantKey) -> Result<Option<Grant>> {
        let conn = self.conn.lock();
        let project_id = key.scope.project_id().map(|p| p.as_str()).unwrap_or("");

        let grant = conn
            .query_row(
                &format!(
                    "SELECT {GRANT_COLUMNS} FROM grants
                     WHERE subject_id = ?1 AND section = ?2 AND subsection = ?3
                       AND action = ?4 AND project_id = ?5"
                ),
                params![
                    key.subject.as_str(),
                    key.section,
                    key.subsection,
                    key.action.as_str(),
                    project_id,
                ],
                row_to_grant,
            )
            .optional()?;

        Ok(grant)
    }

    fn grants_for_subject(&self, subject: &SubjectId) -> Result<Vec<Grant>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {GRANT_COLUMNS} FROM grants
             WHERE subject_id = ?1
             ORDER BY section, subsection, action, project_id"
        ))?;

        let grants = stmt
            .query_map(params![subject.as_str()], row_to_grant)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(grants)
    }

    fn upsert_with_audit(&self, grant: &Grant, record: &AuditRecord) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO grants (subject_id, section, subsection, action,
                                project_id, granted, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(subject_id, section, subsection, action, project_id)
            DO UPDATE SET granted = excluded.granted,
                          updated_at = excluded.updated_at
            "#,
            params![
                grant.subject.as_str(),
                grant.section,
                grant.subsection,
                grant.action.as_str(),
                grant.scope.project_id().map(|p| p.as_str()).unwrap_or(""),
                grant.granted,
                grant.updated_at.to_rfc3339(),
            ],
        )?;

        Self::insert_audit_record(&tx, record)?;

        tx.commit()?;
        Ok(())
    }

    fn grant_count(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM grants", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl AuditLog for SqliteGrantStore {
    fn append(&self, record: AuditRecord) -> Result<()> {
        let conn = self.conn.lock();
        Self::insert_audit_record(&conn, &record)
    }

    fn records(&self) -> Result<Vec<AuditRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, timestamp, actor_id, subject_id, section, subsection,
                    action, project_id, old_value, new_value, remote_addr, user_agent
             FROM audit_records
             ORDER BY seq ASC",
        )?;

        let records = stmt
            .query_map([], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    fn len(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM audit_records", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
