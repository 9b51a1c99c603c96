//! Migration runner
//!
//! Installs the schema through embedded migrations recorded in a
//! `schema_version` ledger. Reopening an up-to-date database applies
//! nothing. A database that records a migration this build does not
//! know, or a checksum disagreeing with the embedded SQL, is
//! incompatible and refuses to open.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, migration_error, schema_incompatible, Result};
use crate::migrations::embedded::{get_migrations, Migration};
use rusqlite::Connection;
use snapvault_core::digest::digest_hex;

/// A row of the `schema_version` ledger
struct AppliedMigration {
    migration_id: String,
    checksum: Option<String>,
}

/// Bring the database up to this build's schema
pub fn apply_migrations(conn: &mut Connection) -> Result<()> {
    ensure_version_table(conn)?;

    let migrations = get_migrations();
    let applied = applied_migrations(conn)?;

    // Recorded history must be a subset of what this build embeds,
    // byte-for-byte
    for row in &applied {
        match migrations.iter().find(|m| m.id == row.migration_id) {
            None => {
                return Err(schema_incompatible(format!(
                    "database records unknown migration {} (created by a newer build?)",
                    row.migration_id
                )))
            }
            Some(migration) => {
                if let Some(recorded) = &row.checksum {
                    let expected = digest_hex(migration.sql.as_bytes());
                    if *recorded != expected {
                        return Err(schema_incompatible(format!(
                            "checksum mismatch for migration {}: expected {}, got {}",
                            row.migration_id, expected, recorded
                        )));
                    }
                }
            }
        }
    }

    for migration in &migrations {
        let pending = !applied.iter().any(|row| row.migration_id == migration.id);
        if pending {
            apply_one(conn, migration)?;
        }
    }

    Ok(())
}

fn ensure_version_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY,
            migration_id TEXT NOT NULL UNIQUE,
            applied_at INTEGER NOT NULL,
            checksum TEXT
        )",
    )
    .map_err(from_rusqlite)
}

fn applied_migrations(conn: &Connection) -> Result<Vec<AppliedMigration>> {
    let mut stmt = conn
        .prepare("SELECT migration_id, checksum FROM schema_version ORDER BY id")
        .map_err(from_rusqlite)?;
    let rows: std::result::Result<Vec<_>, _> = stmt
        .query_map([], row_to_applied_migration)
        .map_err(from_rusqlite)?
        .collect();
    rows.map_err(from_rusqlite)
}

fn row_to_applied_migration(row: &rusqlite::Row<'_>) -> rusqlite::Result<AppliedMigration> {
    Ok(AppliedMigration {
        migration_id: row.get(0)?,
        checksum: row.get(1)?,
    })
}

/// Run one migration and record it, atomically
fn apply_one(conn: &mut Connection, migration: &Migration) -> Result<()> {
    let checksum = digest_hex(migration.sql.as_bytes());

    let tx = conn.transaction().map_err(from_rusqlite)?;
    tx.execute_batch(migration.sql)
        .map_err(|e| migration_error(migration.id, &e.to_string()))?;
    tx.execute(
        "INSERT INTO schema_version (migration_id, applied_at, checksum) VALUES (?1, ?2, ?3)",
        rusqlite::params![migration.id, chrono::Utc::now().timestamp(), checksum],
    )
    .map_err(from_rusqlite)?;
    tx.commit().map_err(from_rusqlite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapvault_core::errors::SvErrorKind;

    fn version_rows(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_fresh_database_installs_schema() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('snapshots', 'contents', 'files')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 3);
        assert_eq!(version_rows(&conn), get_migrations().len() as i64);
    }

    #[test]
    fn test_reapply_records_nothing_new() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        let after_first = version_rows(&conn);

        apply_migrations(&mut conn).unwrap();
        assert_eq!(version_rows(&conn), after_first);
    }

    #[test]
    fn test_applied_rows_carry_checksums() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();

        for row in applied_migrations(&conn).unwrap() {
            let checksum = row.checksum.expect("checksum recorded");
            assert_eq!(checksum.len(), 64);
        }
    }

    #[test]
    fn test_unknown_recorded_migration_is_schema_error() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO schema_version (migration_id, applied_at, checksum)
             VALUES ('999_from_the_future', 0, NULL)",
            [],
        )
        .unwrap();

        let err = apply_migrations(&mut conn).unwrap_err();
        assert_eq!(err.kind(), SvErrorKind::Schema);
    }

    #[test]
    fn test_checksum_mismatch_is_schema_error() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn.execute(
            "UPDATE schema_version SET checksum = 'tampered'
             WHERE migration_id = '001_initial_schema'",
            [],
        )
        .unwrap();

        let err = apply_migrations(&mut conn).unwrap_err();
        assert_eq!(err.kind(), SvErrorKind::Schema);
    }
}
