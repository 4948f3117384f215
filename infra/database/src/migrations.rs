use crate::error::{DatabaseError, DatabaseErrorExt};
use chub_domain::constants::MIGRATION_TABLE;
use fxhash::FxHashMap;
use sha2::{Digest, Sha256};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::types::SurrealValue;

/// A versioned schema script owned by a feature slice.
///
/// Versions follow the `0000-name` convention and are applied in the order the
/// slice lists them. The runner wraps every script in its own transaction, so
/// scripts must not open or commit transactions themselves.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub slice: &'static str,
    pub version: &'static str,
    pub script: &'static str,
}

impl Migration {
    #[must_use]
    pub const fn new(slice: &'static str, version: &'static str, script: &'static str) -> Self {
        Self { slice, version, script }
    }

    /// Hex encoded SHA-256 of the script.
    #[must_use]
    pub fn checksum(&self) -> String {
        hex::encode(Sha256::digest(self.script.as_bytes()))
    }

    fn key(&self) -> String {
        format!("{}:{}", self.slice, self.version)
    }

    fn validate(&self) -> Result<(), DatabaseError> {
        let starts_with_digit = self.version.chars().next().is_some_and(|c| c.is_ascii_digit());
        if !starts_with_digit || !self.version.contains('-') {
            return Err(DatabaseError::Migration {
                message: format!("Invalid version '{}' (expected '0000-name')", self.version)
                    .into(),
                context: Some(self.slice.into()),
            });
        }

        let script = self.script.to_lowercase();
        if script.contains("begin transaction") || script.contains("commit transaction") {
            return Err(DatabaseError::Migration {
                message: "Manual transaction control is not allowed".into(),
                context: Some(self.key().into()),
            });
        }

        Ok(())
    }
}

/// Outcome of a migration run, as `slice:version` keys.
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
}

#[derive(Debug, SurrealValue)]
struct AppliedMigration {
    slice: String,
    version: String,
    checksum: String,
}

#[derive(Debug)]
pub(crate) struct MigrationRunner<'a> {
    db: &'a Surreal<Any>,
    migrations: &'a [Migration],
}

impl<'a> MigrationRunner<'a> {
    pub(crate) const fn new(db: &'a Surreal<Any>, migrations: &'a [Migration]) -> Self {
        Self { db, migrations }
    }

    pub(crate) async fn run(&self) -> Result<MigrationReport, DatabaseError> {
        for migration in self.migrations {
            migration.validate()?;
        }

        self.db
            .query(format!("DEFINE TABLE IF NOT EXISTS {MIGRATION_TABLE} SCHEMALESS;"))
            .await
            .context("Defining migration table")?
            .check()
            .map_err(surrealdb::Error::from)?;

        let applied = self.applied_migrations().await?;
        let mut report = MigrationReport::default();

        for migration in self.migrations {
            let checksum = migration.checksum();

            if let Some(existing) = applied.get(&migration.key()) {
                if existing.checksum != checksum {
                    return Err(DatabaseError::Migration {
                        message: format!(
                            "Checksum mismatch for {} (recorded {}, found {checksum})",
                            migration.key(),
                            existing.checksum
                        )
                        .into(),
                        context: Some("Migration already applied with different contents".into()),
                    });
                }
                report.skipped.push(migration.key());
                continue;
            }

            self.apply(migration, checksum).await?;
            report.applied.push(migration.key());
        }

        Ok(report)
    }

    async fn apply(&self, migration: &Migration, checksum: String) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            {}
            CREATE {MIGRATION_TABLE} CONTENT {{
                slice: $slice,
                version: $version,
                checksum: $checksum,
                applied_at: time::now()
            }} RETURN NONE;
            COMMIT TRANSACTION;",
            migration.script,
        );

        self.db
            .query(query)
            .bind(("slice", migration.slice))
            .bind(("version", migration.version))
            .bind(("checksum", checksum))
            .await
            .context(format!("Applying migration {}", migration.key()))?
            .check()
            .map_err(surrealdb::Error::from)
            .context(format!("Migration {} failed", migration.key()))?;

        Ok(())
    }

    async fn applied_migrations(
        &self,
    ) -> Result<FxHashMap<String, AppliedMigration>, DatabaseError> {
        let entries = self
            .db
            .query(format!("SELECT slice, version, checksum FROM {MIGRATION_TABLE}"))
            .await
            .context("Loading applied migrations")?
            .take::<Vec<AppliedMigration>>(0)
            .context("Parsing applied migrations")?;

        Ok(entries
            .into_iter()
            .map(|entry| (format!("{}:{}", entry.slice, entry.version), entry))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_is_stable_sha256() {
        let migration = Migration::new("customer", "0001-init", "");
        assert_eq!(
            migration.checksum(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn versions_must_follow_convention() {
        assert!(Migration::new("customer", "0001-init", "DEFINE TABLE a;").validate().is_ok());
        assert!(Migration::new("customer", "init", "DEFINE TABLE a;").validate().is_err());
        assert!(Migration::new("customer", "0001", "DEFINE TABLE a;").validate().is_err());
    }

    #[test]
    fn scripts_cannot_control_transactions() {
        let migration =
            Migration::new("customer", "0001-init", "BEGIN TRANSACTION; DEFINE TABLE a;");
        let err = migration.validate().unwrap_err();
        assert!(matches!(err, DatabaseError::Migration { .. }));
    }

    async fn memory_engine() -> Surreal<Any> {
        let db = surrealdb::engine::any::connect("mem://").await.expect("mem engine");
        db.use_ns("test").use_db("migrations").await.expect("session");
        db
    }

    #[tokio::test]
    async fn rerun_skips_applied_and_rejects_drift() {
        let db = memory_engine().await;
        let v1 = [Migration::new("demo", "0001-table", "DEFINE TABLE IF NOT EXISTS demo;")];

        let first = MigrationRunner::new(&db, &v1).run().await.expect("first run");
        assert_eq!(first.applied, ["demo:0001-table"]);
        assert!(first.skipped.is_empty());

        let second = MigrationRunner::new(&db, &v1).run().await.expect("second run");
        assert!(second.applied.is_empty());
        assert_eq!(second.skipped, ["demo:0001-table"]);

        let altered =
            [Migration::new("demo", "0001-table", "DEFINE TABLE IF NOT EXISTS demo SCHEMAFULL;")];
        let err = MigrationRunner::new(&db, &altered).run().await.unwrap_err();
        assert!(matches!(err, DatabaseError::Migration { .. }));
    }

    #[tokio::test]
    async fn new_versions_apply_after_recorded_ones() {
        let db = memory_engine().await;
        let v1 = Migration::new("demo", "0001-table", "DEFINE TABLE IF NOT EXISTS demo;");
        let v2 = Migration::new("demo", "0002-field", "DEFINE FIELD IF NOT EXISTS a ON demo;");

        MigrationRunner::new(&db, &[v1]).run().await.expect("v1");
        let report = MigrationRunner::new(&db, &[v1, v2]).run().await.expect("v1 + v2");
        assert_eq!(report.skipped, ["demo:0001-table"]);
        assert_eq!(report.applied, ["demo:0002-field"]);
    }
}
