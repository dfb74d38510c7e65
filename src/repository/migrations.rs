//! Idempotent schema-migration runner
//!
//! Applies every `.sql` script found under a directory exactly once, in
//! lexicographic file-name order, recording applied names in a
//! `migrations` bookkeeping table.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use sqlx::{Pool, Sqlite};

use crate::error::{AppError, AppResult};

/// Apply all pending migration scripts under `dir`.
///
/// Each script runs in its own transaction together with the insert of
/// its name into the bookkeeping table, so a script is either fully
/// applied and recorded or not applied at all. The first failure aborts
/// the run; later scripts are never attempted.
pub async fn apply_migrations(pool: &Pool<Sqlite>, dir: &Path) -> AppResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS migrations (
            name TEXT PRIMARY KEY,
            applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    let applied: HashSet<String> = sqlx::query_scalar("SELECT name FROM migrations")
        .fetch_all(pool)
        .await?
        .into_iter()
        .collect();

    let mut scripts = Vec::new();
    collect_scripts(dir, dir, &mut scripts)
        .map_err(|e| AppError::Migration(format!("failed to read {}: {}", dir.display(), e)))?;

    // Name order governs apply order and must be stable across runs
    scripts.sort_by(|a, b| a.0.cmp(&b.0));

    for (name, path) in scripts {
        if applied.contains(&name) {
            continue;
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| AppError::Migration(format!("failed to read {}: {}", name, e)))?;

        tracing::info!(migration = %name, "applying migration");

        let mut tx = pool.begin().await?;
        sqlx::raw_sql(&content).execute(&mut *tx).await?;
        sqlx::query("INSERT INTO migrations (name) VALUES (?)")
            .bind(&name)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(migration = %name, "migration applied");
    }

    Ok(())
}

/// Collect every `.sql` file under `dir`, recursively. Scripts are keyed
/// by their path relative to `base` so equal file names in different
/// subdirectories stay distinct in the bookkeeping table.
fn collect_scripts(base: &Path, dir: &Path, out: &mut Vec<(String, PathBuf)>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_scripts(base, &path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "sql") {
            let name = path
                .strip_prefix(base)
                .unwrap_or(&path)
                .to_string_lossy()
                .into_owned();
            out.push((name, path));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::Row;
    use uuid::Uuid;

    struct TempMigrationsDir(PathBuf);

    impl TempMigrationsDir {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("book-club-migrations-{}", Uuid::new_v4()));
            fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn write(&self, name: &str, content: &str) {
            let path = self.0.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
    }

    impl Drop for TempMigrationsDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    async fn test_pool() -> Pool<Sqlite> {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    async fn applied_names(pool: &Pool<Sqlite>) -> Vec<String> {
        sqlx::query_scalar("SELECT name FROM migrations ORDER BY name")
            .fetch_all(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn applies_scripts_in_lexicographic_order() {
        let dir = TempMigrationsDir::new();
        // 0002 depends on the table created by 0001
        dir.write("0002_add_row.sql", "INSERT INTO t (v) VALUES ('x');");
        dir.write("0001_create_t.sql", "CREATE TABLE t (v TEXT);");

        let pool = test_pool().await;
        apply_migrations(&pool, &dir.0).await.unwrap();

        let count: i64 = sqlx::query("SELECT COUNT(*) AS c FROM t")
            .fetch_one(&pool)
            .await
            .unwrap()
            .get("c");
        assert_eq!(count, 1);
        assert_eq!(
            applied_names(&pool).await,
            vec!["0001_create_t.sql", "0002_add_row.sql"]
        );
    }

    #[tokio::test]
    async fn discovers_scripts_recursively_and_skips_other_files() {
        let dir = TempMigrationsDir::new();
        dir.write("0001_create_t.sql", "CREATE TABLE t (v TEXT);");
        dir.write("nested/0002_add_row.sql", "INSERT INTO t (v) VALUES ('x');");
        dir.write("README.md", "not a migration");

        let pool = test_pool().await;
        apply_migrations(&pool, &dir.0).await.unwrap();

        assert_eq!(
            applied_names(&pool).await,
            vec!["0001_create_t.sql", "nested/0002_add_row.sql"]
        );
    }

    #[tokio::test]
    async fn same_file_name_in_different_subdirectories_both_apply() {
        let dir = TempMigrationsDir::new();
        dir.write("a/0001_step.sql", "CREATE TABLE t (v TEXT);");
        dir.write("b/0001_step.sql", "INSERT INTO t (v) VALUES ('x');");

        let pool = test_pool().await;
        apply_migrations(&pool, &dir.0).await.unwrap();

        assert_eq!(
            applied_names(&pool).await,
            vec!["a/0001_step.sql", "b/0001_step.sql"]
        );

        // Still idempotent with the relative-path keys
        apply_migrations(&pool, &dir.0).await.unwrap();
        let count: i64 = sqlx::query("SELECT COUNT(*) AS c FROM t")
            .fetch_one(&pool)
            .await
            .unwrap()
            .get("c");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let dir = TempMigrationsDir::new();
        dir.write("0001_create_t.sql", "CREATE TABLE t (v TEXT);");
        dir.write("0002_add_row.sql", "INSERT INTO t (v) VALUES ('x');");

        let pool = test_pool().await;
        apply_migrations(&pool, &dir.0).await.unwrap();
        apply_migrations(&pool, &dir.0).await.unwrap();

        // Each script recorded exactly once, and 0002 was not re-executed
        assert_eq!(applied_names(&pool).await.len(), 2);
        let count: i64 = sqlx::query("SELECT COUNT(*) AS c FROM t")
            .fetch_one(&pool)
            .await
            .unwrap()
            .get("c");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn only_new_scripts_run_on_a_later_invocation() {
        let dir = TempMigrationsDir::new();
        dir.write("0001_create_t.sql", "CREATE TABLE t (v TEXT);");

        let pool = test_pool().await;
        apply_migrations(&pool, &dir.0).await.unwrap();

        dir.write("0002_add_row.sql", "INSERT INTO t (v) VALUES ('x');");
        apply_migrations(&pool, &dir.0).await.unwrap();

        assert_eq!(applied_names(&pool).await.len(), 2);
    }

    #[tokio::test]
    async fn malformed_script_aborts_without_recording_or_skipping_ahead() {
        let dir = TempMigrationsDir::new();
        dir.write("0001_create_t.sql", "CREATE TABLE t (v TEXT);");
        dir.write("0002_broken.sql", "THIS IS NOT SQL;");
        dir.write("0003_never_runs.sql", "CREATE TABLE u (v TEXT);");

        let pool = test_pool().await;
        let err = apply_migrations(&pool, &dir.0).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));

        // 0001 applied and recorded, 0002 rolled back, 0003 never attempted
        assert_eq!(applied_names(&pool).await, vec!["0001_create_t.sql"]);
        let u_exists: i64 = sqlx::query(
            "SELECT COUNT(*) AS c FROM sqlite_master WHERE type = 'table' AND name = 'u'",
        )
        .fetch_one(&pool)
        .await
        .unwrap()
        .get("c");
        assert_eq!(u_exists, 0);
    }

    #[tokio::test]
    async fn unreadable_directory_fails() {
        let pool = test_pool().await;
        let missing = std::env::temp_dir().join(format!("missing-{}", Uuid::new_v4()));

        let err = apply_migrations(&pool, &missing).await.unwrap_err();
        assert!(matches!(err, AppError::Migration(_)));
    }
}
