use color_eyre::Result;

struct Migration {
    version: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "V1",
        sql: include_str!("../../migrations/V1__init.sql"),
    },
    Migration {
        version: "V2",
        sql: include_str!("../../migrations/V2__add_profile_sessions.sql"),
    },
];

/// Advisory lock key shared by every process migrating the same database.
const MIGRATION_LOCK_KEY: i64 = 0x6e6f_7465_6561_726c;

pub async fn run(pool: &sqlx::PgPool) -> Result<()> {
    for migration in MIGRATIONS {
        // Held until commit, across the applied check, so concurrent starters
        // apply each migration once.
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(MIGRATION_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version TEXT PRIMARY KEY,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&mut *tx)
        .await?;

        let already_applied: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE version = $1)",
        )
        .bind(migration.version)
        .fetch_one(&mut *tx)
        .await?;

        if already_applied {
            tx.commit().await?;
            continue;
        }

        sqlx::raw_sql(migration.sql).execute(&mut *tx).await?;

        sqlx::query("INSERT INTO schema_migrations (version) VALUES ($1)")
            .bind(migration.version)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(version = migration.version, "applied database migration");
    }

    Ok(())
}
