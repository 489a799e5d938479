#![allow(dead_code)]

use noteearly::db::{
    Db, ModuleType, NewProfile, NewReadingModule, Profile, ReadingModule, Role,
};
use sqlx::{postgres::PgPoolOptions, PgPool};

/// Connects to `TEST_DATABASE_URL` inside a fresh schema so tests never share
/// rows. Returns `None` when no test database is configured.
pub async fn create_test_db() -> Option<Db> {
    let pool = create_test_pool().await?;
    Some(Db::from_pool(pool).await.expect("failed to create test database"))
}

/// A pool bound to a fresh, unmigrated schema.
pub async fn create_test_pool() -> Option<PgPool> {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);

    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL is not set; skipping database test");
        return None;
    };

    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let schema = format!("noteearly_test_{}_{}", std::process::id(), id);

    let setup = PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("failed to connect to test database");
    // Clean up leftover schema from previous runs
    sqlx::query(&format!("DROP SCHEMA IF EXISTS {schema} CASCADE"))
        .execute(&setup)
        .await
        .expect("failed to drop old test schema");
    sqlx::query(&format!("CREATE SCHEMA {schema}"))
        .execute(&setup)
        .await
        .expect("failed to create test schema");
    setup.close().await;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .after_connect(move |conn, _meta| {
            let statement = format!("SET search_path TO {schema}");
            Box::pin(async move {
                sqlx::query(&statement).execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect(&url)
        .await
        .expect("failed to open test pool");

    Some(pool)
}

/// A router-ready handle that never connects. Only usable for requests that
/// are rejected before touching the database.
pub fn offline_db() -> Db {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://noteearly@localhost/unused")
        .expect("lazy pool should accept a well-formed url");
    Db::lazy(pool)
}

pub async fn seed_admin(db: &Db) -> Profile {
    db.create_profile(NewProfile {
        role: Role::Admin,
        admin_id: None,
        full_name: "Ms. Rivera",
        pin: None,
        age: None,
        reading_level: None,
    })
    .await
    .expect("create admin")
}

pub async fn seed_student(db: &Db, admin_id: uuid::Uuid) -> Profile {
    db.create_profile(NewProfile {
        role: Role::Student,
        admin_id: Some(admin_id),
        full_name: "Sam",
        pin: Some("4321"),
        age: Some(9),
        reading_level: Some(3),
    })
    .await
    .expect("create student")
}

pub async fn seed_module(db: &Db, paragraphs: &[&str]) -> ReadingModule {
    db.create_reading_module(NewReadingModule {
        title: "The Clever Fox",
        paragraphs,
        level: 3,
        module_type: ModuleType::Curated,
        genre: Some("fable"),
        language: "en",
        admin_id: None,
    })
    .await
    .expect("create module")
}
