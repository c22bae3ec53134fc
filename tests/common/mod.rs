//! Shared test infrastructure: temp-file SQLite pools plus fixture helpers
//! for submissions and images.
#![allow(dead_code)]

use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tempfile::TempDir;

use partnerme::auth::password;
use partnerme::db::MIGRATIONS;
use partnerme::models::image::{NewVariant, VariantKind, queries as image_queries};
use partnerme::models::user::{NewUser, queries as user_queries};
use partnerme::moderation::CreateSubmission;

pub struct TestDb {
    // Held so the backing file outlives the pool.
    _dir: TempDir,
    pool: SqlitePool,
}

impl TestDb {
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Fresh database with schema applied. Each test gets its own file.
pub async fn setup_test_db() -> TestDb {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");

    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))
        .expect("Bad test DB path")
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await
        .expect("Failed to open test DB");

    sqlx::raw_sql(MIGRATIONS)
        .execute(&pool)
        .await
        .expect("Failed to run migrations");

    TestDb { _dir: dir, pool }
}

/// Seed an admin reviewer and return their id.
pub async fn create_admin(pool: &SqlitePool, username: &str) -> i64 {
    let hash = password::hash_password("Password1!").expect("hash");
    user_queries::create(
        pool,
        &NewUser {
            username: username.to_string(),
            password: hash,
            display_name: "Reviewer".to_string(),
            is_admin: true,
        },
    )
    .await
    .expect("create admin")
}

/// Insert an unowned image row with its three variant rows; returns the id.
pub async fn create_test_image(pool: &SqlitePool, filename: &str) -> i64 {
    let variants: Vec<NewVariant> = VariantKind::ALL
        .iter()
        .map(|kind| NewVariant {
            kind: *kind,
            storage_path: format!("{}-{}.png", filename, kind.as_str().to_lowercase()),
            width: 100,
            height: 100,
            size: 1234,
        })
        .collect();

    image_queries::create_with_variants(pool, filename, "image/png", Utc::now(), &variants)
        .await
        .expect("create image")
}

/// Baseline valid submission payload; tests override fields as needed.
pub fn submission_input(image_ids: Vec<i64>) -> CreateSubmission {
    CreateSubmission {
        title: "Neighborhood Coffee Cart".to_string(),
        description: "A small mobile coffee cart serving the morning commute near the station."
            .to_string(),
        budget_min: 5_000,
        budget_max: 20_000,
        contact_email: Some("founder@example.org".to_string()),
        contact_phone: None,
        image_ids,
    }
}

/// A minimal valid PNG header, enough for the probe stage of the pipeline.
pub fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
    data.extend_from_slice(&[0, 0, 0, 13]);
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[8, 6, 0, 0, 0]);
    data.extend_from_slice(&[0u8; 16]);
    data
}
