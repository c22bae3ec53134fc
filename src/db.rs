use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

pub const MIGRATIONS: &str = include_str!("schema.sql");

pub async fn init_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(MIGRATIONS).execute(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Seed the default admin account if no users exist (idempotent).
pub async fn seed_admin(pool: &SqlitePool, admin_password_hash: &str) -> Result<(), sqlx::Error> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    if count.0 > 0 {
        log::info!("Users already seeded ({} rows), skipping admin seed", count.0);
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO users (username, password, display_name, is_admin) VALUES (?, ?, ?, 1)",
    )
    .bind("admin")
    .bind(admin_password_hash)
    .bind("Administrator")
    .execute(pool)
    .await?;

    log::info!("Seeded default admin user");
    Ok(())
}
