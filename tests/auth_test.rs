//! Credential storage and the best-effort login attempt trail.

use partnerme::auth::{password, rate_limit};
use partnerme::models::user::{NewUser, queries};

mod common;
use common::setup_test_db;

#[tokio::test]
async fn password_hash_round_trip() {
    let hash = password::hash_password("Correct-Horse-9").expect("hash");
    assert_ne!(hash, "Correct-Horse-9");
    assert!(password::verify_password("Correct-Horse-9", &hash).expect("verify"));
    assert!(!password::verify_password("wrong", &hash).expect("verify"));
}

#[tokio::test]
async fn user_lookup_by_username() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let hash = password::hash_password("Password1!").expect("hash");
    let id = queries::create(
        pool,
        &NewUser {
            username: "moderator".to_string(),
            password: hash,
            display_name: "Moderator".to_string(),
            is_admin: true,
        },
    )
    .await
    .expect("create");

    let found = queries::find_by_username(pool, "moderator")
        .await
        .expect("q")
        .expect("found");
    assert_eq!(found.id, id);
    assert!(found.is_admin);

    assert!(queries::find_by_username(pool, "nobody").await.expect("q").is_none());
}

#[tokio::test]
async fn login_attempts_are_recorded() {
    let db = setup_test_db().await;
    let pool = db.pool();

    rate_limit::record_login_attempt(pool, "203.0.113.9", false, None).await;
    rate_limit::record_login_attempt(pool, "203.0.113.9", true, Some(1)).await;

    let rows: Vec<(String, bool, Option<i64>)> =
        sqlx::query_as("SELECT identifier, success, user_id FROM login_attempts ORDER BY id")
            .fetch_all(pool)
            .await
            .expect("rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], ("203.0.113.9".to_string(), false, None));
    assert_eq!(rows[1], ("203.0.113.9".to_string(), true, Some(1)));
}
