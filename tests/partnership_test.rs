//! Partnership request lifecycle: creation against a published idea and
//! admin status updates.

use chrono::Utc;

use partnerme::models::business_idea::{NewBusinessIdea, queries as idea_queries};
use partnerme::models::partnership::{
    NewPartnershipRequest, PartnerRole, PartnershipStatus, queries,
};

mod common;
use common::setup_test_db;

async fn publish_idea(pool: &sqlx::SqlitePool, title: &str) -> i64 {
    idea_queries::create(
        pool,
        &NewBusinessIdea {
            title: title.to_string(),
            description: "A published idea for partners to join".to_string(),
            budget_min: 1_000,
            budget_max: 5_000,
            created_at: Utc::now(),
        },
    )
    .await
    .expect("idea")
}

fn request(name: &str, role: PartnerRole) -> NewPartnershipRequest {
    NewPartnershipRequest {
        name: name.to_string(),
        phone_number: "+47 987 65 432".to_string(),
        role,
    }
}

#[tokio::test]
async fn create_starts_pending() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let idea = publish_idea(pool, "Food Cart").await;

    let id = queries::create(pool, idea, &request("Kari", PartnerRole::Helper))
        .await
        .expect("create");
    let found = queries::find_by_id(pool, id).await.expect("q").expect("found");
    assert_eq!(found.business_idea_id, idea);
    assert_eq!(found.role, PartnerRole::Helper);
    assert_eq!(found.status, PartnershipStatus::Pending);
}

#[tokio::test]
async fn status_moves_through_admin_updates() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let idea = publish_idea(pool, "Food Cart").await;
    let id = queries::create(pool, idea, &request("Ola", PartnerRole::Outlet))
        .await
        .expect("create");

    assert!(queries::update_status(pool, id, PartnershipStatus::Contacted).await.expect("upd"));
    assert!(queries::update_status(pool, id, PartnershipStatus::Accepted).await.expect("upd"));
    let found = queries::find_by_id(pool, id).await.expect("q").expect("found");
    assert_eq!(found.status, PartnershipStatus::Accepted);

    assert!(!queries::update_status(pool, 999_999, PartnershipStatus::Rejected).await.expect("upd"));
}

#[tokio::test]
async fn listing_filters_by_status_and_idea() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let idea_a = publish_idea(pool, "Cart A").await;
    let idea_b = publish_idea(pool, "Cart B").await;

    let contacted = queries::create(pool, idea_a, &request("Kari", PartnerRole::Helper))
        .await
        .expect("create");
    queries::create(pool, idea_a, &request("Ola", PartnerRole::Outlet)).await.expect("create");
    queries::create(pool, idea_b, &request("Per", PartnerRole::Helper)).await.expect("create");
    queries::update_status(pool, contacted, PartnershipStatus::Contacted)
        .await
        .expect("upd");

    let all = queries::find_paginated(pool, 1, 10, None, None).await.expect("list");
    assert_eq!(all.total, 3);

    let only_contacted = queries::find_paginated(pool, 1, 10, Some(PartnershipStatus::Contacted), None)
        .await
        .expect("list");
    assert_eq!(only_contacted.total, 1);
    assert_eq!(only_contacted.items[0].id, contacted);

    let only_a_pending =
        queries::find_paginated(pool, 1, 10, Some(PartnershipStatus::Pending), Some(idea_a))
            .await
            .expect("list");
    assert_eq!(only_a_pending.total, 1);
    assert_eq!(only_a_pending.items[0].name, "Ola");
}
