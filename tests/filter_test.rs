//! Pending-list filter semantics: each filter narrows, combinations AND.

use chrono::{Duration, Utc};

use partnerme::models::submission::{NewSubmission, SubmissionFilter, queries};
use partnerme::moderation::{self, ApproveOverrides};

mod common;
use common::{create_admin, create_test_image, setup_test_db, submission_input};

/// Insert a pending row directly through the store accessor, bypassing
/// service validation so contact-less fixtures are possible.
async fn insert_raw(
    pool: &sqlx::SqlitePool,
    title: &str,
    email: Option<&str>,
    phone: Option<&str>,
    flagged: bool,
    days_ago: i64,
) -> i64 {
    let mut tx = pool.begin().await.expect("tx");
    let id = queries::create_in_tx(
        &mut tx,
        &NewSubmission {
            title: title.to_string(),
            description: format!("Details about the {title} plan and its rollout"),
            budget_min: 1_000,
            budget_max: 9_000,
            contact_email: email.map(String::from),
            contact_phone: phone.map(String::from),
            submitter_ip: "192.0.2.1".to_string(),
            flagged_for_review: flagged,
            flag_reason: flagged.then(|| "fixture".to_string()),
            submitted_at: Utc::now() - Duration::days(days_ago),
        },
    )
    .await
    .expect("insert");
    tx.commit().await.expect("commit");
    id
}

fn filter() -> SubmissionFilter {
    SubmissionFilter::default()
}

#[tokio::test]
async fn search_matches_title_and_description() {
    let db = setup_test_db().await;
    let pool = db.pool();

    insert_raw(pool, "Mobile App Development", Some("a@b.com"), None, false, 0).await;
    insert_raw(pool, "Bakery Franchise", Some("a@b.com"), None, false, 0).await;

    let page = queries::find_pending(
        pool,
        &SubmissionFilter {
            search: Some("mobile".to_string()),
            ..filter()
        },
    )
    .await
    .expect("list");
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title, "Mobile App Development");
}

#[tokio::test]
async fn has_contact_and_search_combine_with_and() {
    let db = setup_test_db().await;
    let pool = db.pool();

    insert_raw(pool, "Mobile App Development", Some("founder@corp.com"), None, false, 0).await;
    insert_raw(pool, "Mobile Game", None, None, false, 0).await;

    let page = queries::find_pending(
        pool,
        &SubmissionFilter {
            search: Some("mobile".to_string()),
            has_contact: Some(true),
            ..filter()
        },
    )
    .await
    .expect("list");
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title, "Mobile App Development");

    let no_contact = queries::find_pending(
        pool,
        &SubmissionFilter {
            has_contact: Some(false),
            ..filter()
        },
    )
    .await
    .expect("list");
    assert_eq!(no_contact.total, 1);
    assert_eq!(no_contact.items[0].title, "Mobile Game");
}

#[tokio::test]
async fn phone_only_counts_as_contact() {
    let db = setup_test_db().await;
    let pool = db.pool();

    insert_raw(pool, "Food Truck", None, Some("+47 123 45 678"), false, 0).await;

    let page = queries::find_pending(
        pool,
        &SubmissionFilter {
            has_contact: Some(true),
            ..filter()
        },
    )
    .await
    .expect("list");
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn date_range_is_inclusive() {
    let db = setup_test_db().await;
    let pool = db.pool();

    insert_raw(pool, "Old Plan", Some("a@b.com"), None, false, 10).await;
    insert_raw(pool, "Recent Plan", Some("a@b.com"), None, false, 2).await;
    insert_raw(pool, "Fresh Plan", Some("a@b.com"), None, false, 0).await;

    let page = queries::find_pending(
        pool,
        &SubmissionFilter {
            date_from: Some(Utc::now() - Duration::days(5)),
            date_to: Some(Utc::now() - Duration::days(1)),
            ..filter()
        },
    )
    .await
    .expect("list");
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title, "Recent Plan");
}

#[tokio::test]
async fn all_filters_combined_intersect() {
    let db = setup_test_db().await;
    let pool = db.pool();

    // Only this one satisfies every predicate below.
    insert_raw(pool, "Mobile Repair Shop", Some("fix@shop.com"), None, true, 1).await;
    // Fails flagged.
    insert_raw(pool, "Mobile Deliveries", Some("go@fast.com"), None, false, 1).await;
    // Fails contact.
    insert_raw(pool, "Mobile Karaoke", None, None, true, 1).await;
    // Fails search.
    insert_raw(pool, "Garden Center", Some("dig@dirt.com"), None, true, 1).await;
    // Fails date range.
    insert_raw(pool, "Mobile Sauna", Some("hot@steam.com"), None, true, 30).await;

    let page = queries::find_pending(
        pool,
        &SubmissionFilter {
            search: Some("mobile".to_string()),
            has_contact: Some(true),
            flagged: Some(true),
            date_from: Some(Utc::now() - Duration::days(7)),
            date_to: Some(Utc::now()),
            ..filter()
        },
    )
    .await
    .expect("list");
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title, "Mobile Repair Shop");
}

#[tokio::test]
async fn terminal_submissions_never_listed() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let admin = create_admin(pool, "reviewer").await;

    let img_a = create_test_image(pool, "a").await;
    let img_b = create_test_image(pool, "b").await;
    let img_c = create_test_image(pool, "c").await;
    let approved = moderation::create_submission(pool, &submission_input(vec![img_a]), "ip")
        .await
        .expect("create");
    let rejected = moderation::create_submission(pool, &submission_input(vec![img_b]), "ip")
        .await
        .expect("create");
    moderation::create_submission(pool, &submission_input(vec![img_c]), "ip")
        .await
        .expect("create");

    moderation::approve_submission(pool, approved.id, admin, &ApproveOverrides::default())
        .await
        .expect("approve");
    moderation::reject_submission(pool, rejected.id, admin, None)
        .await
        .expect("reject");

    // Broadest possible filter still excludes terminal rows.
    let page = queries::find_pending(pool, &filter()).await.expect("list");
    assert_eq!(page.total, 1);
    assert!(page.items.iter().all(|s| !s.status.is_terminal()));
}

#[tokio::test]
async fn pagination_orders_newest_first() {
    let db = setup_test_db().await;
    let pool = db.pool();

    for i in 0..5 {
        insert_raw(pool, &format!("Plan {i}"), Some("a@b.com"), None, false, 5 - i).await;
    }

    let page1 = queries::find_pending(
        pool,
        &SubmissionFilter {
            page: Some(1),
            limit: Some(2),
            ..filter()
        },
    )
    .await
    .expect("page1");
    assert_eq!(page1.total, 5);
    assert_eq!(page1.total_pages, 3);
    assert_eq!(page1.items.len(), 2);
    assert_eq!(page1.items[0].title, "Plan 4", "newest first");

    let page3 = queries::find_pending(
        pool,
        &SubmissionFilter {
            page: Some(3),
            limit: Some(2),
            ..filter()
        },
    )
    .await
    .expect("page3");
    assert_eq!(page3.items.len(), 1);
    assert_eq!(page3.items[0].title, "Plan 0");
}
