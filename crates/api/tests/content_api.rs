//! HTTP-level tests for read-only content: branches, services, line items,
//! dates, announcements, promos and unavailability.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, seed, token_for};
use sqlx::PgPool;

async fn seed_content(pool: &PgPool) {
    seed(
        pool,
        &[
            "INSERT INTO branches (branch_id, branch_name, branch_type) VALUES
                ('BR-1', 'Makati', 'B'), ('BR-2', 'Hub', 'A')",
            "INSERT INTO services (service_id, service_name, service_base_price) VALUES
                ('SRV-1', 'Deep Clean', 350)",
            "INSERT INTO customers (cust_id, cust_name) VALUES
                ('CUST-00-0001', 'Ana Cruz'), ('CUST-00-0002', 'Ben Reyes')",
            "INSERT INTO line_items (line_item_id, transaction_id, cust_id, branch_id, shoes, services)
                VALUES ('LI-1', 'TX-1', 'CUST-00-0001', 'BR-1', 'White sneakers', '{SRV-1}')",
            "INSERT INTO dates (line_item_id, cust_id, acknowledged_at, in_process_at)
                VALUES ('LI-1', 'CUST-00-0001', NOW() - INTERVAL '2 days', NOW())",
            "INSERT INTO announcements (announcement_id, title, announcement_date, branch_id) VALUES
                ('ANN-1', 'Old news', NOW() - INTERVAL '3 days', NULL),
                ('ANN-2', 'Branch open', NOW(), 'BR-1')",
            "INSERT INTO promos (promo_id, title, duration, branch_id) VALUES
                ('PROMO-1', 'Rainy day', 'June only', 'BR-1')",
            "INSERT INTO unavailability (unavailability_id, branch_id, date_unavailable, type)
                VALUES ('UN-1', 'BR-1', '2030-06-10', 'Full Day')",
        ],
    )
    .await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn branch_listing_only_returns_type_b(pool: PgPool) {
    seed_content(&pool).await;

    let json = body_json(get(common::build_test_app(pool.clone()), "/api/branches/b").await).await;
    let branches = json["data"].as_array().unwrap();
    assert_eq!(branches.len(), 1);
    assert_eq!(branches[0]["branch_id"], "BR-1");

    let missing = get(common::build_test_app(pool), "/api/branches/BR-9").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn services_catalog(pool: PgPool) {
    seed_content(&pool).await;

    let json = body_json(get(common::build_test_app(pool.clone()), "/api/services").await).await;
    assert_eq!(json["data"][0]["service_name"], "Deep Clean");

    let one = get(common::build_test_app(pool), "/api/services/SRV-1").await;
    assert_eq!(one.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn line_items_for_customer(pool: PgPool) {
    seed_content(&pool).await;

    let json = body_json(
        get(
            common::build_test_app(pool.clone()),
            "/api/line-items/customer/CUST-00-0001",
        )
        .await,
    )
    .await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["services"][0], "SRV-1");

    let empty = body_json(
        get(common::build_test_app(pool), "/api/line-items/customer/CUST-00-0002").await,
    )
    .await;
    assert!(empty["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dates_include_timeline_and_current_stage(pool: PgPool) {
    seed_content(&pool).await;

    let response = get_auth(
        common::build_test_app(pool),
        "/api/dates/LI-1",
        &token_for("CUST-00-0001"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["line_item_id"], "LI-1");
    assert_eq!(json["data"]["current_status"], 2);
    assert_eq!(json["data"]["current_stage"], "in_process");
    let timeline = json["data"]["timeline"].as_array().unwrap();
    assert_eq!(timeline.len(), 5);
    assert!(timeline[1]["reached_at"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dates_of_another_customer_are_forbidden(pool: PgPool) {
    seed_content(&pool).await;

    let response = get_auth(
        common::build_test_app(pool),
        "/api/dates/LI-1",
        &token_for("CUST-00-0002"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn announcements_newest_first_with_branch_name(pool: PgPool) {
    seed_content(&pool).await;

    let json = body_json(get(common::build_test_app(pool), "/api/announcements").await).await;
    let list = json["data"].as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], "ANN-2");
    assert_eq!(list[0]["branch_name"], "Makati");
    assert!(list[1]["branch_name"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn promos_carry_duration(pool: PgPool) {
    seed_content(&pool).await;

    let json = body_json(get(common::build_test_app(pool), "/api/promos").await).await;
    assert_eq!(json["data"][0]["duration"], "June only");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unavailability_requires_branch_and_date(pool: PgPool) {
    seed_content(&pool).await;

    let missing = get(
        common::build_test_app(pool.clone()),
        "/api/unavailability?branch_id=BR-1",
    )
    .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let json = body_json(
        get(
            common::build_test_app(pool),
            "/api/unavailability?branch_id=BR-1&date=2030-06-10",
        )
        .await,
    )
    .await;
    assert_eq!(json["data"][0]["type"], "Full Day");
}
