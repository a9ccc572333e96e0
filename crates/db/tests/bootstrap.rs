use sqlx::PgPool;

/// Connect, migrate, verify every table exists.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    solesync_db::health_check(&pool).await.unwrap();

    let tables = [
        "customers",
        "branches",
        "services",
        "appointments",
        "line_items",
        "dates",
        "announcements",
        "promos",
        "unavailability",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Every watched table carries the change notification trigger.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_change_triggers_installed(pool: PgPool) {
    let watched = ["appointments", "announcements", "promos", "line_items", "dates"];
    for table in watched {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM information_schema.triggers
             WHERE event_object_table = $1 AND action_statement LIKE '%notify_change%'",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(count.0 > 0, "{table} should have a notify_change trigger");
    }
}

/// Inserting into a watched table publishes on its `<table>_changes` channel.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_insert_publishes_notification(pool: PgPool) {
    let mut listener = sqlx::postgres::PgListener::connect_with(&pool).await.unwrap();
    listener.listen("promos_changes").await.unwrap();

    sqlx::query("INSERT INTO promos (promo_id, title) VALUES ('PROMO-1', 'Half off')")
        .execute(&pool)
        .await
        .unwrap();

    let notification = listener.recv().await.unwrap();
    let payload: serde_json::Value = serde_json::from_str(notification.payload()).unwrap();
    assert_eq!(payload["op"], "insert");
    assert_eq!(payload["key"], "PROMO-1");
}
