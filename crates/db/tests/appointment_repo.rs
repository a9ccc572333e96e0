//! Integration tests for appointment persistence and eligibility queries.

use chrono::{NaiveDate, NaiveTime};
use solesync_core::appointment::AppointmentStatus;
use solesync_db::models::appointment::CreateAppointment;
use solesync_db::models::customer::CreateCustomer;
use solesync_db::repositories::{AppointmentRepo, CustomerRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 6, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

async fn seed_branch(pool: &PgPool, branch_id: &str) {
    sqlx::query("INSERT INTO branches (branch_id, branch_name) VALUES ($1, $2)")
        .bind(branch_id)
        .bind(format!("Branch {branch_id}"))
        .execute(pool)
        .await
        .unwrap();
}

async fn seed_customer(pool: &PgPool, name: &str) -> String {
    let input = CreateCustomer {
        cust_name: name.to_string(),
        cust_bdate: None,
        cust_address: None,
        cust_contact: None,
        cust_email: None,
    };
    CustomerRepo::create(pool, &input).await.unwrap().cust_id
}

fn booking(cust_id: &str, day: u32, status: AppointmentStatus) -> CreateAppointment {
    CreateAppointment {
        cust_id: cust_id.to_string(),
        branch_id: "BR-1".to_string(),
        date_for_inquiry: date(day),
        time_start: time(10, 0),
        time_end: time(10, 30),
        status,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_generates_appointment_codes(pool: PgPool) {
    seed_branch(&pool, "BR-1").await;
    let cust = seed_customer(&pool, "Ana").await;

    let appt = AppointmentRepo::create(&pool, &booking(&cust, 10, AppointmentStatus::Pending))
        .await
        .unwrap();
    assert_eq!(appt.appointment_id, "APPT-1");
    assert_eq!(appt.status(), Some(AppointmentStatus::Pending));
    assert_eq!(appt.time_start, time(10, 0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_active_list_skips_canceled(pool: PgPool) {
    seed_branch(&pool, "BR-1").await;
    let cust = seed_customer(&pool, "Ana").await;

    AppointmentRepo::create(&pool, &booking(&cust, 9, AppointmentStatus::Pending))
        .await
        .unwrap();
    AppointmentRepo::create(&pool, &booking(&cust, 5, AppointmentStatus::Approved))
        .await
        .unwrap();
    AppointmentRepo::create(&pool, &booking(&cust, 7, AppointmentStatus::Canceled))
        .await
        .unwrap();

    let active = AppointmentRepo::list_active_for_customer(&pool, &cust)
        .await
        .unwrap();
    let statuses: Vec<_> = active.iter().map(|a| (a.status(), a.date_for_inquiry)).collect();
    assert_eq!(
        statuses,
        vec![
            (Some(AppointmentStatus::Approved), date(5)),
            (Some(AppointmentStatus::Pending), date(9)),
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_slot_count_ignores_canceled(pool: PgPool) {
    seed_branch(&pool, "BR-1").await;
    for (i, status) in [
        AppointmentStatus::Pending,
        AppointmentStatus::Approved,
        AppointmentStatus::Canceled,
    ]
    .into_iter()
    .enumerate()
    {
        let cust = seed_customer(&pool, &format!("Customer {i}")).await;
        AppointmentRepo::create(&pool, &booking(&cust, 10, status)).await.unwrap();
    }

    let count = AppointmentRepo::count_in_slot(&pool, "BR-1", date(10), time(10, 0))
        .await
        .unwrap();
    assert_eq!(count, 2);

    let other_slot = AppointmentRepo::count_in_slot(&pool, "BR-1", date(10), time(11, 0))
        .await
        .unwrap();
    assert_eq!(other_slot, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upcoming_is_earliest_non_canceled(pool: PgPool) {
    seed_branch(&pool, "BR-1").await;
    let cust = seed_customer(&pool, "Ana").await;

    AppointmentRepo::create(&pool, &booking(&cust, 2, AppointmentStatus::Approved))
        .await
        .unwrap();
    AppointmentRepo::create(&pool, &booking(&cust, 12, AppointmentStatus::Canceled))
        .await
        .unwrap();
    let later = AppointmentRepo::create(&pool, &booking(&cust, 20, AppointmentStatus::Pending))
        .await
        .unwrap();

    let upcoming = AppointmentRepo::find_upcoming_for_customer(&pool, &cust, date(10))
        .await
        .unwrap()
        .expect("an upcoming appointment");
    assert_eq!(upcoming.appointment_id, later.appointment_id);

    let none = AppointmentRepo::find_upcoming_for_customer(&pool, &cust, date(21))
        .await
        .unwrap();
    assert!(none.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cancel_then_canceled_slot_lookup(pool: PgPool) {
    seed_branch(&pool, "BR-1").await;
    let cust = seed_customer(&pool, "Ana").await;
    let appt = AppointmentRepo::create(&pool, &booking(&cust, 10, AppointmentStatus::Pending))
        .await
        .unwrap();

    let canceled = AppointmentRepo::cancel(&pool, &appt.appointment_id)
        .await
        .unwrap()
        .expect("row exists");
    assert_eq!(canceled.status(), Some(AppointmentStatus::Canceled));
    assert!(AppointmentRepo::cancel(&pool, "APPT-404").await.unwrap().is_none());

    let found = AppointmentRepo::find_canceled_in_slot(&pool, &cust, "BR-1", date(10), time(10, 0))
        .await
        .unwrap();
    assert!(found.is_some());
    assert!(AppointmentRepo::list_active_for_customer(&pool, &cust)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_pending_and_by_id(pool: PgPool) {
    seed_branch(&pool, "BR-1").await;
    let cust = seed_customer(&pool, "Ana").await;
    AppointmentRepo::create(&pool, &booking(&cust, 10, AppointmentStatus::Pending))
        .await
        .unwrap();
    let approved = AppointmentRepo::create(&pool, &booking(&cust, 11, AppointmentStatus::Approved))
        .await
        .unwrap();

    assert_eq!(AppointmentRepo::delete_pending_for_customer(&pool, &cust).await.unwrap(), 1);
    assert_eq!(AppointmentRepo::delete_pending_for_customer(&pool, &cust).await.unwrap(), 0);

    assert!(AppointmentRepo::delete(&pool, &approved.appointment_id).await.unwrap());
    assert!(AppointmentRepo::find_by_id(&pool, &approved.appointment_id)
        .await
        .unwrap()
        .is_none());
}
