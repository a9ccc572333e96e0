mod common;

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime};
use serde_json::json;
use solesync_client::ClientError;

use common::{api_for, serve};

fn appointment_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "appointment_id": id,
        "cust_id": "CUST-00-0001",
        "branch_id": "BR-1",
        "date_for_inquiry": "2030-06-01",
        "time_start": "09:00:00",
        "time_end": "09:30:00",
        "status": status,
    })
}

#[tokio::test]
async fn upcoming_appointment_unwraps_data_envelope() {
    let body = json!({ "data": appointment_json("APPT-4", "Pending") }).to_string();
    let server = serve(vec![(200, body)]).await;
    let api = api_for(&server);

    let appointment = api.upcoming_appointment("CUST-00-0001").await.unwrap().unwrap();
    assert_eq!(appointment.appointment_id, "APPT-4");

    let requests = server.requests.lock().await;
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/appointments/customer/CUST-00-0001");
}

#[tokio::test]
async fn no_upcoming_appointment_is_none() {
    let body = json!({ "error": "No upcoming appointment", "code": "NOT_FOUND" }).to_string();
    let server = serve(vec![(404, body)]).await;
    let api = api_for(&server);

    let result = api.upcoming_appointment("CUST-00-0001").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn api_errors_carry_server_message() {
    let body = json!({ "error": "This time slot is fully booked", "code": "VALIDATION_ERROR" })
        .to_string();
    let server = serve(vec![(400, body)]).await;
    let api = api_for(&server);

    let result = api
        .book_slot(
            "CUST-00-0001",
            "BR-1",
            NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        )
        .await;
    let expected = "This time slot is fully booked";
    assert_matches!(
        result,
        Err(ClientError::Api { status: 400, ref message }) if message == expected
    );

    let requests = server.requests.lock().await;
    let sent: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(sent["time_start"], "09:00");
    assert_eq!(sent["time_end"], "09:30");
    assert_eq!(sent["date_for_inquiry"], "2030-06-01");
}

#[tokio::test]
async fn non_json_error_body_is_kept_verbatim() {
    let server = serve(vec![(500, "upstream exploded".to_string())]).await;
    let api = api_for(&server);

    let result = api.branches().await;
    assert_matches!(
        result,
        Err(ClientError::Api { status: 500, ref message }) if message == "upstream exploded"
    );
}

#[tokio::test]
async fn login_token_is_sent_on_protected_calls() {
    let login = json!({ "data": {
        "token": "tok-123",
        "user_id": "CUST-00-0001",
        "cust_name": "Jane Doe",
        "expires_in": 86400,
    }})
    .to_string();
    let customer = json!({ "data": {
        "cust_id": "CUST-00-0001",
        "cust_name": "Jane Doe",
        "credibility": 90,
    }})
    .to_string();
    let server = serve(vec![(200, login), (200, customer)]).await;
    let api = api_for(&server);

    let session = api
        .login("Jane", "Doe", NaiveDate::from_ymd_opt(1990, 4, 2).unwrap())
        .await
        .unwrap();
    assert_eq!(session.user_id, "CUST-00-0001");

    let score = api.credibility("CUST-00-0001").await.unwrap();
    assert_eq!(score, 90);

    let requests = server.requests.lock().await;
    let sent: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(
        sent,
        json!({ "firstName": "Jane", "lastName": "Doe", "cust_bdate": "1990-04-02" })
    );
    assert_eq!(requests[1].path, "/api/customers/CUST-00-0001");
    assert_eq!(requests[1].header("authorization"), Some("Bearer tok-123"));
}

#[tokio::test]
async fn branch_name_is_cached_after_first_lookup() {
    let body = json!({ "data": { "branch_id": "BR-1", "branch_name": "SM Megamall" } }).to_string();
    let server = serve(vec![(200, body)]).await;
    let api = api_for(&server);

    assert_eq!(api.branch_name("BR-1").await, "SM Megamall");
    assert_eq!(api.branch_name("BR-1").await, "SM Megamall");
    assert_eq!(server.requests.lock().await.len(), 1);
}

#[tokio::test]
async fn path_ids_are_percent_encoded() {
    let body = json!({ "data": { "branch_id": "BR 1/A", "branch_name": "Annex" } }).to_string();
    let server = serve(vec![(200, body)]).await;
    let api = api_for(&server);

    let branch = api.branch("BR 1/A").await.unwrap();
    assert_eq!(branch.branch_name, "Annex");
    assert_eq!(server.requests.lock().await[0].path, "/api/branches/BR%201%2FA");
}

#[tokio::test]
async fn branch_name_falls_back_to_id() {
    let body = json!({ "error": "Branch not found", "code": "NOT_FOUND" }).to_string();
    let server = serve(vec![(404, body)]).await;
    let api = api_for(&server);

    assert_eq!(api.branch_name("BR-404").await, "BR-404");
}

#[tokio::test]
async fn canceled_slot_check_sends_query_params() {
    let body = json!({ "data": { "blocked": false } }).to_string();
    let server = serve(vec![(200, body)]).await;
    let api = api_for(&server);

    let check = api
        .check_canceled_slot(
            "CUST-00-0001",
            "BR-1",
            NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
            NaiveTime::from_hms_opt(13, 30, 0).unwrap(),
        )
        .await
        .unwrap();
    assert!(!check.blocked);

    let requests = server.requests.lock().await;
    let path = &requests[0].path;
    assert!(path.starts_with("/api/appointments/canceled/check?"));
    assert!(path.contains("cust_id=CUST-00-0001"));
    assert!(path.contains("date_for_inquiry=2030-06-01"));
    assert!(path.contains("time_start=13%3A30"));
}

#[tokio::test]
async fn delete_pending_accepts_empty_success() {
    let body = json!({ "data": { "message": "Pending appointments deleted" } }).to_string();
    let server = serve(vec![(200, body)]).await;
    let api = api_for(&server);

    api.delete_pending("CUST-00-0001").await.unwrap();

    let requests = server.requests.lock().await;
    assert_eq!(requests[0].method, "DELETE");
    assert_eq!(requests[0].path, "/api/appointments/customer/CUST-00-0001/pending");
}

#[tokio::test]
async fn dates_without_session_is_not_signed_in() {
    let server = serve(vec![]).await;
    let api = api_for(&server);

    assert_matches!(api.dates("LI-1").await, Err(ClientError::NotSignedIn));
    assert!(server.requests.lock().await.is_empty());
}
