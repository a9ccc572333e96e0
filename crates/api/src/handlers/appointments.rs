//! Handlers for the `/appointments` resource.
//!
//! Booking runs every eligibility rule before the insert, in order:
//! required fields, time window, customer credibility, branch
//! unavailability, existing Pending, existing Approved (today or later),
//! slot capacity.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use solesync_core::appointment::{
    check_credibility, check_existing_bookings, check_slot_capacity, parse_date, parse_time,
    validate_time_window, AppointmentStatus,
};
use solesync_core::error::CoreError;
use solesync_db::models::appointment::{Appointment, CreateAppointment};
use solesync_db::repositories::{AppointmentRepo, CustomerRepo, UnavailabilityRepo};
use solesync_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::handlers::non_blank;
use crate::query::SlotParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /appointments`. Fields are optional so that a
/// missing field yields the booking error rather than a decode error.
#[derive(Debug, Default, Deserialize)]
pub struct BookAppointmentRequest {
    pub cust_id: Option<String>,
    pub branch_id: Option<String>,
    pub date_for_inquiry: Option<String>,
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    pub status: Option<String>,
}

/// Result of `GET /appointments/canceled/check`.
#[derive(Debug, Serialize)]
pub struct CanceledSlotCheck {
    pub blocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Validated booking input.
#[derive(Debug)]
struct Booking {
    cust_id: String,
    branch_id: String,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    status: AppointmentStatus,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn rejected(message: &str) -> AppError {
    AppError::Core(CoreError::Validation(message.to_string()))
}

fn parse_booking(input: BookAppointmentRequest) -> AppResult<Booking> {
    let (Some(cust_id), Some(branch_id), Some(date), Some(start), Some(end)) = (
        non_blank(input.cust_id),
        non_blank(input.branch_id),
        non_blank(input.date_for_inquiry),
        non_blank(input.time_start),
        non_blank(input.time_end),
    ) else {
        return Err(AppError::BadRequest("Missing required fields".into()));
    };

    let date = parse_date(&date)?;
    let start = parse_time(&start)?;
    let end = parse_time(&end)?;
    validate_time_window(start, end)?;

    let status = match non_blank(input.status) {
        Some(raw) => raw.parse::<AppointmentStatus>()?,
        None => AppointmentStatus::Pending,
    };

    Ok(Booking {
        cust_id,
        branch_id,
        date,
        start,
        end,
        status,
    })
}

/// Run the database-backed eligibility rules for a parsed booking.
async fn check_eligibility(pool: &DbPool, booking: &Booking, today: NaiveDate) -> AppResult<()> {
    let customer = CustomerRepo::find_by_id(pool, &booking.cust_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Customer",
                id: booking.cust_id.clone(),
            })
        })?;
    check_credibility(customer.credibility)?;

    let windows =
        UnavailabilityRepo::list_for_branch_on(pool, &booking.branch_id, booking.date).await?;
    if windows.iter().any(|w| w.blocks(booking.start, booking.end)) {
        return Err(rejected("The branch is unavailable at the selected date and time"));
    }

    let existing = AppointmentRepo::list_active_for_customer(pool, &booking.cust_id).await?;
    check_existing_bookings(
        existing
            .iter()
            .filter_map(|a| a.status().map(|status| (status, a.date_for_inquiry))),
        today,
    )?;

    let booked =
        AppointmentRepo::count_in_slot(pool, &booking.branch_id, booking.date, booking.start)
            .await?;
    check_slot_capacity(booked)?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/appointments
pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<BookAppointmentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Appointment>>)> {
    let booking = parse_booking(input)?;
    check_eligibility(&state.pool, &booking, today()).await?;

    let appointment = AppointmentRepo::create(
        &state.pool,
        &CreateAppointment {
            cust_id: booking.cust_id,
            branch_id: booking.branch_id,
            date_for_inquiry: booking.date,
            time_start: booking.start,
            time_end: booking.end,
            status: booking.status,
        },
    )
    .await?;

    tracing::info!(
        appointment_id = %appointment.appointment_id,
        cust_id = %appointment.cust_id,
        branch_id = %appointment.branch_id,
        "Appointment booked",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: appointment })))
}

/// GET /api/appointments/customer/{cust_id}
///
/// Earliest non-canceled appointment dated today or later.
pub async fn upcoming_for_customer(
    State(state): State<AppState>,
    Path(cust_id): Path<String>,
) -> AppResult<Json<DataResponse<Appointment>>> {
    let appointment = AppointmentRepo::find_upcoming_for_customer(&state.pool, &cust_id, today())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Upcoming appointment for customer",
                id: cust_id.clone(),
            })
        })?;
    Ok(Json(DataResponse { data: appointment }))
}

/// DELETE /api/appointments/customer/{cust_id}/pending
pub async fn delete_pending_for_customer(
    State(state): State<AppState>,
    Path(cust_id): Path<String>,
) -> AppResult<Json<DataResponse<MessageResponse>>> {
    let deleted = AppointmentRepo::delete_pending_for_customer(&state.pool, &cust_id).await?;
    if deleted == 0 {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Pending appointment for customer",
            id: cust_id,
        }));
    }

    tracing::info!(cust_id = %cust_id, deleted, "Pending appointments deleted");
    Ok(Json(DataResponse {
        data: MessageResponse::new("Pending appointment(s) deleted successfully"),
    }))
}

/// DELETE /api/appointments/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !AppointmentRepo::delete(&state.pool, &id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Appointment",
            id,
        }));
    }
    tracing::info!(appointment_id = %id, "Appointment deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/appointments/{id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Appointment>>> {
    let appointment = AppointmentRepo::cancel(&state.pool, &id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Appointment",
                id: id.clone(),
            })
        })?;
    tracing::info!(appointment_id = %id, "Appointment canceled");
    Ok(Json(DataResponse { data: appointment }))
}

/// GET /api/appointments/canceled/check
///
/// Whether the customer previously canceled this exact slot. Informational
/// only; booking does not consult it.
pub async fn check_canceled_slot(
    State(state): State<AppState>,
    Query(params): Query<SlotParams>,
) -> AppResult<Json<DataResponse<CanceledSlotCheck>>> {
    let (Some(cust_id), Some(branch_id), Some(date), Some(start)) = (
        non_blank(params.cust_id),
        non_blank(params.branch_id),
        non_blank(params.date_for_inquiry),
        non_blank(params.time_start),
    ) else {
        return Err(AppError::BadRequest(
            "cust_id, branch_id, date_for_inquiry and time_start are required".into(),
        ));
    };

    let date = parse_date(&date)?;
    let start = parse_time(&start)?;

    let canceled =
        AppointmentRepo::find_canceled_in_slot(&state.pool, &cust_id, &branch_id, date, start)
            .await?;

    let check = match canceled {
        Some(_) => CanceledSlotCheck {
            blocked: true,
            reason: Some("You previously canceled this time slot".into()),
        },
        None => CanceledSlotCheck {
            blocked: false,
            reason: None,
        },
    };
    Ok(Json(DataResponse { data: check }))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn request() -> BookAppointmentRequest {
        BookAppointmentRequest {
            cust_id: Some("CUST-00-0001".into()),
            branch_id: Some("BR-1".into()),
            date_for_inquiry: Some("2030-06-10".into()),
            time_start: Some("10:00".into()),
            time_end: Some("10:30".into()),
            status: None,
        }
    }

    #[test]
    fn missing_fields_are_rejected_first() {
        let input = BookAppointmentRequest {
            time_end: Some("  ".into()),
            time_start: Some("bogus".into()),
            ..request()
        };
        assert_matches!(
            parse_booking(input),
            Err(AppError::BadRequest(msg)) if msg == "Missing required fields"
        );
    }

    #[test]
    fn status_defaults_to_pending() {
        let booking = parse_booking(request()).unwrap();
        assert_eq!(booking.status, AppointmentStatus::Pending);
        assert_eq!(booking.start, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
    }

    #[test]
    fn inverted_window_is_rejected() {
        let input = BookAppointmentRequest {
            time_end: Some("09:30".into()),
            ..request()
        };
        assert_matches!(parse_booking(input), Err(AppError::Core(CoreError::Validation(_))));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let input = BookAppointmentRequest {
            status: Some("Done".into()),
            ..request()
        };
        assert_matches!(parse_booking(input), Err(AppError::Core(CoreError::Validation(_))));
    }
}
