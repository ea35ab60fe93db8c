//! Booking endpoints.
//!
//! Creation prices the stay from the room's nightly rate. Status updates are
//! unconditional: any status may replace any other.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;

use super::auth::CurrentUser;
use super::error::{ApiError, ValidationErrorBuilder};
use super::form::ApiJson;
use crate::booking::{parse_date, Stay, DATE_FORMAT};
use crate::db::{
    Booking, BookingDetails, BookingEnvelope, BookingListResponse, BookingStatus, CreateBookingRequest,
    MessageResponse, NewBooking, Room, UpdateBookingStatusRequest,
};
use crate::AppState;

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn load_details(state: &AppState, id: &str) -> Result<BookingDetails, ApiError> {
    Booking::find_details(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking not found"))
}

/// Book a room for the current user
///
/// POST /api/booking/create
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    ApiJson(req): ApiJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingEnvelope>), ApiError> {
    let hotel = present(req.hotel);
    let room = present(req.room);
    let check_in = present(req.check_in);
    let check_out = present(req.check_out);

    let mut errors = ValidationErrorBuilder::new();
    for (field, value) in [
        ("hotel", &hotel),
        ("room", &room),
        ("checkIn", &check_in),
        ("checkOut", &check_out),
    ] {
        if value.is_none() {
            errors.add(field, format!("{} is required", field));
        }
    }
    errors.finish()?;

    let (hotel_id, room_id) = (hotel.unwrap_or_default(), room.unwrap_or_default());
    let check_in = parse_date("checkIn", &check_in.unwrap_or_default())?;
    let check_out = parse_date("checkOut", &check_out.unwrap_or_default())?;

    let room = Room::find_by_id(&state.db, &room_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Room not found"))?;

    let stay = Stay::new(check_in, check_out)?;

    let booking = Booking::create(
        &state.db,
        &NewBooking {
            hotel_id,
            room_id: room.id,
            user_id: current.id,
            check_in: stay.check_in().format(DATE_FORMAT).to_string(),
            check_out: stay.check_out().format(DATE_FORMAT).to_string(),
            total_price: stay.total_price(room.price),
        },
    )
    .await?;

    info!(
        booking_id = %booking.id,
        room_id = %booking.room_id,
        nights = stay.nights(),
        total_price = booking.total_price,
        "Created booking"
    );

    let booking = load_details(&state, &booking.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(BookingEnvelope {
            message: "Booking created successfully".to_string(),
            booking,
        }),
    ))
}

/// Bookings made by the current user
///
/// GET /api/booking/my
pub async fn list_my_bookings(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Result<Json<BookingListResponse>, ApiError> {
    let bookings = Booking::list_for_user(&state.db, &current.id).await?;
    Ok(Json(BookingListResponse {
        message: "My bookings fetched".to_string(),
        bookings,
    }))
}

/// GET /api/booking/all
pub async fn list_all_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BookingListResponse>, ApiError> {
    let bookings = Booking::list_all(&state.db).await?;
    Ok(Json(BookingListResponse {
        message: "All bookings fetched".to_string(),
        bookings,
    }))
}

/// Overwrite a booking's status
///
/// PUT /api/booking/update/:id
pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateBookingStatusRequest>,
) -> Result<Json<BookingEnvelope>, ApiError> {
    if Booking::find_by_id(&state.db, &id).await?.is_none() {
        return Err(ApiError::not_found("Booking not found"));
    }

    let status = present(req.status)
        .ok_or_else(|| ApiError::validation_field("status", "Status is required"))?
        .parse::<BookingStatus>()
        .map_err(|e| ApiError::validation_field("status", e))?;

    if !Booking::set_status(&state.db, &id, status).await? {
        return Err(ApiError::not_found("Booking not found"));
    }

    info!(booking_id = %id, status = %status, "Updated booking status");

    let booking = load_details(&state, &id).await?;
    Ok(Json(BookingEnvelope {
        message: "Booking status updated".to_string(),
        booking,
    }))
}

/// DELETE /api/booking/delete/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !Booking::delete(&state.db, &id).await? {
        return Err(ApiError::not_found("Booking not found"));
    }

    info!(booking_id = %id, "Deleted booking");
    Ok(Json(MessageResponse::new("Booking deleted successfully")))
}
