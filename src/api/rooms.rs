//! Room catalog endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;

use super::error::{ApiError, ValidationErrorBuilder};
use super::form::CatalogForm;
use super::validation::{parse_amenities, parse_count, parse_price};
use crate::db::{
    Hotel, MessageResponse, NewRoom, Room, RoomChanges, RoomDetailsEnvelope, RoomEnvelope,
    RoomListQuery, RoomListResponse, RoomResponse, RoomType,
};
use crate::images;
use crate::AppState;

const IMAGE_FOLDER: &str = "rooms";

/// Validate the form into a partial update. With `require_all`, type, price,
/// maxOccupancy and availableRooms must be present.
fn read_changes(form: &CatalogForm, require_all: bool) -> Result<RoomChanges, ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    let mut field = |name: &str, label: &str| -> Option<String> {
        let value = form.text(name).map(str::to_string);
        if value.is_none() && require_all {
            errors.add(name, format!("{} is required", label));
        }
        value
    };
    let room_type = field("type", "Type");
    let price = field("price", "Price");
    let max_occupancy = field("maxOccupancy", "Max occupancy");
    let available_rooms = field("availableRooms", "Available rooms");

    let mut changes = RoomChanges::default();

    if let Some(raw) = room_type {
        match raw.parse::<RoomType>() {
            Ok(t) => changes.room_type = Some(t),
            Err(e) => {
                errors.add("type", e);
            }
        }
    }
    if let Some(raw) = price {
        match parse_price(&raw) {
            Ok(p) => changes.price = Some(p),
            Err(e) => {
                errors.add("price", e);
            }
        }
    }
    if let Some(raw) = max_occupancy {
        match parse_count("Max occupancy", &raw) {
            Ok(n) => changes.max_occupancy = Some(n),
            Err(e) => {
                errors.add("maxOccupancy", e);
            }
        }
    }
    if let Some(raw) = available_rooms {
        match parse_count("Available rooms", &raw) {
            Ok(n) => changes.available_rooms = Some(n),
            Err(e) => {
                errors.add("availableRooms", e);
            }
        }
    }
    if let Some(raw) = form.text("amenities") {
        match parse_amenities(raw) {
            Ok(a) => changes.amenities = Some(a),
            Err(e) => {
                errors.add("amenities", e);
            }
        }
    }

    errors.finish()?;
    Ok(changes)
}

/// Create a room under an existing hotel
///
/// POST /api/room
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    mut form: CatalogForm,
) -> Result<(StatusCode, Json<RoomEnvelope>), ApiError> {
    let hotel_id = form
        .text("hotel")
        .map(str::to_string)
        .ok_or_else(|| ApiError::validation_field("hotel", "Hotel is required"))?;
    let changes = read_changes(&form, true)?;

    if Hotel::find_by_id(&state.db, &hotel_id).await?.is_none() {
        return Err(ApiError::not_found("Hotel not found."));
    }

    let room_type = changes
        .room_type
        .ok_or_else(|| ApiError::validation_field("type", "Type is required"))?;
    let images = images::upload_all(state.images.as_ref(), IMAGE_FOLDER, form.take_images()).await?;

    let room = Room::create(
        &state.db,
        &NewRoom {
            hotel_id,
            room_type,
            price: changes.price.unwrap_or_default(),
            amenities: changes.amenities.unwrap_or_default(),
            max_occupancy: changes.max_occupancy.unwrap_or_default(),
            available_rooms: changes.available_rooms.unwrap_or_default(),
            images,
        },
    )
    .await?;

    info!(room_id = %room.id, hotel_id = %room.hotel_id, "Created room");

    Ok((
        StatusCode::CREATED,
        Json(RoomEnvelope {
            message: "Room created successfully".to_string(),
            room: RoomResponse::from(room),
        }),
    ))
}

/// List rooms with hotel summaries, optionally for one hotel
///
/// GET /api/room?hotel=<id>
pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RoomListQuery>,
) -> Result<Json<RoomListResponse>, ApiError> {
    let hotel = query.hotel.as_deref().map(str::trim).filter(|h| !h.is_empty());
    let rooms = Room::list_details(&state.db, hotel).await?;

    Ok(Json(RoomListResponse {
        message: "Rooms fetched successfully".to_string(),
        rooms,
    }))
}

/// GET /api/room/:id
pub async fn get_room(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RoomDetailsEnvelope>, ApiError> {
    let room = Room::find_details(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Room not found"))?;

    Ok(Json(RoomDetailsEnvelope {
        message: "Room found".to_string(),
        room,
    }))
}

/// Update a room. Uploaded images replace the whole image list.
///
/// PUT /api/room/:id
pub async fn update_room(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    mut form: CatalogForm,
) -> Result<Json<RoomEnvelope>, ApiError> {
    let mut room = Room::find_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Room not found"))?;

    let mut changes = read_changes(&form, false)?;
    if form.has_images() {
        let urls =
            images::upload_all(state.images.as_ref(), IMAGE_FOLDER, form.take_images()).await?;
        changes.images = Some(urls);
    }

    room.apply(changes);
    room.save(&state.db).await?;

    info!(room_id = %room.id, "Updated room");

    Ok(Json(RoomEnvelope {
        message: "Room updated successfully".to_string(),
        room: RoomResponse::from(room),
    }))
}

/// DELETE /api/room/:id
pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !Room::delete(&state.db, &id).await? {
        return Err(ApiError::not_found("Room not found"));
    }

    info!(room_id = %id, "Deleted room");
    Ok(Json(MessageResponse::new("Room deleted successfully")))
}
