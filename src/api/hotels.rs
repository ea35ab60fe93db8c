//! Hotel catalog endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;

use super::auth::CurrentUser;
use super::error::{is_unique_violation, ApiError, ValidationErrorBuilder};
use super::form::CatalogForm;
use super::validation::{parse_amenities, parse_count, validate_text};
use crate::db::{
    Hotel, HotelChanges, HotelEnvelope, HotelListResponse, HotelResponse, MessageResponse, NewHotel,
};
use crate::images;
use crate::AppState;

const IMAGE_FOLDER: &str = "hotels";
const MAX_NAME_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 5000;

/// (field, label, max length) for the hotel's text columns
const TEXT_FIELDS: [(&str, &str, usize); 5] = [
    ("name", "Name", MAX_NAME_LEN),
    ("description", "Description", MAX_DESCRIPTION_LEN),
    ("address", "Address", MAX_NAME_LEN),
    ("city", "City", MAX_NAME_LEN),
    ("country", "Country", MAX_NAME_LEN),
];

fn duplicate_location() -> ApiError {
    ApiError::conflict("Hotel already exists at this location.")
}

/// Validate the form into a partial update. With `require_all`, every text
/// column and `roomsAvailable` must be present.
fn read_changes(form: &CatalogForm, require_all: bool) -> Result<HotelChanges, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    let mut text: [Option<String>; 5] = Default::default();

    for (slot, (field, label, max)) in text.iter_mut().zip(TEXT_FIELDS) {
        match form.text(field) {
            Some(value) => match validate_text(label, value, max) {
                Ok(v) => *slot = Some(v),
                Err(e) => {
                    errors.add(field, e);
                }
            },
            None if require_all => {
                errors.add(field, format!("{} is required", label));
            }
            None => {}
        }
    }

    let rooms_available = match form.text("roomsAvailable") {
        Some(raw) => match parse_count("Rooms available", raw) {
            Ok(v) => Some(v),
            Err(e) => {
                errors.add("roomsAvailable", e);
                None
            }
        },
        None => {
            if require_all {
                errors.add("roomsAvailable", "Rooms available is required");
            }
            None
        }
    };

    let amenities = match form.text("amenities") {
        Some(raw) => match parse_amenities(raw) {
            Ok(v) => Some(v),
            Err(e) => {
                errors.add("amenities", e);
                None
            }
        },
        None => None,
    };

    errors.finish()?;

    let [name, description, address, city, country] = text;
    Ok(HotelChanges {
        name,
        description,
        address,
        city,
        country,
        amenities,
        images: None,
        rooms_available,
    })
}

/// Create a hotel
///
/// POST /api/hotel/create
pub async fn create_hotel(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    mut form: CatalogForm,
) -> Result<(StatusCode, Json<HotelEnvelope>), ApiError> {
    let changes = read_changes(&form, true)?;
    let new = NewHotel {
        name: changes.name.unwrap_or_default(),
        description: changes.description.unwrap_or_default(),
        address: changes.address.unwrap_or_default(),
        city: changes.city.unwrap_or_default(),
        country: changes.country.unwrap_or_default(),
        amenities: changes.amenities.unwrap_or_default(),
        images: Vec::new(),
        rooms_available: changes.rooms_available.unwrap_or_default(),
        created_by: current.id,
    };

    if Hotel::find_by_location(&state.db, &new.name, &new.address, &new.city, &new.country)
        .await?
        .is_some()
    {
        return Err(duplicate_location());
    }

    let images = images::upload_all(state.images.as_ref(), IMAGE_FOLDER, form.take_images()).await?;
    let new = NewHotel { images, ..new };

    let hotel = Hotel::create(&state.db, &new).await.map_err(|e| {
        if is_unique_violation(&e) {
            duplicate_location()
        } else {
            ApiError::from(e)
        }
    })?;

    info!(hotel_id = %hotel.id, created_by = %hotel.created_by, "Created hotel");

    Ok((
        StatusCode::CREATED,
        Json(HotelEnvelope {
            message: "Hotel created successfully".to_string(),
            hotel: HotelResponse::from(hotel),
        }),
    ))
}

/// List all hotels, newest first
///
/// GET /api/hotel/all
pub async fn list_hotels(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HotelListResponse>, ApiError> {
    let hotels = Hotel::list_all(&state.db).await?;
    Ok(Json(HotelListResponse {
        message: "Hotels fetched successfully".to_string(),
        hotels: hotels.into_iter().map(HotelResponse::from).collect(),
    }))
}

/// GET /api/hotel/:id
pub async fn get_hotel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<HotelEnvelope>, ApiError> {
    let hotel = Hotel::find_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Hotel not found"))?;

    Ok(Json(HotelEnvelope {
        message: "Hotel found".to_string(),
        hotel: HotelResponse::from(hotel),
    }))
}

/// Update a hotel. Absent or blank fields keep their stored value; uploaded
/// images replace the whole image list.
///
/// PUT /api/hotel/update/:id
pub async fn update_hotel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    mut form: CatalogForm,
) -> Result<Json<HotelEnvelope>, ApiError> {
    let mut hotel = Hotel::find_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Hotel not found"))?;

    let mut changes = read_changes(&form, false)?;
    if form.has_images() {
        let urls =
            images::upload_all(state.images.as_ref(), IMAGE_FOLDER, form.take_images()).await?;
        changes.images = Some(urls);
    }

    hotel.apply(changes);
    hotel.save(&state.db).await.map_err(|e| {
        if is_unique_violation(&e) {
            duplicate_location()
        } else {
            ApiError::from(e)
        }
    })?;

    info!(hotel_id = %hotel.id, "Updated hotel");

    Ok(Json(HotelEnvelope {
        message: "Hotel updated successfully".to_string(),
        hotel: HotelResponse::from(hotel),
    }))
}

/// Delete a hotel. Its rooms and bookings are kept.
///
/// DELETE /api/hotel/delete/:id
pub async fn delete_hotel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !Hotel::delete(&state.db, &id).await? {
        return Err(ApiError::not_found("Hotel not found"));
    }

    info!(hotel_id = %id, "Deleted hotel");
    Ok(Json(MessageResponse::new("Hotel deleted successfully")))
}
