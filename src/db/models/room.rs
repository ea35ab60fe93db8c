//! Room catalog models and queries.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use super::common::{now_timestamp, parse_list, serialize_list};
use super::hotel::HotelSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomType {
    Single,
    Double,
    Deluxe,
    Queen,
    Suite,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Single => "Single",
            RoomType::Double => "Double",
            RoomType::Deluxe => "Deluxe",
            RoomType::Queen => "Queen",
            RoomType::Suite => "Suite",
        }
    }
}

impl std::fmt::Display for RoomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RoomType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(RoomType::Single),
            "double" => Ok(RoomType::Double),
            "deluxe" => Ok(RoomType::Deluxe),
            "queen" => Ok(RoomType::Queen),
            "suite" => Ok(RoomType::Suite),
            _ => Err(format!(
                "Invalid room type '{}'. Must be one of: Single, Double, Deluxe, Queen, Suite",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Room {
    pub id: String,
    pub hotel_id: String,
    pub room_type: String,
    pub price: f64,
    /// JSON array of amenity names
    pub amenities: String,
    pub max_occupancy: i64,
    pub available_rooms: i64,
    /// JSON array of image URLs
    pub images: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub id: String,
    pub hotel: String,
    #[serde(rename = "type")]
    pub room_type: String,
    pub price: f64,
    pub amenities: Vec<String>,
    pub max_occupancy: i64,
    pub available_rooms: i64,
    pub images: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self {
            amenities: parse_list(&room.amenities),
            images: parse_list(&room.images),
            id: room.id,
            hotel: room.hotel_id,
            room_type: room.room_type,
            price: room.price,
            max_occupancy: room.max_occupancy,
            available_rooms: room.available_rooms,
            created_at: room.created_at,
            updated_at: room.updated_at,
        }
    }
}

/// Room joined with its hotel. `hotelInfo` is null once the hotel is deleted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetails {
    #[serde(flatten)]
    pub room: RoomResponse,
    pub hotel_info: Option<HotelSummary>,
}

/// Room row from a `rooms LEFT JOIN hotels` query
#[derive(Debug, Clone, FromRow)]
pub struct RoomWithHotelRow {
    #[sqlx(flatten)]
    pub room: Room,
    pub hotel_name: Option<String>,
    pub hotel_address: Option<String>,
    pub hotel_city: Option<String>,
    pub hotel_country: Option<String>,
    pub hotel_images: Option<String>,
}

impl From<RoomWithHotelRow> for RoomDetails {
    fn from(row: RoomWithHotelRow) -> Self {
        let hotel_info = row.hotel_name.map(|name| HotelSummary {
            id: row.room.hotel_id.clone(),
            name,
            address: row.hotel_address.unwrap_or_default(),
            city: row.hotel_city.unwrap_or_default(),
            country: row.hotel_country.unwrap_or_default(),
            images: row.hotel_images.as_deref().map(parse_list).unwrap_or_default(),
        });
        Self {
            room: RoomResponse::from(row.room),
            hotel_info,
        }
    }
}

/// Short room view embedded in bookings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub room_type: String,
    pub price: f64,
    pub amenities: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewRoom {
    pub hotel_id: String,
    pub room_type: RoomType,
    pub price: f64,
    pub amenities: Vec<String>,
    pub max_occupancy: i64,
    pub available_rooms: i64,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RoomChanges {
    pub room_type: Option<RoomType>,
    pub price: Option<f64>,
    pub amenities: Option<Vec<String>>,
    pub max_occupancy: Option<i64>,
    pub available_rooms: Option<i64>,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct RoomEnvelope {
    pub message: String,
    pub room: RoomResponse,
}

#[derive(Debug, Serialize)]
pub struct RoomDetailsEnvelope {
    pub message: String,
    pub room: RoomDetails,
}

#[derive(Debug, Serialize)]
pub struct RoomListResponse {
    pub message: String,
    pub rooms: Vec<RoomDetails>,
}

#[derive(Debug, Deserialize)]
pub struct RoomListQuery {
    pub hotel: Option<String>,
}

const ROOM_WITH_HOTEL_SELECT: &str = r#"
    SELECT r.*, h.name AS hotel_name, h.address AS hotel_address, h.city AS hotel_city,
           h.country AS hotel_country, h.images AS hotel_images
    FROM rooms r
    LEFT JOIN hotels h ON h.id = r.hotel_id
"#;

impl Room {
    pub fn apply(&mut self, changes: RoomChanges) {
        if let Some(room_type) = changes.room_type {
            self.room_type = room_type.as_str().to_string();
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(amenities) = changes.amenities {
            self.amenities = serialize_list(&amenities);
        }
        if let Some(max_occupancy) = changes.max_occupancy {
            self.max_occupancy = max_occupancy;
        }
        if let Some(available_rooms) = changes.available_rooms {
            self.available_rooms = available_rooms;
        }
        if let Some(images) = changes.images {
            self.images = serialize_list(&images);
        }
    }

    pub async fn find_by_id(db: &SqlitePool, id: &str) -> Result<Option<Room>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM rooms WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn find_details(
        db: &SqlitePool,
        id: &str,
    ) -> Result<Option<RoomDetails>, sqlx::Error> {
        let row: Option<RoomWithHotelRow> =
            sqlx::query_as(&format!("{} WHERE r.id = ?", ROOM_WITH_HOTEL_SELECT))
                .bind(id)
                .fetch_optional(db)
                .await?;
        Ok(row.map(RoomDetails::from))
    }

    /// List rooms with hotel summaries, optionally restricted to one hotel
    pub async fn list_details(
        db: &SqlitePool,
        hotel_id: Option<&str>,
    ) -> Result<Vec<RoomDetails>, sqlx::Error> {
        let rows: Vec<RoomWithHotelRow> = match hotel_id {
            Some(hotel_id) => {
                sqlx::query_as(&format!(
                    "{} WHERE r.hotel_id = ? ORDER BY r.created_at DESC",
                    ROOM_WITH_HOTEL_SELECT
                ))
                .bind(hotel_id)
                .fetch_all(db)
                .await?
            }
            None => {
                sqlx::query_as(&format!("{} ORDER BY r.created_at DESC", ROOM_WITH_HOTEL_SELECT))
                    .fetch_all(db)
                    .await?
            }
        };
        Ok(rows.into_iter().map(RoomDetails::from).collect())
    }

    pub async fn create(db: &SqlitePool, new: &NewRoom) -> Result<Room, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let now = now_timestamp();

        sqlx::query(
            r#"
            INSERT INTO rooms (id, hotel_id, room_type, price, amenities, max_occupancy,
                               available_rooms, images, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&new.hotel_id)
        .bind(new.room_type.as_str())
        .bind(new.price)
        .bind(serialize_list(&new.amenities))
        .bind(new.max_occupancy)
        .bind(new.available_rooms)
        .bind(serialize_list(&new.images))
        .bind(&now)
        .bind(&now)
        .execute(db)
        .await?;

        Self::find_by_id(db, &id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn save(&mut self, db: &SqlitePool) -> Result<(), sqlx::Error> {
        self.updated_at = now_timestamp();

        sqlx::query(
            r#"
            UPDATE rooms
            SET room_type = ?, price = ?, amenities = ?, max_occupancy = ?, available_rooms = ?,
                images = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&self.room_type)
        .bind(self.price)
        .bind(&self.amenities)
        .bind(self.max_occupancy)
        .bind(self.available_rooms)
        .bind(&self.images)
        .bind(&self.updated_at)
        .bind(&self.id)
        .execute(db)
        .await?;

        Ok(())
    }

    pub async fn delete(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
