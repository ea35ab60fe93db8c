//! Hotel catalog models and queries.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use super::common::{now_timestamp, parse_list, serialize_list};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Hotel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub country: String,
    /// JSON array of amenity names
    pub amenities: String,
    /// JSON array of image URLs
    pub images: String,
    pub rooms_available: i64,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Hotel as returned by the API, with list columns decoded
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub rooms_available: i64,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Hotel> for HotelResponse {
    fn from(hotel: Hotel) -> Self {
        Self {
            amenities: parse_list(&hotel.amenities),
            images: parse_list(&hotel.images),
            id: hotel.id,
            name: hotel.name,
            description: hotel.description,
            address: hotel.address,
            city: hotel.city,
            country: hotel.country,
            rooms_available: hotel.rooms_available,
            created_by: hotel.created_by,
            created_at: hotel.created_at,
            updated_at: hotel.updated_at,
        }
    }
}

/// Short hotel view embedded in rooms and bookings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelSummary {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewHotel {
    pub name: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub rooms_available: i64,
    pub created_by: String,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct HotelChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub rooms_available: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct HotelEnvelope {
    pub message: String,
    pub hotel: HotelResponse,
}

#[derive(Debug, Serialize)]
pub struct HotelListResponse {
    pub message: String,
    pub hotels: Vec<HotelResponse>,
}

impl Hotel {
    /// Apply a partial update in place
    pub fn apply(&mut self, changes: HotelChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(address) = changes.address {
            self.address = address;
        }
        if let Some(city) = changes.city {
            self.city = city;
        }
        if let Some(country) = changes.country {
            self.country = country;
        }
        if let Some(amenities) = changes.amenities {
            self.amenities = serialize_list(&amenities);
        }
        if let Some(images) = changes.images {
            self.images = serialize_list(&images);
        }
        if let Some(rooms_available) = changes.rooms_available {
            self.rooms_available = rooms_available;
        }
    }

    pub async fn find_by_id(db: &SqlitePool, id: &str) -> Result<Option<Hotel>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM hotels WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Look up a hotel by its unique location key
    pub async fn find_by_location(
        db: &SqlitePool,
        name: &str,
        address: &str,
        city: &str,
        country: &str,
    ) -> Result<Option<Hotel>, sqlx::Error> {
        sqlx::query_as(
            "SELECT * FROM hotels WHERE name = ? AND address = ? AND city = ? AND country = ?",
        )
        .bind(name)
        .bind(address)
        .bind(city)
        .bind(country)
        .fetch_optional(db)
        .await
    }

    pub async fn list_all(db: &SqlitePool) -> Result<Vec<Hotel>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM hotels ORDER BY created_at DESC")
            .fetch_all(db)
            .await
    }

    pub async fn create(db: &SqlitePool, new: &NewHotel) -> Result<Hotel, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let now = now_timestamp();

        sqlx::query(
            r#"
            INSERT INTO hotels (id, name, description, address, city, country, amenities, images,
                                rooms_available, created_by, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.address)
        .bind(&new.city)
        .bind(&new.country)
        .bind(serialize_list(&new.amenities))
        .bind(serialize_list(&new.images))
        .bind(new.rooms_available)
        .bind(&new.created_by)
        .bind(&now)
        .bind(&now)
        .execute(db)
        .await?;

        Self::find_by_id(db, &id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Persist every mutable column of `self`
    pub async fn save(&mut self, db: &SqlitePool) -> Result<(), sqlx::Error> {
        self.updated_at = now_timestamp();

        sqlx::query(
            r#"
            UPDATE hotels
            SET name = ?, description = ?, address = ?, city = ?, country = ?, amenities = ?,
                images = ?, rooms_available = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&self.name)
        .bind(&self.description)
        .bind(&self.address)
        .bind(&self.city)
        .bind(&self.country)
        .bind(&self.amenities)
        .bind(&self.images)
        .bind(self.rooms_available)
        .bind(&self.updated_at)
        .bind(&self.id)
        .execute(db)
        .await?;

        Ok(())
    }

    /// Delete a hotel. Rooms and bookings referencing it are left untouched.
    pub async fn delete(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM hotels WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
