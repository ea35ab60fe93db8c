//! Booking models and queries.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use super::common::{now_timestamp, parse_list};
use super::hotel::HotelSummary;
use super::room::RoomSummary;

/// Booking lifecycle status. Any status may replace any other; there is
/// no transition graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    CheckedIn,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::CheckedIn => "checked-in",
            BookingStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "checked-in" => Ok(BookingStatus::CheckedIn),
            "completed" => Ok(BookingStatus::Completed),
            _ => Err(format!(
                "Invalid status '{}'. Must be one of: pending, confirmed, cancelled, checked-in, completed",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: String,
    pub hotel_id: String,
    pub room_id: String,
    pub user_id: String,
    /// YYYY-MM-DD
    pub check_in: String,
    /// YYYY-MM-DD
    pub check_out: String,
    pub status: String,
    pub total_price: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// Short user view embedded in bookings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Booking joined with hotel, room and user summaries for display.
/// A summary is null when the referenced row no longer exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    pub id: String,
    pub hotel_id: String,
    pub room_id: String,
    pub user_id: String,
    pub hotel: Option<HotelSummary>,
    pub room: Option<RoomSummary>,
    pub user: Option<UserSummary>,
    pub check_in: String,
    pub check_out: String,
    pub status: String,
    pub total_price: f64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct BookingRow {
    #[sqlx(flatten)]
    pub booking: Booking,
    pub hotel_name: Option<String>,
    pub hotel_address: Option<String>,
    pub hotel_city: Option<String>,
    pub hotel_country: Option<String>,
    pub hotel_images: Option<String>,
    pub room_type: Option<String>,
    pub room_price: Option<f64>,
    pub room_amenities: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

impl From<BookingRow> for BookingDetails {
    fn from(row: BookingRow) -> Self {
        let booking = row.booking;

        let hotel = row.hotel_name.map(|name| HotelSummary {
            id: booking.hotel_id.clone(),
            name,
            address: row.hotel_address.unwrap_or_default(),
            city: row.hotel_city.unwrap_or_default(),
            country: row.hotel_country.unwrap_or_default(),
            images: row.hotel_images.as_deref().map(parse_list).unwrap_or_default(),
        });
        let room = row.room_type.map(|room_type| RoomSummary {
            id: booking.room_id.clone(),
            room_type,
            price: row.room_price.unwrap_or_default(),
            amenities: row.room_amenities.as_deref().map(parse_list).unwrap_or_default(),
        });
        let user = row.user_name.map(|name| UserSummary {
            id: booking.user_id.clone(),
            name,
            email: row.user_email.unwrap_or_default(),
        });

        Self {
            id: booking.id,
            hotel_id: booking.hotel_id,
            room_id: booking.room_id,
            user_id: booking.user_id,
            hotel,
            room,
            user,
            check_in: booking.check_in,
            check_out: booking.check_out,
            status: booking.status,
            total_price: booking.total_price,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub hotel_id: String,
    pub room_id: String,
    pub user_id: String,
    pub check_in: String,
    pub check_out: String,
    pub total_price: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub hotel: Option<String>,
    pub room: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookingEnvelope {
    pub message: String,
    pub booking: BookingDetails,
}

#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    pub message: String,
    pub bookings: Vec<BookingDetails>,
}

const BOOKING_DETAILS_SELECT: &str = r#"
    SELECT b.*,
           h.name AS hotel_name, h.address AS hotel_address, h.city AS hotel_city,
           h.country AS hotel_country, h.images AS hotel_images,
           r.room_type AS room_type, r.price AS room_price, r.amenities AS room_amenities,
           u.name AS user_name, u.email AS user_email
    FROM bookings b
    LEFT JOIN hotels h ON h.id = b.hotel_id
    LEFT JOIN rooms r ON r.id = b.room_id
    LEFT JOIN users u ON u.id = b.user_id
"#;

impl Booking {
    pub async fn find_by_id(db: &SqlitePool, id: &str) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn find_details(
        db: &SqlitePool,
        id: &str,
    ) -> Result<Option<BookingDetails>, sqlx::Error> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("{} WHERE b.id = ?", BOOKING_DETAILS_SELECT))
                .bind(id)
                .fetch_optional(db)
                .await?;
        Ok(row.map(BookingDetails::from))
    }

    pub async fn list_for_user(
        db: &SqlitePool,
        user_id: &str,
    ) -> Result<Vec<BookingDetails>, sqlx::Error> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "{} WHERE b.user_id = ? ORDER BY b.created_at DESC",
            BOOKING_DETAILS_SELECT
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows.into_iter().map(BookingDetails::from).collect())
    }

    pub async fn list_all(db: &SqlitePool) -> Result<Vec<BookingDetails>, sqlx::Error> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "{} ORDER BY b.created_at DESC",
            BOOKING_DETAILS_SELECT
        ))
        .fetch_all(db)
        .await?;
        Ok(rows.into_iter().map(BookingDetails::from).collect())
    }

    /// Insert a booking in `pending` status
    pub async fn create(db: &SqlitePool, new: &NewBooking) -> Result<Booking, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let now = now_timestamp();

        sqlx::query(
            r#"
            INSERT INTO bookings (id, hotel_id, room_id, user_id, check_in, check_out, status,
                                  total_price, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&new.hotel_id)
        .bind(&new.room_id)
        .bind(&new.user_id)
        .bind(&new.check_in)
        .bind(&new.check_out)
        .bind(BookingStatus::Pending.as_str())
        .bind(new.total_price)
        .bind(&now)
        .bind(&now)
        .execute(db)
        .await?;

        Self::find_by_id(db, &id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Overwrite the status. Returns false when the booking does not exist.
    pub async fn set_status(
        db: &SqlitePool,
        id: &str,
        status: BookingStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE bookings SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(now_timestamp())
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
