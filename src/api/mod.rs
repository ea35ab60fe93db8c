pub mod auth;
mod bookings;
pub mod error;
mod form;
mod hotels;
pub mod roles;
mod rooms;
pub mod token;
mod validation;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;
use roles::{require_roles, ADMIN_ONLY, STAFF};

pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.images.max_body_bytes();

    // Auth routes (public, except `me`)
    let auth_routes = Router::new()
        .route("/me", get(auth::me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/google", post(auth::google_login))
        .route("/logout", post(auth::logout));

    // Hotels
    let hotel_staff = Router::new()
        .route("/create", post(hotels::create_hotel))
        .route("/update/:id", put(hotels::update_hotel))
        .route_layer(middleware::from_fn_with_state(STAFF, require_roles));
    let hotel_admin = Router::new()
        .route("/delete/:id", delete(hotels::delete_hotel))
        .route_layer(middleware::from_fn_with_state(ADMIN_ONLY, require_roles));
    let hotel_routes = Router::new()
        .route("/all", get(hotels::list_hotels))
        .route("/:id", get(hotels::get_hotel))
        .merge(hotel_staff)
        .merge(hotel_admin)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    // Rooms share paths across role groups, so they are merged at full paths
    let room_staff = Router::new()
        .route("/api/room", post(rooms::create_room))
        .route("/api/room/:id", put(rooms::update_room))
        .route_layer(middleware::from_fn_with_state(STAFF, require_roles));
    let room_admin = Router::new()
        .route("/api/room/:id", delete(rooms::delete_room))
        .route_layer(middleware::from_fn_with_state(ADMIN_ONLY, require_roles));
    let room_routes = Router::new()
        .route("/api/room", get(rooms::list_rooms))
        .route("/api/room/:id", get(rooms::get_room))
        .merge(room_staff)
        .merge(room_admin)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    // Bookings
    let booking_staff = Router::new()
        .route("/all", get(bookings::list_all_bookings))
        .route("/update/:id", put(bookings::update_booking_status))
        .route("/delete/:id", delete(bookings::delete_booking))
        .route_layer(middleware::from_fn_with_state(STAFF, require_roles));
    let booking_routes = Router::new()
        .route("/create", post(bookings::create_booking))
        .route("/my", get(bookings::list_my_bookings))
        .merge(booking_staff)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api/hotel", hotel_routes)
        .nest("/api/booking", booking_routes)
        .merge(room_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::hash_password;
    use crate::config::Config;
    use crate::db::{test_pool, Role, User};
    use crate::google::{GoogleError, GoogleProfile, GoogleVerifier};
    use crate::images::{ImageError, ImageStore, ImageUpload};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, HeaderMap, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const BOUNDARY: &str = "innkeep-test-boundary";

    struct FakeImages;

    #[async_trait]
    impl ImageStore for FakeImages {
        async fn upload(&self, folder: &str, image: ImageUpload) -> Result<String, ImageError> {
            Ok(format!("https://img.test/{}/{}", folder, image.file_name))
        }
    }

    struct FailingImages;

    #[async_trait]
    impl ImageStore for FailingImages {
        async fn upload(&self, _folder: &str, _image: ImageUpload) -> Result<String, ImageError> {
            Err(ImageError::Rejected {
                status: 500,
                body: "unavailable".to_string(),
            })
        }
    }

    struct FakeGoogle;

    #[async_trait]
    impl GoogleVerifier for FakeGoogle {
        async fn verify(&self, id_token: &str) -> Result<GoogleProfile, GoogleError> {
            match id_token {
                "good-token" => Ok(GoogleProfile {
                    email: "gina@example.com".to_string(),
                    name: "Gina".to_string(),
                }),
                _ => Err(GoogleError::Rejected),
            }
        }
    }

    struct TestApp {
        router: Router,
        state: Arc<AppState>,
    }

    impl TestApp {
        async fn new() -> Self {
            Self::with_images(Arc::new(FakeImages)).await
        }

        async fn with_images(images: Arc<dyn ImageStore>) -> Self {
            let mut config = Config::default();
            config.auth.jwt_secret = Some("test-secret".to_string());

            let state = Arc::new(AppState::new(
                config,
                test_pool().await,
                images,
                Arc::new(FakeGoogle),
            ));
            Self {
                router: create_router(state.clone()),
                state,
            }
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let headers = response.headers().clone();
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            let body = serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()));
            (status, headers, body)
        }

        /// Insert a user with the given role and return a cookie header for it
        async fn login_as(&self, role: Role) -> String {
            let email = format!("{}-{}@example.com", role, uuid::Uuid::new_v4());
            let hash = hash_password("password").unwrap();
            let user = User::create(&self.state.db, role.as_str(), &email, &hash, role)
                .await
                .unwrap();
            format!("token={}", self.state.tokens.issue(&user.id).unwrap())
        }

        async fn create_hotel(&self, cookie: &str) -> String {
            let (status, _, body) = self
                .send(json_request(Method::POST, "/api/hotel/create", Some(cookie), grand_inn()))
                .await;
            assert_eq!(status, StatusCode::CREATED, "{}", body);
            body["hotel"]["id"].as_str().unwrap().to_string()
        }

        async fn create_room(&self, cookie: &str, hotel_id: &str, price: f64) -> String {
            let body = json!({
                "hotel": hotel_id,
                "type": "Deluxe",
                "price": price,
                "maxOccupancy": 2,
                "availableRooms": 4,
                "amenities": ["minibar"]
            });
            let (status, _, body) = self
                .send(json_request(Method::POST, "/api/room", Some(cookie), body))
                .await;
            assert_eq!(status, StatusCode::CREATED, "{}", body);
            body["room"]["id"].as_str().unwrap().to_string()
        }
    }

    fn json_request(method: Method, uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn multipart_request(
        uri: &str,
        cookie: &str,
        fields: &[(&str, &str)],
        files: &[(&str, &str, &[u8])],
    ) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                    BOUNDARY, name, value
                )
                .as_bytes(),
            );
        }
        for (file_name, content_type, data) in files {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    BOUNDARY, file_name, content_type
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .header(header::COOKIE, cookie)
            .body(Body::from(body))
            .unwrap()
    }

    fn grand_inn() -> Value {
        json!({
            "name": "Grand Inn",
            "description": "By the station",
            "address": "1 Main St",
            "city": "Springfield",
            "country": "US",
            "roomsAvailable": 12
        })
    }

    /// `token=...` pair from the response's Set-Cookie header
    fn token_cookie(headers: &HeaderMap) -> String {
        let set_cookie = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("token="))
            .expect("token cookie")
            .to_string();
        set_cookie.split(';').next().unwrap().to_string()
    }

    fn set_cookie_header(headers: &HeaderMap) -> String {
        headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = TestApp::new().await;
        let (status, _, body) = app.send(get_request("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_register_once_then_conflict() {
        let app = TestApp::new().await;
        let body = json!({ "name": "Ada", "email": "ada@example.com", "password": "secret" });

        let (status, headers, json) = app
            .send(json_request(Method::POST, "/api/auth/register", None, body.clone()))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["user"]["email"], "ada@example.com");
        assert_eq!(json["user"]["role"], "customer");
        assert!(json["user"].get("password_hash").is_none());

        let cookie = set_cookie_header(&headers);
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(!cookie.contains("Secure"));

        let (status, _, json) = app
            .send(json_request(Method::POST, "/api/auth/register", None, body))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"]["message"], "Email already exists.");
    }

    #[tokio::test]
    async fn test_register_validation() {
        let app = TestApp::new().await;

        let (status, _, json) = app
            .send(json_request(
                Method::POST,
                "/api/auth/register",
                None,
                json!({ "email": "ada@example.com" }),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "Please fill in all required fields");

        let (status, _, _) = app
            .send(json_request(
                Method::POST,
                "/api/auth/register",
                None,
                json!({ "name": "Ada", "email": "not-an-email", "password": "secret" }),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) = app
            .send(json_request(
                Method::POST,
                "/api/auth/register",
                None,
                json!({ "name": "Ada", "email": "ada@example.com", "password": "x", "role": "owner" }),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_and_me() {
        let app = TestApp::new().await;
        app.send(json_request(
            Method::POST,
            "/api/auth/register",
            None,
            json!({ "name": "Ada", "email": "ada@example.com", "password": "secret" }),
        ))
        .await;

        let (status, _, json) = app
            .send(json_request(
                Method::POST,
                "/api/auth/login",
                None,
                json!({ "email": "ada@example.com", "password": "wrong" }),
            ))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["message"], "Invalid email or password");

        let (status, _, json) = app
            .send(json_request(Method::POST, "/api/auth/login", None, json!({ "email": "ada@example.com" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "Provide email and password");

        let (status, headers, _) = app
            .send(json_request(
                Method::POST,
                "/api/auth/login",
                None,
                json!({ "email": "ada@example.com", "password": "secret" }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);

        let cookie = token_cookie(&headers);
        let (status, _, json) = app.send(get_request("/api/auth/me", Some(&cookie))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["user"]["name"], "Ada");
        assert_eq!(json["user"]["role"], "customer");
    }

    #[tokio::test]
    async fn test_auth_gate_rejections() {
        let app = TestApp::new().await;

        let (status, _, json) = app.send(get_request("/api/hotel/all", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["message"], "Not authorized, token missing");

        let (status, _, json) = app
            .send(get_request("/api/hotel/all", Some("token=not.a.jwt")))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["message"], "Not authorized");

        let ghost = format!("token={}", app.state.tokens.issue("deleted-user").unwrap());
        let (status, _, json) = app.send(get_request("/api/hotel/all", Some(&ghost))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["message"], "User not found");
    }

    #[tokio::test]
    async fn test_role_gate_forbids_customer() {
        let app = TestApp::new().await;
        let customer = app.login_as(Role::Customer).await;

        let (status, _, json) = app
            .send(json_request(Method::POST, "/api/hotel/create", Some(&customer), grand_inn()))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"]["message"], "Access denied: Role 'customer' is not allowed");
        assert_eq!(json["error"]["details"]["allowedRoles"], json!(["admin", "receptionist"]));

        let (status, _, _) = app.send(get_request("/api/booking/all", Some(&customer))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_logout_clears_identity() {
        let app = TestApp::new().await;

        let (status, headers, json) = app
            .send(json_request(Method::POST, "/api/auth/logout", None, json!({})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Logged out successfully");

        let cleared = token_cookie(&headers);
        assert_eq!(cleared, "token=");
        assert!(set_cookie_header(&headers).contains("Max-Age=0"));

        let (status, _, _) = app.send(get_request("/api/auth/me", Some(&cleared))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_google_login() {
        let app = TestApp::new().await;

        let (status, headers, json) = app
            .send(json_request(Method::POST, "/api/auth/google", None, json!({ "token": "good-token" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["user"]["email"], "gina@example.com");
        assert_eq!(json["user"]["role"], "customer");
        token_cookie(&headers);

        // second login reuses the account
        app.send(json_request(Method::POST, "/api/auth/google", None, json!({ "token": "good-token" })))
            .await;
        let users: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&app.state.db)
            .await
            .unwrap();
        assert_eq!(users.0, 1);

        let (status, _, json) = app
            .send(json_request(Method::POST, "/api/auth/google", None, json!({ "token": "forged" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "Google login failed.");

        let (status, _, json) = app
            .send(json_request(Method::POST, "/api/auth/google", None, json!({})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "Google token is required");
    }

    #[tokio::test]
    async fn test_booking_scenario() {
        let app = TestApp::new().await;
        let admin = app.login_as(Role::Admin).await;
        let receptionist = app.login_as(Role::Receptionist).await;
        let customer = app.login_as(Role::Customer).await;

        let hotel_id = app.create_hotel(&admin).await;
        let (status, _, json) = app
            .send(json_request(Method::POST, "/api/hotel/create", Some(&admin), grand_inn()))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"]["message"], "Hotel already exists at this location.");

        let room_id = app.create_room(&admin, &hotel_id, 100.0).await;

        let (status, _, json) = app
            .send(json_request(
                Method::POST,
                "/api/booking/create",
                Some(&customer),
                json!({
                    "hotel": hotel_id,
                    "room": room_id,
                    "checkIn": "2024-01-01",
                    "checkOut": "2024-01-03"
                }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", json);
        assert_eq!(json["booking"]["totalPrice"], 200.0);
        assert_eq!(json["booking"]["status"], "pending");
        assert_eq!(json["booking"]["hotel"]["name"], "Grand Inn");
        assert_eq!(json["booking"]["room"]["price"], 100.0);
        let booking_id = json["booking"]["id"].as_str().unwrap().to_string();

        let update = |status: &str| {
            json_request(
                Method::PUT,
                &format!("/api/booking/update/{}", booking_id),
                Some(&receptionist),
                json!({ "status": status }),
            )
        };

        let (status, _, json) = app.send(update("confirmed")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["booking"]["status"], "confirmed");

        // no transition graph: completed may go back to pending
        app.send(update("completed")).await;
        let (status, _, json) = app.send(update("pending")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["booking"]["status"], "pending");

        let (status, _, _) = app.send(update("refunded")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, _, json) = app.send(get_request("/api/booking/my", Some(&customer))).await;
        assert_eq!(json["bookings"].as_array().unwrap().len(), 1);
        let (_, _, json) = app.send(get_request("/api/booking/my", Some(&receptionist))).await;
        assert!(json["bookings"].as_array().unwrap().is_empty());
        let (_, _, json) = app.send(get_request("/api/booking/all", Some(&receptionist))).await;
        assert_eq!(json["bookings"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_booking_rejects_bad_stays() {
        let app = TestApp::new().await;
        let admin = app.login_as(Role::Admin).await;
        let hotel_id = app.create_hotel(&admin).await;
        let room_id = app.create_room(&admin, &hotel_id, 80.0).await;

        let book = |room: &str, check_in: &str, check_out: &str| {
            json_request(
                Method::POST,
                "/api/booking/create",
                Some(&admin),
                json!({ "hotel": hotel_id, "room": room, "checkIn": check_in, "checkOut": check_out }),
            )
        };

        let (status, _, json) = app.send(book(&room_id, "2024-01-03", "2024-01-03")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "Check-out must be after check-in");

        let (status, _, _) = app.send(book(&room_id, "2024-01-05", "2024-01-03")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) = app.send(book(&room_id, "yesterday", "2024-01-03")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, json) = app.send(book("missing-room", "2024-01-01", "2024-01-03")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["message"], "Room not found");

        let (status, _, _) = app
            .send(json_request(
                Method::POST,
                "/api/booking/create",
                Some(&admin),
                json!({ "room": room_id }),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_booking_delete_and_missing_ids() {
        let app = TestApp::new().await;
        let admin = app.login_as(Role::Admin).await;
        let receptionist = app.login_as(Role::Receptionist).await;
        let hotel_id = app.create_hotel(&admin).await;
        let room_id = app.create_room(&admin, &hotel_id, 90.0).await;

        let (status, _, json) = app
            .send(json_request(
                Method::POST,
                "/api/booking/create",
                Some(&admin),
                json!({
                    "hotel": hotel_id,
                    "room": room_id,
                    "checkIn": "2024-03-10",
                    "checkOut": "2024-03-11"
                }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", json);
        let booking_id = json["booking"]["id"].as_str().unwrap().to_string();

        let delete = || {
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/api/booking/delete/{}", booking_id))
                .header(header::COOKIE, receptionist.as_str())
                .body(Body::empty())
                .unwrap()
        };

        let (status, _, json) = app.send(delete()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Booking deleted successfully");

        let (status, _, json) = app.send(delete()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["message"], "Booking not found");

        let (_, _, json) = app.send(get_request("/api/booking/all", Some(&receptionist))).await;
        assert!(json["bookings"].as_array().unwrap().is_empty());

        let (status, _, json) = app
            .send(json_request(
                Method::PUT,
                &format!("/api/booking/update/{}", booking_id),
                Some(&receptionist),
                json!({ "status": "confirmed" }),
            ))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["message"], "Booking not found");
    }

    #[tokio::test]
    async fn test_hotel_multipart_upload() {
        let app = TestApp::new().await;
        let admin = app.login_as(Role::Admin).await;

        let request = multipart_request(
            "/api/hotel/create",
            &admin,
            &[
                ("name", "Seaside"),
                ("description", "On the beach"),
                ("address", "2 Shore Rd"),
                ("city", "Brighton"),
                ("country", "UK"),
                ("roomsAvailable", "5"),
                ("amenities", r#"["wifi","pool"]"#),
            ],
            &[("front.png", "image/png", &b"png"[..]), ("lobby.jpg", "image/jpeg", &b"jpg"[..])],
        );
        let (status, _, json) = app.send(request).await;
        assert_eq!(status, StatusCode::CREATED, "{}", json);
        assert_eq!(
            json["hotel"]["images"],
            json!(["https://img.test/hotels/front.png", "https://img.test/hotels/lobby.jpg"])
        );
        assert_eq!(json["hotel"]["amenities"], json!(["wifi", "pool"]));
        assert_eq!(json["hotel"]["roomsAvailable"], 5);
    }

    #[tokio::test]
    async fn test_upload_rejections() {
        let app = TestApp::new().await;
        let admin = app.login_as(Role::Admin).await;
        let fields = [
            ("name", "Seaside"),
            ("description", "On the beach"),
            ("address", "2 Shore Rd"),
            ("city", "Brighton"),
            ("country", "UK"),
            ("roomsAvailable", "5"),
        ];

        let request = multipart_request(
            "/api/hotel/create",
            &admin,
            &fields,
            &[("notes.txt", "text/plain", &b"hello"[..])],
        );
        let (status, _, _) = app.send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let failing = TestApp::with_images(Arc::new(FailingImages)).await;
        let admin = failing.login_as(Role::Admin).await;
        let request = multipart_request(
            "/api/hotel/create",
            &admin,
            &fields,
            &[("front.png", "image/png", &b"png"[..])],
        );
        let (status, _, json) = failing.send(request).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["message"], "Failed to upload images");

        let (_, _, json) = failing.send(get_request("/api/hotel/all", Some(&admin))).await;
        assert!(json["hotels"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hotel_update_and_delete() {
        let app = TestApp::new().await;
        let admin = app.login_as(Role::Admin).await;
        let receptionist = app.login_as(Role::Receptionist).await;
        let hotel_id = app.create_hotel(&admin).await;

        let (status, _, json) = app
            .send(json_request(
                Method::PUT,
                &format!("/api/hotel/update/{}", hotel_id),
                Some(&receptionist),
                json!({ "description": "Renovated", "city": "" }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["hotel"]["description"], "Renovated");
        assert_eq!(json["hotel"]["city"], "Springfield");

        let delete_uri = format!("/api/hotel/delete/{}", hotel_id);
        let (status, _, _) = app
            .send(json_request(Method::DELETE, &delete_uri, Some(&receptionist), json!({})))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _, _) = app
            .send(json_request(Method::DELETE, &delete_uri, Some(&admin), json!({})))
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, json) = app
            .send(get_request(&format!("/api/hotel/{}", hotel_id), Some(&admin)))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["message"], "Hotel not found");
    }

    #[tokio::test]
    async fn test_rooms_listing_and_admin_delete() {
        let app = TestApp::new().await;
        let admin = app.login_as(Role::Admin).await;
        let receptionist = app.login_as(Role::Receptionist).await;
        let customer = app.login_as(Role::Customer).await;

        let hotel_id = app.create_hotel(&admin).await;
        let room_id = app.create_room(&receptionist, &hotel_id, 120.0).await;

        let (status, _, json) = app
            .send(json_request(
                Method::POST,
                "/api/room",
                Some(&admin),
                json!({ "hotel": "missing", "type": "Single", "price": 1, "maxOccupancy": 1, "availableRooms": 1 }),
            ))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["message"], "Hotel not found.");

        let (status, _, json) = app
            .send(get_request(&format!("/api/room?hotel={}", hotel_id), Some(&customer)))
            .await;
        assert_eq!(status, StatusCode::OK);
        let rooms = json["rooms"].as_array().unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0]["type"], "Deluxe");
        assert_eq!(rooms[0]["hotelInfo"]["name"], "Grand Inn");

        let (_, _, json) = app.send(get_request("/api/room?hotel=other", Some(&customer))).await;
        assert!(json["rooms"].as_array().unwrap().is_empty());

        let room_uri = format!("/api/room/{}", room_id);
        let (status, _, json) = app
            .send(json_request(Method::PUT, &room_uri, Some(&receptionist), json!({ "price": 150 })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["room"]["price"], 150.0);

        let (status, _, _) = app
            .send(json_request(Method::DELETE, &room_uri, Some(&receptionist), json!({})))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _, _) = app
            .send(json_request(Method::DELETE, &room_uri, Some(&admin), json!({})))
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, json) = app.send(get_request(&room_uri, Some(&customer))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["message"], "Room not found");
    }

    #[tokio::test]
    async fn test_deleted_hotel_leaves_dangling_booking() {
        let app = TestApp::new().await;
        let admin = app.login_as(Role::Admin).await;
        let hotel_id = app.create_hotel(&admin).await;
        let room_id = app.create_room(&admin, &hotel_id, 90.0).await;

        let (status, _, _) = app
            .send(json_request(
                Method::POST,
                "/api/booking/create",
                Some(&admin),
                json!({ "hotel": hotel_id, "room": room_id, "checkIn": "2024-03-01", "checkOut": "2024-03-04" }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        app.send(json_request(
            Method::DELETE,
            &format!("/api/hotel/delete/{}", hotel_id),
            Some(&admin),
            json!({}),
        ))
        .await;

        let (_, _, json) = app.send(get_request("/api/booking/all", Some(&admin))).await;
        let booking = &json["bookings"][0];
        assert_eq!(booking["hotelId"], hotel_id.as_str());
        assert!(booking["hotel"].is_null());
        assert_eq!(booking["totalPrice"], 270.0);
    }
}
