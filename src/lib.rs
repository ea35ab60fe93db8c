pub mod api;
pub mod booking;
pub mod config;
pub mod db;
pub mod google;
pub mod images;

pub use db::DbPool;

use config::Config;
use std::sync::Arc;

use crate::api::token::TokenService;
use crate::google::GoogleVerifier;
use crate::images::ImageStore;

pub struct AppState {
    pub config: Config,
    pub db: DbPool,
    pub tokens: TokenService,
    pub images: Arc<dyn ImageStore>,
    pub google: Arc<dyn GoogleVerifier>,
}

impl AppState {
    pub fn new(
        mut config: Config,
        db: DbPool,
        images: Arc<dyn ImageStore>,
        google: Arc<dyn GoogleVerifier>,
    ) -> Self {
        let tokens = TokenService::new(
            &config.jwt_secret(),
            chrono::Duration::hours(config.auth.token_ttl_hours),
            config.server.mode.is_production(),
        );
        Self {
            config,
            db,
            tokens,
            images,
            google,
        }
    }
}
