use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::JwtService;
use crate::config::Config;
use crate::repository::{CarRepository, ImageRepository, UserRepository};
use crate::service::{AuthService, CarService, ImageStore};

#[derive(Clone)]
pub struct AppState {
    pub jwt: Arc<JwtService>,
    pub auth_service: AuthService,
    pub car_service: CarService,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Result<Self, reqwest::Error> {
        let jwt = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_ttl_secs));
        let auth_service = AuthService::new(UserRepository::new(pool.clone()), jwt.clone());
        let store = ImageStore::new(&config.storage)?;
        let car_service = CarService::new(
            CarRepository::new(pool.clone()),
            ImageRepository::new(pool),
            store,
        );
        Ok(Self { jwt, auth_service, car_service })
    }
}
