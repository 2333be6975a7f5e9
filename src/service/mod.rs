pub mod auth_service;
pub mod car_service;
pub mod image_validation;
pub mod storage;

pub use auth_service::AuthService;
pub use car_service::CarService;
pub use storage::{ImageStore, StoredImage};
