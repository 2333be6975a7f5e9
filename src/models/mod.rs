pub mod auth;
pub mod car;
pub mod user;

pub use auth::{LoginRequest, LoginResponse};
pub use car::{Car, CarDto, CarImage, CarPayload, CarSearchParams};
pub use user::{Role, User};
