use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, FromRow)]
pub struct Car {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub production_year: i32,
    pub price: Decimal,
    pub fuel_type: String,
    pub mileage: i32,
    pub engine_capacity: f64,
    pub transmission: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One gallery entry. `public_id` is the opaque handle used to delete the
/// underlying object in the external store; `image_url` is what clients see.
#[derive(Debug, Clone, FromRow)]
pub struct CarImage {
    pub id: i64,
    pub car_id: i64,
    pub image_url: String,
    pub public_id: String,
}

/// Wire representation of a car. The gallery is an ordered list of URLs and
/// the main image is its first element, as the frontend expects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarDto {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub production_year: i32,
    pub price: Decimal,
    pub fuel_type: String,
    pub mileage: i32,
    pub engine_capacity: f64,
    pub transmission: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub image_gallery: Vec<String>,
    pub main_image: Option<String>,
}

impl CarDto {
    pub fn from_car(car: Car, images: Vec<CarImage>) -> Self {
        let image_gallery: Vec<String> = images.into_iter().map(|img| img.image_url).collect();
        let main_image = image_gallery.first().cloned();
        Self {
            id: car.id,
            brand: car.brand,
            model: car.model,
            production_year: car.production_year,
            price: car.price,
            fuel_type: car.fuel_type,
            mileage: car.mileage,
            engine_capacity: car.engine_capacity,
            transmission: car.transmission,
            description: car.description,
            created_at: car.created_at,
            updated_at: car.updated_at,
            image_gallery,
            main_image,
        }
    }
}

/// Create/update payload. Timestamps and the gallery are managed by the
/// server and cannot be supplied by clients.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CarPayload {
    #[validate(length(min = 1, message = "brand is required"))]
    pub brand: String,
    #[validate(length(min = 1, message = "model is required"))]
    pub model: String,
    pub production_year: i32,
    pub price: Decimal,
    #[validate(length(min = 1, message = "fuel type is required"))]
    pub fuel_type: String,
    pub mileage: i32,
    pub engine_capacity: f64,
    #[validate(length(min = 1, message = "transmission is required"))]
    pub transmission: String,
    pub description: Option<String>,
}

/// All eleven search criteria are independently optional; an omitted
/// criterion matches everything.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarSearchParams {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub fuel_type: Option<String>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_mileage: Option<i32>,
    pub max_mileage: Option<i32>,
    pub min_engine_capacity: Option<f64>,
    pub max_engine_capacity: Option<f64>,
}
