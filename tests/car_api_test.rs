mod common;

use common::{
    create_test_server, login, sample_car_payload, seed_car, seed_users, setup_test_database,
    spawn_stub_store,
};
use reqwest::Client;
use sqlx::PgPool;

async fn seed_sample_catalog(pool: &PgPool) -> (i64, i64, i64) {
    let bmw = seed_car(pool, "BMW", "X5", 2020, "150000.00", "Diesel", 45000, 3.0).await;
    let audi = seed_car(pool, "Audi", "A4", 2019, "85000.00", "Gasoline", 32000, 2.0).await;
    let mercedes = seed_car(pool, "Mercedes", "C-Class", 2021, "120000.00", "Gasoline", 28000, 2.0).await;
    (bmw, audi, mercedes)
}

#[tokio::test]
async fn test_get_all_cars_without_header_should_return_full_list() {
    let pool = setup_test_database().await;
    seed_sample_catalog(&pool).await;
    let (store_url, _store) = spawn_stub_store().await;
    let addr = create_test_server(pool, &store_url).await;
    let client = Client::new();

    let response = client
        .get(format!("http://{}/api/cars", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_get_car_by_id_should_return_car_or_404() {
    let pool = setup_test_database().await;
    let (bmw, _, _) = seed_sample_catalog(&pool).await;
    let (store_url, _store) = spawn_stub_store().await;
    let addr = create_test_server(pool, &store_url).await;
    let client = Client::new();

    let response = client
        .get(format!("http://{}/api/cars/{}", addr, bmw))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["brand"], "BMW");
    assert_eq!(body["productionYear"], 2020);
    assert!(body["imageGallery"].as_array().unwrap().is_empty());
    assert!(body["mainImage"].is_null());

    let response = client
        .get(format!("http://{}/api/cars/999999", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_create_car_without_token_should_return_401() {
    let pool = setup_test_database().await;
    seed_users(&pool).await;
    let (store_url, _store) = spawn_stub_store().await;
    let addr = create_test_server(pool, &store_url).await;
    let client = Client::new();

    let response = client
        .post(format!("http://{}/api/cars", addr))
        .json(&sample_car_payload())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_create_car_with_user_token_should_return_403() {
    let pool = setup_test_database().await;
    seed_users(&pool).await;
    let (store_url, _store) = spawn_stub_store().await;
    let addr = create_test_server(pool, &store_url).await;
    let client = Client::new();

    let token = login(addr, "staff", "staff123").await;

    let response = client
        .post(format!("http://{}/api/cars", addr))
        .bearer_auth(&token)
        .json(&sample_car_payload())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn test_create_car_with_admin_token_should_return_201_with_server_fields() {
    let pool = setup_test_database().await;
    seed_users(&pool).await;
    let (store_url, _store) = spawn_stub_store().await;
    let addr = create_test_server(pool, &store_url).await;
    let client = Client::new();

    let token = login(addr, "admin", "admin123").await;

    let response = client
        .post(format!("http://{}/api/cars", addr))
        .bearer_auth(&token)
        .json(&sample_car_payload())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["id"].is_i64());
    assert_eq!(body["brand"], "BMW");

    // Timestamps are server-assigned, never client-supplied
    let created_at = chrono::DateTime::parse_from_rfc3339(body["createdAt"].as_str().unwrap()).unwrap();
    let updated_at = chrono::DateTime::parse_from_rfc3339(body["updatedAt"].as_str().unwrap()).unwrap();
    assert!(updated_at >= created_at);
}

#[tokio::test]
async fn test_create_car_with_empty_brand_should_return_400() {
    let pool = setup_test_database().await;
    seed_users(&pool).await;
    let (store_url, _store) = spawn_stub_store().await;
    let addr = create_test_server(pool, &store_url).await;
    let client = Client::new();

    let token = login(addr, "admin", "admin123").await;
    let mut payload = sample_car_payload();
    payload["brand"] = serde_json::json!("");

    let response = client
        .post(format!("http://{}/api/cars", addr))
        .bearer_auth(&token)
        .json(&payload)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_update_car_with_admin_token_should_change_fields_and_bump_updated_at() {
    let pool = setup_test_database().await;
    seed_users(&pool).await;
    let (bmw, _, _) = seed_sample_catalog(&pool).await;
    let (store_url, _store) = spawn_stub_store().await;
    let addr = create_test_server(pool, &store_url).await;
    let client = Client::new();

    let token = login(addr, "admin", "admin123").await;
    let mut payload = sample_car_payload();
    payload["mileage"] = serde_json::json!(50000);
    payload["price"] = serde_json::json!(140000.00);

    let response = client
        .put(format!("http://{}/api/cars/{}", addr, bmw))
        .bearer_auth(&token)
        .json(&payload)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["mileage"], 50000);

    let created_at = chrono::DateTime::parse_from_rfc3339(body["createdAt"].as_str().unwrap()).unwrap();
    let updated_at = chrono::DateTime::parse_from_rfc3339(body["updatedAt"].as_str().unwrap()).unwrap();
    assert!(updated_at >= created_at);
}

#[tokio::test]
async fn test_update_missing_car_should_return_404() {
    let pool = setup_test_database().await;
    seed_users(&pool).await;
    let (store_url, _store) = spawn_stub_store().await;
    let addr = create_test_server(pool, &store_url).await;
    let client = Client::new();

    let token = login(addr, "admin", "admin123").await;

    let response = client
        .put(format!("http://{}/api/cars/999999", addr))
        .bearer_auth(&token)
        .json(&sample_car_payload())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_delete_car_with_admin_token_should_return_204_then_404() {
    let pool = setup_test_database().await;
    seed_users(&pool).await;
    let (bmw, _, _) = seed_sample_catalog(&pool).await;
    let (store_url, _store) = spawn_stub_store().await;
    let addr = create_test_server(pool, &store_url).await;
    let client = Client::new();

    let token = login(addr, "admin", "admin123").await;

    let response = client
        .delete(format!("http://{}/api/cars/{}", addr, bmw))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("http://{}/api/cars/{}", addr, bmw))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let response = client
        .delete(format!("http://{}/api/cars/{}", addr, bmw))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_search_without_criteria_should_match_list_all() {
    let pool = setup_test_database().await;
    seed_sample_catalog(&pool).await;
    let (store_url, _store) = spawn_stub_store().await;
    let addr = create_test_server(pool, &store_url).await;
    let client = Client::new();

    let all: serde_json::Value = client
        .get(format!("http://{}/api/cars", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let searched: serde_json::Value = client
        .get(format!("http://{}/api/cars/search", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(all, searched);
}

#[tokio::test]
async fn test_search_brand_is_case_insensitive_substring() {
    let pool = setup_test_database().await;
    seed_sample_catalog(&pool).await;
    let (store_url, _store) = spawn_stub_store().await;
    let addr = create_test_server(pool, &store_url).await;
    let client = Client::new();

    let body: serde_json::Value = client
        .get(format!("http://{}/api/cars/search?brand=bmw", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let cars = body.as_array().unwrap();
    assert_eq!(cars.len(), 1);
    assert_eq!(cars[0]["brand"], "BMW");

    // Substring match: "merc" finds Mercedes
    let body: serde_json::Value = client
        .get(format!("http://{}/api/cars/search?brand=merc", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_search_with_range_bounds() {
    let pool = setup_test_database().await;
    seed_sample_catalog(&pool).await;
    let (store_url, _store) = spawn_stub_store().await;
    let addr = create_test_server(pool, &store_url).await;
    let client = Client::new();

    // Single lower bound
    let body: serde_json::Value = client
        .get(format!("http://{}/api/cars/search?minYear=2020", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.as_array().unwrap().len(), 2);

    // Inclusive bounds on both sides
    let body: serde_json::Value = client
        .get(format!(
            "http://{}/api/cars/search?minPrice=85000&maxPrice=120000",
            addr
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.as_array().unwrap().len(), 2);

    // Combined criteria are conjunctive
    let body: serde_json::Value = client
        .get(format!(
            "http://{}/api/cars/search?fuelType=Gasoline&minYear=2020",
            addr
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let cars = body.as_array().unwrap();
    assert_eq!(cars.len(), 1);
    assert_eq!(cars[0]["brand"], "Mercedes");
}

#[tokio::test]
async fn test_search_with_inverted_bounds_should_return_empty_set() {
    let pool = setup_test_database().await;
    seed_sample_catalog(&pool).await;
    let (store_url, _store) = spawn_stub_store().await;
    let addr = create_test_server(pool, &store_url).await;
    let client = Client::new();

    let response = client
        .get(format!("http://{}/api/cars/search?minPrice=100&maxPrice=50", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_brands_are_deduplicated_and_sorted_bytewise() {
    let pool = setup_test_database().await;
    seed_car(&pool, "Audi", "A4", 2019, "85000.00", "Gasoline", 32000, 2.0).await;
    seed_car(&pool, "bmw", "320d", 2018, "65000.00", "Diesel", 80000, 2.0).await;
    seed_car(&pool, "Audi", "Q5", 2021, "110000.00", "Diesel", 20000, 2.0).await;
    let (store_url, _store) = spawn_stub_store().await;
    let addr = create_test_server(pool, &store_url).await;
    let client = Client::new();

    let body: serde_json::Value = client
        .get(format!("http://{}/api/cars/brands", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // Uppercase sorts before lowercase in byte order
    assert_eq!(body, serde_json::json!(["Audi", "bmw"]));
}

#[tokio::test]
async fn test_fuel_types_are_deduplicated_and_sorted() {
    let pool = setup_test_database().await;
    seed_sample_catalog(&pool).await;
    let (store_url, _store) = spawn_stub_store().await;
    let addr = create_test_server(pool, &store_url).await;
    let client = Client::new();

    let body: serde_json::Value = client
        .get(format!("http://{}/api/cars/fuel-types", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body, serde_json::json!(["Diesel", "Gasoline"]));
}
