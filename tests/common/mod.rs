//! Common test utilities and helpers.

#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use chrono::NaiveDate;
use surplus::api;
use surplus::config::{AuthConfig, QueryConfig};
use surplus::db::{self, ClaimStatus, DbPool, NewClaim, NewFoodListing, NewProvider, NewReceiver};
use surplus::AppState;

/// Set up a fresh in-memory database with the schema applied.
pub async fn setup_test_db() -> DbPool {
    let pool = db::init_pool(":memory:")
        .await
        .expect("Failed to init pool");
    db::initialize_schema(&pool)
        .await
        .expect("Failed to apply schema");
    pool
}

pub async fn add_provider(pool: &DbPool, id: i64, name: &str, provider_type: &str, city: &str) {
    db::create_provider(
        pool,
        NewProvider {
            provider_id: Some(id),
            name: name.to_string(),
            provider_type: provider_type.to_string(),
            city: city.to_string(),
            contact: Some(format!("+91-555-{:04}", id)),
        },
    )
    .await
    .expect("Failed to create provider");
}

pub async fn add_receiver(pool: &DbPool, id: i64, name: &str, city: &str) {
    db::create_receiver(
        pool,
        NewReceiver {
            receiver_id: Some(id),
            name: name.to_string(),
            city: city.to_string(),
            contact: None,
        },
    )
    .await
    .expect("Failed to create receiver");
}

pub fn listing(provider_id: i64, food_name: &str, quantity: i64) -> NewFoodListing {
    NewFoodListing {
        provider_id,
        food_name: food_name.to_string(),
        food_type: "Vegetarian".to_string(),
        quantity,
        meal_type: "Dinner".to_string(),
        location: "Chennai".to_string(),
        expiry_date: NaiveDate::from_ymd_opt(2025, 3, 17).expect("valid date"),
    }
}

pub async fn add_listing(pool: &DbPool, provider_id: i64, food_name: &str, quantity: i64) -> i64 {
    db::create_food_listing(pool, listing(provider_id, food_name, quantity))
        .await
        .expect("Failed to create food listing")
        .food_id
}

pub async fn add_claim(pool: &DbPool, food_id: i64, receiver_id: i64, status: ClaimStatus) -> i64 {
    db::create_claim(
        pool,
        NewClaim {
            food_id,
            receiver_id,
            status,
        },
    )
    .await
    .expect("Failed to create claim")
    .claim_id
}

/// A small dataset:
/// - providers: Annapurna Hotel (Restaurant, Chennai), FreshMart (Supermarket, Chennai),
///   Bake House (Restaurant, Delhi)
/// - receivers: Hope NGO (Chennai), Food Bank (Delhi)
/// - listings: Rice 10 (p1), Bread 4 (p3), Salad 6 (p2)
/// - claims: Rice→Hope Completed, Rice→Food Bank Pending, Bread→Hope Completed
pub async fn seed_dataset(pool: &DbPool) {
    add_provider(pool, 1, "Annapurna Hotel", "Restaurant", "Chennai").await;
    add_provider(pool, 2, "FreshMart", "Supermarket", "Chennai").await;
    add_provider(pool, 3, "Bake House", "Restaurant", "Delhi").await;

    add_receiver(pool, 1, "Hope NGO", "Chennai").await;
    add_receiver(pool, 2, "Food Bank", "Delhi").await;

    let rice = add_listing(pool, 1, "Rice", 10).await;
    let bread = add_listing(pool, 3, "Bread", 4).await;
    add_listing(pool, 2, "Salad", 6).await;

    add_claim(pool, rice, 1, ClaimStatus::Completed).await;
    add_claim(pool, rice, 2, ClaimStatus::Pending).await;
    add_claim(pool, bread, 1, ClaimStatus::Completed).await;
}

/// Build a test server over `pool` with the given policies.
pub fn build_server(pool: DbPool, query: QueryConfig, auth: AuthConfig) -> TestServer {
    let state = AppState::with_pool(pool, query, auth);

    let app = Router::new()
        .merge(api::routes(state.clone()))
        .with_state(state);

    TestServer::new(app).expect("Failed to create test server")
}

/// Test server with default policies over a seeded database.
pub async fn build_test_app() -> (TestServer, DbPool) {
    let pool = setup_test_db().await;
    seed_dataset(&pool).await;
    let server = build_server(pool.clone(), QueryConfig::default(), AuthConfig::default());
    (server, pool)
}
