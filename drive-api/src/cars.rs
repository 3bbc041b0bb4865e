use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use drive_domain::{Car, PickupLocation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct ListCarRequest {
    model: String,
    year: i32,
    mileage: i32,
    price_per_day: i64,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct AvailabilityQuery {
    start: String,
    end: String,
}

#[derive(Debug, Serialize)]
struct AvailabilityResponse {
    car_id: Uuid,
    start: String,
    end: String,
    available: bool,
}

#[derive(Debug, Serialize)]
struct CalendarResponse {
    car_id: Uuid,
    blocked_dates: BTreeSet<NaiveDate>,
    manual_blocks: BTreeSet<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct BlockDatesRequest {
    dates: Vec<String>,
}

#[derive(Debug, Serialize)]
struct BlockDatesResponse {
    car_id: Uuid,
    blocked_dates: BTreeSet<NaiveDate>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/cars", post(list_car).get(browse_cars))
        .route("/v1/cars/{id}", get(get_car))
        .route("/v1/cars/{id}/availability", get(check_availability))
        .route("/v1/cars/{id}/calendar", get(calendar))
        .route("/v1/cars/{id}/blocks", post(block_dates).delete(unblock_dates))
}

async fn list_car(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ListCarRequest>,
) -> Result<Json<Car>, AppError> {
    if req.model.trim().is_empty() {
        return Err(AppError::ValidationError("model must not be empty".into()));
    }
    if req.price_per_day <= 0 {
        return Err(AppError::ValidationError(
            "price_per_day must be positive".into(),
        ));
    }

    let car = Car::new(
        req.model,
        req.year,
        req.mileage,
        req.price_per_day,
        PickupLocation {
            latitude: req.latitude,
            longitude: req.longitude,
        },
        claims.sub,
    );
    state.catalog.insert_car(&car).await?;

    info!(car_id = %car.id, owner = %car.owner_id, "car listed");
    Ok(Json(car))
}

/// Browse listings. Your own cars are excluded, mirroring the renter's view.
async fn browse_cars(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Car>>, AppError> {
    let cars = state.catalog.list_cars().await?;
    Ok(Json(
        cars.into_iter()
            .filter(|c| !c.is_owned_by(&claims.sub))
            .collect(),
    ))
}

async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Car>, AppError> {
    let car = state
        .catalog
        .get_car(id)
        .await?
        .ok_or_else(|| AppError::ValidationError(format!("unknown car {id}")))?;
    Ok(Json(car))
}

async fn check_availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let available = state.ledger.is_available(id, &query.start, &query.end).await?;
    Ok(Json(AvailabilityResponse {
        car_id: id,
        start: query.start,
        end: query.end,
        available,
    }))
}

/// Blocked dates for the availability calendar view.
async fn calendar(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CalendarResponse>, AppError> {
    let car = state
        .catalog
        .get_car(id)
        .await?
        .ok_or_else(|| AppError::ValidationError(format!("unknown car {id}")))?;
    Ok(Json(CalendarResponse {
        car_id: id,
        blocked_dates: car.blocked_dates,
        manual_blocks: car.manual_blocks,
    }))
}

async fn block_dates(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<BlockDatesRequest>,
) -> Result<Json<BlockDatesResponse>, AppError> {
    let blocked_dates = state.ledger.block_dates(id, &claims.sub, &req.dates).await?;
    Ok(Json(BlockDatesResponse {
        car_id: id,
        blocked_dates,
    }))
}

async fn unblock_dates(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<BlockDatesRequest>,
) -> Result<Json<BlockDatesResponse>, AppError> {
    let blocked_dates = state
        .ledger
        .unblock_dates(id, &claims.sub, &req.dates)
        .await?;
    Ok(Json(BlockDatesResponse {
        car_id: id,
        blocked_dates,
    }))
}
