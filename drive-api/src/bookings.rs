use axum::{
    extract::{Path, State},
    routing::post,
    Extension, Json, Router,
};
use drive_domain::Booking;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct ReserveRequest {
    car_id: Uuid,
    start_date: String,
    end_date: String,
}

#[derive(Debug, Serialize)]
struct ReserveResponse {
    booking_id: Uuid,
    status: String,
    total_price: i64,
}

#[derive(Debug, Serialize)]
struct CancelResponse {
    booking_id: Uuid,
    status: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(reserve).get(my_bookings))
        .route("/v1/bookings/{id}/cancel", post(cancel))
}

async fn reserve(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ReserveRequest>,
) -> Result<Json<ReserveResponse>, AppError> {
    let booking = state
        .ledger
        .reserve(req.car_id, &claims.sub, &req.start_date, &req.end_date)
        .await?;

    info!(booking_id = %booking.id, renter = %claims.sub, "reservation committed");
    Ok(Json(ReserveResponse {
        booking_id: booking.id,
        status: booking.status.as_str().to_string(),
        total_price: booking.total_price,
    }))
}

async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<CancelResponse>, AppError> {
    state.ledger.cancel(id, &claims.sub).await?;
    Ok(Json(CancelResponse {
        booking_id: id,
        status: "CANCELLED".to_string(),
    }))
}

async fn my_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = state.bookings.list_for_renter(&claims.sub).await?;
    Ok(Json(bookings))
}
