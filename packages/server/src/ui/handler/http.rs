//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::RoomCode,
    infrastructure::dto::{
        conversion::room_detail_dto,
        http::{HealthResponse, RoomDetailDto, RoomSummaryDto},
    },
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by code
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_code): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room_code = RoomCode::new(room_code).map_err(|_| StatusCode::BAD_REQUEST)?;

    match state.get_room_detail_usecase.execute(&room_code).await {
        Some(detail) => Ok(Json(room_detail_dto(
            &detail.room,
            detail.current_position,
        ))),
        None => Err(StatusCode::NOT_FOUND),
    }
}
