use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::AccommodationController;
use crate::dto::accommodation_dto::{
    AccommodationDetail, AssignRoomRequest, CreateAccommodationRequest, RoomDetail,
};
use crate::dto::ApiResponse;
use crate::models::Accommodation;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_accommodation_router() -> Router<AppState> {
    Router::new()
        .route(
            "/segments/:id/accommodations",
            post(create_accommodation).get(list_accommodations),
        )
        .route("/accommodations/:id", delete(delete_accommodation))
        .route("/accommodations/:id/rooms", post(assign_room))
        .route("/rooms/:id", delete(delete_room))
        .route(
            "/rooms/:id/participants/:participant_id",
            post(add_room_participant).delete(remove_room_participant),
        )
}

async fn create_accommodation(
    State(state): State<AppState>,
    Path(segment_id): Path<Uuid>,
    Json(request): Json<CreateAccommodationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Accommodation>>), AppError> {
    let controller = AccommodationController::new(state.commands.clone());
    let accommodation = controller.create(segment_id, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(accommodation))))
}

async fn list_accommodations(
    State(state): State<AppState>,
    Path(segment_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<AccommodationDetail>>>, AppError> {
    let controller = AccommodationController::new(state.commands.clone());
    let accommodations = controller.list(segment_id).await?;
    Ok(Json(ApiResponse::success(accommodations)))
}

async fn delete_accommodation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let controller = AccommodationController::new(state.commands.clone());
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn assign_room(
    State(state): State<AppState>,
    Path(accommodation_id): Path<Uuid>,
    Json(request): Json<AssignRoomRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RoomDetail>>), AppError> {
    let controller = AccommodationController::new(state.commands.clone());
    let room = controller.assign_room(accommodation_id, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(room))))
}

async fn delete_room(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let controller = AccommodationController::new(state.commands.clone());
    controller.delete_room(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_room_participant(
    State(state): State<AppState>,
    Path((room_id, participant_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<RoomDetail>>, AppError> {
    let controller = AccommodationController::new(state.commands.clone());
    let room = controller.add_room_participant(room_id, participant_id).await?;
    Ok(Json(ApiResponse::success(room)))
}

async fn remove_room_participant(
    State(state): State<AppState>,
    Path((room_id, participant_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let controller = AccommodationController::new(state.commands.clone());
    controller.remove_room_participant(room_id, participant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
