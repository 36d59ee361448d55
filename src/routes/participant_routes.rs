use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::ParticipantController;
use crate::dto::participant_dto::{CreateParticipantRequest, UpdateParticipantRequest};
use crate::dto::ApiResponse;
use crate::models::Participant;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_participant_router() -> Router<AppState> {
    Router::new()
        .route(
            "/routes/:id/participants",
            post(add_participant).get(list_participants),
        )
        .route(
            "/participants/:id",
            put(update_participant).delete(remove_participant),
        )
}

async fn add_participant(
    State(state): State<AppState>,
    Path(route_id): Path<Uuid>,
    Json(request): Json<CreateParticipantRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Participant>>), AppError> {
    let controller = ParticipantController::new(state.commands.clone());
    let participant = controller.add(route_id, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(participant))))
}

async fn list_participants(
    State(state): State<AppState>,
    Path(route_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Participant>>>, AppError> {
    let controller = ParticipantController::new(state.commands.clone());
    let participants = controller.list(route_id).await?;
    Ok(Json(ApiResponse::success(participants)))
}

async fn update_participant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateParticipantRequest>,
) -> Result<Json<ApiResponse<Participant>>, AppError> {
    let controller = ParticipantController::new(state.commands.clone());
    let participant = controller.update(id, request).await?;
    Ok(Json(ApiResponse::success(participant)))
}

async fn remove_participant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let controller = ParticipantController::new(state.commands.clone());
    controller.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
