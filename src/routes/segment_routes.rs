use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::SegmentController;
use crate::dto::segment_dto::{CreateSegmentRequest, UpdateSegmentRequest};
use crate::dto::ApiResponse;
use crate::models::Segment;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_segment_router() -> Router<AppState> {
    Router::new()
        .route("/routes/:id/segments", post(add_segment).get(list_segments))
        .route(
            "/segments/:id",
            get(get_segment).put(update_segment).delete(delete_segment),
        )
}

async fn add_segment(
    State(state): State<AppState>,
    Path(route_id): Path<Uuid>,
    Json(request): Json<CreateSegmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Segment>>), AppError> {
    let controller = SegmentController::new(state.commands.clone());
    let segment = controller.add(route_id, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(segment))))
}

async fn list_segments(
    State(state): State<AppState>,
    Path(route_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Segment>>>, AppError> {
    let controller = SegmentController::new(state.commands.clone());
    let segments = controller.list(route_id).await?;
    Ok(Json(ApiResponse::success(segments)))
}

async fn get_segment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Segment>>, AppError> {
    let controller = SegmentController::new(state.commands.clone());
    let segment = controller.get(id).await?;
    Ok(Json(ApiResponse::success(segment)))
}

async fn update_segment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSegmentRequest>,
) -> Result<Json<ApiResponse<Segment>>, AppError> {
    let controller = SegmentController::new(state.commands.clone());
    let segment = controller.update(id, request).await?;
    Ok(Json(ApiResponse::success(segment)))
}

async fn delete_segment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let controller = SegmentController::new(state.commands.clone());
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
