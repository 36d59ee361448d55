use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::LogisticsController;
use crate::dto::logistics_dto::{CreateLogisticsRequest, UpdateLogisticsRequest};
use crate::dto::ApiResponse;
use crate::models::LogisticsItem;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_logistics_router() -> Router<AppState> {
    Router::new()
        .route("/routes/:id/logistics", post(add_item).get(list_items))
        .route("/logistics/:id", put(update_item).delete(delete_item))
}

async fn add_item(
    State(state): State<AppState>,
    Path(route_id): Path<Uuid>,
    Json(request): Json<CreateLogisticsRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LogisticsItem>>), AppError> {
    let controller = LogisticsController::new(state.commands.clone());
    let item = controller.add(route_id, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(item))))
}

async fn list_items(
    State(state): State<AppState>,
    Path(route_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<LogisticsItem>>>, AppError> {
    let controller = LogisticsController::new(state.commands.clone());
    let items = controller.list(route_id).await?;
    Ok(Json(ApiResponse::success(items)))
}

async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateLogisticsRequest>,
) -> Result<Json<ApiResponse<LogisticsItem>>, AppError> {
    let controller = LogisticsController::new(state.commands.clone());
    let item = controller.update(id, request).await?;
    Ok(Json(ApiResponse::success(item)))
}

async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let controller = LogisticsController::new(state.commands.clone());
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
