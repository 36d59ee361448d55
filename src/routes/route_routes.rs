use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::RouteController;
use crate::dto::route_dto::{
    CreateRouteRequest, RouteDetail, RouteFilters, UpdateRouteRequest, UpdateStartDateRequest,
    UpdateStatusRequest,
};
use crate::dto::ApiResponse;
use crate::models::Route;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/routes", post(create_route).get(list_routes))
        .route(
            "/routes/:id",
            get(get_route).put(update_route).delete(delete_route),
        )
        .route("/routes/:id/start-date", put(update_start_date))
        .route("/routes/:id/status", put(update_status))
        .route("/routes/:id/recompute", post(recompute_route))
}

async fn create_route(
    State(state): State<AppState>,
    Json(request): Json<CreateRouteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Route>>), AppError> {
    let controller = RouteController::new(state.commands.clone());
    let route = controller.create(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(route, "Route created")),
    ))
}

async fn list_routes(
    State(state): State<AppState>,
    Query(filters): Query<RouteFilters>,
) -> Result<Json<ApiResponse<Vec<Route>>>, AppError> {
    let controller = RouteController::new(state.commands.clone());
    let routes = controller.list(filters).await?;
    Ok(Json(ApiResponse::success(routes)))
}

async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RouteDetail>>, AppError> {
    let controller = RouteController::new(state.commands.clone());
    let route = controller.get(id).await?;
    Ok(Json(ApiResponse::success(route)))
}

async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRouteRequest>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    let controller = RouteController::new(state.commands.clone());
    let route = controller.update(id, request).await?;
    Ok(Json(ApiResponse::success(route)))
}

async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let controller = RouteController::new(state.commands.clone());
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_start_date(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStartDateRequest>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    let controller = RouteController::new(state.commands.clone());
    let route = controller.update_start_date(id, request).await?;
    Ok(Json(ApiResponse::success(route)))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    let controller = RouteController::new(state.commands.clone());
    let route = controller.update_status(id, request).await?;
    Ok(Json(ApiResponse::success(route)))
}

async fn recompute_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    let controller = RouteController::new(state.commands.clone());
    let route = controller.recompute(id).await?;
    Ok(Json(ApiResponse::success(route)))
}
