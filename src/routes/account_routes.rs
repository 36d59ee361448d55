use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::AccountController;
use crate::dto::account_dto::{AccountFilters, CreateAccountRequest, UpdateAccountRequest};
use crate::dto::ApiResponse;
use crate::models::Account;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_account_router() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(create_account).get(list_accounts))
        .route(
            "/accounts/:id",
            get(get_account).put(update_account).delete(delete_account),
        )
        .route("/accounts/:id/primary", put(set_primary))
}

async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Account>>), AppError> {
    let controller = AccountController::new(state.commands.clone());
    let account = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(account))))
}

async fn list_accounts(
    State(state): State<AppState>,
    Query(filters): Query<AccountFilters>,
) -> Result<Json<ApiResponse<Vec<Account>>>, AppError> {
    let controller = AccountController::new(state.commands.clone());
    let accounts = controller.list(filters).await?;
    Ok(Json(ApiResponse::success(accounts)))
}

async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Account>>, AppError> {
    let controller = AccountController::new(state.commands.clone());
    let account = controller.get(id).await?;
    Ok(Json(ApiResponse::success(account)))
}

async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAccountRequest>,
) -> Result<Json<ApiResponse<Account>>, AppError> {
    let controller = AccountController::new(state.commands.clone());
    let account = controller.update(id, request).await?;
    Ok(Json(ApiResponse::success(account)))
}

async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let controller = AccountController::new(state.commands.clone());
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_primary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Account>>, AppError> {
    let controller = AccountController::new(state.commands.clone());
    let account = controller.set_primary(id).await?;
    Ok(Json(ApiResponse::success_with_message(
        account,
        "Primary account updated",
    )))
}
