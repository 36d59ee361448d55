use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::LedgerController;
use crate::dto::ledger_dto::{LedgerQuery, RecordTransactionRequest};
use crate::dto::ApiResponse;
use crate::models::LedgerTransaction;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Sin PUT ni DELETE: los asientos son inmutables
pub fn create_ledger_router() -> Router<AppState> {
    Router::new()
        .route("/transactions", post(record_transaction).get(list_transactions))
        .route("/transactions/:id", get(get_transaction))
}

async fn record_transaction(
    State(state): State<AppState>,
    Json(request): Json<RecordTransactionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LedgerTransaction>>), AppError> {
    let controller = LedgerController::new(state.commands.clone());
    let entry = controller.record(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(entry))))
}

async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<LedgerQuery>,
) -> Result<Json<ApiResponse<Vec<LedgerTransaction>>>, AppError> {
    let controller = LedgerController::new(state.commands.clone());
    let entries = controller.list(query).await?;
    Ok(Json(ApiResponse::success(entries)))
}

async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LedgerTransaction>>, AppError> {
    let controller = LedgerController::new(state.commands.clone());
    let entry = controller.get(id).await?;
    Ok(Json(ApiResponse::success(entry)))
}
