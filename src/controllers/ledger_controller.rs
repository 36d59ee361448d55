use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::CommandContext;
use crate::dto::ledger_dto::{LedgerQuery, RecordTransactionRequest};
use crate::models::LedgerTransaction;
use crate::repositories::{LedgerFilter, TransactionRepository};
use crate::services::ledger_service;
use crate::services::invariant_validator::{Rule, Violation};
use crate::utils::errors::{not_found_error, AppResult};

/// Libro de solo inserción: registrar y consultar
pub struct LedgerController {
    ctx: CommandContext,
}

impl LedgerController {
    pub fn new(ctx: CommandContext) -> Self {
        Self { ctx }
    }

    pub async fn record(&self, request: RecordTransactionRequest) -> AppResult<LedgerTransaction> {
        request.validate()?;
        self.ctx
            .run("record_transaction", || self.record_once(request.clone()))
            .await
    }

    async fn record_once(&self, request: RecordTransactionRequest) -> AppResult<LedgerTransaction> {
        let mut tx = self.ctx.begin().await?;

        let entry = ledger_service::record_transaction(&mut tx, request.into()).await?;

        tx.commit().await?;
        info!(
            "💰 Transacción {:?}/{:?} de {} {} registrada en ruta {}",
            entry.transaction_type, entry.category, entry.amount, entry.currency, entry.route_id
        );
        Ok(entry)
    }

    pub async fn get(&self, transaction_id: Uuid) -> AppResult<LedgerTransaction> {
        let mut conn = self.ctx.read().await?;
        TransactionRepository::find_by_id(&mut conn, transaction_id)
            .await?
            .ok_or_else(|| not_found_error("Transaction", &transaction_id))
    }

    pub async fn list(&self, query: LedgerQuery) -> AppResult<Vec<LedgerTransaction>> {
        if let (Some(from), Some(to)) = (query.from_date, query.to_date) {
            if from > to {
                return Err(Violation::new(
                    Rule::LedgerDateRange,
                    "from_date",
                    format!("from_date {} is after to_date {}", from, to),
                )
                .into());
            }
        }
        let filter = LedgerFilter::from(query);
        let mut conn = self.ctx.read().await?;
        ledger_service::list_transactions(&mut conn, &filter).await
    }
}
