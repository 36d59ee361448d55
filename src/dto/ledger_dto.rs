use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::{TransactionCategory, TransactionType};
use crate::repositories::LedgerFilter;
use crate::services::ledger_service::LedgerEntry;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordTransactionRequest {
    pub id: Option<Uuid>,
    pub route_id: Uuid,
    pub segment_id: Option<Uuid>,
    pub transaction_type: TransactionType,
    pub category: TransactionCategory,

    #[validate(custom = "crate::utils::validation::validate_positive_amount")]
    pub amount: Decimal,

    #[validate(custom = "crate::utils::validation::validate_currency")]
    pub currency: Option<String>,

    pub from_account_id: Option<Uuid>,
    pub to_account_id: Option<Uuid>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub transaction_date: Option<NaiveDate>,
}

impl From<RecordTransactionRequest> for LedgerEntry {
    fn from(request: RecordTransactionRequest) -> Self {
        Self {
            id: request.id,
            route_id: request.route_id,
            segment_id: request.segment_id,
            transaction_type: request.transaction_type,
            category: request.category,
            amount: request.amount,
            currency: request.currency,
            from_account_id: request.from_account_id,
            to_account_id: request.to_account_id,
            description: request.description,
            transaction_date: request.transaction_date,
        }
    }
}

// Filtros de consulta del libro
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerQuery {
    pub route_id: Option<Uuid>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub transaction_type: Option<TransactionType>,
}

impl From<LedgerQuery> for LedgerFilter {
    fn from(query: LedgerQuery) -> Self {
        Self {
            route_id: query.route_id,
            from_date: query.from_date,
            to_date: query.to_date,
            transaction_type: query.transaction_type,
        }
    }
}
