//! Modelo de LedgerTransaction
//!
//! Las transacciones son de solo inserción. El `snapshot` congela el estado de
//! la ruta, el segmento y las cuentas en el momento del registro.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type};
use uuid::Uuid;

use super::account::{AccountEntityType, AccountType};
use super::route::RouteStatus;

/// Tipo de transacción - mapea al ENUM transaction_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "transaction_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Payment,
    Expense,
    Refund,
}

/// Categoría contable - mapea al ENUM transaction_category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "transaction_category", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TransactionCategory {
    Hotel,
    Transport,
    Food,
    ThirdParty,
    Vehicle,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSnapshot {
    pub id: Uuid,
    pub name: String,
    pub status: RouteStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSnapshot {
    pub id: Uuid,
    pub day_number: i32,
    pub segment_date: Option<NaiveDate>,
    pub distance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub id: Uuid,
    pub entity_type: AccountEntityType,
    pub entity_id: Option<Uuid>,
    pub account_type: AccountType,
    pub holder_name: Option<String>,
    pub bank_name: Option<String>,
    pub service: Option<String>,
    pub is_primary: bool,
}

/// Estado desnormalizado de las entidades referenciadas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSnapshot {
    pub captured_at: DateTime<Utc>,
    pub route: RouteSnapshot,
    pub segment: Option<SegmentSnapshot>,
    pub from_account: Option<AccountSnapshot>,
    pub to_account: Option<AccountSnapshot>,
}

/// LedgerTransaction - mapea a la tabla transactions
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LedgerTransaction {
    pub id: Uuid,
    pub route_id: Uuid,
    pub segment_id: Option<Uuid>,
    pub transaction_type: TransactionType,
    pub category: TransactionCategory,
    pub amount: Decimal,
    pub currency: String,
    pub from_account_id: Option<Uuid>,
    pub to_account_id: Option<Uuid>,
    pub description: Option<String>,
    pub transaction_date: NaiveDate,
    pub snapshot: Json<TransactionSnapshot>,
    pub created_at: DateTime<Utc>,
}
