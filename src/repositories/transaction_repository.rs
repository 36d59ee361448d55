use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::models::{LedgerTransaction, TransactionCategory, TransactionSnapshot, TransactionType};
use crate::utils::errors::AppError;

/// Asiento listo para insertar, con su snapshot ya capturado
#[derive(Debug, Clone)]
pub struct NewTransaction {
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
    pub snapshot: TransactionSnapshot,
}

/// Filtros de consulta del libro
#[derive(Debug, Clone, Default)]
pub struct LedgerFilter {
    pub route_id: Option<Uuid>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub transaction_type: Option<TransactionType>,
}

/// Solo inserción y lectura: el libro no expone UPDATE ni DELETE
pub struct TransactionRepository;

impl TransactionRepository {
    pub async fn insert(
        conn: &mut PgConnection,
        entry: NewTransaction,
    ) -> Result<LedgerTransaction, AppError> {
        let created = sqlx::query_as::<_, LedgerTransaction>(
            r#"
            INSERT INTO transactions (
                id, route_id, segment_id, transaction_type, category, amount, currency,
                from_account_id, to_account_id, description, transaction_date, snapshot
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(entry.id)
        .bind(entry.route_id)
        .bind(entry.segment_id)
        .bind(entry.transaction_type)
        .bind(entry.category)
        .bind(entry.amount)
        .bind(&entry.currency)
        .bind(entry.from_account_id)
        .bind(entry.to_account_id)
        .bind(&entry.description)
        .bind(entry.transaction_date)
        .bind(Json(entry.snapshot))
        .fetch_one(&mut *conn)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<LedgerTransaction>, AppError> {
        let entry = sqlx::query_as::<_, LedgerTransaction>("SELECT * FROM transactions WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(entry)
    }

    pub async fn list(
        conn: &mut PgConnection,
        filter: &LedgerFilter,
    ) -> Result<Vec<LedgerTransaction>, AppError> {
        let entries = sqlx::query_as::<_, LedgerTransaction>(
            r#"
            SELECT * FROM transactions
            WHERE ($1::uuid IS NULL OR route_id = $1)
              AND ($2::date IS NULL OR transaction_date >= $2)
              AND ($3::date IS NULL OR transaction_date <= $3)
              AND ($4::transaction_type IS NULL OR transaction_type = $4)
            ORDER BY transaction_date, created_at
            "#,
        )
        .bind(filter.route_id)
        .bind(filter.from_date)
        .bind(filter.to_date)
        .bind(filter.transaction_type)
        .fetch_all(&mut *conn)
        .await?;

        Ok(entries)
    }
}
