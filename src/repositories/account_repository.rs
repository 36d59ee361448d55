use sqlx::PgConnection;
use uuid::Uuid;

use crate::models::{Account, AccountEntityType, AccountKey, AccountType};
use crate::utils::errors::AppError;

/// Índice único parcial que respalda una sola cuenta principal por clave
pub const SINGLE_PRIMARY_INDEX: &str = "idx_accounts_single_primary";

/// Datos de inserción ya validados
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub id: Uuid,
    pub entity_type: AccountEntityType,
    pub entity_id: Option<Uuid>,
    pub account_type: AccountType,
    pub holder_name: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub service: Option<String>,
    pub description: Option<String>,
    pub currency: String,
}

pub struct AccountRepository;

impl AccountRepository {
    /// Siempre se inserta como no principal; la marca la aplica el protocolo de cuenta principal
    pub async fn insert(conn: &mut PgConnection, account: &NewAccount) -> Result<Account, AppError> {
        let created = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (
                id, entity_type, entity_id, account_type, holder_name, bank_name,
                account_number, service, description, currency, is_primary
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, FALSE)
            RETURNING *
            "#,
        )
        .bind(account.id)
        .bind(account.entity_type)
        .bind(account.entity_id)
        .bind(account.account_type)
        .bind(&account.holder_name)
        .bind(&account.bank_name)
        .bind(&account.account_number)
        .bind(&account.service)
        .bind(&account.description)
        .bind(&account.currency)
        .fetch_one(&mut *conn)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(account)
    }

    /// Bloquea todas las cuentas de la clave en orden de id para evitar interbloqueos
    pub async fn lock_key_group(
        conn: &mut PgConnection,
        key: AccountKey,
    ) -> Result<Vec<Account>, AppError> {
        let accounts = sqlx::query_as::<_, Account>(
            r#"
            SELECT * FROM accounts
            WHERE entity_type = $1 AND entity_id IS NOT DISTINCT FROM $2
            ORDER BY id
            FOR UPDATE
            "#,
        )
        .bind(key.entity_type)
        .bind(key.entity_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(accounts)
    }

    pub async fn clear_primary(conn: &mut PgConnection, ids: &[Uuid]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "UPDATE accounts SET is_primary = FALSE, updated_at = NOW() WHERE id = ANY($1)",
        )
        .bind(ids)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn set_primary(conn: &mut PgConnection, id: Uuid) -> Result<Account, AppError> {
        let account = sqlx::query_as::<_, Account>(
            "UPDATE accounts SET is_primary = TRUE, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(account)
    }

    pub async fn update_details(conn: &mut PgConnection, account: &Account) -> Result<Account, AppError> {
        let updated = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET account_type = $2, holder_name = $3, bank_name = $4, account_number = $5,
                service = $6, description = $7, currency = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(account.id)
        .bind(account.account_type)
        .bind(&account.holder_name)
        .bind(&account.bank_name)
        .bind(&account.account_number)
        .bind(&account.service)
        .bind(&account.description)
        .bind(&account.currency)
        .fetch_one(&mut *conn)
        .await?;

        Ok(updated)
    }

    pub async fn list(
        conn: &mut PgConnection,
        entity_type: Option<AccountEntityType>,
        entity_id: Option<Uuid>,
    ) -> Result<Vec<Account>, AppError> {
        let accounts = sqlx::query_as::<_, Account>(
            r#"
            SELECT * FROM accounts
            WHERE ($1::account_entity_type IS NULL OR entity_type = $1)
              AND ($2::uuid IS NULL OR entity_id = $2)
            ORDER BY entity_type, entity_id NULLS FIRST, is_primary DESC, created_at
            "#,
        )
        .bind(entity_type)
        .bind(entity_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(accounts)
    }

    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}
