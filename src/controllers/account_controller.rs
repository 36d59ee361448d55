use sqlx::PgConnection;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::CommandContext;
use crate::dto::account_dto::{AccountFilters, CreateAccountRequest, UpdateAccountRequest};
use crate::models::{Account, DEFAULT_CURRENCY};
use crate::repositories::{AccountRepository, NewAccount};
use crate::services::invariant_validator::{
    plan_primary_switch, validate_account_fields, validate_account_key,
};
use crate::utils::errors::{conflict_error, not_found_error, AppResult};

pub struct AccountController {
    ctx: CommandContext,
}

/// Protocolo de cuenta principal: bloquear la clave en orden de id,
/// limpiar las hermanas y después marcar la cuenta objetivo
async fn apply_primary(conn: &mut PgConnection, account: &Account) -> AppResult<Account> {
    let siblings = AccountRepository::lock_key_group(conn, account.key()).await?;
    let flags: Vec<(Uuid, bool)> = siblings.iter().map(|a| (a.id, a.is_primary)).collect();
    let switch = plan_primary_switch(account.id, &flags)?;

    let cleared = AccountRepository::clear_primary(conn, &switch.clear).await?;
    let primary = AccountRepository::set_primary(conn, switch.target).await?;
    if cleared > 0 {
        info!(
            "🔁 Cuenta principal {:?}/{:?}: {} → {}",
            primary.entity_type, primary.entity_id, switch.clear[0], primary.id
        );
    }
    Ok(primary)
}

impl AccountController {
    pub fn new(ctx: CommandContext) -> Self {
        Self { ctx }
    }

    pub async fn create(&self, request: CreateAccountRequest) -> AppResult<Account> {
        request.validate()?;
        self.ctx
            .run("create_account", || self.create_once(request.clone()))
            .await
    }

    async fn create_once(&self, request: CreateAccountRequest) -> AppResult<Account> {
        validate_account_key(request.entity_type, request.entity_id)?;
        validate_account_fields(
            request.account_type,
            request.bank_name.as_deref(),
            request.description.as_deref(),
            request.service.as_deref(),
        )?;

        let mut tx = self.ctx.begin().await?;

        let id = request.id.unwrap_or_else(Uuid::new_v4);
        if AccountRepository::find_by_id(&mut tx, id).await?.is_some() {
            return Err(conflict_error("Account", "id", &id.to_string()));
        }

        let is_primary = request.is_primary;
        let account = AccountRepository::insert(
            &mut tx,
            &NewAccount {
                id,
                entity_type: request.entity_type,
                entity_id: request.entity_id,
                account_type: request.account_type,
                holder_name: request.holder_name,
                bank_name: request.bank_name,
                account_number: request.account_number,
                service: request.service,
                description: request.description,
                currency: request.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            },
        )
        .await?;
        let account = if is_primary {
            apply_primary(&mut tx, &account).await?
        } else {
            account
        };

        tx.commit().await?;
        info!(
            "🏦 Cuenta {:?} creada para {:?}/{:?} (principal: {})",
            account.account_type, account.entity_type, account.entity_id, account.is_primary
        );
        Ok(account)
    }

    /// Marca la cuenta como principal de su clave, limpiando las demás en la misma transacción
    pub async fn set_primary(&self, account_id: Uuid) -> AppResult<Account> {
        self.ctx
            .run("set_account_primary", || self.set_primary_once(account_id))
            .await
    }

    async fn set_primary_once(&self, account_id: Uuid) -> AppResult<Account> {
        let mut tx = self.ctx.begin().await?;
        let account = AccountRepository::find_by_id(&mut tx, account_id)
            .await?
            .ok_or_else(|| not_found_error("Account", &account_id))?;

        let primary = apply_primary(&mut tx, &account).await?;

        tx.commit().await?;
        info!("⭐ Cuenta {} marcada como principal", primary.id);
        Ok(primary)
    }

    /// Solo datos; la clave (entity_type, entity_id) y la marca principal no cambian aquí
    pub async fn update(&self, account_id: Uuid, request: UpdateAccountRequest) -> AppResult<Account> {
        request.validate()?;
        self.ctx
            .run("update_account", || self.update_once(account_id, request.clone()))
            .await
    }

    async fn update_once(&self, account_id: Uuid, request: UpdateAccountRequest) -> AppResult<Account> {
        let mut tx = self.ctx.begin().await?;
        let mut account = AccountRepository::find_by_id(&mut tx, account_id)
            .await?
            .ok_or_else(|| not_found_error("Account", &account_id))?;

        if let Some(account_type) = request.account_type {
            account.account_type = account_type;
        }
        if request.holder_name.is_some() {
            account.holder_name = request.holder_name;
        }
        if request.bank_name.is_some() {
            account.bank_name = request.bank_name;
        }
        if request.account_number.is_some() {
            account.account_number = request.account_number;
        }
        if request.service.is_some() {
            account.service = request.service;
        }
        if request.description.is_some() {
            account.description = request.description;
        }
        if let Some(currency) = request.currency {
            account.currency = currency;
        }
        validate_account_fields(
            account.account_type,
            account.bank_name.as_deref(),
            account.description.as_deref(),
            account.service.as_deref(),
        )?;

        let updated = AccountRepository::update_details(&mut tx, &account).await?;

        tx.commit().await?;
        info!("✏️ Cuenta {} actualizada", account_id);
        Ok(updated)
    }

    /// Falla con conflicto si el libro referencia la cuenta
    pub async fn delete(&self, account_id: Uuid) -> AppResult<()> {
        self.ctx
            .run("delete_account", || self.delete_once(account_id))
            .await
    }

    async fn delete_once(&self, account_id: Uuid) -> AppResult<()> {
        let mut tx = self.ctx.begin().await?;
        if AccountRepository::delete(&mut tx, account_id).await? == 0 {
            return Err(not_found_error("Account", &account_id));
        }

        tx.commit().await?;
        info!("🗑️ Cuenta {} eliminada", account_id);
        Ok(())
    }

    pub async fn get(&self, account_id: Uuid) -> AppResult<Account> {
        let mut conn = self.ctx.read().await?;
        AccountRepository::find_by_id(&mut conn, account_id)
            .await?
            .ok_or_else(|| not_found_error("Account", &account_id))
    }

    pub async fn list(&self, filters: AccountFilters) -> AppResult<Vec<Account>> {
        let mut conn = self.ctx.read().await?;
        AccountRepository::list(&mut conn, filters.entity_type, filters.entity_id).await
    }
}
