//! Modelo de Account
//!
//! Como mucho una cuenta principal por clave `(entity_type, entity_id)`;
//! las cuentas de empresa usan `entity_id = NULL` como clave.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Propietario de la cuenta - mapea al ENUM account_entity_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "account_entity_type", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum AccountEntityType {
    Client,
    Hotel,
    Staff,
    Driver,
    Vehicle,
    Company,
    ThirdParty,
}

/// Tipo de cuenta - mapea al ENUM account_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "account_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Bank,
    Cash,
    Online,
    Other,
}

/// Clave de exclusividad de la cuenta principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountKey {
    pub entity_type: AccountEntityType,
    pub entity_id: Option<Uuid>,
}

/// Account - mapea a la tabla accounts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
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
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn key(&self) -> AccountKey {
        AccountKey {
            entity_type: self.entity_type,
            entity_id: self.entity_id,
        }
    }
}
