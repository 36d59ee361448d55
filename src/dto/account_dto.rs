use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::{AccountEntityType, AccountType};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAccountRequest {
    pub id: Option<Uuid>,
    pub entity_type: AccountEntityType,
    pub entity_id: Option<Uuid>,
    pub account_type: AccountType,

    #[validate(length(max = 200))]
    pub holder_name: Option<String>,

    #[validate(length(max = 200))]
    pub bank_name: Option<String>,

    #[validate(length(max = 64))]
    pub account_number: Option<String>,

    #[validate(length(max = 100))]
    pub service: Option<String>,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_currency")]
    pub currency: Option<String>,

    #[serde(default)]
    pub is_primary: bool,
}

// La clave (entity_type, entity_id) no se puede cambiar
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    pub account_type: Option<AccountType>,

    #[validate(length(max = 200))]
    pub holder_name: Option<String>,

    #[validate(length(max = 200))]
    pub bank_name: Option<String>,

    #[validate(length(max = 64))]
    pub account_number: Option<String>,

    #[validate(length(max = 100))]
    pub service: Option<String>,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_currency")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountFilters {
    pub entity_type: Option<AccountEntityType>,
    pub entity_id: Option<Uuid>,
}
