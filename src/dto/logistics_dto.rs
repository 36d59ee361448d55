use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::{LogisticsEntityType, LogisticsType};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLogisticsRequest {
    pub id: Option<Uuid>,
    pub segment_id: Option<Uuid>,
    pub logistics_type: LogisticsType,
    pub entity_type: LogisticsEntityType,
    pub entity_id: Uuid,
    pub quantity: Option<i32>,

    #[validate(custom = "crate::utils::validation::validate_non_negative_amount")]
    pub cost: Decimal,

    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLogisticsRequest {
    /// `null` devuelve la partida al nivel de ruta
    #[serde(default, deserialize_with = "crate::dto::common::nullable")]
    pub segment_id: Option<Option<Uuid>>,
    pub logistics_type: Option<LogisticsType>,
    pub entity_type: Option<LogisticsEntityType>,
    pub entity_id: Option<Uuid>,
    pub quantity: Option<i32>,

    #[validate(custom = "crate::utils::validation::validate_non_negative_amount")]
    pub cost: Option<Decimal>,

    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_segment_id_distinguishes_missing_and_null() {
        let missing: UpdateLogisticsRequest = serde_json::from_value(json!({ "quantity": 2 })).unwrap();
        assert_eq!(missing.segment_id, None);

        let cleared: UpdateLogisticsRequest = serde_json::from_value(json!({ "segment_id": null })).unwrap();
        assert_eq!(cleared.segment_id, Some(None));

        let id = Uuid::new_v4();
        let moved: UpdateLogisticsRequest = serde_json::from_value(json!({ "segment_id": id })).unwrap();
        assert_eq!(moved.segment_id, Some(Some(id)));
    }
}
