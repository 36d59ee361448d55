use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSegmentRequest {
    pub id: Option<Uuid>,
    pub day_number: i32,
    pub distance: Decimal,
    pub origin_location_id: Option<Uuid>,
    pub destination_location_id: Option<Uuid>,
    pub overnight_location_id: Option<Uuid>,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

// Solo se modifican los campos presentes
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSegmentRequest {
    pub day_number: Option<i32>,
    pub distance: Option<Decimal>,
    pub origin_location_id: Option<Uuid>,
    pub destination_location_id: Option<Uuid>,
    pub overnight_location_id: Option<Uuid>,
    /// Solo aceptada fuera de draft
    pub segment_date: Option<NaiveDate>,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}
