//! Modelo de Segment
//!
//! Un segmento es un día del itinerario. `segment_date` y `order_index`
//! los mantiene el motor de recálculo.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Segment - mapea a la tabla segments
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Segment {
    pub id: Uuid,
    pub route_id: Uuid,
    pub day_number: i32,
    pub order_index: i32,
    pub segment_date: Option<NaiveDate>,
    pub origin_location_id: Option<Uuid>,
    pub destination_location_id: Option<Uuid>,
    pub overnight_location_id: Option<Uuid>,
    pub distance: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos de inserción ya validados
#[derive(Debug, Clone)]
pub struct NewSegment {
    pub id: Uuid,
    pub route_id: Uuid,
    pub day_number: i32,
    pub segment_date: Option<NaiveDate>,
    pub origin_location_id: Option<Uuid>,
    pub destination_location_id: Option<Uuid>,
    pub overnight_location_id: Option<Uuid>,
    pub distance: Decimal,
    pub notes: Option<String>,
}
