//! Modelo de LogisticsItem
//!
//! La referencia `entity_type`/`entity_id` es polimórfica: no hay clave
//! foránea, así que se modela como `LogisticsEntity` y el validador
//! comprueba la existencia contra la tabla que corresponde a cada variante.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Tipo de partida logística - mapea al ENUM logistics_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "logistics_type", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum LogisticsType {
    AirportTransfer,
    SupportVehicle,
    HotelClient,
    HotelStaff,
    Lunch,
    ThirdParty,
    ExtraCost,
}

impl LogisticsType {
    /// Tipos de entidad que puede referenciar cada tipo de partida
    pub fn allowed_entity_types(self) -> &'static [LogisticsEntityType] {
        use LogisticsEntityType::*;
        match self {
            LogisticsType::AirportTransfer => &[Vehicle, ThirdParty],
            LogisticsType::SupportVehicle => &[Vehicle],
            LogisticsType::HotelClient | LogisticsType::HotelStaff => &[Hotel],
            LogisticsType::Lunch => &[Caterer, Location],
            LogisticsType::ThirdParty => &[ThirdParty],
            LogisticsType::ExtraCost => &[Vehicle, Hotel, Caterer, ThirdParty, Location],
        }
    }

    /// Los costes extra son tarifas planas: no se multiplican por la cantidad
    pub fn is_flat_fee(self) -> bool {
        self == LogisticsType::ExtraCost
    }
}

/// Tipo de entidad referenciada - mapea al ENUM logistics_entity_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "logistics_entity_type", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum LogisticsEntityType {
    Vehicle,
    Hotel,
    Caterer,
    ThirdParty,
    Location,
}

/// Referencia polimórfica resuelta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogisticsEntity {
    Vehicle(Uuid),
    Hotel(Uuid),
    Caterer(Uuid),
    ThirdParty(Uuid),
    Location(Uuid),
}

impl LogisticsEntity {
    pub fn new(entity_type: LogisticsEntityType, entity_id: Uuid) -> Self {
        match entity_type {
            LogisticsEntityType::Vehicle => LogisticsEntity::Vehicle(entity_id),
            LogisticsEntityType::Hotel => LogisticsEntity::Hotel(entity_id),
            LogisticsEntityType::Caterer => LogisticsEntity::Caterer(entity_id),
            LogisticsEntityType::ThirdParty => LogisticsEntity::ThirdParty(entity_id),
            LogisticsEntityType::Location => LogisticsEntity::Location(entity_id),
        }
    }

    pub fn entity_type(&self) -> LogisticsEntityType {
        match self {
            LogisticsEntity::Vehicle(_) => LogisticsEntityType::Vehicle,
            LogisticsEntity::Hotel(_) => LogisticsEntityType::Hotel,
            LogisticsEntity::Caterer(_) => LogisticsEntityType::Caterer,
            LogisticsEntity::ThirdParty(_) => LogisticsEntityType::ThirdParty,
            LogisticsEntity::Location(_) => LogisticsEntityType::Location,
        }
    }

    pub fn id(&self) -> Uuid {
        match *self {
            LogisticsEntity::Vehicle(id)
            | LogisticsEntity::Hotel(id)
            | LogisticsEntity::Caterer(id)
            | LogisticsEntity::ThirdParty(id)
            | LogisticsEntity::Location(id) => id,
        }
    }

    /// Tabla que respalda cada variante
    pub fn table(&self) -> &'static str {
        match self {
            LogisticsEntity::Vehicle(_) => "vehicles",
            LogisticsEntity::Hotel(_) => "hotels",
            LogisticsEntity::Caterer(_) => "caterers",
            LogisticsEntity::ThirdParty(_) => "third_parties",
            LogisticsEntity::Location(_) => "locations",
        }
    }
}

/// LogisticsItem - mapea a la tabla logistics_items
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LogisticsItem {
    pub id: Uuid,
    pub route_id: Uuid,
    pub segment_id: Option<Uuid>,
    pub logistics_type: LogisticsType,
    pub entity_type: LogisticsEntityType,
    pub entity_id: Uuid,
    pub quantity: i32,
    pub cost: Decimal,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos de inserción ya validados
#[derive(Debug, Clone)]
pub struct NewLogisticsItem {
    pub id: Uuid,
    pub route_id: Uuid,
    pub segment_id: Option<Uuid>,
    pub logistics_type: LogisticsType,
    pub entity: LogisticsEntity,
    pub quantity: i32,
    pub cost: Decimal,
    pub description: Option<String>,
}

impl LogisticsItem {
    pub fn entity(&self) -> LogisticsEntity {
        LogisticsEntity::new(self.entity_type, self.entity_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_round_trips_type_and_table() {
        let id = Uuid::new_v4();
        let entity = LogisticsEntity::new(LogisticsEntityType::ThirdParty, id);
        assert_eq!(entity, LogisticsEntity::ThirdParty(id));
        assert_eq!(entity.entity_type(), LogisticsEntityType::ThirdParty);
        assert_eq!(entity.table(), "third_parties");
        assert_eq!(entity.id(), id);
    }

    #[test]
    fn test_hotel_types_only_accept_hotels() {
        assert_eq!(
            LogisticsType::HotelClient.allowed_entity_types(),
            &[LogisticsEntityType::Hotel]
        );
        assert_eq!(
            LogisticsType::HotelStaff.allowed_entity_types(),
            &[LogisticsEntityType::Hotel]
        );
    }

    #[test]
    fn test_only_extra_cost_is_flat_fee() {
        assert!(LogisticsType::ExtraCost.is_flat_fee());
        assert!(!LogisticsType::SupportVehicle.is_flat_fee());
        assert!(!LogisticsType::Lunch.is_flat_fee());
    }
}
