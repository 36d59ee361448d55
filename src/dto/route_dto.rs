use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Route, RouteStatus, Segment};

// Request para crear una ruta (siempre nace en draft)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRouteRequest {
    pub id: Option<Uuid>,

    #[validate(length(min = 1, max = 200), custom = "crate::utils::validation::validate_not_blank")]
    pub name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_currency")]
    pub currency: Option<String>,
}

// Request para actualizar datos no derivados
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRouteRequest {
    #[validate(length(min = 1, max = 200), custom = "crate::utils::validation::validate_not_blank")]
    pub name: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_currency")]
    pub currency: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_non_negative_amount")]
    pub actual_cost: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStartDateRequest {
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    pub status: RouteStatus,
}

// Filtros para listado de rutas
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteFilters {
    pub status: Option<RouteStatus>,
}

// Ruta con sus segmentos en orden
#[derive(Debug, Serialize)]
pub struct RouteDetail {
    #[serde(flatten)]
    pub route: Route,
    pub segments: Vec<Segment>,
}
