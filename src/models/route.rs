//! Modelo de Route
//!
//! La ruta es el agregado raíz del itinerario. Los campos `end_date`,
//! `duration_days`, `total_distance` y `estimated_cost` son derivados y solo
//! los escribe el motor de recálculo.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Moneda de una ruta creada sin moneda explícita
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Mayor importe que cabe en las columnas NUMERIC(14, 2)
pub fn max_money() -> Decimal {
    Decimal::new(99_999_999_999_999, 2)
}

/// Estado de la ruta - mapea al ENUM route_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "route_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum RouteStatus {
    Draft,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl RouteStatus {
    /// `completed` y `cancelled` no admiten más transiciones
    pub fn is_terminal(self) -> bool {
        matches!(self, RouteStatus::Completed | RouteStatus::Cancelled)
    }

    /// Transiciones en un solo sentido: draft → confirmed → in-progress → completed,
    /// y cancelled desde cualquier estado no terminal.
    pub fn can_transition_to(self, next: RouteStatus) -> bool {
        match (self, next) {
            (current, RouteStatus::Cancelled) => !current.is_terminal(),
            (RouteStatus::Draft, RouteStatus::Confirmed) => true,
            (RouteStatus::Confirmed, RouteStatus::InProgress) => true,
            (RouteStatus::InProgress, RouteStatus::Completed) => true,
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RouteStatus::Draft => "draft",
            RouteStatus::Confirmed => "confirmed",
            RouteStatus::InProgress => "in-progress",
            RouteStatus::Completed => "completed",
            RouteStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Route principal - mapea exactamente a la tabla routes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Route {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: RouteStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub duration_days: Option<i32>,
    pub total_distance: Decimal,
    pub estimated_cost: Decimal,
    pub actual_cost: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Route {
    pub fn is_draft(&self) -> bool {
        self.status == RouteStatus::Draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(RouteStatus::Draft.can_transition_to(RouteStatus::Confirmed));
        assert!(RouteStatus::Confirmed.can_transition_to(RouteStatus::InProgress));
        assert!(RouteStatus::InProgress.can_transition_to(RouteStatus::Completed));
    }

    #[test]
    fn test_no_skipping_or_reopening() {
        assert!(!RouteStatus::Draft.can_transition_to(RouteStatus::InProgress));
        assert!(!RouteStatus::Confirmed.can_transition_to(RouteStatus::Draft));
        assert!(!RouteStatus::Completed.can_transition_to(RouteStatus::InProgress));
        assert!(!RouteStatus::Cancelled.can_transition_to(RouteStatus::Draft));
    }

    #[test]
    fn test_cancel_only_from_non_terminal() {
        assert!(RouteStatus::Draft.can_transition_to(RouteStatus::Cancelled));
        assert!(RouteStatus::InProgress.can_transition_to(RouteStatus::Cancelled));
        assert!(!RouteStatus::Completed.can_transition_to(RouteStatus::Cancelled));
        assert!(!RouteStatus::Cancelled.can_transition_to(RouteStatus::Cancelled));
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        let value = serde_json::to_value(RouteStatus::InProgress).unwrap();
        assert_eq!(value, serde_json::json!("in-progress"));
        assert_eq!(RouteStatus::InProgress.to_string(), "in-progress");
    }
}
