//! Modelo de Participant

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Rol del participante - mapea al ENUM participant_role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "participant_role", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ParticipantRole {
    Client,
    GuideCaptain,
    GuideTail,
    Staff,
}

impl ParticipantRole {
    pub fn is_guide(self) -> bool {
        matches!(self, ParticipantRole::GuideCaptain | ParticipantRole::GuideTail)
    }
}

/// Participant - mapea a la tabla participants
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Participant {
    pub id: Uuid,
    pub route_id: Uuid,
    pub role: ParticipantRole,
    pub client_id: Option<Uuid>,
    pub guide_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
