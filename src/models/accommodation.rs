//! Modelos de Accommodation, Room y RoomParticipant

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use super::participant::ParticipantRole;

/// Grupo alojado - mapea al ENUM group_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "group_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
    Client,
    Staff,
}

impl GroupType {
    /// Los alojamientos de clientes solo hospedan clientes; los de staff, guías y staff
    pub fn admits(self, role: ParticipantRole) -> bool {
        match self {
            GroupType::Client => role == ParticipantRole::Client,
            GroupType::Staff => role != ParticipantRole::Client,
        }
    }
}

/// Tipo de habitación - mapea al ENUM room_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "room_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Single,
    Double,
    Twin,
    Triple,
}

impl RoomType {
    pub fn capacity(self) -> usize {
        match self {
            RoomType::Single => 1,
            RoomType::Double | RoomType::Twin => 2,
            RoomType::Triple => 3,
        }
    }
}

/// Accommodation - mapea a la tabla accommodations
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Accommodation {
    pub id: Uuid,
    pub segment_id: Uuid,
    pub hotel_id: Uuid,
    pub group_type: GroupType,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Room - mapea a la tabla rooms
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Room {
    pub id: Uuid,
    pub accommodation_id: Uuid,
    pub room_type: RoomType,
    pub is_couple: bool,
    pub created_at: DateTime<Utc>,
}

/// Enlace habitación-participante - mapea a la tabla room_participants
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoomParticipant {
    pub room_id: Uuid,
    pub participant_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_capacity() {
        assert_eq!(RoomType::Single.capacity(), 1);
        assert_eq!(RoomType::Double.capacity(), 2);
        assert_eq!(RoomType::Twin.capacity(), 2);
        assert_eq!(RoomType::Triple.capacity(), 3);
    }

    #[test]
    fn test_group_admission() {
        assert!(GroupType::Client.admits(ParticipantRole::Client));
        assert!(!GroupType::Client.admits(ParticipantRole::Staff));
        assert!(GroupType::Staff.admits(ParticipantRole::GuideTail));
        assert!(!GroupType::Staff.admits(ParticipantRole::Client));
    }
}
