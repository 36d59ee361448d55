use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Accommodation, GroupType, Room, RoomType};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAccommodationRequest {
    pub id: Option<Uuid>,
    pub hotel_id: Uuid,
    pub group_type: GroupType,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssignRoomRequest {
    pub id: Option<Uuid>,
    pub room_type: RoomType,
    #[serde(default)]
    pub is_couple: bool,

    #[validate(length(max = 3))]
    #[serde(default)]
    pub participant_ids: Vec<Uuid>,
}

// Habitación con sus ocupantes
#[derive(Debug, Clone, Serialize)]
pub struct RoomDetail {
    #[serde(flatten)]
    pub room: Room,
    pub participant_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccommodationDetail {
    #[serde(flatten)]
    pub accommodation: Accommodation,
    pub rooms: Vec<RoomDetail>,
}
