use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::ParticipantRole;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateParticipantRequest {
    pub id: Option<Uuid>,
    pub role: ParticipantRole,
    pub client_id: Option<Uuid>,
    pub guide_id: Option<Uuid>,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

// Reemplaza rol e identidad completos
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateParticipantRequest {
    pub role: ParticipantRole,
    pub client_id: Option<Uuid>,
    pub guide_id: Option<Uuid>,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}
