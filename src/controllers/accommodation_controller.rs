use sqlx::PgConnection;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{lock_route, CommandContext};
use crate::dto::accommodation_dto::{
    AccommodationDetail, AssignRoomRequest, CreateAccommodationRequest, RoomDetail,
};
use crate::models::{Accommodation, Participant, Room, Segment};
use crate::repositories::{AccommodationRepository, ParticipantRepository, SegmentRepository};
use crate::services::invariant_validator::{
    validate_one_room_per_segment, validate_room_capacity, validate_room_couple,
    validate_room_participant,
};
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

pub struct AccommodationController {
    ctx: CommandContext,
}

/// Segmento releído tras bloquear su ruta
async fn lock_segment(conn: &mut PgConnection, segment_id: Uuid) -> AppResult<Segment> {
    let segment = SegmentRepository::find_by_id(conn, segment_id)
        .await?
        .ok_or_else(|| not_found_error("Segment", &segment_id))?;
    lock_route(conn, segment.route_id).await?;
    SegmentRepository::find_by_id(conn, segment_id)
        .await?
        .ok_or_else(|| not_found_error("Segment", &segment_id))
}

async fn lock_accommodation(
    conn: &mut PgConnection,
    accommodation_id: Uuid,
) -> AppResult<(Segment, Accommodation)> {
    let accommodation = AccommodationRepository::find_by_id(conn, accommodation_id)
        .await?
        .ok_or_else(|| not_found_error("Accommodation", &accommodation_id))?;
    let segment = lock_segment(conn, accommodation.segment_id).await?;
    let accommodation = AccommodationRepository::find_by_id(conn, accommodation_id)
        .await?
        .ok_or_else(|| not_found_error("Accommodation", &accommodation_id))?;
    Ok((segment, accommodation))
}

async fn lock_room(conn: &mut PgConnection, room_id: Uuid) -> AppResult<(Segment, Accommodation, Room)> {
    let room = AccommodationRepository::find_room(conn, room_id)
        .await?
        .ok_or_else(|| not_found_error("Room", &room_id))?;
    let (segment, accommodation) = lock_accommodation(conn, room.accommodation_id).await?;
    let room = AccommodationRepository::find_room(conn, room_id)
        .await?
        .ok_or_else(|| not_found_error("Room", &room_id))?;
    Ok((segment, accommodation, room))
}

/// Participantes pedidos, en el orden de la petición
async fn load_participants(conn: &mut PgConnection, ids: &[Uuid]) -> AppResult<Vec<Participant>> {
    let found = ParticipantRepository::find_many(conn, ids).await?;
    ids.iter()
        .map(|id| {
            found
                .iter()
                .find(|p| p.id == *id)
                .cloned()
                .ok_or_else(|| not_found_error("Participant", id))
        })
        .collect()
}

/// Comprueba grupo, ruta y una habitación por segmento para cada ocupante nuevo
async fn check_occupants(
    conn: &mut PgConnection,
    segment: &Segment,
    accommodation: &Accommodation,
    participants: &[Participant],
    target_room: Option<Uuid>,
) -> AppResult<()> {
    for participant in participants {
        validate_room_participant(participant, segment.route_id, accommodation.group_type)?;
        let existing = AccommodationRepository::room_on_segment(conn, segment.id, participant.id).await?;
        validate_one_room_per_segment(participant.id, existing, target_room)?;
    }
    Ok(())
}

impl AccommodationController {
    pub fn new(ctx: CommandContext) -> Self {
        Self { ctx }
    }

    pub async fn create(
        &self,
        segment_id: Uuid,
        request: CreateAccommodationRequest,
    ) -> AppResult<Accommodation> {
        request.validate()?;
        self.ctx
            .run("create_accommodation", || self.create_once(segment_id, request.clone()))
            .await
    }

    async fn create_once(
        &self,
        segment_id: Uuid,
        request: CreateAccommodationRequest,
    ) -> AppResult<Accommodation> {
        let mut tx = self.ctx.begin().await?;
        let segment = lock_segment(&mut tx, segment_id).await?;

        let id = request.id.unwrap_or_else(Uuid::new_v4);
        if AccommodationRepository::find_by_id(&mut tx, id).await?.is_some() {
            return Err(conflict_error("Accommodation", "id", &id.to_string()));
        }
        if AccommodationRepository::exists_for_key(&mut tx, segment.id, request.hotel_id, request.group_type)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Accommodation for hotel '{}' and group {:?} already exists on segment '{}'",
                request.hotel_id, request.group_type, segment.id
            )));
        }

        let accommodation = AccommodationRepository::insert(
            &mut tx,
            id,
            segment.id,
            request.hotel_id,
            request.group_type,
            request.notes.as_deref(),
        )
        .await?;

        tx.commit().await?;
        info!(
            "🏨 Alojamiento {:?} creado en segmento {} (día {})",
            accommodation.group_type, segment.id, segment.day_number
        );
        Ok(accommodation)
    }

    pub async fn delete(&self, accommodation_id: Uuid) -> AppResult<()> {
        self.ctx
            .run("delete_accommodation", || self.delete_once(accommodation_id))
            .await
    }

    async fn delete_once(&self, accommodation_id: Uuid) -> AppResult<()> {
        let mut tx = self.ctx.begin().await?;
        lock_accommodation(&mut tx, accommodation_id).await?;

        AccommodationRepository::delete(&mut tx, accommodation_id).await?;

        tx.commit().await?;
        info!("🗑️ Alojamiento {} eliminado", accommodation_id);
        Ok(())
    }

    /// Crea una habitación con sus ocupantes iniciales
    pub async fn assign_room(
        &self,
        accommodation_id: Uuid,
        request: AssignRoomRequest,
    ) -> AppResult<RoomDetail> {
        request.validate()?;
        self.ctx
            .run("assign_room", || self.assign_room_once(accommodation_id, request.clone()))
            .await
    }

    async fn assign_room_once(
        &self,
        accommodation_id: Uuid,
        request: AssignRoomRequest,
    ) -> AppResult<RoomDetail> {
        let mut tx = self.ctx.begin().await?;
        let (segment, accommodation) = lock_accommodation(&mut tx, accommodation_id).await?;

        validate_room_couple(request.room_type, request.is_couple)?;
        validate_room_capacity(request.room_type, &[], &request.participant_ids)?;

        let id = request.id.unwrap_or_else(Uuid::new_v4);
        if AccommodationRepository::find_room(&mut tx, id).await?.is_some() {
            return Err(conflict_error("Room", "id", &id.to_string()));
        }

        let participants = load_participants(&mut tx, &request.participant_ids).await?;
        check_occupants(&mut tx, &segment, &accommodation, &participants, None).await?;

        let room = AccommodationRepository::insert_room(
            &mut tx,
            id,
            accommodation.id,
            request.room_type,
            request.is_couple,
        )
        .await?;
        for participant in &participants {
            AccommodationRepository::insert_room_participant(&mut tx, room.id, participant.id).await?;
        }

        tx.commit().await?;
        info!(
            "🛏️ Habitación {:?} asignada en alojamiento {} ({} ocupantes)",
            room.room_type,
            accommodation.id,
            participants.len()
        );
        Ok(RoomDetail {
            room,
            participant_ids: request.participant_ids,
        })
    }

    pub async fn add_room_participant(&self, room_id: Uuid, participant_id: Uuid) -> AppResult<RoomDetail> {
        self.ctx
            .run("add_room_participant", || {
                self.add_room_participant_once(room_id, participant_id)
            })
            .await
    }

    async fn add_room_participant_once(
        &self,
        room_id: Uuid,
        participant_id: Uuid,
    ) -> AppResult<RoomDetail> {
        let mut tx = self.ctx.begin().await?;
        let (segment, accommodation, room) = lock_room(&mut tx, room_id).await?;

        let occupants = AccommodationRepository::room_occupants(&mut tx, room.id).await?;
        validate_room_capacity(room.room_type, &occupants, &[participant_id])?;

        let participants = load_participants(&mut tx, &[participant_id]).await?;
        check_occupants(&mut tx, &segment, &accommodation, &participants, Some(room.id)).await?;

        AccommodationRepository::insert_room_participant(&mut tx, room.id, participant_id).await?;
        let participant_ids = AccommodationRepository::room_occupants(&mut tx, room.id).await?;

        tx.commit().await?;
        info!("🛏️ Participante {} alojado en habitación {}", participant_id, room.id);
        Ok(RoomDetail {
            room,
            participant_ids,
        })
    }

    pub async fn remove_room_participant(&self, room_id: Uuid, participant_id: Uuid) -> AppResult<()> {
        self.ctx
            .run("remove_room_participant", || {
                self.remove_room_participant_once(room_id, participant_id)
            })
            .await
    }

    async fn remove_room_participant_once(&self, room_id: Uuid, participant_id: Uuid) -> AppResult<()> {
        let mut tx = self.ctx.begin().await?;
        lock_room(&mut tx, room_id).await?;

        let removed =
            AccommodationRepository::delete_room_participant(&mut tx, room_id, participant_id).await?;
        if removed == 0 {
            return Err(AppError::NotFound(format!(
                "Participant '{}' is not assigned to room '{}'",
                participant_id, room_id
            )));
        }

        tx.commit().await?;
        info!("🚪 Participante {} retirado de habitación {}", participant_id, room_id);
        Ok(())
    }

    pub async fn delete_room(&self, room_id: Uuid) -> AppResult<()> {
        self.ctx
            .run("delete_room", || self.delete_room_once(room_id))
            .await
    }

    async fn delete_room_once(&self, room_id: Uuid) -> AppResult<()> {
        let mut tx = self.ctx.begin().await?;
        lock_room(&mut tx, room_id).await?;

        AccommodationRepository::delete_room(&mut tx, room_id).await?;

        tx.commit().await?;
        info!("🗑️ Habitación {} eliminada", room_id);
        Ok(())
    }

    /// Alojamientos del segmento con habitaciones y ocupantes
    pub async fn list(&self, segment_id: Uuid) -> AppResult<Vec<AccommodationDetail>> {
        let mut conn = self.ctx.read().await?;
        if SegmentRepository::find_by_id(&mut conn, segment_id).await?.is_none() {
            return Err(not_found_error("Segment", &segment_id));
        }

        let accommodations = AccommodationRepository::list_by_segment(&mut conn, segment_id).await?;
        let mut details = Vec::with_capacity(accommodations.len());
        for accommodation in accommodations {
            let rooms = AccommodationRepository::list_rooms(&mut conn, accommodation.id).await?;
            let mut room_details = Vec::with_capacity(rooms.len());
            for room in rooms {
                let participant_ids = AccommodationRepository::room_occupants(&mut conn, room.id).await?;
                room_details.push(RoomDetail {
                    room,
                    participant_ids,
                });
            }
            details.push(AccommodationDetail {
                accommodation,
                rooms: room_details,
            });
        }

        Ok(details)
    }
}
