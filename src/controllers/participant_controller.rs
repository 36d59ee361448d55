use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{lock_route, CommandContext};
use crate::dto::participant_dto::{CreateParticipantRequest, UpdateParticipantRequest};
use crate::models::Participant;
use crate::repositories::{AccommodationRepository, ParticipantRepository, RouteRepository};
use crate::services::invariant_validator::{validate_participant_identity, Rule, Violation};
use crate::utils::errors::{conflict_error, not_found_error, AppResult};

pub struct ParticipantController {
    ctx: CommandContext,
}

impl ParticipantController {
    pub fn new(ctx: CommandContext) -> Self {
        Self { ctx }
    }

    pub async fn add(&self, route_id: Uuid, request: CreateParticipantRequest) -> AppResult<Participant> {
        request.validate()?;
        self.ctx
            .run("add_participant", || self.add_once(route_id, request.clone()))
            .await
    }

    async fn add_once(
        &self,
        route_id: Uuid,
        request: CreateParticipantRequest,
    ) -> AppResult<Participant> {
        let mut tx = self.ctx.begin().await?;
        lock_route(&mut tx, route_id).await?;

        validate_participant_identity(request.role, request.client_id, request.guide_id)?;

        let id = request.id.unwrap_or_else(Uuid::new_v4);
        if ParticipantRepository::find_by_id(&mut tx, id).await?.is_some() {
            return Err(conflict_error("Participant", "id", &id.to_string()));
        }
        if let Some(client_id) = request.client_id {
            if ParticipantRepository::client_on_route(&mut tx, route_id, client_id, None).await? {
                return Err(conflict_error("Participant", "client_id", &client_id.to_string()));
            }
        }

        let participant = ParticipantRepository::insert(
            &mut tx,
            id,
            route_id,
            request.role,
            request.client_id,
            request.guide_id,
            request.notes.as_deref(),
        )
        .await?;

        tx.commit().await?;
        info!("🧍 Participante {:?} añadido a ruta {}", participant.role, route_id);
        Ok(participant)
    }

    /// Cambia rol e identidad; no puede dejar al participante en un alojamiento de otro grupo
    pub async fn update(
        &self,
        participant_id: Uuid,
        request: UpdateParticipantRequest,
    ) -> AppResult<Participant> {
        request.validate()?;
        self.ctx
            .run("update_participant", || self.update_once(participant_id, request.clone()))
            .await
    }

    async fn update_once(
        &self,
        participant_id: Uuid,
        request: UpdateParticipantRequest,
    ) -> AppResult<Participant> {
        let mut tx = self.ctx.begin().await?;
        let mut participant = self.lock_participant(&mut tx, participant_id).await?;

        validate_participant_identity(request.role, request.client_id, request.guide_id)?;
        if let Some(client_id) = request.client_id {
            if ParticipantRepository::client_on_route(
                &mut tx,
                participant.route_id,
                client_id,
                Some(participant_id),
            )
            .await?
            {
                return Err(conflict_error("Participant", "client_id", &client_id.to_string()));
            }
        }
        for group in AccommodationRepository::group_types_for_participant(&mut tx, participant_id).await? {
            if !group.admits(request.role) {
                return Err(Violation::new(
                    Rule::RoomGroup,
                    "role",
                    format!(
                        "participant {} occupies a {:?} room and cannot take role {:?}",
                        participant_id, group, request.role
                    ),
                )
                .into());
            }
        }

        participant.role = request.role;
        participant.client_id = request.client_id;
        participant.guide_id = request.guide_id;
        if request.notes.is_some() {
            participant.notes = request.notes;
        }
        let updated = ParticipantRepository::update(&mut tx, &participant).await?;

        tx.commit().await?;
        info!("✏️ Participante {} actualizado: {:?}", participant_id, updated.role);
        Ok(updated)
    }

    /// Quita al participante de la ruta junto con sus asignaciones de habitación
    pub async fn remove(&self, participant_id: Uuid) -> AppResult<()> {
        self.ctx
            .run("remove_participant", || self.remove_once(participant_id))
            .await
    }

    async fn remove_once(&self, participant_id: Uuid) -> AppResult<()> {
        let mut tx = self.ctx.begin().await?;
        let participant = self.lock_participant(&mut tx, participant_id).await?;

        ParticipantRepository::delete(&mut tx, participant_id).await?;

        tx.commit().await?;
        info!("🗑️ Participante {} eliminado de ruta {}", participant_id, participant.route_id);
        Ok(())
    }

    pub async fn list(&self, route_id: Uuid) -> AppResult<Vec<Participant>> {
        let mut conn = self.ctx.read().await?;
        if RouteRepository::find_by_id(&mut conn, route_id).await?.is_none() {
            return Err(not_found_error("Route", &route_id));
        }
        ParticipantRepository::list_by_route(&mut conn, route_id).await
    }

    async fn lock_participant(
        &self,
        conn: &mut sqlx::PgConnection,
        participant_id: Uuid,
    ) -> AppResult<Participant> {
        let participant = ParticipantRepository::find_by_id(conn, participant_id)
            .await?
            .ok_or_else(|| not_found_error("Participant", &participant_id))?;
        lock_route(conn, participant.route_id).await?;
        ParticipantRepository::find_by_id(conn, participant_id)
            .await?
            .ok_or_else(|| not_found_error("Participant", &participant_id))
    }
}
