use sqlx::PgConnection;
use uuid::Uuid;

use crate::models::{Participant, ParticipantRole};
use crate::utils::errors::AppError;

pub struct ParticipantRepository;

impl ParticipantRepository {
    pub async fn insert(
        conn: &mut PgConnection,
        id: Uuid,
        route_id: Uuid,
        role: ParticipantRole,
        client_id: Option<Uuid>,
        guide_id: Option<Uuid>,
        notes: Option<&str>,
    ) -> Result<Participant, AppError> {
        let participant = sqlx::query_as::<_, Participant>(
            r#"
            INSERT INTO participants (id, route_id, role, client_id, guide_id, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(route_id)
        .bind(role)
        .bind(client_id)
        .bind(guide_id)
        .bind(notes)
        .fetch_one(&mut *conn)
        .await?;

        Ok(participant)
    }

    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Participant>, AppError> {
        let participant = sqlx::query_as::<_, Participant>("SELECT * FROM participants WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(participant)
    }

    pub async fn find_many(
        conn: &mut PgConnection,
        ids: &[Uuid],
    ) -> Result<Vec<Participant>, AppError> {
        let participants =
            sqlx::query_as::<_, Participant>("SELECT * FROM participants WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&mut *conn)
                .await?;

        Ok(participants)
    }

    pub async fn list_by_route(
        conn: &mut PgConnection,
        route_id: Uuid,
    ) -> Result<Vec<Participant>, AppError> {
        let participants = sqlx::query_as::<_, Participant>(
            "SELECT * FROM participants WHERE route_id = $1 ORDER BY role, created_at",
        )
        .bind(route_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(participants)
    }

    /// ¿Ya hay una fila de cliente para este (route, client)?
    pub async fn client_on_route(
        conn: &mut PgConnection,
        route_id: Uuid,
        client_id: Uuid,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM participants
                WHERE route_id = $1 AND client_id = $2 AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(route_id)
        .bind(client_id)
        .bind(exclude_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(result.0)
    }

    pub async fn update(
        conn: &mut PgConnection,
        participant: &Participant,
    ) -> Result<Participant, AppError> {
        let updated = sqlx::query_as::<_, Participant>(
            r#"
            UPDATE participants
            SET role = $2, client_id = $3, guide_id = $4, notes = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(participant.id)
        .bind(participant.role)
        .bind(participant.client_id)
        .bind(participant.guide_id)
        .bind(&participant.notes)
        .fetch_one(&mut *conn)
        .await?;

        Ok(updated)
    }

    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM participants WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}
