use sqlx::PgConnection;
use uuid::Uuid;

use crate::models::{Accommodation, GroupType, Room, RoomParticipant, RoomType};
use crate::utils::errors::AppError;

pub struct AccommodationRepository;

impl AccommodationRepository {
    pub async fn insert(
        conn: &mut PgConnection,
        id: Uuid,
        segment_id: Uuid,
        hotel_id: Uuid,
        group_type: GroupType,
        notes: Option<&str>,
    ) -> Result<Accommodation, AppError> {
        let accommodation = sqlx::query_as::<_, Accommodation>(
            r#"
            INSERT INTO accommodations (id, segment_id, hotel_id, group_type, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(segment_id)
        .bind(hotel_id)
        .bind(group_type)
        .bind(notes)
        .fetch_one(&mut *conn)
        .await?;

        Ok(accommodation)
    }

    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Accommodation>, AppError> {
        let accommodation =
            sqlx::query_as::<_, Accommodation>("SELECT * FROM accommodations WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

        Ok(accommodation)
    }

    pub async fn exists_for_key(
        conn: &mut PgConnection,
        segment_id: Uuid,
        hotel_id: Uuid,
        group_type: GroupType,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM accommodations
                WHERE segment_id = $1 AND hotel_id = $2 AND group_type = $3
            )
            "#,
        )
        .bind(segment_id)
        .bind(hotel_id)
        .bind(group_type)
        .fetch_one(&mut *conn)
        .await?;

        Ok(result.0)
    }

    pub async fn list_by_segment(
        conn: &mut PgConnection,
        segment_id: Uuid,
    ) -> Result<Vec<Accommodation>, AppError> {
        let accommodations = sqlx::query_as::<_, Accommodation>(
            "SELECT * FROM accommodations WHERE segment_id = $1 ORDER BY group_type, created_at",
        )
        .bind(segment_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(accommodations)
    }

    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM accommodations WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn insert_room(
        conn: &mut PgConnection,
        id: Uuid,
        accommodation_id: Uuid,
        room_type: RoomType,
        is_couple: bool,
    ) -> Result<Room, AppError> {
        let room = sqlx::query_as::<_, Room>(
            r#"
            INSERT INTO rooms (id, accommodation_id, room_type, is_couple)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(accommodation_id)
        .bind(room_type)
        .bind(is_couple)
        .fetch_one(&mut *conn)
        .await?;

        Ok(room)
    }

    pub async fn find_room(conn: &mut PgConnection, id: Uuid) -> Result<Option<Room>, AppError> {
        let room = sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(room)
    }

    pub async fn list_rooms(
        conn: &mut PgConnection,
        accommodation_id: Uuid,
    ) -> Result<Vec<Room>, AppError> {
        let rooms = sqlx::query_as::<_, Room>(
            "SELECT * FROM rooms WHERE accommodation_id = $1 ORDER BY created_at, id",
        )
        .bind(accommodation_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rooms)
    }

    pub async fn delete_room(conn: &mut PgConnection, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn room_occupants(conn: &mut PgConnection, room_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let occupants: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT participant_id FROM room_participants WHERE room_id = $1 ORDER BY created_at",
        )
        .bind(room_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(occupants.into_iter().map(|(id,)| id).collect())
    }

    /// Habitación del mismo segmento donde el participante ya está alojado
    pub async fn room_on_segment(
        conn: &mut PgConnection,
        segment_id: Uuid,
        participant_id: Uuid,
    ) -> Result<Option<Uuid>, AppError> {
        let room: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT rp.room_id
            FROM room_participants rp
            JOIN rooms r ON r.id = rp.room_id
            JOIN accommodations a ON a.id = r.accommodation_id
            WHERE a.segment_id = $1 AND rp.participant_id = $2
            LIMIT 1
            "#,
        )
        .bind(segment_id)
        .bind(participant_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(room.map(|(id,)| id))
    }

    /// Grupos de alojamiento donde el participante ocupa alguna habitación
    pub async fn group_types_for_participant(
        conn: &mut PgConnection,
        participant_id: Uuid,
    ) -> Result<Vec<GroupType>, AppError> {
        let groups: Vec<(GroupType,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT a.group_type
            FROM room_participants rp
            JOIN rooms r ON r.id = rp.room_id
            JOIN accommodations a ON a.id = r.accommodation_id
            WHERE rp.participant_id = $1
            "#,
        )
        .bind(participant_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(groups.into_iter().map(|(group,)| group).collect())
    }

    pub async fn insert_room_participant(
        conn: &mut PgConnection,
        room_id: Uuid,
        participant_id: Uuid,
    ) -> Result<RoomParticipant, AppError> {
        let link = sqlx::query_as::<_, RoomParticipant>(
            r#"
            INSERT INTO room_participants (room_id, participant_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(room_id)
        .bind(participant_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(link)
    }

    pub async fn delete_room_participant(
        conn: &mut PgConnection,
        room_id: Uuid,
        participant_id: Uuid,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "DELETE FROM room_participants WHERE room_id = $1 AND participant_id = $2",
        )
        .bind(room_id)
        .bind(participant_id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }
}
