use chrono::NaiveDate;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::models::{NewSegment, Segment};
use crate::utils::errors::AppError;

pub struct SegmentRepository;

impl SegmentRepository {
    pub async fn insert(conn: &mut PgConnection, segment: &NewSegment) -> Result<Segment, AppError> {
        let created = sqlx::query_as::<_, Segment>(
            r#"
            INSERT INTO segments (
                id, route_id, day_number, segment_date, origin_location_id,
                destination_location_id, overnight_location_id, distance, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(segment.id)
        .bind(segment.route_id)
        .bind(segment.day_number)
        .bind(segment.segment_date)
        .bind(segment.origin_location_id)
        .bind(segment.destination_location_id)
        .bind(segment.overnight_location_id)
        .bind(segment.distance)
        .bind(&segment.notes)
        .fetch_one(&mut *conn)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Segment>, AppError> {
        let segment = sqlx::query_as::<_, Segment>("SELECT * FROM segments WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(segment)
    }

    /// Segmentos de la ruta en orden de día
    pub async fn list_by_route(conn: &mut PgConnection, route_id: Uuid) -> Result<Vec<Segment>, AppError> {
        let segments = sqlx::query_as::<_, Segment>(
            "SELECT * FROM segments WHERE route_id = $1 ORDER BY day_number, id",
        )
        .bind(route_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(segments)
    }

    pub async fn day_number_taken(
        conn: &mut PgConnection,
        route_id: Uuid,
        day_number: i32,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM segments
                WHERE route_id = $1 AND day_number = $2 AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(route_id)
        .bind(day_number)
        .bind(exclude_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(result.0)
    }

    pub async fn update(conn: &mut PgConnection, segment: &Segment) -> Result<Segment, AppError> {
        let updated = sqlx::query_as::<_, Segment>(
            r#"
            UPDATE segments
            SET day_number = $2, segment_date = $3, origin_location_id = $4,
                destination_location_id = $5, overnight_location_id = $6,
                distance = $7, notes = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(segment.id)
        .bind(segment.day_number)
        .bind(segment.segment_date)
        .bind(segment.origin_location_id)
        .bind(segment.destination_location_id)
        .bind(segment.overnight_location_id)
        .bind(segment.distance)
        .bind(&segment.notes)
        .fetch_one(&mut *conn)
        .await?;

        Ok(updated)
    }

    /// Solo escribe si la fecha cambia; devuelve si hubo cambio
    pub async fn set_date(
        conn: &mut PgConnection,
        id: Uuid,
        segment_date: Option<NaiveDate>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE segments SET segment_date = $2, updated_at = NOW()
            WHERE id = $1 AND segment_date IS DISTINCT FROM $2
            "#,
        )
        .bind(id)
        .bind(segment_date)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_order_index(
        conn: &mut PgConnection,
        id: Uuid,
        order_index: i32,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE segments SET order_index = $2 WHERE id = $1 AND order_index <> $2",
        )
        .bind(id)
        .bind(order_index)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM segments WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}
