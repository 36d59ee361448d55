use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::models::{LogisticsEntity, LogisticsItem, LogisticsType, NewLogisticsItem};
use crate::utils::errors::AppError;

pub struct LogisticsRepository;

impl LogisticsRepository {
    pub async fn insert(
        conn: &mut PgConnection,
        item: &NewLogisticsItem,
    ) -> Result<LogisticsItem, AppError> {
        let created = sqlx::query_as::<_, LogisticsItem>(
            r#"
            INSERT INTO logistics_items (
                id, route_id, segment_id, logistics_type, entity_type, entity_id,
                quantity, cost, description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(item.id)
        .bind(item.route_id)
        .bind(item.segment_id)
        .bind(item.logistics_type)
        .bind(item.entity.entity_type())
        .bind(item.entity.id())
        .bind(item.quantity)
        .bind(item.cost)
        .bind(&item.description)
        .fetch_one(&mut *conn)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<LogisticsItem>, AppError> {
        let item = sqlx::query_as::<_, LogisticsItem>("SELECT * FROM logistics_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(item)
    }

    pub async fn list_by_route(
        conn: &mut PgConnection,
        route_id: Uuid,
    ) -> Result<Vec<LogisticsItem>, AppError> {
        let items = sqlx::query_as::<_, LogisticsItem>(
            r#"
            SELECT l.* FROM logistics_items l
            LEFT JOIN segments s ON s.id = l.segment_id
            WHERE l.route_id = $1
            ORDER BY s.day_number NULLS FIRST, l.created_at
            "#,
        )
        .bind(route_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(items)
    }

    /// Líneas de coste de la ruta: (tipo, coste, cantidad)
    pub async fn cost_lines(
        conn: &mut PgConnection,
        route_id: Uuid,
    ) -> Result<Vec<(LogisticsType, Decimal, i32)>, AppError> {
        let lines = sqlx::query_as::<_, (LogisticsType, Decimal, i32)>(
            "SELECT logistics_type, cost, quantity FROM logistics_items WHERE route_id = $1",
        )
        .bind(route_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(lines)
    }

    /// Comprueba la referencia polimórfica contra la tabla de su variante
    pub async fn entity_exists(
        conn: &mut PgConnection,
        entity: &LogisticsEntity,
    ) -> Result<bool, AppError> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", entity.table());
        let result: (bool,) = sqlx::query_as(&sql)
            .bind(entity.id())
            .fetch_one(&mut *conn)
            .await?;

        Ok(result.0)
    }

    pub async fn update(
        conn: &mut PgConnection,
        item: &LogisticsItem,
    ) -> Result<LogisticsItem, AppError> {
        let updated = sqlx::query_as::<_, LogisticsItem>(
            r#"
            UPDATE logistics_items
            SET segment_id = $2, logistics_type = $3, entity_type = $4, entity_id = $5,
                quantity = $6, cost = $7, description = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(item.id)
        .bind(item.segment_id)
        .bind(item.logistics_type)
        .bind(item.entity_type)
        .bind(item.entity_id)
        .bind(item.quantity)
        .bind(item.cost)
        .bind(&item.description)
        .fetch_one(&mut *conn)
        .await?;

        Ok(updated)
    }

    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM logistics_items WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}
