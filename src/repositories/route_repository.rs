use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::models::{Route, RouteStatus};
use crate::utils::errors::AppError;

pub struct RouteRepository;

impl RouteRepository {
    pub async fn insert(
        conn: &mut PgConnection,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        currency: &str,
    ) -> Result<Route, AppError> {
        let route = sqlx::query_as::<_, Route>(
            r#"
            INSERT INTO routes (id, name, description, status, currency)
            VALUES ($1, $2, $3, 'draft', $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(currency)
        .fetch_one(&mut *conn)
        .await?;

        Ok(route)
    }

    pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Route>, AppError> {
        let route = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(route)
    }

    /// Bloquea la fila de la ruta hasta el fin de la transacción.
    /// Serializa los comandos concurrentes sobre la misma ruta.
    pub async fn lock(conn: &mut PgConnection, id: Uuid) -> Result<Option<Route>, AppError> {
        let route = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(route)
    }

    /// Bloqueo compartido: impide cambios en la ruta mientras se lee su estado
    pub async fn lock_shared(conn: &mut PgConnection, id: Uuid) -> Result<Option<Route>, AppError> {
        let route = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1 FOR SHARE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(route)
    }

    pub async fn list(
        conn: &mut PgConnection,
        status: Option<RouteStatus>,
    ) -> Result<Vec<Route>, AppError> {
        let routes = sqlx::query_as::<_, Route>(
            r#"
            SELECT * FROM routes
            WHERE ($1::route_status IS NULL OR status = $1)
            ORDER BY start_date NULLS LAST, created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&mut *conn)
        .await?;

        Ok(routes)
    }

    pub async fn update_details(
        conn: &mut PgConnection,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        currency: &str,
        actual_cost: Decimal,
    ) -> Result<Route, AppError> {
        let route = sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes
            SET name = $2, description = $3, currency = $4, actual_cost = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(currency)
        .bind(actual_cost)
        .fetch_one(&mut *conn)
        .await?;

        Ok(route)
    }

    pub async fn set_start_date(
        conn: &mut PgConnection,
        id: Uuid,
        start_date: Option<NaiveDate>,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE routes SET start_date = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(start_date)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    pub async fn set_status(
        conn: &mut PgConnection,
        id: Uuid,
        status: RouteStatus,
    ) -> Result<Route, AppError> {
        let route = sqlx::query_as::<_, Route>(
            "UPDATE routes SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(&mut *conn)
        .await?;

        Ok(route)
    }

    pub async fn update_total_distance(
        conn: &mut PgConnection,
        id: Uuid,
        total_distance: Decimal,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE routes SET total_distance = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(total_distance)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    pub async fn update_dates(
        conn: &mut PgConnection,
        id: Uuid,
        duration_days: Option<i32>,
        end_date: Option<NaiveDate>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE routes SET duration_days = $2, end_date = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(duration_days)
        .bind(end_date)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    pub async fn update_estimated_cost(
        conn: &mut PgConnection,
        id: Uuid,
        estimated_cost: Decimal,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE routes SET estimated_cost = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(estimated_cost)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    pub async fn has_transactions(conn: &mut PgConnection, id: Uuid) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM transactions WHERE route_id = $1)")
                .bind(id)
                .fetch_one(&mut *conn)
                .await?;

        Ok(result.0)
    }

    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM routes WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}
