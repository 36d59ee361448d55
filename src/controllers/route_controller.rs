use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{lock_route, CommandContext};
use crate::dto::route_dto::{
    CreateRouteRequest, RouteDetail, RouteFilters, UpdateRouteRequest, UpdateStartDateRequest,
    UpdateStatusRequest,
};
use crate::models::{Route, RouteStatus, DEFAULT_CURRENCY};
use crate::repositories::{RouteRepository, SegmentRepository};
use crate::services::aggregate_engine;
use crate::services::invariant_validator::{
    validate_route_start_date, validate_route_transition, validate_start_date_range, Rule, Violation,
};
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

pub struct RouteController {
    ctx: CommandContext,
}

impl RouteController {
    pub fn new(ctx: CommandContext) -> Self {
        Self { ctx }
    }

    /// Crea una ruta en draft, sin fecha de inicio
    pub async fn create(&self, request: CreateRouteRequest) -> AppResult<Route> {
        request.validate()?;
        self.ctx
            .run("create_route", || self.create_once(request.clone()))
            .await
    }

    async fn create_once(&self, request: CreateRouteRequest) -> AppResult<Route> {
        let mut tx = self.ctx.begin().await?;

        let id = request.id.unwrap_or_else(Uuid::new_v4);
        if RouteRepository::find_by_id(&mut tx, id).await?.is_some() {
            return Err(conflict_error("Route", "id", &id.to_string()));
        }

        let route = RouteRepository::insert(
            &mut tx,
            id,
            request.name.trim(),
            request.description.as_deref(),
            request.currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
        )
        .await?;

        tx.commit().await?;
        info!("🗺️ Ruta {} creada: '{}'", route.id, route.name);
        Ok(route)
    }

    /// Cambia la fecha de inicio y recalcula fechas, duración y fin
    pub async fn update_start_date(
        &self,
        route_id: Uuid,
        request: UpdateStartDateRequest,
    ) -> AppResult<Route> {
        request.validate()?;
        self.ctx
            .run("update_route_start_date", || {
                self.update_start_date_once(route_id, request.clone())
            })
            .await
    }

    async fn update_start_date_once(
        &self,
        route_id: Uuid,
        request: UpdateStartDateRequest,
    ) -> AppResult<Route> {
        let mut tx = self.ctx.begin().await?;
        let route = lock_route(&mut tx, route_id).await?;

        if route.status.is_terminal() {
            return Err(Violation::new(
                Rule::RouteStartDate,
                "start_date",
                format!("the start date of a {} route cannot change", route.status),
            )
            .into());
        }
        validate_route_start_date(route.status, request.start_date)?;
        if let Some(start_date) = request.start_date {
            validate_start_date_range(start_date)?;
        }

        RouteRepository::set_start_date(&mut tx, route_id, request.start_date).await?;
        let route = aggregate_engine::recompute_route(&mut tx, route_id).await?;

        tx.commit().await?;
        info!(
            "📅 Ruta {}: inicio {:?}, fin {:?}, duración {:?}",
            route.id, route.start_date, route.end_date, route.duration_days
        );
        Ok(route)
    }

    /// Transición de estado; pedir el estado actual no cambia nada
    pub async fn update_status(&self, route_id: Uuid, request: UpdateStatusRequest) -> AppResult<Route> {
        request.validate()?;
        self.ctx
            .run("update_route_status", || self.update_status_once(route_id, request.status))
            .await
    }

    async fn update_status_once(
        &self,
        route_id: Uuid,
        status: RouteStatus,
    ) -> AppResult<Route> {
        let mut tx = self.ctx.begin().await?;
        let route = lock_route(&mut tx, route_id).await?;

        if route.status == status {
            return Ok(route);
        }
        validate_route_transition(route.status, status, route.start_date)?;

        let updated = RouteRepository::set_status(&mut tx, route_id, status).await?;

        tx.commit().await?;
        info!("🔀 Ruta {}: {} → {}", route_id, route.status, updated.status);
        Ok(updated)
    }

    /// Datos no derivados: nombre, descripción, moneda y coste real
    pub async fn update(&self, route_id: Uuid, request: UpdateRouteRequest) -> AppResult<Route> {
        request.validate()?;
        self.ctx
            .run("update_route", || self.update_once(route_id, request.clone()))
            .await
    }

    async fn update_once(&self, route_id: Uuid, request: UpdateRouteRequest) -> AppResult<Route> {
        let mut tx = self.ctx.begin().await?;
        let route = lock_route(&mut tx, route_id).await?;

        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .unwrap_or(&route.name);
        let description = request.description.as_deref().or(route.description.as_deref());
        let currency = request.currency.as_deref().unwrap_or(&route.currency);
        let actual_cost = request.actual_cost.unwrap_or(route.actual_cost);

        let updated =
            RouteRepository::update_details(&mut tx, route_id, name, description, currency, actual_cost)
                .await?;

        tx.commit().await?;
        info!("✏️ Ruta {} actualizada", route_id);
        Ok(updated)
    }

    /// Borra la ruta y sus hijos; prohibido si el libro la referencia
    pub async fn delete(&self, route_id: Uuid) -> AppResult<()> {
        self.ctx
            .run("delete_route", || self.delete_once(route_id))
            .await
    }

    async fn delete_once(&self, route_id: Uuid) -> AppResult<()> {
        let mut tx = self.ctx.begin().await?;
        lock_route(&mut tx, route_id).await?;

        if RouteRepository::has_transactions(&mut tx, route_id).await? {
            return Err(AppError::Conflict(format!(
                "Route '{}' has ledger transactions and cannot be deleted",
                route_id
            )));
        }
        RouteRepository::delete(&mut tx, route_id).await?;

        tx.commit().await?;
        info!("🗑️ Ruta {} eliminada", route_id);
        Ok(())
    }

    /// Vuelve a ejecutar todos los pasos de recálculo
    pub async fn recompute(&self, route_id: Uuid) -> AppResult<Route> {
        self.ctx
            .run("recompute_route", || self.recompute_once(route_id))
            .await
    }

    async fn recompute_once(&self, route_id: Uuid) -> AppResult<Route> {
        let mut tx = self.ctx.begin().await?;
        lock_route(&mut tx, route_id).await?;

        let route = aggregate_engine::recompute_route(&mut tx, route_id).await?;

        tx.commit().await?;
        info!(
            "🔄 Ruta {} recalculada: distancia {}, coste estimado {}",
            route.id, route.total_distance, route.estimated_cost
        );
        Ok(route)
    }

    pub async fn get(&self, route_id: Uuid) -> AppResult<RouteDetail> {
        let mut conn = self.ctx.read().await?;
        let route = RouteRepository::find_by_id(&mut conn, route_id)
            .await?
            .ok_or_else(|| not_found_error("Route", &route_id))?;
        let segments = SegmentRepository::list_by_route(&mut conn, route_id).await?;

        Ok(RouteDetail { route, segments })
    }

    pub async fn list(&self, filters: RouteFilters) -> AppResult<Vec<Route>> {
        let mut conn = self.ctx.read().await?;
        RouteRepository::list(&mut conn, filters.status).await
    }
}
