use sqlx::PgConnection;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{lock_route, CommandContext};
use crate::dto::logistics_dto::{CreateLogisticsRequest, UpdateLogisticsRequest};
use crate::models::{LogisticsEntity, LogisticsItem, NewLogisticsItem};
use crate::repositories::{LogisticsRepository, RouteRepository, SegmentRepository};
use crate::services::aggregate_engine;
use crate::services::invariant_validator::{
    validate_logistics_amounts, validate_logistics_entity_type, validate_segment_ownership,
};
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

pub struct LogisticsController {
    ctx: CommandContext,
}

/// La referencia polimórfica debe existir en la tabla de su variante
async fn ensure_entity_exists(conn: &mut PgConnection, entity: &LogisticsEntity) -> AppResult<()> {
    if LogisticsRepository::entity_exists(conn, entity).await? {
        return Ok(());
    }
    Err(AppError::NotFound(format!(
        "{:?} with id '{}' not found",
        entity.entity_type(),
        entity.id()
    )))
}

async fn ensure_segment_on_route(
    conn: &mut PgConnection,
    segment_id: Option<Uuid>,
    route_id: Uuid,
) -> AppResult<()> {
    if let Some(segment_id) = segment_id {
        let segment = SegmentRepository::find_by_id(conn, segment_id)
            .await?
            .ok_or_else(|| not_found_error("Segment", &segment_id))?;
        validate_segment_ownership(segment.route_id, route_id)?;
    }
    Ok(())
}

impl LogisticsController {
    pub fn new(ctx: CommandContext) -> Self {
        Self { ctx }
    }

    pub async fn add(&self, route_id: Uuid, request: CreateLogisticsRequest) -> AppResult<LogisticsItem> {
        request.validate()?;
        self.ctx
            .run("add_logistics_item", || self.add_once(route_id, request.clone()))
            .await
    }

    async fn add_once(
        &self,
        route_id: Uuid,
        request: CreateLogisticsRequest,
    ) -> AppResult<LogisticsItem> {
        let mut tx = self.ctx.begin().await?;
        lock_route(&mut tx, route_id).await?;

        let quantity = request.quantity.unwrap_or(1);
        validate_logistics_amounts(quantity, request.cost)?;
        validate_logistics_entity_type(request.logistics_type, request.entity_type)?;

        let id = request.id.unwrap_or_else(Uuid::new_v4);
        if LogisticsRepository::find_by_id(&mut tx, id).await?.is_some() {
            return Err(conflict_error("Logistics item", "id", &id.to_string()));
        }

        let entity = LogisticsEntity::new(request.entity_type, request.entity_id);
        ensure_entity_exists(&mut tx, &entity).await?;
        ensure_segment_on_route(&mut tx, request.segment_id, route_id).await?;

        let item = LogisticsRepository::insert(
            &mut tx,
            &NewLogisticsItem {
                id,
                route_id,
                segment_id: request.segment_id,
                logistics_type: request.logistics_type,
                entity,
                quantity,
                cost: request.cost,
                description: request.description,
            },
        )
        .await?;
        let estimated_cost = aggregate_engine::recompute_estimated_cost(&mut tx, route_id).await?;

        tx.commit().await?;
        info!(
            "🚐 Partida {:?} añadida a ruta {} (coste estimado {})",
            item.logistics_type, route_id, estimated_cost
        );
        Ok(item)
    }

    pub async fn update(&self, item_id: Uuid, request: UpdateLogisticsRequest) -> AppResult<LogisticsItem> {
        request.validate()?;
        self.ctx
            .run("update_logistics_item", || self.update_once(item_id, request.clone()))
            .await
    }

    async fn update_once(
        &self,
        item_id: Uuid,
        request: UpdateLogisticsRequest,
    ) -> AppResult<LogisticsItem> {
        let mut tx = self.ctx.begin().await?;
        let mut item = self.lock_item(&mut tx, item_id).await?;

        let previous_entity = item.entity();
        if let Some(segment_id) = request.segment_id {
            item.segment_id = segment_id;
        }
        if let Some(logistics_type) = request.logistics_type {
            item.logistics_type = logistics_type;
        }
        if let Some(entity_type) = request.entity_type {
            item.entity_type = entity_type;
        }
        if let Some(entity_id) = request.entity_id {
            item.entity_id = entity_id;
        }
        if let Some(quantity) = request.quantity {
            item.quantity = quantity;
        }
        if let Some(cost) = request.cost {
            item.cost = cost;
        }
        if request.description.is_some() {
            item.description = request.description;
        }

        validate_logistics_amounts(item.quantity, item.cost)?;
        validate_logistics_entity_type(item.logistics_type, item.entity_type)?;
        let entity = item.entity();
        if entity != previous_entity {
            ensure_entity_exists(&mut tx, &entity).await?;
        }
        if let Some(Some(segment_id)) = request.segment_id {
            ensure_segment_on_route(&mut tx, Some(segment_id), item.route_id).await?;
        }

        let updated = LogisticsRepository::update(&mut tx, &item).await?;
        let estimated_cost =
            aggregate_engine::recompute_estimated_cost(&mut tx, updated.route_id).await?;

        tx.commit().await?;
        info!(
            "✏️ Partida {} actualizada (ruta {}, coste estimado {})",
            item_id, updated.route_id, estimated_cost
        );
        Ok(updated)
    }

    pub async fn delete(&self, item_id: Uuid) -> AppResult<()> {
        self.ctx
            .run("delete_logistics_item", || self.delete_once(item_id))
            .await
    }

    async fn delete_once(&self, item_id: Uuid) -> AppResult<()> {
        let mut tx = self.ctx.begin().await?;
        let item = self.lock_item(&mut tx, item_id).await?;

        LogisticsRepository::delete(&mut tx, item_id).await?;
        let estimated_cost = aggregate_engine::recompute_estimated_cost(&mut tx, item.route_id).await?;

        tx.commit().await?;
        info!(
            "🗑️ Partida {} eliminada (ruta {}, coste estimado {})",
            item_id, item.route_id, estimated_cost
        );
        Ok(())
    }

    pub async fn list(&self, route_id: Uuid) -> AppResult<Vec<LogisticsItem>> {
        let mut conn = self.ctx.read().await?;
        if RouteRepository::find_by_id(&mut conn, route_id).await?.is_none() {
            return Err(not_found_error("Route", &route_id));
        }
        LogisticsRepository::list_by_route(&mut conn, route_id).await
    }

    /// Bloquea la ruta de la partida y relee la partida
    async fn lock_item(&self, conn: &mut PgConnection, item_id: Uuid) -> AppResult<LogisticsItem> {
        let item = LogisticsRepository::find_by_id(conn, item_id)
            .await?
            .ok_or_else(|| not_found_error("Logistics item", &item_id))?;
        lock_route(conn, item.route_id).await?;
        LogisticsRepository::find_by_id(conn, item_id)
            .await?
            .ok_or_else(|| not_found_error("Logistics item", &item_id))
    }
}
