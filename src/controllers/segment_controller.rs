use sqlx::PgConnection;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{lock_route, CommandContext};
use crate::dto::segment_dto::{CreateSegmentRequest, UpdateSegmentRequest};
use crate::models::{NewSegment, Route, Segment};
use crate::repositories::{RouteRepository, SegmentRepository};
use crate::services::aggregate_engine;
use crate::services::invariant_validator::{
    validate_day_number, validate_explicit_segment_date, validate_segment_distance,
};
use crate::utils::errors::{conflict_error, consistency_error, not_found_error, AppResult};

pub struct SegmentController {
    ctx: CommandContext,
}

/// Ruta bloqueada y segmento releído después del bloqueo
async fn lock_segment_scope(conn: &mut PgConnection, segment_id: Uuid) -> AppResult<(Route, Segment)> {
    let segment = SegmentRepository::find_by_id(conn, segment_id)
        .await?
        .ok_or_else(|| not_found_error("Segment", &segment_id))?;
    let route = lock_route(conn, segment.route_id).await?;
    let segment = SegmentRepository::find_by_id(conn, segment_id)
        .await?
        .ok_or_else(|| not_found_error("Segment", &segment_id))?;

    Ok((route, segment))
}

async fn reload(conn: &mut PgConnection, route_id: Uuid, segment_id: Uuid) -> AppResult<Segment> {
    SegmentRepository::find_by_id(conn, segment_id)
        .await?
        .ok_or_else(|| consistency_error(&route_id, "segment vanished during recomputation"))
}

impl SegmentController {
    pub fn new(ctx: CommandContext) -> Self {
        Self { ctx }
    }

    pub async fn add(&self, route_id: Uuid, request: CreateSegmentRequest) -> AppResult<Segment> {
        request.validate()?;
        self.ctx
            .run("add_segment", || self.add_once(route_id, request.clone()))
            .await
    }

    async fn add_once(&self, route_id: Uuid, request: CreateSegmentRequest) -> AppResult<Segment> {
        let mut tx = self.ctx.begin().await?;
        let route = lock_route(&mut tx, route_id).await?;

        validate_day_number(request.day_number)?;
        validate_segment_distance(request.distance)?;

        let id = request.id.unwrap_or_else(Uuid::new_v4);
        if SegmentRepository::find_by_id(&mut tx, id).await?.is_some() {
            return Err(conflict_error("Segment", "id", &id.to_string()));
        }
        if SegmentRepository::day_number_taken(&mut tx, route_id, request.day_number, None).await? {
            return Err(conflict_error(
                "Segment",
                "day_number",
                &request.day_number.to_string(),
            ));
        }

        let new_segment = NewSegment {
            id,
            route_id,
            day_number: request.day_number,
            segment_date: aggregate_engine::initial_segment_date(&route, request.day_number),
            origin_location_id: request.origin_location_id,
            destination_location_id: request.destination_location_id,
            overnight_location_id: request.overnight_location_id,
            distance: request.distance,
            notes: request.notes,
        };
        SegmentRepository::insert(&mut tx, &new_segment).await?;

        let route = aggregate_engine::recompute_route(&mut tx, route_id).await?;
        let segment = reload(&mut tx, route_id, id).await?;

        tx.commit().await?;
        info!(
            "➕ Segmento día {} añadido a ruta {} (distancia total {}, duración {:?})",
            segment.day_number, route_id, route.total_distance, route.duration_days
        );
        Ok(segment)
    }

    /// Edita un segmento; la fecha explícita solo se acepta fuera de draft
    pub async fn update(&self, segment_id: Uuid, request: UpdateSegmentRequest) -> AppResult<Segment> {
        request.validate()?;
        self.ctx
            .run("update_segment", || self.update_once(segment_id, request.clone()))
            .await
    }

    async fn update_once(&self, segment_id: Uuid, request: UpdateSegmentRequest) -> AppResult<Segment> {
        let mut tx = self.ctx.begin().await?;
        let (route, mut segment) = lock_segment_scope(&mut tx, segment_id).await?;

        if let Some(day_number) = request.day_number {
            validate_day_number(day_number)?;
            if SegmentRepository::day_number_taken(&mut tx, route.id, day_number, Some(segment_id))
                .await?
            {
                return Err(conflict_error("Segment", "day_number", &day_number.to_string()));
            }
            segment.day_number = day_number;
        }
        if let Some(distance) = request.distance {
            validate_segment_distance(distance)?;
            segment.distance = distance;
        }
        if let Some(segment_date) = request.segment_date {
            validate_explicit_segment_date(route.status)?;
            segment.segment_date = Some(segment_date);
        }
        if request.origin_location_id.is_some() {
            segment.origin_location_id = request.origin_location_id;
        }
        if request.destination_location_id.is_some() {
            segment.destination_location_id = request.destination_location_id;
        }
        if request.overnight_location_id.is_some() {
            segment.overnight_location_id = request.overnight_location_id;
        }
        if request.notes.is_some() {
            segment.notes = request.notes;
        }

        SegmentRepository::update(&mut tx, &segment).await?;

        let route = aggregate_engine::recompute_route(&mut tx, route.id).await?;
        let segment = reload(&mut tx, route.id, segment_id).await?;

        tx.commit().await?;
        info!(
            "✏️ Segmento {} actualizado (ruta {}, distancia total {})",
            segment_id, route.id, route.total_distance
        );
        Ok(segment)
    }

    /// Borra el segmento; sus alojamientos caen en cascada
    pub async fn delete(&self, segment_id: Uuid) -> AppResult<()> {
        self.ctx
            .run("delete_segment", || self.delete_once(segment_id))
            .await
    }

    async fn delete_once(&self, segment_id: Uuid) -> AppResult<()> {
        let mut tx = self.ctx.begin().await?;
        let (route, _) = lock_segment_scope(&mut tx, segment_id).await?;

        SegmentRepository::delete(&mut tx, segment_id).await?;
        let route = aggregate_engine::recompute_route(&mut tx, route.id).await?;

        tx.commit().await?;
        info!(
            "🗑️ Segmento {} eliminado (ruta {}, distancia total {}, duración {:?})",
            segment_id, route.id, route.total_distance, route.duration_days
        );
        Ok(())
    }

    pub async fn get(&self, segment_id: Uuid) -> AppResult<Segment> {
        let mut conn = self.ctx.read().await?;
        SegmentRepository::find_by_id(&mut conn, segment_id)
            .await?
            .ok_or_else(|| not_found_error("Segment", &segment_id))
    }

    /// Segmentos en orden de order_index
    pub async fn list(&self, route_id: Uuid) -> AppResult<Vec<Segment>> {
        let mut conn = self.ctx.read().await?;
        if RouteRepository::find_by_id(&mut conn, route_id).await?.is_none() {
            return Err(not_found_error("Route", &route_id));
        }
        SegmentRepository::list_by_route(&mut conn, route_id).await
    }
}
