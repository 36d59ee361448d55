//! Motor de recálculo de agregados
//!
//! Recalcula los campos derivados de la ruta (distancia total, duración,
//! fecha de fin, coste estimado) y las fechas/orden de sus segmentos a partir
//! de las filas hijas. Las funciones puras hacen la aritmética; las funciones
//! async leen el estado post-mutación y escriben dentro de la transacción del
//! comando que las invoca. Ejecutarlas dos veces seguidas da el mismo resultado.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use sqlx::PgConnection;
use tracing::debug;
use uuid::Uuid;

use crate::models::{LogisticsType, Route, Segment};
use crate::repositories::{LogisticsRepository, RouteRepository, SegmentRepository};
use crate::services::invariant_validator::validate_estimated_cost;
use crate::utils::errors::{consistency_error, AppResult};

/// Fechas derivadas de la ruta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDates {
    pub duration_days: Option<i32>,
    pub end_date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Aritmética pura
// ---------------------------------------------------------------------------

pub fn total_distance(distances: &[Decimal]) -> Decimal {
    distances.iter().copied().sum()
}

/// max(day_number); `None` sin segmentos. Un día no positivo es un estado corrupto.
pub fn duration_days(day_numbers: &[i32]) -> Result<Option<i32>, String> {
    if let Some(bad) = day_numbers.iter().find(|day| **day < 1) {
        return Err(format!("segment with non-positive day_number {}", bad));
    }
    Ok(day_numbers.iter().copied().max())
}

/// start_date + day_number − 1
pub fn segment_date(start_date: NaiveDate, day_number: i32) -> Option<NaiveDate> {
    let offset = u64::try_from(day_number.checked_sub(1)?).ok()?;
    start_date.checked_add_days(Days::new(offset))
}

pub fn end_date(
    start_date: Option<NaiveDate>,
    duration_days: Option<i32>,
) -> Result<Option<NaiveDate>, String> {
    match (start_date, duration_days) {
        (Some(start), Some(duration)) => segment_date(start, duration)
            .map(Some)
            .ok_or_else(|| format!("end date out of range for start {} + {} days", start, duration)),
        _ => Ok(None),
    }
}

pub fn route_dates(start_date: Option<NaiveDate>, day_numbers: &[i32]) -> Result<RouteDates, String> {
    let duration_days = duration_days(day_numbers)?;
    let end_date = end_date(start_date, duration_days)?;
    Ok(RouteDates {
        duration_days,
        end_date,
    })
}

/// Aporte de una partida: coste × cantidad, salvo extra-cost que suma el coste una sola vez
pub fn line_cost(logistics_type: LogisticsType, cost: Decimal, quantity: i32) -> Decimal {
    if logistics_type.is_flat_fee() {
        cost
    } else {
        cost * Decimal::from(quantity)
    }
}

pub fn estimated_cost(lines: &[(LogisticsType, Decimal, i32)]) -> Decimal {
    lines
        .iter()
        .map(|(logistics_type, cost, quantity)| line_cost(*logistics_type, *cost, *quantity))
        .sum()
}

/// order_index = posición (base 1) por day_number; empates por id
pub fn order_indexes(segments: &[(Uuid, i32)]) -> Vec<(Uuid, i32)> {
    let mut sorted = segments.to_vec();
    sorted.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
    sorted
        .into_iter()
        .zip(1..)
        .map(|((id, _), index)| (id, index))
        .collect()
}

// ---------------------------------------------------------------------------
// Pasos de recálculo sobre la transacción
// ---------------------------------------------------------------------------

async fn load_route(conn: &mut PgConnection, route_id: Uuid) -> AppResult<Route> {
    RouteRepository::find_by_id(conn, route_id)
        .await?
        .ok_or_else(|| consistency_error(&route_id, "route vanished during recomputation"))
}

/// total_distance = Σ segment.distance (0 sin segmentos)
pub async fn recompute_distance(conn: &mut PgConnection, route_id: Uuid) -> AppResult<Decimal> {
    let segments = SegmentRepository::list_by_route(conn, route_id).await?;
    let distances: Vec<Decimal> = segments.iter().map(|s| s.distance).collect();
    let total = total_distance(&distances);
    if total < Decimal::ZERO {
        return Err(consistency_error(&route_id, "negative total distance"));
    }

    RouteRepository::update_total_distance(conn, route_id, total).await?;
    debug!("📏 Ruta {}: distancia total {}", route_id, total);
    Ok(total)
}

/// duration = max(day_number); end_date = start_date + duration − 1
pub async fn recompute_dates_and_duration(
    conn: &mut PgConnection,
    route_id: Uuid,
) -> AppResult<RouteDates> {
    let route = load_route(conn, route_id).await?;
    let segments = SegmentRepository::list_by_route(conn, route_id).await?;
    let day_numbers: Vec<i32> = segments.iter().map(|s| s.day_number).collect();

    let dates = route_dates(route.start_date, &day_numbers)
        .map_err(|reason| consistency_error(&route_id, &reason))?;

    RouteRepository::update_dates(conn, route_id, dates.duration_days, dates.end_date).await?;
    debug!(
        "📅 Ruta {}: duración {:?}, fin {:?}",
        route_id, dates.duration_days, dates.end_date
    );
    Ok(dates)
}

/// estimated_cost = Σ coste × cantidad, con extra-cost sumado sin multiplicar
pub async fn recompute_estimated_cost(conn: &mut PgConnection, route_id: Uuid) -> AppResult<Decimal> {
    let lines = LogisticsRepository::cost_lines(conn, route_id).await?;
    let total = estimated_cost(&lines);
    validate_estimated_cost(total)?;

    RouteRepository::update_estimated_cost(conn, route_id, total).await?;
    debug!("💶 Ruta {}: coste estimado {} ({} partidas)", route_id, total, lines.len());
    Ok(total)
}

/// Recalcula segment_date solo mientras la ruta está en draft.
/// Fuera de draft las fechas explícitas son autoritativas y no se tocan.
/// Devuelve cuántos segmentos cambiaron.
pub async fn recalculate_segment_dates(conn: &mut PgConnection, route_id: Uuid) -> AppResult<usize> {
    let route = load_route(conn, route_id).await?;
    if !route.is_draft() {
        return Ok(0);
    }

    let segments = SegmentRepository::list_by_route(conn, route_id).await?;
    let mut changed = 0;
    for segment in &segments {
        let date = match route.start_date {
            Some(start) => Some(segment_date(start, segment.day_number).ok_or_else(|| {
                consistency_error(
                    &route_id,
                    &format!("segment {} date out of range", segment.id),
                )
            })?),
            None => None,
        };
        if SegmentRepository::set_date(conn, segment.id, date).await? {
            changed += 1;
        }
    }

    debug!("🗓️ Ruta {}: {} fechas de segmento actualizadas", route_id, changed);
    Ok(changed)
}

/// Mantiene order_index monótono con day_number
pub async fn reorder_segments(conn: &mut PgConnection, route_id: Uuid) -> AppResult<usize> {
    let segments = SegmentRepository::list_by_route(conn, route_id).await?;
    let keys: Vec<(Uuid, i32)> = segments.iter().map(|s| (s.id, s.day_number)).collect();

    let mut changed = 0;
    for (id, index) in order_indexes(&keys) {
        if SegmentRepository::set_order_index(conn, id, index).await? {
            changed += 1;
        }
    }
    Ok(changed)
}

/// Pasada completa tras una mutación de segmentos o de la fecha de inicio
pub async fn recompute_route(conn: &mut PgConnection, route_id: Uuid) -> AppResult<Route> {
    recalculate_segment_dates(conn, route_id).await?;
    reorder_segments(conn, route_id).await?;
    recompute_distance(conn, route_id).await?;
    recompute_dates_and_duration(conn, route_id).await?;
    recompute_estimated_cost(conn, route_id).await?;

    load_route(conn, route_id).await
}

/// Fecha inicial de un segmento nuevo: derivada si hay fecha de inicio
pub fn initial_segment_date(route: &Route, day_number: i32) -> Option<NaiveDate> {
    route
        .start_date
        .and_then(|start| segment_date(start, day_number))
}

/// Comprueba que las fechas persistidas coinciden con las derivadas (solo draft)
pub fn segment_dates_consistent(route: &Route, segments: &[Segment]) -> bool {
    if !route.is_draft() {
        return true;
    }
    segments.iter().all(|segment| {
        segment.segment_date == initial_segment_date(route, segment.day_number)
    })
}
