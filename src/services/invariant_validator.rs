//! Validador de invariantes
//!
//! Funciones puras que comprueban una mutación propuesta contra el estado
//! de sus hermanos y padres. No tocan la base de datos: los controladores
//! leen el estado necesario dentro de la transacción y lo pasan aquí.

use std::collections::HashSet;
use std::fmt;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    max_money, AccountEntityType, AccountType, GroupType, LogisticsEntityType, LogisticsType, Participant,
    ParticipantRole, RoomType, RouteStatus,
};

/// Distancia máxima de un segmento
pub const MAX_SEGMENT_DISTANCE: i64 = 60;

/// Último día admitido en una ruta
pub const MAX_DAY_NUMBER: i32 = 366;

/// Unidades máximas de una partida logística
pub const MAX_LOGISTICS_QUANTITY: i32 = 10_000;

/// Regla que falló
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    ParticipantIdentity,
    LogisticsEntityType,
    LogisticsAmounts,
    SegmentDistance,
    SegmentDayNumber,
    SegmentOwnership,
    SegmentDate,
    RouteStartDate,
    RouteTransition,
    AccountKey,
    AccountFields,
    AccountPrimary,
    RoomCapacity,
    RoomCouple,
    RoomGroup,
    RoomOccupancy,
    LedgerAmount,
    LedgerAccounts,
    LedgerDateRange,
    StorageConstraint,
}

/// Violación estructurada: qué regla, sobre qué campo y por qué
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule: Rule,
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(rule: Rule, field: impl Into<String>, message: String) -> Self {
        Self {
            rule,
            field: field.into(),
            message,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} on '{}': {}", self.rule, self.field, self.message)
    }
}

impl std::error::Error for Violation {}

pub type Validation = Result<(), Violation>;

// ---------------------------------------------------------------------------
// Participants
// ---------------------------------------------------------------------------

/// client_id sii role == client; guide_id sii role es de guía; staff sin identidad
pub fn validate_participant_identity(
    role: ParticipantRole,
    client_id: Option<Uuid>,
    guide_id: Option<Uuid>,
) -> Validation {
    let ok = match role {
        ParticipantRole::Client => client_id.is_some() && guide_id.is_none(),
        ParticipantRole::GuideCaptain | ParticipantRole::GuideTail => {
            guide_id.is_some() && client_id.is_none()
        }
        ParticipantRole::Staff => client_id.is_none() && guide_id.is_none(),
    };
    if ok {
        return Ok(());
    }

    let message = match role {
        ParticipantRole::Client => "a client participant requires client_id and no guide_id",
        ParticipantRole::GuideCaptain | ParticipantRole::GuideTail => {
            "a guide participant requires guide_id and no client_id"
        }
        ParticipantRole::Staff => "a staff participant cannot carry client_id or guide_id",
    };
    Err(Violation::new(Rule::ParticipantIdentity, "role", message.to_string()))
}

// ---------------------------------------------------------------------------
// Logistics
// ---------------------------------------------------------------------------

pub fn validate_logistics_entity_type(
    logistics_type: LogisticsType,
    entity_type: LogisticsEntityType,
) -> Validation {
    if logistics_type.allowed_entity_types().contains(&entity_type) {
        return Ok(());
    }
    Err(Violation::new(
        Rule::LogisticsEntityType,
        "entity_type",
        format!(
            "entity type {:?} is not allowed for logistics type {:?}",
            entity_type, logistics_type
        ),
    ))
}

pub fn validate_logistics_amounts(quantity: i32, cost: Decimal) -> Validation {
    if !(1..=MAX_LOGISTICS_QUANTITY).contains(&quantity) {
        return Err(Violation::new(
            Rule::LogisticsAmounts,
            "quantity",
            format!(
                "quantity must be between 1 and {}, got {}",
                MAX_LOGISTICS_QUANTITY, quantity
            ),
        ));
    }
    if cost < Decimal::ZERO || cost > max_money() {
        return Err(Violation::new(
            Rule::LogisticsAmounts,
            "cost",
            format!("cost must be between 0 and {}, got {}", max_money(), cost),
        ));
    }
    Ok(())
}

/// El coste estimado recalculado tiene que caber en la ruta
pub fn validate_estimated_cost(total: Decimal) -> Validation {
    if total > max_money() {
        return Err(Violation::new(
            Rule::LogisticsAmounts,
            "estimated_cost",
            format!(
                "route estimated cost {} would exceed the maximum of {}",
                total,
                max_money()
            ),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Segments
// ---------------------------------------------------------------------------

pub fn validate_segment_distance(distance: Decimal) -> Validation {
    if distance < Decimal::ZERO || distance > Decimal::from(MAX_SEGMENT_DISTANCE) {
        return Err(Violation::new(
            Rule::SegmentDistance,
            "distance",
            format!(
                "distance must be between 0 and {}, got {}",
                MAX_SEGMENT_DISTANCE, distance
            ),
        ));
    }
    Ok(())
}

pub fn validate_day_number(day_number: i32) -> Validation {
    if !(1..=MAX_DAY_NUMBER).contains(&day_number) {
        return Err(Violation::new(
            Rule::SegmentDayNumber,
            "day_number",
            format!(
                "day_number must be between 1 and {}, got {}",
                MAX_DAY_NUMBER, day_number
            ),
        ));
    }
    Ok(())
}

/// El segmento referenciado debe pertenecer a la misma ruta
pub fn validate_segment_ownership(segment_route_id: Uuid, route_id: Uuid) -> Validation {
    if segment_route_id != route_id {
        return Err(Violation::new(
            Rule::SegmentOwnership,
            "segment_id",
            format!("segment does not belong to route {}", route_id),
        ));
    }
    Ok(())
}

/// Mientras la ruta está en draft las fechas de segmento son derivadas
pub fn validate_explicit_segment_date(status: RouteStatus) -> Validation {
    if status == RouteStatus::Draft {
        return Err(Violation::new(
            Rule::SegmentDate,
            "segment_date",
            "segment dates of a draft route are derived from its start date".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// status == draft OR start_date IS NOT NULL
pub fn validate_route_start_date(status: RouteStatus, start_date: Option<NaiveDate>) -> Validation {
    if status == RouteStatus::Draft || start_date.is_some() {
        return Ok(());
    }
    Err(Violation::new(
        Rule::RouteStartDate,
        "start_date",
        format!("a {} route requires a start date", status),
    ))
}

/// Todos los días admitidos a partir de la fecha de inicio deben ser fechas válidas
pub fn validate_start_date_range(start_date: NaiveDate) -> Validation {
    let last_day = u64::try_from(MAX_DAY_NUMBER - 1).unwrap_or_default();
    if start_date.checked_add_days(Days::new(last_day)).is_none() {
        return Err(Violation::new(
            Rule::RouteStartDate,
            "start_date",
            format!("start date {} leaves no room for a {}-day route", start_date, MAX_DAY_NUMBER),
        ));
    }
    Ok(())
}

pub fn validate_route_transition(
    current: RouteStatus,
    next: RouteStatus,
    start_date: Option<NaiveDate>,
) -> Validation {
    if !current.can_transition_to(next) {
        return Err(Violation::new(
            Rule::RouteTransition,
            "status",
            format!("cannot transition route from {} to {}", current, next),
        ));
    }
    validate_route_start_date(next, start_date)
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// entity_id solo puede ser nulo para cuentas de empresa
pub fn validate_account_key(entity_type: AccountEntityType, entity_id: Option<Uuid>) -> Validation {
    match (entity_type, entity_id) {
        (AccountEntityType::Company, _) | (_, Some(_)) => Ok(()),
        (other, None) => Err(Violation::new(
            Rule::AccountKey,
            "entity_id",
            format!("entity_id is required for {:?} accounts", other),
        )),
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

/// Campos obligatorios según el tipo de cuenta
pub fn validate_account_fields(
    account_type: AccountType,
    bank_name: Option<&str>,
    description: Option<&str>,
    service: Option<&str>,
) -> Validation {
    let missing = match account_type {
        AccountType::Bank if is_blank(bank_name) => Some("bank_name"),
        AccountType::Other if is_blank(description) => Some("description"),
        AccountType::Online if is_blank(service) => Some("service"),
        _ => None,
    };
    match missing {
        Some(field) => Err(Violation::new(
            Rule::AccountFields,
            field,
            format!("{} is required for {:?} accounts", field, account_type),
        )),
        None => Ok(()),
    }
}

/// Plan de cambio de cuenta principal: primero se limpian `clear`, luego se marca `target`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimarySwitch {
    pub target: Uuid,
    pub clear: Vec<Uuid>,
}

/// `siblings` son todas las cuentas de la misma clave como `(id, is_primary)`,
/// incluida la propia cuenta objetivo.
pub fn plan_primary_switch(target: Uuid, siblings: &[(Uuid, bool)]) -> Result<PrimarySwitch, Violation> {
    if !siblings.iter().any(|(id, _)| *id == target) {
        return Err(Violation::new(
            Rule::AccountPrimary,
            "account_id",
            format!("account {} is not part of the primary key group", target),
        ));
    }
    let clear = siblings
        .iter()
        .filter(|(id, is_primary)| *is_primary && *id != target)
        .map(|(id, _)| *id)
        .collect();
    Ok(PrimarySwitch { target, clear })
}

// ---------------------------------------------------------------------------
// Rooms
// ---------------------------------------------------------------------------

pub fn validate_room_couple(room_type: RoomType, is_couple: bool) -> Validation {
    if is_couple && room_type != RoomType::Double {
        return Err(Violation::new(
            Rule::RoomCouple,
            "is_couple",
            format!("only double rooms can be flagged as couple rooms, got {:?}", room_type),
        ));
    }
    Ok(())
}

/// Capacidad y duplicados: `current` ocupantes actuales, `incoming` los nuevos
pub fn validate_room_capacity(room_type: RoomType, current: &[Uuid], incoming: &[Uuid]) -> Validation {
    let mut seen: HashSet<Uuid> = current.iter().copied().collect();
    for id in incoming {
        if !seen.insert(*id) {
            return Err(Violation::new(
                Rule::RoomOccupancy,
                "participant_ids",
                format!("participant {} is listed twice for the same room", id),
            ));
        }
    }
    if seen.len() > room_type.capacity() {
        return Err(Violation::new(
            Rule::RoomCapacity,
            "participant_ids",
            format!(
                "{:?} room holds {} participants, {} requested",
                room_type,
                room_type.capacity(),
                seen.len()
            ),
        ));
    }
    Ok(())
}

/// El participante debe pertenecer a la ruta del segmento y encajar en el grupo
pub fn validate_room_participant(
    participant: &Participant,
    route_id: Uuid,
    group_type: GroupType,
) -> Validation {
    if participant.route_id != route_id {
        return Err(Violation::new(
            Rule::RoomGroup,
            "participant_id",
            format!("participant {} does not belong to route {}", participant.id, route_id),
        ));
    }
    if !group_type.admits(participant.role) {
        return Err(Violation::new(
            Rule::RoomGroup,
            "participant_id",
            format!(
                "participant {} with role {:?} cannot stay in a {:?} accommodation",
                participant.id, participant.role, group_type
            ),
        ));
    }
    Ok(())
}

/// Una habitación por participante y segmento.
/// `existing_room` es la habitación del mismo segmento donde ya está, si existe.
pub fn validate_one_room_per_segment(
    participant_id: Uuid,
    existing_room: Option<Uuid>,
    target_room: Option<Uuid>,
) -> Validation {
    match existing_room {
        Some(room) if Some(room) != target_room => Err(Violation::new(
            Rule::RoomOccupancy,
            "participant_id",
            format!(
                "participant {} is already assigned to room {} on this segment",
                participant_id, room
            ),
        )),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

pub fn validate_ledger_entry(
    amount: Decimal,
    from_account_id: Option<Uuid>,
    to_account_id: Option<Uuid>,
) -> Validation {
    if amount <= Decimal::ZERO || amount > max_money() {
        return Err(Violation::new(
            Rule::LedgerAmount,
            "amount",
            format!("amount must be positive and at most {}, got {}", max_money(), amount),
        ));
    }
    if from_account_id.is_some() && from_account_id == to_account_id {
        return Err(Violation::new(
            Rule::LedgerAccounts,
            "to_account_id",
            "source and destination accounts must differ".to_string(),
        ));
    }
    Ok(())
}
