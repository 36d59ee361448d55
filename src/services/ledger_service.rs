//! Libro de transacciones
//!
//! Captura un snapshot desnormalizado de la ruta, el segmento y las cuentas
//! en el momento del registro y lo inserta junto al asiento. No hay
//! operaciones de modificación ni borrado; las lecturas no recalculan nada.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::models::{
    Account, AccountSnapshot, LedgerTransaction, Route, RouteSnapshot, Segment, SegmentSnapshot,
    TransactionCategory, TransactionSnapshot, TransactionType,
};
use crate::repositories::{
    AccountRepository, LedgerFilter, NewTransaction, RouteRepository, SegmentRepository,
    TransactionRepository,
};
use crate::services::invariant_validator::{validate_ledger_entry, validate_segment_ownership};
use crate::utils::errors::{conflict_error, not_found_error, AppResult};

/// Datos del asiento tal como llegan al libro
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub id: Option<Uuid>,
    pub route_id: Uuid,
    pub segment_id: Option<Uuid>,
    pub transaction_type: TransactionType,
    pub category: TransactionCategory,
    pub amount: Decimal,
    pub currency: Option<String>,
    pub from_account_id: Option<Uuid>,
    pub to_account_id: Option<Uuid>,
    pub description: Option<String>,
    pub transaction_date: Option<NaiveDate>,
}

fn account_snapshot(account: &Account) -> AccountSnapshot {
    AccountSnapshot {
        id: account.id,
        entity_type: account.entity_type,
        entity_id: account.entity_id,
        account_type: account.account_type,
        holder_name: account.holder_name.clone(),
        bank_name: account.bank_name.clone(),
        service: account.service.clone(),
        is_primary: account.is_primary,
    }
}

/// Congela el estado de las entidades referenciadas
pub fn build_snapshot(
    route: &Route,
    segment: Option<&Segment>,
    from_account: Option<&Account>,
    to_account: Option<&Account>,
    captured_at: DateTime<Utc>,
) -> TransactionSnapshot {
    TransactionSnapshot {
        captured_at,
        route: RouteSnapshot {
            id: route.id,
            name: route.name.clone(),
            status: route.status,
            start_date: route.start_date,
            end_date: route.end_date,
            currency: route.currency.clone(),
        },
        segment: segment.map(|s| SegmentSnapshot {
            id: s.id,
            day_number: s.day_number,
            segment_date: s.segment_date,
            distance: s.distance,
        }),
        from_account: from_account.map(account_snapshot),
        to_account: to_account.map(account_snapshot),
    }
}

async fn load_account(conn: &mut PgConnection, id: Option<Uuid>) -> AppResult<Option<Account>> {
    match id {
        Some(id) => AccountRepository::find_by_id(conn, id)
            .await?
            .map(Some)
            .ok_or_else(|| not_found_error("Account", &id)),
        None => Ok(None),
    }
}

/// Valida, captura el snapshot e inserta el asiento en la transacción dada
pub async fn record_transaction(conn: &mut PgConnection, entry: LedgerEntry) -> AppResult<LedgerTransaction> {
    validate_ledger_entry(entry.amount, entry.from_account_id, entry.to_account_id)?;

    if let Some(id) = entry.id {
        if TransactionRepository::find_by_id(conn, id).await?.is_some() {
            return Err(conflict_error("Transaction", "id", &id.to_string()));
        }
    }

    let route = RouteRepository::lock_shared(conn, entry.route_id)
        .await?
        .ok_or_else(|| not_found_error("Route", &entry.route_id))?;

    let segment = match entry.segment_id {
        Some(segment_id) => {
            let segment = SegmentRepository::find_by_id(conn, segment_id)
                .await?
                .ok_or_else(|| not_found_error("Segment", &segment_id))?;
            validate_segment_ownership(segment.route_id, route.id)?;
            Some(segment)
        }
        None => None,
    };

    let from_account = load_account(conn, entry.from_account_id).await?;
    let to_account = load_account(conn, entry.to_account_id).await?;

    let now = Utc::now();
    let snapshot = build_snapshot(
        &route,
        segment.as_ref(),
        from_account.as_ref(),
        to_account.as_ref(),
        now,
    );

    let new_entry = NewTransaction {
        id: entry.id.unwrap_or_else(Uuid::new_v4),
        route_id: route.id,
        segment_id: entry.segment_id,
        transaction_type: entry.transaction_type,
        category: entry.category,
        amount: entry.amount,
        currency: entry.currency.unwrap_or_else(|| route.currency.clone()),
        from_account_id: entry.from_account_id,
        to_account_id: entry.to_account_id,
        description: entry.description,
        transaction_date: entry.transaction_date.unwrap_or_else(|| now.date_naive()),
        snapshot,
    };

    TransactionRepository::insert(conn, new_entry).await
}

/// Lectura pura del libro
pub async fn list_transactions(
    conn: &mut PgConnection,
    filter: &LedgerFilter,
) -> AppResult<Vec<LedgerTransaction>> {
    TransactionRepository::list(conn, filter).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountEntityType, AccountType, RouteStatus};

    fn route() -> Route {
        Route {
            id: Uuid::new_v4(),
            name: "Ruta de los Pueblos Blancos".to_string(),
            description: Some("5 días".to_string()),
            status: RouteStatus::Confirmed,
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 5),
            duration_days: Some(5),
            total_distance: Decimal::from(180),
            estimated_cost: Decimal::from(2400),
            actual_cost: Decimal::ZERO,
            currency: "EUR".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn account(entity_type: AccountEntityType, entity_id: Option<Uuid>) -> Account {
        Account {
            id: Uuid::new_v4(),
            entity_type,
            entity_id,
            account_type: AccountType::Bank,
            holder_name: Some("Hotel Arcos".to_string()),
            bank_name: Some("Caja Rural".to_string()),
            account_number: Some("ES00 0000".to_string()),
            service: None,
            description: None,
            currency: "EUR".to_string(),
            is_primary: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_snapshot_captures_route_and_accounts() {
        let route = route();
        let company = account(AccountEntityType::Company, None);
        let hotel = account(AccountEntityType::Hotel, Some(Uuid::new_v4()));
        let captured_at = Utc::now();

        let snapshot = build_snapshot(&route, None, Some(&company), Some(&hotel), captured_at);

        assert_eq!(snapshot.captured_at, captured_at);
        assert_eq!(snapshot.route.id, route.id);
        assert_eq!(snapshot.route.name, route.name);
        assert_eq!(snapshot.route.status, RouteStatus::Confirmed);
        assert_eq!(snapshot.route.end_date, route.end_date);
        assert!(snapshot.segment.is_none());
        assert_eq!(snapshot.from_account.as_ref().map(|a| a.id), Some(company.id));
        assert_eq!(
            snapshot.to_account.as_ref().and_then(|a| a.bank_name.clone()),
            Some("Caja Rural".to_string())
        );
    }

    #[test]
    fn test_snapshot_is_independent_of_later_changes() {
        let mut route = route();
        let snapshot = build_snapshot(&route, None, None, None, Utc::now());
        route.name = "Renamed".to_string();
        route.status = RouteStatus::Cancelled;

        assert_eq!(snapshot.route.name, "Ruta de los Pueblos Blancos");
        assert_eq!(snapshot.route.status, RouteStatus::Confirmed);
    }

    #[test]
    fn test_snapshot_serializes_to_json_object() {
        let route = route();
        let snapshot = build_snapshot(&route, None, None, None, Utc::now());
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["route"]["status"], "confirmed");
        assert!(value["segment"].is_null());
    }
}
