//! Pruebas contra PostgreSQL real. Ejecutar con
//! `DATABASE_URL=... cargo test --features integration`.
#![cfg(feature = "integration")]

mod common;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use common::TestContext;
use tour_itinerary::dto::accommodation_dto::{AssignRoomRequest, CreateAccommodationRequest};
use tour_itinerary::dto::account_dto::{AccountFilters, CreateAccountRequest};
use tour_itinerary::dto::ledger_dto::{LedgerQuery, RecordTransactionRequest};
use tour_itinerary::dto::logistics_dto::{CreateLogisticsRequest, UpdateLogisticsRequest};
use tour_itinerary::dto::participant_dto::CreateParticipantRequest;
use tour_itinerary::dto::route_dto::{
    UpdateRouteRequest, UpdateStartDateRequest, UpdateStatusRequest,
};
use tour_itinerary::dto::segment_dto::{CreateSegmentRequest, UpdateSegmentRequest};
use tour_itinerary::models::{
    AccountEntityType, AccountType, GroupType, LogisticsEntityType, LogisticsType,
    ParticipantRole, RoomType, RouteStatus, Segment, TransactionCategory, TransactionType,
};
use tour_itinerary::services::aggregate_engine::segment_dates_consistent;
use tour_itinerary::services::Rule;
use tour_itinerary::utils::AppError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn segment(day_number: i32, distance: i64) -> CreateSegmentRequest {
    CreateSegmentRequest {
        id: None,
        day_number,
        distance: Decimal::from(distance),
        origin_location_id: None,
        destination_location_id: None,
        overnight_location_id: None,
        notes: None,
    }
}

fn logistics(
    logistics_type: LogisticsType,
    entity_type: LogisticsEntityType,
    entity_id: Uuid,
    cost: i64,
    quantity: i32,
) -> CreateLogisticsRequest {
    CreateLogisticsRequest {
        id: None,
        segment_id: None,
        logistics_type,
        entity_type,
        entity_id,
        quantity: Some(quantity),
        cost: Decimal::from(cost),
        description: None,
    }
}

fn participant(role: ParticipantRole, client_id: Option<Uuid>, guide_id: Option<Uuid>) -> CreateParticipantRequest {
    CreateParticipantRequest {
        id: None,
        role,
        client_id,
        guide_id,
        notes: None,
    }
}

fn account(entity_type: AccountEntityType, entity_id: Option<Uuid>, is_primary: bool) -> CreateAccountRequest {
    CreateAccountRequest {
        id: None,
        entity_type,
        entity_id,
        account_type: AccountType::Cash,
        holder_name: Some("Titular".to_string()),
        bank_name: None,
        account_number: None,
        service: None,
        description: None,
        currency: None,
        is_primary,
    }
}

fn payment(route_id: Uuid, amount: i64) -> RecordTransactionRequest {
    RecordTransactionRequest {
        id: None,
        route_id,
        segment_id: None,
        transaction_type: TransactionType::Payment,
        category: TransactionCategory::Hotel,
        amount: Decimal::from(amount),
        currency: None,
        from_account_id: None,
        to_account_id: None,
        description: None,
        transaction_date: None,
    }
}

fn start_on(start_date: Option<NaiveDate>) -> UpdateStartDateRequest {
    UpdateStartDateRequest { start_date }
}

fn rule_of(error: &AppError) -> Option<Rule> {
    match error {
        AppError::Validation(violation) => Some(violation.rule),
        _ => None,
    }
}

#[tokio::test]
async fn test_scenarios_a_to_c_distance_and_dates() {
    let ctx = TestContext::new().await;
    let route = ctx.draft_route("Scenario A-C").await;
    assert_eq!(route.status, RouteStatus::Draft);
    assert!(route.start_date.is_none());

    // A
    let first = ctx.segments().add(route.id, segment(1, 12)).await.unwrap();
    let detail = ctx.routes().get(route.id).await.unwrap();
    assert_eq!(detail.route.total_distance, Decimal::from(12));
    assert!(detail.route.end_date.is_none());
    assert!(first.segment_date.is_none());

    // B
    let updated = ctx
        .routes()
        .update_start_date(route.id, start_on(Some(date(2024, 6, 1))))
        .await
        .unwrap();
    assert_eq!(updated.duration_days, Some(1));
    assert_eq!(updated.end_date, Some(date(2024, 6, 1)));
    let first = ctx.segments().get(first.id).await.unwrap();
    assert_eq!(first.segment_date, Some(date(2024, 6, 1)));

    // C
    let second = ctx.segments().add(route.id, segment(2, 8)).await.unwrap();
    assert_eq!(second.segment_date, Some(date(2024, 6, 2)));
    let detail = ctx.routes().get(route.id).await.unwrap();
    assert_eq!(detail.route.total_distance, Decimal::from(20));
    assert_eq!(detail.route.duration_days, Some(2));
    assert_eq!(detail.route.end_date, Some(date(2024, 6, 2)));
    let order: Vec<i32> = detail.segments.iter().map(|s| s.order_index).collect();
    assert_eq!(order, vec![1, 2]);
}

#[tokio::test]
async fn test_scenario_d_extra_cost_is_not_multiplied() {
    let ctx = TestContext::new().await;
    let route = ctx.draft_route("Scenario D").await;
    let vehicle = ctx.seed("vehicles").await;
    let third_party = ctx.seed("third_parties").await;

    ctx.logistics()
        .add(
            route.id,
            logistics(LogisticsType::ExtraCost, LogisticsEntityType::ThirdParty, third_party, 100, 5),
        )
        .await
        .unwrap();
    let detail = ctx.routes().get(route.id).await.unwrap();
    assert_eq!(detail.route.estimated_cost, Decimal::from(100));

    let item = ctx
        .logistics()
        .add(
            route.id,
            logistics(LogisticsType::SupportVehicle, LogisticsEntityType::Vehicle, vehicle, 50, 2),
        )
        .await
        .unwrap();
    let detail = ctx.routes().get(route.id).await.unwrap();
    assert_eq!(detail.route.estimated_cost, Decimal::from(200));

    ctx.logistics().delete(item.id).await.unwrap();
    let detail = ctx.routes().get(route.id).await.unwrap();
    assert_eq!(detail.route.estimated_cost, Decimal::from(100));
}

#[tokio::test]
async fn test_logistics_rejects_mismatched_or_missing_entities() {
    let ctx = TestContext::new().await;
    let route = ctx.draft_route("Logistics rules").await;
    let vehicle = ctx.seed("vehicles").await;

    let error = ctx
        .logistics()
        .add(
            route.id,
            logistics(LogisticsType::HotelClient, LogisticsEntityType::Vehicle, vehicle, 80, 1),
        )
        .await
        .unwrap_err();
    assert_eq!(rule_of(&error), Some(Rule::LogisticsEntityType));

    let error = ctx
        .logistics()
        .add(
            route.id,
            logistics(LogisticsType::HotelClient, LogisticsEntityType::Hotel, Uuid::new_v4(), 80, 1),
        )
        .await
        .unwrap_err();
    assert!(matches!(error, AppError::NotFound(_)));

    let other = ctx.draft_route("Other route").await;
    let foreign_segment = ctx.segments().add(other.id, segment(1, 5)).await.unwrap();
    let mut request = logistics(LogisticsType::SupportVehicle, LogisticsEntityType::Vehicle, vehicle, 10, 1);
    request.segment_id = Some(foreign_segment.id);
    let error = ctx.logistics().add(route.id, request).await.unwrap_err();
    assert_eq!(rule_of(&error), Some(Rule::SegmentOwnership));
}

#[tokio::test]
async fn test_scenario_e_primary_account_switch() {
    let ctx = TestContext::new().await;
    let client = Uuid::new_v4();

    let y = ctx
        .accounts()
        .create(account(AccountEntityType::Client, Some(client), true))
        .await
        .unwrap();
    let x = ctx
        .accounts()
        .create(account(AccountEntityType::Client, Some(client), false))
        .await
        .unwrap();
    assert!(y.is_primary);
    assert!(!x.is_primary);

    let x = ctx.accounts().set_primary(x.id).await.unwrap();
    assert!(x.is_primary);
    let y = ctx.accounts().get(y.id).await.unwrap();
    assert!(!y.is_primary);

    let accounts = ctx
        .accounts()
        .list(AccountFilters {
            entity_type: Some(AccountEntityType::Client),
            entity_id: Some(client),
        })
        .await
        .unwrap();
    assert_eq!(accounts.iter().filter(|a| a.is_primary).count(), 1);
}

#[tokio::test]
async fn test_company_accounts_share_the_null_key() {
    let ctx = TestContext::new().await;
    // Limpia primarias de empresa previas para no depender del orden de las pruebas
    sqlx::query("UPDATE accounts SET is_primary = FALSE WHERE entity_type = 'company'")
        .execute(&ctx.pool)
        .await
        .unwrap();

    let first = ctx
        .accounts()
        .create(account(AccountEntityType::Company, None, true))
        .await
        .unwrap();
    let second = ctx
        .accounts()
        .create(account(AccountEntityType::Company, None, true))
        .await
        .unwrap();

    assert!(second.is_primary);
    assert!(!ctx.accounts().get(first.id).await.unwrap().is_primary);

    let error = ctx
        .accounts()
        .create(account(AccountEntityType::Hotel, None, false))
        .await
        .unwrap_err();
    assert_eq!(rule_of(&error), Some(Rule::AccountKey));
}

#[tokio::test]
async fn test_scenario_f_confirm_requires_start_date() {
    let ctx = TestContext::new().await;
    let route = ctx.draft_route("Scenario F").await;

    let error = ctx
        .routes()
        .update_status(route.id, UpdateStatusRequest { status: RouteStatus::Confirmed })
        .await
        .unwrap_err();
    assert_eq!(rule_of(&error), Some(Rule::RouteStartDate));

    let detail = ctx.routes().get(route.id).await.unwrap();
    assert_eq!(detail.route.status, RouteStatus::Draft);
}

#[tokio::test]
async fn test_explicit_segment_dates_survive_outside_draft() {
    let ctx = TestContext::new().await;
    let route = ctx.draft_route("Explicit dates").await;
    let seg = ctx.segments().add(route.id, segment(1, 10)).await.unwrap();

    let draft_edit = UpdateSegmentRequest {
        segment_date: Some(date(2024, 7, 9)),
        ..Default::default()
    };
    let error = ctx.segments().update(seg.id, draft_edit.clone()).await.unwrap_err();
    assert_eq!(rule_of(&error), Some(Rule::SegmentDate));

    ctx.routes()
        .update_start_date(route.id, start_on(Some(date(2024, 7, 1))))
        .await
        .unwrap();
    ctx.routes()
        .update_status(route.id, UpdateStatusRequest { status: RouteStatus::Confirmed })
        .await
        .unwrap();

    let edited = ctx.segments().update(seg.id, draft_edit).await.unwrap();
    assert_eq!(edited.segment_date, Some(date(2024, 7, 9)));

    ctx.routes().recompute(route.id).await.unwrap();
    let after = ctx.segments().get(seg.id).await.unwrap();
    assert_eq!(after.segment_date, Some(date(2024, 7, 9)));
}

#[tokio::test]
async fn test_segment_conflicts_and_deletion() {
    let ctx = TestContext::new().await;
    let route = ctx.draft_route("Segment conflicts").await;
    let seg = ctx.segments().add(route.id, segment(3, 30)).await.unwrap();

    let error = ctx.segments().add(route.id, segment(3, 5)).await.unwrap_err();
    assert!(matches!(error, AppError::Conflict(_)));

    let mut duplicate_id = segment(4, 5);
    duplicate_id.id = Some(seg.id);
    let error = ctx.segments().add(route.id, duplicate_id).await.unwrap_err();
    assert!(matches!(error, AppError::Conflict(_)));

    let error = ctx.segments().add(route.id, segment(5, 61)).await.unwrap_err();
    assert_eq!(rule_of(&error), Some(Rule::SegmentDistance));

    let hotel = ctx.seed("hotels").await;
    let accommodation = ctx
        .accommodations()
        .create(
            seg.id,
            CreateAccommodationRequest {
                id: None,
                hotel_id: hotel,
                group_type: GroupType::Client,
                notes: None,
            },
        )
        .await
        .unwrap();

    ctx.segments().delete(seg.id).await.unwrap();
    let detail = ctx.routes().get(route.id).await.unwrap();
    assert_eq!(detail.route.total_distance, Decimal::ZERO);
    assert_eq!(detail.route.duration_days, None);
    assert!(detail.segments.is_empty());

    let error = ctx.accommodations().delete(accommodation.id).await.unwrap_err();
    assert!(matches!(error, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_participant_identity_and_uniqueness() {
    let ctx = TestContext::new().await;
    let route = ctx.draft_route("Participants").await;
    let client = ctx.seed("clients").await;
    let guide = ctx.seed("guides").await;

    let error = ctx
        .participants()
        .add(route.id, participant(ParticipantRole::Client, None, Some(guide)))
        .await
        .unwrap_err();
    assert_eq!(rule_of(&error), Some(Rule::ParticipantIdentity));

    ctx.participants()
        .add(route.id, participant(ParticipantRole::Client, Some(client), None))
        .await
        .unwrap();
    let error = ctx
        .participants()
        .add(route.id, participant(ParticipantRole::Client, Some(client), None))
        .await
        .unwrap_err();
    assert!(matches!(error, AppError::Conflict(_)));

    ctx.participants()
        .add(route.id, participant(ParticipantRole::GuideCaptain, None, Some(guide)))
        .await
        .unwrap();
    ctx.participants()
        .add(route.id, participant(ParticipantRole::Staff, None, None))
        .await
        .unwrap();

    let participants = ctx.participants().list(route.id).await.unwrap();
    assert_eq!(participants.len(), 3);
}

#[tokio::test]
async fn test_room_occupancy_rules() {
    let ctx = TestContext::new().await;
    let route = ctx.draft_route("Rooming").await;
    let seg = ctx.segments().add(route.id, segment(1, 15)).await.unwrap();
    let hotel = ctx.seed("hotels").await;
    let other_hotel = ctx.seed("hotels").await;

    let mut clients = Vec::new();
    for _ in 0..3 {
        let client = ctx.seed("clients").await;
        let p = ctx
            .participants()
            .add(route.id, participant(ParticipantRole::Client, Some(client), None))
            .await
            .unwrap();
        clients.push(p.id);
    }
    let staff = ctx
        .participants()
        .add(route.id, participant(ParticipantRole::Staff, None, None))
        .await
        .unwrap();

    let accommodation = |hotel_id| CreateAccommodationRequest {
        id: None,
        hotel_id,
        group_type: GroupType::Client,
        notes: None,
    };
    let main = ctx.accommodations().create(seg.id, accommodation(hotel)).await.unwrap();
    let annex = ctx.accommodations().create(seg.id, accommodation(other_hotel)).await.unwrap();

    let error = ctx.accommodations().create(seg.id, accommodation(hotel)).await.unwrap_err();
    assert!(matches!(error, AppError::Conflict(_)));

    let room = |room_type, is_couple, participant_ids: Vec<Uuid>| AssignRoomRequest {
        id: None,
        room_type,
        is_couple,
        participant_ids,
    };

    let error = ctx
        .accommodations()
        .assign_room(main.id, room(RoomType::Twin, true, vec![]))
        .await
        .unwrap_err();
    assert_eq!(rule_of(&error), Some(Rule::RoomCouple));

    let error = ctx
        .accommodations()
        .assign_room(main.id, room(RoomType::Double, false, clients.clone()))
        .await
        .unwrap_err();
    assert_eq!(rule_of(&error), Some(Rule::RoomCapacity));

    let error = ctx
        .accommodations()
        .assign_room(main.id, room(RoomType::Single, false, vec![staff.id]))
        .await
        .unwrap_err();
    assert_eq!(rule_of(&error), Some(Rule::RoomGroup));

    let couple = ctx
        .accommodations()
        .assign_room(main.id, room(RoomType::Double, true, clients[..2].to_vec()))
        .await
        .unwrap();
    assert_eq!(couple.participant_ids.len(), 2);

    // Mismo segmento, otro hotel: sigue siendo una habitación por participante
    let error = ctx
        .accommodations()
        .assign_room(annex.id, room(RoomType::Single, false, vec![clients[0]]))
        .await
        .unwrap_err();
    assert_eq!(rule_of(&error), Some(Rule::RoomOccupancy));

    let single = ctx
        .accommodations()
        .assign_room(annex.id, room(RoomType::Single, false, vec![]))
        .await
        .unwrap();
    let single = ctx
        .accommodations()
        .add_room_participant(single.room.id, clients[2])
        .await
        .unwrap();
    assert_eq!(single.participant_ids, vec![clients[2]]);

    let error = ctx
        .accommodations()
        .add_room_participant(single.room.id, clients[1])
        .await
        .unwrap_err();
    assert!(matches!(error, AppError::Validation(_)));

    ctx.accommodations()
        .remove_room_participant(couple.room.id, clients[1])
        .await
        .unwrap();
    let listing = ctx.accommodations().list(seg.id).await.unwrap();
    let occupied: usize = listing
        .iter()
        .flat_map(|a| a.rooms.iter())
        .map(|r| r.participant_ids.len())
        .sum();
    assert_eq!(occupied, 2);
}

#[tokio::test]
async fn test_ledger_snapshot_and_route_delete_restriction() {
    let ctx = TestContext::new().await;
    let route = ctx.draft_route("Ledger route").await;
    let company = ctx
        .accounts()
        .create(account(AccountEntityType::Company, None, false))
        .await
        .unwrap();
    let hotel_account = ctx
        .accounts()
        .create(account(AccountEntityType::Hotel, Some(Uuid::new_v4()), false))
        .await
        .unwrap();

    let mut request = payment(route.id, 250);
    request.from_account_id = Some(company.id);
    request.to_account_id = Some(hotel_account.id);
    let entry = ctx.ledger().record(request).await.unwrap();
    assert_eq!(entry.currency, "EUR");
    assert_eq!(entry.snapshot.0.route.name, "Ledger route");
    assert_eq!(entry.snapshot.0.from_account.as_ref().map(|a| a.id), Some(company.id));

    ctx.routes()
        .update(
            route.id,
            UpdateRouteRequest {
                name: Some("Renamed".to_string()),
                description: None,
                currency: None,
                actual_cost: None,
            },
        )
        .await
        .unwrap();
    let stored = ctx.ledger().get(entry.id).await.unwrap();
    assert_eq!(stored.snapshot.0.route.name, "Ledger route");

    let mut same_accounts = payment(route.id, 10);
    same_accounts.from_account_id = Some(company.id);
    same_accounts.to_account_id = Some(company.id);
    let error = ctx.ledger().record(same_accounts).await.unwrap_err();
    assert_eq!(rule_of(&error), Some(Rule::LedgerAccounts));

    let entries = ctx
        .ledger()
        .list(LedgerQuery {
            route_id: Some(route.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);

    let error = ctx.routes().delete(route.id).await.unwrap_err();
    assert!(matches!(error, AppError::Conflict(_)));
    let error = ctx.accounts().delete(company.id).await.unwrap_err();
    assert!(matches!(error, AppError::Conflict(_)));

    let unreferenced = ctx.draft_route("Disposable").await;
    ctx.routes().delete(unreferenced.id).await.unwrap();
    let error = ctx.routes().get(unreferenced.id).await.unwrap_err();
    assert!(matches!(error, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_concurrent_segment_inserts_keep_totals_consistent() {
    let ctx = TestContext::new().await;
    let route = ctx.draft_route("Concurrent inserts").await;
    ctx.routes()
        .update_start_date(route.id, start_on(Some(date(2024, 9, 1))))
        .await
        .unwrap();

    let controller = ctx.segments();
    let inserts = (1..=8).map(|day| controller.add(route.id, segment(day, i64::from(day) * 3)));
    let results = futures::future::join_all(inserts).await;
    let segments: Vec<Segment> = results.into_iter().map(|r| r.unwrap()).collect();
    assert_eq!(segments.len(), 8);

    let detail = ctx.routes().get(route.id).await.unwrap();
    assert_eq!(detail.route.total_distance, Decimal::from(108));
    assert_eq!(detail.route.duration_days, Some(8));
    assert_eq!(detail.route.end_date, Some(date(2024, 9, 8)));
    assert!(segment_dates_consistent(&detail.route, &detail.segments));
    for (index, seg) in detail.segments.iter().enumerate() {
        assert_eq!(seg.order_index, index as i32 + 1);
        assert_eq!(seg.segment_date, Some(date(2024, 9, seg.day_number as u32)));
    }
}

#[tokio::test]
async fn test_recompute_is_idempotent() {
    let ctx = TestContext::new().await;
    let route = ctx.draft_route("Idempotence").await;
    ctx.segments().add(route.id, segment(1, 7)).await.unwrap();
    ctx.segments().add(route.id, segment(4, 9)).await.unwrap();

    let first = ctx.routes().recompute(route.id).await.unwrap();
    let second = ctx.routes().recompute(route.id).await.unwrap();
    assert_eq!(first.total_distance, second.total_distance);
    assert_eq!(first.duration_days, Some(4));
    assert_eq!(first.duration_days, second.duration_days);
    assert_eq!(first.estimated_cost, second.estimated_cost);
}

#[tokio::test]
async fn test_segment_edits_recompute_draft_route() {
    let ctx = TestContext::new().await;
    let route = ctx.draft_route("Segment edits").await;
    let first = ctx.segments().add(route.id, segment(1, 10)).await.unwrap();
    let second = ctx.segments().add(route.id, segment(2, 20)).await.unwrap();
    ctx.routes()
        .update_start_date(route.id, start_on(Some(date(2024, 6, 1))))
        .await
        .unwrap();

    let edit = UpdateSegmentRequest {
        distance: Some(Decimal::from(5)),
        ..Default::default()
    };
    ctx.segments().update(second.id, edit).await.unwrap();
    let detail = ctx.routes().get(route.id).await.unwrap();
    assert_eq!(detail.route.total_distance, Decimal::from(15));
    assert_eq!(detail.route.duration_days, Some(2));

    let edit = UpdateSegmentRequest {
        day_number: Some(4),
        ..Default::default()
    };
    let moved = ctx.segments().update(second.id, edit).await.unwrap();
    assert_eq!(moved.segment_date, Some(date(2024, 6, 4)));
    let detail = ctx.routes().get(route.id).await.unwrap();
    assert_eq!(detail.route.duration_days, Some(4));
    assert_eq!(detail.route.end_date, Some(date(2024, 6, 4)));
    assert!(segment_dates_consistent(&detail.route, &detail.segments));

    // El primer día pasa detrás del segundo: cambia el orden
    let edit = UpdateSegmentRequest {
        day_number: Some(5),
        distance: Some(Decimal::from(12)),
        ..Default::default()
    };
    let first = ctx.segments().update(first.id, edit).await.unwrap();
    assert_eq!(first.segment_date, Some(date(2024, 6, 5)));
    assert_eq!(first.order_index, 2);
    let detail = ctx.routes().get(route.id).await.unwrap();
    assert_eq!(detail.route.total_distance, Decimal::from(17));
    assert_eq!(detail.route.duration_days, Some(5));
    assert_eq!(detail.route.end_date, Some(date(2024, 6, 5)));
    let order: Vec<Uuid> = detail.segments.iter().map(|s| s.id).collect();
    assert_eq!(order, vec![second.id, first.id]);
}

#[tokio::test]
async fn test_logistics_edits_recompute_estimated_cost() {
    let ctx = TestContext::new().await;
    let route = ctx.draft_route("Logistics edits").await;
    let vehicle = ctx.seed("vehicles").await;
    let day = ctx.segments().add(route.id, segment(1, 10)).await.unwrap();

    let item = ctx
        .logistics()
        .add(
            route.id,
            logistics(LogisticsType::SupportVehicle, LogisticsEntityType::Vehicle, vehicle, 50, 2),
        )
        .await
        .unwrap();
    let cost = |detail: &tour_itinerary::dto::route_dto::RouteDetail| detail.route.estimated_cost;
    assert_eq!(cost(&ctx.routes().get(route.id).await.unwrap()), Decimal::from(100));

    let edit = UpdateLogisticsRequest {
        quantity: Some(3),
        ..Default::default()
    };
    ctx.logistics().update(item.id, edit).await.unwrap();
    assert_eq!(cost(&ctx.routes().get(route.id).await.unwrap()), Decimal::from(150));

    // Como extra-cost la cantidad deja de multiplicar
    let edit = UpdateLogisticsRequest {
        logistics_type: Some(LogisticsType::ExtraCost),
        ..Default::default()
    };
    ctx.logistics().update(item.id, edit).await.unwrap();
    assert_eq!(cost(&ctx.routes().get(route.id).await.unwrap()), Decimal::from(50));

    let edit = UpdateLogisticsRequest {
        cost: Some(Decimal::from(70)),
        ..Default::default()
    };
    ctx.logistics().update(item.id, edit).await.unwrap();
    assert_eq!(cost(&ctx.routes().get(route.id).await.unwrap()), Decimal::from(70));

    let edit = UpdateLogisticsRequest {
        logistics_type: Some(LogisticsType::SupportVehicle),
        ..Default::default()
    };
    ctx.logistics().update(item.id, edit).await.unwrap();
    assert_eq!(cost(&ctx.routes().get(route.id).await.unwrap()), Decimal::from(210));

    // Asignar a un día y devolverlo a nivel de ruta
    let edit = UpdateLogisticsRequest {
        segment_id: Some(Some(day.id)),
        ..Default::default()
    };
    let assigned = ctx.logistics().update(item.id, edit).await.unwrap();
    assert_eq!(assigned.segment_id, Some(day.id));

    let edit = UpdateLogisticsRequest {
        segment_id: Some(None),
        ..Default::default()
    };
    let cleared = ctx.logistics().update(item.id, edit).await.unwrap();
    assert_eq!(cleared.segment_id, None);
    assert_eq!(cleared.quantity, 3);
}

#[tokio::test]
async fn test_out_of_range_amounts_are_validation_errors() {
    let ctx = TestContext::new().await;
    let route = ctx.draft_route("Amount ranges").await;
    let vehicle = ctx.seed("vehicles").await;

    let error = ctx
        .logistics()
        .add(
            route.id,
            logistics(LogisticsType::SupportVehicle, LogisticsEntityType::Vehicle, vehicle, 1_000_000, 10_000_000),
        )
        .await
        .unwrap_err();
    assert_eq!(rule_of(&error), Some(Rule::LogisticsAmounts));

    ctx.logistics()
        .add(
            route.id,
            logistics(LogisticsType::SupportVehicle, LogisticsEntityType::Vehicle, vehicle, 600_000_000_000, 1),
        )
        .await
        .unwrap();
    let error = ctx
        .logistics()
        .add(
            route.id,
            logistics(LogisticsType::SupportVehicle, LogisticsEntityType::Vehicle, vehicle, 600_000_000_000, 1),
        )
        .await
        .unwrap_err();
    match &error {
        AppError::Validation(violation) => {
            assert_eq!(violation.rule, Rule::LogisticsAmounts);
            assert_eq!(violation.field, "estimated_cost");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    let detail = ctx.routes().get(route.id).await.unwrap();
    assert_eq!(detail.route.estimated_cost, Decimal::from(600_000_000_000i64));
    assert_eq!(ctx.logistics().list(route.id).await.unwrap().len(), 1);

    let error = ctx
        .ledger()
        .record(payment(route.id, 1_000_000_000_000))
        .await
        .unwrap_err();
    assert!(matches!(error, AppError::InvalidInput(_)));
}

#[tokio::test]
async fn test_day_number_beyond_route_calendar_is_rejected() {
    let ctx = TestContext::new().await;
    let route = ctx.draft_route("Far day").await;
    ctx.segments().add(route.id, segment(1, 10)).await.unwrap();
    ctx.routes()
        .update_start_date(route.id, start_on(Some(date(2024, 6, 1))))
        .await
        .unwrap();

    let error = ctx
        .segments()
        .add(route.id, segment(200_000_000, 10))
        .await
        .unwrap_err();
    assert_eq!(rule_of(&error), Some(Rule::SegmentDayNumber));

    let error = ctx
        .routes()
        .update_start_date(route.id, start_on(Some(NaiveDate::MAX)))
        .await
        .unwrap_err();
    assert_eq!(rule_of(&error), Some(Rule::RouteStartDate));

    let detail = ctx.routes().get(route.id).await.unwrap();
    assert_eq!(detail.route.duration_days, Some(1));
    assert_eq!(detail.route.start_date, Some(date(2024, 6, 1)));
    assert_eq!(detail.segments.len(), 1);
}

#[tokio::test]
async fn test_concurrent_primary_accounts_on_a_fresh_key() {
    let ctx = TestContext::new().await;
    let client = Uuid::new_v4();

    let controller = ctx.accounts();
    let creates = (0..2).map(|_| controller.create(account(AccountEntityType::Client, Some(client), true)));
    let results = futures::future::join_all(creates).await;
    for result in &results {
        assert!(result.is_ok(), "create failed: {:?}", result);
    }

    let accounts = ctx
        .accounts()
        .list(AccountFilters {
            entity_type: Some(AccountEntityType::Client),
            entity_id: Some(client),
        })
        .await
        .unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts.iter().filter(|a| a.is_primary).count(), 1);
}
