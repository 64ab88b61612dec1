use std::sync::Arc;

use chrono::NaiveDate;
use seatwise_lib::error::{AppError, AppResult};
use seatwise_lib::models::conflict::{Conflict, ConflictFilter, ConflictType};
use seatwise_lib::models::resolution::{ActingUser, ResolutionAction};
use seatwise_lib::models::seating::AssignmentStatus;
use seatwise_lib::models::settings::AppSettings;
use seatwise_lib::models::snapshot::Snapshot;
use seatwise_lib::services::schedule_utils::DateRange;
use seatwise_lib::services::workspace_service::WorkspaceService;
use seatwise_lib::store::{EntityStore, MemoryStore};

const OFFICE: &str = include_str!("../fixtures/office.json");

fn office() -> Snapshot {
    Snapshot::from_json_str(OFFICE).expect("fixture should validate")
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn service_over(snapshot: Snapshot) -> (Arc<MemoryStore>, WorkspaceService<MemoryStore>) {
    let store = Arc::new(MemoryStore::new(snapshot).expect("store"));
    let service =
        WorkspaceService::new(Arc::clone(&store), AppSettings::default()).expect("service");
    (store, service)
}

fn operator() -> ActingUser {
    ActingUser {
        role: Some("admin".into()),
        ..ActingUser::new("ops@acme.io")
    }
}

async fn first_of(
    service: &WorkspaceService<MemoryStore>,
    range: DateRange,
    conflict_type: ConflictType,
) -> AppResult<Option<Conflict>> {
    Ok(service
        .conflicts(range, Some(ConflictFilter::All))
        .await?
        .into_iter()
        .find(|conflict| conflict.conflict_type == conflict_type))
}

#[tokio::test]
async fn cancelling_the_intruding_booking_frees_the_dedicated_desk() -> AppResult<()> {
    let (_store, service) = service_over(office());
    let sunday = DateRange::single(day(2025, 5, 4));

    let conflict = first_of(&service, sunday, ConflictType::DedicatedWorkspace)
        .await?
        .expect("alice's desk is booked by carol");
    let action = ResolutionAction::CancelBooking {
        booking_id: "bk-carol".into(),
    };

    let outcome = service.resolve(&conflict, action.clone(), &operator()).await?;
    assert!(outcome.changed);
    assert_eq!(outcome.target_id, "bk-carol");
    assert_eq!(outcome.action, "cancel_booking");
    assert_eq!(outcome.resolved_by, "ops@acme.io");

    assert!(first_of(&service, sunday, ConflictType::DedicatedWorkspace)
        .await?
        .is_none());

    let plan = service.seating_plan(day(2025, 5, 4)).await?;
    let alice = plan
        .iter()
        .find(|a| a.employee.id == "alice")
        .expect("alice is scheduled");
    assert_eq!(alice.status, AssignmentStatus::Dedicated);
    assert_eq!(alice.workspace_id(), Some("q1"));

    let again = service.resolve(&conflict, action, &operator()).await?;
    assert!(!again.changed, "second cancel is a no-op");
    Ok(())
}

#[tokio::test]
async fn dedicated_location_mismatch_clears_after_either_remedy() -> AppResult<()> {
    let week = DateRange::new(day(2025, 5, 4), day(2025, 5, 5))?;

    let (_store, service) = service_over(office());
    let conflict = first_of(&service, week, ConflictType::DedicatedLocationMismatch)
        .await?
        .expect("erin's desk is at the branch");
    let outcome = service
        .resolve(
            &conflict,
            ResolutionAction::RemoveDedicated {
                employee_id: "erin".into(),
            },
            &operator(),
        )
        .await?;
    assert!(outcome.changed);
    assert!(first_of(&service, week, ConflictType::DedicatedLocationMismatch)
        .await?
        .is_none());

    let (store, service) = service_over(office());
    let conflict = first_of(&service, week, ConflictType::DedicatedLocationMismatch)
        .await?
        .expect("erin's desk is at the branch");

    let unknown = service
        .resolve(
            &conflict,
            ResolutionAction::UpdateEmployeeLocation {
                employee_id: "erin".into(),
                location_id: "moon-base".into(),
            },
            &operator(),
        )
        .await;
    assert!(unknown.expect_err("unknown location").is_not_found());

    service
        .resolve(
            &conflict,
            ResolutionAction::UpdateEmployeeLocation {
                employee_id: "erin".into(),
                location_id: "branch".into(),
            },
            &operator(),
        )
        .await?;
    let erin = store
        .list_employees()
        .await?
        .into_iter()
        .find(|e| e.id == "erin")
        .expect("erin");
    assert_eq!(erin.assigned_location_id.as_deref(), Some("branch"));
    assert_eq!(erin.dedicated_workspace_id.as_deref(), Some("b1"));
    assert!(first_of(&service, week, ConflictType::DedicatedLocationMismatch)
        .await?
        .is_none());
    Ok(())
}

#[tokio::test]
async fn reassignment_requires_an_active_desk() -> AppResult<()> {
    let (store, service) = service_over(office());
    let monday = DateRange::single(day(2025, 5, 5));
    let conflict = first_of(&service, monday, ConflictType::LocationMismatch)
        .await?
        .expect("bob booked the branch");

    let before = store.fetch_snapshot().await?;
    let err = service
        .resolve(
            &conflict,
            ResolutionAction::ReassignWorkspace {
                booking_id: "bk-bob".into(),
                workspace_id: "o-room".into(),
            },
            &operator(),
        )
        .await
        .expect_err("meeting rooms are not desks");
    assert!(matches!(err, AppError::Validation { .. }));
    assert_eq!(store.fetch_snapshot().await?, before);

    let outcome = service
        .resolve(
            &conflict,
            ResolutionAction::ReassignWorkspace {
                booking_id: "bk-bob".into(),
                workspace_id: "o2".into(),
            },
            &operator(),
        )
        .await?;
    assert!(outcome.changed);
    assert!(first_of(&service, monday, ConflictType::LocationMismatch)
        .await?
        .is_none());
    Ok(())
}

#[tokio::test]
async fn remedies_are_checked_against_the_conflict() -> AppResult<()> {
    let (_store, service) = service_over(office());
    let monday = DateRange::single(day(2025, 5, 5));
    let conflict = first_of(&service, monday, ConflictType::LocationMismatch)
        .await?
        .expect("bob booked the branch");

    let foreign = service
        .resolve(
            &conflict,
            ResolutionAction::CancelBooking {
                booking_id: "bk-dave".into(),
            },
            &operator(),
        )
        .await
        .expect_err("dave's booking is not part of this conflict");
    assert!(foreign.validation_details().is_some());

    let wrong_kind = service
        .resolve(
            &conflict,
            ResolutionAction::RemoveDedicated {
                employee_id: "bob".into(),
            },
            &operator(),
        )
        .await;
    assert!(matches!(wrong_kind, Err(AppError::Validation { .. })));
    Ok(())
}

#[tokio::test]
async fn capacity_shortfall_cannot_be_resolved_directly() -> AppResult<()> {
    let mut snapshot = office();
    for workspace in snapshot.workspaces.iter_mut() {
        if workspace.id.starts_with('o') || workspace.id == "q2" {
            workspace.active = false;
        }
    }
    let (_store, service) = service_over(snapshot);

    let conflict = first_of(
        &service,
        DateRange::single(day(2025, 5, 5)),
        ConflictType::InsufficientCapacity,
    )
    .await?
    .expect("carol has no desk on Monday");

    let result = service
        .resolve(
            &conflict,
            ResolutionAction::CancelBooking {
                booking_id: "bk-dave".into(),
            },
            &operator(),
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation { .. })));
    Ok(())
}

#[tokio::test]
async fn store_loads_snapshot_files_and_rejects_invalid_ones() -> AppResult<()> {
    let dir = tempfile::tempdir()?;
    let good = dir.path().join("office.json");
    std::fs::write(&good, OFFICE)?;
    let store = MemoryStore::from_json_file(&good)?;
    assert_eq!(store.fetch_snapshot().await?, office());

    let bad = dir.path().join("broken.json");
    std::fs::write(
        &bad,
        r#"{"employees": [{"id": "x", "name": "X", "email": "not-an-email"}]}"#,
    )?;
    let err = MemoryStore::from_json_file(&bad).expect_err("invalid email");
    assert!(err.validation_details().is_some());
    Ok(())
}
