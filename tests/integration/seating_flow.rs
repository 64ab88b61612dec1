//! End-to-end seating scenarios over the shared office fixture.
//!
//! 2025-05-04 is a Sunday, 2025-05-05 a Monday, 2025-05-09 a Friday.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use seatwise_lib::models::seating::{Assignment, AssignmentStatus};
use seatwise_lib::models::settings::AppSettings;
use seatwise_lib::models::snapshot::Snapshot;
use seatwise_lib::services::seating_planner::{compute_seating_plan, SeatingPlanner};
use seatwise_lib::services::workspace_service::WorkspaceService;
use seatwise_lib::store::MemoryStore;

const OFFICE: &str = include_str!("../fixtures/office.json");

fn office() -> Snapshot {
    Snapshot::from_json_str(OFFICE).expect("fixture should validate")
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn find<'a>(plan: &'a [Assignment], employee_id: &str) -> Option<&'a Assignment> {
    plan.iter().find(|a| a.employee.id == employee_id)
}

#[test]
fn sunday_plan_honours_bookings_dedicated_desks_and_preferences() {
    let plan = compute_seating_plan(day(2025, 5, 4), &office());

    let ids: HashSet<_> = plan.iter().map(|a| a.employee.id.as_str()).collect();
    assert_eq!(ids, HashSet::from(["alice", "bob", "carol", "erin"]));

    let carol = find(&plan, "carol").expect("carol");
    assert_eq!(carol.status, AssignmentStatus::Booked);
    assert_eq!(carol.workspace_id(), Some("q1"));

    let alice = find(&plan, "alice").expect("alice");
    assert_eq!(alice.status, AssignmentStatus::Conflict);
    assert!(alice.workspace.is_none());
    assert_eq!(
        alice.conflict_reason.as_deref(),
        Some("Dedicated workspace booked by carol@acme.io")
    );

    let erin = find(&plan, "erin").expect("erin");
    assert_eq!(erin.status, AssignmentStatus::Dedicated);
    assert_eq!(erin.workspace_id(), Some("b1"));

    let bob = find(&plan, "bob").expect("bob");
    assert_eq!(bob.status, AssignmentStatus::Assigned);
    assert_eq!(bob.workspace_id(), Some("q2"), "preferred quiet zone is searched first");
}

#[test]
fn out_of_office_employee_appears_only_when_manually_booked() {
    let snapshot = office();

    let sunday = compute_seating_plan(day(2025, 5, 4), &snapshot);
    assert!(find(&sunday, "dave").is_none(), "approved absence removes dave");

    let monday = compute_seating_plan(day(2025, 5, 5), &snapshot);
    let dave = find(&monday, "dave").expect("manual booking overrides absence");
    assert_eq!(dave.status, AssignmentStatus::Booked);
    assert_eq!(dave.workspace_id(), Some("o1"));
}

#[test]
fn inactive_and_friday_only_staff_are_never_seated() {
    let snapshot = office();
    let sunday = compute_seating_plan(day(2025, 5, 4), &snapshot);
    assert!(find(&sunday, "frank").is_none(), "cancelled booking does not count");

    let friday = compute_seating_plan(day(2025, 5, 9), &snapshot);
    assert!(friday.is_empty(), "friday is not an office day");
}

#[test]
fn office_days_can_be_reconfigured() {
    let planner = SeatingPlanner::new(vec![chrono::Weekday::Fri]);
    let friday = planner.plan(day(2025, 5, 9), &office());
    let gil = find(&friday, "gil").expect("gil works fridays");
    assert_eq!(gil.status, AssignmentStatus::Assigned);
    assert_eq!(gil.workspace_id(), Some("q1"));
}

#[test]
fn every_day_in_a_week_has_unique_seats_and_is_repeatable() {
    let snapshot = office();
    for offset in 0..7 {
        let date = day(2025, 5, 4 + offset);
        let first = compute_seating_plan(date, &snapshot);
        let second = compute_seating_plan(date, &snapshot);
        assert_eq!(first, second, "plan for {date} must be idempotent");

        let mut seats = HashSet::new();
        for workspace in first.iter().filter_map(|a| a.workspace_id()) {
            assert!(seats.insert(workspace), "{workspace} double-assigned on {date}");
        }

        let mut people = HashSet::new();
        for assignment in &first {
            assert!(people.insert(assignment.employee.id.clone()));
        }
    }
}

#[tokio::test]
async fn roster_and_floor_views_come_from_fresh_snapshots() {
    let store = Arc::new(MemoryStore::new(office()).expect("store"));
    let service =
        WorkspaceService::new(Arc::clone(&store), AppSettings::default()).expect("service");

    let roster = service.daily_roster(day(2025, 5, 4)).await.expect("roster");
    let names: Vec<_> = roster
        .entries
        .iter()
        .map(|entry| entry.assignment.employee.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["Alice Levi", "bob Cohen", "Carol Mizrahi", "Erin Katz"]
    );
    assert_eq!(roster.summary.conflict, 1);
    assert_eq!(roster.summary.booked, 1);

    let erin = roster
        .entries
        .iter()
        .find(|entry| entry.assignment.employee.id == "erin")
        .expect("erin");
    assert_eq!(erin.location_id.as_deref(), Some("branch"));
    assert_eq!(erin.zone_id.as_deref(), Some("z-branch"));

    let floor = service.floor_plan(day(2025, 5, 4), "f1").await.expect("floor");
    assert_eq!(floor.location_id, "hq");
    let quiet = floor
        .zones
        .iter()
        .find(|zone| zone.zone_id == "z-quiet")
        .expect("quiet zone");
    assert_eq!(quiet.occupied, 2);

    let missing = service.floor_plan(day(2025, 5, 4), "f9").await;
    assert!(missing.expect_err("unknown floor").is_not_found());

    let free: Vec<_> = service
        .available_desks(day(2025, 5, 4))
        .await
        .expect("free desks")
        .into_iter()
        .map(|workspace| workspace.id)
        .collect();
    assert_eq!(free, vec!["o1", "o2", "o3"]);
}

#[tokio::test]
async fn roster_views_follow_configured_office_days() {
    let store = Arc::new(MemoryStore::new(office()).expect("store"));
    let settings = AppSettings {
        office_days: vec!["friday".into()],
        ..AppSettings::default()
    };
    let service = WorkspaceService::new(store, settings).expect("service");

    let friday = day(2025, 5, 9);
    let roster = service.daily_roster(friday).await.expect("roster");
    let ids: Vec<_> = roster
        .entries
        .iter()
        .map(|entry| entry.assignment.employee.id.as_str())
        .collect();
    assert_eq!(ids, vec!["gil"]);

    let free = service.available_desks(friday).await.expect("free desks");
    assert!(free.iter().all(|workspace| workspace.id != "q1"));

    let floor = service.floor_plan(friday, "f1").await.expect("floor");
    let quiet = floor
        .zones
        .iter()
        .find(|zone| zone.zone_id == "z-quiet")
        .expect("quiet zone");
    assert_eq!(quiet.occupied, 1);
}
