//! Read models built from one planner run: the daily roster table, the
//! floor-plan grid and the booking page's free-desk list.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::entity::Workspace;
use crate::models::seating::{Assignment, AssignmentStatus};
use crate::models::snapshot::Snapshot;
use crate::services::seating_planner::SeatingPlanner;
use crate::services::snapshot_index::{SnapshotIndex, UNKNOWN_LOCATION};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub zone_id: Option<String>,
    pub floor_id: Option<String>,
    /// Location id, or `"unknown"` when the seat cannot be traced to one.
    pub location_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RosterSummary {
    pub total: usize,
    pub booked: usize,
    pub dedicated: usize,
    pub assigned: usize,
    pub conflict: usize,
    pub unassigned: usize,
}

impl RosterSummary {
    pub fn from_assignments(assignments: &[Assignment]) -> Self {
        let mut summary = RosterSummary {
            total: assignments.len(),
            ..Default::default()
        };
        for assignment in assignments {
            match assignment.status {
                AssignmentStatus::Booked => summary.booked += 1,
                AssignmentStatus::Dedicated => summary.dedicated += 1,
                AssignmentStatus::Assigned => summary.assigned += 1,
                AssignmentStatus::Conflict => summary.conflict += 1,
                AssignmentStatus::Unassigned => summary.unassigned += 1,
            }
        }
        summary
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyRoster {
    pub date: NaiveDate,
    pub entries: Vec<RosterEntry>,
    pub summary: RosterSummary,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeatView {
    pub workspace: Workspace,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AssignmentStatus>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ZoneView {
    pub zone_id: String,
    pub name: Option<String>,
    pub capacity: u32,
    pub capacity_cap: usize,
    pub occupied: usize,
    pub seats: Vec<SeatView>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FloorPlanView {
    pub date: NaiveDate,
    pub floor_id: String,
    pub location_id: String,
    pub zones: Vec<ZoneView>,
}

#[derive(Debug, Clone, Default)]
pub struct RosterService {
    planner: SeatingPlanner,
}

impl RosterService {
    pub fn new(planner: SeatingPlanner) -> Self {
        Self { planner }
    }

    pub fn planner(&self) -> &SeatingPlanner {
        &self.planner
    }

    pub fn daily_roster(&self, date: NaiveDate, snapshot: &Snapshot) -> DailyRoster {
        let assignments = self.planner.plan(date, snapshot);
        build_daily_roster(date, snapshot, assignments)
    }

    /// `None` when the floor is not in the snapshot.
    pub fn floor_plan(
        &self,
        date: NaiveDate,
        floor_id: &str,
        snapshot: &Snapshot,
    ) -> Option<FloorPlanView> {
        let assignments = self.planner.plan(date, snapshot);
        build_floor_plan(date, floor_id, snapshot, &assignments)
    }

    pub fn available_desks(&self, date: NaiveDate, snapshot: &Snapshot) -> Vec<Workspace> {
        let assignments = self.planner.plan(date, snapshot);
        free_desks(snapshot, &assignments)
    }
}

pub fn build_daily_roster(
    date: NaiveDate,
    snapshot: &Snapshot,
    assignments: Vec<Assignment>,
) -> DailyRoster {
    let index = SnapshotIndex::build(snapshot);
    let summary = RosterSummary::from_assignments(&assignments);

    let mut entries: Vec<RosterEntry> = assignments
        .into_iter()
        .map(|assignment| {
            let (zone_id, floor_id, location_id) = match assignment.workspace_id() {
                Some(workspace_id) => (
                    index.zone_of_workspace(workspace_id).map(|z| z.id.clone()),
                    index.floor_of_workspace(workspace_id).map(|f| f.id.clone()),
                    Some(index.location_of_workspace(workspace_id).as_str().to_string()),
                ),
                None => (None, None, None),
            };
            RosterEntry {
                assignment,
                zone_id,
                floor_id,
                location_id,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        compare_names(&a.assignment.employee.name, &b.assignment.employee.name)
            .then_with(|| a.assignment.employee.id.cmp(&b.assignment.employee.id))
    });

    DailyRoster {
        date,
        entries,
        summary,
    }
}

pub fn build_floor_plan(
    date: NaiveDate,
    floor_id: &str,
    snapshot: &Snapshot,
    assignments: &[Assignment],
) -> Option<FloorPlanView> {
    let index = SnapshotIndex::build(snapshot);
    let floor = index.floor(floor_id)?;

    let by_workspace: HashMap<&str, &Assignment> = assignments
        .iter()
        .filter_map(|assignment| assignment.workspace_id().map(|id| (id, assignment)))
        .collect();

    let zones = snapshot
        .zones
        .iter()
        .filter(|zone| zone.floor_id == floor.id)
        .map(|zone| {
            let seats: Vec<SeatView> = snapshot
                .workspaces
                .iter()
                .filter(|workspace| workspace.zone_id == zone.id)
                .map(|workspace| {
                    let occupant = by_workspace.get(workspace.id.as_str());
                    SeatView {
                        workspace: workspace.clone(),
                        occupant_id: occupant.map(|a| a.employee.id.clone()),
                        occupant_name: occupant.map(|a| a.employee.name.clone()),
                        status: occupant.map(|a| a.status),
                    }
                })
                .collect();
            let workspace_count = index.active_workspace_count(&zone.id);
            ZoneView {
                zone_id: zone.id.clone(),
                name: zone.name.clone(),
                capacity: zone.capacity,
                capacity_cap: (zone.capacity as usize).min(workspace_count),
                occupied: seats.iter().filter(|seat| seat.occupant_id.is_some()).count(),
                seats,
            }
        })
        .collect();

    let location_id = if floor.location_id.trim().is_empty() {
        UNKNOWN_LOCATION.to_string()
    } else {
        floor.location_id.clone()
    };

    Some(FloorPlanView {
        date,
        floor_id: floor.id.clone(),
        location_id,
        zones,
    })
}

/// Active desks nobody sits at in `assignments`, in snapshot order.
pub fn free_desks(snapshot: &Snapshot, assignments: &[Assignment]) -> Vec<Workspace> {
    snapshot
        .workspaces
        .iter()
        .filter(|workspace| workspace.is_bookable_desk())
        .filter(|workspace| {
            !assignments
                .iter()
                .any(|assignment| assignment.workspace_id() == Some(workspace.id.as_str()))
        })
        .cloned()
        .collect()
}

/// Name ordering for people-facing lists: case and accents are ignored first,
/// then the raw names break ties.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(name: &str) -> String {
    name.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_accent)
        .collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => 'a',
        'ç' | 'č' | 'ć' => 'c',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'ī' => 'i',
        'ñ' | 'ń' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => 'o',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' => 'u',
        'ý' | 'ÿ' => 'y',
        'š' | 'ś' => 's',
        'ž' | 'ź' | 'ż' => 'z',
        'ł' => 'l',
        other => other,
    }
}
