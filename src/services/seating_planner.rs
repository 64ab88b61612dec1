use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, Weekday};
use tracing::{debug, info};

use crate::models::entity::{Employee, Workspace};
use crate::models::seating::{Assignment, AssignmentStatus};
use crate::models::snapshot::Snapshot;
use crate::services::eligibility::{self, Eligibility};
use crate::services::schedule_utils;
use crate::services::snapshot_index::SnapshotIndex;

/// Computes who sits where for a single day.
///
/// Placement runs in three strictly ordered passes, each seeing the seats
/// taken by the previous one:
///
/// 1. manual bookings (always honoured, eligibility is ignored),
/// 2. dedicated desks, unless someone else booked the desk,
/// 3. first free active desk, searching the preferred zone before the whole
///    pool.
///
/// Workspaces are searched in snapshot order; callers that need reproducible
/// seats must supply workspaces in a stable order.
#[derive(Debug, Clone, Default)]
pub struct SeatingPlanner {
    eligibility: Eligibility,
}

impl SeatingPlanner {
    pub fn new(office_days: Vec<Weekday>) -> Self {
        Self {
            eligibility: Eligibility::new(office_days),
        }
    }

    pub fn with_eligibility(eligibility: Eligibility) -> Self {
        Self { eligibility }
    }

    pub fn eligibility(&self) -> &Eligibility {
        &self.eligibility
    }

    /// One assignment per scheduled or manually booked employee, in
    /// placement order.
    pub fn plan(&self, date: NaiveDate, snapshot: &Snapshot) -> Vec<Assignment> {
        let index = SnapshotIndex::build(snapshot);
        let day_bookings = eligibility::active_bookings_on(date, &snapshot.bookings);

        // The first candidate record per employee id wins.
        let mut seen: HashSet<&str> = HashSet::new();
        let candidates: Vec<&Employee> = snapshot
            .employees
            .iter()
            .filter(|employee| {
                self.eligibility
                    .is_scheduled(employee, date, &snapshot.out_of_office)
                    || eligibility::booking_for(&employee.email, &day_bookings).is_some()
            })
            .filter(|&employee| seen.insert(employee.id.as_str()))
            .collect();

        // workspace id -> email of whoever holds it in this plan
        let mut occupied: HashMap<&str, &str> = HashMap::new();
        let mut assignments = Vec::with_capacity(candidates.len());

        let mut without_booking = Vec::new();
        for employee in candidates {
            let Some(booking) = eligibility::booking_for(&employee.email, &day_bookings) else {
                without_booking.push(employee);
                continue;
            };

            let workspace_id = booking.workspace_id.as_str();
            if let Some(holder) = occupied.get(workspace_id) {
                assignments.push(Assignment {
                    employee: employee.clone(),
                    workspace: None,
                    status: AssignmentStatus::Conflict,
                    conflict_reason: Some(format!("Workspace already booked by {holder}")),
                    booking_id: Some(booking.id.clone()),
                });
                continue;
            }

            occupied.insert(workspace_id, employee.email.as_str());
            assignments.push(Assignment {
                employee: employee.clone(),
                workspace: index.workspace(workspace_id).cloned(),
                status: AssignmentStatus::Booked,
                conflict_reason: None,
                booking_id: Some(booking.id.clone()),
            });
        }
        debug!(
            target: "app::seating",
            date = %schedule_utils::format_date(date),
            booked = assignments.len(),
            "manual bookings resolved"
        );

        let mut unplaced = Vec::new();
        for employee in without_booking {
            let Some(desk_id) = employee.dedicated_workspace_id.as_deref() else {
                unplaced.push(employee);
                continue;
            };

            if let Some(booking) =
                eligibility::foreign_booking_on(desk_id, &employee.email, &day_bookings)
            {
                assignments.push(Assignment {
                    employee: employee.clone(),
                    workspace: None,
                    status: AssignmentStatus::Conflict,
                    conflict_reason: Some(format!(
                        "Dedicated workspace booked by {}",
                        booking.user_email
                    )),
                    booking_id: None,
                });
                continue;
            }

            let Some(desk) = index.workspace(desk_id) else {
                debug!(
                    target: "app::seating",
                    employee_id = %employee.id,
                    %desk_id,
                    "dedicated workspace missing, falling back to pool"
                );
                unplaced.push(employee);
                continue;
            };

            if let Some(holder) = occupied.get(desk.id.as_str()) {
                assignments.push(Assignment {
                    employee: employee.clone(),
                    workspace: None,
                    status: AssignmentStatus::Conflict,
                    conflict_reason: Some(format!("Dedicated workspace already held by {holder}")),
                    booking_id: None,
                });
                continue;
            }

            occupied.insert(desk.id.as_str(), employee.email.as_str());
            assignments.push(Assignment {
                employee: employee.clone(),
                workspace: Some(desk.clone()),
                status: AssignmentStatus::Dedicated,
                conflict_reason: None,
                booking_id: None,
            });
        }

        // Desks booked by people outside the roster are still taken.
        let reserved: HashSet<&str> = day_bookings
            .iter()
            .map(|booking| booking.workspace_id.as_str())
            .collect();

        for employee in unplaced {
            let is_free = |workspace: &&Workspace| {
                workspace.is_bookable_desk()
                    && !occupied.contains_key(workspace.id.as_str())
                    && !reserved.contains(workspace.id.as_str())
            };

            let preferred = employee.preferred_zone_id.as_deref().and_then(|zone_id| {
                snapshot
                    .workspaces
                    .iter()
                    .filter(|workspace| workspace.zone_id == zone_id)
                    .find(is_free)
            });
            let seat = preferred.or_else(|| snapshot.workspaces.iter().find(is_free));

            match seat {
                Some(workspace) => {
                    occupied.insert(workspace.id.as_str(), employee.email.as_str());
                    assignments.push(Assignment {
                        employee: employee.clone(),
                        workspace: Some(workspace.clone()),
                        status: AssignmentStatus::Assigned,
                        conflict_reason: None,
                        booking_id: None,
                    });
                }
                None => assignments.push(Assignment {
                    employee: employee.clone(),
                    workspace: None,
                    status: AssignmentStatus::Unassigned,
                    conflict_reason: None,
                    booking_id: None,
                }),
            }
        }

        info!(
            target: "app::seating",
            date = %schedule_utils::format_date(date),
            assignments = assignments.len(),
            seated = assignments.iter().filter(|a| a.is_seated()).count(),
            "seating plan computed"
        );

        assignments
    }
}

/// Seating plan with the default office-day model.
pub fn compute_seating_plan(date: NaiveDate, snapshot: &Snapshot) -> Vec<Assignment> {
    SeatingPlanner::default().plan(date, snapshot)
}
