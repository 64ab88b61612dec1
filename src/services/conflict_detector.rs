use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, Weekday};
use tracing::{debug, info};

use crate::models::conflict::{
    Conflict, ConflictDetails, ConflictFilter, ConflictType, OccupancySource, ZoneOccupant,
};
use crate::models::entity::{Booking, Employee};
use crate::models::snapshot::Snapshot;
use crate::services::eligibility::{self, Eligibility};
use crate::services::schedule_utils::{self, DateRange};
use crate::services::snapshot_index::SnapshotIndex;

/// Scans days for scheduling anomalies. Occupancy is derived from the
/// snapshot directly, not from a planner run, but with the planner's
/// eligibility rules.
#[derive(Debug, Clone, Default)]
pub struct ConflictDetector {
    eligibility: Eligibility,
}

impl ConflictDetector {
    pub fn new(office_days: Vec<Weekday>) -> Self {
        Self {
            eligibility: Eligibility::new(office_days),
        }
    }

    pub fn with_eligibility(eligibility: Eligibility) -> Self {
        Self { eligibility }
    }

    /// Filtered and severity-sorted conflicts for every day in `range`.
    pub fn detect(
        &self,
        range: &DateRange,
        snapshot: &Snapshot,
        filter: ConflictFilter,
    ) -> Vec<Conflict> {
        let index = SnapshotIndex::build(snapshot);
        let conflicts = range
            .days()
            .flat_map(|date| self.detect_with_index(date, snapshot, &index))
            .collect();
        let conflicts = finalize(conflicts, filter);

        info!(
            target: "app::conflicts",
            start = %schedule_utils::format_date(range.start()),
            end = %schedule_utils::format_date(range.end()),
            filter = ?filter,
            count = conflicts.len(),
            "conflict scan complete"
        );
        conflicts
    }

    /// Unfiltered conflicts for one day, in rule order.
    pub fn detect_for_date(&self, date: NaiveDate, snapshot: &Snapshot) -> Vec<Conflict> {
        let index = SnapshotIndex::build(snapshot);
        self.detect_with_index(date, snapshot, &index)
    }

    fn detect_with_index(
        &self,
        date: NaiveDate,
        snapshot: &Snapshot,
        index: &SnapshotIndex<'_>,
    ) -> Vec<Conflict> {
        let day_bookings = eligibility::active_bookings_on(date, &snapshot.bookings);
        let scheduled = self.eligibility.scheduled_employees(date, snapshot);
        let located: Vec<&Employee> = snapshot
            .employees
            .iter()
            .filter(|employee| employee.assigned_location_id.is_some())
            .collect();

        let mut conflicts = Vec::new();
        conflicts.extend(location_mismatches(date, &located, &day_bookings, index));
        conflicts.extend(dedicated_location_mismatches(date, &located, index));
        conflicts.extend(dedicated_workspace_conflicts(date, &scheduled, &day_bookings));
        conflicts.extend(overcapacity(date, snapshot, &scheduled, &day_bookings, index));
        conflicts.extend(insufficient_capacity(date, snapshot, &scheduled, &day_bookings, index));

        debug!(
            target: "app::conflicts",
            date = %schedule_utils::format_date(date),
            scheduled = scheduled.len(),
            bookings = day_bookings.len(),
            count = conflicts.len(),
            "day scanned"
        );
        conflicts
    }
}

/// Applies the type filter, then orders high severity first and by date
/// within a severity. The sort is stable, so remaining ties keep discovery
/// order.
pub fn finalize(mut conflicts: Vec<Conflict>, filter: ConflictFilter) -> Vec<Conflict> {
    conflicts.retain(|conflict| filter.matches(conflict.conflict_type));
    conflicts.sort_by_key(|conflict| (conflict.severity.rank(), conflict.date));
    conflicts
}

/// Conflicts over `range` with the default office-day model.
pub fn compute_conflicts(
    range: &DateRange,
    snapshot: &Snapshot,
    filter: ConflictFilter,
) -> Vec<Conflict> {
    ConflictDetector::default().detect(range, snapshot, filter)
}

fn location_mismatches(
    date: NaiveDate,
    located: &[&Employee],
    day_bookings: &[&Booking],
    index: &SnapshotIndex<'_>,
) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    for employee in located {
        let Some(assigned) = employee.assigned_location_id.as_deref() else {
            continue;
        };
        for booking in day_bookings.iter().filter(|b| b.is_for(&employee.email)) {
            let Some(booked) = index.location_of_workspace(&booking.workspace_id).known() else {
                continue;
            };
            if booked == assigned {
                continue;
            }
            conflicts.push(Conflict::new(
                ConflictType::LocationMismatch,
                date,
                &booking.id,
                format!(
                    "{} booked workspace {} at location {} but is assigned to {}",
                    employee.name, booking.workspace_id, booked, assigned
                ),
                ConflictDetails::LocationMismatch {
                    employee_id: employee.id.clone(),
                    employee_email: employee.email.clone(),
                    booking_id: booking.id.clone(),
                    workspace_id: booking.workspace_id.clone(),
                    assigned_location_id: assigned.to_string(),
                    booked_location_id: booked.to_string(),
                },
            ));
        }
    }
    conflicts
}

fn dedicated_location_mismatches(
    date: NaiveDate,
    located: &[&Employee],
    index: &SnapshotIndex<'_>,
) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    for employee in located {
        let (Some(assigned), Some(desk_id)) = (
            employee.assigned_location_id.as_deref(),
            employee.dedicated_workspace_id.as_deref(),
        ) else {
            continue;
        };
        let Some(desk_location) = index.location_of_workspace(desk_id).known() else {
            continue;
        };
        if desk_location == assigned {
            continue;
        }
        conflicts.push(Conflict::new(
            ConflictType::DedicatedLocationMismatch,
            date,
            &employee.id,
            format!(
                "{}'s dedicated workspace {} is at location {} but they are assigned to {}",
                employee.name, desk_id, desk_location, assigned
            ),
            ConflictDetails::DedicatedLocationMismatch {
                employee_id: employee.id.clone(),
                employee_email: employee.email.clone(),
                workspace_id: desk_id.to_string(),
                assigned_location_id: assigned.to_string(),
                dedicated_location_id: desk_location.to_string(),
            },
        ));
    }
    conflicts
}

fn dedicated_workspace_conflicts(
    date: NaiveDate,
    scheduled: &[&Employee],
    day_bookings: &[&Booking],
) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    for employee in scheduled {
        let Some(desk_id) = employee.dedicated_workspace_id.as_deref() else {
            continue;
        };
        let Some(booking) = eligibility::foreign_booking_on(desk_id, &employee.email, day_bookings)
        else {
            continue;
        };
        conflicts.push(Conflict::new(
            ConflictType::DedicatedWorkspace,
            date,
            &employee.id,
            format!(
                "{}'s dedicated workspace {} is booked by {}",
                employee.name, desk_id, booking.user_email
            ),
            ConflictDetails::DedicatedWorkspace {
                employee_id: employee.id.clone(),
                employee_email: employee.email.clone(),
                workspace_id: desk_id.to_string(),
                booking_id: booking.id.clone(),
                booked_by: booking.user_email.clone(),
            },
        ));
    }
    conflicts
}

fn overcapacity(
    date: NaiveDate,
    snapshot: &Snapshot,
    scheduled: &[&Employee],
    day_bookings: &[&Booking],
    index: &SnapshotIndex<'_>,
) -> Vec<Conflict> {
    let mut occupants: HashMap<&str, Vec<ZoneOccupant>> = HashMap::new();
    let mut counted: HashSet<&str> = HashSet::new();

    for booking in day_bookings {
        counted.insert(booking.workspace_id.as_str());
        if let Some(zone) = index.zone_of_workspace(&booking.workspace_id) {
            occupants.entry(zone.id.as_str()).or_default().push(ZoneOccupant {
                workspace_id: booking.workspace_id.clone(),
                user_email: booking.user_email.clone(),
                source: OccupancySource::Booking,
                booking_id: Some(booking.id.clone()),
            });
        }
    }

    // Holders who booked elsewhere are already counted at their booking.
    for employee in scheduled {
        let Some(desk_id) = employee.dedicated_workspace_id.as_deref() else {
            continue;
        };
        if counted.contains(desk_id)
            || eligibility::booking_for(&employee.email, day_bookings).is_some()
        {
            continue;
        }
        let Some(zone) = index.zone_of_workspace(desk_id) else {
            continue;
        };
        counted.insert(desk_id);
        occupants.entry(zone.id.as_str()).or_default().push(ZoneOccupant {
            workspace_id: desk_id.to_string(),
            user_email: employee.email.clone(),
            source: OccupancySource::Dedicated,
            booking_id: None,
        });
    }

    let mut conflicts = Vec::new();
    for zone in &snapshot.zones {
        let Some(zone_occupants) = occupants.remove(zone.id.as_str()) else {
            continue;
        };
        let workspace_count = index.active_workspace_count(&zone.id);
        let capacity_cap = (zone.capacity as usize).min(workspace_count);
        if zone_occupants.len() <= capacity_cap {
            continue;
        }
        conflicts.push(Conflict::new(
            ConflictType::Overcapacity,
            date,
            &zone.id,
            format!(
                "Zone {} has {} occupants but room for {}",
                zone.name.as_deref().unwrap_or(&zone.id),
                zone_occupants.len(),
                capacity_cap
            ),
            ConflictDetails::Overcapacity {
                zone_id: zone.id.clone(),
                capacity: zone.capacity,
                workspace_count,
                capacity_cap,
                bookings: zone_occupants,
            },
        ));
    }
    conflicts
}

fn insufficient_capacity(
    date: NaiveDate,
    snapshot: &Snapshot,
    scheduled: &[&Employee],
    day_bookings: &[&Booking],
    index: &SnapshotIndex<'_>,
) -> Vec<Conflict> {
    let mut occupied: HashSet<&str> = day_bookings
        .iter()
        .map(|booking| booking.workspace_id.as_str())
        .collect();

    let mut unassigned: Vec<&Employee> = Vec::new();
    for employee in scheduled {
        if eligibility::booking_for(&employee.email, day_bookings).is_some() {
            continue;
        }
        let usable_desk = employee
            .dedicated_workspace_id
            .as_deref()
            .and_then(|desk_id| index.workspace(desk_id))
            .filter(|desk| {
                !occupied.contains(desk.id.as_str())
                    && eligibility::foreign_booking_on(&desk.id, &employee.email, day_bookings)
                        .is_none()
            });
        match usable_desk {
            Some(desk) => {
                occupied.insert(desk.id.as_str());
            }
            None => unassigned.push(employee),
        }
    }

    let available_desks = snapshot
        .workspaces
        .iter()
        .filter(|workspace| {
            workspace.is_bookable_desk() && !occupied.contains(workspace.id.as_str())
        })
        .count();

    if available_desks >= unassigned.len() {
        return Vec::new();
    }

    let shortfall = unassigned.len() - available_desks;
    vec![Conflict::new(
        ConflictType::InsufficientCapacity,
        date,
        "capacity",
        format!(
            "{} employees need a desk but only {} are available ({} short)",
            unassigned.len(),
            available_desks,
            shortfall
        ),
        ConflictDetails::InsufficientCapacity {
            unassigned_count: unassigned.len(),
            available_desks,
            shortfall,
            unassigned_employee_ids: unassigned.iter().map(|e| e.id.clone()).collect(),
        },
    )]
}
