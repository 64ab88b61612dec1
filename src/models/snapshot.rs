//! Immutable bundle of entity collections handed to the engine.
//!
//! Shape checks happen here, at the data-access boundary, so the planner and
//! detector can stay total over whatever passes.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::error::{AppError, AppResult};
use crate::models::entity::{Booking, Employee, Floor, Location, OutOfOffice, Workspace, Zone};
use crate::services::schedule_utils;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern must compile")
});

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Snapshot {
    pub employees: Vec<Employee>,
    pub workspaces: Vec<Workspace>,
    pub zones: Vec<Zone>,
    pub floors: Vec<Floor>,
    pub locations: Vec<Location>,
    pub bookings: Vec<Booking>,
    pub out_of_office: Vec<OutOfOffice>,
}

impl Snapshot {
    pub fn from_json_str(raw: &str) -> AppResult<Self> {
        let snapshot: Snapshot = serde_json::from_str(raw)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn from_json_value(value: JsonValue) -> AppResult<Self> {
        let snapshot: Snapshot = serde_json::from_value(value)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Rejects snapshots whose records cannot be joined reliably. Dangling
    /// references (a workspace pointing at a missing zone) are allowed; the
    /// engine resolves those to an unknown location.
    pub fn validate(&self) -> AppResult<()> {
        let mut problems: Vec<String> = Vec::new();

        check_ids("employee", self.employees.iter().map(|e| e.id.as_str()), &mut problems);
        check_ids("workspace", self.workspaces.iter().map(|w| w.id.as_str()), &mut problems);
        check_ids("zone", self.zones.iter().map(|z| z.id.as_str()), &mut problems);
        check_ids("floor", self.floors.iter().map(|f| f.id.as_str()), &mut problems);
        check_ids("location", self.locations.iter().map(|l| l.id.as_str()), &mut problems);
        check_ids("booking", self.bookings.iter().map(|b| b.id.as_str()), &mut problems);

        let mut emails = HashSet::new();
        for employee in &self.employees {
            let email = employee.email.trim().to_ascii_lowercase();
            if !EMAIL_PATTERN.is_match(&email) {
                problems.push(format!(
                    "employee {} has an invalid email '{}'",
                    employee.id, employee.email
                ));
            } else if !emails.insert(email) {
                problems.push(format!("employee email '{}' is not unique", employee.email));
            }

            for day in &employee.work_days {
                if schedule_utils::parse_weekday(day).is_none() {
                    problems.push(format!(
                        "employee {} has an unknown work day '{}'",
                        employee.id, day
                    ));
                }
            }
        }

        for booking in &self.bookings {
            if booking.date().is_none() {
                problems.push(format!(
                    "booking {} has an unparseable date '{}'",
                    booking.id, booking.booking_date
                ));
            }
            if !EMAIL_PATTERN.is_match(booking.user_email.trim()) {
                problems.push(format!(
                    "booking {} has an invalid user email '{}'",
                    booking.id, booking.user_email
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation_with_details(
                format!("snapshot rejected with {} problem(s)", problems.len()),
                json!({ "problems": problems }),
            ))
        }
    }

    pub fn employee(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|employee| employee.id == id)
    }

    pub fn workspace(&self, id: &str) -> Option<&Workspace> {
        self.workspaces.iter().find(|workspace| workspace.id == id)
    }

    pub fn booking(&self, id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|booking| booking.id == id)
    }

    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|location| location.id == id)
    }
}

fn check_ids<'a>(
    entity: &str,
    ids: impl Iterator<Item = &'a str>,
    problems: &mut Vec<String>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            problems.push(format!("{entity} with an empty id"));
        } else if !seen.insert(id) {
            problems.push(format!("duplicate {entity} id '{id}'"));
        }
    }
}
