//! Who is expected in the office on a given day. Shared by the planner and
//! the conflict detector so both agree on the scheduled set.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::entity::{Booking, Employee, OutOfOffice};
use crate::models::snapshot::Snapshot;
use crate::services::schedule_utils;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eligibility {
    office_days: Vec<Weekday>,
}

impl Default for Eligibility {
    fn default() -> Self {
        Self::new(schedule_utils::default_office_days())
    }
}

impl Eligibility {
    pub fn new(office_days: Vec<Weekday>) -> Self {
        Self { office_days }
    }

    pub fn office_days(&self) -> &[Weekday] {
        &self.office_days
    }

    pub fn is_office_day(&self, date: NaiveDate) -> bool {
        self.office_days.contains(&date.weekday())
    }

    /// Active, working that weekday on an office day, and not covered by an
    /// approved absence.
    pub fn is_scheduled(
        &self,
        employee: &Employee,
        date: NaiveDate,
        out_of_office: &[OutOfOffice],
    ) -> bool {
        employee.active
            && self.is_office_day(date)
            && employee.works_on(date.weekday())
            && !out_of_office
                .iter()
                .any(|ooo| ooo.is_for(&employee.email) && ooo.covers(date))
    }

    pub fn scheduled_employees<'a>(
        &self,
        date: NaiveDate,
        snapshot: &'a Snapshot,
    ) -> Vec<&'a Employee> {
        snapshot
            .employees
            .iter()
            .filter(|employee| self.is_scheduled(employee, date, &snapshot.out_of_office))
            .collect()
    }
}

/// Non-cancelled bookings dated `date`, in collection order.
pub fn active_bookings_on(date: NaiveDate, bookings: &[Booking]) -> Vec<&Booking> {
    bookings
        .iter()
        .filter(|booking| booking.is_active_on(date))
        .collect()
}

/// First active booking `email` holds on the day, if any.
pub fn booking_for<'a>(email: &str, day_bookings: &[&'a Booking]) -> Option<&'a Booking> {
    day_bookings
        .iter()
        .copied()
        .find(|booking| booking.is_for(email))
}

/// First active booking on `workspace_id` made by someone other than `email`.
pub fn foreign_booking_on<'a>(
    workspace_id: &str,
    email: &str,
    day_bookings: &[&'a Booking],
) -> Option<&'a Booking> {
    day_bookings
        .iter()
        .copied()
        .find(|booking| booking.workspace_id == workspace_id && !booking.is_for(email))
}
