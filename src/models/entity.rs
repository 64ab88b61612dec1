//! Read-only entity snapshots supplied by the external entity store.
//!
//! Field names follow the store's wire shape (`snake_case`). Nothing here is
//! mutated by the engine.

use std::fmt;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::services::schedule_utils;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub work_days: Vec<String>,
    #[serde(default)]
    pub assigned_location_id: Option<String>,
    #[serde(default)]
    pub dedicated_workspace_id: Option<String>,
    #[serde(default)]
    pub preferred_zone_id: Option<String>,
}

impl Employee {
    pub fn works_on(&self, weekday: Weekday) -> bool {
        let name = schedule_utils::weekday_name(weekday);
        self.work_days
            .iter()
            .any(|day| day.trim().eq_ignore_ascii_case(name))
    }

    /// Emails are the join key between employees, bookings and absences.
    pub fn has_email(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceType {
    Desk,
    MeetingRoom,
    PhoneBooth,
    CollaborationSpace,
    #[serde(other)]
    Other,
}

impl WorkspaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceType::Desk => "desk",
            WorkspaceType::MeetingRoom => "meeting_room",
            WorkspaceType::PhoneBooth => "phone_booth",
            WorkspaceType::CollaborationSpace => "collaboration_space",
            WorkspaceType::Other => "other",
        }
    }
}

impl fmt::Display for WorkspaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Workspace {
    pub id: String,
    pub zone_id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub workspace_type: WorkspaceType,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Workspace {
    /// Only active desks take part in automatic seating.
    pub fn is_bookable_desk(&self) -> bool {
        self.active && self.workspace_type == WorkspaceType::Desk
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Zone {
    pub id: String,
    pub floor_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub zone_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Floor {
    pub id: String,
    pub location_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    CheckedIn,
    NoShow,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::CheckedIn => "checked_in",
            BookingStatus::NoShow => "no_show",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Booking {
    pub id: String,
    pub workspace_id: String,
    pub user_email: String,
    pub booking_date: String,
    pub status: BookingStatus,
}

impl Booking {
    pub fn is_active(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }

    pub fn date(&self) -> Option<NaiveDate> {
        schedule_utils::parse_date_lenient(&self.booking_date)
    }

    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.is_active() && self.date() == Some(date)
    }

    pub fn is_for(&self, email: &str) -> bool {
        self.user_email.trim().eq_ignore_ascii_case(email.trim())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutOfOfficeStatus {
    Approved,
    Pending,
    Rejected,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutOfOffice {
    pub employee_email: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    pub status: OutOfOfficeStatus,
}

impl OutOfOffice {
    /// Approved absence whose inclusive interval contains `date`. Records with
    /// a missing or unparseable bound never match.
    pub fn covers(&self, date: NaiveDate) -> bool {
        if self.status != OutOfOfficeStatus::Approved {
            return false;
        }
        let start = self
            .start_date
            .as_deref()
            .and_then(schedule_utils::parse_date_lenient);
        let end = self
            .end_date
            .as_deref()
            .and_then(schedule_utils::parse_date_lenient);
        match (start, end) {
            (Some(start), Some(end)) => start <= date && date <= end,
            _ => false,
        }
    }

    pub fn is_for(&self, email: &str) -> bool {
        self.employee_email
            .trim()
            .eq_ignore_ascii_case(email.trim())
    }
}

fn default_true() -> bool {
    true
}
