use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::conflict::ConflictType;
use crate::models::entity::BookingStatus;

/// Operator-chosen remedy for a detected conflict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ResolutionAction {
    CancelBooking {
        booking_id: String,
    },
    ReassignWorkspace {
        booking_id: String,
        workspace_id: String,
    },
    RemoveDedicated {
        employee_id: String,
    },
    UpdateEmployeeLocation {
        employee_id: String,
        location_id: String,
    },
    ReassignDedicated {
        employee_id: String,
        workspace_id: String,
    },
}

impl ResolutionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionAction::CancelBooking { .. } => "cancel_booking",
            ResolutionAction::ReassignWorkspace { .. } => "reassign_workspace",
            ResolutionAction::RemoveDedicated { .. } => "remove_dedicated",
            ResolutionAction::UpdateEmployeeLocation { .. } => "update_employee_location",
            ResolutionAction::ReassignDedicated { .. } => "reassign_dedicated",
        }
    }

    pub fn applies_to(&self, conflict_type: ConflictType) -> bool {
        use ConflictType::*;
        match self {
            ResolutionAction::CancelBooking { .. } | ResolutionAction::ReassignWorkspace { .. } => {
                matches!(conflict_type, LocationMismatch | DedicatedWorkspace | Overcapacity)
            }
            ResolutionAction::RemoveDedicated { .. } | ResolutionAction::ReassignDedicated { .. } => {
                matches!(conflict_type, DedicatedWorkspace | DedicatedLocationMismatch)
            }
            ResolutionAction::UpdateEmployeeLocation { .. } => {
                matches!(conflict_type, LocationMismatch | DedicatedLocationMismatch)
            }
        }
    }
}

impl fmt::Display for ResolutionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is performing a resolution. Passed explicitly instead of read from
/// ambient session state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActingUser {
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impersonating: Option<String>,
}

impl ActingUser {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: None,
            impersonating: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BookingUpdate {
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub status: Option<BookingStatus>,
}

/// Absent field leaves the value alone; explicit `null` clears it.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct EmployeeUpdate {
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub assigned_location_id: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub dedicated_workspace_id: Option<Option<String>>,
}

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionTarget {
    Booking,
    Employee,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionOutcome {
    pub conflict_id: String,
    pub action: String,
    pub target: ResolutionTarget,
    pub target_id: String,
    /// False when the store already held the requested state.
    pub changed: bool,
    pub resolved_by: String,
}
