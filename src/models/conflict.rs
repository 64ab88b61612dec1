use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    DedicatedWorkspace,
    LocationMismatch,
    DedicatedLocationMismatch,
    Overcapacity,
    InsufficientCapacity,
}

impl ConflictType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictType::DedicatedWorkspace => "dedicated_workspace",
            ConflictType::LocationMismatch => "location_mismatch",
            ConflictType::DedicatedLocationMismatch => "dedicated_location_mismatch",
            ConflictType::Overcapacity => "overcapacity",
            ConflictType::InsufficientCapacity => "insufficient_capacity",
        }
    }

    pub fn severity(&self) -> ConflictSeverity {
        match self {
            ConflictType::DedicatedWorkspace
            | ConflictType::DedicatedLocationMismatch
            | ConflictType::InsufficientCapacity => ConflictSeverity::High,
            ConflictType::LocationMismatch | ConflictType::Overcapacity => {
                ConflictSeverity::Medium
            }
        }
    }
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSeverity {
    High,
    Medium,
}

impl ConflictSeverity {
    /// Sort key: high before medium.
    pub fn rank(&self) -> u8 {
        match self {
            ConflictSeverity::High => 0,
            ConflictSeverity::Medium => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictSeverity::High => "high",
            ConflictSeverity::Medium => "medium",
        }
    }
}

impl fmt::Display for ConflictSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConflictFilter {
    #[default]
    All,
    Dedicated,
    Overcapacity,
}

impl ConflictFilter {
    pub fn matches(&self, conflict_type: ConflictType) -> bool {
        match self {
            ConflictFilter::All => true,
            ConflictFilter::Dedicated => conflict_type == ConflictType::DedicatedWorkspace,
            ConflictFilter::Overcapacity => conflict_type == ConflictType::Overcapacity,
        }
    }
}

impl TryFrom<&str> for ConflictFilter {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(ConflictFilter::All),
            "dedicated" => Ok(ConflictFilter::Dedicated),
            "overcapacity" => Ok(ConflictFilter::Overcapacity),
            other => Err(format!("unsupported conflict filter: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OccupancySource {
    Booking,
    Dedicated,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ZoneOccupant {
    pub workspace_id: String,
    pub user_email: String,
    pub source: OccupancySource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
}

/// Type-specific payload. Ids reference the snapshot the conflict was
/// detected against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConflictDetails {
    #[serde(rename_all = "camelCase")]
    DedicatedWorkspace {
        employee_id: String,
        employee_email: String,
        workspace_id: String,
        booking_id: String,
        booked_by: String,
    },
    #[serde(rename_all = "camelCase")]
    LocationMismatch {
        employee_id: String,
        employee_email: String,
        booking_id: String,
        workspace_id: String,
        assigned_location_id: String,
        booked_location_id: String,
    },
    #[serde(rename_all = "camelCase")]
    DedicatedLocationMismatch {
        employee_id: String,
        employee_email: String,
        workspace_id: String,
        assigned_location_id: String,
        dedicated_location_id: String,
    },
    #[serde(rename_all = "camelCase")]
    Overcapacity {
        zone_id: String,
        capacity: u32,
        workspace_count: usize,
        capacity_cap: usize,
        bookings: Vec<ZoneOccupant>,
    },
    #[serde(rename_all = "camelCase")]
    InsufficientCapacity {
        unassigned_count: usize,
        available_desks: usize,
        shortfall: usize,
        unassigned_employee_ids: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub id: String,
    #[serde(rename = "type")]
    pub conflict_type: ConflictType,
    pub date: NaiveDate,
    pub severity: ConflictSeverity,
    pub description: String,
    pub details: ConflictDetails,
}

impl Conflict {
    /// Builds a conflict whose id is the `date:type:subject` composite.
    pub fn new(
        conflict_type: ConflictType,
        date: NaiveDate,
        subject: &str,
        description: impl Into<String>,
        details: ConflictDetails,
    ) -> Self {
        Self {
            id: format!("{}:{}:{}", date.format("%Y-%m-%d"), conflict_type, subject),
            conflict_type,
            date,
            severity: conflict_type.severity(),
            description: description.into(),
            details,
        }
    }

    pub fn employee_id(&self) -> Option<&str> {
        match &self.details {
            ConflictDetails::DedicatedWorkspace { employee_id, .. }
            | ConflictDetails::LocationMismatch { employee_id, .. }
            | ConflictDetails::DedicatedLocationMismatch { employee_id, .. } => {
                Some(employee_id.as_str())
            }
            _ => None,
        }
    }

    /// Bookings this conflict refers to; overcapacity lists every booking in
    /// the zone.
    pub fn booking_ids(&self) -> Vec<&str> {
        match &self.details {
            ConflictDetails::DedicatedWorkspace { booking_id, .. }
            | ConflictDetails::LocationMismatch { booking_id, .. } => vec![booking_id.as_str()],
            ConflictDetails::Overcapacity { bookings, .. } => bookings
                .iter()
                .filter_map(|occupant| occupant.booking_id.as_deref())
                .collect(),
            _ => Vec::new(),
        }
    }
}
