use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::entity::{Employee, Workspace};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Booked,
    Dedicated,
    Assigned,
    Conflict,
    Unassigned,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Booked => "booked",
            AssignmentStatus::Dedicated => "dedicated",
            AssignmentStatus::Assigned => "assigned",
            AssignmentStatus::Conflict => "conflict",
            AssignmentStatus::Unassigned => "unassigned",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One employee's seat for one date. Produced fresh per planner run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub employee: Employee,
    pub workspace: Option<Workspace>,
    pub status: AssignmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
}

impl Assignment {
    pub fn workspace_id(&self) -> Option<&str> {
        self.workspace.as_ref().map(|ws| ws.id.as_str())
    }

    pub fn is_seated(&self) -> bool {
        self.workspace.is_some()
    }
}
