use std::collections::HashMap;

use serde::Serialize;

use crate::models::entity::{Floor, Workspace, Zone};
use crate::models::snapshot::Snapshot;

pub const UNKNOWN_LOCATION: &str = "unknown";

/// Location derived through workspace -> zone -> floor. Any missing link
/// yields `Unknown` instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResolvedLocation<'a> {
    Known(&'a str),
    Unknown,
}

impl<'a> ResolvedLocation<'a> {
    pub fn as_str(&self) -> &'a str {
        match *self {
            ResolvedLocation::Known(id) => id,
            ResolvedLocation::Unknown => UNKNOWN_LOCATION,
        }
    }

    pub fn known(&self) -> Option<&'a str> {
        match *self {
            ResolvedLocation::Known(id) => Some(id),
            ResolvedLocation::Unknown => None,
        }
    }
}

/// Id lookups built once per engine invocation.
pub struct SnapshotIndex<'a> {
    workspaces: HashMap<&'a str, &'a Workspace>,
    zones: HashMap<&'a str, &'a Zone>,
    floors: HashMap<&'a str, &'a Floor>,
    active_workspaces_per_zone: HashMap<&'a str, usize>,
}

impl<'a> SnapshotIndex<'a> {
    pub fn build(snapshot: &'a Snapshot) -> Self {
        let mut active_workspaces_per_zone: HashMap<&str, usize> = HashMap::new();
        for workspace in snapshot.workspaces.iter().filter(|ws| ws.active) {
            *active_workspaces_per_zone
                .entry(workspace.zone_id.as_str())
                .or_insert(0) += 1;
        }

        Self {
            workspaces: snapshot
                .workspaces
                .iter()
                .map(|workspace| (workspace.id.as_str(), workspace))
                .collect(),
            zones: snapshot
                .zones
                .iter()
                .map(|zone| (zone.id.as_str(), zone))
                .collect(),
            floors: snapshot
                .floors
                .iter()
                .map(|floor| (floor.id.as_str(), floor))
                .collect(),
            active_workspaces_per_zone,
        }
    }

    pub fn workspace(&self, id: &str) -> Option<&'a Workspace> {
        self.workspaces.get(id).copied()
    }

    pub fn zone(&self, id: &str) -> Option<&'a Zone> {
        self.zones.get(id).copied()
    }

    pub fn floor(&self, id: &str) -> Option<&'a Floor> {
        self.floors.get(id).copied()
    }

    pub fn zone_of_workspace(&self, workspace_id: &str) -> Option<&'a Zone> {
        self.workspace(workspace_id)
            .and_then(|workspace| self.zone(&workspace.zone_id))
    }

    pub fn floor_of_workspace(&self, workspace_id: &str) -> Option<&'a Floor> {
        self.zone_of_workspace(workspace_id)
            .and_then(|zone| self.floor(&zone.floor_id))
    }

    /// The floor's `location_id` is taken as-is; a location record is not
    /// required for the id to count as known.
    pub fn location_of_workspace(&self, workspace_id: &str) -> ResolvedLocation<'a> {
        match self.floor_of_workspace(workspace_id) {
            Some(floor) => ResolvedLocation::Known(floor.location_id.as_str()),
            None => ResolvedLocation::Unknown,
        }
    }

    pub fn active_workspace_count(&self, zone_id: &str) -> usize {
        self.active_workspaces_per_zone
            .get(zone_id)
            .copied()
            .unwrap_or(0)
    }
}
