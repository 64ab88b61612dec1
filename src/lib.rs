//! Daily seating assignment and scheduling-conflict detection for a
//! workspace-booking system.
//!
//! The engine ([`services::seating_planner`], [`services::conflict_detector`])
//! is a pure function of an entity [`models::snapshot::Snapshot`]. The
//! [`services::workspace_service::WorkspaceService`] wraps it for callers that
//! read from an [`store::EntityStore`].

pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;

pub use models::conflict::{Conflict, ConflictFilter, ConflictSeverity, ConflictType};
pub use models::seating::{Assignment, AssignmentStatus};
pub use models::snapshot::Snapshot;
pub use services::conflict_detector::compute_conflicts;
pub use services::schedule_utils::DateRange;
pub use services::seating_planner::compute_seating_plan;
