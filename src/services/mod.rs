pub mod conflict_detector;
pub mod eligibility;
pub mod resolution_service;
pub mod roster_service;
pub mod schedule_utils;
pub mod seating_planner;
pub mod settings_service;
pub mod snapshot_index;
pub mod workspace_service;
