use serde::{Deserialize, Serialize};

use crate::models::conflict::ConflictFilter;
use crate::services::schedule_utils::DEFAULT_OFFICE_DAYS;

pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_CONFLICT_HORIZON_DAYS: u32 = 7;
pub const DEFAULT_LOG_DIRECTIVES: &str = "info,app::seating=info,app::conflicts=info";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Lower-case weekday names the office is open.
    pub office_days: Vec<String>,
    /// IANA zone used to resolve "today".
    pub timezone: String,
    pub default_conflict_filter: ConflictFilter,
    /// Days covered by the range view, today included.
    pub conflict_horizon_days: u32,
    pub log_directives: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            office_days: DEFAULT_OFFICE_DAYS
                .iter()
                .map(|day| day.to_string())
                .collect(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            default_conflict_filter: ConflictFilter::All,
            conflict_horizon_days: DEFAULT_CONFLICT_HORIZON_DAYS,
            log_directives: DEFAULT_LOG_DIRECTIVES.to_string(),
        }
    }
}
