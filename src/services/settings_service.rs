use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::Weekday;
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::conflict::ConflictFilter;
use crate::models::settings::AppSettings;
use crate::services::schedule_utils;

const MAX_CONFLICT_HORIZON_DAYS: u32 = 92;

#[derive(Debug, Default, Clone)]
pub struct SettingsUpdateInput {
    pub office_days: Option<Vec<String>>,
    pub timezone: Option<String>,
    pub default_conflict_filter: Option<ConflictFilter>,
    pub conflict_horizon_days: Option<u32>,
    pub log_directives: Option<String>,
}

/// YAML-backed engine settings with an in-memory cache.
pub struct SettingsService {
    path: PathBuf,
    cache: RwLock<Option<AppSettings>>,
}

impl SettingsService {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> AppResult<AppSettings> {
        if let Ok(guard) = self.cache.read() {
            if let Some(settings) = guard.as_ref() {
                return Ok(settings.clone());
            }
        }

        let settings = self.load_from_disk()?;
        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(settings.clone());
        }
        Ok(settings)
    }

    pub fn update(&self, input: SettingsUpdateInput) -> AppResult<AppSettings> {
        let mut current = self.get()?;

        if let Some(days) = input.office_days {
            let normalized: Vec<String> = days
                .iter()
                .map(|day| day.trim().to_ascii_lowercase())
                .collect();
            current.office_days = normalized;
        }

        if let Some(timezone) = input.timezone {
            current.timezone = timezone.trim().to_string();
        }

        if let Some(filter) = input.default_conflict_filter {
            current.default_conflict_filter = filter;
        }

        if let Some(days) = input.conflict_horizon_days {
            current.conflict_horizon_days = days;
        }

        if let Some(directives) = input.log_directives {
            current.log_directives = directives;
        }

        ensure_valid(&current)?;
        self.save(&current)?;

        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(current.clone());
        }
        Ok(current)
    }

    pub fn save(&self, settings: &AppSettings) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_yaml::to_string(settings)?;
        std::fs::write(&self.path, raw)?;
        info!(target: "app::settings", path = %self.path.display(), "settings saved");
        Ok(())
    }

    fn load_from_disk(&self) -> AppResult<AppSettings> {
        if !self.path.exists() {
            warn!(
                target: "app::settings",
                path = %self.path.display(),
                "settings file missing, using defaults"
            );
            return Ok(AppSettings::default());
        }

        let raw = std::fs::read_to_string(&self.path)?;
        let settings: AppSettings = serde_yaml::from_str(&raw)?;
        ensure_valid(&settings)?;
        info!(target: "app::settings", path = %self.path.display(), "settings loaded");
        Ok(settings)
    }
}

impl AppSettings {
    pub fn office_weekdays(&self) -> AppResult<Vec<Weekday>> {
        schedule_utils::parse_office_days(&self.office_days)
    }

    pub fn tz(&self) -> AppResult<Tz> {
        schedule_utils::parse_timezone(&self.timezone)
    }
}

fn ensure_valid(settings: &AppSettings) -> AppResult<()> {
    if settings.office_days.is_empty() {
        return Err(AppError::validation("at least one office day is required"));
    }
    settings.office_weekdays()?;
    settings.tz()?;
    if settings.conflict_horizon_days == 0 || settings.conflict_horizon_days > MAX_CONFLICT_HORIZON_DAYS
    {
        return Err(AppError::validation(format!(
            "conflict horizon must be between 1 and {MAX_CONFLICT_HORIZON_DAYS} days"
        )));
    }
    Ok(())
}
