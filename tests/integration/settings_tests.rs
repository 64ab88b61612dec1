use std::sync::Arc;

use chrono::Weekday;
use seatwise_lib::error::AppResult;
use seatwise_lib::models::conflict::ConflictFilter;
use seatwise_lib::models::settings::{AppSettings, DEFAULT_CONFLICT_HORIZON_DAYS};
use seatwise_lib::models::snapshot::Snapshot;
use seatwise_lib::services::settings_service::{SettingsService, SettingsUpdateInput};
use seatwise_lib::services::workspace_service::WorkspaceService;
use seatwise_lib::store::MemoryStore;
use tempfile::tempdir;

#[test]
fn missing_file_yields_defaults() -> AppResult<()> {
    let dir = tempdir()?;
    let service = SettingsService::new(dir.path().join("settings.yaml"));

    let settings = service.get()?;
    assert_eq!(settings, AppSettings::default());
    assert_eq!(settings.timezone, "UTC");
    assert_eq!(settings.conflict_horizon_days, DEFAULT_CONFLICT_HORIZON_DAYS);
    assert_eq!(
        settings.office_weekdays()?,
        vec![
            Weekday::Sun,
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu
        ]
    );
    assert!(!service.path().exists(), "reading must not create the file");
    Ok(())
}

#[test]
fn updates_persist_across_service_instances() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("config").join("settings.yaml");

    let service = SettingsService::new(&path);
    let updated = service.update(SettingsUpdateInput {
        timezone: Some(" Asia/Jerusalem ".into()),
        office_days: Some(vec!["Monday".into(), "TUESDAY".into()]),
        default_conflict_filter: Some(ConflictFilter::Dedicated),
        conflict_horizon_days: Some(14),
        ..Default::default()
    })?;
    assert_eq!(updated.timezone, "Asia/Jerusalem");
    assert_eq!(updated.office_days, vec!["monday", "tuesday"]);

    let reopened = SettingsService::new(&path).get()?;
    assert_eq!(reopened, updated);
    assert_eq!(reopened.tz()?, chrono_tz::Asia::Jerusalem);
    assert_eq!(reopened.office_weekdays()?, vec![Weekday::Mon, Weekday::Tue]);
    Ok(())
}

#[test]
fn invalid_updates_leave_the_file_untouched() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("settings.yaml");
    let service = SettingsService::new(&path);
    service.update(SettingsUpdateInput {
        conflict_horizon_days: Some(30),
        ..Default::default()
    })?;
    let before = std::fs::read_to_string(&path)?;

    let bad_zone = service.update(SettingsUpdateInput {
        timezone: Some("Mars/Olympus".into()),
        ..Default::default()
    });
    assert!(bad_zone.is_err());

    let bad_day = service.update(SettingsUpdateInput {
        office_days: Some(vec!["someday".into()]),
        ..Default::default()
    });
    assert!(bad_day.is_err());

    let bad_horizon = service.update(SettingsUpdateInput {
        conflict_horizon_days: Some(0),
        ..Default::default()
    });
    assert!(bad_horizon.is_err());

    assert_eq!(std::fs::read_to_string(&path)?, before);
    assert_eq!(service.get()?.conflict_horizon_days, 30);
    Ok(())
}

#[test]
fn malformed_yaml_is_reported() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("settings.yaml");
    std::fs::write(&path, "officeDays: [unclosed\n")?;

    assert!(SettingsService::new(&path).get().is_err());
    Ok(())
}

#[tokio::test]
async fn workspace_service_rejects_invalid_settings() {
    let store = Arc::new(MemoryStore::new(Snapshot::default()).expect("empty store"));
    let settings = AppSettings {
        timezone: "Nowhere/Land".into(),
        ..AppSettings::default()
    };
    assert!(WorkspaceService::new(store, settings).is_err());
}

#[tokio::test]
async fn upcoming_conflicts_use_configured_horizon() -> AppResult<()> {
    let store = Arc::new(MemoryStore::new(Snapshot::default())?);
    let settings = AppSettings {
        conflict_horizon_days: 3,
        ..AppSettings::default()
    };
    let service = WorkspaceService::new(store, settings)?;

    assert!(service.upcoming_conflicts(None).await?.is_empty());
    assert!(service.conflicts_today(None).await?.is_empty());
    Ok(())
}
