use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::conflict::{Conflict, ConflictFilter};
use crate::models::entity::Workspace;
use crate::models::resolution::{ActingUser, ResolutionAction, ResolutionOutcome};
use crate::models::seating::Assignment;
use crate::models::settings::AppSettings;
use crate::models::snapshot::Snapshot;
use crate::services::conflict_detector::{self, ConflictDetector};
use crate::services::eligibility::Eligibility;
use crate::services::resolution_service::ResolutionService;
use crate::services::roster_service::{DailyRoster, FloorPlanView, RosterService};
use crate::services::schedule_utils::{self, DateRange};
use crate::services::seating_planner::SeatingPlanner;
use crate::store::EntityStore;

/// Entry point for callers: fetches a fresh snapshot per call and runs the
/// engine over it. Nothing is cached between calls.
pub struct WorkspaceService<S: EntityStore> {
    store: Arc<S>,
    settings: AppSettings,
    roster: RosterService,
    detector: ConflictDetector,
    resolver: ResolutionService<S>,
}

impl<S: EntityStore + 'static> WorkspaceService<S> {
    pub fn new(store: Arc<S>, settings: AppSettings) -> AppResult<Self> {
        let eligibility = Eligibility::new(settings.office_weekdays()?);
        settings.tz()?;
        Ok(Self {
            resolver: ResolutionService::new(Arc::clone(&store)),
            store,
            roster: RosterService::new(SeatingPlanner::with_eligibility(eligibility.clone())),
            detector: ConflictDetector::with_eligibility(eligibility),
            settings,
        })
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn today(&self) -> AppResult<NaiveDate> {
        Ok(schedule_utils::today_in(self.settings.tz()?))
    }

    async fn snapshot(&self) -> AppResult<Snapshot> {
        let snapshot = self.store.fetch_snapshot().await?;
        debug!(
            target: "app::service",
            employees = snapshot.employees.len(),
            workspaces = snapshot.workspaces.len(),
            bookings = snapshot.bookings.len(),
            "snapshot fetched"
        );
        Ok(snapshot)
    }

    pub async fn seating_plan(&self, date: NaiveDate) -> AppResult<Vec<Assignment>> {
        let snapshot = self.snapshot().await?;
        Ok(self.roster.planner().plan(date, &snapshot))
    }

    pub async fn daily_roster(&self, date: NaiveDate) -> AppResult<DailyRoster> {
        let snapshot = self.snapshot().await?;
        Ok(self.roster.daily_roster(date, &snapshot))
    }

    pub async fn floor_plan(&self, date: NaiveDate, floor_id: &str) -> AppResult<FloorPlanView> {
        let snapshot = self.snapshot().await?;
        self.roster
            .floor_plan(date, floor_id, &snapshot)
            .ok_or_else(|| AppError::not_found("floor", floor_id))
    }

    pub async fn available_desks(&self, date: NaiveDate) -> AppResult<Vec<Workspace>> {
        let snapshot = self.snapshot().await?;
        Ok(self.roster.available_desks(date, &snapshot))
    }

    /// Days are scanned concurrently on the blocking pool and joined back in
    /// date order, so the result matches a sequential scan.
    pub async fn conflicts(
        &self,
        range: DateRange,
        filter: Option<ConflictFilter>,
    ) -> AppResult<Vec<Conflict>> {
        let filter = filter.unwrap_or(self.settings.default_conflict_filter);
        let snapshot = Arc::new(self.snapshot().await?);

        let handles: Vec<_> = range
            .days()
            .map(|date| {
                let snapshot = Arc::clone(&snapshot);
                let detector = self.detector.clone();
                tokio::task::spawn_blocking(move || detector.detect_for_date(date, &snapshot))
            })
            .collect();

        let mut conflicts = Vec::new();
        for handle in handles {
            let day = handle
                .await
                .map_err(|err| AppError::other(format!("conflict scan task failed: {err}")))?;
            conflicts.extend(day);
        }

        let conflicts = conflict_detector::finalize(conflicts, filter);
        info!(
            target: "app::conflicts",
            start = %schedule_utils::format_date(range.start()),
            end = %schedule_utils::format_date(range.end()),
            days = range.len_days(),
            count = conflicts.len(),
            "range conflicts computed"
        );
        Ok(conflicts)
    }

    pub async fn conflicts_today(&self, filter: Option<ConflictFilter>) -> AppResult<Vec<Conflict>> {
        let today = self.today()?;
        self.conflicts(DateRange::single(today), filter).await
    }

    /// Today plus the configured horizon.
    pub async fn upcoming_conflicts(
        &self,
        filter: Option<ConflictFilter>,
    ) -> AppResult<Vec<Conflict>> {
        let today = self.today()?;
        let range = DateRange::starting_at(today, self.settings.conflict_horizon_days);
        self.conflicts(range, filter).await
    }

    pub async fn resolve(
        &self,
        conflict: &Conflict,
        action: ResolutionAction,
        acting_user: &ActingUser,
    ) -> AppResult<ResolutionOutcome> {
        self.resolver.resolve(conflict, action, acting_user).await
    }
}
