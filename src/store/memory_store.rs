use std::path::Path;
use std::sync::RwLock;

use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::entity::{Booking, Employee, Floor, Location, OutOfOffice, Workspace, Zone};
use crate::models::resolution::{BookingUpdate, EmployeeUpdate};
use crate::models::snapshot::Snapshot;
use crate::store::EntityStore;

/// In-process store over a single snapshot. Updates are checked before they
/// are applied, so a failed write leaves the data untouched.
#[derive(Debug)]
pub struct MemoryStore {
    data: RwLock<Snapshot>,
}

impl MemoryStore {
    pub fn new(snapshot: Snapshot) -> AppResult<Self> {
        snapshot.validate()?;
        Ok(Self {
            data: RwLock::new(snapshot),
        })
    }

    pub fn from_json_file(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let snapshot = Snapshot::from_json_str(&raw)?;
        info!(
            target: "app::store",
            path = %path.display(),
            employees = snapshot.employees.len(),
            workspaces = snapshot.workspaces.len(),
            bookings = snapshot.bookings.len(),
            "loaded snapshot file"
        );
        Ok(Self {
            data: RwLock::new(snapshot),
        })
    }

    fn read<T>(&self, f: impl FnOnce(&Snapshot) -> T) -> AppResult<T> {
        let guard = self
            .data
            .read()
            .map_err(|_| AppError::store("memory store lock poisoned"))?;
        Ok(f(&guard))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Snapshot) -> AppResult<T>) -> AppResult<T> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| AppError::store("memory store lock poisoned"))?;
        f(&mut guard)
    }
}

#[async_trait::async_trait]
impl EntityStore for MemoryStore {
    async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        self.read(|data| data.employees.clone())
    }

    async fn list_workspaces(&self) -> AppResult<Vec<Workspace>> {
        self.read(|data| data.workspaces.clone())
    }

    async fn list_zones(&self) -> AppResult<Vec<Zone>> {
        self.read(|data| data.zones.clone())
    }

    async fn list_floors(&self) -> AppResult<Vec<Floor>> {
        self.read(|data| data.floors.clone())
    }

    async fn list_locations(&self) -> AppResult<Vec<Location>> {
        self.read(|data| data.locations.clone())
    }

    async fn list_bookings(&self) -> AppResult<Vec<Booking>> {
        self.read(|data| data.bookings.clone())
    }

    async fn list_out_of_office(&self) -> AppResult<Vec<OutOfOffice>> {
        self.read(|data| data.out_of_office.clone())
    }

    /// One read guard for all collections, so a concurrent update is seen
    /// either entirely or not at all.
    async fn fetch_snapshot(&self) -> AppResult<Snapshot> {
        let snapshot = self.read(Snapshot::clone)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    async fn update_booking(&self, id: &str, update: BookingUpdate) -> AppResult<Booking> {
        self.write(|data| {
            if let Some(workspace_id) = update.workspace_id.as_deref() {
                if data.workspace(workspace_id).is_none() {
                    return Err(AppError::not_found("workspace", workspace_id));
                }
            }

            let booking = data
                .bookings
                .iter_mut()
                .find(|booking| booking.id == id)
                .ok_or_else(|| AppError::not_found("booking", id))?;

            if let Some(workspace_id) = update.workspace_id {
                booking.workspace_id = workspace_id;
            }
            if let Some(status) = update.status {
                booking.status = status;
            }
            debug!(target: "app::store", booking_id = %id, "booking updated");
            Ok(booking.clone())
        })
    }

    async fn update_employee(&self, id: &str, update: EmployeeUpdate) -> AppResult<Employee> {
        self.write(|data| {
            if let Some(Some(workspace_id)) = update.dedicated_workspace_id.as_ref() {
                if data.workspace(workspace_id).is_none() {
                    return Err(AppError::not_found("workspace", workspace_id.clone()));
                }
            }
            if let Some(Some(location_id)) = update.assigned_location_id.as_ref() {
                if data.location(location_id).is_none() {
                    return Err(AppError::not_found("location", location_id.clone()));
                }
            }

            let employee = data
                .employees
                .iter_mut()
                .find(|employee| employee.id == id)
                .ok_or_else(|| AppError::not_found("employee", id))?;

            if let Some(location) = update.assigned_location_id {
                employee.assigned_location_id = location;
            }
            if let Some(desk) = update.dedicated_workspace_id {
                employee.dedicated_workspace_id = desk;
            }
            debug!(target: "app::store", employee_id = %id, "employee updated");
            Ok(employee.clone())
        })
    }
}
