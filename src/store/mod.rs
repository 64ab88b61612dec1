//! Boundary to the external entity store. The engine never talks to it; the
//! orchestration layer fetches snapshots through it and resolution actions
//! write back through it.

use crate::error::AppResult;
use crate::models::entity::{Booking, Employee, Floor, Location, OutOfOffice, Workspace, Zone};
use crate::models::resolution::{BookingUpdate, EmployeeUpdate};
use crate::models::snapshot::Snapshot;

pub mod memory_store;

pub use memory_store::MemoryStore;

/// Shared store contract. Reads are plain list calls; the two writes are the
/// only mutations conflict resolution performs.
#[async_trait::async_trait]
pub trait EntityStore: Send + Sync {
    async fn list_employees(&self) -> AppResult<Vec<Employee>>;

    async fn list_workspaces(&self) -> AppResult<Vec<Workspace>>;

    async fn list_zones(&self) -> AppResult<Vec<Zone>>;

    async fn list_floors(&self) -> AppResult<Vec<Floor>>;

    async fn list_locations(&self) -> AppResult<Vec<Location>>;

    async fn list_bookings(&self) -> AppResult<Vec<Booking>>;

    async fn list_out_of_office(&self) -> AppResult<Vec<OutOfOffice>>;

    async fn update_booking(&self, id: &str, update: BookingUpdate) -> AppResult<Booking>;

    async fn update_employee(&self, id: &str, update: EmployeeUpdate) -> AppResult<Employee>;

    /// Reads every collection and validates the result.
    async fn fetch_snapshot(&self) -> AppResult<Snapshot> {
        let snapshot = Snapshot {
            employees: self.list_employees().await?,
            workspaces: self.list_workspaces().await?,
            zones: self.list_zones().await?,
            floors: self.list_floors().await?,
            locations: self.list_locations().await?,
            bookings: self.list_bookings().await?,
            out_of_office: self.list_out_of_office().await?,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }
}
