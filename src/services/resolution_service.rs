use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::conflict::Conflict;
use crate::models::entity::{Booking, BookingStatus, Employee};
use crate::models::resolution::{
    ActingUser, BookingUpdate, EmployeeUpdate, ResolutionAction, ResolutionOutcome,
    ResolutionTarget,
};
use crate::store::EntityStore;

/// Turns an operator's remedy into exactly one store mutation.
///
/// Detection is never re-run here; callers fetch a fresh snapshot afterwards.
/// Remedies that would not change anything report `changed = false` and skip
/// the write, so repeating a call is harmless.
pub struct ResolutionService<S: EntityStore> {
    store: Arc<S>,
}

impl<S: EntityStore> ResolutionService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn resolve(
        &self,
        conflict: &Conflict,
        action: ResolutionAction,
        acting_user: &ActingUser,
    ) -> AppResult<ResolutionOutcome> {
        ensure_applicable(conflict, &action)?;

        let action_name = action.as_str();
        let (target, target_id, changed) = match action {
            ResolutionAction::CancelBooking { booking_id } => {
                let booking = self.booking(&booking_id).await?;
                let changed = booking.status != BookingStatus::Cancelled;
                if changed {
                    self.store
                        .update_booking(
                            &booking_id,
                            BookingUpdate {
                                status: Some(BookingStatus::Cancelled),
                                ..Default::default()
                            },
                        )
                        .await?;
                }
                (ResolutionTarget::Booking, booking_id, changed)
            }
            ResolutionAction::ReassignWorkspace {
                booking_id,
                workspace_id,
            } => {
                self.ensure_desk(&workspace_id).await?;
                let booking = self.booking(&booking_id).await?;
                let changed = booking.workspace_id != workspace_id;
                if changed {
                    self.store
                        .update_booking(
                            &booking_id,
                            BookingUpdate {
                                workspace_id: Some(workspace_id),
                                ..Default::default()
                            },
                        )
                        .await?;
                }
                (ResolutionTarget::Booking, booking_id, changed)
            }
            ResolutionAction::RemoveDedicated { employee_id } => {
                let employee = self.employee(&employee_id).await?;
                let changed = employee.dedicated_workspace_id.is_some();
                if changed {
                    self.store
                        .update_employee(
                            &employee_id,
                            EmployeeUpdate {
                                dedicated_workspace_id: Some(None),
                                ..Default::default()
                            },
                        )
                        .await?;
                }
                (ResolutionTarget::Employee, employee_id, changed)
            }
            ResolutionAction::UpdateEmployeeLocation {
                employee_id,
                location_id,
            } => {
                let locations = self.store.list_locations().await?;
                if !locations.iter().any(|location| location.id == location_id) {
                    return Err(AppError::not_found("location", location_id));
                }
                let employee = self.employee(&employee_id).await?;
                let changed =
                    employee.assigned_location_id.as_deref() != Some(location_id.as_str());
                if changed {
                    self.store
                        .update_employee(
                            &employee_id,
                            EmployeeUpdate {
                                assigned_location_id: Some(Some(location_id)),
                                ..Default::default()
                            },
                        )
                        .await?;
                }
                (ResolutionTarget::Employee, employee_id, changed)
            }
            ResolutionAction::ReassignDedicated {
                employee_id,
                workspace_id,
            } => {
                self.ensure_desk(&workspace_id).await?;
                let employee = self.employee(&employee_id).await?;
                let changed =
                    employee.dedicated_workspace_id.as_deref() != Some(workspace_id.as_str());
                if changed {
                    self.store
                        .update_employee(
                            &employee_id,
                            EmployeeUpdate {
                                dedicated_workspace_id: Some(Some(workspace_id)),
                                ..Default::default()
                            },
                        )
                        .await?;
                }
                (ResolutionTarget::Employee, employee_id, changed)
            }
        };

        info!(
            target: "app::resolution",
            conflict_id = %conflict.id,
            action = action_name,
            target_id = %target_id,
            changed,
            acted_by = %acting_user.email,
            impersonating = ?acting_user.impersonating,
            "conflict resolution applied"
        );

        Ok(ResolutionOutcome {
            conflict_id: conflict.id.clone(),
            action: action_name.to_string(),
            target,
            target_id,
            changed,
            resolved_by: acting_user.email.clone(),
        })
    }

    async fn booking(&self, id: &str) -> AppResult<Booking> {
        self.store
            .list_bookings()
            .await?
            .into_iter()
            .find(|booking| booking.id == id)
            .ok_or_else(|| AppError::not_found("booking", id))
    }

    async fn employee(&self, id: &str) -> AppResult<Employee> {
        self.store
            .list_employees()
            .await?
            .into_iter()
            .find(|employee| employee.id == id)
            .ok_or_else(|| AppError::not_found("employee", id))
    }

    async fn ensure_desk(&self, workspace_id: &str) -> AppResult<()> {
        let workspaces = self.store.list_workspaces().await?;
        match workspaces.iter().find(|workspace| workspace.id == workspace_id) {
            Some(workspace) if workspace.is_bookable_desk() => Ok(()),
            Some(workspace) => Err(AppError::validation_with_details(
                "target workspace is not an active desk",
                json!({
                    "workspaceId": workspace_id,
                    "workspaceType": workspace.workspace_type.as_str(),
                    "active": workspace.active,
                }),
            )),
            None => Err(AppError::not_found("workspace", workspace_id)),
        }
    }
}

/// The remedy must fit the conflict type and name one of its own subjects.
fn ensure_applicable(conflict: &Conflict, action: &ResolutionAction) -> AppResult<()> {
    if !action.applies_to(conflict.conflict_type) {
        return Err(AppError::validation_with_details(
            "remedy does not apply to this conflict type",
            json!({ "conflictType": conflict.conflict_type.as_str(), "action": action.as_str() }),
        ));
    }

    let subject_matches = match action {
        ResolutionAction::CancelBooking { booking_id }
        | ResolutionAction::ReassignWorkspace { booking_id, .. } => {
            conflict.booking_ids().contains(&booking_id.as_str())
        }
        ResolutionAction::RemoveDedicated { employee_id }
        | ResolutionAction::UpdateEmployeeLocation { employee_id, .. }
        | ResolutionAction::ReassignDedicated { employee_id, .. } => {
            conflict.employee_id() == Some(employee_id.as_str())
        }
    };

    if subject_matches {
        Ok(())
    } else {
        Err(AppError::validation_with_details(
            "remedy targets a record outside this conflict",
            json!({ "conflictId": conflict.id, "action": action.as_str() }),
        ))
    }
}
