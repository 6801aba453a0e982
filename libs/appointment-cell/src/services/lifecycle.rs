use tracing::{debug, warn};

use crate::models::{AppointmentError, AppointmentStatus};

/// Status state machine. Completed, cancelled and no-show are terminal.
#[derive(Debug, Clone, Default)]
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_status_transition(
        &self,
        current_status: &AppointmentStatus,
        new_status: &AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!("Validating status transition from {} to {}", current_status, new_status);

        if !Self::allows(current_status, new_status) {
            warn!("Invalid status transition attempted: {} -> {}", current_status, new_status);
            return Err(AppointmentError::InvalidStatus(format!(
                "Appointment cannot move from {} to {}",
                current_status, new_status
            )));
        }

        Ok(())
    }

    pub fn get_valid_transitions(&self, current_status: &AppointmentStatus) -> Vec<AppointmentStatus> {
        [
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::Rescheduled,
            AppointmentStatus::NoShow,
        ]
        .into_iter()
        .filter(|next| Self::allows(current_status, next))
        .collect()
    }

    fn allows(current_status: &AppointmentStatus, new_status: &AppointmentStatus) -> bool {
        match new_status {
            AppointmentStatus::Completed => current_status.can_complete(),
            AppointmentStatus::Cancelled => current_status.can_cancel(),
            AppointmentStatus::Rescheduled => current_status.can_reschedule(),
            AppointmentStatus::NoShow => current_status.is_active(),
            // Nothing returns to the initial state through the lifecycle.
            AppointmentStatus::Scheduled => false,
        }
    }
}
