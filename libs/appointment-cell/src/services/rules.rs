use chrono::{DateTime, Duration, Utc};

use crate::models::AppointmentError;

pub const MIN_ADVANCE_HOURS: i64 = 2;
pub const MAX_ADVANCE_DAYS: i64 = 60;

/// Booking window for appointments, measured from the moment of the request.
#[derive(Debug, Clone)]
pub struct BookingRules {
    pub min_advance_hours: i64,
    pub max_advance_days: i64,
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            min_advance_hours: MIN_ADVANCE_HOURS,
            max_advance_days: MAX_ADVANCE_DAYS,
        }
    }
}

impl BookingRules {
    pub fn validate_appointment_date(
        &self,
        appointment_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), AppointmentError> {
        if appointment_date < now + Duration::hours(self.min_advance_hours) {
            return Err(AppointmentError::validation(format!(
                "Appointments must be booked at least {} hours in advance",
                self.min_advance_hours
            )));
        }

        if appointment_date > now + Duration::days(self.max_advance_days) {
            return Err(AppointmentError::validation(format!(
                "Appointments cannot be booked more than {} days in advance",
                self.max_advance_days
            )));
        }

        Ok(())
    }
}
