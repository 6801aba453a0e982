use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};

use shared_utils::time::is_same_day;

use crate::models::AvailabilityError;

pub const MIN_START_HOUR: u32 = 8;
pub const MAX_END_HOUR: u32 = 20;
pub const MIN_SLOT_DURATION_MINUTES: i64 = 30;
pub const MAX_ADVANCE_DAYS: i64 = 90;

/// Business-hour and advance-window rules for creating slots. Independent of the
/// booking window used by the appointment engine.
#[derive(Debug, Clone)]
pub struct AvailabilityRules {
    pub min_start_hour: u32,
    pub max_end_hour: u32,
    pub min_slot_duration_minutes: i64,
    pub max_advance_days: i64,
}

impl Default for AvailabilityRules {
    fn default() -> Self {
        Self {
            min_start_hour: MIN_START_HOUR,
            max_end_hour: MAX_END_HOUR,
            min_slot_duration_minutes: MIN_SLOT_DURATION_MINUTES,
            max_advance_days: MAX_ADVANCE_DAYS,
        }
    }
}

impl AvailabilityRules {
    pub fn validate_time_slot(
        &self,
        available_date: NaiveDate,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<(), AvailabilityError> {
        if start_time >= end_time {
            return Err(AvailabilityError::validation(
                "Start time must be before end time",
            ));
        }

        if start_time.hour() < self.min_start_hour {
            return Err(AvailabilityError::validation(format!(
                "Availability cannot start before {}:00",
                self.min_start_hour
            )));
        }

        // Only the hour counts: 20:59 is still inside the closing hour.
        if end_time.date_naive() != start_time.date_naive() || end_time.hour() > self.max_end_hour {
            return Err(AvailabilityError::validation(format!(
                "Availability cannot end after {}:00",
                self.max_end_hour
            )));
        }

        if end_time - start_time < Duration::minutes(self.min_slot_duration_minutes) {
            return Err(AvailabilityError::validation(format!(
                "Minimum slot duration is {} minutes",
                self.min_slot_duration_minutes
            )));
        }

        if !is_same_day(start_time, available_date) {
            return Err(AvailabilityError::validation(
                "Start and end time must fall on the available date",
            ));
        }

        Ok(())
    }

    pub fn validate_date_range(
        &self,
        available_date: NaiveDate,
        start_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), AvailabilityError> {
        if available_date < now.date_naive() || start_time < now {
            return Err(AvailabilityError::validation(
                "Availability date cannot be in the past",
            ));
        }

        let max_date = (now + Duration::days(self.max_advance_days)).date_naive();
        if available_date > max_date {
            return Err(AvailabilityError::validation(format!(
                "Availability cannot be scheduled more than {} days ahead",
                self.max_advance_days
            )));
        }

        Ok(())
    }
}
