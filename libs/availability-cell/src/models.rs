use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc, NaiveDate};

use user_cell::models::UserError;

// ==============================================================================
// CORE SLOT MODEL
// ==============================================================================

/// A bookable interval of one professional on one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailabilitySlot {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub available_date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_booked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AvailabilitySlot {
    pub fn is_same_day(&self, date: NaiveDate) -> bool {
        self.available_date == date
    }

    /// Half-open interval intersection. Slots of different professionals or
    /// different days never overlap, and `a.end == b.start` is not an overlap.
    pub fn overlaps(&self, other: &AvailabilitySlot) -> bool {
        self.professional_id == other.professional_id
            && self.is_same_day(other.available_date)
            && self.start_time < other.end_time
            && other.start_time < self.end_time
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start_time <= instant && instant < self.end_time
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAvailabilityRequest {
    pub professional_id: Uuid,
    pub available_date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_booked: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub available_date: Option<NaiveDate>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_booked: Option<bool>,
}

impl UpdateAvailabilityRequest {
    pub fn changes_schedule(&self) -> bool {
        self.available_date.is_some() || self.start_time.is_some() || self.end_time.is_some()
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, thiserror::Error)]
pub enum AvailabilityError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl AvailabilityError {
    pub fn slot_not_found(id: Uuid) -> Self {
        AvailabilityError::NotFound(format!("Availability {} not found", id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AvailabilityError::Validation(message.into())
    }
}

impl From<anyhow::Error> for AvailabilityError {
    fn from(err: anyhow::Error) -> Self {
        AvailabilityError::Database(err.to_string())
    }
}

impl From<UserError> for AvailabilityError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Database(msg) => AvailabilityError::Database(msg),
            other => AvailabilityError::Validation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn slot(professional_id: Uuid, day: u32, start: (u32, u32), end: (u32, u32)) -> AvailabilitySlot {
        let date = NaiveDate::from_ymd_opt(2030, 5, day).unwrap();
        AvailabilitySlot {
            id: Uuid::new_v4(),
            professional_id,
            available_date: date,
            start_time: Utc.with_ymd_and_hms(2030, 5, day, start.0, start.1, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2030, 5, day, end.0, end.1, 0).unwrap(),
            is_booked: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn partial_overlap_is_symmetric() {
        let pro = Uuid::new_v4();
        let a = slot(pro, 10, (10, 0), (11, 0));
        let b = slot(pro, 10, (10, 30), (11, 30));

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn containment_overlaps_both_ways() {
        let pro = Uuid::new_v4();
        let outer = slot(pro, 10, (9, 0), (12, 0));
        let inner = slot(pro, 10, (10, 0), (10, 30));

        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn slot_overlaps_itself() {
        let a = slot(Uuid::new_v4(), 10, (10, 0), (11, 0));
        assert!(a.overlaps(&a));
    }

    #[test]
    fn degenerate_slot_does_not_overlap_itself() {
        let a = slot(Uuid::new_v4(), 10, (10, 0), (10, 0));
        assert!(!a.overlaps(&a));
    }

    #[test]
    fn touching_boundaries_do_not_overlap() {
        let pro = Uuid::new_v4();
        let a = slot(pro, 10, (10, 0), (11, 0));
        let b = slot(pro, 10, (11, 0), (12, 0));

        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn different_days_do_not_overlap() {
        let pro = Uuid::new_v4();
        let a = slot(pro, 10, (10, 0), (11, 0));
        let b = slot(pro, 11, (10, 0), (11, 0));

        assert!(!a.overlaps(&b));
    }

    #[test]
    fn different_professionals_do_not_overlap() {
        let a = slot(Uuid::new_v4(), 10, (10, 0), (11, 0));
        let b = slot(Uuid::new_v4(), 10, (10, 0), (11, 0));

        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn contains_is_end_exclusive() {
        let a = slot(Uuid::new_v4(), 10, (10, 0), (11, 0));
        assert!(a.contains(a.start_time));
        assert!(!a.contains(a.end_time));
        assert_eq!(a.duration_minutes(), 60);
    }
}
