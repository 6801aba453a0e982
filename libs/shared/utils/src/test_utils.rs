use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::time::at_time;

/// Calendar dates relative to the current UTC day.
pub struct TestDates;

impl TestDates {
    pub fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    pub fn days_ahead(days: i64) -> NaiveDate {
        Self::today() + Duration::days(days)
    }

    pub fn tomorrow() -> NaiveDate {
        Self::days_ahead(1)
    }

    pub fn at(date: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
        at_time(date, hour, minute).expect("valid test clock time")
    }

    pub fn tomorrow_at(hour: u32, minute: u32) -> DateTime<Utc> {
        Self::at(Self::tomorrow(), hour, minute)
    }
}

/// PostgREST row bodies for wiremock-backed repository tests.
pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn user_row(user_id: Uuid, role: &str) -> Value {
        json!({
            "id": user_id,
            "auth_external_id": format!("auth|{}", user_id),
            "first_name": "Test",
            "last_name": "User",
            "role": role,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn slot_row(
        slot_id: Uuid,
        professional_id: Uuid,
        date: NaiveDate,
        start_hour: u32,
        end_hour: u32,
        is_booked: bool,
    ) -> Value {
        json!({
            "id": slot_id,
            "professional_id": professional_id,
            "available_date": date,
            "start_time": TestDates::at(date, start_hour, 0),
            "end_time": TestDates::at(date, end_hour, 0),
            "is_booked": is_booked,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn appointment_row(
        appointment_id: Uuid,
        patient_id: Uuid,
        professional_id: Uuid,
        availability_id: Uuid,
        appointment_date: DateTime<Utc>,
        status: &str,
    ) -> Value {
        json!({
            "id": appointment_id,
            "patient_id": patient_id,
            "professional_id": professional_id,
            "availability_id": availability_id,
            "appointment_date": appointment_date,
            "status": status,
            "notes": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn notification_row(
        notification_id: Uuid,
        user_id: Uuid,
        appointment_id: Uuid,
        notification_type: &str,
        is_sent: bool,
    ) -> Value {
        json!({
            "id": notification_id,
            "user_id": user_id,
            "appointment_id": appointment_id,
            "notification_type": notification_type,
            "is_sent": is_sent,
            "sent_at": if is_sent { json!("2024-01-01T00:05:00Z") } else { Value::Null },
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn error_response(message: &str, code: &str) -> Value {
        json!({
            "message": message,
            "code": code
        })
    }
}
