use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Appointment, AppointmentStatus, Notification};

pub mod memory;
pub mod supabase;

pub use memory::{InMemoryAppointmentRepository, InMemoryNotificationRepository};
pub use supabase::{SupabaseAppointmentRepository, SupabaseNotificationRepository};

/// Appointment storage. Listings are ordered by `appointment_date` ascending.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn save(&self, appointment: &Appointment) -> Result<Appointment>;
    async fn update(&self, appointment: &Appointment) -> Result<Option<Appointment>>;
    async fn delete(&self, id: Uuid) -> Result<Option<Appointment>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>>;
    async fn find_by_patient_id(&self, patient_id: Uuid) -> Result<Vec<Appointment>>;
    async fn find_by_professional_id(&self, professional_id: Uuid) -> Result<Vec<Appointment>>;
    async fn find_by_status(&self, status: AppointmentStatus) -> Result<Vec<Appointment>>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn save(&self, notification: &Notification) -> Result<Notification>;
    async fn mark_sent(&self, id: Uuid, sent_at: DateTime<Utc>) -> Result<Option<Notification>>;
    /// Newest first.
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Notification>>;
}
