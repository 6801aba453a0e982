use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_database::supabase::SupabaseClient;

use crate::models::{Appointment, AppointmentStatus, Notification};
use super::{AppointmentRepository, NotificationRepository};

const APPOINTMENTS_PATH: &str = "/rest/v1/appointments";
const NOTIFICATIONS_PATH: &str = "/rest/v1/notifications";

fn parse_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>> {
    let parsed = rows
        .into_iter()
        .map(serde_json::from_value)
        .collect::<std::result::Result<Vec<T>, _>>()?;
    Ok(parsed)
}

async fn write_rows<T: DeserializeOwned>(
    supabase: &SupabaseClient,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> Result<Vec<T>> {
    let result: Vec<Value> = supabase
        .request_with_headers(method, path, body, Some(SupabaseClient::representation_headers()))
        .await?;
    parse_rows(result)
}

pub struct SupabaseAppointmentRepository {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseAppointmentRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    async fn select(&self, query: &str) -> Result<Vec<Appointment>> {
        let path = format!("{}?{}", APPOINTMENTS_PATH, query);
        let result: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;
        parse_rows(result)
    }
}

#[async_trait]
impl AppointmentRepository for SupabaseAppointmentRepository {
    async fn save(&self, appointment: &Appointment) -> Result<Appointment> {
        debug!("Inserting appointment {}", appointment.id);

        write_rows::<Appointment>(&self.supabase, Method::POST, APPOINTMENTS_PATH, Some(json!(appointment)))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create appointment"))
    }

    async fn update(&self, appointment: &Appointment) -> Result<Option<Appointment>> {
        let path = format!("{}?id=eq.{}", APPOINTMENTS_PATH, appointment.id);
        let update_data = json!({
            "availability_id": appointment.availability_id,
            "appointment_date": appointment.appointment_date,
            "status": appointment.status,
            "notes": appointment.notes,
            "updated_at": appointment.updated_at,
        });

        Ok(write_rows(&self.supabase, Method::PATCH, &path, Some(update_data))
            .await?
            .into_iter()
            .next())
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Appointment>> {
        let path = format!("{}?id=eq.{}", APPOINTMENTS_PATH, id);
        Ok(write_rows(&self.supabase, Method::DELETE, &path, None)
            .await?
            .into_iter()
            .next())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>> {
        Ok(self.select(&format!("id=eq.{}", id)).await?.into_iter().next())
    }

    async fn find_by_patient_id(&self, patient_id: Uuid) -> Result<Vec<Appointment>> {
        self.select(&format!("patient_id=eq.{}&order=appointment_date.asc", patient_id))
            .await
    }

    async fn find_by_professional_id(&self, professional_id: Uuid) -> Result<Vec<Appointment>> {
        self.select(&format!(
            "professional_id=eq.{}&order=appointment_date.asc",
            professional_id
        ))
        .await
    }

    async fn find_by_status(&self, status: AppointmentStatus) -> Result<Vec<Appointment>> {
        self.select(&format!("status=eq.{}&order=appointment_date.asc", status))
            .await
    }
}

pub struct SupabaseNotificationRepository {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseNotificationRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl NotificationRepository for SupabaseNotificationRepository {
    async fn save(&self, notification: &Notification) -> Result<Notification> {
        write_rows::<Notification>(&self.supabase, Method::POST, NOTIFICATIONS_PATH, Some(json!(notification)))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create notification"))
    }

    async fn mark_sent(&self, id: Uuid, sent_at: DateTime<Utc>) -> Result<Option<Notification>> {
        let path = format!("{}?id=eq.{}", NOTIFICATIONS_PATH, id);
        let update_data = json!({
            "is_sent": true,
            "sent_at": sent_at,
        });

        Ok(write_rows(&self.supabase, Method::PATCH, &path, Some(update_data))
            .await?
            .into_iter()
            .next())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let path = format!("{}?user_id=eq.{}&order=created_at.desc", NOTIFICATIONS_PATH, user_id);
        let result: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;
        parse_rows(result)
    }
}
