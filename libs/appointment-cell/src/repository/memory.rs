use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Appointment, AppointmentStatus, Notification};
use super::{AppointmentRepository, NotificationRepository};

#[derive(Default)]
pub struct InMemoryAppointmentRepository {
    appointments: RwLock<HashMap<Uuid, Appointment>>,
}

impl InMemoryAppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn filtered<F>(&self, predicate: F) -> Vec<Appointment>
    where
        F: Fn(&Appointment) -> bool,
    {
        let mut appointments: Vec<Appointment> = self
            .appointments
            .read()
            .await
            .values()
            .filter(|appointment| predicate(appointment))
            .cloned()
            .collect();
        appointments.sort_by_key(|appointment| (appointment.appointment_date, appointment.created_at));
        appointments
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn save(&self, appointment: &Appointment) -> Result<Appointment> {
        self.appointments
            .write()
            .await
            .insert(appointment.id, appointment.clone());
        Ok(appointment.clone())
    }

    async fn update(&self, appointment: &Appointment) -> Result<Option<Appointment>> {
        let mut appointments = self.appointments.write().await;
        match appointments.get_mut(&appointment.id) {
            Some(stored) => {
                *stored = appointment.clone();
                Ok(Some(appointment.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Appointment>> {
        Ok(self.appointments.write().await.remove(&id))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>> {
        Ok(self.appointments.read().await.get(&id).cloned())
    }

    async fn find_by_patient_id(&self, patient_id: Uuid) -> Result<Vec<Appointment>> {
        Ok(self.filtered(|a| a.patient_id == patient_id).await)
    }

    async fn find_by_professional_id(&self, professional_id: Uuid) -> Result<Vec<Appointment>> {
        Ok(self.filtered(|a| a.professional_id == professional_id).await)
    }

    async fn find_by_status(&self, status: AppointmentStatus) -> Result<Vec<Appointment>> {
        Ok(self.filtered(|a| a.status == status).await)
    }
}

#[derive(Default)]
pub struct InMemoryNotificationRepository {
    notifications: RwLock<HashMap<Uuid, Notification>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn save(&self, notification: &Notification) -> Result<Notification> {
        self.notifications
            .write()
            .await
            .insert(notification.id, notification.clone());
        Ok(notification.clone())
    }

    async fn mark_sent(&self, id: Uuid, sent_at: DateTime<Utc>) -> Result<Option<Notification>> {
        let mut notifications = self.notifications.write().await;
        Ok(notifications.get_mut(&id).map(|stored| {
            stored.is_sent = true;
            stored.sent_at = Some(sent_at);
            stored.clone()
        }))
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let mut notifications: Vec<Notification> = self
            .notifications
            .read()
            .await
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }
}
