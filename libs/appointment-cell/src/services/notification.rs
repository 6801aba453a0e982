use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{Appointment, AppointmentError, Notification, NotificationType};
use crate::repository::NotificationRepository;

/// Records appointment notifications for both participants. Delivery is a stub:
/// a record counts as sent as soon as it is stored.
pub struct NotificationService {
    repository: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }

    pub async fn send_confirmation(
        &self,
        appointment: &Appointment,
    ) -> Result<Vec<Notification>, AppointmentError> {
        self.notify_participants(appointment, NotificationType::Confirmation).await
    }

    pub async fn send_cancellation(
        &self,
        appointment: &Appointment,
    ) -> Result<Vec<Notification>, AppointmentError> {
        self.notify_participants(appointment, NotificationType::Cancellation).await
    }

    pub async fn send_reminder(
        &self,
        appointment: &Appointment,
    ) -> Result<Vec<Notification>, AppointmentError> {
        self.notify_participants(appointment, NotificationType::Reminder).await
    }

    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Notification>, AppointmentError> {
        Ok(self.repository.find_by_user_id(user_id).await?)
    }

    async fn notify_participants(
        &self,
        appointment: &Appointment,
        notification_type: NotificationType,
    ) -> Result<Vec<Notification>, AppointmentError> {
        let mut sent = Vec::with_capacity(2);
        for user_id in [appointment.patient_id, appointment.professional_id] {
            sent.push(self.notify(user_id, appointment.id, notification_type).await?);
        }

        info!(
            "Sent {} notification for appointment {} to patient and professional",
            notification_type, appointment.id
        );
        Ok(sent)
    }

    async fn notify(
        &self,
        user_id: Uuid,
        appointment_id: Uuid,
        notification_type: NotificationType,
    ) -> Result<Notification, AppointmentError> {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id,
            appointment_id,
            notification_type,
            is_sent: false,
            sent_at: None,
            created_at: Utc::now(),
        };
        let notification = self.repository.save(&notification).await?;

        debug!("Delivering {} notification {} to user {}", notification_type, notification.id, user_id);

        let delivered = self
            .repository
            .mark_sent(notification.id, Utc::now())
            .await?
            .unwrap_or(notification);
        Ok(delivered)
    }
}
