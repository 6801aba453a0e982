use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use availability_cell::services::AvailabilityService;
use user_cell::services::UserDirectoryService;

use crate::models::{
    Appointment, AppointmentError, AppointmentStatus, CreateAppointmentRequest, Notification,
    UpdateAppointmentRequest,
};
use crate::repository::AppointmentRepository;
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::notification::NotificationService;
use crate::services::rules::BookingRules;

/// Appointment engine: books against availability slots and drives the status
/// state machine.
pub struct AppointmentService {
    repository: Arc<dyn AppointmentRepository>,
    availability: Arc<AvailabilityService>,
    users: Arc<UserDirectoryService>,
    notifications: Arc<NotificationService>,
    lifecycle: AppointmentLifecycleService,
    rules: BookingRules,
}

impl AppointmentService {
    pub fn new(
        repository: Arc<dyn AppointmentRepository>,
        availability: Arc<AvailabilityService>,
        users: Arc<UserDirectoryService>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self::with_rules(repository, availability, users, notifications, BookingRules::default())
    }

    pub fn with_rules(
        repository: Arc<dyn AppointmentRepository>,
        availability: Arc<AvailabilityService>,
        users: Arc<UserDirectoryService>,
        notifications: Arc<NotificationService>,
        rules: BookingRules,
    ) -> Self {
        Self {
            repository,
            availability,
            users,
            notifications,
            lifecycle: AppointmentLifecycleService::new(),
            rules,
        }
    }

    /// Book an appointment, claiming one of the professional's free slots that day.
    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        debug!(
            "Booking appointment for patient {} with professional {} at {}",
            request.patient_id, request.professional_id, request.appointment_date
        );

        self.ensure_user_exists(request.patient_id, "Patient").await?;
        self.ensure_user_exists(request.professional_id, "Professional").await?;

        self.rules
            .validate_appointment_date(request.appointment_date, Utc::now())?;

        let slot_id = self
            .claim_slot(request.professional_id, request.appointment_date)
            .await?;

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: request.patient_id,
            professional_id: request.professional_id,
            availability_id: slot_id,
            appointment_date: request.appointment_date,
            status: AppointmentStatus::Scheduled,
            notes: request.notes,
            created_at: now,
            updated_at: now,
        };

        let appointment = match self.repository.save(&appointment).await {
            Ok(saved) => saved,
            Err(e) => {
                error!("Failed to persist appointment, releasing slot {}: {}", slot_id, e);
                self.release_slot_quietly(slot_id).await;
                return Err(e.into());
            }
        };

        info!(
            "Appointment {} scheduled on slot {} for {}",
            appointment.id, slot_id, appointment.appointment_date
        );

        if let Err(e) = self.notifications.send_confirmation(&appointment).await {
            warn!("Confirmation notification failed for appointment {}: {}", appointment.id, e);
        }

        Ok(appointment)
    }

    /// Administrative update. Merges fields without lifecycle checks and
    /// leaves the booked slot untouched.
    pub async fn update_appointment(
        &self,
        id: Uuid,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Updating appointment: {}", id);

        let mut appointment = self.get_appointment(id).await?;

        if let Some(appointment_date) = request.appointment_date {
            self.rules.validate_appointment_date(appointment_date, Utc::now())?;
            appointment.appointment_date = appointment_date;
        }
        if let Some(status) = request.status {
            appointment.status = status;
        }
        if let Some(notes) = request.notes {
            appointment.notes = Some(notes);
        }

        self.persist(appointment).await
    }

    pub async fn complete_appointment(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        let appointment = self.transition(id, AppointmentStatus::Completed).await?;
        info!("Appointment {} completed", id);
        Ok(appointment)
    }

    /// Release the slot, then record the cancellation. A failed write re-books
    /// the slot so the appointment stays cancellable.
    pub async fn cancel_appointment(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        let mut appointment = self.get_appointment(id).await?;
        self.lifecycle
            .validate_status_transition(&appointment.status, &AppointmentStatus::Cancelled)?;

        let slot_id = appointment.availability_id;
        let released = self.availability.release_slot(slot_id).await?.is_some();

        appointment.status = AppointmentStatus::Cancelled;
        let appointment = match self.persist(appointment).await {
            Ok(updated) => updated,
            Err(e) => {
                if released {
                    self.reclaim_slot_quietly(slot_id).await;
                }
                return Err(e);
            }
        };
        info!("Appointment {} cancelled", id);

        if let Err(e) = self.notifications.send_cancellation(&appointment).await {
            warn!("Cancellation notification failed for appointment {}: {}", id, e);
        }

        Ok(appointment)
    }

    /// Move a scheduled appointment. The new slot is claimed before the old one
    /// is released, so a failed reschedule leaves the booking as it was.
    ///
    /// A new date inside the slot the appointment already holds keeps that slot
    /// without looking for other free slots that day.
    pub async fn reschedule_appointment(
        &self,
        id: Uuid,
        new_date: DateTime<Utc>,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Rescheduling appointment {} to {}", id, new_date);

        let mut appointment = self.get_appointment(id).await?;
        self.lifecycle
            .validate_status_transition(&appointment.status, &AppointmentStatus::Rescheduled)?;
        self.rules.validate_appointment_date(new_date, Utc::now())?;

        let old_slot_id = appointment.availability_id;
        let keeps_slot = self
            .availability
            .find_availability_by_id(old_slot_id)
            .await?
            .is_some_and(|slot| slot.contains(new_date));

        let new_slot_id = if keeps_slot {
            old_slot_id
        } else {
            self.claim_slot(appointment.professional_id, new_date).await?
        };

        appointment.appointment_date = new_date;
        appointment.availability_id = new_slot_id;
        appointment.status = AppointmentStatus::Rescheduled;

        let moves_slot = new_slot_id != old_slot_id;
        let mut released_old = false;
        if moves_slot {
            match self.availability.release_slot(old_slot_id).await {
                Ok(released) => released_old = released.is_some(),
                Err(e) => {
                    self.release_slot_quietly(new_slot_id).await;
                    return Err(e.into());
                }
            }
        }

        let appointment = match self.persist(appointment).await {
            Ok(updated) => updated,
            Err(e) => {
                if moves_slot {
                    self.release_slot_quietly(new_slot_id).await;
                }
                if released_old {
                    self.reclaim_slot_quietly(old_slot_id).await;
                }
                return Err(e);
            }
        };

        info!("Appointment {} rescheduled to {}", id, new_date);
        Ok(appointment)
    }

    pub async fn mark_as_no_show(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        let appointment = self.transition(id, AppointmentStatus::NoShow).await?;
        info!("Appointment {} marked as no-show", id);
        Ok(appointment)
    }

    /// Release the slot of an active appointment, then remove the record. A
    /// failed removal re-books the slot.
    pub async fn delete_appointment(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        debug!("Deleting appointment: {}", id);

        let appointment = self.get_appointment(id).await?;
        let slot_id = appointment.availability_id;
        let released = if appointment.is_active() {
            self.availability.release_slot(slot_id).await?.is_some()
        } else {
            false
        };

        let deleted = match self.repository.delete(id).await {
            Ok(deleted) => deleted.ok_or(AppointmentError::NotFound(id))?,
            Err(e) => {
                if released {
                    self.reclaim_slot_quietly(slot_id).await;
                }
                return Err(e.into());
            }
        };

        info!("Appointment {} deleted", id);
        Ok(deleted)
    }

    pub async fn send_reminder(&self, id: Uuid) -> Result<Vec<Notification>, AppointmentError> {
        let appointment = self.get_appointment(id).await?;
        self.notifications.send_reminder(&appointment).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, AppointmentError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    pub async fn find_by_patient_id(&self, patient_id: Uuid) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self.repository.find_by_patient_id(patient_id).await?)
    }

    pub async fn find_by_professional_id(
        &self,
        professional_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self.repository.find_by_professional_id(professional_id).await?)
    }

    pub async fn find_by_status(
        &self,
        status: AppointmentStatus,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self.repository.find_by_status(status).await?)
    }

    async fn get_appointment(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AppointmentError::NotFound(id))
    }

    async fn transition(
        &self,
        id: Uuid,
        new_status: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        let mut appointment = self.get_appointment(id).await?;
        self.lifecycle
            .validate_status_transition(&appointment.status, &new_status)?;

        appointment.status = new_status;
        self.persist(appointment).await
    }

    async fn persist(&self, mut appointment: Appointment) -> Result<Appointment, AppointmentError> {
        let id = appointment.id;
        appointment.updated_at = Utc::now();
        self.repository
            .update(&appointment)
            .await?
            .ok_or(AppointmentError::NotFound(id))
    }

    async fn claim_slot(
        &self,
        professional_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Uuid, AppointmentError> {
        let available = self
            .availability
            .find_available_slots(professional_id, at.date_naive())
            .await?;
        if available.is_empty() {
            return Err(AppointmentError::validation(
                "No availability for the selected date and time",
            ));
        }

        match self.availability.claim_slot(professional_id, at).await? {
            Some(slot) => Ok(slot.id),
            None => Err(AppointmentError::validation(
                "The selected availability was booked by another request",
            )),
        }
    }

    async fn release_slot_quietly(&self, slot_id: Uuid) {
        if let Err(e) = self.availability.release_slot(slot_id).await {
            error!("Failed to release slot {}: {}", slot_id, e);
        }
    }

    async fn reclaim_slot_quietly(&self, slot_id: Uuid) {
        if let Err(e) = self.availability.reclaim_slot(slot_id).await {
            error!("Failed to re-book slot {}: {}", slot_id, e);
        }
    }

    async fn ensure_user_exists(&self, user_id: Uuid, label: &str) -> Result<(), AppointmentError> {
        self.users
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppointmentError::validation(format!("{} not found", label)))?;
        Ok(())
    }
}
