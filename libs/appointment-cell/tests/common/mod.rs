#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use appointment_cell::{
    AppointmentRepository, AppointmentService, InMemoryAppointmentRepository,
    InMemoryNotificationRepository, NotificationService,
};
use availability_cell::models::{AvailabilitySlot, CreateAvailabilityRequest};
use availability_cell::{AvailabilityRepository, AvailabilityService, InMemoryAvailabilityRepository};
use shared_utils::test_utils::TestDates;
use user_cell::models::{CreateUserRequest, User, UserRole};
use user_cell::{InMemoryUserRepository, UserDirectoryService};

/// Fully wired in-memory clinic: directory, availability, appointments and notifications.
pub struct Clinic {
    pub users: Arc<UserDirectoryService>,
    pub availability: Arc<AvailabilityService>,
    pub notifications: Arc<NotificationService>,
    pub appointments: Arc<AppointmentService>,
    pub patient: User,
    pub professional: User,
}

impl Clinic {
    pub async fn new() -> Self {
        Self::with_repositories(
            Arc::new(InMemoryAvailabilityRepository::new()),
            Arc::new(InMemoryAppointmentRepository::new()),
        )
        .await
    }

    pub async fn with_repositories(
        slots: Arc<dyn AvailabilityRepository>,
        bookings: Arc<dyn AppointmentRepository>,
    ) -> Self {
        let users = Arc::new(UserDirectoryService::new(Arc::new(InMemoryUserRepository::new())));
        let availability = Arc::new(AvailabilityService::new(slots, users.clone()));
        let notifications = Arc::new(NotificationService::new(Arc::new(
            InMemoryNotificationRepository::new(),
        )));
        let appointments = Arc::new(AppointmentService::new(
            bookings,
            availability.clone(),
            users.clone(),
            notifications.clone(),
        ));

        let patient = register(&users, "patient", UserRole::Patient).await;
        let professional = register(&users, "professional", UserRole::Professional).await;

        Self {
            users,
            availability,
            notifications,
            appointments,
            patient,
            professional,
        }
    }

    pub async fn publish_slot(&self, date: NaiveDate, start: u32, end: u32) -> AvailabilitySlot {
        self.availability
            .create_availability(CreateAvailabilityRequest {
                professional_id: self.professional.id,
                available_date: date,
                start_time: TestDates::at(date, start, 0),
                end_time: TestDates::at(date, end, 0),
                is_booked: None,
            })
            .await
            .unwrap()
    }

    pub async fn slot(&self, id: Uuid) -> AvailabilitySlot {
        self.availability
            .find_availability_by_id(id)
            .await
            .unwrap()
            .unwrap()
    }

    pub async fn free_slots(&self, date: NaiveDate) -> Vec<AvailabilitySlot> {
        self.availability
            .find_available_slots(self.professional.id, date)
            .await
            .unwrap()
    }

    pub fn booking(&self, at: DateTime<Utc>) -> appointment_cell::models::CreateAppointmentRequest {
        appointment_cell::models::CreateAppointmentRequest {
            patient_id: self.patient.id,
            professional_id: self.professional.id,
            appointment_date: at,
            notes: Some("First visit".to_string()),
        }
    }
}

pub async fn register(users: &UserDirectoryService, label: &str, role: UserRole) -> User {
    users
        .create_user(CreateUserRequest {
            auth_external_id: format!("auth|{}|{}", label, Uuid::new_v4()),
            first_name: label.to_string(),
            last_name: "Test".to_string(),
            role,
        })
        .await
        .unwrap()
}
